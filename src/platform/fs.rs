// UAProbe - platform/fs.rs
//
// Filesystem helpers for reading probe input and table files.

use crate::util::constants;
use std::borrow::Cow;
use std::io::{self, BufRead, Read};
use std::path::Path;

/// Read the full content of a file as a string, refusing files above
/// `max_size` bytes.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_capped(path: &Path, max_size: u64) -> io::Result<String> {
    let len = std::fs::metadata(path)?.len();
    if len > max_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("file is {len} bytes, maximum is {max_size}"),
        ));
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read probe input lines from any buffered reader.
///
/// Returns `(line_number, text)` pairs with 1-based line numbers. Blank lines
/// and lines starting with `comment_prefix` are skipped; surrounding
/// whitespace is trimmed. Invalid UTF-8 is decoded lossily so no row is lost.
///
/// At most `MAX_INPUT_SIZE` bytes are read and at most `MAX_BATCH_SIZE`
/// lines are kept; anything beyond is dropped with a warning.
pub fn read_input_lines<R: BufRead>(
    reader: R,
    comment_prefix: &str,
) -> io::Result<Vec<(usize, String)>> {
    let mut reader = reader.take(constants::MAX_INPUT_SIZE);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        if matches!(line, Cow::Owned(_)) {
            tracing::warn!(line = line_no, "Input line is not valid UTF-8; decoded lossily");
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(comment_prefix) {
            continue;
        }
        if lines.len() == constants::MAX_BATCH_SIZE {
            tracing::warn!(
                line = line_no,
                max = constants::MAX_BATCH_SIZE,
                "Too many input lines; the rest are ignored"
            );
            return Ok(lines);
        }
        lines.push((line_no, trimmed.to_string()));
    }

    if reader.limit() == 0 {
        tracing::warn!(
            max_bytes = constants::MAX_INPUT_SIZE,
            "Input size limit reached; the rest is ignored"
        );
    }
    Ok(lines)
}

/// Read probe input lines from a file on disk. Files larger than
/// `MAX_INPUT_SIZE` are refused.
pub fn read_input_file(path: &Path, comment_prefix: &str) -> io::Result<Vec<(usize, String)>> {
    let len = std::fs::metadata(path)?.len();
    if len > constants::MAX_INPUT_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "input file is {len} bytes, maximum is {}",
                constants::MAX_INPUT_SIZE
            ),
        ));
    }
    let file = std::fs::File::open(path)?;
    read_input_lines(io::BufReader::new(file), comment_prefix)
}

// UAProbe - core/detect.rs
//
// First-match-wins platform detection over a compiled table, and the
// immutable `Platform` value built from it.

use crate::core::model::{Detection, HostHints, Platform, PlatformRule, PlatformTable};
use crate::util::constants;

impl PlatformTable {
    /// Classify `user_agent` against the table.
    ///
    /// Rules are tried strictly in order; the first one whose pattern matches
    /// decides the result. There is no scoring and no error case: a string
    /// no rule matches simply yields `None`.
    pub fn detect(&self, user_agent: &str) -> Option<Detection> {
        let detection = self
            .rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| apply_rule(rule, index, user_agent));

        tracing::trace!(
            table_id = %self.id,
            result = ?detection.as_ref().map(|d| d.platform.as_str()),
            "Detection complete"
        );

        detection
    }
}

/// Test one rule; on a match build its result.
fn apply_rule(rule: &PlatformRule, index: usize, user_agent: &str) -> Option<Detection> {
    let captures = rule.pattern.captures(user_agent)?;

    let version = match rule.force_version {
        Some(forced) => Some(forced),
        None => {
            let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    tracing::warn!(
                        platform = %rule.platform,
                        rule = index,
                        captured = raw,
                        "Captured version is not a number; reporting no version"
                    );
                    None
                }
            }
        }
    };

    Some(Detection {
        platform: rule.platform.clone(),
        version,
        extra: rule.extra.clone(),
        rule_index: index,
    })
}

impl Platform {
    /// Detect the platform for `user_agent` and combine it with host
    /// capabilities. Intended to run once at startup; the result is then
    /// handed to whatever needs to branch on it.
    pub fn detect(table: &PlatformTable, user_agent: &str, hints: HostHints) -> Self {
        Self::from_detection(table.detect(user_agent), hints)
    }

    /// Build a `Platform` from an already computed detection.
    pub fn from_detection(detection: Option<Detection>, hints: HostHints) -> Self {
        let pointer_touch = hints.max_touch_points > 0;
        Self {
            detection,
            touch: hints.touch_events || pointer_touch,
            gesture: hints.gesture_events || pointer_touch,
        }
    }

    /// Name of the detected platform, if any rule matched.
    pub fn name(&self) -> Option<&str> {
        self.detection.as_ref().map(|d| d.platform.as_str())
    }

    /// Version of the detected platform.
    pub fn version(&self) -> Option<f64> {
        self.detection.as_ref().and_then(|d| d.version)
    }

    /// Version if the detected platform is `name`, otherwise `None`.
    ///
    /// This is the usual way to branch on a platform:
    /// `platform.version_of("android").is_some_and(|v| v < 3.0)`.
    pub fn version_of(&self, name: &str) -> Option<f64> {
        self.detection
            .as_ref()
            .filter(|d| d.platform == name)
            .and_then(|d| d.version)
    }

    /// Value of an extra flag set by the winning rule.
    pub fn extra(&self, key: &str) -> Option<i64> {
        self.detection
            .as_ref()
            .and_then(|d| d.extra.get(key).copied())
    }

    pub fn is_touch(&self) -> bool {
        self.touch
    }

    pub fn is_gesture(&self) -> bool {
        self.gesture
    }

    /// Whether the platform's console only accepts one argument per call.
    pub fn single_arg_console(&self) -> bool {
        constants::SINGLE_ARG_CONSOLE_PLATFORMS
            .iter()
            .any(|name| self.version_of(name).is_some_and(|v| v != 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table;
    use std::path::Path;

    fn builtin() -> PlatformTable {
        table::load_builtin_tables()
            .into_iter()
            .next()
            .expect("built-in table")
    }

    fn table_from(toml: &str) -> PlatformTable {
        let def = table::parse_table_toml(toml, Path::new("test.toml")).unwrap();
        table::validate_and_compile(def, false).unwrap()
    }

    #[test]
    fn test_first_match_wins_over_later_rules() {
        let table = table_from(
            r#"
[table]
id = "overlap"
name = "Overlap"

[[rule]]
platform = "first"
pattern = 'Engine/(\d+)'

[[rule]]
platform = "second"
pattern = 'Engine/(\d+)\.(\d+)'
"#,
        );
        let d = table.detect("Engine/7.3").unwrap();
        assert_eq!(d.platform, "first");
        assert_eq!(d.version, Some(7.0));
        assert_eq!(d.rule_index, 0);
    }

    #[test]
    fn test_android_chrome_precedes_android_and_chrome() {
        let ua = "Mozilla/5.0 (Linux; Android 4.4.2; Nexus 5 Build/KOT49H) \
                  AppleWebKit/537.36 (KHTML, like Gecko) Chrome/32.0.1700.99 Mobile Safari/537.36";
        let table = builtin();
        // The later rules would match on their own.
        assert!(table.rules[1].pattern.is_match(ua));
        assert!(table.rules[11].pattern.is_match(ua));

        let d = table.detect(ua).unwrap();
        assert_eq!(d.platform, "androidChrome");
        assert_eq!(d.version, Some(32.0));
    }

    #[test]
    fn test_forced_version_and_extra() {
        let ua = "Mozilla/5.0 (Linux; U; en-us; KFTT Build/IML74K) AppleWebKit/535.19 \
                  (KHTML, like Gecko) Silk/2.1 Mobile Safari/535.19 Silk-Accelerated=true";
        let platform = Platform::detect(&builtin(), ua, HostHints::default());
        assert_eq!(platform.name(), Some("android"));
        assert_eq!(platform.version(), Some(4.0));
        assert_eq!(platform.extra("silk"), Some(2));
        assert_eq!(platform.extra("missing"), None);
    }

    #[test]
    fn test_case_insensitive_rule() {
        let ua = "Mozilla/5.0 (playbook; U; RIM Tablet OS 1.0.0; en-US) AppleWebKit/534.8+";
        let d = builtin().detect(ua).unwrap();
        assert_eq!(d.platform, "blackberry");
        assert_eq!(d.version, Some(2.0));
    }

    #[test]
    fn test_no_match_is_none() {
        let platform = Platform::detect(&builtin(), "curl/8.4.0", HostHints::default());
        assert_eq!(platform.detection, None);
        assert_eq!(platform.name(), None);
        assert_eq!(platform.version(), None);
        assert!(!platform.single_arg_console());
    }

    #[test]
    fn test_empty_string_is_none() {
        assert!(builtin().detect("").is_none());
    }

    #[test]
    fn test_non_numeric_capture_still_matches() {
        let table = table_from(
            r#"
[table]
id = "words"
name = "Words"

[[rule]]
platform = "named"
pattern = 'Codename/(\w+)'

[[rule]]
platform = "fallback"
pattern = 'Codename'
force_version = 1
"#,
        );
        let d = table.detect("Codename/falcon").unwrap();
        assert_eq!(d.platform, "named");
        assert_eq!(d.version, None);
    }

    #[test]
    fn test_version_of_only_for_detected_platform() {
        let ua = "Mozilla/5.0 (Linux; U; Android 2.3.4; en-us; Nexus S Build/GRJ22) \
                  AppleWebKit/533.1 (KHTML, like Gecko) Version/4.0 Mobile Safari/533.1";
        let platform = Platform::detect(&builtin(), ua, HostHints::default());
        assert_eq!(platform.version_of("android"), Some(2.0));
        assert_eq!(platform.version_of("ios"), None);
        assert!(platform.version_of("android").is_some_and(|v| v < 3.0));
    }

    #[test]
    fn test_single_arg_console_platforms() {
        let table = builtin();
        let ios = Platform::detect(
            &table,
            "Mozilla/5.0 (iPhone; CPU iPhone OS 7_0 like Mac OS X) AppleWebKit/537.51.1",
            HostHints::default(),
        );
        assert!(ios.single_arg_console());

        let firefox = Platform::detect(
            &table,
            "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:26.0) Gecko/20100101 Firefox/26.0",
            HostHints::default(),
        );
        assert!(!firefox.single_arg_console());
    }

    #[test]
    fn test_capabilities_from_hints() {
        let none = Platform::from_detection(None, HostHints::default());
        assert!(!none.is_touch());
        assert!(!none.is_gesture());

        let touch_only = Platform::from_detection(
            None,
            HostHints {
                touch_events: true,
                ..HostHints::default()
            },
        );
        assert!(touch_only.is_touch());
        assert!(!touch_only.is_gesture());

        let pointer = Platform::from_detection(
            None,
            HostHints {
                max_touch_points: 5,
                ..HostHints::default()
            },
        );
        assert!(pointer.is_touch());
        assert!(pointer.is_gesture());
    }
}

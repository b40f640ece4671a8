//! Typed retrieval from a [`ConfigParser`].
//!
//! Every value kind comes in three flavours:
//!
//! | Accessor | On failure |
//! | -------- | ---------- |
//! | [`get`](ConfigParser::get) | returns the [`ConfigError`] |
//! | [`get_or`](ConfigParser::get_or) | logs, returns the fallback |
//! | [`get_flagged`](ConfigParser::get_flagged) | logs, sets the flag, returns `T::default()` |
//!
//! The `get_from*` variants read from a named subsection for one call.
//!
//! ```rust
//! use inisect_core::config::ConfigParser;
//!
//! let config: ConfigParser = "port = 8080\n[Cache]\nsize = 64 MiB\n".parse().unwrap();
//!
//! let mut failed = false;
//! let port: u16 = config.get_flagged("port", &mut failed);
//! let host: String = config.get_flagged("host", &mut failed);
//! assert_eq!(port, 8080);
//! assert!(host.is_empty());
//! assert!(failed);
//!
//! let retries: u32 = config.get_or("retries", 3);
//! assert_eq!(retries, 3);
//! ```

use tracing::{info, warn};

use crate::config::parser::ConfigParser;
use crate::config::types::{ConfigStore, SectionMap};
use crate::errors::{ConfigError, InisectError};
use crate::units::{Bytes, Quota};

mod sealed {
    pub trait Sealed {}
}

/// Value kinds a stored string can be converted to.
///
/// The set is closed: integers, finite floats, `bool` (exactly `true` or `false`),
/// `String` (passed through) and [`Bytes`].
pub trait ConfigType: sealed::Sealed + Default + Sized {
    /// Human name of the kind, used in format errors
    const KIND: &'static str;

    fn from_config_str(value: &str) -> Option<Self>;
}

macro_rules! config_type_from_str {
    ($kind:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl ConfigType for $ty {
                const KIND: &'static str = $kind;

                fn from_config_str(value: &str) -> Option<Self> {
                    value.parse().ok()
                }
            }
        )+
    };
}

config_type_from_str!("integer" => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
macro_rules! config_type_finite_float {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl ConfigType for $ty {
                const KIND: &'static str = "float";

                fn from_config_str(value: &str) -> Option<Self> {
                    value.parse::<$ty>().ok().filter(|v| v.is_finite())
                }
            }
        )+
    };
}

config_type_finite_float!(f32, f64);
config_type_from_str!("boolean" => bool);
config_type_from_str!("bytes" => Bytes);

impl sealed::Sealed for String {}

impl ConfigType for String {
    const KIND: &'static str = "string";

    fn from_config_str(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

/// The map a lookup runs against.
#[derive(Clone, Copy)]
pub(crate) enum Scope<'a> {
    Global(&'a ConfigStore),
    Section { name: &'a str, map: &'a SectionMap },
}

impl<'a> Scope<'a> {
    /// Leaf value for `key`. Subsection names are not options.
    fn lookup(&self, key: &str) -> Option<&'a str> {
        match *self {
            Scope::Global(store) => store.leaf(key),
            Scope::Section { map, .. } => map.get(key).map(String::as_str),
        }
    }

    fn section_name(&self) -> Option<&'a str> {
        match *self {
            Scope::Global(_) => None,
            Scope::Section { name, .. } => Some(name),
        }
    }
}

/// Look up `key` in `scope` and convert it to `T`.
pub(crate) fn parse_as<T: ConfigType>(key: &str, scope: Scope<'_>) -> Result<T, ConfigError> {
    let value = scope
        .lookup(key)
        .ok_or_else(|| ConfigError::OptionNotFound {
            key: key.to_string(),
            section: scope.section_name().map(str::to_string),
        })?;

    T::from_config_str(value).ok_or_else(|| ConfigError::FormatError {
        key: key.to_string(),
        value: value.to_string(),
        expected: T::KIND,
    })
}

impl ConfigParser {
    pub(crate) fn scope(&self) -> Scope<'_> {
        match self.cursor.get().and_then(|index| self.store.section_at(index)) {
            Some((name, map)) => Scope::Section { name, map },
            None => Scope::Global(&self.store),
        }
    }

    /// Get `key` from the current scope as `T`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OptionNotFound`] if the key is absent,
    /// [`ConfigError::FormatError`] if the value does not convert.
    pub fn get<T: ConfigType>(&self, key: &str) -> Result<T, ConfigError> {
        parse_as(key, self.scope())
    }

    /// Get `key` as `T`, or `fallback` on any failure.
    pub fn get_or<T: ConfigType>(&self, key: &str, fallback: T) -> T {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => self.fallback_on(&e, fallback),
        }
    }

    /// Get `key` as `T`. On failure set `fail_flag` and return
    /// `T::default()`. The flag is never cleared, so it can collect the
    /// outcome of many required options.
    pub fn get_flagged<T: ConfigType>(&self, key: &str, fail_flag: &mut bool) -> T {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => self.flag_on(&e, fail_flag),
        }
    }

    /// Get `key` from subsection `section`.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus [`ConfigError::SectionNotFound`] and
    /// [`ConfigError::GuardConflict`] when a guard is already in scope.
    pub fn get_from<T: ConfigType>(&self, section: &str, key: &str) -> Result<T, ConfigError> {
        self.with_subsection(section, |config| config.get(key))?
    }

    /// Get `key` from `section`, or `fallback` if either is missing or the
    /// value does not convert.
    pub fn get_from_or<T: ConfigType>(&self, section: &str, key: &str, fallback: T) -> T {
        match self.guard(section) {
            Ok(_guard) => self.get_or(key, fallback),
            Err(e) => self.fallback_on(&e, fallback),
        }
    }

    /// Get `key` from `section`, setting `fail_flag` on any failure.
    pub fn get_from_flagged<T: ConfigType>(
        &self,
        section: &str,
        key: &str,
        fail_flag: &mut bool,
    ) -> T {
        match self.guard(section) {
            Ok(_guard) => self.get_flagged(key, fail_flag),
            Err(e) => self.flag_on(&e, fail_flag),
        }
    }

    /// Get `key` as a [`Quota`] of `max`.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus [`ConfigError::QuotaFormat`] when the value
    /// is neither a fraction nor a byte count.
    pub fn get_quota(&self, key: &str, max: Bytes) -> Result<Quota, ConfigError> {
        let text: String = self.get(key)?;
        Quota::parse(max, &text).map_err(|source| ConfigError::QuotaFormat {
            key: key.to_string(),
            source,
        })
    }

    pub fn get_quota_or(&self, key: &str, max: Bytes, fallback: Quota) -> Quota {
        match self.get_quota(key, max) {
            Ok(quota) => quota,
            Err(e) => self.fallback_on(&e, fallback),
        }
    }

    pub fn get_quota_flagged(&self, key: &str, max: Bytes, fail_flag: &mut bool) -> Quota {
        match self.get_quota(key, max) {
            Ok(quota) => quota,
            Err(e) => self.flag_on(&e, fail_flag),
        }
    }

    pub fn get_quota_from(&self, section: &str, key: &str, max: Bytes) -> Result<Quota, ConfigError> {
        self.with_subsection(section, |config| config.get_quota(key, max))?
    }

    pub fn get_quota_from_or(&self, section: &str, key: &str, max: Bytes, fallback: Quota) -> Quota {
        match self.guard(section) {
            Ok(_guard) => self.get_quota_or(key, max, fallback),
            Err(e) => self.fallback_on(&e, fallback),
        }
    }

    pub fn get_quota_from_flagged(
        &self,
        section: &str,
        key: &str,
        max: Bytes,
        fail_flag: &mut bool,
    ) -> Quota {
        match self.guard(section) {
            Ok(_guard) => self.get_quota_flagged(key, max, fail_flag),
            Err(e) => self.flag_on(&e, fail_flag),
        }
    }

    fn fallback_on<T>(&self, error: &ConfigError, fallback: T) -> T {
        self.report_error(error, false);
        fallback
    }

    fn flag_on<T: Default>(&self, error: &ConfigError, fail_flag: &mut bool) -> T {
        self.report_error(error, true);
        *fail_flag = true;
        T::default()
    }

    /// Log a failed lookup, prefixed with the redirected subsection if any.
    ///
    /// A missing option with a fallback is routine and logged at info; every
    /// other failure is a warning.
    fn report_error(&self, error: &ConfigError, required: bool) {
        let section = self.current_section();
        let prefix = section.map(|name| format!("[{}]: ", name)).unwrap_or_default();

        if error.is_not_found() && !required {
            info!(
                event = "core.config.fallback_used",
                section = section.unwrap_or_default(),
                code = error.error_code(),
                "{}{}",
                prefix,
                error
            );
        } else {
            warn!(
                event = "core.config.lookup_failed",
                section = section.unwrap_or_default(),
                code = error.error_code(),
                "{}{}",
                prefix,
                error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Run `f` with JSON logging captured and return what was logged.
    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    const SAMPLE: &str = "\
Bool Test = true
Integer Test = -42
Unsigned Test = 42
Float Test = 3.25
String Test = hello world
Not A Number = forty-two
Bytes Test = 100 KiB
Quota Test = 25%
Bad Quota = lots

[Section 1]
Integer Test = 1
Quota Test = 1 GiB

[Section 2]
Integer Test = two
";

    fn parser() -> ConfigParser {
        SAMPLE.parse().unwrap()
    }

    fn gib(n: i64) -> Bytes {
        Bytes::new(n * 1024 * 1024 * 1024)
    }

    #[test]
    fn test_get_each_kind() {
        let config = parser();

        assert!(config.get::<bool>("Bool Test").unwrap());
        assert_eq!(config.get::<i32>("Integer Test").unwrap(), -42);
        assert_eq!(config.get::<u64>("Unsigned Test").unwrap(), 42);
        assert_eq!(config.get::<f64>("Float Test").unwrap(), 3.25);
        assert_eq!(config.get::<f32>("Float Test").unwrap(), 3.25);
        assert_eq!(config.get::<String>("String Test").unwrap(), "hello world");
        assert_eq!(config.get::<Bytes>("Bytes Test").unwrap(), Bytes::new(102_400));
    }

    #[test]
    fn test_get_missing_key() {
        let config = parser();
        let result = config.get::<i32>("missing_key");
        assert!(matches!(
            result,
            Err(ConfigError::OptionNotFound { ref key, section: None }) if key == "missing_key"
        ));
    }

    #[test]
    fn test_get_format_error() {
        let config = parser();
        match config.get::<i32>("Not A Number") {
            Err(ConfigError::FormatError { key, value, expected }) => {
                assert_eq!(key, "Not A Number");
                assert_eq!(value, "forty-two");
                assert_eq!(expected, "integer");
            }
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_get_rejects_out_of_range_and_sign() {
        let config = parser();
        assert!(config.get::<u32>("Integer Test").is_err());
        assert!(config.get::<i8>("Float Test").is_err());
    }

    #[test]
    fn test_bool_is_case_sensitive() {
        let config: ConfigParser = "a = True\nb = false\nc = 1".parse().unwrap();
        assert!(config.get::<bool>("a").is_err());
        assert!(!config.get::<bool>("b").unwrap());
        assert!(config.get::<bool>("c").is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let config: ConfigParser = "a = NaN\nb = inf\nc = -infinity\nd = 1e3".parse().unwrap();
        for key in ["a", "b", "c"] {
            assert!(
                matches!(
                    config.get::<f64>(key),
                    Err(ConfigError::FormatError { expected: "float", .. })
                ),
                "expected {} to be rejected",
                key
            );
        }
        assert!(config.get::<f32>("b").is_err());
        assert_eq!(config.get::<f64>("d").unwrap(), 1000.0);
        assert_eq!(config.get_or("a", 0.5), 0.5);
    }

    #[test]
    fn test_section_name_is_not_an_option() {
        let config = parser();
        assert!(matches!(
            config.get::<String>("Section 1"),
            Err(ConfigError::OptionNotFound { .. })
        ));
    }

    #[test]
    fn test_get_or_missing_returns_fallback() {
        let config = parser();
        assert_eq!(config.get_or::<i32>("missing_key", 42), 42);
    }

    #[test]
    fn test_get_or_format_error_returns_fallback() {
        let config = parser();
        assert_eq!(config.get_or::<i32>("Not A Number", -1), -1);
        assert_eq!(config.get_or("String Test", "fallback".to_string()), "hello world");
    }

    #[test]
    fn test_get_flagged_sets_flag_and_returns_zero() {
        let config = parser();
        let mut failed = false;

        assert_eq!(config.get_flagged::<i32>("Integer Test", &mut failed), -42);
        assert!(!failed);

        assert_eq!(config.get_flagged::<i32>("Not A Number", &mut failed), 0);
        assert!(failed);
    }

    #[test]
    fn test_get_flagged_never_clears_flag() {
        let config = parser();
        let mut failed = false;

        let _: String = config.get_flagged("missing", &mut failed);
        let value: bool = config.get_flagged("Bool Test", &mut failed);
        assert!(value);
        assert!(failed);
        assert_eq!(config.get_flagged::<String>("missing", &mut failed), "");
        assert_eq!(config.get_flagged::<Bytes>("missing", &mut failed), Bytes::new(0));
    }

    #[test]
    fn test_get_from() {
        let config = parser();
        assert_eq!(config.get_from::<i32>("Section 1", "Integer Test").unwrap(), 1);
        assert_eq!(config.current_section(), None);
        assert!(!config.is_guarded());
    }

    #[test]
    fn test_get_from_missing_key_reports_section() {
        let config = parser();
        match config.get_from::<i32>("Section 1", "Float Test") {
            Err(ConfigError::OptionNotFound { key, section }) => {
                assert_eq!(key, "Float Test");
                assert_eq!(section.as_deref(), Some("Section 1"));
            }
            other => panic!("expected OptionNotFound, got {:?}", other),
        }
        assert_eq!(config.current_section(), None);
    }

    #[test]
    fn test_get_from_missing_section() {
        let config = parser();
        assert!(matches!(
            config.get_from::<i32>("NoSuchSection", "key"),
            Err(ConfigError::SectionNotFound { ref section }) if section == "NoSuchSection"
        ));
    }

    #[test]
    fn test_get_from_leaf_is_not_a_section() {
        let config = parser();
        assert!(matches!(
            config.get_from::<i32>("Integer Test", "key"),
            Err(ConfigError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn test_get_from_or_missing_section_returns_fallback() {
        let config = parser();
        assert_eq!(config.get_from_or("NoSuchSection", "key", 7), 7);
        assert_eq!(config.get_from_or("Section 2", "Integer Test", 7), 7);
        assert_eq!(config.get_from_or("Section 1", "Integer Test", 7), 1);
        assert_eq!(config.current_section(), None);
    }

    #[test]
    fn test_get_from_flagged() {
        let config = parser();
        let mut failed = false;

        assert_eq!(config.get_from_flagged::<i32>("Section 1", "Integer Test", &mut failed), 1);
        assert!(!failed);

        assert_eq!(config.get_from_flagged::<i32>("NoSuchSection", "x", &mut failed), 0);
        assert!(failed);

        let mut failed = false;
        assert_eq!(config.get_from_flagged::<i32>("Section 2", "Integer Test", &mut failed), 0);
        assert!(failed);
    }

    #[test]
    fn test_get_quota() {
        let config = parser();
        assert_eq!(config.get_quota("Quota Test", gib(4)).unwrap().bytes(), gib(1));
        assert_eq!(
            config.get_quota_from("Section 1", "Quota Test", gib(4)).unwrap().fraction(),
            0.25
        );
    }

    #[test]
    fn test_get_quota_errors() {
        let config = parser();
        assert!(matches!(
            config.get_quota("Bad Quota", gib(1)),
            Err(ConfigError::QuotaFormat { ref key, .. }) if key == "Bad Quota"
        ));
        assert!(matches!(
            config.get_quota("missing", gib(1)),
            Err(ConfigError::OptionNotFound { .. })
        ));
    }

    #[test]
    fn test_get_quota_fallback_and_flag() {
        let config = parser();
        let fallback = Quota::new(gib(1), 0.5);

        assert_eq!(config.get_quota_or("Bad Quota", gib(1), fallback), fallback);
        assert_eq!(
            config.get_quota_from_or("NoSuchSection", "Quota Test", gib(1), fallback),
            fallback
        );

        let mut failed = false;
        let quota = config.get_quota_flagged("Bad Quota", gib(1), &mut failed);
        assert!(failed);
        assert_eq!(quota, Quota::default());

        let mut failed = false;
        let quota = config.get_quota_from_flagged("Section 1", "Quota Test", gib(2), &mut failed);
        assert!(!failed);
        assert_eq!(quota.fraction(), 0.5);
    }

    #[test]
    fn test_get_or_logs_missing_option() {
        let config = parser();
        let mut value = 0;
        let logs = capture_logs(|| value = config.get_or::<i32>("missing_key", 42));

        assert_eq!(value, 42);
        assert!(logs.contains("core.config.fallback_used"), "logs: {}", logs);
        assert!(logs.contains("Option not in config: missing_key"), "logs: {}", logs);
        assert!(logs.contains(r#""level":"INFO""#), "logs: {}", logs);
    }

    #[test]
    fn test_get_flagged_logs_warning() {
        let config = parser();
        let mut failed = false;
        let logs = capture_logs(|| {
            let _: i32 = config.get_flagged("missing_key", &mut failed);
        });

        assert!(failed);
        assert!(logs.contains("core.config.lookup_failed"), "logs: {}", logs);
        assert!(logs.contains(r#""level":"WARN""#), "logs: {}", logs);
    }

    #[test]
    fn test_get_from_or_logs_with_section_prefix() {
        let config = parser();
        let mut value = 0;
        let logs = capture_logs(|| value = config.get_from_or("Section 2", "Integer Test", 7));

        assert_eq!(value, 7);
        assert!(
            logs.contains("[Section 2]: Invalid configuration entry format"),
            "logs: {}",
            logs
        );
    }
}

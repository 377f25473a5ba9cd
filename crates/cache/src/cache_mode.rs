use std::env;
use std::fmt;
use std::sync::Once;
use tracing::warn;

static LOGGED_WARNING: Once = Once::new();

pub const CACHE_MODE_ENV: &str = "NODEKIT_CACHE";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CacheMode {
    Off,
    Read,
    #[default]
    ReadWrite,
    Write,
}

impl From<&str> for CacheMode {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "off" => CacheMode::Off,
            "read" => CacheMode::Read,
            "read-write" => CacheMode::ReadWrite,
            "write" => CacheMode::Write,
            unknown => {
                // Only show this once, not every time the mode is resolved
                LOGGED_WARNING.call_once(|| {
                    warn!(
                        "Unknown {CACHE_MODE_ENV} environment variable value \"{}\", falling back to read-write mode",
                        unknown
                    );
                });

                CacheMode::ReadWrite
            }
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CacheMode::Off => "off",
                CacheMode::Read => "read",
                CacheMode::ReadWrite => "read-write",
                CacheMode::Write => "write",
            }
        )
    }
}

impl CacheMode {
    pub fn from_env() -> CacheMode {
        match env::var(CACHE_MODE_ENV) {
            Ok(value) if !value.is_empty() => CacheMode::from(value.as_str()),
            _ => CacheMode::ReadWrite,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, CacheMode::Read | CacheMode::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, CacheMode::Write | CacheMode::ReadWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!(CacheMode::from("off"), CacheMode::Off);
        assert_eq!(CacheMode::from("READ"), CacheMode::Read);
        assert_eq!(CacheMode::from("write"), CacheMode::Write);
        assert_eq!(CacheMode::from("read-write"), CacheMode::ReadWrite);
    }

    #[test]
    fn falls_back_for_unknown_values() {
        assert_eq!(CacheMode::from("sometimes"), CacheMode::ReadWrite);
    }

    #[test]
    fn checks_access() {
        assert!(!CacheMode::Off.is_readable());
        assert!(!CacheMode::Off.is_writable());
        assert!(CacheMode::Read.is_readable());
        assert!(!CacheMode::Read.is_writable());
        assert!(!CacheMode::Write.is_readable());
        assert!(CacheMode::Write.is_writable());
    }
}

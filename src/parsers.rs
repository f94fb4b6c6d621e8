//! Built-in parser plugins, available to declaration documents by name.

use std::path::PathBuf;
use std::time::Duration;

use crate::parser::{ParserError, TextParser};

const DURATION_UNITS: &[(&str, u128)] = &[
    ("h", 3_600_000_000_000),
    ("m", 60_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

/// `500ms`, `30s`, `5m`, `2h`: an integer count and a unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationParser;

impl TextParser for DurationParser {
    type Value = Duration;

    fn name(&self) -> &str {
        "duration"
    }

    fn parse(&self, text: &str) -> Result<Duration, ParserError> {
        let text = text.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ParserError::new("duration", format!("missing unit in {:?}", text)))?;
        let (count, unit) = text.split_at(split);
        let count: u128 = count
            .parse()
            .map_err(|_| ParserError::new("duration", format!("missing count in {:?}", text)))?;
        let scale = DURATION_UNITS
            .iter()
            .find(|(name, _)| *name == unit.trim())
            .map(|(_, scale)| *scale)
            .ok_or_else(|| ParserError::new("duration", format!("unknown unit {:?}", unit)))?;
        let nanos = count
            .checked_mul(scale)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| ParserError::new("duration", format!("{:?} is out of range", text)))?;
        Ok(Duration::from_nanos(nanos))
    }

    /// Largest unit that divides the duration exactly.
    fn format(&self, value: &Duration) -> String {
        let nanos = value.as_nanos();
        if nanos == 0 {
            return "0s".to_string();
        }
        let (unit, scale) = DURATION_UNITS
            .iter()
            .find(|(_, scale)| nanos % scale == 0)
            .copied()
            .unwrap_or(("ns", 1));
        format!("{}{}", nanos / scale, unit)
    }
}

/// Filesystem paths, kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParser;

impl TextParser for PathParser {
    type Value = PathBuf;

    fn name(&self) -> &str {
        "path"
    }

    fn parse(&self, text: &str) -> Result<PathBuf, ParserError> {
        if text.trim().is_empty() {
            return Err(ParserError::new("path", "empty path"));
        }
        Ok(PathBuf::from(text))
    }

    fn format(&self, value: &PathBuf) -> String {
        value.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_units() {
        let p = DurationParser;
        assert_eq!(p.parse("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(p.parse(" 30s ").unwrap(), Duration::from_secs(30));
        assert_eq!(p.parse("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(p.parse("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(p.parse("7us").unwrap(), Duration::from_micros(7));
    }

    #[test]
    fn test_duration_format_uses_largest_exact_unit() {
        let p = DurationParser;
        assert_eq!(p.format(&Duration::from_secs(7200)), "2h");
        assert_eq!(p.format(&Duration::from_secs(90)), "90s");
        assert_eq!(p.format(&Duration::from_millis(1500)), "1500ms");
        assert_eq!(p.format(&Duration::ZERO), "0s");
        for text in ["500ms", "30s", "5m", "2h", "3ns"] {
            assert_eq!(p.format(&p.parse(text).unwrap()), text);
        }
    }

    #[test]
    fn test_duration_errors() {
        let p = DurationParser;
        assert!(p.parse("30").is_err());
        assert!(p.parse("s").is_err());
        assert!(p.parse("3 days").is_err());
    }

    #[test]
    fn test_path() {
        let p = PathParser;
        let path = p.parse("/var/log/app.log").unwrap();
        assert_eq!(p.format(&path), "/var/log/app.log");
        assert!(p.parse("  ").is_err());
    }
}

//! Age specifiers attached to interaction records.
//!
//! A dataset cell is either an exact age (`40`) or an inclusive range (`18-65`).
//! Anything that does not parse is kept as [`AgeSpec::Invalid`] so the record still
//! loads; an invalid specifier simply never matches a queried age.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Age applicability of a single interaction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeSpec {
    /// Matches exactly one age.
    Exact(i64),
    /// Matches `start..=end`. Not validated: `start > end` matches nothing.
    Range { start: i64, end: i64 },
    /// Unparseable cell content, kept verbatim.
    Invalid(String),
}

impl AgeSpec {
    /// Parse a dataset cell.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.contains('-') {
            let parts: Vec<&str> = trimmed.split('-').collect();
            if let [start, end] = parts.as_slice() {
                if let (Ok(start), Ok(end)) = (start.trim().parse(), end.trim().parse()) {
                    return AgeSpec::Range { start, end };
                }
            }
            return AgeSpec::Invalid(raw.to_string());
        }

        if let Ok(age) = trimmed.parse::<i64>() {
            return AgeSpec::Exact(age);
        }

        // Numeric spreadsheet cells come through as "40.0"
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => AgeSpec::Exact(value.trunc() as i64),
            _ => AgeSpec::Invalid(raw.to_string()),
        }
    }

    /// Whether this specifier applies to `age`.
    pub fn matches(&self, age: u32) -> bool {
        let age = i64::from(age);
        match self {
            AgeSpec::Exact(exact) => *exact == age,
            AgeSpec::Range { start, end } => *start <= age && age <= *end,
            AgeSpec::Invalid(_) => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, AgeSpec::Invalid(_))
    }
}

impl From<u32> for AgeSpec {
    fn from(age: u32) -> Self {
        AgeSpec::Exact(i64::from(age))
    }
}

impl FromStr for AgeSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AgeSpec::parse(s))
    }
}

impl fmt::Display for AgeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeSpec::Exact(age) => write!(f, "{}", age),
            AgeSpec::Range { start, end } => write!(f, "{}-{}", start, end),
            AgeSpec::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for AgeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AgeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Cell {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Cell::deserialize(deserializer)? {
            Cell::Int(age) => AgeSpec::Exact(age),
            Cell::Float(value) if value.is_finite() => AgeSpec::Exact(value.trunc() as i64),
            Cell::Float(value) => AgeSpec::Invalid(value.to_string()),
            Cell::Text(raw) => AgeSpec::parse(&raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_inclusive() {
        let spec = AgeSpec::parse("30-50");
        assert_eq!(spec, AgeSpec::Range { start: 30, end: 50 });

        assert!(spec.matches(30));
        assert!(spec.matches(40));
        assert!(spec.matches(50));
        assert!(!spec.matches(29));
        assert!(!spec.matches(51));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let spec = AgeSpec::parse("50-30");
        assert_eq!(spec, AgeSpec::Range { start: 50, end: 30 });

        for age in [0, 29, 30, 40, 50, 51, 120] {
            assert!(!spec.matches(age), "age {} should not match", age);
        }
    }

    #[test]
    fn test_exact_age() {
        let spec = AgeSpec::parse("40");
        assert!(spec.matches(40));
        assert!(!spec.matches(41));

        assert_eq!(AgeSpec::parse(" 40 "), AgeSpec::Exact(40));
        assert_eq!(AgeSpec::parse("40.0"), AgeSpec::Exact(40));
        assert_eq!(AgeSpec::from(7), AgeSpec::Exact(7));
    }

    #[test]
    fn test_range_with_spaces() {
        assert_eq!(AgeSpec::parse("18 - 65"), AgeSpec::Range { start: 18, end: 65 });
    }

    #[test]
    fn test_malformed_specs_never_match() {
        for raw in ["", "adult", "18-65-80", "-5", "18-", "18-sixty", "nan", "inf"] {
            let spec = AgeSpec::parse(raw);
            assert!(!spec.is_valid(), "{:?} should be invalid", raw);
            assert!(!spec.matches(18));
            assert!(!spec.matches(0));
        }
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["40", "18-65", "adult"] {
            assert_eq!(AgeSpec::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_deserialize_from_json_number_or_string() {
        let exact: AgeSpec = serde_json::from_str("45").unwrap();
        assert_eq!(exact, AgeSpec::Exact(45));

        let range: AgeSpec = serde_json::from_str("\"18-65\"").unwrap();
        assert_eq!(range, AgeSpec::Range { start: 18, end: 65 });

        assert_eq!(serde_json::to_string(&range).unwrap(), "\"18-65\"");
    }
}

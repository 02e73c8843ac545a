//! Age/sex stratification parsing
//!
//! Attribute keys encode age brackets and sex tags in several source-specific
//! shapes ("From 15 to 64 years_Males", "d65_74_F", "85+_Total"). The parsers
//! here reduce them to a typed range plus a sex tag; keys with no parseable
//! age are treated as non-age-stratified.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// An age bracket; `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AgeRange {
    pub(crate) min: Option<u32>,
    pub(crate) max: Option<u32>,
}

impl AgeRange {
    pub(crate) const fn new(min: Option<u32>, max: Option<u32>) -> Self {
        AgeRange { min, max }
    }

    /// Two brackets overlap when neither ends strictly before the other
    /// starts; open ends are unbounded.
    pub(crate) fn overlaps(&self, other: &AgeRange) -> bool {
        let upper_ok = match (self.max, other.min) {
            (Some(a_max), Some(b_min)) => b_min <= a_max,
            _ => true,
        };
        let lower_ok = match (self.min, other.max) {
            (Some(a_min), Some(b_max)) => a_min <= b_max,
            _ => true,
        };
        upper_ok && lower_ok
    }
}

/// Sex tag carried in a stratified attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sex {
    Males,
    Females,
    Total,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sex::Males => "Males",
            Sex::Females => "Females",
            Sex::Total => "Total",
        };
        f.write_str(label)
    }
}

static FROM_TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^from\s+(\d+)\s+to\s+(\d+)").unwrap());
static OR_OVER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+).*or over").unwrap());
static LESS_THAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^less than.*?(\d+)").unwrap());
static MORTALITY_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^d(\d+)(?:_(\d+))?").unwrap());
static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[-_](\d+)").unwrap());
static UP_TO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-(\d+)").unwrap());
static AND_ABOVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\+").unwrap());

/// Parses the age bracket encoded in an attribute key, trying each pattern
/// in priority order. `None` means the key carries no age stratification.
pub(crate) fn parse_age_group(key: &str) -> Option<AgeRange> {
    if let Some(caps) = FROM_TO_RE.captures(key) {
        return Some(AgeRange::new(number(&caps, 1), number(&caps, 2)));
    }
    if let Some(caps) = OR_OVER_RE.captures(key) {
        return Some(AgeRange::new(number(&caps, 1), None));
    }
    if let Some(caps) = LESS_THAN_RE.captures(key) {
        return Some(AgeRange::new(None, number(&caps, 1)));
    }
    if let Some(caps) = MORTALITY_CODE_RE.captures(key) {
        return Some(AgeRange::new(number(&caps, 1), number(&caps, 2)));
    }
    if let Some(caps) = BRACKET_RE.captures(key) {
        return Some(AgeRange::new(number(&caps, 1), number(&caps, 2)));
    }
    if let Some(caps) = UP_TO_RE.captures(key) {
        return Some(AgeRange::new(None, number(&caps, 1)));
    }
    if let Some(caps) = AND_ABOVE_RE.captures(key) {
        return Some(AgeRange::new(number(&caps, 1), None));
    }
    None
}

/// Extracts the sex tag from the key's trailing `_`-separated segment.
/// Sources use full words and the single-letter M/F/T codes; anything else
/// means the series is not sex-stratified and counts as Total.
pub(crate) fn parse_sex(key: &str) -> Sex {
    let tag = key.rsplit('_').next().unwrap_or(key);
    if tag.eq_ignore_ascii_case("males")
        || tag.eq_ignore_ascii_case("male")
        || tag.eq_ignore_ascii_case("m")
    {
        Sex::Males
    } else if tag.eq_ignore_ascii_case("females")
        || tag.eq_ignore_ascii_case("female")
        || tag.eq_ignore_ascii_case("f")
    {
        Sex::Females
    } else {
        Sex::Total
    }
}

fn number(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

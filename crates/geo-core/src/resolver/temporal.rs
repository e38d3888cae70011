//! Validity-window filtering of geoword candidates.
//!
//! A geoword exists from `valid_from` to `valid_to`. An unset bound is
//! open: the geoword has always existed, or still exists.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use time::{Date, Month};
use tracing::debug;

use super::FilterError;
use crate::dict::GeowordEntry;

/// How a geoword's validity must relate to the query period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalRelation {
    /// Existed at some point in the period. Same as `Overlaps`.
    Exists,
    /// Already existed when the period starts.
    Before,
    /// Still existed when the period ends.
    After,
    Overlaps,
    /// Existed through the whole period.
    Covers,
    /// Existed only within the period; both bounds must be set.
    Contains,
}

impl FromStr for TemporalRelation {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exists" => Ok(Self::Exists),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "overlaps" => Ok(Self::Overlaps),
            "covers" => Ok(Self::Covers),
            "contains" => Ok(Self::Contains),
            other => Err(FilterError::InvalidRelation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFilter {
    relation: TemporalRelation,
    from: Date,
    to: Date,
}

impl TemporalFilter {
    /// Period `[from, to]`; `to = None` makes it the single day `from`.
    /// Bounds given in reverse order are swapped.
    pub fn new(relation: TemporalRelation, from: Date, to: Option<Date>) -> Self {
        let to = to.unwrap_or(from);
        let (from, to) = if from > to { (to, from) } else { (from, to) };
        Self { relation, from, to }
    }

    /// Like `new`, with the bounds given as date strings.
    pub fn parse(
        relation: TemporalRelation,
        from: &str,
        to: Option<&str>,
    ) -> Result<Self, FilterError> {
        let from = parse_date(from)?.ok_or_else(|| FilterError::InvalidDate(from.to_string()))?;
        let to = match to {
            Some(s) => parse_date(s)?,
            None => None,
        };
        Ok(Self::new(relation, from, to))
    }

    pub fn relation(&self) -> TemporalRelation {
        self.relation
    }

    pub fn period(&self) -> (Date, Date) {
        (self.from, self.to)
    }

    pub fn accepts(&self, entry: &GeowordEntry) -> bool {
        let valid_from = entry_bound(entry, &entry.valid_from);
        let valid_to = entry_bound(entry, &entry.valid_to);
        match self.relation {
            TemporalRelation::Exists | TemporalRelation::Overlaps => {
                !valid_from.is_some_and(|d| d > self.to) && !valid_to.is_some_and(|d| d < self.from)
            }
            TemporalRelation::Before => !valid_from.is_some_and(|d| d > self.from),
            TemporalRelation::After => !valid_to.is_some_and(|d| d < self.to),
            TemporalRelation::Covers => {
                !valid_from.is_some_and(|d| d > self.from) && !valid_to.is_some_and(|d| d < self.to)
            }
            TemporalRelation::Contains => match (valid_from, valid_to) {
                (Some(f), Some(t)) => f >= self.from && t <= self.to,
                _ => false,
            },
        }
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-\s](\d{1,2})[/\-\s](\d{1,2})").expect("date pattern is valid")
    })
}

/// Read the date at the start of an ISO-like string (`2001-01-21`,
/// `2001/1/21`, `2001-01-21T09:00:00`). An empty string is `None`.
pub fn parse_date(s: &str) -> Result<Option<Date>, FilterError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let invalid = || FilterError::InvalidDate(s.to_string());
    let caps = date_pattern().captures(s).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u8 = caps[2].parse().map_err(|_| invalid())?;
    let day: u8 = caps[3].parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day)
        .map(Some)
        .map_err(|_| invalid())
}

/// An unreadable bound is treated as unset.
fn entry_bound(entry: &GeowordEntry, value: &str) -> Option<Date> {
    match parse_date(value) {
        Ok(date) => date,
        Err(_) => {
            debug!(geonlp_id = entry.geonlp_id.as_str(), value, "unreadable validity date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        parse_date(s).unwrap().unwrap()
    }

    fn dated(valid_from: &str, valid_to: &str) -> GeowordEntry {
        GeowordEntry {
            geonlp_id: "g".to_string(),
            body: "田無".to_string(),
            valid_from: valid_from.to_string(),
            valid_to: valid_to.to_string(),
            ..GeowordEntry::default()
        }
    }

    fn filter(relation: TemporalRelation, from: &str, to: &str) -> TemporalFilter {
        TemporalFilter::parse(relation, from, Some(to)).unwrap()
    }

    #[test]
    fn parses_iso_like_dates() {
        assert_eq!(date("2001-01-21"), date("2001/1/21"));
        assert_eq!(date("2001-01-21T09:30:00+09:00"), date("2001 01 21"));
        assert_eq!(date("2001-01-21").to_string(), "2001-01-21");
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(parse_date("  ").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_dates() {
        for s in ["21/01/2001", "2001-13-01", "2001-02-30", "平成13年"] {
            assert!(
                matches!(parse_date(s), Err(FilterError::InvalidDate(_))),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn single_day_and_swapped_bounds() {
        let f = TemporalFilter::parse(TemporalRelation::Exists, "2001-01-01", None).unwrap();
        assert_eq!(f.period(), (date("2001-01-01"), date("2001-01-01")));
        let f = filter(TemporalRelation::Exists, "2001-02-01", "2001-01-01");
        assert_eq!(f.period(), (date("2001-01-01"), date("2001-02-01")));
        assert!(TemporalFilter::parse(TemporalRelation::Exists, "", None).is_err());
    }

    #[test]
    fn relation_names() {
        assert_eq!("covers".parse::<TemporalRelation>().unwrap(), TemporalRelation::Covers);
        assert!(matches!(
            "during".parse::<TemporalRelation>(),
            Err(FilterError::InvalidRelation(_))
        ));
    }

    #[test]
    fn undated_geowords_pass_open_relations() {
        let undated = dated("", "");
        for relation in [
            TemporalRelation::Exists,
            TemporalRelation::Before,
            TemporalRelation::After,
            TemporalRelation::Overlaps,
            TemporalRelation::Covers,
        ] {
            assert!(filter(relation, "2001-01-01", "2001-02-01").accepts(&undated));
        }
        assert!(!filter(TemporalRelation::Contains, "2001-01-01", "2001-02-01").accepts(&undated));
    }

    #[test]
    fn relations_over_a_merger() {
        let old_city = dated("", "2001-01-20");
        let new_city = dated("2001-01-21", "");

        let exists = filter(TemporalRelation::Exists, "2000-01-01", "2001-01-01");
        assert!(exists.accepts(&old_city));
        assert!(!exists.accepts(&new_city));

        let before = TemporalFilter::parse(TemporalRelation::Before, "2000-01-01", None).unwrap();
        assert!(before.accepts(&old_city));
        assert!(!before.accepts(&new_city));

        let after = TemporalFilter::parse(TemporalRelation::After, "2001-01-22", None).unwrap();
        assert!(!after.accepts(&old_city));
        assert!(after.accepts(&new_city));

        let overlaps = filter(TemporalRelation::Overlaps, "2001-01-01", "2001-02-01");
        assert!(overlaps.accepts(&old_city));
        assert!(overlaps.accepts(&new_city));

        let covers = filter(TemporalRelation::Covers, "2001-01-01", "2001-02-01");
        assert!(!covers.accepts(&old_city));
        assert!(!covers.accepts(&new_city));
    }

    #[test]
    fn contains_needs_both_bounds_inside() {
        let f = filter(TemporalRelation::Contains, "2001-01-01", "2001-02-01");
        assert!(f.accepts(&dated("2001-01-05", "2001-01-10")));
        assert!(f.accepts(&dated("2001-01-01", "2001-02-01")));
        assert!(!f.accepts(&dated("2000-12-31", "2001-01-10")));
        assert!(!f.accepts(&dated("2001-01-05", "")));
    }

    #[test]
    fn unreadable_entry_date_is_open() {
        let f = filter(TemporalRelation::Exists, "2000-01-01", "2000-12-31");
        assert!(f.accepts(&dated("unknown", "")));
    }
}

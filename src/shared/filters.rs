//! Building blocks for list filters.
//!
//! List endpoints accept the same query shape the UI filter bars produce:
//! every select defaults to `"all"` and every text/date input to `""`.
//! Both sentinels deserialize to `None`, meaning "no constraint". Free-text
//! search only treats `""` that way.

use chrono::NaiveDate;
use serde::de::{value::StrDeserializer, DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

/// Sentinel emitted by select inputs for "no constraint"
pub const ALL_SENTINEL: &str = "all";

/// Deserialize an optional filter value, mapping `""` and `"all"` to `None`.
///
/// Use with `#[serde(default, deserialize_with = "sentinel_as_none")]`.
pub fn sentinel_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some(ALL_SENTINEL) => Ok(None),
        Some(value) => {
            T::deserialize(StrDeserializer::<serde::de::value::Error>::new(value))
                .map(Some)
                .map_err(D::Error::custom)
        }
    }
}

/// Deserialize a free-text filter, mapping only `""` to `None`.
///
/// Unlike [`sentinel_as_none`], `"all"` is a real search term here.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

/// Case-insensitive substring search over several optional fields.
///
/// An absent needle matches everything; absent haystacks never match.
pub fn matches_search(needle: Option<&str>, haystacks: &[Option<&str>]) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Equality against an optional filter value; `None` matches everything
pub fn matches_value<T: PartialEq>(filter: Option<&T>, value: &T) -> bool {
    filter.map_or(true, |expected| expected == value)
}

/// Inclusive day range with open ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Like [`contains`](Self::contains), but an undated item always passes
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        date.map_or(true, |d| self.contains(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum Colour {
        Red,
        DarkBlue,
    }

    #[derive(Debug, Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "sentinel_as_none")]
        colour: Option<Colour>,
        #[serde(default, deserialize_with = "sentinel_as_none")]
        from: Option<NaiveDate>,
        #[serde(default, deserialize_with = "empty_as_none")]
        search: Option<String>,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sentinels_deserialize_to_none() {
        let query: Query = serde_json::from_str(r#"{"colour":"all","from":""}"#).unwrap();
        assert!(query.colour.is_none());
        assert!(query.from.is_none());

        let query: Query = serde_json::from_str("{}").unwrap();
        assert!(query.colour.is_none());
    }

    #[test]
    fn test_concrete_values_deserialize() {
        let query: Query =
            serde_json::from_str(r#"{"colour":"dark_blue","from":"2024-03-01"}"#).unwrap();
        assert_eq!(query.colour, Some(Colour::DarkBlue));
        assert_eq!(query.from, Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_search_keeps_select_sentinel_as_text() {
        let query: Query = serde_json::from_str(r#"{"search":"all"}"#).unwrap();
        assert_eq!(query.search.as_deref(), Some("all"));

        let query: Query = serde_json::from_str(r#"{"search":" all "}"#).unwrap();
        assert_eq!(query.search.as_deref(), Some(" all "));

        let query: Query = serde_json::from_str(r#"{"search":""}"#).unwrap();
        assert!(query.search.is_none());
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let result: Result<Query, _> = serde_json::from_str(r#"{"colour":"green"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        assert!(matches_search(Some("ÉCOLE"), &[Some("école Jules Ferry")]));
        assert!(matches_search(Some("ferry"), &[None, Some("École Jules Ferry")]));
        assert!(!matches_search(Some("lycée"), &[Some("École"), None]));
        assert!(matches_search(None, &[]));
    }

    #[test]
    fn test_matches_value() {
        assert!(matches_value(None, &Colour::Red));
        assert!(matches_value(Some(&Colour::Red), &Colour::Red));
        assert!(!matches_value(Some(&Colour::DarkBlue), &Colour::Red));
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));
        assert!(range.contains(date(2024, 1, 10)));
        assert!(range.contains(date(2024, 1, 20)));
        assert!(!range.contains(date(2024, 1, 9)));
        assert!(!range.contains(date(2024, 1, 21)));
    }

    #[test]
    fn test_date_range_open_ends() {
        let from_only = DateRange::new(Some(date(2024, 1, 10)), None);
        assert!(from_only.contains(date(2030, 1, 1)));
        assert!(!from_only.contains(date(2024, 1, 1)));
        assert!(DateRange::default().contains(date(1999, 12, 31)));
    }

    #[test]
    fn test_admits_lets_undated_items_through() {
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));
        assert!(range.admits(None));
        assert!(!range.admits(Some(date(2024, 2, 1))));
    }
}

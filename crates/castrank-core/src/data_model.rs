//! Data Model: people, filmography candidates and enriched movie records
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::ids::{PersonId, TitleId};

/// One row of a person search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonHit {
    pub id: PersonId,
    /// Providers occasionally return rows without a display name
    pub name: Option<String>,
    /// Headshot, when the provider returned one with the search row
    pub image_url: Option<String>,
}

/// The person whose filmography is being built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: PersonId,
    pub name: String,
    pub image_url: Option<String>,
}

impl PersonHit {
    /// Promote the row to the resolved person. A row without a name takes
    /// `fallback_name` (the search query) instead.
    pub fn into_person(self, fallback_name: &str) -> PersonRef {
        PersonRef {
            id: self.id,
            name: self.name.unwrap_or_else(|| fallback_name.trim().to_string()),
            image_url: self.image_url,
        }
    }
}

/// Information sets that `get_person` can be asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonSection {
    /// Credits in the listed role categories ("actor", "self", ...)
    Filmography(Vec<String>),
}

impl PersonSection {
    pub fn filmography<S: AsRef<str>>(categories: &[S]) -> Self {
        Self::Filmography(categories.iter().map(|c| c.as_ref().to_string()).collect())
    }

    /// Role categories of the first filmography request in `sections`
    pub fn requested_categories(sections: &[PersonSection]) -> Option<&[String]> {
        sections.iter().find_map(|section| match section {
            Self::Filmography(categories) => Some(categories.as_slice()),
        })
    }
}

/// Lightweight title reference taken from a filmography section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmographyEntry {
    pub title_id: TitleId,
    /// Title as listed in the filmography; used when the detail fetch has none
    pub title_hint: String,
}

/// Filmography grouped by role section ("actor", "actress", "self", ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filmography {
    sections: BTreeMap<String, Vec<FilmographyEntry>>,
}

impl Filmography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a section, keeping provider order
    pub fn push(&mut self, section: impl Into<String>, entry: FilmographyEntry) {
        self.sections.entry(section.into()).or_default().push(entry);
    }

    pub fn with_section(
        mut self,
        section: impl Into<String>,
        entries: Vec<FilmographyEntry>,
    ) -> Self {
        self.sections.insert(section.into(), entries);
        self
    }

    /// Entries of one section; absent sections read as empty
    pub fn section(&self, name: &str) -> &[FilmographyEntry] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Per-section entry counts, used in diagnostics
    pub fn section_counts(&self) -> BTreeMap<&str, usize> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.len()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }
}

/// Answer to `get_person`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetail {
    pub id: PersonId,
    pub name: Option<String>,
    pub image_url: Option<String>,
    /// Empty unless `PersonSection::Filmography` was requested
    #[serde(default)]
    pub filmography: Filmography,
}

/// Answer to `get_movie`; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub votes: Option<u64>,
}

impl MovieDetail {
    /// Lenient reader for a flat `{title, year, rating, votes}` object.
    ///
    /// Providers disagree on number formats: ratings arrive as floats or
    /// strings, vote counts as integers, floats or "1,234" strings, years
    /// as integers or "1994–1998" ranges. Unreadable values count as absent.
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: value
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string),
            year: value.get("year").and_then(coerce_year),
            rating: value.get("rating").and_then(coerce_rating),
            votes: value.get("votes").and_then(coerce_votes),
        }
    }
}

fn coerce_rating(value: &Value) -> Option<f64> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    rating.is_finite().then_some(rating)
}

fn coerce_votes(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|v| v.max(0) as u64))
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.max(0.0) as u64)),
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    }
}

fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<i32>().ok()
        }
        _ => None,
    }
}

/// Deduplicated, length-bounded list of candidates.
///
/// No two entries share a `title_id`, the first occurrence wins, and the
/// set never holds more than the cap it was collected with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateSet {
    entries: Vec<FilmographyEntry>,
}

impl CandidateSet {
    /// Scan `entries` in order, dropping repeated ids and stopping once
    /// `cap` unique entries are held. Entries past that point are never read.
    pub fn collect<'a, I>(entries: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = &'a FilmographyEntry>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for entry in entries {
            if kept.len() >= cap {
                break;
            }
            if seen.insert(entry.title_id.clone()) {
                kept.push(entry.clone());
            }
        }

        Self { entries: kept }
    }

    pub fn entries(&self) -> &[FilmographyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for CandidateSet {
    type Item = FilmographyEntry;
    type IntoIter = std::vec::IntoIter<FilmographyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A candidate that survived detail fetch and the inclusion gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: Option<i32>,
    pub rating: f64,
    pub votes: u64,
    pub title_id: TitleId,
}

/// Why a candidate did not become a `MovieRecord`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    FetchFailed(String),
    MissingRating,
    MissingYear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTitle {
    pub title_id: TitleId,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Final aggregation: movies sorted by votes, descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub person_id: PersonId,
    pub person_name: String,
    pub movies: Vec<MovieRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, title: &str) -> FilmographyEntry {
        FilmographyEntry {
            title_id: TitleId::parse(id).unwrap(),
            title_hint: title.to_string(),
        }
    }

    #[test]
    fn test_collect_keeps_first_occurrence() {
        let entries = vec![
            entry("tt0000001", "A"),
            entry("tt0000002", "B"),
            entry("tt0000001", "A (again)"),
            entry("tt0000003", "C"),
        ];
        let set = CandidateSet::collect(&entries, 50);
        let ids: Vec<String> = set.entries().iter().map(|e| e.title_id.to_string()).collect();
        assert_eq!(ids, vec!["tt0000001", "tt0000002", "tt0000003"]);
        assert_eq!(set.entries()[0].title_hint, "A");
    }

    #[test]
    fn test_collect_truncates_at_cap() {
        let entries: Vec<_> = (0..60)
            .map(|i| entry(&format!("tt{:07}", i), "t"))
            .collect();
        assert_eq!(CandidateSet::collect(&entries, 50).len(), 50);
        assert!(CandidateSet::collect(&entries, 0).is_empty());
    }

    #[test]
    fn test_duplicates_do_not_count_toward_cap() {
        let entries = vec![
            entry("tt0000001", "A"),
            entry("tt0000001", "A"),
            entry("tt0000001", "A"),
            entry("tt0000002", "B"),
        ];
        assert_eq!(CandidateSet::collect(&entries, 2).len(), 2);
    }

    #[test]
    fn test_filmography_missing_section_is_empty() {
        let film = Filmography::new().with_section("actor", vec![entry("tt0000001", "A")]);
        assert_eq!(film.section("actor").len(), 1);
        assert!(film.section("self").is_empty());
        assert!(!film.is_empty());
        assert!(Filmography::new().with_section("actor", vec![]).is_empty());
    }

    #[test]
    fn test_movie_detail_coercion() {
        let detail = MovieDetail::from_value(&json!({
            "title": "Inception",
            "year": "2010",
            "rating": "8.8",
            "votes": "2,512,345"
        }));
        assert_eq!(detail.title.as_deref(), Some("Inception"));
        assert_eq!(detail.year, Some(2010));
        assert_eq!(detail.rating, Some(8.8));
        assert_eq!(detail.votes, Some(2_512_345));
    }

    #[test]
    fn test_movie_detail_absent_and_odd_fields() {
        let detail = MovieDetail::from_value(&json!({
            "title": "  ",
            "year": "1994–1998",
            "rating": null,
            "votes": -3
        }));
        assert_eq!(detail.title, None);
        assert_eq!(detail.year, Some(1994));
        assert_eq!(detail.rating, None);
        assert_eq!(detail.votes, Some(0));

        assert_eq!(MovieDetail::from_value(&json!({})), MovieDetail::default());
    }

    #[test]
    fn test_nameless_hit_takes_fallback_name() {
        let hit = PersonHit {
            id: PersonId::parse("nm0000001").unwrap(),
            name: None,
            image_url: None,
        };
        assert_eq!(hit.into_person(" Tom Hanks ").name, "Tom Hanks");
    }

    #[test]
    fn test_requested_categories() {
        let sections = [PersonSection::filmography(&["director", "writer"])];
        assert_eq!(
            PersonSection::requested_categories(&sections),
            Some(&["director".to_string(), "writer".to_string()][..])
        );
        assert_eq!(PersonSection::requested_categories(&[]), None);
    }

    #[test]
    fn test_skipped_title_serializes_flat() {
        let skipped = SkippedTitle {
            title_id: TitleId::parse("tt0000001").unwrap(),
            reason: SkipReason::FetchFailed("HTTP 503: Service Unavailable".into()),
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            json!({
                "title_id": "tt0000001",
                "reason": "fetch_failed",
                "detail": "HTTP 503: Service Unavailable"
            })
        );
    }
}

//! File-backed provider that answers from canned JSON.
//!
//! ```json
//! {
//!   "people": [{ "id": "nm0000138", "name": "Leonardo DiCaprio", "imageUrl": null,
//!                "filmography": { "actor": [{ "id": "tt1375666", "title": "Inception" }] } }],
//!   "searches": { "leo": ["nm0000138"] },
//!   "titles": {
//!     "tt1375666": { "title": "Inception", "year": 2010, "rating": 8.8, "votes": 2600000 }
//!   },
//!   "unavailable": ["tt0000404"]
//! }
//! ```
//!
//! Searches listed under `searches` (keyed by the lowercased query) return
//! those people in that order; other queries match people whose name
//! contains the query. Titles under `unavailable` fail with HTTP 503.
//! `get_person` returns only the filmography categories it was asked for.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use castrank_core::{
    Filmography, FilmographyEntry, MetadataProvider, MovieDetail, PersonDetail, PersonHit,
    PersonId, PersonSection, ProviderError, TitleId,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Vec<SnapshotPerson>,
    #[serde(default)]
    pub searches: BTreeMap<String, Vec<PersonId>>,
    /// Raw title detail, read leniently with `MovieDetail::from_value`
    #[serde(default)]
    pub titles: BTreeMap<String, Value>,
    #[serde(default)]
    pub unavailable: Vec<TitleId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPerson {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub filmography: BTreeMap<String, Vec<SnapshotCredit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotCredit {
    pub id: TitleId,
    #[serde(default)]
    pub title: String,
}

/// One call made against the snapshot, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Search(String),
    Person(PersonId),
    Movie(TitleId),
}

pub struct SnapshotProvider {
    snapshot: Snapshot,
    calls: RefCell<Vec<ProviderCall>>,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        serde_json::from_value(value)
            .map(Self::new)
            .map_err(|e| ProviderError::Decode(format!("invalid snapshot: {e}")))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|e| ProviderError::Decode(format!("invalid snapshot: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Transport(format!("cannot read snapshot {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Calls made so far
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.borrow().clone()
    }

    pub fn movie_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ProviderCall::Movie(_)))
            .count()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.borrow_mut().push(call);
    }

    fn person(&self, id: &PersonId) -> Option<&SnapshotPerson> {
        self.snapshot.people.iter().find(|p| &p.id == id)
    }

    fn hit(person: &SnapshotPerson) -> PersonHit {
        PersonHit {
            id: person.id.clone(),
            name: Some(person.name.clone()),
            image_url: person.image_url.clone(),
        }
    }
}

impl MetadataProvider for SnapshotProvider {
    fn search_person(&self, name: &str) -> Result<Vec<PersonHit>, ProviderError> {
        self.record(ProviderCall::Search(name.to_string()));
        let key = name.trim().to_lowercase();

        if let Some(ids) = self.snapshot.searches.get(&key) {
            return Ok(ids
                .iter()
                .filter_map(|id| self.person(id))
                .map(Self::hit)
                .collect());
        }

        if key.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .snapshot
            .people
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&key))
            .map(Self::hit)
            .collect())
    }

    fn get_person(
        &self,
        id: &PersonId,
        sections: &[PersonSection],
    ) -> Result<PersonDetail, ProviderError> {
        self.record(ProviderCall::Person(id.clone()));
        let person = self
            .person(id)
            .ok_or_else(|| ProviderError::NotFound(format!("No IMDb person {id}")))?;

        let mut filmography = Filmography::new();
        let categories = PersonSection::requested_categories(sections).unwrap_or(&[]);
        for (section, credits) in &person.filmography {
            if !categories.contains(section) {
                continue;
            }
            for credit in credits {
                filmography.push(
                    section.as_str(),
                    FilmographyEntry {
                        title_id: credit.id.clone(),
                        title_hint: credit.title.clone(),
                    },
                );
            }
        }

        Ok(PersonDetail {
            id: person.id.clone(),
            name: Some(person.name.clone()),
            image_url: person.image_url.clone(),
            filmography,
        })
    }

    fn get_movie(&self, id: &TitleId) -> Result<MovieDetail, ProviderError> {
        self.record(ProviderCall::Movie(id.clone()));
        if self.snapshot.unavailable.contains(id) {
            return Err(ProviderError::Status {
                status: 503,
                message: format!("Service Unavailable ({id})"),
            });
        }
        self.snapshot
            .titles
            .get(&id.to_string())
            .map(MovieDetail::from_value)
            .ok_or_else(|| ProviderError::NotFound(format!("No IMDb title {id}")))
    }
}

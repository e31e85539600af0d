//! JSON documents written by the process: one per invocation
use serde::{Deserialize, Serialize};

use crate::data_model::{MovieRecord, PersonHit, PersonRef, ResultPayload};
use crate::error::CastrankError;

/// `{"imdbId": "nm…", "name": "…"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonReport {
    pub imdb_id: String,
    pub name: String,
}

impl From<&PersonRef> for PersonReport {
    fn from(person: &PersonRef) -> Self {
        Self {
            imdb_id: person.id.to_string(),
            name: person.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieReport {
    pub title: String,
    /// Serialized as `null` when unknown
    pub year: Option<i32>,
    pub rating: f64,
    pub votes: u64,
    pub imdb_url: String,
}

impl From<&MovieRecord> for MovieReport {
    fn from(movie: &MovieRecord) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.year,
            rating: movie.rating,
            votes: movie.votes,
            imdb_url: movie.title_id.imdb_url(),
        }
    }
}

/// `{"imdbId", "name", "movies": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    pub imdb_id: String,
    pub name: String,
    pub movies: Vec<MovieReport>,
}

impl From<&ResultPayload> for FullReport {
    fn from(payload: &ResultPayload) -> Self {
        Self {
            imdb_id: payload.person_id.to_string(),
            name: payload.person_name.clone(),
            movies: payload.movies.iter().map(MovieReport::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub imdb_id: String,
    pub name: String,
    pub image_url: Option<String>,
}

/// Listing name for a search row the provider returned without one
pub const UNKNOWN_NAME: &str = "Unknown";

/// `{"results": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub results: Vec<SearchEntry>,
}

impl From<&[PersonHit]> for SearchReport {
    fn from(hits: &[PersonHit]) -> Self {
        Self {
            results: hits
                .iter()
                .map(|hit| SearchEntry {
                    imdb_id: hit.id.to_string(),
                    name: hit
                        .name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    image_url: hit.image_url.clone(),
                })
                .collect(),
        }
    }
}

/// `{"error": "..."}`, written to stderr
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&CastrankError> for ErrorReport {
    fn from(err: &CastrankError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PersonId, TitleId};
    use serde_json::json;

    #[test]
    fn test_full_report_shape() {
        let payload = ResultPayload {
            person_id: PersonId::parse("nm0000138").unwrap(),
            person_name: "Leonardo DiCaprio".into(),
            movies: vec![MovieRecord {
                title: "Untitled Project".into(),
                year: None,
                rating: 7.0,
                votes: 0,
                title_id: TitleId::parse("tt0000001").unwrap(),
            }],
        };

        let json = serde_json::to_string(&FullReport::from(&payload)).unwrap();
        assert_eq!(
            json,
            r#"{"imdbId":"nm0000138","name":"Leonardo DiCaprio","movies":[{"title":"Untitled Project","year":null,"rating":7.0,"votes":0,"imdbUrl":"https://www.imdb.com/title/tt0000001/"}]}"#
        );
    }

    #[test]
    fn test_error_report() {
        let err = CastrankError::InvalidIdentifier("xx12345".into());
        assert_eq!(
            serde_json::to_value(ErrorReport::from(&err)).unwrap(),
            json!({ "error": "Invalid IMDb ID format: xx12345" })
        );
    }

    #[test]
    fn test_search_report_keeps_null_image() {
        let hits = vec![PersonHit {
            id: PersonId::parse("nm0000138").unwrap(),
            name: Some("Leonardo DiCaprio".into()),
            image_url: None,
        }];
        assert_eq!(
            serde_json::to_value(SearchReport::from(hits.as_slice())).unwrap(),
            json!({
                "results": [
                    { "imdbId": "nm0000138", "name": "Leonardo DiCaprio", "imageUrl": null }
                ]
            })
        );
    }

    #[test]
    fn test_search_report_names_nameless_rows() {
        let hits = vec![
            PersonHit {
                id: PersonId::parse("nm0000001").unwrap(),
                name: None,
                image_url: None,
            },
            PersonHit {
                id: PersonId::parse("nm0000002").unwrap(),
                name: Some("Other".into()),
                image_url: None,
            },
        ];
        let report = SearchReport::from(hits.as_slice());
        let names: Vec<_> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Unknown", "Other"]);
        assert_eq!(report.results[0].imdb_id, "nm0000001");
    }
}

//! IMDb adapter: person search through the public suggestion endpoint,
//! filmography and title detail through the GraphQL endpoint.

use std::time::Duration;

use castrank_core::{
    Filmography, FilmographyEntry, MetadataProvider, MovieDetail, PersonDetail, PersonHit,
    PersonId, PersonSection, ProviderError, TitleId,
};
use serde_json::{json, Value};

const SUGGEST_BASE: &str = "https://v3.sg.media-imdb.com/suggestion";
const GRAPHQL_URL: &str = "https://graphql.imdb.com/";

/// Credits requested per person; the collector caps candidates well below this
const CREDITS_PAGE_SIZE: u32 = 250;

const PERSON_QUERY: &str = r#"query PersonFilmography(
  $id: ID!
  $first: Int!
  $categories: [String!]!
  $withCredits: Boolean!
) {
  name(id: $id) {
    nameText { text }
    primaryImage { url }
    credits(first: $first, filter: { categories: $categories }) @include(if: $withCredits) {
      edges { node { category { id } title { id titleText { text } } } }
    }
  }
}"#;

const TITLE_QUERY: &str = r#"query TitleRating($id: ID!) {
  title(id: $id) {
    titleText { text }
    releaseYear { year }
    ratingsSummary { aggregateRating voteCount }
  }
}"#;

/// IMDb provider backed by `ureq`.
pub struct ImdbProvider {
    http_client: ureq::Agent,
    suggest_base: String,
    graphql_url: String,
}

impl Default for ImdbProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ImdbProvider {
    pub fn new() -> Self {
        Self::with_endpoints(SUGGEST_BASE, GRAPHQL_URL)
    }

    /// Point the adapter at other hosts (mirrors, local stubs).
    pub fn with_endpoints(
        suggest_base: impl Into<String>,
        graphql_url: impl Into<String>,
    ) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            http_client,
            suggest_base: suggest_base.into().trim().trim_end_matches('/').to_string(),
            graphql_url: graphql_url.into(),
        }
    }

    fn suggestion_url(&self, query: &str) -> String {
        let query = query.trim().to_lowercase();
        let bucket = query
            .chars()
            .find(char::is_ascii_alphanumeric)
            .unwrap_or('x');
        format!(
            "{}/{}/{}.json",
            self.suggest_base,
            bucket,
            urlencoding::encode(&query)
        )
    }

    fn graphql(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value, ProviderError> {
        let body = json!({
            "operationName": operation,
            "query": query,
            "variables": variables,
        });
        let response = self
            .http_client
            .post(&self.graphql_url)
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|err| request_failed(operation, err))?;
        let parsed: Value = response
            .into_json()
            .map_err(|err| {
                ProviderError::Decode(format!("{operation} response parse failed: {err}"))
            })?;
        graphql_data(parsed)
    }
}

impl MetadataProvider for ImdbProvider {
    fn search_person(&self, name: &str) -> Result<Vec<PersonHit>, ProviderError> {
        let url = self.suggestion_url(name);
        tracing::debug!(%url, "searching people");
        let response = self
            .http_client
            .get(&url)
            .call()
            .map_err(|err| request_failed("search", err))?;
        let parsed: Value = response
            .into_json()
            .map_err(|err| {
                ProviderError::Decode(format!("search response parse failed: {err}"))
            })?;
        Ok(parse_suggestions(&parsed))
    }

    fn get_person(
        &self,
        id: &PersonId,
        sections: &[PersonSection],
    ) -> Result<PersonDetail, ProviderError> {
        let variables = person_variables(id, sections);
        let data = self.graphql("PersonFilmography", PERSON_QUERY, variables)?;
        parse_person(id, &data)
    }

    fn get_movie(&self, id: &TitleId) -> Result<MovieDetail, ProviderError> {
        let data = self.graphql("TitleRating", TITLE_QUERY, json!({ "id": id.to_string() }))?;
        parse_title(id, &data)
    }
}

/// Credits are only requested when a filmography section was asked for,
/// and only in the categories it names.
pub(crate) fn person_variables(id: &PersonId, sections: &[PersonSection]) -> Value {
    let categories = PersonSection::requested_categories(sections);
    json!({
        "id": id.to_string(),
        "first": CREDITS_PAGE_SIZE,
        "categories": categories.unwrap_or(&[]),
        "withCredits": categories.is_some_and(|c| !c.is_empty()),
    })
}

fn request_failed(context: &str, error: ureq::Error) -> ProviderError {
    match error {
        ureq::Error::Status(status, response) => ProviderError::Status {
            status,
            message: format!("{} ({context})", response.status_text()),
        },
        ureq::Error::Transport(transport) => {
            ProviderError::Transport(format!("{context} request failed: {transport}"))
        }
    }
}

/// Unwrap `data`, turning a GraphQL `errors` array into an upstream error
/// when no data came back with it.
fn graphql_data(mut response: Value) -> Result<Value, ProviderError> {
    let data = response.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    if !data.is_null() {
        return Ok(data);
    }
    let messages: Vec<&str> = response
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if messages.is_empty() {
        Err(ProviderError::Upstream("IMDb returned no data".to_string()))
    } else {
        Err(ProviderError::Upstream(messages.join("; ")))
    }
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Person rows of a suggestion response, in response order. Title rows and
/// rows without a person id are dropped; a missing name is kept as `None`.
pub(crate) fn parse_suggestions(response: &Value) -> Vec<PersonHit> {
    response
        .get("d")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let id = PersonId::parse(row.get("id")?.as_str()?).ok()?;
                    Some(PersonHit {
                        id,
                        name: text_at(row, "/l").map(str::to_string),
                        image_url: text_at(row, "/i/imageUrl").map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_person(id: &PersonId, data: &Value) -> Result<PersonDetail, ProviderError> {
    let name = match data.get("name") {
        Some(name) if !name.is_null() => name,
        _ => return Err(ProviderError::NotFound(format!("No IMDb person {id}"))),
    };

    let mut filmography = Filmography::new();
    let edges = name
        .pointer("/credits/edges")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    for edge in edges {
        let Some(category) = text_at(edge, "/node/category/id") else {
            continue;
        };
        let title_id = text_at(edge, "/node/title/id").and_then(|raw| TitleId::parse(raw).ok());
        let Some(title_id) = title_id else {
            continue;
        };
        let title_hint = text_at(edge, "/node/title/titleText/text")
            .unwrap_or_default()
            .to_string();
        filmography.push(category, FilmographyEntry { title_id, title_hint });
    }

    Ok(PersonDetail {
        id: id.clone(),
        name: text_at(name, "/nameText/text").map(str::to_string),
        image_url: text_at(name, "/primaryImage/url").map(str::to_string),
        filmography,
    })
}

pub(crate) fn parse_title(id: &TitleId, data: &Value) -> Result<MovieDetail, ProviderError> {
    let title = match data.get("title") {
        Some(title) if !title.is_null() => title,
        _ => return Err(ProviderError::NotFound(format!("No IMDb title {id}"))),
    };
    let flat = json!({
        "title": title.pointer("/titleText/text"),
        "year": title.pointer("/releaseYear/year"),
        "rating": title.pointer("/ratingsSummary/aggregateRating"),
        "votes": title.pointer("/ratingsSummary/voteCount"),
    });
    Ok(MovieDetail::from_value(&flat))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leo() -> PersonId {
        PersonId::parse("nm0000138").unwrap()
    }

    #[test]
    fn test_suggestion_url() {
        let provider =
            ImdbProvider::with_endpoints("http://localhost:9/suggestion/", "http://localhost:9/");
        assert_eq!(
            provider.suggestion_url(" Leonardo DiCaprio "),
            "http://localhost:9/suggestion/l/leonardo%20dicaprio.json"
        );
        assert_eq!(
            provider.suggestion_url("ßeta"),
            "http://localhost:9/suggestion/e/%C3%9Feta.json"
        );
    }

    #[test]
    fn test_person_variables_follow_requested_categories() {
        let sections = [PersonSection::filmography(&["director"])];
        let variables = person_variables(&leo(), &sections);
        assert_eq!(variables["id"], "nm0000138");
        assert_eq!(variables["categories"], json!(["director"]));
        assert_eq!(variables["withCredits"], true);

        let sections = [PersonSection::filmography(&["self", "actor"])];
        let variables = person_variables(&leo(), &sections);
        assert_eq!(variables["categories"], json!(["self", "actor"]));
    }

    #[test]
    fn test_person_variables_without_filmography() {
        let variables = person_variables(&leo(), &[]);
        assert_eq!(variables["categories"], json!([]));
        assert_eq!(variables["withCredits"], false);
    }

    #[test]
    fn test_parse_suggestions_keeps_people_only() {
        let response = json!({
            "d": [
                {
                    "id": "nm0000138",
                    "l": "Leonardo DiCaprio",
                    "i": { "imageUrl": "https://m.media-amazon.com/leo.jpg" }
                },
                { "id": "tt0120338", "l": "Titanic" },
                { "id": "nm3325036", "l": "Leonardo DiCaprio's stunt double" }
            ]
        });
        let hits = parse_suggestions(&response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id.to_string(), "nm0000138");
        assert_eq!(
            hits[0].image_url.as_deref(),
            Some("https://m.media-amazon.com/leo.jpg")
        );
        assert_eq!(hits[1].image_url, None);
        assert!(parse_suggestions(&json!({})).is_empty());
    }

    #[test]
    fn test_parse_suggestions_keeps_nameless_rows_in_place() {
        let response = json!({
            "d": [
                { "id": "nm0000001" },
                { "id": "nm0000002", "l": "Other" }
            ]
        });
        let hits = parse_suggestions(&response);
        let ids: Vec<_> = hits.iter().map(|h| h.id.to_string()).collect();
        assert_eq!(ids, vec!["nm0000001", "nm0000002"]);
        assert_eq!(hits[0].name, None);
        assert_eq!(hits[1].name.as_deref(), Some("Other"));
    }

    #[test]
    fn test_parse_person_groups_credits_by_category() {
        let credit = |category: &str, id: &str, title: &str| {
            json!({
                "node": {
                    "category": { "id": category },
                    "title": { "id": id, "titleText": { "text": title } }
                }
            })
        };
        let data = json!({
            "name": {
                "nameText": { "text": "Leonardo DiCaprio" },
                "primaryImage": null,
                "credits": { "edges": [
                    credit("actor", "tt1375666", "Inception"),
                    credit("self", "tt5000000", "Before the Flood"),
                    credit("actor", "tt0120338", "Titanic"),
                    credit("actor", "bogus", "Broken"),
                ] }
            }
        });
        let detail = parse_person(&leo(), &data).unwrap();
        assert_eq!(detail.name.as_deref(), Some("Leonardo DiCaprio"));
        assert_eq!(detail.image_url, None);
        let actor: Vec<_> = detail
            .filmography
            .section("actor")
            .iter()
            .map(|e| e.title_hint.as_str())
            .collect();
        assert_eq!(actor, vec!["Inception", "Titanic"]);
        assert_eq!(detail.filmography.section("self").len(), 1);
    }

    #[test]
    fn test_parse_person_without_credits() {
        let data = json!({ "name": { "nameText": { "text": "Leo" } } });
        let detail = parse_person(&leo(), &data).unwrap();
        assert!(detail.filmography.is_empty());

        let missing = parse_person(&leo(), &json!({ "name": null }));
        assert!(matches!(missing, Err(ProviderError::NotFound(_))));
    }

    #[test]
    fn test_parse_title() {
        let id = TitleId::parse("tt1375666").unwrap();
        let data = json!({
            "title": {
                "titleText": { "text": "Inception" },
                "releaseYear": { "year": 2010 },
                "ratingsSummary": { "aggregateRating": 8.8, "voteCount": 2600000 }
            }
        });
        assert_eq!(
            parse_title(&id, &data).unwrap(),
            MovieDetail {
                title: Some("Inception".into()),
                year: Some(2010),
                rating: Some(8.8),
                votes: Some(2_600_000),
            }
        );

        let unrated = json!({
            "title": {
                "titleText": { "text": "Untitled" },
                "releaseYear": null,
                "ratingsSummary": { "aggregateRating": null, "voteCount": 0 }
            }
        });
        let detail = parse_title(&id, &unrated).unwrap();
        assert_eq!(detail.rating, None);
        assert_eq!(detail.year, None);
    }

    #[test]
    fn test_graphql_errors_surface_verbatim() {
        let response = json!({
            "errors": [{ "message": "rate limited" }, { "message": "try later" }],
            "data": null
        });
        let err = graphql_data(response).unwrap_err();
        assert_eq!(err.to_string(), "rate limited; try later");
        assert!(graphql_data(json!({ "data": { "title": null } })).is_ok());
    }
}

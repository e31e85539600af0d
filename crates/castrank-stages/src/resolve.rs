use castrank_core::ids::looks_like_identifier;
use castrank_core::{
    CastrankError, ExecutionContext, MetadataProvider, PersonHit, PersonId, PersonRef, Stage,
};
use serde::{Deserialize, Serialize};

pub const USAGE: &str = "Usage: castrank 'Actor Name' | nm1234567";

/// What the caller asked for: a name to search, or a known identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Name(String),
    Id(PersonId),
}

impl Query {
    /// Identifier-shaped arguments (two letters + digits) are validated as
    /// person ids, so `xx12345` is rejected instead of being searched.
    pub fn classify(raw: &str) -> Result<Self, CastrankError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CastrankError::Usage(USAGE.to_string()));
        }
        if looks_like_identifier(trimmed) {
            return PersonId::parse(trimmed).map(Query::Id);
        }
        Ok(Query::Name(raw.to_string()))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First hit whose name equals the query after trimming and case-folding,
/// else the first hit. `None` only for an empty list.
pub fn pick_person<'a>(hits: &'a [PersonHit], query: &str) -> Option<&'a PersonHit> {
    let wanted = normalize_name(query);
    hits.iter()
        .find(|hit| hit.name.as_deref().is_some_and(|name| normalize_name(name) == wanted))
        .or_else(|| hits.first())
}

pub struct ResolveStage<'p> {
    provider: &'p dyn MetadataProvider,
}

impl<'p> ResolveStage<'p> {
    pub fn new(provider: &'p dyn MetadataProvider) -> Self {
        Self { provider }
    }

    fn resolve_name(&self, query: &str) -> Result<PersonRef, CastrankError> {
        let hits = self.provider.search_person(query)?;
        tracing::debug!(query, hits = hits.len(), "person search returned");

        let person = pick_person(&hits, query)
            .ok_or_else(|| CastrankError::NotFound(query.to_string()))?;
        Ok(person.clone().into_person(query))
    }

    /// Fast path: no search call, one person lookup for the display name
    fn resolve_id(&self, id: &PersonId) -> Result<PersonRef, CastrankError> {
        let detail = self.provider.get_person(id, &[])?;
        let name = detail
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.to_string());
        Ok(PersonRef {
            id: id.clone(),
            name,
            image_url: detail.image_url,
        })
    }
}

impl Stage for ResolveStage<'_> {
    type Input = Query;
    type Output = PersonRef;

    fn id(&self) -> &'static str {
        "resolve.person.v1"
    }

    fn run(&self, input: Query, _ctx: &ExecutionContext) -> Result<PersonRef, CastrankError> {
        let person = match &input {
            Query::Name(name) => self.resolve_name(name)?,
            Query::Id(id) => self.resolve_id(id)?,
        };
        tracing::info!(person_id = %person.id, name = %person.name, "person resolved");
        Ok(person)
    }
}

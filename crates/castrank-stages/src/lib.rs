//! castrank stages: the four steps from an actor query to ranked movies.
//!
//! # Pipeline Flow
//!
//! ```text
//! Query → Resolve → Collect → Enrich → Rank → ResultPayload
//!           ↓          ↓         ↓        ↓
//!       PersonRef  Candidates  Movies   Sorted
//! ```
//!
//! Every stage that talks to the provider borrows it for the length of the
//! run; nothing is cached between stages or between runs.

mod collect;
mod enrich;
mod rank;
mod resolve;

pub use collect::CollectStage;
pub use enrich::{EnrichReport, EnrichStage};
pub use rank::{rank, RankInput, RankStage};
pub use resolve::{pick_person, Query, ResolveStage, USAGE};

use castrank_core::{
    CastrankError, ExecutionContext, MetadataProvider, PersonHit, PersonRef, ResultPayload,
    SkippedTitle, StageTrace,
};

/// Everything a full run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub payload: ResultPayload,
    /// Candidates left out of `payload`, with the reason
    pub skipped: Vec<SkippedTitle>,
    pub traces: Vec<StageTrace>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Resolve → Collect → Enrich → Rank
pub fn run_full(
    provider: &dyn MetadataProvider,
    query: Query,
    ctx: &ExecutionContext,
) -> Result<PipelineOutput, CastrankError> {
    let span = tracing::info_span!("pipeline", run_id = %ctx.run_id, mode = "full");
    let _guard = span.enter();

    let mut runner = castrank_core::PipelineRunner::new();
    let person = runner.step(&ResolveStage::new(provider), query, ctx)?;
    let candidates = runner.step(&CollectStage::new(provider), person.id.clone(), ctx)?;
    let enriched = runner.step(&EnrichStage::new(provider), candidates, ctx)?;
    let payload = runner.step(
        &RankStage,
        RankInput {
            person,
            movies: enriched.movies,
        },
        ctx,
    )?;

    tracing::info!(
        pipeline = %runner.pipeline_id(),
        movies = payload.movies.len(),
        skipped = enriched.skipped.len(),
        "pipeline finished"
    );

    Ok(PipelineOutput {
        payload,
        skipped: enriched.skipped,
        traces: runner.into_traces(),
    })
}

/// Resolve only
pub fn run_person(
    provider: &dyn MetadataProvider,
    query: Query,
    ctx: &ExecutionContext,
) -> Result<PersonRef, CastrankError> {
    let span = tracing::info_span!("pipeline", run_id = %ctx.run_id, mode = "person");
    let _guard = span.enter();

    let mut runner = castrank_core::PipelineRunner::new();
    runner.step(&ResolveStage::new(provider), query, ctx)
}

/// Raw search rows, capped at `search_limit`, in provider order
pub fn run_search(
    provider: &dyn MetadataProvider,
    query: &str,
    ctx: &ExecutionContext,
) -> Result<Vec<PersonHit>, CastrankError> {
    let span = tracing::info_span!("pipeline", run_id = %ctx.run_id, mode = "search");
    let _guard = span.enter();

    if query.trim().is_empty() {
        return Err(CastrankError::Usage(USAGE.to_string()));
    }

    let mut hits = provider.search_person(query)?;
    if hits.is_empty() {
        return Err(CastrankError::NotFound(query.to_string()));
    }
    hits.truncate(ctx.config.search_limit);

    tracing::info!(results = hits.len(), "search finished");
    Ok(hits)
}

use castrank_core::{
    CandidateSet, CastrankError, ExecutionContext, FilmographyEntry, MetadataProvider,
    MovieRecord, SkipReason, SkippedTitle, Stage, YearPolicy,
};
use serde::Serialize;

/// Enriched movies in candidate order, plus every candidate that was dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichReport {
    pub movies: Vec<MovieRecord>,
    pub skipped: Vec<SkippedTitle>,
}

/// Fetches detail for each candidate, one at a time.
///
/// A failed fetch only costs that title: it is recorded as
/// `SkipReason::FetchFailed` and the batch moves on.
pub struct EnrichStage<'p> {
    provider: &'p dyn MetadataProvider,
}

impl<'p> EnrichStage<'p> {
    pub fn new(provider: &'p dyn MetadataProvider) -> Self {
        Self { provider }
    }

    fn enrich_one(
        &self,
        candidate: &FilmographyEntry,
        year_policy: YearPolicy,
    ) -> Result<MovieRecord, SkipReason> {
        let detail = self
            .provider
            .get_movie(&candidate.title_id)
            .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;

        let rating = detail.rating.ok_or(SkipReason::MissingRating)?;
        if year_policy == YearPolicy::Required && detail.year.is_none() {
            return Err(SkipReason::MissingYear);
        }

        Ok(MovieRecord {
            title: detail
                .title
                .unwrap_or_else(|| candidate.title_hint.clone()),
            year: detail.year,
            rating,
            votes: detail.votes.unwrap_or(0),
            title_id: candidate.title_id.clone(),
        })
    }
}

impl Stage for EnrichStage<'_> {
    type Input = CandidateSet;
    type Output = EnrichReport;

    fn id(&self) -> &'static str {
        "enrich.titles.v1"
    }

    fn output_len(&self, output: &EnrichReport) -> Option<usize> {
        Some(output.movies.len())
    }

    fn run(
        &self,
        input: CandidateSet,
        ctx: &ExecutionContext,
    ) -> Result<EnrichReport, CastrankError> {
        let mut report = EnrichReport::default();
        let total = input.len();

        for (index, candidate) in input.into_iter().enumerate() {
            match self.enrich_one(&candidate, ctx.config.year_policy) {
                Ok(movie) => {
                    tracing::debug!(
                        progress = index + 1,
                        total,
                        title_id = %movie.title_id,
                        votes = movie.votes,
                        "title enriched"
                    );
                    report.movies.push(movie);
                }
                Err(reason) => {
                    tracing::debug!(
                        progress = index + 1,
                        total,
                        title_id = %candidate.title_id,
                        reason = ?reason,
                        "title skipped"
                    );
                    report.skipped.push(SkippedTitle {
                        title_id: candidate.title_id,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            kept = report.movies.len(),
            skipped = report.skipped.len(),
            "enrichment finished"
        );
        Ok(report)
    }
}

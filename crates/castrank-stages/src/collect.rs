use castrank_core::{
    CandidateSet, CastrankError, ExecutionContext, MetadataProvider, PersonId, PersonSection,
    Stage,
};

/// Reads the configured filmography sections in priority order and keeps
/// the first `candidate_cap` unique titles.
pub struct CollectStage<'p> {
    provider: &'p dyn MetadataProvider,
}

impl<'p> CollectStage<'p> {
    pub fn new(provider: &'p dyn MetadataProvider) -> Self {
        Self { provider }
    }
}

impl Stage for CollectStage<'_> {
    type Input = PersonId;
    type Output = CandidateSet;

    fn id(&self) -> &'static str {
        "collect.filmography.v1"
    }

    fn output_len(&self, output: &CandidateSet) -> Option<usize> {
        Some(output.len())
    }

    fn run(&self, input: PersonId, ctx: &ExecutionContext) -> Result<CandidateSet, CastrankError> {
        let request = [PersonSection::filmography(ctx.config.sections.as_slice())];
        let detail = self.provider.get_person(&input, &request)?;
        let filmography = &detail.filmography;
        tracing::debug!(
            person_id = %input,
            sections = ?filmography.section_counts(),
            "filmography fetched"
        );

        let entries = ctx
            .config
            .sections
            .iter()
            .flat_map(|section| filmography.section(section).iter());
        let candidates = CandidateSet::collect(entries, ctx.config.candidate_cap);

        tracing::info!(
            person_id = %input,
            candidates = candidates.len(),
            cap = ctx.config.candidate_cap,
            "candidates collected"
        );
        Ok(candidates)
    }
}

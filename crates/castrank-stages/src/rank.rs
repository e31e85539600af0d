use castrank_core::{CastrankError, ExecutionContext, MovieRecord, PersonRef, ResultPayload, Stage};

/// Sort by votes, most first. `sort_by` is stable, so equal vote counts
/// keep the order the enricher produced.
pub fn rank(mut movies: Vec<MovieRecord>) -> Vec<MovieRecord> {
    movies.sort_by(|a, b| b.votes.cmp(&a.votes));
    movies
}

#[derive(Debug, Clone)]
pub struct RankInput {
    pub person: PersonRef,
    pub movies: Vec<MovieRecord>,
}

#[derive(Default)]
pub struct RankStage;

impl Stage for RankStage {
    type Input = RankInput;
    type Output = ResultPayload;

    fn id(&self) -> &'static str {
        "rank.votes.v1"
    }

    fn output_len(&self, output: &ResultPayload) -> Option<usize> {
        Some(output.movies.len())
    }

    fn run(
        &self,
        input: RankInput,
        _ctx: &ExecutionContext,
    ) -> Result<ResultPayload, CastrankError> {
        Ok(ResultPayload {
            person_id: input.person.id,
            person_name: input.person.name,
            movies: rank(input.movies),
        })
    }
}

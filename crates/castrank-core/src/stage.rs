//! Stage Trait: the single contract every pipeline stage implements
use serde::Serialize;

use crate::context::ExecutionContext;
use crate::error::CastrankError;

pub trait Stage {
    type Input;
    type Output: Serialize;

    /// Unique stage id (e.g., "collect.filmography.v1")
    fn id(&self) -> &'static str;

    /// Same input and same provider answers give the same output (default: true)
    fn deterministic(&self) -> bool {
        true
    }

    /// Item count reported in the stage trace, when the output is a collection
    fn output_len(&self, _output: &Self::Output) -> Option<usize> {
        None
    }

    fn run(
        &self,
        input: Self::Input,
        ctx: &ExecutionContext,
    ) -> Result<Self::Output, CastrankError>;
}

//! Execution Context: per-invocation state handed to every stage
use crate::config::PipelineConfig;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Correlates the diagnostics of one invocation
    pub run_id: String,
    pub config: PipelineConfig,
}

impl ExecutionContext {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            config,
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

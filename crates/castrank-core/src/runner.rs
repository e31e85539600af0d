//! Pipeline Runner: chains stages and records a trace for each one
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::context::ExecutionContext;
use crate::error::CastrankError;
use crate::stage::Stage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    pub id: String,
    /// blake3 digest of the serialized stage output
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_ms: u64,
    pub items: Option<usize>,
}

#[derive(Debug, Default)]
pub struct PipelineRunner {
    traces: Vec<StageTrace>,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one stage. A failing stage aborts the pipeline; the caller
    /// propagates its error with `?`.
    pub fn step<S: Stage>(
        &mut self,
        stage: &S,
        input: S::Input,
        ctx: &ExecutionContext,
    ) -> Result<S::Output, CastrankError> {
        let start = Instant::now();

        let output = stage.run(input, ctx).map_err(|e| {
            tracing::debug!(stage = stage.id(), kind = e.kind(), error = %e, "stage failed");
            e
        })?;

        let trace = StageTrace {
            id: stage.id().to_string(),
            out_hash: hash_output(&output),
            deterministic: stage.deterministic(),
            latency_ms: start.elapsed().as_millis() as u64,
            items: stage.output_len(&output),
        };
        tracing::debug!(
            stage = %trace.id,
            latency_ms = trace.latency_ms,
            items = ?trace.items,
            out_hash = %trace.out_hash,
            "stage complete"
        );
        self.traces.push(trace);

        Ok(output)
    }

    /// Stage ids joined in execution order (e.g., "resolve→collect→enrich→rank")
    pub fn pipeline_id(&self) -> String {
        self.traces
            .iter()
            .map(|t| t.id.split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→")
    }

    pub fn traces(&self) -> &[StageTrace] {
        &self.traces
    }

    pub fn into_traces(self) -> Vec<StageTrace> {
        self.traces
    }
}

fn hash_output<T: Serialize>(output: &T) -> String {
    match serde_json::to_vec(output) {
        Ok(bytes) => format!("blake3:{}", blake3::hash(&bytes)),
        Err(_) => "blake3:unavailable".to_string(),
    }
}

//! castrank core: data model, provider contract and stage runner.
//!
//! Stages share one contract (`Stage`) and are chained by the
//! `PipelineRunner`, which records a trace per executed stage. The provider
//! is always passed in explicitly so tests can substitute a fake.

pub mod config;
pub mod context;
pub mod data_model;
pub mod error;
pub mod ids;
pub mod provider;
pub mod report;
pub mod runner;
pub mod stage;

pub use config::{ConfigOverrides, PipelineConfig, YearPolicy};
pub use context::ExecutionContext;
pub use data_model::{
    CandidateSet, Filmography, FilmographyEntry, MovieDetail, MovieRecord, PersonDetail,
    PersonHit, PersonRef, PersonSection, ResultPayload, SkipReason, SkippedTitle,
};
pub use error::{CastrankError, ProviderError};
pub use ids::{PersonId, TitleId};
pub use provider::MetadataProvider;
pub use report::{
    ErrorReport, FullReport, MovieReport, PersonReport, SearchEntry, SearchReport, UNKNOWN_NAME,
};
pub use runner::{PipelineRunner, StageTrace};
pub use stage::Stage;

/// Engine version reported in diagnostics
pub const CASTRANK_VERSION: &str = env!("CARGO_PKG_VERSION");

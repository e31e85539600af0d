//! Pipeline configuration and its named presets
//!
//! Three presets mirror the ways the aggregation has been run:
//! `full` (cap 50, year optional), `strict` (cap 50, year required) and
//! `preview` (cap 12, year optional). A YAML file can override any field.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CastrankError;

/// Sampling ceiling of the full aggregation
pub const DEFAULT_CANDIDATE_CAP: usize = 50;

/// Sampling ceiling of the quick preview run
pub const PREVIEW_CANDIDATE_CAP: usize = 12;

/// Maximum rows returned by a search-only run
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Role sections read by the collector, in priority order
pub const DEFAULT_SECTIONS: [&str; 3] = ["actor", "actress", "self"];

/// Whether a missing release year excludes a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearPolicy {
    /// Keep titles without a year; `year` serializes as `null`
    #[default]
    Optional,
    /// Drop titles without a year
    Required,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Preset name (e.g., "full", "strict", "preview")
    pub profile: String,

    /// Maximum number of unique candidates enriched per run
    pub candidate_cap: usize,

    pub year_policy: YearPolicy,

    /// Filmography sections to read, highest priority first
    pub sections: Vec<String>,

    /// Rows kept by a search-only run
    pub search_limit: usize,

    /// Emit line-delimited JSON diagnostics on stderr
    pub diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl PipelineConfig {
    /// Every rated title, year optional
    pub fn full() -> Self {
        Self {
            profile: "full".to_string(),
            candidate_cap: DEFAULT_CANDIDATE_CAP,
            year_policy: YearPolicy::Optional,
            sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            diagnostics: false,
        }
    }

    /// Rated titles with a known release year only
    pub fn strict() -> Self {
        Self {
            profile: "strict".to_string(),
            year_policy: YearPolicy::Required,
            ..Self::full()
        }
    }

    /// Small sample for a quick look at a filmography
    pub fn preview() -> Self {
        Self {
            profile: "preview".to_string(),
            candidate_cap: PREVIEW_CANDIDATE_CAP,
            ..Self::full()
        }
    }

    /// Look up a preset by name
    pub fn for_profile(name: &str) -> Result<Self, CastrankError> {
        match name.trim().to_lowercase().as_str() {
            "full" => Ok(Self::full()),
            "strict" => Ok(Self::strict()),
            "preview" => Ok(Self::preview()),
            other => Err(CastrankError::Config(format!("unknown profile '{}'", other))),
        }
    }

    pub fn validate(&self) -> Result<(), CastrankError> {
        if self.candidate_cap == 0 {
            return Err(CastrankError::Config("candidate_cap must be at least 1".into()));
        }
        if self.search_limit == 0 {
            return Err(CastrankError::Config("search_limit must be at least 1".into()));
        }
        if self.sections.iter().all(|s| s.trim().is_empty()) {
            return Err(CastrankError::Config("sections must name at least one section".into()));
        }
        Ok(())
    }
}

/// Partial configuration read from a YAML file; unset fields keep the
/// value of the preset they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub profile: Option<String>,
    pub candidate_cap: Option<usize>,
    pub year_policy: Option<YearPolicy>,
    pub sections: Option<Vec<String>>,
    pub search_limit: Option<usize>,
    pub diagnostics: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CastrankError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| CastrankError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CastrankError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            CastrankError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Resolve against a preset. A `profile` key switches the base preset
    /// before the remaining fields are applied.
    pub fn apply(self, base: PipelineConfig) -> Result<PipelineConfig, CastrankError> {
        let mut config = match self.profile.as_deref() {
            Some(name) => PipelineConfig::for_profile(name)?,
            None => base,
        };
        if let Some(cap) = self.candidate_cap {
            config.candidate_cap = cap;
        }
        if let Some(policy) = self.year_policy {
            config.year_policy = policy;
        }
        if let Some(sections) = self.sections {
            config.sections = sections;
        }
        if let Some(limit) = self.search_limit {
            config.search_limit = limit;
        }
        if let Some(diagnostics) = self.diagnostics {
            config.diagnostics = diagnostics;
        }
        config.validate()?;
        Ok(config)
    }
}

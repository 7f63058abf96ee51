//! Pipeline Config: knobs applied to every run of a pipeline
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Env var bounding the number of steps per run.
pub const MAX_STEPS_ENV: &str = "TYPEFLOW_MAX_STEPS";
/// Env var toggling payload digests in step records.
pub const RECORD_DIGESTS_ENV: &str = "TYPEFLOW_RECORD_DIGESTS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on executed steps. `None` runs until no operation matches;
    /// a cyclic registry then never terminates.
    pub max_steps: Option<usize>,
    /// Hash every step output into `StepRecord::output_digest`.
    pub record_digests: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            record_digests: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `TYPEFLOW_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_STEPS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.max_steps = Some(limit),
                Err(e) => warn!(var = MAX_STEPS_ENV, value = %raw, error = %e, "ignoring malformed value"),
            }
        }

        if let Some(raw) = lookup(RECORD_DIGESTS_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.record_digests = flag,
                None => warn!(var = RECORD_DIGESTS_ENV, value = %raw, "ignoring malformed value"),
            }
        }

        config
    }

    pub fn with_max_steps(mut self, limit: usize) -> Self {
        self.max_steps = Some(limit);
        self
    }

    pub fn with_digests(mut self, enabled: bool) -> Self {
        self.record_digests = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

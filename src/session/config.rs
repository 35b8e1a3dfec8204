//! Top-level selector configuration.
//!
//! Every threshold is tunable by the remote-config collaborator. The values
//! in each `Default` impl are starting points, not contracts.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::admission::AdmissionConfig;
use crate::evaluation::EvaluatorConfig;
use crate::filters::{MovementFilterConfig, PitchFilterConfig};
use crate::rotation::SpreadPromptConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub pitch: PitchFilterConfig,
    pub movement: MovementFilterConfig,
    pub admission: AdmissionConfig,
    pub evaluator: EvaluatorConfig,
    pub spread_prompts: SpreadPromptConfig,
}

impl SelectorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SelectorConfig =
            serde_yaml::from_str(yaml).context("Failed to parse selector config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let config: SelectorConfig = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        let pitch = &self.pitch;
        if !(0.0..=90.0).contains(&pitch.max_downward_tilt_deg)
            || !(0.0..=90.0).contains(&pitch.max_upward_tilt_deg)
        {
            bail!(
                "Pitch bounds must be within [0, 90] degrees, got down={} up={}",
                pitch.max_downward_tilt_deg,
                pitch.max_upward_tilt_deg
            );
        }

        if !(self.movement.threshold >= 0.0) || !(self.movement.rotation_weight >= 0.0) {
            bail!("Movement threshold and rotation weight must be non-negative");
        }

        if !(self.admission.force_accept_after_s > 0.0) {
            bail!(
                "Force-accept timeout must be positive, got {}",
                self.admission.force_accept_after_s
            );
        }

        let eval = &self.evaluator;
        if !(eval.window_duration_s > 0.0) {
            bail!("Window duration must be positive, got {}", eval.window_duration_s);
        }
        for (name, value) in [
            ("min_score", eval.min_score),
            ("high_quality_score", eval.high_quality_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1], got {}", name, value);
            }
        }
        if eval.min_score > eval.high_quality_score {
            bail!(
                "min_score ({}) exceeds high_quality_score ({})",
                eval.min_score,
                eval.high_quality_score
            );
        }

        Ok(())
    }
}

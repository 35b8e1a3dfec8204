//! Session layer: configuration and the per-sequence orchestrator.

pub mod config;
pub mod localization_session;
pub mod shared_config;
pub mod stats;

pub use config::SelectorConfig;
pub use localization_session::{FrameDisposition, LocalizationSession};
pub use shared_config::SharedConfig;
pub use stats::SessionStats;

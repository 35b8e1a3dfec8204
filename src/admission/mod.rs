//! Per-frame admission: decides whether a frame is worth scoring at all.

pub mod guard;

pub use guard::{AdmissionConfig, AdmissionDecision, FrameAdmissionGuard};

//! Tracking-quality classification reported by the motion-tracking subsystem.

/// Why tracking is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitedReason {
    Initializing,
    Relocalizing,
    ExcessiveMotion,
    InsufficientFeatures,
}

/// Confidence of the tracking subsystem in a frame's pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingQuality {
    Normal,
    Limited(LimitedReason),
    Unavailable,
}

impl TrackingQuality {
    pub fn is_normal(&self) -> bool {
        matches!(self, TrackingQuality::Normal)
    }

    pub fn is_limited(&self) -> bool {
        matches!(self, TrackingQuality::Limited(_))
    }
}

impl Default for TrackingQuality {
    fn default() -> Self {
        Self::Unavailable
    }
}

impl std::fmt::Display for TrackingQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingQuality::Normal => write!(f, "normal"),
            TrackingQuality::Limited(LimitedReason::Initializing) => write!(f, "initializing"),
            TrackingQuality::Limited(LimitedReason::Relocalizing) => write!(f, "relocalizing"),
            TrackingQuality::Limited(LimitedReason::ExcessiveMotion) => {
                write!(f, "excessive_motion")
            }
            TrackingQuality::Limited(LimitedReason::InsufficientFeatures) => {
                write!(f, "insufficient_features")
            }
            TrackingQuality::Unavailable => write!(f, "unavailable"),
        }
    }
}

impl std::str::FromStr for TrackingQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(TrackingQuality::Normal),
            "initializing" => Ok(TrackingQuality::Limited(LimitedReason::Initializing)),
            "relocalizing" => Ok(TrackingQuality::Limited(LimitedReason::Relocalizing)),
            "excessive_motion" => Ok(TrackingQuality::Limited(LimitedReason::ExcessiveMotion)),
            "insufficient_features" => {
                Ok(TrackingQuality::Limited(LimitedReason::InsufficientFeatures))
            }
            "unavailable" => Ok(TrackingQuality::Unavailable),
            other => Err(format!("unknown tracking quality '{}'", other)),
        }
    }
}

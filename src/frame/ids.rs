//! Identifier newtypes for frames and capture sources.

/// Identifier of a captured frame, assigned by the frame producer.
///
/// Used as a lightweight handle for matching asynchronously delivered
/// scores back to the frame they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

impl FrameId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Identifier of the logical capture source a frame came from.
///
/// An evaluation window belongs to exactly one source; frames from any other
/// source are turned away while that window is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u32);

impl SourceId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_id_display() {
        assert_eq!(format!("{}", FrameId::new(42)), "F42");
        assert_eq!(format!("{}", SourceId::new(1)), "S1");
    }

    #[test]
    fn test_frame_id_ordering() {
        assert!(FrameId::new(1) < FrameId::new(2));
        assert_eq!(SourceId::default(), SourceId::new(0));
    }
}

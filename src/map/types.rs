//! Identifier newtypes for map entities.

/// Unique identifier for a KeyFrame.
///
/// Id 0 is reserved as a sentinel for "no keyframe yet"; the planning
/// keyframe queue rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyFrameId(pub u64);

impl KeyFrameId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Whether this is a real keyframe id (not the sentinel).
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

/// Unique identifier for a Landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkId(pub u64);

impl LandmarkId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

//! Contact events reported by a backend step.

use serde::{Deserialize, Serialize};

use crate::body::BodyId;

/// Lifecycle phase of a contact pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    /// The pair began touching this step.
    Added,
    /// The pair was already touching and still is.
    Persisted,
    /// The pair stopped touching this step.
    Removed,
}

/// One contact report. `body` is the sensor/reporting body, `other` is the
/// body it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub body: BodyId,
    pub other: BodyId,
}

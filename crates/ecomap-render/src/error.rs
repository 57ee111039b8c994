use thiserror::Error;

use crate::surface::MarkerId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The surface could not be initialized (for example, its container is
    /// missing). Rendering degrades to an empty-state message.
    #[error("map surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },

    #[error("surface rejected marker {marker}: {reason}")]
    MarkerRejected { marker: MarkerId, reason: String },
}

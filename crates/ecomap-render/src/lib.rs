//! Batched placement of points of interest on a map surface.
//!
//! [`IncrementalRenderer`] owns the render state machine; [`MapSurface`] is
//! the drawing seam, with in-memory and GeoJSON implementations.

pub mod error;
pub mod events;
pub mod renderer;
pub mod scheduler;
pub mod style;
pub mod surface;

pub use error::RenderError;
pub use events::{directions_url, MarkerActivated};
pub use renderer::{
    IncrementalRenderer, RenderOutcome, RenderReport, RenderState, DEFAULT_CHUNK_SIZE,
    EMPTY_STATE_MESSAGE, FOCUS_ZOOM, INITIAL_CENTER, INITIAL_ZOOM,
};
pub use scheduler::{BatchQueue, FrameYield, TokioYield};
pub use style::{bootstrap_marker_icon, category_color, popup_html, MarkerIcon, MarkerStyle};
pub use surface::{GeoJsonSurface, MapSurface, Marker, MarkerId, RecordingSurface};

//! Nationwide point-of-interest loading from OpenStreetMap via Overpass.
//!
//! [`PointLoader`] is the entry point: one aggregated query, classification
//! into the four map categories, and substitution of the packaged fallback
//! dataset whenever the live path yields nothing usable.

pub mod classify;
pub mod client;
pub mod error;
pub mod fallback;
pub mod pipeline;
pub mod query;
pub(crate) mod retry;
pub mod types;

pub use classify::{classify_category, classify_record, classify_records, ClassifySummary, DropReason};
pub use client::OverpassClient;
pub use error::{FailureKind, FallbackError, OverpassError};
pub use fallback::{load_fallback, parse_fallback, FallbackDataset, FallbackSource};
pub use pipeline::{FallbackReason, LoadedPoints, PointLoader, PointSource, RecordSource};
pub use query::build_country_query;
pub use types::{OverpassResponse, RawRecord};

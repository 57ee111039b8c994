//! Load orchestration: live fetch, classification, and fallback substitution.
//!
//! Every failure along the live path is recovered locally by loading the
//! fallback dataset; callers always receive a usable (possibly empty)
//! collection, never an error.

use std::fmt;

use ecomap_core::{MountGuard, PointOfInterest};

use crate::classify::classify_records;
use crate::client::OverpassClient;
use crate::error::{FailureKind, OverpassError};
use crate::fallback::{load_fallback, FallbackSource};
use crate::types::RawRecord;

/// Why the live result was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    RemoteUnavailable,
    MalformedResponse,
    /// The fetch succeeded but classification kept zero points.
    NoUsableRecords,
}

impl From<FailureKind> for FallbackReason {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::RemoteUnavailable => FallbackReason::RemoteUnavailable,
            FailureKind::MalformedResponse => FallbackReason::MalformedResponse,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::RemoteUnavailable => write!(f, "remote unavailable"),
            FallbackReason::MalformedResponse => write!(f, "malformed response"),
            FallbackReason::NoUsableRecords => write!(f, "no usable records"),
        }
    }
}

/// Provenance of a loaded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointSource {
    Live,
    Fallback { reason: FallbackReason },
    /// Both the live fetch and the fallback dataset failed, or the fallback
    /// held no usable entries.
    Empty { reason: FallbackReason },
}

impl fmt::Display for PointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSource::Live => write!(f, "live"),
            PointSource::Fallback { reason } => write!(f, "fallback ({reason})"),
            PointSource::Empty { reason } => write!(f, "empty ({reason}; fallback unavailable)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPoints {
    pub points: Vec<PointOfInterest>,
    pub source: PointSource,
}

/// Anything that can produce raw records for the pipeline.
///
/// [`OverpassClient`] is the production implementation; tests substitute
/// canned responses.
pub trait RecordSource {
    fn fetch_records(
        &self,
        country_code: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RawRecord>, OverpassError>>;
}

impl RecordSource for OverpassClient {
    async fn fetch_records(&self, country_code: &str) -> Result<Vec<RawRecord>, OverpassError> {
        self.fetch_country(country_code).await
    }
}

/// Runs one load cycle against a record source and a fallback dataset.
pub struct PointLoader<S> {
    source: S,
    fallback: FallbackSource,
    country_code: String,
    country_name: String,
}

impl PointLoader<OverpassClient> {
    /// Builds a loader from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &ecomap_core::AppConfig) -> Result<Self, OverpassError> {
        Ok(Self::new(
            OverpassClient::from_config(config)?,
            FallbackSource::from_config(config),
            &config.country_code,
            &config.country_name,
        ))
    }
}

impl<S: RecordSource> PointLoader<S> {
    pub fn new(source: S, fallback: FallbackSource, country_code: &str, country_name: &str) -> Self {
        Self {
            source,
            fallback,
            country_code: country_code.to_owned(),
            country_name: country_name.to_owned(),
        }
    }

    /// Loads the point collection for one view lifetime.
    ///
    /// Returns `None` when `mount` was released while the fetch was in
    /// flight; nothing further is loaded in that case.
    pub async fn load(&self, mount: &MountGuard) -> Option<LoadedPoints> {
        let fetched = self.source.fetch_records(&self.country_code).await;
        if !mount.is_mounted() {
            tracing::debug!("view unmounted during fetch; discarding result");
            return None;
        }

        let reason = match fetched {
            Ok(records) => {
                let (points, summary) = classify_records(&records, &self.country_name);
                if !points.is_empty() {
                    tracing::info!(
                        points = points.len(),
                        dropped = summary.dropped(),
                        "loaded nationwide points"
                    );
                    return Some(LoadedPoints {
                        points,
                        source: PointSource::Live,
                    });
                }
                FallbackReason::NoUsableRecords
            }
            Err(err) => {
                tracing::warn!(error = %err, "nationwide data failed");
                FallbackReason::from(err.failure_kind())
            }
        };

        Some(self.load_fallback(reason))
    }

    fn load_fallback(&self, reason: FallbackReason) -> LoadedPoints {
        match load_fallback(&self.fallback) {
            Ok(dataset) if dataset.points.is_empty() => {
                tracing::error!(
                    reason = %reason,
                    skipped = dataset.skipped,
                    "fallback locations contain no usable entries"
                );
                LoadedPoints {
                    points: Vec::new(),
                    source: PointSource::Empty { reason },
                }
            }
            Ok(dataset) => {
                tracing::warn!(
                    reason = %reason,
                    points = dataset.points.len(),
                    skipped = dataset.skipped,
                    "falling back to bundled locations"
                );
                LoadedPoints {
                    points: dataset.points,
                    source: PointSource::Fallback { reason },
                }
            }
            Err(err) => {
                tracing::error!(reason = %reason, error = %err, "failed to load fallback locations");
                LoadedPoints {
                    points: Vec::new(),
                    source: PointSource::Empty { reason },
                }
            }
        }
    }
}

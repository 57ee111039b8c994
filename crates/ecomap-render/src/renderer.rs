//! The incremental renderer: filters the loaded points and places markers
//! in batches, yielding to the host between batches.

use std::fmt;

use ecomap_core::{ActiveFilterSet, Coordinates, InputVersion, MountGuard, PointOfInterest};

use crate::error::RenderError;
use crate::events::MarkerActivated;
use crate::scheduler::{BatchQueue, FrameYield, TokioYield};
use crate::style::{bootstrap_marker_icon, popup_html, MarkerStyle};
use crate::surface::{MapSurface, Marker, MarkerId};

pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Country-wide starting view.
pub const INITIAL_CENTER: Coordinates = Coordinates {
    lat: 4.2105,
    lng: 101.9758,
};
pub const INITIAL_ZOOM: u8 = 7;

/// Zoom applied when a marker is activated.
pub const FOCUS_ZOOM: u8 = 12;

/// Shown by the page in place of the map when the surface is unavailable.
pub const EMPTY_STATE_MESSAGE: &str =
    "The map could not be displayed. Please reload the page to try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing loaded, or the last pass completed.
    Idle,
    /// Inputs changed; the filtered set needs recomputing.
    Filtering,
    BatchRendering,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderState::Idle => write!(f, "idle"),
            RenderState::Filtering => write!(f, "filtering"),
            RenderState::BatchRendering => write!(f, "batch-rendering"),
        }
    }
}

/// Counters for one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Points that passed the active filter.
    pub filtered: usize,
    pub batches: usize,
    pub markers_placed: usize,
    pub largest_batch: usize,
    pub yields: usize,
    /// Markers the surface refused.
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Complete(RenderReport),
    /// The input version moved on mid-pass; the caller should render again.
    Superseded(RenderReport),
    /// The view was torn down mid-pass; the surface was left untouched
    /// from that point on.
    Unmounted(RenderReport),
    SurfaceUnavailable { message: &'static str },
}

impl RenderOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&RenderReport> {
        match self {
            RenderOutcome::Complete(report)
            | RenderOutcome::Superseded(report)
            | RenderOutcome::Unmounted(report) => Some(report),
            RenderOutcome::SurfaceUnavailable { .. } => None,
        }
    }
}

/// Places filtered points on a [`MapSurface`] in fixed-size batches.
///
/// All state is owned by the renderer; the page passes the point
/// collection, filter set, input version and mount guard into each call and
/// receives activation events back as values.
pub struct IncrementalRenderer<M, Y = TokioYield> {
    surface: Result<M, RenderError>,
    frame: Y,
    chunk_size: usize,
    state: RenderState,
    placed: Vec<PointOfInterest>,
}

impl<M: MapSurface> IncrementalRenderer<M, TokioYield> {
    /// Creates a renderer over an initialized surface, or over the error the
    /// surface failed with.
    ///
    /// An available surface is moved to the initial country-wide view.
    pub fn new(surface: Result<M, RenderError>, chunk_size: usize) -> Self {
        Self::with_frame_yield(surface, chunk_size, TokioYield)
    }
}

impl<M: MapSurface, Y: FrameYield> IncrementalRenderer<M, Y> {
    pub fn with_frame_yield(
        mut surface: Result<M, RenderError>,
        chunk_size: usize,
        frame: Y,
    ) -> Self {
        match &mut surface {
            Ok(map) => {
                bootstrap_marker_icon();
                map.set_view(INITIAL_CENTER, INITIAL_ZOOM);
            }
            Err(err) => tracing::warn!(error = %err, "map surface failed to initialize"),
        }
        Self {
            surface,
            frame,
            chunk_size: chunk_size.max(1),
            state: RenderState::Idle,
            placed: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// The surface, if it initialized.
    #[must_use]
    pub fn surface(&self) -> Option<&M> {
        self.surface.as_ref().ok()
    }

    /// Consumes the renderer and returns the surface, if it initialized.
    pub fn into_surface(self) -> Option<M> {
        self.surface.ok()
    }

    /// Renders the points enabled by `filters`.
    ///
    /// Clears every existing marker, then places the filtered points in
    /// batches of the configured chunk size, yielding between batches. After
    /// each yield the pass stops if `mount` was released or `version` no
    /// longer matches the value it started from. An empty `points`
    /// collection leaves the surface untouched.
    ///
    /// The renderer is borrowed exclusively for the whole pass, so
    /// [`activate`](Self::activate) cannot run between batches. A caller that
    /// must handle a click mid-pass bumps `version`; the pass returns
    /// [`RenderOutcome::Superseded`] at the next yield and the markers placed
    /// so far stay activatable until the next pass clears them.
    pub async fn render(
        &mut self,
        points: &[PointOfInterest],
        filters: &ActiveFilterSet,
        version: &InputVersion,
        mount: &MountGuard,
    ) -> RenderOutcome {
        if self.surface.is_err() {
            return RenderOutcome::SurfaceUnavailable {
                message: EMPTY_STATE_MESSAGE,
            };
        }
        if !mount.is_mounted() {
            return RenderOutcome::Unmounted(RenderReport::default());
        }
        if points.is_empty() {
            self.state = RenderState::Idle;
            return RenderOutcome::Complete(RenderReport::default());
        }

        let started_at = version.current();
        self.state = RenderState::Filtering;
        let filtered: Vec<&PointOfInterest> = filters.apply(points).collect();
        let mut report = RenderReport {
            filtered: filtered.len(),
            ..RenderReport::default()
        };

        self.state = RenderState::BatchRendering;
        self.placed.clear();
        if let Ok(map) = &mut self.surface {
            map.clear_markers();
        }

        let mut queue = BatchQueue::new(filtered, self.chunk_size);
        while let Some(batch) = queue.pop_batch() {
            report.batches += 1;
            report.largest_batch = report.largest_batch.max(batch.len());
            self.place_batch(&batch, &mut report);
            tracing::debug!(
                batch = report.batches,
                size = batch.len(),
                remaining = queue.remaining(),
                "placed marker batch"
            );

            if queue.is_empty() {
                break;
            }
            self.frame.next_frame().await;
            report.yields += 1;

            if !mount.is_mounted() {
                tracing::debug!(placed = report.markers_placed, "view unmounted mid-render");
                self.state = RenderState::Idle;
                return RenderOutcome::Unmounted(report);
            }
            if !version.is_current(started_at) {
                tracing::debug!(placed = report.markers_placed, "inputs changed mid-render");
                self.state = RenderState::Filtering;
                return RenderOutcome::Superseded(report);
            }
        }

        self.state = RenderState::Idle;
        tracing::debug!(
            filtered = report.filtered,
            placed = report.markers_placed,
            batches = report.batches,
            "render complete"
        );
        RenderOutcome::Complete(report)
    }

    fn place_batch(&mut self, batch: &[&PointOfInterest], report: &mut RenderReport) {
        let Ok(map) = &mut self.surface else {
            return;
        };
        let icon = bootstrap_marker_icon();
        for point in batch {
            let marker = Marker {
                id: MarkerId(self.placed.len()),
                point_id: point.id,
                category: point.category,
                coordinates: point.coordinates,
                style: MarkerStyle::for_category(point.category),
                popup_html: popup_html(point),
                icon,
            };
            match map.add_marker(marker) {
                Ok(()) => {
                    self.placed.push((*point).clone());
                    report.markers_placed += 1;
                }
                Err(err) => {
                    tracing::warn!(point_id = point.id, error = %err, "marker rejected");
                    report.rejected += 1;
                }
            }
        }
    }

    /// Handles activation of a placed marker: re-centers the surface on the
    /// point and returns the event for the page.
    ///
    /// Returns `None` for identifiers not placed by the latest pass.
    pub fn activate(&mut self, marker: MarkerId) -> Option<MarkerActivated> {
        let point = self.placed.get(marker.0)?.clone();
        if let Ok(map) = &mut self.surface {
            map.set_view(point.coordinates, FOCUS_ZOOM);
        }
        Some(MarkerActivated { marker, point })
    }
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

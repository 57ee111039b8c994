//! `render` command handler.

use std::path::Path;

use ecomap_core::{ActiveFilterSet, AppConfig, InputVersion, MountGuard};
use ecomap_render::{GeoJsonSurface, IncrementalRenderer, RenderError, RenderOutcome};

use crate::locations::load_points;

pub(crate) async fn run_render(
    config: &AppConfig,
    filters: &ActiveFilterSet,
    output: Option<&Path>,
    chunk_size: usize,
) -> anyhow::Result<()> {
    if chunk_size == 0 {
        anyhow::bail!("--chunk-size must be greater than 0");
    }
    let loaded = load_points(config).await?;
    tracing::info!(source = %loaded.source, points = loaded.points.len(), "rendering locations");

    let surface = open_surface(output);
    let mut renderer = IncrementalRenderer::new(surface, chunk_size);
    let outcome = renderer
        .render(
            &loaded.points,
            filters,
            &InputVersion::default(),
            &MountGuard::new(),
        )
        .await;

    let report = match outcome {
        RenderOutcome::Complete(report) => report,
        RenderOutcome::SurfaceUnavailable { message } => {
            eprintln!("{message}");
            return Ok(());
        }
        other => anyhow::bail!("render did not complete: {other:?}"),
    };

    let Some(surface) = renderer.into_surface() else {
        anyhow::bail!("map surface disappeared after rendering");
    };
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            surface.write_to(std::io::BufWriter::new(file))?;
            eprintln!("wrote {} markers to {}", surface.len(), path.display());
        }
        None => {
            surface.write_to(std::io::stdout().lock())?;
            println!();
        }
    }

    eprintln!(
        "source: {}; {} filtered, {} placed in {} batches (largest {}), {} rejected",
        loaded.source,
        report.filtered,
        report.markers_placed,
        report.batches,
        report.largest_batch,
        report.rejected
    );
    Ok(())
}

fn open_surface(output: Option<&Path>) -> Result<GeoJsonSurface, RenderError> {
    output.map_or_else(|| Ok(GeoJsonSurface::new()), GeoJsonSurface::for_output)
}

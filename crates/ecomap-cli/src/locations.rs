//! `fetch` and `directions` command handlers.

use ecomap_core::{ActiveFilterSet, AppConfig, Material, MountGuard, PointOfInterest};
use ecomap_overpass::{LoadedPoints, PointLoader};

/// Runs one load cycle with a fresh mount guard.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built. Fetch failures are
/// recovered by the loader and never reach the caller.
pub(crate) async fn load_points(config: &AppConfig) -> anyhow::Result<LoadedPoints> {
    let loader = PointLoader::from_config(config)?;
    loader
        .load(&MountGuard::new())
        .await
        .ok_or_else(|| anyhow::anyhow!("load was cancelled"))
}

pub(crate) async fn run_fetch(
    config: &AppConfig,
    filters: &ActiveFilterSet,
    json: bool,
) -> anyhow::Result<()> {
    let loaded = load_points(config).await?;
    let points: Vec<&PointOfInterest> = filters.apply(&loaded.points).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!(
        "source: {} ({} of {} points shown)",
        loaded.source,
        points.len(),
        loaded.points.len()
    );
    if points.is_empty() {
        println!("no locations match the selected categories");
        return Ok(());
    }

    println!("{:<14}{:<11}{:<40}ADDRESS", "ID", "CATEGORY", "NAME");
    for point in &points {
        println!(
            "{:<14}{:<11}{:<40}{}",
            point.id,
            point.category,
            truncate(&point.name, 38),
            truncate(&point.address, 60)
        );
    }
    Ok(())
}

/// Prints the directions link for the point with `id`.
///
/// # Errors
///
/// Returns an error if no loaded point has that identifier.
pub(crate) async fn run_directions(config: &AppConfig, id: i64) -> anyhow::Result<()> {
    let loaded = load_points(config).await?;
    let point = loaded
        .points
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow::anyhow!("location {id} not found ({} source)", loaded.source))?;

    for line in detail_lines(point) {
        println!("{line}");
    }
    println!("{}", ecomap_render::directions_url(point));
    Ok(())
}

/// Detail view of one point: heading, then whichever optional fields it has.
pub(crate) fn detail_lines(point: &PointOfInterest) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", point.name, point.address)];
    lines.push(format!("category: {}", point.category));
    if let Some(hours) = &point.hours {
        lines.push(format!("hours: {hours}"));
    }
    if let Some(phone) = &point.phone {
        lines.push(format!("phone: {phone}"));
    }
    if let Some(accepts) = point.accepts.as_deref().filter(|a| !a.is_empty()) {
        let materials: Vec<&str> = accepts.iter().copied().map(Material::as_str).collect();
        lines.push(format!("accepts: {}", materials.join(", ")));
    }
    if let Some(capacity) = &point.capacity {
        lines.push(format!("capacity: {capacity}"));
    }
    lines
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars).collect::<String>())
    } else {
        value.to_owned()
    }
}

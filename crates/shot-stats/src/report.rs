use std::fmt::Write as _;

use shot_core::formatting::{format_aperture, format_focal_length, format_number, format_shutter_speed};
use shot_core::models::FrequencyMap;
use shot_data::analysis::AnalysisResult;

// ── Text report ────────────────────────────────────────────────────────────────

/// Render the plain-text summary printed to stdout.
///
/// `top` limits how many of the most common values are listed per field.
pub fn render_text(result: &AnalysisResult, top: usize) -> String {
    let mut out = String::new();
    let meta = &result.metadata;
    let summary = &result.summary;
    let agg = &result.aggregation;

    let _ = writeln!(out, "Shooting statistics for {}", meta.folder.display());
    if meta.interrupted {
        let _ = writeln!(
            out,
            "(interrupted: {} of {} photos processed)",
            meta.photos_processed, meta.photos_discovered
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Photos found:           {}", format_number(meta.photos_discovered as f64, 0));
    let _ = writeln!(out, "Without metadata:       {}", format_number(meta.photos_without_metadata as f64, 0));
    let _ = writeln!(out, "Dated photos:           {}", format_number(summary.total_photos as f64, 0));
    let _ = writeln!(out, "Median focal length:    {}", format_focal_length(summary.focal_length_median));
    let _ = writeln!(out, "Photos per day:         {}", format_number(summary.daily_average, 1));
    if let Some(midpoint) = result.population_midpoint {
        let _ = writeln!(out, "Focal length midpoint:  {}", format_focal_length(midpoint));
    }

    top_section(&mut out, "ISO", &agg.isos, top, |iso| iso.to_string());
    top_section(&mut out, "Aperture", &agg.apertures, top, |a| format_aperture(a.f_number()));
    top_section(&mut out, "Shutter speed", &agg.shutter_speeds, top, |s| {
        format_shutter_speed(s.seconds())
    });
    top_section(&mut out, "Hour of day", &agg.hours, top, |h| format!("{:02}:00", h));
    top_section(&mut out, "Day", &agg.dates, top, |d| d.format("%Y-%m-%d").to_string());

    hourly_table(&mut out, result);
    out
}

fn top_section<K: Ord>(
    out: &mut String,
    title: &str,
    map: &FrequencyMap<K>,
    top: usize,
    label: impl Fn(&K) -> String,
) {
    if map.is_empty() || top == 0 {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{} (top {})", title, top.min(map.len()));
    for (key, count) in map.most_common(top) {
        let _ = writeln!(out, "  {:<12} {:>8}", label(key), format_number(count as f64, 0));
    }
}

/// One row per hour that has at least one averaged setting.
fn hourly_table(out: &mut String, result: &AnalysisResult) {
    let rows: Vec<_> = result
        .hourly_averages
        .iter()
        .filter(|h| h.aperture.is_some() || h.shutter_speed.is_some() || h.iso.is_some())
        .collect();
    if rows.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Average settings by hour");
    let _ = writeln!(out, "  {:<6} {:>9} {:>10} {:>8}", "Hour", "Aperture", "Shutter", "ISO");
    for row in rows {
        let dash = || "-".to_string();
        let _ = writeln!(
            out,
            "  {:<6} {:>9} {:>10} {:>8}",
            format!("{:02}:00", row.hour),
            row.aperture.map(format_aperture).unwrap_or_else(dash),
            row.shutter_speed.map(format_shutter_speed).unwrap_or_else(dash),
            row.iso.map(|iso| format_number(iso, 0)).unwrap_or_else(dash),
        );
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

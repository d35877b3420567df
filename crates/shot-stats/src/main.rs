mod bootstrap;
mod report;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use shot_core::settings::Settings;
use shot_data::analysis::{analyze_folder, AnalysisOptions};
use shot_data::chart_data::ChartData;
use shot_data::provider::ExifMetadataProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging options are never persisted, so they can be set up before the
    // last-used merge and see any problem it reports.
    let cli = Settings::parse();
    let log_level = if cli.debug { "DEBUG" } else { cli.log_level.as_str() };
    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(log_level, cli.log_file.as_ref())?;

    let settings = Settings::load_with_last_used();

    tracing::info!("Shot Stats v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.clear && settings.folder.is_none() {
        println!("Saved configuration cleared.");
        return Ok(());
    }
    let folder = settings.require_folder()?.to_path_buf();

    let cancel = Arc::new(AtomicBool::new(false));
    let options = AnalysisOptions {
        bins: settings.bins as usize,
        jobs: settings.jobs,
        cancel: Arc::clone(&cancel),
    };

    // Metadata reading is blocking I/O on a rayon pool; keep it off the runtime
    // so Ctrl+C can still be observed.
    let mut task = tokio::task::spawn_blocking(move || {
        analyze_folder(&folder, &ExifMetadataProvider, &options)
    });

    let result = tokio::select! {
        joined = &mut task => joined??,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Ctrl+C received; finishing with the photos read so far");
            cancel.store(true, Ordering::Relaxed);
            task.await??
        }
    };

    match settings.format.as_str() {
        "json" => {
            let chart = ChartData::from_result(&result);
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        _ => print!("{}", report::render_text(&result, settings.top)),
    }

    if !settings.no_export {
        let path = ChartData::from_result(&result).write_to(&settings.output_dir)?;
        tracing::info!("Chart data written to {}", path.display());
        if settings.format != "json" {
            println!("\nChart data written to {}", path.display());
        }
    }

    Ok(())
}

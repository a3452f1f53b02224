mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use discourse_core::settings::Settings;
use discourse_data::aggregator::aggregate_filter;
use discourse_runtime::dataset_cache::DatasetCache;
use discourse_runtime::session::DashboardSession;
use discourse_ui::app::App;

use bootstrap::LogTarget;

fn main() -> Result<()> {
    let settings = Settings::load();

    // The dashboard owns the terminal, so its logs go to a file.
    let log_target = match (&settings.view[..], &settings.log_file) {
        (_, Some(path)) => LogTarget::File(path.clone()),
        ("dashboard", None) => LogTarget::File(bootstrap::default_log_file()?),
        _ => LogTarget::Stderr,
    };
    bootstrap::setup_logging(&settings.log_level, &log_target)?;

    tracing::info!("Discourse dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, View: {}, Theme: {}",
        settings.data_dir.display(),
        settings.view,
        settings.theme
    );

    let mut cache = DatasetCache::new();
    let dataset = cache
        .get_or_load(&settings.data_dir)
        .with_context(|| format!("Failed to load lessons from {}", settings.data_dir.display()))?;
    let filter = report::resolve_filter(&dataset, &settings)?;

    match settings.view.as_str() {
        "dashboard" => {
            let session = DashboardSession::new(dataset, filter, settings.preview_rows);
            let app = App::new(&settings.theme, session, cache, settings.data_dir.clone());
            app.run().context("Terminal dashboard failed")?;
        }
        "summary" => {
            let views = aggregate_filter(&dataset, &filter);
            print!("{}", report::summary_text(&dataset, &filter, &views));
        }
        "json" => {
            let views = aggregate_filter(&dataset, &filter);
            let doc = report::json_report(&dataset, &filter, &views)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        unknown => bail!("Unknown view mode: {unknown}"),
    }

    Ok(())
}

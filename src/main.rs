mod pkg;

use crate::pkg::board::{runner::BoardRunner, session::DisplaySession};
use crate::pkg::clock::run_clock;
use crate::pkg::config::{config_path, RenderMode, SETTINGS};
use crate::pkg::inventory::http_inventory::HttpInventory;
use crate::pkg::render::{html::HtmlRenderer, terminal::TerminalRenderer, Renderer};

use dotenv::dotenv;
use log::{error, info, warn};
use std::{path::Path, sync::Arc, time::Duration};
use tokio::signal;

#[tokio::main]
async fn main() {
    dotenv().ok();
    pkg::logger::init_logger();

    info!("🍺 Beer board started");

    let settings_ref = match SETTINGS.as_ref() {
        Ok(s) => Arc::clone(s),
        Err(e) => {
            error!("❌ Failed to load settings: {:#}", e);
            return;
        }
    };

    let cfg_path = config_path();
    match pkg::save_config::write_starter_config(&cfg_path).await {
        Ok(true) => info!("📝 Wrote starter config to {}", cfg_path),
        Ok(false) => {}
        Err(e) => warn!("⚠️ Could not write starter config {}: {:?}", cfg_path, e),
    }

    let renderer: Arc<dyn Renderer> = match settings_ref.render.mode {
        RenderMode::Terminal => Arc::new(TerminalRenderer::stdout(
            settings_ref.nicknames.clone(),
            &settings_ref.render.image_base_url,
            settings_ref.render.clear_screen,
        )),
        RenderMode::Html => {
            let refresh_secs = (settings_ref.clock.interval_millis / 1000).max(1);
            match HtmlRenderer::new(
                Path::new(&settings_ref.render.output_dir),
                settings_ref.nicknames.clone(),
                &settings_ref.render.image_base_url,
                refresh_secs,
                settings_ref.clock.enabled,
            )
            .await
            {
                Ok(r) => {
                    info!("🖼️ Writing board to {:?}", r.board_path());
                    Arc::new(r)
                }
                Err(e) => {
                    error!("❌ Failed to prepare HTML output: {:?}", e);
                    return;
                }
            }
        }
    };

    let inventory = HttpInventory::new(
        &settings_ref.api_url,
        settings_ref.sort_by.clone(),
        settings_ref.request_timeout(),
        settings_ref.max_retries,
    );

    match inventory.health().await {
        Ok(true) => info!("✅ Inventory API at {} is alive", settings_ref.api_url),
        Ok(false) => warn!("⚠️ Inventory API at {} reports not alive", settings_ref.api_url),
        Err(e) => warn!("⚠️ Inventory API at {} unreachable for now: {:#}", settings_ref.api_url, e),
    }

    if settings_ref.clock.enabled {
        tokio::spawn(run_clock(
            Arc::clone(&renderer),
            Duration::from_millis(settings_ref.clock.interval_millis),
            settings_ref.clock.format.clone(),
        ));
    }

    let policy = settings_ref.delay_policy();
    let session = DisplaySession::new(settings_ref.page_size, policy);

    info!(
        "⏳ Paging {} drinks per page from {} (base delay {:?}, smoothing {})",
        session.page_size(),
        settings_ref.api_url,
        policy.base_delay(),
        policy.smoothing()
    );

    let runner = BoardRunner::new(
        Arc::new(inventory),
        renderer,
        session,
        policy.base_delay(),
        settings_ref.debug,
    );

    runner
        .run(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("❌ Failed to listen for shutdown signal: {:?}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("👋 Beer board shutdown complete");
}

//! Timelapse daemon binary.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lapse_daemon::{
    CameraSource, ConcatMerger, DaemonConfig, DayFinalizer, Scheduler, TimelapseEncoder,
};
use lapse_store::{FrameStore, StoreLayout};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("lapse_daemon=info,lapse_media=info,lapse_store=info,lapse_notify=info")
    });

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting lapse-daemon");

    // FFmpeg is required for every operation; fail fast without it
    if let Err(e) = lapse_media::check_ffmpeg() {
        error!("{}", e);
        std::process::exit(1);
    }

    let config = DaemonConfig::from_env();
    info!(
        "Capturing to {} every {}s from {}",
        config.base_dir.display(),
        config.capture_interval.as_secs(),
        config.capture.device_path()
    );

    let store = FrameStore::new(StoreLayout::new(&config.base_dir));
    let notifier = config.notifier();
    if !notifier.is_enabled() {
        info!("Telegram not configured, deliveries will be skipped");
    }

    let finalizer = Arc::new(DayFinalizer::new(
        store.clone(),
        Arc::new(TimelapseEncoder::new(
            config.encoding.clone(),
            config.encode_timeout_secs,
        )),
        Arc::new(ConcatMerger::new(config.concat_timeout_secs)),
        notifier,
    ));
    let source = Arc::new(CameraSource::new(
        config.capture.clone(),
        config.capture_timeout_secs,
    ));
    let (scheduler, status_rx) = Scheduler::new(
        store,
        source,
        finalizer,
        config.capture_interval,
    );

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    // Telegram command loop, when configured
    let mut command_task = None;
    if let (Some(client), Some(chat_id)) =
        (config.telegram_client(), config.telegram_chat_id.clone())
    {
        command_task = Some(tokio::spawn(lapse_notify::run_command_loop(
            client,
            chat_id,
            status_rx,
            shutdown_rx.clone(),
        )));
    }

    // Run the capture loop
    if let Err(e) = scheduler.run(shutdown_rx).await {
        error!("Scheduler error: {}", e);
        std::process::exit(1);
    }

    if let Some(task) = command_task {
        task.await.ok();
    }

    info!("Daemon shutdown complete");
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

use dexboard::{Analytics, Settings};
use dexboard::models::Timeframe;

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    // Load configuration
    let settings = Arc::new(
        Settings::new()
            .context("Failed to load config.yaml. Please ensure it exists and is valid")?,
    );

    let analytics = Arc::new(
        Analytics::new(settings.clone()).context("Failed to initialize analytics service")?,
    );

    // One refresh loop per watched account; loads write to disjoint
    // store slots, so the loops are fully independent
    let mut handles = Vec::new();
    for account in settings.daemon.watch_accounts.clone() {
        let analytics = analytics.clone();
        let timeframe = settings.history.timeframe;
        let interval = settings.daemon.refresh_interval_secs;
        let token = analytics.shutdown_token().child_token();

        handles.push(tokio::spawn(async move {
            refresh_loop(analytics, account, timeframe, interval, token).await;
        }));
    }

    info!(
        "Analytics daemon running with {} watched account(s). Press Ctrl+C to stop.",
        handles.len()
    );

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    // Cancel in-flight loads and stop the refresh loops
    info!("Finishing all tasks...");
    analytics.cancel();

    for handle in handles {
        let _ = handle.await;
    }

    info!("All refresh tasks stopped");
    Ok(())
}

/// Keep one account's analytics warm until cancellation.
async fn refresh_loop(
    analytics: Arc<Analytics>,
    account: String,
    timeframe: Timeframe,
    interval_secs: u64,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = analytics.refresh_account(&account, timeframe).await {
                    error!("Failed to refresh {}: {:#}", account, e);
                    continue;
                }
                log_summary(&analytics, &account).await;
            },
        }
    }
}

/// Log a one-line snapshot of what the store now holds for an account.
async fn log_summary(analytics: &Analytics, account: &str) {
    let positions = analytics
        .positions(account)
        .await
        .map(|p| p.len())
        .unwrap_or(0);
    let snapshots = analytics
        .snapshots(account)
        .await
        .map(|s| s.len())
        .unwrap_or(0);
    let latest_usd = analytics
        .liquidity_history(account)
        .await
        .and_then(|series| series.last().map(|point| point.value_usd));

    match latest_usd {
        Some(value) => info!(
            "{}: {} positions, {} snapshots, latest liquidity ${:.2}",
            account, positions, snapshots, value
        ),
        None => info!(
            "{}: {} positions, {} snapshots, no liquidity history yet",
            account, positions, snapshots
        ),
    }
}

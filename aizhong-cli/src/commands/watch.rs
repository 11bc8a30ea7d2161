use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use aizhong_core::{mask_account_name, AizhongConfig, ApiSnapshotSource, CoordinatorRegistry};

pub async fn handle_watch_command(interval_override: Option<u64>) -> Result<()> {
    let mut config = AizhongConfig::load()?;
    if let Some(secs) = interval_override {
        config.refresh.scan_interval_secs = secs;
    }
    // Cycles are driven from this loop; the coordinator's own timer stays off.
    config.refresh.enabled = false;

    let account = mask_account_name(&config.account.phone);
    let scan_interval = config.refresh.scan_interval_secs;

    println!("{}", "Aizhong Watch".cyan().bold());
    println!("{}", "═".repeat(50).dimmed());
    println!(
        "{} Watching account {} (refresh every {}s, Ctrl-C to stop)",
        "→".blue(),
        account.yellow(),
        scan_interval
    );
    println!();

    let registry = CoordinatorRegistry::new();
    let source = Arc::new(ApiSnapshotSource::from_config(&config));
    let coordinator = registry
        .register(account.clone(), source, config.refresh.clone())
        .await?;
    info!("Watch started for {}", account);

    let status = coordinator.status().await;
    let history = coordinator.history(1).await;
    let initial_duration = history.first().map(|entry| entry.duration_ms).unwrap_or(0);
    print_cycle_line(true, status.sub_accounts, initial_duration, None);

    let mut ticker = interval(Duration::from_secs(scan_interval));
    // interval()'s first tick completes immediately; the initial refresh just ran.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            _ = ticker.tick() => {
                let report = coordinator.refresh().await;
                print_cycle_line(
                    report.success,
                    report.sub_accounts,
                    report.duration_ms,
                    report.error.as_deref(),
                );
            }
        }
    }

    registry.shutdown_all().await;
    info!("Watch stopped for {}", account);
    println!("{} Watch stopped", "✓".green().bold());

    Ok(())
}

fn print_cycle_line(success: bool, sub_accounts: usize, duration_ms: u64, error: Option<&str>) {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    if success {
        println!(
            "  {} {} {} sub-accounts refreshed ({}ms)",
            timestamp.dimmed(),
            "✓".green().bold(),
            sub_accounts,
            duration_ms
        );
    } else {
        println!(
            "  {} {} {}",
            timestamp.dimmed(),
            "✗".red().bold(),
            error.unwrap_or("refresh failed").red()
        );
    }
}

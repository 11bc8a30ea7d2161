use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::sync::Arc;

use aizhong_core::{
    mask_account_name, AccountCoordinator, AizhongConfig, ApiSnapshotSource, RefreshHistoryEntry,
};

pub async fn handle_status_command(format: &str) -> Result<()> {
    let config = AizhongConfig::load()?;
    let account = mask_account_name(&config.account.phone);

    let source = Arc::new(ApiSnapshotSource::from_config(&config));
    let coordinator = AccountCoordinator::new(account.clone(), source, config.refresh.clone());

    coordinator.refresh().await;
    let status = coordinator.status().await;
    let history = coordinator.history(10).await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Aizhong Account Status".cyan().bold());
    println!("{}", "═".repeat(50).dimmed());
    println!();

    println!("  {:<22} {}", "Account:".bold(), account);
    println!(
        "  {:<22} {}",
        "Available:".bold(),
        if status.last_success {
            "Yes".green()
        } else {
            "No".red()
        }
    );
    println!("  {:<22} {}", "Sub-accounts:".bold(), status.sub_accounts);

    if let Some(last_attempt) = status.last_attempt {
        println!(
            "  {:<22} {}",
            "Last attempt:".bold(),
            format_datetime(&last_attempt)
        );
    }
    if let Some(last_success) = status.last_success_time {
        println!(
            "  {:<22} {}",
            "Last success:".bold(),
            format_datetime(&last_success)
        );
    }
    if status.consecutive_failures > 0 {
        println!(
            "  {:<22} {}",
            "Consecutive failures:".bold(),
            status.consecutive_failures.to_string().red()
        );
    }
    if let Some(error) = &status.last_error {
        println!("  {:<22} {}", "Last error:".bold(), error.red());
    }
    println!(
        "  {:<22} {}s",
        "Refresh interval:".bold(),
        config.refresh.scan_interval_secs
    );

    if !history.is_empty() {
        println!();
        println!("{}", "Recent Cycles".cyan().bold());
        print_history_table(&history);
    }

    Ok(())
}

fn print_history_table(history: &[RefreshHistoryEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").fg(comfy_table::Color::Cyan),
            Cell::new("Result").fg(comfy_table::Color::Cyan),
            Cell::new("Sub-accounts").fg(comfy_table::Color::Cyan),
            Cell::new("Duration").fg(comfy_table::Color::Cyan),
        ]);

    for entry in history.iter().rev() {
        let result = if entry.success {
            "✓ Success".green().to_string()
        } else {
            format!(
                "✗ {}",
                entry
                    .error_message
                    .as_deref()
                    .unwrap_or("Failed")
                    .chars()
                    .take(40)
                    .collect::<String>()
            )
            .red()
            .to_string()
        };

        table.add_row(vec![
            Cell::new(format_datetime(&entry.timestamp)),
            Cell::new(result),
            Cell::new(entry.sub_accounts.to_string()),
            Cell::new(format!("{}ms", entry.duration_ms)),
        ]);
    }

    println!("{}", table);
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

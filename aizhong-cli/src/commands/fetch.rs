use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::sync::Arc;

use aizhong_core::{
    mask_account_name, AccountCoordinator, AizhongConfig, ApiSnapshotSource, Snapshot,
    BALANCE_UNIT, NOTICE_UNIT,
};

pub async fn handle_fetch_command(format: &str) -> Result<()> {
    let config = AizhongConfig::load()?;
    let account = mask_account_name(&config.account.phone);

    let source = Arc::new(ApiSnapshotSource::from_config(&config));
    let coordinator = AccountCoordinator::new(account.clone(), source, config.refresh.clone());

    if format != "json" {
        println!(
            "{} {} {}",
            "→".blue(),
            "Fetching account data for".cyan(),
            account.yellow()
        );
    }

    let report = coordinator.refresh().await;
    if !report.success {
        anyhow::bail!(report.error.unwrap_or_else(|| "refresh failed".to_string()));
    }

    let snapshot = coordinator.snapshot().await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "{} Refresh completed: {} sub-accounts in {}ms",
        "✓".green().bold(),
        report.sub_accounts,
        report.duration_ms
    );
    println!();

    if snapshot.is_empty() {
        println!("  No sub-accounts are bound to this account");
        return Ok(());
    }

    print_snapshot_table(&snapshot);
    print_notices(&snapshot);

    Ok(())
}

fn print_snapshot_table(snapshot: &Snapshot) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Sub-account").fg(comfy_table::Color::Cyan),
            Cell::new(format!("Water ({})", BALANCE_UNIT)).fg(comfy_table::Color::Cyan),
            Cell::new(format!("Gas ({})", BALANCE_UNIT)).fg(comfy_table::Color::Cyan),
            Cell::new(format!("Notices ({})", NOTICE_UNIT)).fg(comfy_table::Color::Cyan),
        ]);

    for (name, record) in snapshot {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(record.water_balance.as_deref().unwrap_or("-")),
            Cell::new(record.gas_balance.as_deref().unwrap_or("-")),
            Cell::new(record.notice_count().to_string()),
        ]);
    }

    println!("{}", table);
}

fn print_notices(snapshot: &Snapshot) {
    for (name, record) in snapshot {
        if record.interruption_notices.is_empty() {
            continue;
        }

        println!();
        println!(
            "  {} {}",
            "Interruption notices for".yellow().bold(),
            name.yellow().bold()
        );
        for notice in &record.interruption_notices {
            println!(
                "    {} {} from {} to {}",
                "!".yellow(),
                notice.notice_type.as_deref().unwrap_or("停供"),
                notice.start_time.as_deref().unwrap_or("-"),
                notice.end_time.as_deref().unwrap_or("-")
            );
            if let Some(reason) = notice.reason.as_deref() {
                println!("      Reason: {}", reason);
            }
            if let Some(scope) = notice.scope.as_deref() {
                println!("      Scope:  {}", scope);
            }
        }
    }
}

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pptee_application::AppContext;
use pptee_core::history::{HistoryFilter, InferenceRecord, InferenceStatus};
use pptee_core::security::{TeeState, TeeStatus};

fn status_label(status: InferenceStatus) -> colored::ColoredString {
    match status {
        InferenceStatus::Success => "success".green(),
        InferenceStatus::Failed => "failed".red(),
        InferenceStatus::Processing => "processing".yellow(),
    }
}

fn print_record(record: &InferenceRecord) {
    println!(
        "{}  {:<9} {:<10} {:>6} {:>5} tok  {}",
        record.timestamp.bright_black(),
        record.model.bold(),
        status_label(record.status),
        record.duration_label(),
        record.tokens_used,
        record.query
    );
}

pub async fn history(
    ctx: &AppContext,
    search: Option<String>,
    status: Option<String>,
    model: Option<String>,
) -> Result<ExitCode> {
    let filter = HistoryFilter {
        search,
        status: status.as_deref().map(str::parse).transpose()?,
        model,
    };
    let records = ctx.history.list(&filter).await?;
    let summary = ctx.history.summary(&filter).await?;

    for record in &records {
        print_record(record);
    }
    println!(
        "{} total, {} success, {} failed, {} processing ({:.1}% success), {} tokens",
        summary.total,
        summary.success.to_string().green(),
        summary.failed.to_string().red(),
        summary.processing.to_string().yellow(),
        summary.success_rate(),
        summary.total_tokens
    );
    Ok(ExitCode::SUCCESS)
}

pub async fn dashboard(ctx: &AppContext) -> Result<ExitCode> {
    let summary = ctx.dashboard.summary().await?;
    let environment = if summary.environment_ready {
        "ready".green()
    } else {
        "not ready".yellow()
    };
    println!("{} {}", "TEE environment:".bold(), environment);
    println!("{} {}", "Total inferences:".bold(), summary.total_inferences);
    println!("{}", "Per model:".bold());
    for usage in &summary.model_usage {
        println!("  {:<10} {}", usage.model_name, usage.inferences);
    }
    println!("{}", "Recent activity:".bold());
    for record in &summary.recent {
        print_record(record);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_tee(status: &TeeStatus) {
    let state = match status.state {
        TeeState::Active => "active".green(),
        TeeState::Checked => "checked".yellow(),
        TeeState::Inactive => "inactive".bright_black(),
    };
    let detail = status
        .capability
        .as_ref()
        .map(|c| format!("[{}] {}", c.supported_technologies().join(", "), c.notes))
        .unwrap_or_default();
    println!("  {:<11} {:<9} {}", status.target.display_name(), state, detail);
}

pub async fn security(ctx: &AppContext) -> Result<ExitCode> {
    let overview = ctx.security.overview().await?;

    println!("{}", "TEE status".bold());
    print_tee(&overview.device);
    print_tee(&overview.cloud);

    println!("{}", "Encryption".bold());
    for fact in overview.encryption {
        println!("  {:<22} {}", fact.label, fact.value);
    }

    println!("{}", "Data flow".bold());
    for stage in overview.data_flow {
        println!(
            "  {}. {:<15} {:<17} {}",
            stage.order,
            stage.location,
            stage.action.cyan(),
            stage.description.bright_black()
        );
    }
    Ok(ExitCode::SUCCESS)
}

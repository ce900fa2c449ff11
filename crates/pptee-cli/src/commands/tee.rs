use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pptee_application::AppContext;
use pptee_core::capability::CapabilityTarget;
use pptee_core::workflow::Workflow;
use pptee_execution::WorkflowEvent;
use tokio::sync::mpsc::UnboundedReceiver;

use super::WORKFLOW_FAILED;
use crate::render;

fn report_failure(workflow: &Workflow, retry: &str) -> ExitCode {
    println!(
        "{} {}",
        "Failed:".red().bold(),
        workflow.failure_message().unwrap_or("unknown error")
    );
    println!("{}", format!("Retry with `{}`.", retry).bright_black());
    ExitCode::from(WORKFLOW_FAILED)
}

pub async fn check_capability(
    ctx: &AppContext,
    events: &mut UnboundedReceiver<WorkflowEvent>,
    target: &str,
) -> Result<ExitCode> {
    let target: CapabilityTarget = target.parse()?;
    let report = render::drive(ctx.capability.check_capability(target), events).await?;

    match &report.result {
        Some(result) => {
            println!(
                "{} {} supports [{}] ({})",
                "Done:".green().bold(),
                target.display_name(),
                result.supported_technologies().join(", "),
                result.notes
            );
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(report_failure(
            &report.workflow,
            &format!("pptee check-capability {}", target.as_str()),
        )),
    }
}

pub async fn setup(
    ctx: &AppContext,
    events: &mut UnboundedReceiver<WorkflowEvent>,
) -> Result<ExitCode> {
    let report = render::drive(ctx.setup.run(), events).await?;
    if report.environment_ready {
        println!(
            "{} secure environment ready, models unlocked",
            "Done:".green().bold()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(report_failure(&report.workflow, "pptee setup"))
    }
}

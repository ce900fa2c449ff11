use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pptee_application::AppContext;
use pptee_core::catalog;
use pptee_core::conversation::MessageRole;
use pptee_core::settings::ServerSettings;
use pptee_execution::WorkflowEvent;
use tokio::sync::mpsc::UnboundedReceiver;

use super::WORKFLOW_FAILED;
use crate::render;

fn server_label(server: &ServerSettings) -> String {
    server.target().unwrap_or_else(|| "N/A".to_string())
}

pub async fn models(ctx: &AppContext) -> Result<ExitCode> {
    let session = ctx.session.require_authenticated().await?;
    for model in catalog::availability(&session) {
        let state = if model.locked {
            "locked".yellow()
        } else {
            "available".green()
        };
        println!(
            "{:<10} {:<10} {:<10} {}",
            model.id,
            model.name.bold(),
            model.provider,
            state
        );
        println!("           {}", model.description.bright_black());
    }
    let settings = ctx.settings.show().await?;
    println!(
        "{} {}",
        "Server:".bold(),
        server_label(&settings.server)
    );
    if !session.environment_ready {
        println!(
            "{}",
            "Models unlock once `pptee setup` has completed.".bright_black()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn infer(
    ctx: &AppContext,
    events: &mut UnboundedReceiver<WorkflowEvent>,
    model: &str,
    query: &str,
) -> Result<ExitCode> {
    let outcome = render::drive(ctx.inference.infer(model, query), events).await?;
    match outcome.response {
        Some(response) => {
            println!();
            println!("{}", response);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!(
                "{} {}",
                "Failed:".red().bold(),
                outcome.workflow.failure_message().unwrap_or("unknown error")
            );
            println!("{}", "Nothing was recorded; send the query again.".bright_black());
            Ok(ExitCode::from(WORKFLOW_FAILED))
        }
    }
}

pub async fn messages(ctx: &AppContext, model: &str) -> Result<ExitCode> {
    ctx.session.require_authenticated().await?;
    let messages = ctx.inference.messages(model).await?;
    if messages.is_empty() {
        println!("{}", "No messages yet.".bright_black());
    }
    for message in messages {
        let who = match message.role {
            MessageRole::User => "you".cyan().bold(),
            MessageRole::Assistant => model.bright_magenta().bold(),
        };
        println!("[{}] {}", who, message.timestamp.bright_black());
        println!("{}", message.content);
        if let Some(steps) = &message.steps {
            println!(
                "{}",
                format!("({} secure processing steps)", steps.len()).bright_black()
            );
        }
        println!();
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_label() {
        let mut server = ServerSettings::default();
        server.ip = "10.0.0.5".to_string();
        server.port = 9443;
        assert_eq!(server_label(&server), "10.0.0.5:9443");

        server.ip = String::new();
        assert_eq!(server_label(&server), "N/A");
    }
}

//! Command handlers.

use std::process::ExitCode;

use anyhow::Result;
use pptee_application::AppContext;
use pptee_execution::WorkflowEvent;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{Commands, SettingsAction};

pub mod inference;
pub mod reports;
pub mod session;
pub mod settings;
pub mod tee;

/// Exit code for a simulated workflow failure.
pub const WORKFLOW_FAILED: u8 = 2;

pub async fn dispatch(
    ctx: &AppContext,
    events: &mut UnboundedReceiver<WorkflowEvent>,
    command: Commands,
) -> Result<ExitCode> {
    match command {
        Commands::Login { email, password } => session::login(ctx, &email, &password).await,
        Commands::Logout => session::logout(ctx).await,
        Commands::Status => session::status(ctx).await,
        Commands::Screen { name } => session::screen(ctx, &name).await,
        Commands::CheckCapability { target } => tee::check_capability(ctx, events, &target).await,
        Commands::Setup => tee::setup(ctx, events).await,
        Commands::Models => inference::models(ctx).await,
        Commands::Infer { model, query } => inference::infer(ctx, events, &model, &query).await,
        Commands::Messages { model } => inference::messages(ctx, &model).await,
        Commands::History {
            search,
            status,
            model,
        } => reports::history(ctx, search, status, model).await,
        Commands::Dashboard => reports::dashboard(ctx).await,
        Commands::Security => reports::security(ctx).await,
        Commands::Settings { action } => match action {
            SettingsAction::Show => settings::show(ctx).await,
            SettingsAction::Set { key, value } => settings::set(ctx, &key, &value).await,
            SettingsAction::Reset => settings::reset(ctx).await,
        },
    }
}

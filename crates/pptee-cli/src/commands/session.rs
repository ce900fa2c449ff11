use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pptee_application::AppContext;
use pptee_core::capability::CapabilityTarget;
use pptee_core::session::{Access, Screen, SessionPhase};

fn phase_label(phase: SessionPhase) -> colored::ColoredString {
    match phase {
        SessionPhase::Idle => "logged out".bright_black(),
        SessionPhase::LoggedIn => "logged in, environment not ready".yellow(),
        SessionPhase::EnvReady => "logged in, environment ready".green(),
    }
}

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<ExitCode> {
    println!("{}", "Authenticating...".bright_black());
    let session = ctx.session.login(email, password).await?;
    println!("{} {}", "Logged in:".green(), email.trim());
    if !session.environment_ready {
        println!(
            "{}",
            "Run `pptee setup` to provision the TEE environment.".bright_black()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn logout(ctx: &AppContext) -> Result<ExitCode> {
    ctx.session.logout().await?;
    println!("{}", "Logged out.".green());
    Ok(ExitCode::SUCCESS)
}

pub async fn status(ctx: &AppContext) -> Result<ExitCode> {
    let session = ctx.session.status().await?;
    println!("Session: {}", phase_label(session.phase()));
    for target in [CapabilityTarget::Device, CapabilityTarget::Cloud] {
        match ctx.capability.stored(target).await? {
            Some(result) => println!(
                "{}: [{}] {}",
                target.display_name(),
                result.supported_technologies().join(", "),
                result.notes.bright_black()
            ),
            None => println!("{}: {}", target.display_name(), "not checked".bright_black()),
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn screen(ctx: &AppContext, name: &str) -> Result<ExitCode> {
    let screen: Screen = name.parse()?;
    match ctx.session.screen_access(screen).await? {
        Access::Granted => {
            println!("{} {}", screen, "accessible".green());
            Ok(ExitCode::SUCCESS)
        }
        Access::RedirectToLogin => {
            println!("{} {}", screen, "requires login (redirect to login)".yellow());
            Ok(ExitCode::FAILURE)
        }
        Access::RequiresSetup => {
            println!(
                "{} {}",
                screen,
                "requires a ready TEE environment (run `pptee setup`)".yellow()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

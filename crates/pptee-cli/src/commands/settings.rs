use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pptee_application::AppContext;
use pptee_core::settings::PlatformSettings;

fn print_settings(settings: &PlatformSettings) {
    for (key, value) in settings.entries() {
        println!("{:<34} {}", key, value);
    }
}

pub async fn show(ctx: &AppContext) -> Result<ExitCode> {
    print_settings(&ctx.settings.show().await?);
    Ok(ExitCode::SUCCESS)
}

pub async fn set(ctx: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    let settings = ctx.settings.set(key, value).await?;
    let current = settings
        .entries()
        .into_iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
        .unwrap_or_default();
    println!("{} {} = {}", "Saved:".green(), key, current);
    Ok(ExitCode::SUCCESS)
}

pub async fn reset(ctx: &AppContext) -> Result<ExitCode> {
    let settings = ctx.settings.reset().await?;
    println!("{}", "Settings restored to defaults.".green());
    print_settings(&settings);
    Ok(ExitCode::SUCCESS)
}

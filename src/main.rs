//! Dayflow CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use dayflow::cli::{Cli, Command, TemplatesCommand};
use dayflow::config::Config;
use dayflow::engine::{ScheduleEngine, ScheduleRequest};
use dayflow::llm;
use dayflow::prompts::PromptLoader;
use dayflow::templates::TemplateStore;

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Generate {
            input,
            output,
            pretty,
        } => cmd_generate(&config, &input, output.as_deref(), pretty).await,
        Command::Templates { command } => cmd_templates(&config, command),
    }
}

async fn cmd_generate(
    config: &Config,
    input: &PathBuf,
    output: Option<&std::path::Path>,
    pretty: bool,
) -> Result<()> {
    config.validate()?;

    let payload = fs::read_to_string(input)
        .context(format!("Failed to read payload from {}", input.display()))?;
    let request: ScheduleRequest =
        serde_json::from_str(&payload).context("Failed to parse request payload")?;

    let client = llm::create_client(&config.llm).context("Failed to create completion client")?;
    let store = Arc::new(TemplateStore::new(&config.templates.path));
    let loader = PromptLoader::new(".");
    let engine = ScheduleEngine::new(client, store, loader).with_tuning(config.engine.clone());

    let result = engine.generate(&request).await;
    info!(
        success = result.success,
        fallback_used = result.fallback_used,
        tasks = result.tasks.len(),
        "schedule generated"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match output {
        Some(path) => {
            fs::write(path, json).context(format!("Failed to write {}", path.display()))?
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_templates(config: &Config, command: TemplatesCommand) -> Result<()> {
    let store = TemplateStore::new(&config.templates.path);

    match command {
        TemplatesCommand::List => {
            let catalog = store.catalog();
            if catalog.templates.is_empty() {
                println!("No templates in {}", config.templates.path.display());
                return Ok(());
            }
            for template in &catalog.templates {
                println!(
                    "{}  subcategory={}  pattern={}  lines={}",
                    template.id,
                    template.subcategory,
                    template.ordering_pattern,
                    template.example.len()
                );
            }
        }
        TemplatesCommand::Refresh => {
            store.invalidate();
            let catalog = store.catalog();
            println!(
                "Reloaded {} templates from {}",
                catalog.templates.len(),
                config.templates.path.display()
            );
        }
    }

    Ok(())
}

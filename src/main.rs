mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use cropcal::{CropParameters, RotationPlan, SingleRotationCalendar};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let params = CropParameters::load(cli.crops.clone())
        .context("failed to load crop parameter defaults")?;

    match cli.command {
        Commands::Generate { plan, output } => {
            let plan = RotationPlan::from_yaml_file(&plan)
                .with_context(|| format!("failed to read rotation plan {plan:?}"))?;
            let rotation = plan.build(&params)?;
            tracing::info!(
                crops = rotation.crop_list().len(),
                "composed rotation calendar"
            );
            emit(rotation.to_yaml()?, output)?;
        }
        Commands::Rebase {
            calendar,
            year,
            output,
        } => {
            let mut calendar_doc = SingleRotationCalendar::from_yaml_file(&calendar)
                .with_context(|| format!("failed to read calendar {calendar:?}"))?;
            let base = calendar_doc.retrieve_year();
            calendar_doc.change_year(year)?;
            tracing::info!(?base, new_year = year, "rebased calendar");
            emit(calendar_doc.to_yaml()?, output)?;
        }
        Commands::Variety {
            calendar,
            set,
            output,
        } => {
            let mut calendar_doc = SingleRotationCalendar::from_yaml_file(&calendar)
                .with_context(|| format!("failed to read calendar {calendar:?}"))?;
            let previous = calendar_doc.retrieve_variety().map(str::to_string);
            calendar_doc.change_variety(&set);
            tracing::info!(?previous, new_variety = %set, "swapped variety");
            emit(calendar_doc.to_yaml()?, output)?;
        }
        Commands::Crops => {
            let yaml = serde_yaml::to_string(&params)?;
            print!("{yaml}");
        }
    }

    Ok(())
}

fn emit(yaml: String, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, yaml)
                .with_context(|| format!("failed to write {path:?}"))?;
            tracing::info!(path = %path.display(), "wrote calendar");
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

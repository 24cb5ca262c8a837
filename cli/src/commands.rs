use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pullgraph_core::context::ConfigError;
use pullgraph_core::{
    AppConfig, AppConfigExt, EncounterDefinition, LogDirectory, PullRecord, PullSegmenter,
    PullSummary,
};
use pullgraph_render::ChartRenderer;

use crate::report;

/// Per-run overrides on top of the stored configuration
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Directory containing the ACT network logs
    #[arg(short = 'd', long)]
    pub log_dir: Option<PathBuf>,

    /// Where to write the PNG chart
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML encounter definition to use instead of the built-in one
    #[arg(short, long)]
    pub encounter: Option<PathBuf>,

    /// Warn and continue when a log file can't be read
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Print every recorded pull and a per-phase summary
    #[arg(short, long)]
    pub list: bool,

    /// Don't render the chart
    #[arg(long)]
    pub no_chart: bool,

    /// Store the effective configuration as the new defaults
    #[arg(long)]
    pub write_config: bool,
}

impl RunArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.log_dir {
            config.log_directory = dir.display().to_string();
        }
        if let Some(output) = &self.output {
            config.output_path = output.display().to_string();
        }
        if self.skip_unreadable {
            config.skip_unreadable_files = true;
        }
    }
}

pub fn run(args: &RunArgs) -> anyhow::Result<()> {
    let config = AppConfig::load();
    execute(args, config, |config| {
        config.save()?;
        if let Some(path) = AppConfig::config_path() {
            println!("Configuration written to {}", path.display());
        }
        Ok(())
    })?;
    Ok(())
}

/// Run with an already loaded configuration.
///
/// `store` persists the effective configuration when `--write-config` is set.
pub fn execute<F>(
    args: &RunArgs,
    mut config: AppConfig,
    store: F,
) -> anyhow::Result<Vec<PullRecord>>
where
    F: FnOnce(&AppConfig) -> Result<(), ConfigError>,
{
    args.apply(&mut config);

    if args.write_config {
        store(&config).context("failed to save configuration")?;
    }

    let definition = match &args.encounter {
        Some(path) => EncounterDefinition::load_from_file(path).with_context(|| {
            format!("failed to load encounter definition {}", path.display())
        })?,
        None => EncounterDefinition::default(),
    };

    let log_dir = PathBuf::from(&config.log_directory);
    let directory = LogDirectory::scan(&log_dir)
        .with_context(|| format!("failed to list log directory {}", log_dir.display()))?;

    println!("Now reading from folder \"{}\"", log_dir.display());
    println!("------------------------------");

    let pulls = collect_pulls(&directory, definition, config.skip_unreadable_files)?;

    if args.list {
        print!("{}", report::pull_table(&pulls, &config.chart));
        print!(
            "{}",
            report::summary(&PullSummary::from_pulls(&pulls), &config.chart)
        );
    }

    if args.no_chart {
        println!("Parsing done! {} pulls recorded", pulls.len());
        return Ok(pulls);
    }

    let output = PathBuf::from(&config.output_path);
    ChartRenderer::new(config.chart)
        .save_png(&pulls, &output)
        .with_context(|| format!("failed to render chart to {}", output.display()))?;

    println!("Parsing done! Graph output to '{}'", output.display());
    Ok(pulls)
}

/// Feed every file of `directory` through one segmenter, in order.
pub fn collect_pulls(
    directory: &LogDirectory,
    definition: EncounterDefinition,
    skip_unreadable: bool,
) -> anyhow::Result<Vec<PullRecord>> {
    let total = directory.len();
    let mut segmenter = PullSegmenter::new(definition)?;
    let mut pulls = Vec::new();

    for entry in directory.entries() {
        match entry.read() {
            Ok(file) => {
                for line in file.into_sourced_lines() {
                    if let Some(pull) = segmenter.process(&line)? {
                        pulls.push(pull);
                    }
                }
            }
            Err(e) if skip_unreadable => {
                tracing::warn!(file = %entry.filename, error = %e, "Skipping unreadable log file");
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read log file {}", entry.path.display())));
            }
        }

        println!("Reading log {} of {}", entry.file_index, total);
    }

    let emitted = segmenter.finish();
    tracing::info!(files = total, pulls = emitted, "Segmentation complete");
    Ok(pulls)
}

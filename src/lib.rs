//! doppler-speed - vehicle speed estimation from Doppler-shifted engine noise.
//!
//! Audio is reduced to a per-frame dominant pitch and intensity series,
//! segmented into vehicle passages, and each passage's approach/recede pitch
//! asymmetry is converted to a speed.

#![warn(missing_docs)]

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod frames;
pub mod output;
pub mod pipeline;
pub mod utils;

use analysis::AnalysisSettings;
use clap::{CommandFactory, Parser};
use cli::{AnalyzeArgs, Cli, Command};
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use pipeline::{
    ProcessCheck, ProcessOptions, collect_input_files, output_dir_for, process_file,
    should_process,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the doppler-speed CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = resolve_config(&cli.analyze, load_default_config()?);
    validate_config(&config)?;

    analyze_files(&cli.inputs, &cli.analyze, &config)
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn resolve_config(args: &AnalyzeArgs, mut config: Config) -> Config {
    if let Some(formats) = &args.format {
        config.defaults.formats.clone_from(formats);
    }
    if args.no_csv_bom {
        config.defaults.csv_bom = false;
    }
    if let Some(speed) = args.speed_of_sound {
        config.analysis.speed_of_sound = speed;
    }
    if let Some(sigma) = args.threshold_sigma {
        config.analysis.threshold_sigma = sigma;
    }
    if let Some(rate) = args.sample_rate {
        config.extraction.sample_rate = rate;
    }
    if let Some(rate) = args.frame_rate {
        config.extraction.frame_rate = rate;
    }
    config
}

/// Analyze input files with the given options.
fn analyze_files(inputs: &[PathBuf], args: &AnalyzeArgs, config: &Config) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidInputFiles);
    }
    if args.stdout && files.len() != 1 {
        return Err(Error::StdoutRequiresSingleInput { found: files.len() });
    }

    info!("Found {} input file(s) to process", files.len());

    let settings = AnalysisSettings::from(&config.analysis);
    info!(
        "Speed of sound {} m/s, threshold mean + {}σ",
        settings.speed_of_sound, settings.threshold_sigma
    );

    let options = ProcessOptions {
        output_dir: args.output_dir.clone(),
        formats: config.defaults.formats.clone(),
        force: args.force,
        csv_bom: config.defaults.csv_bom,
        stdout: args.stdout,
    };

    let progress_enabled = !args.quiet && !args.no_progress && !args.stdout;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_estimates = 0;
    let mut total_events = 0;

    for file in &files {
        let file_output_dir = output_dir_for(file, options.output_dir.as_deref());
        progress::set_current_file(file_progress.as_ref(), file);

        if !options.stdout {
            if should_process(file, &file_output_dir, &options.formats, options.force)
                == ProcessCheck::SkipExists
            {
                info!("Skipping (output exists): {}", file.display());
                skipped += 1;
                progress::inc_progress(file_progress.as_ref());
                continue;
            }

            std::fs::create_dir_all(&file_output_dir).map_err(|e| {
                Error::OutputDirCreateFailed {
                    path: file_output_dir.clone(),
                    source: e,
                }
            })?;
        }

        match process_file(file, &file_output_dir, &options, &settings, &config.extraction) {
            Ok(result) => {
                processed += 1;
                total_estimates += result.estimates;
                total_events += result.events;
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} passages, {} speed estimates in {:.2}s",
        processed, skipped, errors, total_events, total_estimates, total_duration
    );

    if errors > 0 {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Logs stay off stdout so `--stdout` output can be piped.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            print!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

use std::{path::PathBuf, process::ExitCode};

use anyhow::Error;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::{
    configuration::{Config, create_default_config, get_config_path, initialize_configuration},
    errors::InstallError,
    processors::{
        assets::relocate::relocate_assets,
        icon::{install::install_icon, resizer::resizer_for, structs::InstallReport},
    },
};

mod configuration;
mod errors;
mod processors;
mod utils;

const EXIT_NO_CANDIDATE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root holding the manifest and source images
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to extpack.toml in the project root)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize the first image in the project root into the extension icon and point the
    /// manifest at it (default)
    Icon,
    /// Copy the named logo images into the assets directory under their packaged names
    Assets,
    /// Write the default configuration file
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = utils::init_tracing(cli.debug);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            debug!(error = ?e, "extpack failed");
            eprintln!("❌ {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    match cli.command.as_ref().unwrap_or(&Commands::Icon) {
        Commands::Icon => {
            let config = initialize_configuration(&cli.root, cli.config.as_deref())?;
            Ok(run_icon(cli, &config))
        }
        Commands::Assets => {
            let config = initialize_configuration(&cli.root, cli.config.as_deref())?;
            run_assets(cli, &config)
        }
        Commands::Init => {
            let config_path = get_config_path(&cli.root, cli.config.as_deref());
            match create_default_config(&config_path) {
                Ok(_) => {
                    println!("📁 Default configuration written to {}", config_path.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Failed to write configuration: {}", e);
                    Ok(ExitCode::from(EXIT_FAILURE))
                }
            }
        }
    }
}

/// 0 when the icon and manifest are both done, 1 when there was nothing to
/// install, 2 for everything else.
fn exit_code(outcome: &Result<InstallReport, InstallError>) -> u8 {
    match outcome {
        Ok(report) if report.is_complete() => 0,
        Ok(_) => EXIT_FAILURE,
        Err(InstallError::NoCandidateFound { .. }) => EXIT_NO_CANDIDATE,
        Err(_) => EXIT_FAILURE,
    }
}

fn run_icon(cli: &Cli, config: &Config) -> ExitCode {
    let resizer = resizer_for(&config.icon);
    debug!(resizer = %config.icon.resizer, root = %cli.root.display(), "installing icon");

    let outcome = install_icon(&cli.root, &config.icon, resizer.as_ref());

    match &outcome {
        Ok(report) => {
            println!("🖼️  Found image: {}", report.candidate.display());
            println!(
                "✅ Icon resized to {size}x{size}: {}",
                report.icon.display(),
                size = config.icon.size
            );

            match &report.manifest_result {
                Ok(()) => println!("✅ Updated {}", report.manifest.display()),
                Err(e) => {
                    eprintln!("⚠️  Icon written, but the manifest was not updated: {}", e)
                }
            }
        }
        Err(e) => {
            debug!(error = ?e, "icon installation failed");
            eprintln!("❌ {}", e);
        }
    }

    ExitCode::from(exit_code(&outcome))
}

fn run_assets(cli: &Cli, config: &Config) -> Result<ExitCode, Error> {
    let report = relocate_assets(&cli.root, &config.assets)?;

    for destination in &report.copied {
        println!("✅ Copied {}", destination.display());
    }
    for source in &report.missing {
        eprintln!("⚠️  {} not found", source.display());
    }

    println!();
    println!("📁 Files in {}/:", config.assets.directory.display());
    for name in &report.pngs {
        println!("  • {}", name);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ManifestError, ResizeError};

    fn report(manifest_result: Result<(), ManifestError>) -> InstallReport {
        InstallReport {
            candidate: PathBuf::from("logo.png"),
            icon: PathBuf::from("assets/icon.png"),
            manifest: PathBuf::from("package.json"),
            manifest_result,
        }
    }

    #[test]
    fn complete_run_exits_zero() {
        assert_eq!(exit_code(&Ok(report(Ok(())))), 0);
    }

    #[test]
    fn missing_candidate_exits_one() {
        let outcome = Err(InstallError::NoCandidateFound {
            root: PathBuf::from("."),
        });

        assert_eq!(exit_code(&outcome), 1);
    }

    #[test]
    fn resize_failure_exits_two() {
        let outcome = Err(InstallError::ImageProcessing {
            input: PathBuf::from("logo.png"),
            source: ResizeError::Io(std::io::Error::other("tool crashed")),
        });

        assert_eq!(exit_code(&outcome), 2);
    }

    #[test]
    fn manifest_failure_after_icon_exits_two() {
        let outcome = Ok(report(Err(ManifestError::Parse {
            path: PathBuf::from("package.json"),
            reason: "EOF while parsing an object".to_string(),
        })));

        assert_eq!(exit_code(&outcome), 2);
    }

    #[test]
    fn no_subcommand_defaults_to_icon() {
        let cli = Cli::try_parse_from(["extpack"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }
}

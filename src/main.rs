// src/main.rs

mod cli;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use pkgforge::manifest::PackageManifest;
use pkgforge::output::{write_package, OutputTarget};
use pkgforge::{Package, PackageFormat};
use tracing::info;

use cli::{BuildConfig, Cli, Commands};

/// Invalid input: bad arguments, unreadable manifest or failed validation
const EXIT_INVALID_INPUT: u8 = 1;
/// Building or writing the package failed
const EXIT_BUILD_FAILED: u8 = 2;

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and go to stdout
            let code = if e.use_stderr() { EXIT_INVALID_INPUT } else { 0 };
            if let Err(err) = e.print() {
                eprintln!("!! {}", err);
            }
            return ExitCode::from(code);
        }
    };

    match cli.command {
        Commands::Build {
            manifest,
            format,
            output,
            force,
            suggest_filename,
            ..
        } => {
            let config = BuildConfig::from_args(manifest, format, output, force, suggest_filename);
            run_build(&config)
        }
        Commands::Formats => {
            for format in PackageFormat::ALL {
                println!("{}", format);
            }
            ExitCode::SUCCESS
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pkgforge", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
    }
}

fn run_build(config: &BuildConfig) -> ExitCode {
    let pkg = match load_package(config.manifest.as_deref()) {
        Ok(pkg) => pkg,
        Err(e) => {
            show_error(&e);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let generator = config.format.generator();
    let errors = pkg.validate(generator.as_ref());
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("!! {}", error);
        }
        return ExitCode::from(EXIT_INVALID_INPUT);
    }

    let file_name = generator.recommended_file_name(&pkg);
    if config.suggest_filename {
        println!("{}", file_name);
        return ExitCode::SUCCESS;
    }

    let result = pkg
        .build(generator.as_ref(), true)
        .with_context(|| format!("cannot build {}", file_name))
        .and_then(|data| {
            let target = config
                .output
                .clone()
                .unwrap_or_else(|| OutputTarget::File(file_name.clone().into()));
            write_package(&target, &data, config.force)
                .with_context(|| format!("cannot write {}", file_name))
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            show_error(&e);
            ExitCode::from(EXIT_BUILD_FAILED)
        }
    }
}

/// Read the manifest from `path`, or from stdin without one
fn load_package(path: Option<&Path>) -> Result<Package> {
    let manifest = match path {
        Some(path) => {
            info!("Reading manifest: {}", path.display());
            PackageManifest::from_file(path)
                .with_context(|| format!("cannot read {}", path.display()))?
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("cannot read manifest from standard input")?;
            let mut manifest = PackageManifest::parse(&content)?;
            manifest.base_dir = Some(".".into());
            manifest
        }
    };

    Ok(manifest.into_package()?)
}

fn show_error(error: &anyhow::Error) {
    eprintln!("!! {:#}", error);
}

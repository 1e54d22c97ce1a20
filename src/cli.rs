// src/cli.rs
//! CLI definitions for pkgforge
//!
//! Arguments are parsed with clap and turned into a [`BuildConfig`]; the
//! command itself lives in `main.rs`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pkgforge::PackageFormat;
use pkgforge::output::OutputTarget;

#[derive(Parser)]
#[command(name = "pkgforge")]
#[command(version)]
#[command(about = "Build Debian, pacman and RPM packages from a single manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a package from a manifest
    Build {
        /// Path to the package manifest (reads standard input if omitted or "-")
        manifest: Option<PathBuf>,

        /// Output format: debian, pacman or rpm
        #[arg(short = 'F', long)]
        format: PackageFormat,

        /// Output file, or "-" for standard output (default: the recommended file name)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        /// Deprecated, no effect: builds are always reproducible
        #[arg(long, hide = true)]
        reproducible: bool,

        /// Deprecated, no effect
        #[arg(long, hide = true)]
        no_reproducible: bool,

        /// Only print the recommended file name for this package
        #[arg(long)]
        suggest_filename: bool,
    },

    /// List the supported package formats
    Formats,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Everything a build run needs, resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// `None` reads the manifest from standard input
    pub manifest: Option<PathBuf>,
    pub format: PackageFormat,
    /// `None` writes to the recommended file name
    pub output: Option<OutputTarget>,
    pub force: bool,
    pub suggest_filename: bool,
}

impl BuildConfig {
    pub fn from_args(
        manifest: Option<PathBuf>,
        format: PackageFormat,
        output: Option<String>,
        force: bool,
        suggest_filename: bool,
    ) -> Self {
        Self {
            manifest: manifest.filter(|p| p.as_os_str() != "-"),
            format,
            output: output.as_deref().map(OutputTarget::from_arg),
            force,
            suggest_filename,
        }
    }
}

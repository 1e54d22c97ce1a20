// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("pkgforge")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Conary Contributors")
        .about("Build Debian, pacman and RPM packages from a single manifest")
        .subcommand_required(true)
        .subcommand(
            Command::new("build")
                .about("Build a package from a manifest")
                .arg(Arg::new("manifest").help("Path to the package manifest (reads standard input if omitted or \"-\")"))
                .arg(
                    Arg::new("format")
                        .short('F')
                        .long("format")
                        .required(true)
                        .value_parser(["debian", "deb", "pacman", "arch", "rpm"])
                        .help("Output format"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output file, or \"-\" for standard output"),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .action(clap::ArgAction::SetTrue)
                        .help("Overwrite an existing output file"),
                )
                .arg(
                    Arg::new("reproducible")
                        .long("reproducible")
                        .action(clap::ArgAction::SetTrue)
                        .hide(true),
                )
                .arg(
                    Arg::new("no_reproducible")
                        .long("no-reproducible")
                        .action(clap::ArgAction::SetTrue)
                        .hide(true),
                )
                .arg(
                    Arg::new("suggest_filename")
                        .long("suggest-filename")
                        .action(clap::ArgAction::SetTrue)
                        .help("Only print the recommended file name for this package"),
                ),
        )
        .subcommand(Command::new("formats").about("List the supported package formats"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pkgforge.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}

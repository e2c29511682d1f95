// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - project automation
//!
//! `cargo xtask ci` runs the same lint, build and test sequence as CI.
//! `cargo xtask init-db` creates a `SQLite` database file with the schema
//! applied and the reference data from a seed file loaded, ready for
//! `signalements-server --database`.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    io,
    path::{Path, PathBuf},
    process::Output,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use duct::cmd;
use signalements_persistence::{Persistence, Seed, SeedSummary};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const DEFAULT_SEED: &str = "data/seed.json";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, seed check, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Load a seed file into a scratch in-memory database
    #[command(visible_alias = "cs")]
    CheckSeed {
        /// Seed file to check
        #[arg(long, default_value = DEFAULT_SEED)]
        seed: PathBuf,
    },

    /// Create a database file and load reference data into it
    #[command(visible_alias = "db")]
    InitDb {
        /// Database file to create
        #[arg(long)]
        database: PathBuf,

        /// Seed file to load
        #[arg(long, default_value = DEFAULT_SEED)]
        seed: PathBuf,

        /// Replace the database file if it already exists
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Coverage => coverage(),
            Self::Deny => deny(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::CheckSeed { seed } => check_seed(&seed),
            Self::InitDb {
                database,
                seed,
                force,
            } => init_db(&database, &seed, force),
        }
    }
}

/// Run CI checks (lint, seed check, build, test)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    check_seed(Path::new(DEFAULT_SEED))?;
    build()?;
    test()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without warnings for every default package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Check for typos using [typos-cli](https://github.com/crate-ci/typos/)
///
/// French domain words (reponse, motif, collectivite) are listed in
/// `_typos.toml`.
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn test() -> Result<()> {
    test_libs()?;
    test_docs()?;
    Ok(())
}

fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Parses a seed file and loads it into an in-memory database.
///
/// This catches dangling references (an office member from another DDFIP, a
/// commune without a departement DDFIP) before anyone starts a server on it.
fn check_seed(seed_path: &Path) -> Result<()> {
    let seed: Seed = Seed::from_path(seed_path)
        .wrap_err_with(|| format!("failed to read seed {}", seed_path.display()))?;
    let mut persistence: Persistence =
        Persistence::new_in_memory().wrap_err("failed to open in-memory database")?;
    let summary: SeedSummary = persistence
        .load_seed(&seed)
        .wrap_err_with(|| format!("seed {} does not load", seed_path.display()))?;
    log_summary(seed_path, &summary);
    Ok(())
}

/// Creates a database file, applies migrations, and loads the seed.
fn init_db(database: &Path, seed_path: &Path, force: bool) -> Result<()> {
    if database.exists() {
        if !force {
            return Err(eyre!(
                "{} already exists; pass --force to replace it",
                database.display()
            ));
        }
        tracing::warn!("replacing existing database {}", database.display());
        std::fs::remove_file(database)
            .wrap_err_with(|| format!("failed to remove {}", database.display()))?;
    }

    let seed: Seed = Seed::from_path(seed_path)
        .wrap_err_with(|| format!("failed to read seed {}", seed_path.display()))?;
    let mut persistence: Persistence = Persistence::new_with_file(database)
        .wrap_err_with(|| format!("failed to create database {}", database.display()))?;
    let summary: SeedSummary = persistence
        .load_seed(&seed)
        .wrap_err_with(|| format!("failed to load seed into {}", database.display()))?;
    log_summary(seed_path, &summary);
    tracing::info!("database ready at {}", database.display());
    Ok(())
}

fn log_summary(seed_path: &Path, summary: &SeedSummary) {
    tracing::info!(
        "seed {}: {} communes, {} organizations, {} users, {} offices",
        seed_path.display(),
        summary.communes,
        summary.organizations,
        summary.users,
        summary.offices
    );
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}

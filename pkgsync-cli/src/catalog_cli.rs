//! pkgsync CLI commands
//!
//! Refreshes the catalog from configured sources, lists what is available,
//! installed or upgradable, and drives install/remove transitions.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use pkgsync_core::catalog::{
    Outcome, PackageAction, PackageDescriptor, PackageManager, TransitionReport,
};
use pkgsync_core::config::CatalogPaths;

use crate::hooks::{BookkeepingAction, CommandAction, HookKind};

#[derive(Subcommand, Debug)]
pub enum CatalogSubcommand {
    /// Fetch all sources and merge them into the local catalog
    Refresh,

    /// List packages in the local catalog
    Available {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List installed packages
    Installed {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List catalog packages newer than the installed ones
    Updates {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Install (or update) the catalog package at INDEX
    Install {
        /// Position in `pkgsync available`
        index: usize,

        /// Command that performs the install; receives the descriptor on stdin
        #[clap(long)]
        exec: Option<String>,
    },

    /// Remove the installed package at INDEX
    Remove {
        /// Position in `pkgsync installed`
        index: usize,

        /// Command that performs the removal; receives the descriptor on stdin
        #[clap(long)]
        exec: Option<String>,
    },

    /// Manage package sources
    Source {
        #[clap(subcommand)]
        command: SourceCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SourceCommand {
    /// Add a source URL (must serve a JSON array of packages)
    Add { url: String },

    /// List configured sources in priority order
    List,

    /// Remove a source URL
    Remove { url: String },
}

pub async fn execute(command: CatalogSubcommand, root: Option<PathBuf>) -> Result<()> {
    let paths = CatalogPaths::discover_with_override(root)?;
    let mut manager = PackageManager::open(&paths)
        .with_context(|| format!("Failed to open catalog at {}", paths.root.display()))?;

    match command {
        CatalogSubcommand::Refresh => execute_refresh(&mut manager).await,
        CatalogSubcommand::Available { json } => print_packages(
            manager.available_packages(),
            json,
            "No packages available. Run `pkgsync refresh` first.",
        ),
        CatalogSubcommand::Installed { json } => {
            print_packages(manager.installed_packages(), json, "No packages installed.")
        }
        CatalogSubcommand::Updates { json } => {
            let updates = manager
                .updated_packages()
                .context("Failed to compare installed versions with the catalog")?;
            print_packages(&updates, json, "All installed packages are up to date.")
        }
        CatalogSubcommand::Install { index, exec } => {
            let mut action = build_action(exec.as_deref(), HookKind::Install, &manager)?;
            let report = manager.install_package(index, action.as_mut());
            finish_transition(&manager, report)
        }
        CatalogSubcommand::Remove { index, exec } => {
            let mut action = build_action(exec.as_deref(), HookKind::Remove, &manager)?;
            let report = manager.remove_package(index, action.as_mut());
            finish_transition(&manager, report)
        }
        CatalogSubcommand::Source { command } => execute_source_command(&mut manager, command),
    }
}

async fn execute_refresh(manager: &mut PackageManager) -> Result<()> {
    if manager.sources().is_empty() {
        println!("No sources configured. Add one with `pkgsync source add <url>`.");
    } else {
        println!("Fetching {} source(s)...", manager.sources().urls().len());
    }

    let summary = manager.refresh().await?;

    println!(
        "Catalog refreshed: {} package(s) (was {})",
        summary.current_len, summary.previous_len
    );
    Ok(())
}

fn execute_source_command(manager: &mut PackageManager, command: SourceCommand) -> Result<()> {
    match command {
        SourceCommand::Add { url } => {
            manager.sources_mut().add(&url)?;
            manager.sources().save()?;
            println!("Added source {url}");
        }
        SourceCommand::List => {
            if manager.sources().is_empty() {
                println!("No sources configured.");
            } else {
                println!("Configured sources (highest priority first):\n");
                for (i, url) in manager.sources().urls().iter().enumerate() {
                    println!("  [{i}] {url}");
                }
            }
        }
        SourceCommand::Remove { url } => {
            manager.sources_mut().remove(&url)?;
            manager.sources().save()?;
            println!("Removed source {url}");
        }
    }

    Ok(())
}

fn build_action(
    exec: Option<&str>,
    kind: HookKind,
    manager: &PackageManager,
) -> Result<Box<dyn PackageAction>> {
    let installed = manager.installed_packages();
    Ok(match exec {
        Some(command) => Box::new(CommandAction::parse(command, kind, installed)?),
        None => Box::new(BookkeepingAction::new(kind, installed)),
    })
}

fn finish_transition(manager: &PackageManager, report: TransitionReport) -> Result<()> {
    if report.mutated() {
        manager.save_installed()?;
    }

    match report.outcome {
        Outcome::NotFound => match report.fault {
            Some(fault) => Err(anyhow::Error::new(fault).context("Package transition failed")),
            None => anyhow::bail!("Package not found"),
        },
        outcome => {
            println!("{outcome}");
            Ok(())
        }
    }
}

/// Table row for package listings
#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn print_packages(
    packages: &[PackageDescriptor],
    json_output: bool,
    empty_message: &str,
) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(packages)?);
        return Ok(());
    }

    if packages.is_empty() {
        println!("{empty_message}");
        return Ok(());
    }

    let rows: Vec<PackageRow> = packages
        .iter()
        .enumerate()
        .map(|(index, package)| {
            let desc = package
                .field("description")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let description = if desc.chars().count() > 50 {
                format!("{}...", desc.chars().take(47).collect::<String>())
            } else {
                desc.to_string()
            };

            PackageRow {
                index,
                name: package.name.clone(),
                version: package.version.clone(),
                description,
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
    Ok(())
}

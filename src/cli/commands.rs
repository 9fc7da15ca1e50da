//! Command dispatch
//!
//! Each handler loads inputs through the store, runs one service, and
//! writes the result to a file or stdout.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{CatalogMeta, DependencyNode, ListingEntry, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::IoResultExt;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Parse { text, json }) => cmd_parse(&container, text, *json),
        Some(Commands::Catalog { input, output }) => {
            cmd_catalog(&container, input, output.as_deref())
        }
        Some(Commands::Tree {
            listing,
            dept,
            course,
            format,
            output,
        }) => cmd_tree(
            &container,
            listing,
            dept.as_deref(),
            course.as_deref(),
            *format,
            output.as_deref(),
        ),
        Some(Commands::Merge {
            left,
            right,
            output,
        }) => cmd_merge(&container, left, right, output.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&container, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `prereqs --help`".to_string(),
        )),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().map_err(|e| {
            CliError::InvalidArgs(format!("cannot determine current directory: {e}"))
        }),
    }
}

#[instrument(skip(container))]
fn cmd_parse(container: &ServiceContainer, text: &str, json: bool) -> CliResult<()> {
    let result = container.catalog.parse_text(text);
    if json {
        output::info(&container.store.to_json(&result)?);
        return Ok(());
    }

    if !result.parseable {
        output::warning("no requirement");
        return Ok(());
    }
    match &result.ast {
        Some(ast) => output::action("prereq", ast),
        None => output::action("prereq", "none"),
    }
    for note in &result.notes {
        output::note(note);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_catalog(container: &ServiceContainer, input: &Path, out: Option<&Path>) -> CliResult<()> {
    let records = container.store.load_records(input)?;
    let entries = container.catalog.parse_records(records, &CatalogMeta::now())?;

    match out {
        Some(path) => {
            container.store.save(path, &entries)?;
            let summary = CatalogService::summarize(&entries);
            output::success(&format!("wrote {} courses to {}", summary.total, path.display()));
            output::detail(&format!(
                "{} parseable, {} with prerequisites, {} with notes",
                summary.parseable, summary.with_prereq, summary.with_notes
            ));
        }
        None => output::info(&container.store.to_json(&entries)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    listing: &Path,
    dept: Option<&str>,
    course: Option<&str>,
    format: TreeFormat,
    out: Option<&Path>,
) -> CliResult<()> {
    let courses = container.store.load_courses(listing)?;
    debug!("cmd_tree: {} courses in listing", courses.len());

    let trees: Vec<DependencyNode> = match course {
        Some(code) => vec![container.dependency.build_tree(&courses, code)],
        None => container.dependency.build_trees(&courses, dept),
    };

    let out: Option<PathBuf> = out
        .map(Path::to_path_buf)
        .or_else(|| dept.and_then(|d| container.dependency.department_output_path(d)));

    let rendered = match format {
        TreeFormat::Json => None,
        TreeFormat::Text => Some(trees.as_slice().to_tree_string().to_string()),
    };

    match (out, rendered) {
        (Some(path), None) => {
            container.store.save(&path, &trees)?;
            output::success(&format!("wrote {} trees to {}", trees.len(), path.display()));
        }
        (Some(path), Some(text)) => {
            container
                .fs
                .ensure_parent(&path)
                .with_output_context("create directory for", &path)?;
            container
                .fs
                .write(&path, &text)
                .with_output_context("write", &path)?;
            output::success(&format!("wrote {} trees to {}", trees.len(), path.display()));
        }
        (None, Some(text)) => print!("{text}"),
        (None, None) => output::info(&container.store.to_json(&trees)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_merge(
    container: &ServiceContainer,
    left: &Path,
    right: &Path,
    out: Option<&Path>,
) -> CliResult<()> {
    let meta = CatalogMeta::now();
    let envelopes = |entries: Vec<ListingEntry>| {
        entries
            .into_iter()
            .map(|entry| entry.into_envelope(&meta))
            .collect::<Vec<_>>()
    };
    let left = envelopes(container.store.load_listing(left)?);
    let right = envelopes(container.store.load_listing(right)?);

    let merged = container.merge.merge(left, right);

    match out {
        Some(path) => {
            container.store.save(path, &merged)?;
            output::success(&format!("wrote {} courses to {}", merged.len(), path.display()));
        }
        None => output::info(&container.store.to_json(&merged)?),
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "unavailable"),
            }
            output::action("local", &local_config_path(project_dir).display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .with_output_context("create directory for", &path)?;
            container
                .fs
                .write(&path, &Settings::template())
                .with_output_context("write", &path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Course prerequisite parser: requirement text to AND/OR trees, and
/// transitive dependency trees over a catalog
#[derive(Parser, Debug)]
#[command(name = "prereqs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one requirement string
    Parse {
        /// Requirement text, e.g. "CSE 12 and (CSE 15L or CSE 30)"
        text: String,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Batch-parse a listing of {code, title, raw_prereq} rows
    Catalog {
        /// JSON array of rows
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Expand courses into transitive dependency trees
    Tree {
        /// Parsed listing file, or directory of listing files
        #[arg(value_hint = ValueHint::AnyPath)]
        listing: PathBuf,
        /// Only expand courses of this department
        #[arg(long, conflicts_with = "course")]
        dept: Option<String>,
        /// Only expand this course
        #[arg(long)]
        course: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = TreeFormat::Json)]
        format: TreeFormat,
        /// Output file (default: <output.dir>/<DEPT>_tree.json with --dept, else stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Merge two parsed listings into one
    Merge {
        /// Preferred listing, wins on conflicts
        #[arg(value_hint = ValueHint::FilePath)]
        left: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        right: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Text,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

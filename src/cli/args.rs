//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organizational-unit hierarchy selector: ordered tree, search, cascading selection
#[derive(Parser, Debug)]
#[command(name = "unitsel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Units JSON document: {"units": [...]} (default: units_file setting)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/unitsel/unitsel.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the ordered unit tree
    Tree {
        /// Search query (keeps ancestors of matches, expands them)
        #[arg(short, long)]
        query: Option<String>,
        /// Unit ids to expand
        #[arg(short, long, value_delimiter = ',')]
        expand: Vec<i64>,
        /// Expand every unit with children
        #[arg(short = 'a', long, conflicts_with = "expand")]
        expand_all: bool,
    },

    /// List root units in chart order with their rank
    Roots,

    /// Show which units a query keeps visible
    Search {
        /// Search query
        query: String,
    },

    /// Select units and their subtrees
    Select {
        /// Unit ids to select
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
        /// Current selection
        #[arg(long, value_delimiter = ',')]
        current: Vec<i64>,
    },

    /// Deselect units and their subtrees
    Deselect {
        /// Unit ids to deselect
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
        /// Current selection
        #[arg(long, value_delimiter = ',')]
        current: Vec<i64>,
    },

    /// Select every unit
    SelectAll,

    /// Clear the selection
    Clear,

    /// Pick units interactively (skim), selecting their subtrees
    Pick {
        /// Restrict candidates to a search query
        #[arg(short, long)]
        query: Option<String>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config path
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

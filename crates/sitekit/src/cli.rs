//! Clap derive structures for the `sitekit` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitekit -- browse and edit site content from the command line
#[derive(Debug, Parser)]
#[command(
    name = "sitekit",
    version,
    about = "Browse and edit site content (blogs, projects, services) over the REST API",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SITEKIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "SITEKIT_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token for admin operations
    #[arg(long, env = "SITEKIT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "SITEKIT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SITEKIT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SITEKIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Effective output format once config defaults have been applied.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage blog posts
    #[command(alias = "blog", alias = "b")]
    Blogs(ResourceArgs),

    /// Manage portfolio projects
    #[command(alias = "project", alias = "pr")]
    Projects(ResourceArgs),

    /// Manage the service catalog
    #[command(alias = "service", alias = "svc")]
    Services(ResourceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resource commands ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List members, optionally filtered
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one member
    Get {
        /// Resource id
        id: String,

        /// Record a view (blogs only; failures are ignored)
        #[arg(long)]
        track_view: bool,
    },

    /// Create a member from a JSON payload
    Create(PayloadArgs),

    /// Update a member from a (partial) JSON payload
    Update {
        /// Resource id
        id: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Delete a member
    #[command(alias = "rm")]
    Delete {
        /// Resource id
        id: String,
    },
}

/// Search, filter, and pagination arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Status filter ("All Status" means none)
    #[arg(long)]
    pub status: Option<String>,

    /// Category filter ("All Categories" means none)
    #[arg(long)]
    pub category: Option<String>,

    /// Page to show (admin paging)
    #[arg(long, conflicts_with_all = ["pages", "all"])]
    pub page: Option<u32>,

    /// Items per page (defaults per collection)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,

    /// Load this many pages, appending each ("load more")
    #[arg(long, conflicts_with = "all", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Load every page
    #[arg(long)]
    pub all: bool,
}

/// JSON payload source for create/update.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Inline JSON payload
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Read the JSON payload from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (tokens masked)
    Show,

    /// Write a profile (named by --profile, default "default")
    Init {
        /// API base URL
        #[arg(long = "base-url", visible_alias = "api-url", value_name = "URL")]
        base_url: String,

        /// Environment variable holding the bearer token
        #[arg(long)]
        token_env: Option<String>,

        /// Make this profile the default
        #[arg(long)]
        make_default: bool,

        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

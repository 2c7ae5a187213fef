//! Clap derive structures for the `venntry` CLI.
//!
//! Also compiled by build.rs for man page generation, so this file may
//! only depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// venntry -- manage inventories, products and warehouses
#[derive(Debug, Parser)]
#[command(
    name = "venntry",
    version,
    about = "Manage Venntry inventories from the command line",
    long_about = "A client for the Venntry inventory service.\n\n\
        Log in once with `venntry auth login`; the session and the selected\n\
        inventory are kept in the data directory between runs.",
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
    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for the stored session and selection
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VENNTRY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

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
    /// Plain text, one value per line (scripting)
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
    /// Register, log in and out, inspect the session
    Auth(AuthArgs),

    /// Manage inventories and the current selection
    #[command(alias = "inv")]
    Inventories(InventoriesArgs),

    /// Manage products in the selected inventory
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// List product categories in the selected inventory
    Categories(CategoriesArgs),

    /// Manage warehouses in the selected inventory
    #[command(alias = "wh")]
    Warehouses(WarehousesArgs),

    /// Upload an image and print its URL and file key
    Upload(UploadArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(long, env = "VENNTRY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(long, env = "VENNTRY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the session, the selection and cached data
    Logout,

    /// Show the stored user and session
    Status,

    /// Verify the session with the server
    Check {
        /// Route to check access for
        #[arg(long, default_value = "/dashboard")]
        path: String,
    },

    /// Re-read the profile and inventory list from the server
    Refresh,
}

// ── Inventories ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventoriesArgs {
    #[command(subcommand)]
    pub command: InventoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoriesCommand {
    /// List your inventories
    #[command(alias = "ls")]
    List,

    /// Create an inventory
    Create {
        name: String,
        /// Make it the current inventory
        #[arg(long)]
        select: bool,
    },

    /// Rename an inventory
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },

    /// Delete an inventory and everything in it
    #[command(alias = "rm")]
    Delete { id: String },

    /// Make an inventory the current one
    Select { id: String },

    /// Show the current inventory
    Current,

    /// Clear the current selection
    Clear,
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Only products at or below their restock level
        #[arg(long)]
        low_stock: bool,
    },

    /// Show one product
    Get { id: String },

    /// Create a product
    Create(ProductFields),

    /// Replace a product's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub quantity: i64,
    #[arg(long, default_value_t = 0)]
    pub restock_level: i64,
    #[arg(long, default_value_t = 0)]
    pub optimal_level: i64,
    #[arg(long, default_value_t = 0.0)]
    pub cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,
    /// Category name (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Warehouse ID (repeatable)
    #[arg(long = "warehouse")]
    pub warehouses: Vec<String>,
    /// Image file to upload and attach (repeatable; the first is primary)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List,
}

// ── Warehouses ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WarehousesArgs {
    #[command(subcommand)]
    pub command: WarehousesCommand,
}

#[derive(Debug, Subcommand)]
pub enum WarehousesCommand {
    /// List warehouses
    #[command(alias = "ls")]
    List,

    /// Show one warehouse and its products
    Get { id: String },

    /// Create a warehouse
    Create(WarehouseFields),

    /// Replace a warehouse's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: WarehouseFields,
    },

    /// Delete a warehouse
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct WarehouseFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub capacity: Option<i64>,
}

// ── Upload ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Image file (jpeg, png, webp or gif; at most 1 MiB)
    pub file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file (prompts for values not given as flags)
    Init {
        /// Upload endpoint URL
        #[arg(long)]
        upload_url: Option<String>,
        /// development or production
        #[arg(long)]
        environment: Option<String>,
        /// Overwrite an existing file
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

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    form::form_model::{FieldSelector, RuleTable},
    lookup::annotator::ResponseOrdering,
};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "admin-form-assist",
    version,
    about = "Field visibility rules and stock/booking lookups for admin forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Collaborator base URL (serves /utils/...)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Append JSONL trace events to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: admin-form-assist.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the visibility rules to a form and print it
    Visibility {
        /// Discriminator value to select (omit for unset)
        #[arg(long)]
        value: Option<String>,

        /// YAML form layout (default: item stock request form)
        #[arg(long)]
        layout: Option<String>,

        /// Output format: console or html
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Select an item and show its stock annotation
    Stock {
        /// Item identifier
        #[arg(long)]
        item: String,

        /// Output format: console or html
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Select an item for a date range and show booking conflicts
    Bookings {
        /// Item identifier
        #[arg(long)]
        item: String,

        /// Range start, DD.MM.YYYY
        #[arg(long)]
        start: String,

        /// Range end, DD.MM.YYYY
        #[arg(long)]
        end: String,

        /// Output format: console or html
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Print the effective visibility rule table as YAML
    Rules,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `admin-form-assist.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub visibility: RuleTable,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub ordering: ResponseOrdering,

    #[serde(default = "default_stock_trigger")]
    pub stock_trigger: FieldSelector,

    #[serde(default = "default_booking_trigger")]
    pub booking_trigger: FieldSelector,

    #[serde(default = "default_start_date_field")]
    pub start_date_field: FieldSelector,

    #[serde(default = "default_end_date_field")]
    pub end_date_field: FieldSelector,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            ordering: ResponseOrdering::default(),
            stock_trigger: default_stock_trigger(),
            booking_trigger: default_booking_trigger(),
            start_date_field: default_start_date_field(),
            end_date_field: default_end_date_field(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_base_url() -> String { "http://localhost:8000".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_stock_trigger() -> FieldSelector { FieldSelector::id("id_item") }
fn default_booking_trigger() -> FieldSelector { FieldSelector::name_suffix("-item") }
fn default_start_date_field() -> FieldSelector { FieldSelector::name("start_date") }
fn default_end_date_field() -> FieldSelector { FieldSelector::name("end_date") }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("admin-form-assist.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring malformed config: {}", e);
            AppConfig::default()
        }
    }
}

/// Fold global CLI flags over the file config: CLI > config > defaults.
pub fn apply_cli_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(url) = &cli.base_url {
        config.collaborator.base_url = url.clone();
    }
    if let Some(path) = &cli.trace {
        config.trace.path = Some(path.clone());
    }
    config
}

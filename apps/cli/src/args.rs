//! Command-line arguments.

use clap::{Parser, Subcommand};
use prodcat_core::CatalogConfig;

#[derive(Debug, Parser)]
#[command(name = "prodcat", version, about = "Manage the financial product catalog")]
pub struct Cli {
    /// Product service origin (overrides PRODCAT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products, optionally filtered by name
    List {
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        page_size: Option<usize>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Create a product
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        logo: String,
        /// Release date, YYYY-MM-DD
        #[arg(long)]
        release: String,
    },
    /// Update an existing product; the id cannot change
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long)]
        release: Option<String>,
    },
    /// Delete a product after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Check whether a product id is already taken
    CheckId { id: String },
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut CatalogConfig) {
        if let Some(url) = self.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Command::List {
            page_size: Some(size),
            ..
        } = self.command
        {
            config.page_size = size.max(1);
        }
    }
}

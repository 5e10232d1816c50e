pub mod site_config;
pub mod storage;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use site_config::{CatalogSection, CompressionConfig, SiteConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "markify-pseo")]
#[command(about = "Generate Markify use-case pages from intent and industry catalogs")]
pub struct CliConfig {
    /// Path to a site configuration TOML file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Catalog TOML file, overriding the config file and the built-in catalog
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List allowed use-case routes. `--intent` / `--industry` list the
    /// allowed partners instead and take no paging or JSON flags.
    Routes {
        #[arg(long)]
        limit: Option<i64>,

        #[arg(long)]
        offset: Option<i64>,

        /// Only industries allowed for this intent
        #[arg(long, conflicts_with_all = ["industry", "limit", "offset", "json"])]
        intent: Option<String>,

        /// Only intents allowed for this industry
        #[arg(long, conflicts_with_all = ["limit", "offset", "json"])]
        industry: Option<String>,

        /// Print JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },

    /// Print the page model for one intent/industry pair as JSON
    Page { intent: String, industry: String },

    /// Write pages, routes.csv, sitemap.xml and manifest.json
    Export {
        #[arg(short, long)]
        output: Option<String>,

        #[arg(long)]
        limit: Option<i64>,

        #[arg(long)]
        offset: Option<i64>,

        /// Bundle everything into this ZIP file inside the output directory
        #[arg(long)]
        zip: Option<String>,

        /// Show what would be written without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration and catalog, then exit
    Validate,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// The file config (or defaults) with command-line overrides applied.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                SiteConfig::from_file(path)?
            }
            None => SiteConfig::default(),
        };

        if let Some(catalog) = &self.catalog {
            config.catalog = CatalogSection {
                path: Some(catalog.clone()),
            };
            // Command-line paths are relative to the working directory.
            config.config_dir = None;
        }

        if let Command::Export {
            output,
            limit,
            offset,
            zip,
            ..
        } = &self.command
        {
            if let Some(output) = output {
                config.output.path = output.clone();
            }
            if limit.is_some() {
                config.generation.limit = *limit;
            }
            if offset.is_some() {
                config.generation.offset = *offset;
            }
            if let Some(filename) = zip {
                config.output.compression = Some(CompressionConfig {
                    enabled: true,
                    filename: filename.clone(),
                });
            }
        }

        Ok(config)
    }
}

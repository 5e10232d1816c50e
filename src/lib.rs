pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{site_config::SiteConfig, storage::LocalStorage};
pub use core::{
    catalog::Catalog,
    engine::GenerationEngine,
    generator::{is_combination_allowed, seed_for, PageGenerator},
    pipeline::SitePipeline,
};
pub use domain::model::{Cta, Industry, Intent, PageModel, RouteEntry, RouteQuery};
pub use utils::error::{MarkifyError, Result};

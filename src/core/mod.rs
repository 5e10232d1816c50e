pub mod catalog;
pub mod engine;
pub mod generator;
pub mod pipeline;
pub mod sitemap;
pub mod template;

pub use crate::domain::model::{PageModel, RenderedSite, RouteEntry, RouteQuery};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

use crate::domain::model::{RenderedSite, RouteEntry, RouteQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn site_name(&self) -> &str;
    fn base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn route_query(&self) -> RouteQuery;
    fn sitemap_changefreq(&self) -> &str;
    fn sitemap_priority(&self) -> f32;
    /// Archive file name when the export is bundled, `None` for loose files.
    fn archive_name(&self) -> Option<&str>;

    fn wants_format(&self, format: &str) -> bool {
        self.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RouteEntry>>;
    async fn transform(&self, routes: Vec<RouteEntry>) -> Result<RenderedSite>;
    async fn load(&self, site: RenderedSite) -> Result<String>;
}

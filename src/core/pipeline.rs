use crate::core::generator::PageGenerator;
use crate::core::sitemap::{absolute_url, render_sitemap, SitemapEntry};
use crate::core::{ConfigProvider, Pipeline, RenderedSite, RouteEntry, Storage};
use crate::utils::error::{MarkifyError, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

pub const FORMAT_JSON: &str = "json";
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_SITEMAP: &str = "sitemap";
pub const OUTPUT_FORMATS: [&str; 3] = [FORMAT_JSON, FORMAT_CSV, FORMAT_SITEMAP];

const ROUTES_FILE: &str = "routes.csv";
const SITEMAP_FILE: &str = "sitemap.xml";
const MANIFEST_FILE: &str = "manifest.json";

/// Exports every allowed use-case page: page JSON, a route manifest CSV,
/// a sitemap and a run manifest.
pub struct SitePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) generator: Arc<PageGenerator>,
    pub(crate) generated_at: DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> SitePipeline<S, C> {
    pub fn new(storage: S, config: C, generator: Arc<PageGenerator>) -> Self {
        Self {
            storage,
            config,
            generator,
            generated_at: Utc::now(),
        }
    }

    /// Pins the timestamp written to `lastmod` and the manifest.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    fn render_routes_csv(&self, routes: &[RouteEntry]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(["intent", "industry", "path", "url"])?;
        for route in routes {
            let url = absolute_url(self.config.base_url(), &route.path);
            writer.write_record([
                route.intent.as_str(),
                route.industry.as_str(),
                route.path.as_str(),
                url.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| MarkifyError::ProcessingError {
                message: format!("Failed to flush routes CSV: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| MarkifyError::ProcessingError {
            message: format!("Routes CSV is not valid UTF-8: {}", e),
        })
    }

    fn render_sitemap(&self, routes: &[RouteEntry]) -> Result<String> {
        let lastmod = self.generated_at.date_naive();
        let entries: Vec<SitemapEntry> = routes
            .iter()
            .map(|route| SitemapEntry {
                loc: absolute_url(self.config.base_url(), &route.path),
                lastmod,
                changefreq: self.config.sitemap_changefreq().to_string(),
                priority: self.config.sitemap_priority(),
            })
            .collect();
        render_sitemap(&entries)
    }

    fn collect_files(&self, site: &RenderedSite) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        if self.config.wants_format(FORMAT_JSON) {
            for page in &site.pages {
                let name = format!("pages/{}/{}.json", page.intent.slug, page.industry.slug);
                files.push((name, serde_json::to_vec_pretty(page)?));
            }
        }
        if self.config.wants_format(FORMAT_CSV) {
            files.push((ROUTES_FILE.to_string(), site.routes_csv.clone().into_bytes()));
        }
        if self.config.wants_format(FORMAT_SITEMAP) {
            files.push((SITEMAP_FILE.to_string(), site.sitemap_xml.clone().into_bytes()));
        }
        files.push((
            MANIFEST_FILE.to_string(),
            serde_json::to_vec_pretty(&site.manifest)?,
        ));

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SitePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RouteEntry>> {
        let query = self.config.route_query();
        tracing::debug!(
            "Enumerating routes (limit: {:?}, offset: {:?})",
            query.limit,
            query.offset
        );
        Ok(self.generator.routes(query))
    }

    async fn transform(&self, routes: Vec<RouteEntry>) -> Result<RenderedSite> {
        let mut pages = Vec::with_capacity(routes.len());
        let mut built_routes = Vec::with_capacity(routes.len());

        for route in routes {
            match self.generator.page_for_slugs(&route.intent, &route.industry) {
                Some(page) => {
                    pages.push(page);
                    built_routes.push(route);
                }
                None => {
                    tracing::warn!("No page for route {}, skipping", route.path);
                }
            }
        }

        let routes_csv = self.render_routes_csv(&built_routes)?;
        let sitemap_xml = self.render_sitemap(&built_routes)?;
        let manifest = serde_json::json!({
            "site": self.config.site_name(),
            "baseUrl": self.config.base_url(),
            "generatedAt": self.generated_at.to_rfc3339(),
            "pageCount": pages.len(),
        });

        Ok(RenderedSite {
            pages,
            routes_csv,
            sitemap_xml,
            manifest,
        })
    }

    async fn load(&self, site: RenderedSite) -> Result<String> {
        let files = self.collect_files(&site)?;

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!("Creating ZIP archive with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP archive ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive_name));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::domain::model::RouteQuery;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                MarkifyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<String>,
        archive: Option<String>,
        query: RouteQuery,
    }

    impl MockConfig {
        fn loose() -> Self {
            Self {
                formats: OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
                archive: None,
                query: RouteQuery::default(),
            }
        }

        fn zipped() -> Self {
            Self {
                archive: Some("site.zip".to_string()),
                ..Self::loose()
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn site_name(&self) -> &str {
            "Markify"
        }

        fn base_url(&self) -> &str {
            "https://markify.test/"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn route_query(&self) -> RouteQuery {
            self.query
        }

        fn sitemap_changefreq(&self) -> &str {
            "weekly"
        }

        fn sitemap_priority(&self) -> f32 {
            0.7
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }
    }

    const CATALOG: &str = r#"
[[intents]]
slug = "bookmark-research"
title = "Research"
description = "Organize research"
primary_keyword = "research tool"
excluded_industries = ["legal"]

[[intents]]
slug = "team-wiki"
title = "Team wiki"
description = "Share what the team knows"
primary_keyword = "team wiki"

[[industries]]
slug = "academia"
name = "Academia"

[[industries]]
slug = "legal"
name = "Legal"
"#;

    fn pipeline(storage: MockStorage, config: MockConfig) -> SitePipeline<MockStorage, MockConfig> {
        let generator = Arc::new(PageGenerator::new(Catalog::from_toml_str(CATALOG).unwrap()));
        SitePipeline::new(storage, config, generator)
            .with_generated_at(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_extract_skips_excluded_pairs() {
        let pipeline = pipeline(MockStorage::new(), MockConfig::loose());

        let routes = pipeline.extract().await.unwrap();
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "/use-cases/bookmark-research/academia",
                "/use-cases/team-wiki/academia",
                "/use-cases/team-wiki/legal",
            ]
        );
    }

    #[tokio::test]
    async fn test_extract_honours_route_query() {
        let config = MockConfig {
            query: RouteQuery::limited(1).with_offset(1),
            ..MockConfig::loose()
        };
        let pipeline = pipeline(MockStorage::new(), config);

        let routes = pipeline.extract().await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/use-cases/team-wiki/academia");
    }

    #[tokio::test]
    async fn test_transform_renders_csv_sitemap_and_manifest() {
        let pipeline = pipeline(MockStorage::new(), MockConfig::loose());
        let routes = pipeline.extract().await.unwrap();

        let site = pipeline.transform(routes).await.unwrap();

        assert_eq!(site.pages.len(), 3);

        let csv_lines: Vec<&str> = site.routes_csv.lines().collect();
        assert_eq!(csv_lines.len(), 4);
        assert_eq!(csv_lines[0], "intent,industry,path,url");
        assert_eq!(
            csv_lines[1],
            "bookmark-research,academia,/use-cases/bookmark-research/academia,https://markify.test/use-cases/bookmark-research/academia"
        );

        assert_eq!(site.sitemap_xml.matches("<url>").count(), 3);
        assert!(site.sitemap_xml.contains("<lastmod>2026-10-16</lastmod>"));

        assert_eq!(site.manifest["pageCount"], 3);
        assert_eq!(site.manifest["site"], "Markify");
    }

    #[tokio::test]
    async fn test_transform_skips_unknown_routes() {
        let pipeline = pipeline(MockStorage::new(), MockConfig::loose());
        let routes = vec![RouteEntry {
            intent: "missing".to_string(),
            industry: "academia".to_string(),
            path: "/use-cases/missing/academia".to_string(),
        }];

        let site = pipeline.transform(routes).await.unwrap();

        assert!(site.pages.is_empty());
        assert_eq!(site.routes_csv.trim(), "intent,industry,path,url");
        assert_eq!(site.manifest["pageCount"], 0);
    }

    #[tokio::test]
    async fn test_load_writes_loose_files() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::loose());
        let routes = pipeline.extract().await.unwrap();
        let site = pipeline.transform(routes).await.unwrap();

        let output_path = pipeline.load(site).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert_eq!(
            storage.file_names().await,
            vec![
                "manifest.json",
                "pages/bookmark-research/academia.json",
                "pages/team-wiki/academia.json",
                "pages/team-wiki/legal.json",
                "routes.csv",
                "sitemap.xml",
            ]
        );

        let page: serde_json::Value = serde_json::from_slice(
            &storage
                .get_file("pages/team-wiki/legal.json")
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(page["title"], "Team wiki for Legal teams");
        assert_eq!(page["faqs"].as_array().unwrap().len(), 4);
        assert!(page.get("useCases").is_some());
    }

    #[tokio::test]
    async fn test_load_respects_formats() {
        let storage = MockStorage::new();
        let config = MockConfig {
            formats: vec![FORMAT_SITEMAP.to_string()],
            ..MockConfig::loose()
        };
        let pipeline = pipeline(storage.clone(), config);
        let routes = pipeline.extract().await.unwrap();
        let site = pipeline.transform(routes).await.unwrap();

        pipeline.load(site).await.unwrap();

        assert_eq!(
            storage.file_names().await,
            vec!["manifest.json", "sitemap.xml"]
        );
    }

    #[tokio::test]
    async fn test_load_bundles_zip_archive() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::zipped());
        let routes = pipeline.extract().await.unwrap();
        let site = pipeline.transform(routes).await.unwrap();

        let output_path = pipeline.load(site).await.unwrap();

        assert_eq!(output_path, "test_output/site.zip");
        assert_eq!(storage.file_names().await, vec!["site.zip"]);

        let zip_bytes = storage.get_file("site.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        assert_eq!(archive.len(), 6);

        let sitemap = {
            let mut file = archive.by_name("sitemap.xml").unwrap();
            let mut content = String::new();
            std::io::Read::read_to_string(&mut file, &mut content).unwrap();
            content
        };
        assert!(sitemap.contains("https://markify.test/use-cases/team-wiki/legal"));
    }
}

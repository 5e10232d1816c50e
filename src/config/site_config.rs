use crate::core::catalog::Catalog;
use crate::core::pipeline::OUTPUT_FORMATS;
use crate::core::sitemap::CHANGEFREQ_VALUES;
use crate::core::{ConfigProvider, RouteQuery};
use crate::utils::error::{MarkifyError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_range, validate_url,
    Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DEFAULT_CHANGEFREQ: &str = "weekly";
const DEFAULT_PRIORITY: f32 = 0.7;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub generation: GenerationSection,
    pub output: OutputSection,
    #[serde(default)]
    pub sitemap: SitemapSection,
    /// Directory of the file this config was read from; relative catalog
    /// paths resolve against it.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapSection {
    pub changefreq: Option<String>,
    pub priority: Option<f32>,
}

fn default_formats() -> Vec<String> {
    OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSection {
                name: "Markify".to_string(),
                base_url: "https://markify.app".to_string(),
            },
            catalog: CatalogSection::default(),
            generation: GenerationSection::default(),
            output: OutputSection {
                path: "./dist".to_string(),
                formats: default_formats(),
                compression: None,
            },
            sitemap: SitemapSection::default(),
            config_dir: None,
        }
    }
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with_env(content, |name| std::env::var(name).ok())
    }

    /// Parses with `${VAR}` resolved through `lookup` instead of the
    /// process environment.
    pub fn from_toml_str_with_env(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, lookup);

        toml::from_str(&processed_content).map_err(|e| MarkifyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the looked-up value; unset variables are
    /// left as written.
    fn substitute_env_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("site.name", &self.site.name)?;
        validate_url("site.base_url", &self.site.base_url)?;
        validate_path("output.path", &self.output.path)?;

        if let Some(path) = &self.catalog.path {
            validate_path("catalog.path", path)?;
        }

        for format in &self.output.formats {
            validate_one_of("output.formats", format, &OUTPUT_FORMATS)?;
        }

        if let Some(compression) = &self.output.compression {
            if compression.enabled {
                validate_path("output.compression.filename", &compression.filename)?;
            }
        }

        validate_one_of(
            "sitemap.changefreq",
            self.sitemap_changefreq(),
            &CHANGEFREQ_VALUES,
        )?;
        validate_range("sitemap.priority", self.sitemap_priority(), 0.0, 1.0)?;

        Ok(())
    }

    /// Loads the configured catalog, or the built-in one when none is set.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => {
                let resolved = match &self.config_dir {
                    Some(dir) if Path::new(path).is_relative() => dir.join(path),
                    _ => PathBuf::from(path),
                };
                tracing::info!("Loading catalog from: {}", resolved.display());
                Catalog::from_file(resolved)
            }
            None => {
                tracing::info!("Using built-in catalog");
                Catalog::builtin()
            }
        }
    }
}

impl ConfigProvider for SiteConfig {
    fn site_name(&self) -> &str {
        &self.site.name
    }

    fn base_url(&self) -> &str {
        &self.site.base_url
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn route_query(&self) -> RouteQuery {
        RouteQuery {
            limit: self.generation.limit,
            offset: self.generation.offset,
        }
    }

    fn sitemap_changefreq(&self) -> &str {
        self.sitemap
            .changefreq
            .as_deref()
            .unwrap_or(DEFAULT_CHANGEFREQ)
    }

    fn sitemap_priority(&self) -> f32 {
        self.sitemap.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_site_config() {
        let toml_content = r#"
[site]
name = "Markify"
base_url = "https://markify.app"

[generation]
limit = 25

[output]
path = "./out"
formats = ["json", "sitemap"]
compression = { enabled = true, filename = "pages.zip" }

[sitemap]
changefreq = "monthly"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.site_name(), "Markify");
        assert_eq!(config.output_path(), "./out");
        assert_eq!(config.route_query(), RouteQuery::limited(25));
        assert_eq!(config.archive_name(), Some("pages.zip"));
        assert_eq!(config.sitemap_changefreq(), "monthly");
        assert_eq!(config.sitemap_priority(), 0.7);
        assert!(config.wants_format("json"));
        assert!(!config.wants_format("csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_formats_default_to_everything() {
        let toml_content = r#"
[site]
name = "Markify"
base_url = "https://markify.app"

[output]
path = "./out"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_formats(), ["json", "csv", "sitemap"]);
        assert_eq!(config.archive_name(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        let toml_content = r#"
[site]
name = "Markify"
base_url = "${MARKIFY_BASE_URL}"

[output]
path = "${MARKIFY_OUTPUT_DIR}"
"#;

        let config = SiteConfig::from_toml_str_with_env(toml_content, |name| {
            (name == "MARKIFY_BASE_URL").then(|| "https://staging.markify.app".to_string())
        })
        .unwrap();

        assert_eq!(config.base_url(), "https://staging.markify.app");
        assert_eq!(config.output_path(), "${MARKIFY_OUTPUT_DIR}");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SiteConfig::default();
        assert!(config.validate().is_ok());

        config.site.base_url = "markify.app".to_string();
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.output.formats = vec!["tsv".to_string()];
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.sitemap.priority = Some(1.5);
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.sitemap.changefreq = Some("sometimes".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_catalog_path_resolves_against_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("catalog.toml"),
            r#"
[[intents]]
slug = "team-wiki"
title = "Team wiki"
description = "Share what the team knows"
primary_keyword = "team wiki"

[[industries]]
slug = "legal"
name = "Legal"
"#,
        )
        .unwrap();

        let config_path = dir.path().join("markify.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(
            br#"
[site]
name = "Markify"
base_url = "https://markify.app"

[catalog]
path = "catalog.toml"

[output]
path = "./out"
"#,
        )
        .unwrap();

        let config = SiteConfig::from_file(&config_path).unwrap();
        let catalog = config.load_catalog().unwrap();

        assert_eq!(catalog.intents().len(), 1);
        assert_eq!(catalog.industries()[0].name, "Legal");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[site]
name = "file-test"
base_url = "https://markify.app"

[output]
path = "./out"
"#,
            )
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.site.name, "file-test");
        assert!(config.load_catalog().is_ok());
    }
}

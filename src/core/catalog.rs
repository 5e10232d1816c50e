use crate::domain::model::{Industry, Intent};
use crate::utils::error::{MarkifyError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_slug};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.toml");

/// Trim and lowercase, the form every slug lookup compares against.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    intents: Vec<Intent>,
    #[serde(default)]
    industries: Vec<Industry>,
}

/// The read-only intent and industry lists, in catalog order, with a slug
/// index for each.
#[derive(Debug, Clone)]
pub struct Catalog {
    intents: Vec<Intent>,
    industries: Vec<Industry>,
    intent_index: HashMap<String, usize>,
    industry_index: HashMap<String, usize>,
}

impl Catalog {
    /// Slugs and exclusion entries are normalized before validation, so
    /// `" Legal "` loads as `legal` while `legal_tech` is still rejected.
    pub fn new(mut intents: Vec<Intent>, mut industries: Vec<Industry>) -> Result<Self> {
        for intent in &mut intents {
            intent.slug = normalize_slug(&intent.slug);
            normalize_all(&mut intent.excluded_industries);
        }
        for industry in &mut industries {
            industry.slug = normalize_slug(&industry.slug);
            normalize_all(&mut industry.excluded_intents);
        }

        let intent_index = build_index(
            "intent",
            intents.iter().map(|i| (i.slug.as_str(), i.title.as_str())),
        )?;
        let industry_index = build_index(
            "industry",
            industries.iter().map(|i| (i.slug.as_str(), i.name.as_str())),
        )?;

        let catalog = Self {
            intents,
            industries,
            intent_index,
            industry_index,
        };
        catalog.warn_on_dangling_exclusions();

        tracing::debug!(
            "Catalog loaded: {} intents, {} industries",
            catalog.intents.len(),
            catalog.industries.len()
        );
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| MarkifyError::ConfigValidationError {
                field: "catalog".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        Self::new(file.intents, file.industries)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// The catalog the Markify marketing site ships with.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    pub fn intent_by_slug(&self, slug: &str) -> Option<&Intent> {
        self.intent_index
            .get(&normalize_slug(slug))
            .map(|&idx| &self.intents[idx])
    }

    pub fn industry_by_slug(&self, slug: &str) -> Option<&Industry> {
        self.industry_index
            .get(&normalize_slug(slug))
            .map(|&idx| &self.industries[idx])
    }

    fn warn_on_dangling_exclusions(&self) {
        for intent in &self.intents {
            for excluded in &intent.excluded_industries {
                if self.industry_by_slug(excluded).is_none() {
                    tracing::warn!(
                        "Intent '{}' excludes unknown industry '{}'",
                        intent.slug,
                        excluded
                    );
                }
            }
        }
        for industry in &self.industries {
            for excluded in &industry.excluded_intents {
                if self.intent_by_slug(excluded).is_none() {
                    tracing::warn!(
                        "Industry '{}' excludes unknown intent '{}'",
                        industry.slug,
                        excluded
                    );
                }
            }
        }
    }
}

fn normalize_all(slugs: &mut [String]) {
    for slug in slugs {
        *slug = normalize_slug(slug);
    }
}

fn build_index<'a>(
    kind: &str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    let mut seen = HashSet::new();

    for (position, (slug, label)) in entries.enumerate() {
        validate_slug(&format!("{}.slug", kind), slug)?;
        validate_non_empty_string(&format!("{}.{}", kind, slug), label)?;

        let key = slug.to_string();
        if !seen.insert(key.clone()) {
            return Err(MarkifyError::DuplicateSlug {
                catalog: kind.to_string(),
                slug: key,
            });
        }
        index.insert(key, position);
    }

    Ok(index)
}

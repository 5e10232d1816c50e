use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cta {
    pub label: String,
    pub href: String,
}

impl Default for Cta {
    fn default() -> Self {
        Self {
            label: "Start free".to_string(),
            href: "/signup".to_string(),
        }
    }
}

/// A use-case template that gets crossed with every allowed industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Intent {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub workflow: Vec<String>,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub excluded_industries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
}

/// A vertical supplying the pain points, personas and metrics for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Industry {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub personas: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub excluded_intents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub intent: String,
    pub industry: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RouteQuery {
    pub fn limited(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub eyebrow: String,
    pub heading: String,
    pub subheading: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// One summary sentence. `index` is `seed + template position`; no current
/// template reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub text: String,
    pub index: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Related {
    pub intents: Vec<Intent>,
    pub industries: Vec<Industry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub intent: Intent,
    pub industry: Industry,
    pub path: String,
    pub title: String,
    pub description: String,
    pub hero: Hero,
    pub summary: Vec<SummaryItem>,
    pub benefits: Vec<Benefit>,
    pub workflow: Vec<String>,
    pub use_cases: Vec<UseCase>,
    pub faqs: Vec<Faq>,
    pub keywords: Vec<String>,
    pub related: Related,
    pub cta: Cta,
}

/// Everything the export pipeline produced, held in memory before it is
/// written out.
#[derive(Debug, Clone)]
pub struct RenderedSite {
    pub pages: Vec<PageModel>,
    pub routes_csv: String,
    pub sitemap_xml: String,
    pub manifest: serde_json::Value,
}

//! Deterministic use-case page generation.
//!
//! Every allowed `(intent, industry)` pair maps to exactly one [`PageModel`].
//! Content variants are chosen from a seed derived from the two slugs, so a
//! page never changes unless its own inputs change.

use crate::core::catalog::Catalog;
use crate::core::template;
use crate::domain::model::{
    Benefit, Faq, Hero, Industry, Intent, PageModel, Related, RouteEntry, RouteQuery,
    SummaryItem, UseCase,
};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_FAQ_COUNT: usize = 4;
pub const DEFAULT_RELATED_COUNT: usize = 3;

const BENEFIT_COUNT: u64 = 3;
const MAX_KEYWORDS: usize = 10;
const MAX_USE_CASES: usize = 6;

const FALLBACK_OUTCOME: &str = "Stay organized";
const FALLBACK_PAIN_POINT: &str = "scattered resources";
const FALLBACK_PERSONA: &str = "your team";
const FALLBACK_CONTENT_TYPE: &str = "key resources";
const FALLBACK_METRIC: &str = "team alignment";

const FAQ_TEMPLATES: [(&str, &str); 5] = [
    (
        "How do {industry} teams use Markify for {intent}?",
        "Most {industry} teams start by saving {contentType} into shared collections so {persona} can find them without asking around.",
    ),
    (
        "Can {persona} collaborate on {intent} in Markify?",
        "Yes. Invite {persona} to a collection, tag what matters, and everyone works from the same up-to-date {contentType}.",
    ),
    (
        "What should {industry} teams measure after switching?",
        "Teams usually track {metric} before and after moving {intent} into Markify to see the impact.",
    ),
    (
        "Is Markify secure enough for {industry}?",
        "Collections are private by default, and you decide which {persona} can view or edit each one.",
    ),
    (
        "How long does it take to set up {intent} for {industry}?",
        "Most teams import their existing {contentType} in under an hour and see better {metric} within a few weeks.",
    ),
];

const SUMMARY_TEMPLATES: [&str; 3] = [
    "{industry} teams use Markify to keep {intent} resources in one searchable place.",
    "Save, tag, and share links so {intent} never starts from a blank page.",
    "Give every {industry} stakeholder the same source of truth, from first draft to final review.",
];

/// 32-bit polynomial string hash (`h * 31 + unit` over UTF-16 code units,
/// wrapping), made non-negative. `i32::MIN` maps to `2^31`.
pub fn seed_for(intent_slug: &str, industry_slug: &str) -> u64 {
    let key = format!("{}:{}", intent_slug, industry_slug);
    let hash = key
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    u64::from(hash.unsigned_abs())
}

/// An industry may appear on an intent's page only if neither side excludes
/// the other.
pub fn is_combination_allowed(intent: &Intent, industry: &Industry) -> bool {
    !intent.excluded_industries.contains(&industry.slug)
        && !industry.excluded_intents.contains(&intent.slug)
}

fn pick<'a>(items: &'a [String], index: u64, fallback: &'a str) -> &'a str {
    if items.is_empty() {
        return fallback;
    }
    &items[(index % items.len() as u64) as usize]
}

/// First-occurrence order, exact-string dedupe, capped at `limit`.
fn unique_ordered<'a>(items: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(*item))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Drops `current`, left-rotates the rest by `seed % len` and keeps the
/// first `count`.
fn rotate_others<T: Clone>(
    items: &[T],
    current: &str,
    slug_of: impl Fn(&T) -> &str,
    seed: u64,
    count: usize,
) -> Vec<T> {
    let others: Vec<&T> = items.iter().filter(|item| slug_of(*item) != current).collect();
    if others.is_empty() {
        return Vec::new();
    }
    let offset = (seed % others.len() as u64) as usize;
    others[offset..]
        .iter()
        .chain(others[..offset].iter())
        .take(count)
        .map(|item| (*item).clone())
        .collect()
}

pub struct PageGenerator {
    catalog: Catalog,
}

impl PageGenerator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn intent_by_slug(&self, slug: &str) -> Option<&Intent> {
        self.catalog.intent_by_slug(slug)
    }

    pub fn industry_by_slug(&self, slug: &str) -> Option<&Industry> {
        self.catalog.industry_by_slug(slug)
    }

    pub fn is_combination_allowed(&self, intent: &Intent, industry: &Industry) -> bool {
        is_combination_allowed(intent, industry)
    }

    pub fn industries_for_intent(&self, intent_slug: &str) -> Vec<&Industry> {
        let Some(intent) = self.intent_by_slug(intent_slug) else {
            return Vec::new();
        };
        self.catalog
            .industries()
            .iter()
            .filter(|industry| is_combination_allowed(intent, industry))
            .collect()
    }

    pub fn intents_for_industry(&self, industry_slug: &str) -> Vec<&Intent> {
        let Some(industry) = self.industry_by_slug(industry_slug) else {
            return Vec::new();
        };
        self.catalog
            .intents()
            .iter()
            .filter(|intent| is_combination_allowed(intent, industry))
            .collect()
    }

    /// Lazily walks intents (outer) by industries (inner), skipping
    /// excluded pairs.
    pub fn route_iter(&self) -> impl Iterator<Item = RouteEntry> + '_ {
        self.catalog.intents().iter().flat_map(move |intent| {
            self.catalog
                .industries()
                .iter()
                .filter(move |industry| is_combination_allowed(intent, industry))
                .map(move |industry| RouteEntry {
                    intent: intent.slug.clone(),
                    industry: industry.slug.clone(),
                    path: page_path(intent, industry),
                })
        })
    }

    pub fn routes(&self, query: RouteQuery) -> Vec<RouteEntry> {
        let limit = match query.limit {
            Some(limit) if limit <= 0 => return Vec::new(),
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
            None => usize::MAX,
        };
        let offset = query
            .offset
            .map(|offset| usize::try_from(offset.max(0)).unwrap_or(usize::MAX))
            .unwrap_or(0);

        self.route_iter().skip(offset).take(limit).collect()
    }

    /// What a `/use-cases/{intent}/{industry}` handler calls; `None` maps to
    /// a 404.
    pub fn page_for_slugs(&self, intent_slug: &str, industry_slug: &str) -> Option<PageModel> {
        self.build_page(
            self.intent_by_slug(intent_slug),
            self.industry_by_slug(industry_slug),
        )
    }

    pub fn build_page(
        &self,
        intent: Option<&Intent>,
        industry: Option<&Industry>,
    ) -> Option<PageModel> {
        let (intent, industry) = (intent?, industry?);
        if !is_combination_allowed(intent, industry) {
            tracing::debug!(
                "Skipping excluded combination {} x {}",
                intent.slug,
                industry.slug
            );
            return None;
        }

        let seed = seed_for(&intent.slug, &industry.slug);
        let industry_lower = industry.name.to_lowercase();
        let intent_lower = intent.title.to_lowercase();

        let keyword_pair = [
            format!("{} for {}", intent.primary_keyword, industry_lower),
            format!("{} {}", industry_lower, intent_lower),
        ];
        let keywords = unique_ordered(
            keyword_pair
                .iter()
                .chain(&intent.keywords)
                .chain(&industry.keywords)
                .map(String::as_str),
            MAX_KEYWORDS,
        );

        let benefits = (0..BENEFIT_COUNT)
            .map(|i| {
                let outcome = pick(&intent.outcomes, seed + i, FALLBACK_OUTCOME);
                let pain_point = pick(&industry.pain_points, seed + i, FALLBACK_PAIN_POINT);
                Benefit {
                    title: outcome.to_string(),
                    description: format!(
                        "Reduce {} while keeping {} teams focused on {}.",
                        pain_point.to_lowercase(),
                        industry.name,
                        intent_lower
                    ),
                }
            })
            .collect();

        let workflow = intent
            .workflow
            .iter()
            .zip(0u64..)
            .map(|(step, i)| {
                let persona = pick(&industry.personas, seed + i, FALLBACK_PERSONA);
                format!("{} so {} stay aligned.", step, persona)
            })
            .collect();

        let use_cases = unique_ordered(
            intent
                .content_types
                .iter()
                .chain(&industry.content_types)
                .map(String::as_str),
            MAX_USE_CASES,
        )
        .into_iter()
        .map(|item| UseCase {
            description: format!(
                "Organize {} in shared collections built for {} teams.",
                item, industry_lower
            ),
            title: item,
        })
        .collect();

        let faqs = build_faqs(intent, industry, seed, &intent_lower);

        let summary = SUMMARY_TEMPLATES
            .iter()
            .zip(0u64..)
            .map(|(text, position)| {
                let index = seed + position;
                let tokens = HashMap::from([
                    ("industry", industry.name.clone()),
                    ("intent", intent_lower.clone()),
                    ("index", index.to_string()),
                ]);
                SummaryItem {
                    text: template::render(text, &tokens),
                    index,
                }
            })
            .collect();

        let hero = Hero {
            eyebrow: format!("{} use case", industry.name),
            heading: format!("{} for {} teams", intent.title, industry.name),
            subheading: format!(
                "{} Built for {} workflows that need speed, clarity, and shareable context.",
                intent.description, industry_lower
            ),
        };

        let related = Related {
            intents: rotate_others(
                self.catalog.intents(),
                &intent.slug,
                |i| i.slug.as_str(),
                seed,
                DEFAULT_RELATED_COUNT,
            ),
            industries: rotate_others(
                self.catalog.industries(),
                &industry.slug,
                |i| i.slug.as_str(),
                seed,
                DEFAULT_RELATED_COUNT,
            ),
        };

        Some(PageModel {
            path: page_path(intent, industry),
            title: format!("{} for {} teams", intent.title, industry.name),
            description: format!(
                "{} Built for {} teams that need a clear, searchable source of truth.",
                intent.description, industry_lower
            ),
            hero,
            summary,
            benefits,
            workflow,
            use_cases,
            faqs,
            keywords,
            related,
            cta: intent.cta.clone().unwrap_or_default(),
            intent: intent.clone(),
            industry: industry.clone(),
        })
    }
}

fn page_path(intent: &Intent, industry: &Industry) -> String {
    format!("/use-cases/{}/{}", intent.slug, industry.slug)
}

fn build_faqs(intent: &Intent, industry: &Industry, seed: u64, intent_lower: &str) -> Vec<Faq> {
    let content_types: Vec<String> = intent
        .content_types
        .iter()
        .chain(&industry.content_types)
        .cloned()
        .collect();

    let tokens = HashMap::from([
        ("industry", industry.name.clone()),
        ("intent", intent_lower.to_string()),
        (
            "persona",
            pick(&industry.personas, seed, FALLBACK_PERSONA).to_string(),
        ),
        (
            "contentType",
            pick(&content_types, seed, FALLBACK_CONTENT_TYPE).to_string(),
        ),
        (
            "metric",
            pick(&industry.metrics, seed, FALLBACK_METRIC).to_string(),
        ),
    ]);

    (0..DEFAULT_FAQ_COUNT as u64)
        .map(|i| {
            let slot = ((seed + i) % FAQ_TEMPLATES.len() as u64) as usize;
            let (question, answer) = FAQ_TEMPLATES[slot];
            Faq {
                question: template::render(question, &tokens),
                answer: template::render(answer, &tokens),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
    }

    #[test]
    fn test_seed_matches_polynomial_hash() {
        // "a:b" = ((97 * 31) + 58) * 31 + 98
        assert_eq!(seed_for("a", "b"), 95113);
        assert_eq!(seed_for("", ""), 58);
    }

    #[test]
    fn test_seed_matches_published_pages() {
        assert_eq!(
            seed_for("team-knowledge-base", "software-engineering"),
            1772615927
        );
    }

    #[test]
    fn test_seed_wraps_and_stays_non_negative() {
        let long = "z".repeat(64);
        let seed = seed_for(&long, &long);
        assert!(seed <= 1u64 << 31);
        assert_eq!(seed, seed_for(&long, &long));
    }

    #[test]
    fn test_pick_falls_back_on_empty_input() {
        assert_eq!(pick(&[], 7, "fallback"), "fallback");
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(pick(&items, 3, "fallback"), "b");
    }

    #[test]
    fn test_unique_ordered_keeps_first_occurrence() {
        let items = ["b", "a", "b", "A", "c"];
        assert_eq!(unique_ordered(items, 10), vec!["b", "a", "A", "c"]);
        assert_eq!(unique_ordered(items, 2), vec!["b", "a"]);
    }

    #[test]
    fn test_rotate_others_excludes_current_and_rotates() {
        let items = slugs(5, "s");
        let rotated = rotate_others(&items, "s-0", |s| s.as_str(), 5, 3);
        // others = [s-1, s-2, s-3, s-4], offset = 5 % 4 = 1
        assert_eq!(rotated, vec!["s-2", "s-3", "s-4"]);

        let wrapped = rotate_others(&items, "s-2", |s| s.as_str(), 3, 3);
        // others = [s-0, s-1, s-3, s-4], offset = 3
        assert_eq!(wrapped, vec!["s-4", "s-0", "s-1"]);
    }

    #[test]
    fn test_rotate_others_handles_single_entry_catalog() {
        let items = slugs(1, "s");
        assert!(rotate_others(&items, "s-0", |s| s.as_str(), 42, 3).is_empty());
    }
}

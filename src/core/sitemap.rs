use crate::utils::error::{MarkifyError, Result};
use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

pub const CHANGEFREQ_VALUES: [&str; 7] = [
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: String,
    pub priority: f32,
}

/// Joins a site base URL and a page path without doubling the slash.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders a `<urlset>` document. Text content is escaped by the writer;
/// priority is written at full configured precision.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| -> std::io::Result<()> {
            for entry in entries {
                w.create_element("url")
                    .write_inner_content(|w| -> std::io::Result<()> {
                        let lastmod = entry.lastmod.format("%Y-%m-%d").to_string();
                        let priority = entry.priority.to_string();
                        w.create_element("loc")
                            .write_text_content(BytesText::new(&entry.loc))?;
                        w.create_element("lastmod")
                            .write_text_content(BytesText::new(&lastmod))?;
                        w.create_element("changefreq")
                            .write_text_content(BytesText::new(&entry.changefreq))?;
                        w.create_element("priority")
                            .write_text_content(BytesText::new(&priority))?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| {
        MarkifyError::ProcessingError {
            message: format!("Sitemap is not valid UTF-8: {}", e),
        }
    })?;
    xml.push('\n');
    Ok(xml)
}

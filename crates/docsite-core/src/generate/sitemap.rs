use super::{file_name, sorted_entries};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    /// ISO-8601 modification time.
    pub lastmod: Option<String>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Writes a sitemaps.org `urlset` listing the home page and every `.md`
/// document under the docs directory.
pub struct SitemapGenerator {
    docs_dir: PathBuf,
    base_url: String,
    route_root: String,
}

impl SitemapGenerator {
    pub fn new(docs_dir: impl Into<PathBuf>, base_url: &str, route_root: &str) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            route_root: route_root.trim_end_matches('/').to_string(),
        }
    }

    /// Home page first, then documents in path order.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs directory cannot be walked.
    pub fn entries(&self) -> Result<Vec<SitemapEntry>> {
        let mut files = Vec::new();
        collect_markdown(&self.docs_dir, &mut files)?;

        let mut entries = Vec::with_capacity(files.len() + 1);
        entries.push(SitemapEntry {
            loc: format!("{}/", self.base_url),
            lastmod: None,
            changefreq: "daily",
            priority: "1.0",
        });

        for file in files {
            let Ok(relative) = file.strip_prefix(&self.docs_dir) else {
                continue;
            };
            let route = relative
                .with_extension("")
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");

            entries.push(SitemapEntry {
                loc: format!("{}{}/{}", self.base_url, self.route_root, route),
                lastmod: modified_at(&file),
                changefreq: "weekly",
                priority: "0.8",
            });
        }

        Ok(entries)
    }

    /// Render the sitemap XML.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk or XML encoding fails.
    pub fn generate(&self) -> Result<String> {
        render(&self.entries()?)
    }

    /// Render and write the sitemap, returning the number of documents.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or the file cannot be written.
    pub fn write(&self, output: &Path) -> Result<usize> {
        let entries = self.entries()?;
        let documents = entries.len() - 1;
        if documents == 0 {
            warn!("No markdown files found in {}", self.docs_dir.display());
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, render(&entries)?)?;

        info!(
            "Sitemap written to {} with {} pages (base URL {})",
            output.display(),
            documents,
            self.base_url
        );
        Ok(documents)
    }
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for (path, file_type) in sorted_entries(dir)? {
        if file_type.is_dir() {
            collect_markdown(&path, out)?;
        } else if file_type.is_file() && file_name(&path).ends_with(".md") {
            out.push(path);
        }
    }
    Ok(())
}

fn modified_at(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::Other(format!("Failed to write sitemap XML: {e}"))
}

fn render(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset)).map_err(xml_err)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;

        let mut fields = vec![("loc", entry.loc.as_str())];
        if let Some(lastmod) = &entry.lastmod {
            fields.push(("lastmod", lastmod.as_str()));
        }
        fields.push(("changefreq", entry.changefreq));
        fields.push(("priority", entry.priority));

        for (tag, value) in fields {
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Other(format!("Sitemap is not UTF-8: {e}")))?;
    xml.push('\n');
    Ok(xml)
}

//! Sitemap XML parser
//!
//! Reads a `<urlset>` document with quick-xml's namespace-aware reader. The
//! namespace is taken from the root element, and only `<url>`, `<loc>` and
//! `<priority>` elements in that namespace are considered.

use crate::sitemap::entry::{EntryMap, Priority, SitemapEntry};
use crate::ParseError;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Parses sitemap XML into entries ordered by descending priority
///
/// Duplicate URLs are collapsed: the last `<priority>` wins and the first
/// position is kept.
///
/// # Errors
///
/// * `ParseError::Xml` - The document is not well-formed
/// * `ParseError::Empty` - There is no root element
/// * `ParseError::SitemapIndex` - The root is `<sitemapindex>`
/// * `ParseError::UnexpectedRoot` - The root is anything else but `<urlset>`
/// * `ParseError::MissingLoc` - A `<url>` has no (or an empty) `<loc>`
///
/// # Example
///
/// ```
/// use sitemap_primer::sitemap::parse_sitemap;
///
/// let xml = br#"<urlset xmlns="ns">
///   <url><loc>http://x/a</loc><priority>0.5</priority></url>
///   <url><loc>http://x/b</loc><priority>0.9</priority></url>
/// </urlset>"#;
///
/// let urls: Vec<_> = parse_sitemap(xml).unwrap().into_iter().map(|e| e.url).collect();
/// assert_eq!(urls, vec!["http://x/b", "http://x/a"]);
/// ```
pub fn parse_sitemap(bytes: &[u8]) -> Result<Vec<SitemapEntry>, ParseError> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut builder = UrlsetBuilder::default();

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(resolved) => resolved,
            Err(e) => return Err(ParseError::Xml(e.to_string())),
        };
        let ns = owned_namespace(ns)?;

        match event {
            Event::Start(e) => builder.start(ns, e.local_name().as_ref())?,
            Event::Empty(e) => {
                builder.start(ns, e.local_name().as_ref())?;
                builder.end()?;
            }
            Event::End(_) => builder.end()?,
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| ParseError::Xml(err.to_string()))?;
                builder.text(&text)?;
            }
            Event::CData(e) => {
                let text =
                    std::str::from_utf8(&e).map_err(|err| ParseError::Xml(err.to_string()))?;
                builder.text(text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

/// Converts a resolved namespace into an owned URI (`None` when unqualified)
fn owned_namespace(ns: ResolveResult<'_>) -> Result<Option<Vec<u8>>, ParseError> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(uri.to_vec())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ParseError::Xml(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Loc,
    Priority,
}

#[derive(Debug, Default)]
struct PendingUrl {
    loc: Option<String>,
    priority: Option<String>,
}

/// Event-driven state for one `<urlset>` document
#[derive(Debug, Default)]
struct UrlsetBuilder {
    /// Namespace of the root element; outer `None` until the root is seen
    root_ns: Option<Option<Vec<u8>>>,
    depth: usize,
    /// 1-based index of the current `<url>`, for error messages
    url_index: usize,
    current: Option<PendingUrl>,
    field: Option<Field>,
    text: String,
    entries: EntryMap,
}

impl UrlsetBuilder {
    fn start(&mut self, ns: Option<Vec<u8>>, name: &[u8]) -> Result<(), ParseError> {
        self.depth += 1;

        match self.depth {
            1 => self.open_root(ns, name)?,
            2 if name == b"url" && self.in_namespace(&ns) => {
                self.url_index += 1;
                self.current = Some(PendingUrl::default());
            }
            3 if self.current.is_some() && self.in_namespace(&ns) => {
                self.field = match name {
                    b"loc" => Some(Field::Loc),
                    b"priority" => Some(Field::Priority),
                    _ => None,
                };
                self.text.clear();
            }
            _ => {}
        }

        Ok(())
    }

    fn end(&mut self) -> Result<(), ParseError> {
        match self.depth {
            3 => {
                if let (Some(field), Some(url)) = (self.field.take(), self.current.as_mut()) {
                    let value = self.text.trim().to_string();
                    match field {
                        Field::Loc => url.loc = Some(value),
                        Field::Priority => url.priority = Some(value),
                    }
                }
            }
            2 => {
                if let Some(url) = self.current.take() {
                    self.finish_url(url)?;
                }
            }
            _ => {}
        }

        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        if self.field.is_some() {
            self.text.push_str(text);
        } else if self.depth == 0 {
            return Err(ParseError::Xml(
                "text outside the root element".to_string(),
            ));
        }
        Ok(())
    }

    fn open_root(&mut self, ns: Option<Vec<u8>>, name: &[u8]) -> Result<(), ParseError> {
        if self.root_ns.is_some() {
            return Err(ParseError::Xml("multiple root elements".to_string()));
        }

        match name {
            b"urlset" => {
                self.root_ns = Some(ns);
                Ok(())
            }
            b"sitemapindex" => Err(ParseError::SitemapIndex),
            other => Err(ParseError::UnexpectedRoot(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    fn in_namespace(&self, ns: &Option<Vec<u8>>) -> bool {
        matches!(&self.root_ns, Some(root) if root == ns)
    }

    fn finish_url(&mut self, url: PendingUrl) -> Result<(), ParseError> {
        let priority = url
            .priority
            .filter(|p| !p.is_empty())
            .map(Priority::new)
            .unwrap_or_default();

        let loc = url
            .loc
            .filter(|loc| !loc.is_empty())
            .ok_or(ParseError::MissingLoc(self.url_index))?;

        self.entries.insert(SitemapEntry::new(loc, priority));
        Ok(())
    }

    fn finish(self) -> Result<Vec<SitemapEntry>, ParseError> {
        if self.root_ns.is_none() {
            return Err(ParseError::Empty);
        }
        if self.depth != 0 {
            return Err(ParseError::Xml("unexpected end of document".to_string()));
        }

        tracing::debug!("Parsed {} unique URLs from sitemap", self.entries.len());
        Ok(self.entries.into_sorted())
    }
}

//! HTML template patching.
//!
//! [`HtmlTemplate`] indexes the elements of an HTML document that carry an
//! `id` attribute and lets a renderer rewrite their `href` or content. The
//! document is streamed through `lol_html`, so everything that is not
//! written to comes out unchanged.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::debug;
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};

use super::document::Document;

/// What the template knows about an element carrying an `id`.
#[derive(Debug)]
struct Element {
    href: Option<String>,
    has_content: bool,
}

#[derive(Debug)]
struct Content {
    body: String,
    /// `body` is markup rather than text
    html: bool,
}

#[derive(Debug, Default)]
struct Patch {
    href: Option<String>,
    content: Option<Content>,
}

/// An HTML document with writable `id`-addressed elements.
#[derive(Debug)]
pub struct HtmlTemplate {
    source: String,
    elements: BTreeMap<String, Element>,
    patches: BTreeMap<String, Patch>,
}

impl HtmlTemplate {
    /// Index every element with an `id`. When ids repeat, the first wins.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut elements: BTreeMap<String, Element> = BTreeMap::new();

        rewrite_str(
            &source,
            RewriteStrSettings {
                element_content_handlers: vec![element!("[id]", |el| {
                    let Some(id) = el.get_attribute("id") else {
                        return Ok(());
                    };
                    if !is_addressable(&id) {
                        debug!("Element id {:?} cannot be addressed, ignored", id);
                    } else if elements.contains_key(&id) {
                        debug!("Duplicate element id {:?} ignored", id);
                    } else {
                        elements.insert(
                            id,
                            Element {
                                href: el.get_attribute("href"),
                                has_content: el.can_have_content(),
                            },
                        );
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )
        .context("Failed to parse HTML template")?;

        Ok(Self {
            source,
            elements,
            patches: BTreeMap::new(),
        })
    }

    /// Current `href` of an element (written value, else the original).
    pub fn href(&self, id: &str) -> Option<String> {
        if let Some(href) = self.patches.get(id).and_then(|p| p.href.clone()) {
            return Some(href);
        }
        self.elements.get(id)?.href.clone()
    }

    /// Content written to an element, as given to the setter.
    pub fn content(&self, id: &str) -> Option<&str> {
        self.patches
            .get(id)?
            .content
            .as_ref()
            .map(|c| c.body.as_str())
    }

    /// Render the document with all writes applied.
    pub fn to_html(&self) -> Result<String> {
        let element_content_handlers = self
            .patches
            .iter()
            .map(|(id, patch)| {
                let mut applied = false;
                element!(format!("[id=\"{}\"]", id), move |el| {
                    // first element with the id only, like `getElementById`
                    if applied {
                        return Ok(());
                    }
                    applied = true;
                    if let Some(url) = &patch.href {
                        el.set_attribute("href", url)?;
                    }
                    if let Some(content) = &patch.content {
                        let kind = if content.html {
                            ContentType::Html
                        } else {
                            ContentType::Text
                        };
                        el.set_inner_content(&content.body, kind);
                    }
                    Ok(())
                })
            })
            .collect();

        rewrite_str(
            &self.source,
            RewriteStrSettings {
                element_content_handlers,
                ..RewriteStrSettings::new()
            },
        )
        .context("Failed to render HTML template")
    }

    fn set_content(&mut self, id: &str, body: &str, html: bool) -> bool {
        match self.elements.get(id) {
            Some(element) if element.has_content => {
                self.patches.entry(id.to_string()).or_default().content = Some(Content {
                    body: body.to_string(),
                    html,
                });
                true
            }
            _ => false,
        }
    }
}

/// Ids that can be embedded in a quoted attribute selector as-is.
fn is_addressable(id: &str) -> bool {
    !id.is_empty() && !id.contains(['"', '\\', '\n', '\r', '\x0c'])
}

impl Document for HtmlTemplate {
    fn set_href(&mut self, id: &str, url: &str) -> bool {
        if !self.elements.contains_key(id) {
            return false;
        }
        self.patches.entry(id.to_string()).or_default().href = Some(url.to_string());
        true
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_content(id, text, false)
    }

    fn set_html(&mut self, id: &str, html: &str) -> bool {
        self.set_content(id, html, true)
    }
}

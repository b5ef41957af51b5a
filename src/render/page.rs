//! HTML page render target
//!
//! Holds an HTML document as text. Rendering parses the page with `scraper`,
//! finds the first element whose `id` matches in document order, swaps its
//! children for the parsed markup, and serializes the tree back out. A page
//! without a matching element is left byte-for-byte untouched.

use std::fs;
use std::io;
use std::path::Path;

use scraper::{ElementRef, Html};

use super::Document;

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// An HTML document that can be rendered into by element id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    html: String,
}

impl HtmlPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Reads a page from disk
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    /// Writes the page to disk
    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.html)
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Serialized content of the first element with `id`
    pub fn inner_html(&self, id: &str) -> Option<String> {
        let document = Html::parse_document(&self.html);
        find_by_id(&document, id).map(|element| element.inner_html())
    }
}

/// First element carrying `id`, in document order
fn find_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().id() == Some(id))
}

impl Document for HtmlPage {
    fn replace_content(&mut self, id: &str, markup: &str) -> bool {
        if id.is_empty() {
            return false;
        }

        let mut document = Html::parse_document(&self.html);
        let target = match find_by_id(&document, id) {
            Some(element) if !VOID_ELEMENTS.contains(&element.value().name()) => element.id(),
            _ => return false,
        };

        let old_children: Vec<_> = match document.tree.get(target) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return false,
        };
        for child in old_children {
            if let Some(mut node) = document.tree.get_mut(child) {
                node.detach();
            }
        }

        // Copy the parsed fragment under the target, parent by parent
        let fragment = Html::parse_fragment(markup);
        let mut pending = vec![(target, fragment.root_element().id())];
        while let Some((dest, src)) = pending.pop() {
            let Some(src_node) = fragment.tree.get(src) else {
                continue;
            };
            for child in src_node.children() {
                if let Some(mut parent) = document.tree.get_mut(dest) {
                    let copied = parent.append(child.value().clone()).id();
                    pending.push((copied, child.id()));
                }
            }
        }

        self.html = document.html();
        true
    }
}

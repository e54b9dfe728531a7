//! Narrow, typed view of an HTML page.
//!
//! Parsing happens once; everything the feature extractor needs is copied
//! out into plain fields so no caller ever touches the DOM.

use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Name, Predicate, Text};
use serde::{Deserialize, Serialize};

/// Elements whose text content is never rendered.
const INVISIBLE_CONTAINERS: &[&str] = &["script", "style", "template"];

/// Occurrences of each tracked heading level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
}

/// An `<img>` element, reduced to its alt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub alt: Option<String>,
}

impl Image {
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|alt| !alt.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    /// Visible text nodes joined by single spaces.
    pub text: String,
    pub headings: HeadingCounts,
    /// `href` of every anchor that carries one, in document order.
    pub anchor_hrefs: Vec<String>,
    pub images: Vec<Image>,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        let doc = Document::from(html);

        let text = doc
            .find(Text)
            .filter(|node| !inside_invisible_container(node))
            .filter_map(|node| node.as_text())
            .collect::<Vec<_>>()
            .join(" ");

        let headings = HeadingCounts {
            h1: doc.find(Name("h1")).count(),
            h2: doc.find(Name("h2")).count(),
            h3: doc.find(Name("h3")).count(),
            h4: doc.find(Name("h4")).count(),
        };

        let anchor_hrefs = doc
            .find(Name("a").and(Attr("href", ())))
            .filter_map(|node| node.attr("href"))
            .map(|href| href.to_string())
            .collect::<Vec<_>>();

        let images = doc
            .find(Name("img"))
            .map(|node| Image {
                alt: node.attr("alt").map(|alt| alt.to_string()),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Parsed document: {} text bytes, {} anchors, {} images",
            text.len(),
            anchor_hrefs.len(),
            images.len()
        );

        Self {
            text,
            headings,
            anchor_hrefs,
            images,
        }
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

fn inside_invisible_container(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent
            .name()
            .is_some_and(|name| INVISIBLE_CONTAINERS.contains(&name))
        {
            return true;
        }
        current = parent.parent();
    }
    false
}

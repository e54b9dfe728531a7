use select::node::Node;
use select::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured CSS selector used to locate organic result containers on a
/// search results page. Serializable so it can live in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum CssSelector {
    /// Matches an HTML tag name (e.g., "div")
    Tag(String),

    /// Matches one CSS class (e.g., "tF2Cxc")
    Class(String),

    /// Matches an attribute existence or specific value
    Attribute { key: String, value: Option<String> },

    /// Matches if ALL sub-selectors match
    And(Vec<CssSelector>),

    /// Matches if ANY sub-selector matches
    Or(Vec<CssSelector>),

    /// .ancestor .descendant
    Descendant {
        ancestor: Box<CssSelector>,
        descendant: Box<CssSelector>,
    },
}

impl CssSelector {
    /// `div.tF2Cxc`, the container Google wraps each organic result in.
    pub fn search_result_container() -> Self {
        CssSelector::And(vec![
            CssSelector::Tag("div".to_string()),
            CssSelector::Class("tF2Cxc".to_string()),
        ])
    }
}

impl Default for CssSelector {
    fn default() -> Self {
        Self::search_result_container()
    }
}

impl fmt::Display for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssSelector::Tag(tag) => write!(f, "{}", tag),
            CssSelector::Class(cls) => write!(f, ".{}", cls),
            CssSelector::Attribute { key, value } => match value {
                Some(v) => write!(f, "[{}='{}']", key, v),
                None => write!(f, "[{}]", key),
            },
            CssSelector::And(selectors) => {
                for s in selectors {
                    write!(f, "{}", s)?;
                }
                Ok(())
            }
            CssSelector::Or(selectors) => {
                let parts: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            CssSelector::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{} {}", ancestor, descendant),
        }
    }
}

impl Predicate for CssSelector {
    fn matches(&self, node: &Node) -> bool {
        match self {
            CssSelector::Tag(tag) => node.name() == Some(tag.as_str()),
            CssSelector::Class(cls) => node
                .attr("class")
                .map(|classes| classes.split_whitespace().any(|c| c == cls))
                .unwrap_or(false),
            CssSelector::Attribute { key, value } => match value {
                Some(v) => node.attr(key.as_str()) == Some(v.as_str()),
                None => node.attr(key.as_str()).is_some(),
            },
            CssSelector::And(selectors) => selectors.iter().all(|s| s.matches(node)),
            CssSelector::Or(selectors) => selectors.iter().any(|s| s.matches(node)),
            CssSelector::Descendant {
                ancestor,
                descendant,
            } => {
                if !descendant.matches(node) {
                    return false;
                }
                let mut current = node.parent();
                while let Some(parent) = current {
                    if ancestor.matches(&parent) {
                        return true;
                    }
                    current = parent.parent();
                }
                false
            }
        }
    }
}

impl<'a> Predicate for &'a CssSelector {
    fn matches(&self, node: &Node) -> bool {
        (*self).matches(node)
    }
}

use crate::dom::{DomQuery, Scope};
use crate::error::MissingReason;

/// Where a strategy reads its value from once an element has matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text,
    Attribute(String),
}

/// One way of locating a field: a CSS selector, a value source, and an
/// optional reshaping step.
///
/// Markup variants are handled by listing the more specific strategy
/// first and a looser one after it, instead of branching on page version.
/// A transform returning `None` (value present, wrong shape) falls
/// through to the next strategy exactly like a failed lookup.
#[derive(Debug, Clone)]
pub struct Strategy {
    selector: String,
    source: Source,
    transform: Option<fn(&str) -> Option<String>>,
}

impl Strategy {
    /// Read the matched element's text content.
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            source: Source::Text,
            transform: None,
        }
    }

    /// Read an attribute of the matched element.
    pub fn attribute(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            source: Source::Attribute(name.into()),
            transform: None,
        }
    }

    /// Reshape the raw value; `None` rejects it and tries the next strategy.
    pub fn map(mut self, transform: fn(&str) -> Option<String>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Try each strategy in order against `scope` and return the first
/// non-empty value.
///
/// Every lookup failure is caught here and converted into "try the next
/// strategy"; nothing escapes this boundary. When all strategies fail the
/// reason from the last attempt is returned.
pub async fn extract_first<D: DomQuery>(
    dom: &D,
    scope: Scope<'_, D::Node>,
    strategies: &[Strategy],
) -> Result<String, MissingReason> {
    let mut reason = MissingReason::NoMatch;

    for strategy in strategies {
        let node = match dom.find(scope, &strategy.selector).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                reason = MissingReason::NoMatch;
                continue;
            }
            Err(e) => {
                log::debug!("lookup {:?} failed: {}", strategy.selector, e);
                reason = MissingReason::Backend;
                continue;
            }
        };

        let raw = match &strategy.source {
            Source::Text => match dom.text(&node).await {
                Ok(text) => text,
                Err(_) => {
                    reason = MissingReason::Backend;
                    continue;
                }
            },
            Source::Attribute(name) => match dom.attribute(&node, name).await {
                Ok(Some(value)) => value,
                Ok(None) => {
                    reason = MissingReason::Empty;
                    continue;
                }
                Err(_) => {
                    reason = MissingReason::Backend;
                    continue;
                }
            },
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            reason = MissingReason::Empty;
            continue;
        }

        let value = match strategy.transform {
            Some(transform) => match transform(trimmed) {
                Some(value) => value,
                None => {
                    reason = MissingReason::BadFormat;
                    continue;
                }
            },
            None => trimmed.to_string(),
        };

        if value.is_empty() {
            reason = MissingReason::Empty;
            continue;
        }

        return Ok(value);
    }

    Err(reason)
}

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{DomQuery, Key, Navigator, Scope};
use crate::error::PortError;

/// Offline port backend over saved HTML.
///
/// Pages are registered per URL; a page may carry several scroll steps,
/// each PageDown sent to any node advancing to the next step. This backs
/// the CLI's offline mode against saved result pages and doubles as the
/// test harness for the extraction engine.
pub struct StaticDom {
    pages: HashMap<String, Vec<String>>,
    state: Mutex<State>,
    fail_keys_after: Option<usize>,
}

struct State {
    current: Option<String>,
    keys_sent: usize,
    closed: bool,
}

/// Opaque element handle: the element's serialized subtree.
#[derive(Debug, Clone)]
pub struct StaticNode {
    html: String,
}

impl StaticNode {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl StaticDom {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            state: Mutex::new(State {
                current: None,
                keys_sent: 0,
                closed: false,
            }),
            fail_keys_after: None,
        }
    }

    /// Register a single-step page for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_scrolling_page(url, vec![html.into()])
    }

    /// Register a page whose content grows step by step as it is scrolled.
    pub fn with_scrolling_page(mut self, url: impl Into<String>, steps: Vec<String>) -> Self {
        self.pages.insert(url.into(), steps);
        self
    }

    /// Make every scroll signal after the first `limit` fail.
    pub fn with_key_failure_after(mut self, limit: usize) -> Self {
        self.fail_keys_after = Some(limit);
        self
    }

    /// Number of key presses accepted so far on the current page.
    pub fn keys_sent(&self) -> usize {
        self.state().keys_sent
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_document(&self) -> Result<String, PortError> {
        let state = self.state();
        if state.closed {
            return Err(PortError::Closed);
        }
        let url = state.current.as_ref().ok_or(PortError::NoPage)?;
        let steps = self
            .pages
            .get(url)
            .ok_or_else(|| PortError::Backend(format!("no fixture registered for {url}")))?;
        let index = state.keys_sent.min(steps.len().saturating_sub(1));
        steps
            .get(index)
            .cloned()
            .ok_or_else(|| PortError::Backend(format!("empty fixture for {url}")))
    }

    fn scoped_html(&self, scope: Scope<'_, StaticNode>) -> Result<(String, bool), PortError> {
        match scope {
            Scope::Document => Ok((self.current_document()?, true)),
            Scope::Within(node) => {
                if self.state().closed {
                    return Err(PortError::Closed);
                }
                Ok((node.html.clone(), false))
            }
        }
    }

    fn select(html: &str, selector: &str, as_document: bool) -> Result<Vec<StaticNode>, PortError> {
        let parsed = Selector::parse(selector)
            .map_err(|_| PortError::BadSelector(selector.to_string()))?;
        let document = if as_document {
            Html::parse_document(html)
        } else {
            Html::parse_fragment(html)
        };
        Ok(document
            .select(&parsed)
            .map(|element| StaticNode {
                html: element.html(),
            })
            .collect())
    }

    fn root_element(document: &Html) -> Option<ElementRef<'_>> {
        document
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
    }
}

impl Default for StaticDom {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomQuery for StaticDom {
    type Node = StaticNode;

    async fn find(
        &self,
        scope: Scope<'_, StaticNode>,
        selector: &str,
    ) -> Result<Option<StaticNode>, PortError> {
        let (html, as_document) = self.scoped_html(scope)?;
        Ok(Self::select(&html, selector, as_document)?.into_iter().next())
    }

    async fn find_all(
        &self,
        scope: Scope<'_, StaticNode>,
        selector: &str,
    ) -> Result<Vec<StaticNode>, PortError> {
        let (html, as_document) = self.scoped_html(scope)?;
        Self::select(&html, selector, as_document)
    }

    async fn text(&self, node: &StaticNode) -> Result<String, PortError> {
        if self.state().closed {
            return Err(PortError::Closed);
        }
        let fragment = Html::parse_fragment(&node.html);
        Ok(fragment.root_element().text().collect::<String>())
    }

    async fn attribute(
        &self,
        node: &StaticNode,
        name: &str,
    ) -> Result<Option<String>, PortError> {
        if self.state().closed {
            return Err(PortError::Closed);
        }
        let fragment = Html::parse_fragment(&node.html);
        let element = Self::root_element(&fragment)
            .ok_or_else(|| PortError::Backend("node handle holds no element".to_string()))?;
        Ok(element.value().attr(name).map(str::to_string))
    }

    async fn send_key(&self, _node: &StaticNode, _key: Key) -> Result<(), PortError> {
        let mut state = self.state();
        if state.closed {
            return Err(PortError::Closed);
        }
        if let Some(limit) = self.fail_keys_after {
            if state.keys_sent >= limit {
                return Err(PortError::Backend("scroll target rejected input".to_string()));
            }
        }
        state.keys_sent += 1;
        Ok(())
    }

    async fn wait_until_present(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Option<StaticNode>, PortError> {
        // Fixtures only change through send_key, so nothing new can appear
        // while waiting; a single probe decides presence immediately.
        self.find(Scope::Document, selector).await
    }
}

#[async_trait]
impl Navigator for StaticDom {
    async fn open(&self, url: &str) -> Result<(), PortError> {
        let mut state = self.state();
        if state.closed {
            return Err(PortError::Closed);
        }
        if !self.pages.contains_key(url) {
            return Err(PortError::Backend(format!("no fixture registered for {url}")));
        }
        state.current = Some(url.to_string());
        state.keys_sent = 0;
        Ok(())
    }

    async fn quit(&self) {
        self.state().closed = true;
    }
}

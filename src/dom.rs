use std::time::Duration;

use async_trait::async_trait;

use crate::error::PortError;

/// Key press forwarded to an element to trigger progressive loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PageDown,
}

/// Where a query is rooted: the whole document or one element's subtree.
#[derive(Debug)]
pub enum Scope<'a, N> {
    Document,
    Within(&'a N),
}

impl<N> Clone for Scope<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Scope<'_, N> {}

/// DOM query port consumed by the extraction engine.
///
/// Every call is fallible: `Ok(None)` / an empty `Vec` means nothing
/// matched, `Err` means the backend itself failed. Callers catch both at
/// the smallest possible scope and convert them to missing-field defaults.
#[async_trait]
pub trait DomQuery: Send + Sync {
    type Node: Clone + Send + Sync;

    /// First element matching `selector` under `scope`, if any.
    async fn find(
        &self,
        scope: Scope<'_, Self::Node>,
        selector: &str,
    ) -> Result<Option<Self::Node>, PortError>;

    /// All elements matching `selector` under `scope`, in document order.
    async fn find_all(
        &self,
        scope: Scope<'_, Self::Node>,
        selector: &str,
    ) -> Result<Vec<Self::Node>, PortError>;

    /// Visible text content of `node`.
    async fn text(&self, node: &Self::Node) -> Result<String, PortError>;

    /// Attribute value of `node`, if the attribute is set.
    async fn attribute(&self, node: &Self::Node, name: &str)
    -> Result<Option<String>, PortError>;

    /// Send a key press to `node`.
    async fn send_key(&self, node: &Self::Node, key: Key) -> Result<(), PortError>;

    /// Wait up to `timeout` for `selector` to match somewhere in the
    /// document. `Ok(None)` on timeout; whether a timeout is fatal is the
    /// caller's decision, not the port's.
    async fn wait_until_present(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<Self::Node>, PortError>;
}

/// Navigation port: one exclusive browser-session resource.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), PortError>;

    /// Release the underlying session. Idempotent; called exactly once per
    /// search session on every exit path, abort paths included.
    async fn quit(&self);
}

#[async_trait]
impl<T: DomQuery> DomQuery for &T {
    type Node = T::Node;

    async fn find(
        &self,
        scope: Scope<'_, Self::Node>,
        selector: &str,
    ) -> Result<Option<Self::Node>, PortError> {
        (**self).find(scope, selector).await
    }

    async fn find_all(
        &self,
        scope: Scope<'_, Self::Node>,
        selector: &str,
    ) -> Result<Vec<Self::Node>, PortError> {
        (**self).find_all(scope, selector).await
    }

    async fn text(&self, node: &Self::Node) -> Result<String, PortError> {
        (**self).text(node).await
    }

    async fn attribute(
        &self,
        node: &Self::Node,
        name: &str,
    ) -> Result<Option<String>, PortError> {
        (**self).attribute(node, name).await
    }

    async fn send_key(&self, node: &Self::Node, key: Key) -> Result<(), PortError> {
        (**self).send_key(node, key).await
    }

    async fn wait_until_present(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<Self::Node>, PortError> {
        (**self).wait_until_present(selector, timeout).await
    }
}

#[async_trait]
impl<T: Navigator> Navigator for &T {
    async fn open(&self, url: &str) -> Result<(), PortError> {
        (**self).open(url).await
    }

    async fn quit(&self) {
        (**self).quit().await
    }
}

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a DOM or navigation port call.
///
/// `Ok(None)` from the port methods means "nothing matched"; `PortError`
/// means the backend itself could not service the call.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("invalid selector {0:?}")]
    BadSelector(String),

    #[error("no page is open")]
    NoPage,

    #[error("browser session already released")]
    Closed,

    #[error("wait for {selector:?} timed out after {timeout:?}")]
    WaitTimedOut { selector: String, timeout: Duration },

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Why a single field extraction came up empty.
///
/// Field misses are values, not errors: the builder records the sentinel
/// and moves on. Keeping the reason around makes the misses inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingReason {
    #[error("no element matched any selector")]
    NoMatch,

    #[error("matched element had no usable value")]
    Empty,

    #[error("value did not have the expected shape")]
    BadFormat,

    #[error("backend query failed")]
    Backend,
}

/// Conditions fatal to a whole search session.
///
/// Everything else (field misses, absent panels, failed scroll signals)
/// degrades to defaults locally. Only these abort the run; the session
/// converts them into an empty result after releasing the browser.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: PortError,
    },

    #[error("results container for {search_term:?} never appeared")]
    ResultsContainerMissing { search_term: String },

    #[error("scrollable results container never appeared")]
    ScrollContainerMissing,

    #[error("browser backend error: {0}")]
    Backend(#[from] PortError),
}

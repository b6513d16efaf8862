use std::time::Duration;

use tokio::time::sleep;

use crate::dom::{DomQuery, Key, Scope};
use crate::error::ScrapeError;

/// How the driver left the scrolling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Idle,
    Scrolling,
    Done,
}

#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Maximum number of scroll signals to send.
    pub budget: usize,
    /// Pause after each signal so asynchronous content can load.
    pub pause: Duration,
    /// Stop early once the item count has been unchanged for this many
    /// consecutive iterations. Disabled by default: the driver spends the
    /// whole budget.
    pub stagnation_limit: Option<usize>,
    /// Bounded wait for the scrollable container itself.
    pub container_timeout: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            budget: 10,
            pause: Duration::from_secs(2),
            stagnation_limit: None,
            container_timeout: Duration::from_secs(10),
        }
    }
}

/// Triggers progressive loading on a virtualized results list.
///
/// The one fatal condition is the scrollable container never appearing:
/// without it no items exist. A scroll signal that fails mid-loop is
/// logged and simply stops the loop; items loaded so far stay usable.
pub struct PaginationDriver {
    config: PaginationConfig,
}

impl PaginationDriver {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Scroll the container matched by `container_selector` until the
    /// budget is spent (or stagnation, when enabled). Returns the number
    /// of scroll signals issued.
    pub async fn run<D: DomQuery>(
        &self,
        dom: &D,
        container_selector: &str,
        item_selector: &str,
    ) -> Result<usize, ScrapeError> {
        let mut state = DriverState::Idle;
        let mut container = None;
        let mut scrolls = 0;
        let mut last_count = 0;
        let mut stagnant = 0;

        while state != DriverState::Done {
            match state {
                DriverState::Idle => {
                    let node = dom
                        .wait_until_present(container_selector, self.config.container_timeout)
                        .await?
                        .ok_or(ScrapeError::ScrollContainerMissing)?;
                    log::info!("scrolling results, budget {}", self.config.budget);
                    container = Some(node);
                    state = DriverState::Scrolling;
                }
                DriverState::Scrolling => {
                    if scrolls >= self.config.budget {
                        state = DriverState::Done;
                        continue;
                    }
                    let Some(node) = container.as_ref() else {
                        state = DriverState::Done;
                        continue;
                    };
                    match dom.send_key(node, Key::PageDown).await {
                        Ok(()) => scrolls += 1,
                        Err(e) => {
                            log::info!("scroll signal failed, stopping pagination: {e}");
                            state = DriverState::Done;
                            continue;
                        }
                    }

                    sleep(self.config.pause).await;

                    if let Some(limit) = self.config.stagnation_limit {
                        let count = match dom.find_all(Scope::Document, item_selector).await {
                            Ok(items) => items.len(),
                            Err(_) => last_count,
                        };
                        if count == last_count {
                            stagnant += 1;
                            if stagnant >= limit {
                                log::info!("item count stagnant at {count} for {stagnant} rounds");
                                state = DriverState::Done;
                            }
                        } else {
                            stagnant = 0;
                            last_count = count;
                        }
                    }
                }
                DriverState::Done => {}
            }
        }

        log::info!("pagination finished after {scrolls} scroll signals");
        Ok(scrolls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_dom::StaticDom;
    use crate::dom::Navigator;
    use tokio::time::Instant;

    const URL: &str = "https://example.test/results";
    const CONTAINER: &str = "div.results";
    const ITEM: &str = "p.item";

    fn page(items: usize) -> String {
        let rows: String = (0..items).map(|i| format!(r#"<p class="item">{i}</p>"#)).collect();
        format!(r#"<div class="results">{rows}</div>"#)
    }

    fn config(budget: usize) -> PaginationConfig {
        PaginationConfig {
            budget,
            pause: Duration::from_secs(2),
            ..PaginationConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_budget_sends_exactly_budget_signals() {
        let dom = StaticDom::new().with_page(URL, page(5));
        dom.open(URL).await.unwrap();

        let started = Instant::now();
        let driver = PaginationDriver::new(config(3));
        let scrolls = driver.run(&dom, CONTAINER, ITEM).await.unwrap();

        assert_eq!(scrolls, 3);
        assert_eq!(dom.keys_sent(), 3);
        // One pause per signal, even though the item count never grew.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn stagnation_stops_before_the_budget() {
        let dom = StaticDom::new().with_scrolling_page(URL, vec![page(5), page(8)]);
        dom.open(URL).await.unwrap();

        let driver = PaginationDriver::new(PaginationConfig {
            budget: 10,
            pause: Duration::from_millis(10),
            stagnation_limit: Some(2),
            ..PaginationConfig::default()
        });
        let scrolls = driver.run(&dom, CONTAINER, ITEM).await.unwrap();

        // Count reaches 8 after the first signal and never changes again.
        assert_eq!(scrolls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_scroll_signal_is_not_fatal() {
        let dom = StaticDom::new()
            .with_page(URL, page(5))
            .with_key_failure_after(2);
        dom.open(URL).await.unwrap();

        let driver = PaginationDriver::new(config(10));
        let scrolls = driver.run(&dom, CONTAINER, ITEM).await.unwrap();

        assert_eq!(scrolls, 2);
    }

    #[tokio::test]
    async fn missing_container_is_fatal() {
        let dom = StaticDom::new().with_page(URL, "<p>no results container</p>");
        dom.open(URL).await.unwrap();

        let driver = PaginationDriver::new(config(3));
        let result = driver.run(&dom, CONTAINER, ITEM).await;
        assert!(matches!(result, Err(ScrapeError::ScrollContainerMissing)));
    }
}

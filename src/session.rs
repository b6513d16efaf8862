use std::time::Duration;

use crate::detail::DetailEnricher;
use crate::dom::{DomQuery, Navigator, Scope};
use crate::error::ScrapeError;
use crate::listing::{ITEM_SELECTOR, ListingBuilder};
use crate::pagination::{PaginationConfig, PaginationDriver};
use crate::record::{DetailRecord, ListingRecord, NA};

/// Query URL for a free-text search term, quote-plus encoded, pinned to
/// English so the accessible labels the selectors key on stay stable.
pub fn build_search_url(search_term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(search_term.as_bytes()).collect();
    format!("https://www.google.com/maps/search/{encoded}?hl=en")
}

/// The results container is keyed by the exact echoed search term in its
/// accessible label. That literal coupling is fragile, so the matching
/// rule lives in this one place and nowhere else.
pub fn results_container_selector(search_term: &str) -> String {
    format!("div[aria-label='Results for {search_term}']")
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub search_term: String,
    pub pagination: PaginationConfig,
    /// Bounded wait for the results container; absence aborts the run.
    pub results_timeout: Duration,
    /// Load each listing's detail view after enumeration.
    pub enrich_details: bool,
}

impl SessionConfig {
    pub fn for_term(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            pagination: PaginationConfig::default(),
            results_timeout: Duration::from_secs(60),
            enrich_details: false,
        }
    }
}

/// Everything one session run produced. The collection is fully built
/// before it is handed out; nothing mutates it afterwards.
#[derive(Debug, Default)]
pub struct SessionOutput {
    pub listings: Vec<ListingRecord>,
    pub details: Vec<DetailRecord>,
}

/// Orchestrates one scraping run: navigate, paginate, enumerate, build.
///
/// The session owns the browser-session resource for exactly one
/// invocation of [`run`](Self::run) and releases it on every exit path,
/// the fatal-wait aborts included. A run that finds nothing returns an
/// empty output, not an error; the distinction is kept internally for
/// logging only.
pub struct SearchSession<B> {
    backend: B,
    config: SessionConfig,
}

impl<B: DomQuery + Navigator> SearchSession<B> {
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self { backend, config }
    }

    pub async fn run(self) -> SessionOutput {
        let outcome = self.collect().await;
        self.backend.quit().await;
        match outcome {
            Ok(output) => output,
            Err(e) => {
                log::info!("search session aborted: {e}");
                SessionOutput::default()
            }
        }
    }

    async fn collect(&self) -> Result<SessionOutput, ScrapeError> {
        let url = build_search_url(&self.config.search_term);
        log::info!("opening {url}");
        self.backend
            .open(&url)
            .await
            .map_err(|source| ScrapeError::Navigation { url, source })?;

        let container_selector = results_container_selector(&self.config.search_term);
        self.backend
            .wait_until_present(&container_selector, self.config.results_timeout)
            .await?
            .ok_or_else(|| ScrapeError::ResultsContainerMissing {
                search_term: self.config.search_term.clone(),
            })?;

        let driver = PaginationDriver::new(self.config.pagination.clone());
        driver
            .run(&self.backend, &container_selector, ITEM_SELECTOR)
            .await?;

        let items = self
            .backend
            .find_all(Scope::Document, ITEM_SELECTOR)
            .await
            .unwrap_or_else(|e| {
                log::info!("item enumeration failed: {e}");
                Vec::new()
            });
        log::info!("found {} listings", items.len());

        let builder = ListingBuilder::default();
        let mut listings = Vec::with_capacity(items.len());
        for item in &items {
            listings.push(builder.build(&self.backend, item).await);
        }

        let mut details = Vec::new();
        if self.config.enrich_details {
            let enricher = DetailEnricher::default();
            for listing in &listings {
                if listing.google_map_link == NA {
                    log::info!("no detail reference for {:?}, skipping enrichment", listing.name);
                    continue;
                }
                details.push(enricher.enrich(&self.backend, &listing.google_map_link).await);
            }
        }

        Ok(SessionOutput { listings, details })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_dom::StaticDom;

    const TERM: &str = "travel agencies in kenya";

    fn item(name: &str, rating: &str) -> String {
        format!(
            r#"<div class="lI9IFe">
                <div class="qBF1Pd fontHeadlineSmall">{name}</div>
                <span class="MW4etd">{rating}</span>
                <a aria-label="Visit {name}" href="https://maps.example/place/{rating}">map</a>
            </div>"#
        )
    }

    fn results_page(items: &[String]) -> String {
        format!(
            r#"<div aria-label="Results for {TERM}">{}</div>"#,
            items.concat()
        )
    }

    fn fast_config() -> SessionConfig {
        let mut config = SessionConfig::for_term(TERM);
        config.pagination.budget = 2;
        config.pagination.pause = Duration::from_millis(1);
        config
    }

    #[test]
    fn search_url_is_quote_plus_encoded_and_pinned_to_english() {
        assert_eq!(
            build_search_url(TERM),
            "https://www.google.com/maps/search/travel+agencies+in+kenya?hl=en"
        );
    }

    #[tokio::test]
    async fn records_come_back_in_dom_order() {
        let page = results_page(&[item("Acme Travel", "4.5"), item("Beta Tours", "3.9")]);
        let dom = StaticDom::new().with_page(build_search_url(TERM), page);

        let output = SearchSession::new(dom, fast_config()).run().await;
        let names: Vec<&str> = output.listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Travel", "Beta Tours"]);
    }

    #[tokio::test]
    async fn missing_results_container_yields_empty_output() {
        let dom = StaticDom::new().with_page(
            build_search_url(TERM),
            "<p>nothing that looks like results</p>",
        );

        let output = SearchSession::new(dom, fast_config()).run().await;
        assert!(output.listings.is_empty());
        assert!(output.details.is_empty());
    }

    #[tokio::test]
    async fn zero_items_yield_empty_output_not_an_error() {
        let dom = StaticDom::new().with_page(build_search_url(TERM), results_page(&[]));

        let output = SearchSession::new(dom, fast_config()).run().await;
        assert!(output.listings.is_empty());
    }

    #[tokio::test]
    async fn failed_navigation_yields_empty_output() {
        let dom = StaticDom::new(); // nothing registered, open() fails
        let output = SearchSession::new(dom, fast_config()).run().await;
        assert!(output.listings.is_empty());
    }

    #[tokio::test]
    async fn browser_resource_is_released_on_success_and_abort() {
        let happy = StaticDom::new().with_page(
            build_search_url(TERM),
            results_page(&[item("Acme Travel", "4.5")]),
        );
        SearchSession::new(&happy, fast_config()).run().await;
        assert!(happy.is_closed());

        let aborting = StaticDom::new()
            .with_page(build_search_url(TERM), "<p>no results container</p>");
        SearchSession::new(&aborting, fast_config()).run().await;
        assert!(aborting.is_closed());
    }

    #[tokio::test]
    async fn enrichment_follows_each_listing_reference() {
        let page = results_page(&[item("Acme Travel", "4.5")]);
        let detail = r#"<div class="zvLtDc">Acme Travel</div>
            <div class="fontDisplayLarge">4.5</div>"#;
        let dom = StaticDom::new()
            .with_page(build_search_url(TERM), page)
            .with_page("https://maps.example/place/4.5", detail);

        let mut config = fast_config();
        config.enrich_details = true;
        let output = SearchSession::new(dom, config).run().await;

        assert_eq!(output.listings.len(), 1);
        assert_eq!(output.details.len(), 1);
        assert_eq!(output.details[0].name, "Acme Travel");
        assert_eq!(output.details[0].rating, "4.5");
    }
}

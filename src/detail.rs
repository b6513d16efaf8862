use std::time::Duration;

use crate::dom::{DomQuery, Navigator, Scope};
use crate::extract::{Strategy, extract_first};
use crate::record::{DetailRecord, NA, WeeklyHours};

const PRIMARY_PANEL: &str = "div.zvLtDc";
const EXTRA_INFO_PANEL: &str = "[aria-label*='Information for']";
const HOURS_PANEL: &str = "div.eK4R0e";
const DAY_LABEL: &str = ".ylH6lf";
const TIME_RANGE: &str = ".mxowUb";

/// Strategy lists for the detail view.
#[derive(Debug, Clone)]
pub struct DetailSelectors {
    pub name: Vec<Strategy>,
    pub rating: Vec<Strategy>,
    pub reviews_count: Vec<Strategy>,
    pub address: Vec<Strategy>,
    pub contact: Vec<Strategy>,
    pub website: Vec<Strategy>,
    pub booking_link: Vec<Strategy>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            name: vec![Strategy::text("div.zvLtDc")],
            rating: vec![Strategy::text(".fontDisplayLarge")],
            reviews_count: vec![Strategy::text(".HHrUdb").map(first_token)],
            address: vec![Strategy::attribute("[data-tooltip='Copy address']", "aria-label")],
            contact: vec![Strategy::attribute(
                "[data-tooltip='Copy phone number']",
                "aria-label",
            )],
            website: vec![Strategy::attribute("[data-tooltip='Open website']", "href")],
            booking_link: vec![Strategy::attribute(
                "[data-tooltip='Open booking link']",
                "href",
            )],
        }
    }
}

/// "120 reviews" carries the count in its first token.
fn first_token(raw: &str) -> Option<String> {
    raw.split_whitespace().next().map(str::to_string)
}

/// Strip the narrow no-break space and widen the en dash so a range like
/// "9 am–5 pm" reads "9am - 5pm" downstream.
fn normalize_time_range(raw: &str) -> String {
    raw.replace('\u{202f}', "").replace('\u{2013}', " - ")
}

#[derive(Debug, Clone)]
pub struct DetailConfig {
    /// Bounded wait for the primary info panel. A timeout is not fatal:
    /// extraction proceeds on whatever is present.
    pub panel_timeout: Duration,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            panel_timeout: Duration::from_secs(15),
        }
    }
}

/// Loads one listing's detail view and extracts secondary fields with the
/// same tolerant per-field pattern the listing builder uses.
///
/// The contact block is gated as a unit: when the "Information for"
/// panel is absent, the business category usually exposes none of those
/// fields, so address, contact, website and booking link default in bulk.
/// The hours panel is gated separately.
#[derive(Debug, Default)]
pub struct DetailEnricher {
    selectors: DetailSelectors,
    config: DetailConfig,
}

impl DetailEnricher {
    pub fn new(selectors: DetailSelectors, config: DetailConfig) -> Self {
        Self { selectors, config }
    }

    pub async fn enrich<B: DomQuery + Navigator>(&self, backend: &B, url: &str) -> DetailRecord {
        let mut record = DetailRecord::default();

        if let Err(e) = backend.open(url).await {
            log::info!("detail page navigation failed: {e}");
            return record;
        }

        match backend
            .wait_until_present(PRIMARY_PANEL, self.config.panel_timeout)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => log::info!("detail panel did not appear, extracting what is present"),
            Err(e) => {
                log::info!("detail panel wait failed: {e}");
                return record;
            }
        }

        record.name = self.field(backend, Scope::Document, &self.selectors.name, "name").await;
        record.rating = self
            .field(backend, Scope::Document, &self.selectors.rating, "rating")
            .await;
        record.reviews_count = self
            .field(
                backend,
                Scope::Document,
                &self.selectors.reviews_count,
                "reviews count",
            )
            .await;

        match backend.find(Scope::Document, EXTRA_INFO_PANEL).await {
            Ok(Some(panel)) => {
                record.address = self
                    .field(backend, Scope::Within(&panel), &self.selectors.address, "address")
                    .await;
                record.contact = self
                    .field(backend, Scope::Within(&panel), &self.selectors.contact, "contact")
                    .await;
                record.website = self
                    .field(backend, Scope::Within(&panel), &self.selectors.website, "website")
                    .await;
                record.booking_link = self
                    .field(
                        backend,
                        Scope::Within(&panel),
                        &self.selectors.booking_link,
                        "booking link",
                    )
                    .await;
            }
            Ok(None) => log::info!("extra info panel absent, leaving contact fields at defaults"),
            Err(e) => log::info!("extra info panel lookup failed: {e}"),
        }

        self.extract_hours(backend, &mut record.hours).await;
        record
    }

    async fn field<B: DomQuery>(
        &self,
        backend: &B,
        scope: Scope<'_, B::Node>,
        strategies: &[Strategy],
        label: &str,
    ) -> String {
        match extract_first(backend, scope, strategies).await {
            Ok(value) => value,
            Err(reason) => {
                log::info!("detail {label} not found: {reason}");
                NA.to_string()
            }
        }
    }

    /// Day labels and time ranges are two independently collected
    /// sequences paired by position. A length mismatch pairs the shorter
    /// prefix and is reported, not fatal.
    async fn extract_hours<B: DomQuery>(&self, backend: &B, hours: &mut WeeklyHours) {
        let panel = match backend.find(Scope::Document, HOURS_PANEL).await {
            Ok(Some(panel)) => panel,
            Ok(None) => {
                log::info!("hours panel absent, leaving weekly hours at defaults");
                return;
            }
            Err(e) => {
                log::info!("hours panel lookup failed: {e}");
                return;
            }
        };

        let days = backend
            .find_all(Scope::Within(&panel), DAY_LABEL)
            .await
            .unwrap_or_default();
        let times = backend
            .find_all(Scope::Within(&panel), TIME_RANGE)
            .await
            .unwrap_or_default();

        if days.len() != times.len() {
            log::warn!(
                "hours panel listed {} day labels but {} time ranges, pairing the shorter prefix",
                days.len(),
                times.len()
            );
        }

        for (day, time) in days.iter().zip(times.iter()) {
            let label = match backend.text(day).await {
                Ok(label) => label,
                Err(e) => {
                    log::info!("day label unreadable: {e}");
                    continue;
                }
            };
            let raw = match backend.text(time).await {
                Ok(raw) => raw,
                Err(e) => {
                    log::info!("time range unreadable: {e}");
                    continue;
                }
            };
            if !hours.set(&label, normalize_time_range(raw.trim())) {
                log::info!("ignoring unrecognized weekday label {:?}", label.trim());
            }
        }
    }
}

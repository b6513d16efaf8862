use crate::dom::{DomQuery, Scope};
use crate::extract::{Strategy, extract_first};
use crate::record::{ListingRecord, NA};

/// CSS selector for one listing's subtree inside the results container.
pub const ITEM_SELECTOR: &str = "div.lI9IFe";

/// Per-field strategy lists for one listing item.
///
/// Each field lists its markup variants in order, most specific first.
/// The phone number is the canonical example: it renders either as the
/// second span of the second info row ("category · number") or as a lone
/// span when no category is shown.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub name: Vec<Strategy>,
    pub rating: Vec<Strategy>,
    pub reviews: Vec<Strategy>,
    pub phone_number: Vec<Strategy>,
    pub address: Vec<Strategy>,
    pub website: Vec<Strategy>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            name: vec![Strategy::text("div.qBF1Pd.fontHeadlineSmall")],
            rating: vec![Strategy::text("span.MW4etd")],
            reviews: vec![Strategy::text("span.UY7F9").map(strip_parens)],
            phone_number: vec![
                Strategy::text("div.W4Efsd:nth-child(2) > span:nth-child(2)").map(after_separator),
                Strategy::text("div.W4Efsd:nth-child(2) > span:nth-child(1)"),
            ],
            address: vec![
                Strategy::text("div.W4Efsd:nth-child(1) > span:nth-child(2)").map(after_separator),
            ],
            website: vec![Strategy::attribute("a[data-value='Website']", "href")],
        }
    }
}

fn strip_parens(raw: &str) -> Option<String> {
    let value = raw.trim_start_matches('(').trim_end_matches(')').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn after_separator(raw: &str) -> Option<String> {
    raw.split('·')
        .nth(1)
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
}

/// Assembles one fixed-schema [`ListingRecord`] per item node.
///
/// Every field is extracted independently; a miss is logged, defaulted to
/// the sentinel, and never blocks the other fields.
#[derive(Debug, Default)]
pub struct ListingBuilder {
    selectors: ListingSelectors,
}

impl ListingBuilder {
    pub fn new(selectors: ListingSelectors) -> Self {
        Self { selectors }
    }

    pub async fn build<D: DomQuery>(&self, dom: &D, item: &D::Node) -> ListingRecord {
        let name = self.field(dom, item, &self.selectors.name, "name").await;
        let rating = self.field(dom, item, &self.selectors.rating, "rating").await;
        let reviews = self.field(dom, item, &self.selectors.reviews, "reviews").await;
        let phone_number = self
            .field(dom, item, &self.selectors.phone_number, "phone number")
            .await;
        let address = self.field(dom, item, &self.selectors.address, "address").await;
        let website = self.field(dom, item, &self.selectors.website, "website").await;
        let google_map_link = self.map_link(dom, item, &name).await;

        ListingRecord {
            name,
            rating,
            reviews,
            phone_number,
            address,
            website,
            google_map_link,
        }
    }

    async fn field<D: DomQuery>(
        &self,
        dom: &D,
        item: &D::Node,
        strategies: &[Strategy],
        label: &str,
    ) -> String {
        match extract_first(dom, Scope::Within(item), strategies).await {
            Ok(value) => value,
            Err(reason) => {
                log::info!("listing {label} not found: {reason}");
                NA.to_string()
            }
        }
    }

    /// The detail-page anchor is disambiguated by its accessible label
    /// containing the listing name, so it needs the name first; with no
    /// name to match against the link defaults to the sentinel.
    async fn map_link<D: DomQuery>(&self, dom: &D, item: &D::Node, name: &str) -> String {
        if name == NA {
            log::info!("skipping map link, listing name unknown");
            return NA.to_string();
        }
        if name.contains('"') {
            log::info!("skipping map link, name {name:?} cannot form a selector");
            return NA.to_string();
        }
        let strategies = [Strategy::attribute(
            format!("a[aria-label*=\"{name}\"]"),
            "href",
        )];
        match extract_first(dom, Scope::Within(item), &strategies).await {
            Ok(value) => value,
            Err(reason) => {
                log::info!("listing map link not found: {reason}");
                NA.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Navigator;
    use crate::static_dom::{StaticDom, StaticNode};

    const URL: &str = "https://example.test/results";

    fn full_item() -> &'static str {
        r#"<div class="lI9IFe">
            <div class="qBF1Pd fontHeadlineSmall">Acme Travel</div>
            <div>
                <span class="MW4etd">4.5</span>
                <span class="UY7F9">(120)</span>
            </div>
            <div>
                <div class="W4Efsd"><span>Travel agency</span><span>· Moi Ave, Nairobi</span></div>
                <div class="W4Efsd"><span>Open 24 hours</span><span>· +254 20 1234567</span></div>
            </div>
            <a data-value="Website" href="https://acme.example">website</a>
            <a aria-label="Visit Acme Travel" href="https://maps.example/place/acme">map</a>
        </div>"#
    }

    async fn build(item_html: &str) -> ListingRecord {
        let dom = StaticDom::new().with_page(URL, item_html);
        dom.open(URL).await.unwrap();
        let item = StaticNode::from_html(item_html);
        ListingBuilder::default().build(&dom, &item).await
    }

    #[tokio::test]
    async fn full_item_fills_every_field() {
        let record = build(full_item()).await;
        assert_eq!(record.name, "Acme Travel");
        assert_eq!(record.rating, "4.5");
        assert_eq!(record.reviews, "120");
        assert_eq!(record.phone_number, "+254 20 1234567");
        assert_eq!(record.address, "Moi Ave, Nairobi");
        assert_eq!(record.website, "https://acme.example");
        assert_eq!(record.google_map_link, "https://maps.example/place/acme");
    }

    #[tokio::test]
    async fn sparse_item_defaults_missing_fields_independently() {
        let record = build(
            r#"<div class="lI9IFe">
                <div class="qBF1Pd fontHeadlineSmall">Acme Travel</div>
                <span class="MW4etd">4.5</span>
            </div>"#,
        )
        .await;
        assert_eq!(record.name, "Acme Travel");
        assert_eq!(record.rating, "4.5");
        assert_eq!(record.reviews, NA);
        assert_eq!(record.phone_number, NA);
        assert_eq!(record.address, NA);
        assert_eq!(record.website, NA);
        assert_eq!(record.google_map_link, NA);
    }

    #[tokio::test]
    async fn lone_phone_span_uses_fallback_strategy() {
        let record = build(
            r#"<div class="lI9IFe">
                <div class="qBF1Pd fontHeadlineSmall">Acme Travel</div>
                <div>
                    <div class="W4Efsd"><span>Somewhere</span><span>· Moi Ave</span></div>
                    <div class="W4Efsd"><span>+254 700 000000</span></div>
                </div>
            </div>"#,
        )
        .await;
        assert_eq!(record.phone_number, "+254 700 000000");
    }

    #[tokio::test]
    async fn map_link_needs_the_name() {
        let record = build(
            r#"<div class="lI9IFe">
                <a aria-label="Visit Somewhere" href="https://maps.example/place/x">map</a>
            </div>"#,
        )
        .await;
        assert_eq!(record.name, NA);
        assert_eq!(record.google_map_link, NA);
    }

    #[tokio::test]
    async fn every_field_is_non_empty_or_sentinel() {
        for html in [full_item(), r#"<div class="lI9IFe"></div>"#] {
            let record = build(html).await;
            for value in [
                &record.name,
                &record.rating,
                &record.reviews,
                &record.phone_number,
                &record.address,
                &record.website,
                &record.google_map_link,
            ] {
                assert!(!value.is_empty());
            }
        }
    }
}

//! # Pricing Context
//!
//! Everything the agent knows for the lifetime of one page: the detected
//! country, its active rules, and the original price of every element it
//! has rewritten.
//!
//! ## Update Pass
//! ```text
//! for each price element:
//!   original = remembered[key]
//!           ?? attr "data-original-price"
//!           ?? text reduced to [0-9.,]
//!   unparseable → leave element untouched
//!   remember original, write "data-original-price"
//!   rules empty → text = symbol + original          (as scraped)
//!   otherwise   → text = symbol + format(resolve(original))
//!   set "data-price-adjusted" = "true", "data-country" = country
//! then insert "Prices shown for XX" once
//! ```
//!
//! The resolver always starts from the remembered original, so running the
//! pass again never compounds an adjustment.

use std::collections::HashMap;

use tracing::debug;

use crate::page::{PriceElement, Storefront, ATTR_COUNTRY, ATTR_ORIGINAL_PRICE, ATTR_PRICE_ADJUSTED};
use geoprice_core::money::{currency_symbol, format_amount, numeric_part, parse_amount};
use geoprice_core::{resolve, PriceContext, PriceRule};

/// Counts from one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Elements whose text was rewritten.
    pub updated: usize,
    /// Elements left untouched (no parseable price).
    pub skipped: usize,
    /// Whether the country indicator was inserted by this pass.
    pub indicator_inserted: bool,
}

/// Page-lifetime pricing state.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingContext {
    country: String,
    rules: Vec<PriceRule>,
    original_prices: HashMap<String, String>,
}

impl PricingContext {
    pub fn new(country: impl Into<String>, rules: Vec<PriceRule>) -> Self {
        PricingContext {
            country: country.into(),
            rules,
            original_prices: HashMap::new(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn rules(&self) -> &[PriceRule] {
        &self.rules
    }

    /// Original price text remembered for an element.
    pub fn original_price(&self, key: &str) -> Option<&str> {
        self.original_prices.get(key).map(String::as_str)
    }

    /// Forgets remembered element prices. Called on navigation, when the
    /// page's elements are replaced. Country and rules are kept.
    pub fn invalidate(&mut self) {
        debug!(forgotten = self.original_prices.len(), "Pricing context invalidated");
        self.original_prices.clear();
    }

    /// Text an element should show for a given original price.
    ///
    /// Returns `None` when the original cannot be parsed.
    pub fn display_price(&self, original: &str, symbol: char, context: &PriceContext) -> Option<String> {
        let amount = parse_amount(original)?;

        if self.rules.is_empty() {
            return Some(format!("{}{}", symbol, original));
        }

        let resolution = resolve(
            &self.rules,
            &PriceContext {
                base_price: amount,
                ..context.clone()
            },
        );
        Some(format!("{}{}", symbol, format_amount(resolution.adjusted_price)))
    }

    /// Rewrites every price element on the page.
    pub fn update_prices(&mut self, page: &mut dyn Storefront) -> UpdateSummary {
        let product = page.product_info();
        let base = PriceContext {
            product_id: product.product_id,
            product_category: product.product_category,
            base_price: 0.0,
        };

        let mut summary = UpdateSummary::default();

        page.for_each_price_element(&mut |element: &mut dyn PriceElement| {
            if self.update_element(element, &base) {
                summary.updated += 1;
            } else {
                summary.skipped += 1;
            }
        });

        if !page.has_indicator() {
            summary.indicator_inserted = page.insert_indicator(&indicator_text(&self.country));
        }

        debug!(
            country = %self.country,
            updated = summary.updated,
            skipped = summary.skipped,
            "Prices updated"
        );
        summary
    }

    fn update_element(&mut self, element: &mut dyn PriceElement, context: &PriceContext) -> bool {
        let key = element.key();
        let text = element.text();

        let original = match self.original_prices.get(&key) {
            Some(remembered) => remembered.clone(),
            None => element
                .attribute(ATTR_ORIGINAL_PRICE)
                .unwrap_or_else(|| numeric_part(&text)),
        };

        let Some(display) = self.display_price(&original, currency_symbol(&text), context) else {
            return false;
        };

        if !self.original_prices.contains_key(&key) {
            element.set_attribute(ATTR_ORIGINAL_PRICE, &original);
            self.original_prices.insert(key, original);
        }

        element.set_text(&display);
        element.set_attribute(ATTR_PRICE_ADJUSTED, "true");
        element.set_attribute(ATTR_COUNTRY, &self.country);
        true
    }
}

/// Text of the country indicator.
pub fn indicator_text(country: &str) -> String {
    format!("Prices shown for {}", country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryElement, MemoryStorefront, ProductInfo};
    use geoprice_core::RuleType;

    fn tr_rules() -> Vec<PriceRule> {
        vec![PriceRule::new(1, RuleType::Percentage, 5.0).with_priority(10)]
    }

    #[test]
    fn test_update_pass_rewrites_prices() {
        let mut page = MemoryStorefront::new()
            .with_element(MemoryElement::new("p1", "$100.00"))
            .with_element(MemoryElement::new("p2", "€ 19,99"));
        let mut context = PricingContext::new("TR", tr_rules());

        let summary = context.update_prices(&mut page);

        assert_eq!(summary.updated, 2);
        assert!(summary.indicator_inserted);

        let p1 = page.element("p1").unwrap();
        assert_eq!(p1.text, "$105.00");
        assert_eq!(p1.attribute(ATTR_ORIGINAL_PRICE).as_deref(), Some("100.00"));
        assert_eq!(p1.attribute(ATTR_PRICE_ADJUSTED).as_deref(), Some("true"));
        assert_eq!(p1.attribute(ATTR_COUNTRY).as_deref(), Some("TR"));

        assert_eq!(page.element("p2").unwrap().text, "€20.99");
        assert_eq!(page.indicator.as_deref(), Some("Prices shown for TR"));
    }

    #[test]
    fn test_rescan_does_not_compound() {
        let mut page = MemoryStorefront::new().with_element(MemoryElement::new("p1", "$100"));
        let mut context = PricingContext::new("TR", tr_rules());

        context.update_prices(&mut page);
        let second = context.update_prices(&mut page);

        assert_eq!(page.element("p1").unwrap().text, "$105.00");
        assert!(!second.indicator_inserted);
        assert_eq!(context.original_price("p1"), Some("100"));
    }

    #[test]
    fn test_original_attribute_survives_invalidate() {
        let mut page = MemoryStorefront::new().with_element(MemoryElement::new("p1", "$100"));
        let mut context = PricingContext::new("TR", tr_rules());

        context.update_prices(&mut page);
        context.invalidate();
        assert_eq!(context.original_price("p1"), None);

        // The data attribute still carries the original
        context.update_prices(&mut page);
        assert_eq!(page.element("p1").unwrap().text, "$105.00");
    }

    #[test]
    fn test_empty_rules_keep_original_text() {
        let mut page = MemoryStorefront::new().with_element(MemoryElement::new("p1", "$1,299"));
        let mut context = PricingContext::new("US", Vec::new());

        let summary = context.update_prices(&mut page);

        assert_eq!(summary.updated, 1);
        let p1 = page.element("p1").unwrap();
        assert_eq!(p1.text, "$1,299");
        assert_eq!(p1.attribute(ATTR_COUNTRY).as_deref(), Some("US"));
    }

    #[test]
    fn test_unparseable_price_is_untouched() {
        let mut page = MemoryStorefront::new().with_element(MemoryElement::new("p1", "Sold out"));
        let mut context = PricingContext::new("TR", tr_rules());

        let summary = context.update_prices(&mut page);

        assert_eq!(summary.skipped, 1);
        let p1 = page.element("p1").unwrap();
        assert_eq!(p1.text, "Sold out");
        assert!(p1.attributes.is_empty());
        assert_eq!(context.original_price("p1"), None);
    }

    #[test]
    fn test_product_page_uses_product_rules() {
        let rules = vec![
            PriceRule::new(1, RuleType::Fixed, 10.0).with_id(1).with_priority(5),
            PriceRule::new(1, RuleType::Percentage, 20.0)
                .with_id(2)
                .with_priority(10)
                .with_product("X"),
        ];
        let mut page = MemoryStorefront::new()
            .with_product(ProductInfo::product("X", None))
            .with_element(MemoryElement::new("p1", "$50"));
        let mut context = PricingContext::new("DE", rules.clone());

        context.update_prices(&mut page);
        assert_eq!(page.element("p1").unwrap().text, "$60.00");

        // A listing page only sees the general rule
        let mut listing = MemoryStorefront::new().with_element(MemoryElement::new("p1", "$50"));
        PricingContext::new("DE", rules).update_prices(&mut listing);
        assert_eq!(listing.element("p1").unwrap().text, "$60.00");
    }

    #[test]
    fn test_category_rule_misses_listing_pages() {
        let rules = vec![PriceRule::new(1, RuleType::Fixed, 1.0).with_category("shoes")];
        let mut listing = MemoryStorefront::new().with_element(MemoryElement::new("p1", "$10"));

        PricingContext::new("DE", rules).update_prices(&mut listing);
        assert_eq!(listing.element("p1").unwrap().text, "$10.00");
    }
}

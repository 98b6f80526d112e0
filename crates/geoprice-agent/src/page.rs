//! # Storefront Page Abstraction
//!
//! What the agent needs from a rendered storefront page, without tying it
//! to any particular DOM.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                             │
//! │  ├── product_info()          [data-product-id] / [data-category-id]    │
//! │  ├── for_each_price_element  .product-price, .price-value,             │
//! │  │        │                  [data-product-price]                       │
//! │  │        ▼                                                             │
//! │  │   PriceElement                                                       │
//! │  │   ├── key()               stable per element (its id)               │
//! │  │   ├── text() / set_text()                                           │
//! │  │   └── attribute() / set_attribute()                                 │
//! │  └── has_indicator() / insert_indicator()                              │
//! │                              .country-price-indicator                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

/// Attribute holding the scraped original price.
pub const ATTR_ORIGINAL_PRICE: &str = "data-original-price";

/// Attribute set to `"true"` once a price has been rewritten.
pub const ATTR_PRICE_ADJUSTED: &str = "data-price-adjusted";

/// Attribute holding the country the price was rewritten for.
pub const ATTR_COUNTRY: &str = "data-country";

/// Product identity scraped from the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductInfo {
    pub product_id: Option<String>,
    pub product_category: Option<String>,
}

impl ProductInfo {
    /// A product page.
    pub fn product(product_id: impl Into<String>, category: Option<String>) -> Self {
        ProductInfo {
            product_id: Some(product_id.into()),
            product_category: category,
        }
    }

    /// A listing page: no product, category `"all"`, so only general
    /// rules can match.
    pub fn listing() -> Self {
        ProductInfo {
            product_id: None,
            product_category: Some(geoprice_core::ALL_CATEGORIES.to_string()),
        }
    }
}

/// One element displaying a price.
pub trait PriceElement {
    /// Identifies the element across re-scans.
    fn key(&self) -> String;

    fn text(&self) -> String;

    fn set_text(&mut self, text: &str);

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&mut self, name: &str, value: &str);
}

/// A rendered storefront page.
pub trait Storefront: Send {
    /// Product identity of the page, or [`ProductInfo::listing`] if the
    /// page is not a single product.
    fn product_info(&self) -> ProductInfo;

    /// Visits every price element currently on the page.
    fn for_each_price_element(&mut self, f: &mut dyn FnMut(&mut dyn PriceElement));

    /// Returns true if the country indicator is already on the page.
    fn has_indicator(&self) -> bool;

    /// Inserts the country indicator near the prices. Returns false if the
    /// page has nowhere to put it.
    fn insert_indicator(&mut self, text: &str) -> bool;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// A price element held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    pub id: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
}

impl MemoryElement {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        MemoryElement {
            id: id.into(),
            text: text.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

impl PriceElement for MemoryElement {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

/// A storefront page held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorefront {
    pub product: Option<ProductInfo>,
    pub elements: Vec<MemoryElement>,
    /// Whether the page has a price container to hold the indicator.
    pub has_price_container: bool,
    pub indicator: Option<String>,
}

impl MemoryStorefront {
    /// An empty listing page with a price container.
    pub fn new() -> Self {
        MemoryStorefront {
            has_price_container: true,
            ..Default::default()
        }
    }

    pub fn with_product(mut self, product: ProductInfo) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_element(mut self, element: MemoryElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Looks up an element by id.
    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

impl Storefront for MemoryStorefront {
    fn product_info(&self) -> ProductInfo {
        self.product.clone().unwrap_or_else(ProductInfo::listing)
    }

    fn for_each_price_element(&mut self, f: &mut dyn FnMut(&mut dyn PriceElement)) {
        for element in &mut self.elements {
            f(element);
        }
    }

    fn has_indicator(&self) -> bool {
        self.indicator.is_some()
    }

    fn insert_indicator(&mut self, text: &str) -> bool {
        if !self.has_price_container {
            return false;
        }
        self.indicator = Some(text.to_string());
        true
    }
}

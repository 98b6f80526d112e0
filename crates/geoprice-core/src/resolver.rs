//! # Rule Resolver
//!
//! Picks at most one price rule for a product and computes the adjusted
//! price. This is the single implementation shared by the server's
//! calculation endpoint and the storefront agent.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rule Resolution                                   │
//! │                                                                         │
//! │  Candidate rules (active, one country, any order)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sort: priority DESC → created_at DESC → id DESC                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Scan in order:                                                        │
//! │     product_id  is None  OR == context.product_id                      │
//! │     category    == "all" OR == context.product_category                │
//! │       │                                                                 │
//! │       ├── first match → adjust price, STOP (no stacking)               │
//! │       │                                                                 │
//! │       └── no match    → price unchanged, applied_rule = None           │
//! │                                                                         │
//! │  Percentage: base × (1 + value / 100)                                  │
//! │  Fixed:      base + value                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver does not round and does not validate. Negative or
//! non-finite inputs flow straight through the arithmetic.

use std::cmp::Ordering;

use crate::types::{PriceContext, PriceRule, RuleType};
use crate::ALL_CATEGORIES;

/// Outcome of resolving a context against a rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Unrounded adjusted price.
    pub adjusted_price: f64,

    /// The single rule that was applied, if any matched.
    pub applied_rule: Option<PriceRule>,
}

/// Total order used to rank candidate rules, best first.
///
/// Higher priority first; equal priorities go to the most recently
/// created rule, then to the higher id.
pub fn rule_order(a: &PriceRule, b: &PriceRule) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Sorts rules into evaluation order (best first).
pub fn sort_rules(rules: &mut [PriceRule]) {
    rules.sort_by(rule_order);
}

/// Returns true if the rule's product scope covers the context.
pub fn matches_product(rule: &PriceRule, context: &PriceContext) -> bool {
    match rule.product_id {
        None => true,
        Some(ref id) => context.product_id.as_deref() == Some(id.as_str()),
    }
}

/// Returns true if the rule's category scope covers the context.
pub fn matches_category(rule: &PriceRule, context: &PriceContext) -> bool {
    rule.product_category == ALL_CATEGORIES
        || context.product_category.as_deref() == Some(rule.product_category.as_str())
}

/// Returns true if the rule applies to the context.
pub fn rule_matches(rule: &PriceRule, context: &PriceContext) -> bool {
    matches_product(rule, context) && matches_category(rule, context)
}

/// Applies one rule's adjustment to a base price.
///
/// ## Example
/// ```rust
/// use geoprice_core::resolver::apply_rule;
/// use geoprice_core::types::{PriceRule, RuleType};
///
/// let pct = PriceRule::new(1, RuleType::Percentage, 20.0);
/// assert_eq!(apply_rule(&pct, 50.0), 60.0);
///
/// let fixed = PriceRule::new(1, RuleType::Fixed, -5.0);
/// assert_eq!(apply_rule(&fixed, 50.0), 45.0);
/// ```
pub fn apply_rule(rule: &PriceRule, base_price: f64) -> f64 {
    match rule.rule_type {
        RuleType::Percentage => base_price * (1.0 + rule.value / 100.0),
        RuleType::Fixed => base_price + rule.value,
    }
}

/// Finds the first matching rule in evaluation order.
pub fn select_rule<'a>(rules: &'a [PriceRule], context: &PriceContext) -> Option<&'a PriceRule> {
    let mut ordered: Vec<&PriceRule> = rules.iter().collect();
    ordered.sort_by(|a, b| rule_order(a, b));

    ordered.into_iter().find(|rule| rule_matches(rule, context))
}

/// Resolves a context against a rule set.
///
/// ## Arguments
/// * `rules` - Active rules of one country, in any order
/// * `context` - Product id, category and base price
///
/// ## Returns
/// The adjusted price and the applied rule. When nothing matches the
/// base price is returned unchanged with `applied_rule = None`.
pub fn resolve(rules: &[PriceRule], context: &PriceContext) -> Resolution {
    match select_rule(rules, context) {
        Some(rule) => Resolution {
            adjusted_price: apply_rule(rule, context.base_price),
            applied_rule: Some(rule.clone()),
        },
        None => Resolution {
            adjusted_price: context.base_price,
            applied_rule: None,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

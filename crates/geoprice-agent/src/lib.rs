//! # geoprice-agent: Storefront Injection Agent
//!
//! Detects the visitor's country, downloads that country's active price
//! rules, and rewrites the prices a storefront page displays. Prices are
//! computed with the same resolver the server's calculation endpoint uses
//! (`geoprice_core::resolver`).
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         geoprice-agent                                  │
//! │                                                                         │
//! │  ┌──────────┐    ┌────────────┐    ┌────────────────┐                  │
//! │  │ detect   │───►│ client     │───►│ context        │                  │
//! │  │ country  │    │ GET rules  │    │ PricingContext │                  │
//! │  └──────────┘    └────────────┘    └───────┬────────┘                  │
//! │                                            │ update_prices              │
//! │  ┌──────────┐    PageEvent (mpsc)   ┌──────▼────────┐                  │
//! │  │ watch    │──────────────────────►│ page          │                  │
//! │  │ debounce │                       │ Storefront    │                  │
//! │  └──────────┘                       └───────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use geoprice_agent::{Agent, AgentConfig, PageEvent};
//!
//! let agent = Agent::new(AgentConfig::from_env_or_default());
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//!
//! // Hand `tx` to whatever observes the page, then:
//! let (context, stats) = agent.run(&mut page, rx).await;
//! ```

pub mod agent;
pub mod client;
pub mod config;
pub mod context;
pub mod detect;
pub mod error;
pub mod page;
pub mod watch;

pub use agent::Agent;
pub use client::RuleClient;
pub use config::AgentConfig;
pub use context::{PricingContext, UpdateSummary};
pub use detect::{CountryDetector, DetectedCountry, DetectionSource};
pub use error::{AgentError, AgentResult};
pub use page::{MemoryElement, MemoryStorefront, PriceElement, ProductInfo, Storefront};
pub use watch::{PageEvent, WatchStats};

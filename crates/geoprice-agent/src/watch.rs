//! # Page Watcher
//!
//! Re-runs the update pass when the page changes.
//!
//! ```text
//!  events (mpsc)                      watcher
//!  ─────────────                      ───────
//!  Mutation{adds_price_elements}  ──► true:  wait until quiet for `debounce`,
//!                                            then one re-scan for the burst
//!                                     false: ignored
//!  Navigated                      ──► invalidate context, re-scan
//!  channel closed                 ──► stop
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::context::PricingContext;
use crate::page::Storefront;

/// A change observed on the storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Nodes were added to the page.
    Mutation {
        /// Whether any added node contains a price element.
        adds_price_elements: bool,
    },
    /// The page navigated; existing elements are gone.
    Navigated,
}

/// Totals for one watcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub events: usize,
    pub rescans: usize,
}

/// Consumes page events until the channel closes.
pub async fn watch_page(
    context: &mut PricingContext,
    page: &mut dyn Storefront,
    events: &mut mpsc::Receiver<PageEvent>,
    debounce: Duration,
) -> WatchStats {
    let mut stats = WatchStats::default();

    while let Some(event) = events.recv().await {
        stats.events += 1;

        match event {
            PageEvent::Mutation {
                adds_price_elements: false,
            } => continue,

            PageEvent::Navigated => {
                context.invalidate();
            }

            PageEvent::Mutation {
                adds_price_elements: true,
            } => {
                let burst = settle(events, debounce).await;
                stats.events += burst.absorbed;
                if burst.navigated {
                    context.invalidate();
                }
                context.update_prices(page);
                stats.rescans += 1;

                if burst.closed {
                    break;
                }
                continue;
            }
        }

        context.update_prices(page);
        stats.rescans += 1;
    }

    info!(events = stats.events, rescans = stats.rescans, "Page watcher stopped");
    stats
}

struct Burst {
    absorbed: usize,
    navigated: bool,
    closed: bool,
}

/// Swallows events until none arrives for `debounce`.
async fn settle(events: &mut mpsc::Receiver<PageEvent>, debounce: Duration) -> Burst {
    let mut burst = Burst {
        absorbed: 0,
        navigated: false,
        closed: false,
    };

    loop {
        match timeout(debounce, events.recv()).await {
            Ok(Some(event)) => {
                burst.absorbed += 1;
                if event == PageEvent::Navigated {
                    burst.navigated = true;
                }
            }
            Ok(None) => {
                burst.closed = true;
                break;
            }
            Err(_) => break,
        }
    }

    debug!(absorbed = burst.absorbed, "Mutation burst settled");
    burst
}

//! Search analytics store module.
//!
//! Records which search terms users type and which movie ranked first,
//! as a running counter per normalized term in a remote document store.

mod api;
mod appwrite;
mod disabled;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{AnalyticsStore, LocalAnalyticsStore};
pub use appwrite::{AppwriteClient, AppwriteClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use disabled::DisabledAnalytics;
pub use types::{SearchRecord, normalize_search_term};

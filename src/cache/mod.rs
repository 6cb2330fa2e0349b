//! Query cache for note list pages.
//!
//! - [`QueryCache`] stores pages keyed by [`QueryKey`] and supports
//!   per-kind "mark stale" invalidation.
//! - [`DehydratedState`] is the serialized form handed from the prefetch step
//!   to whichever reader hydrates it.
//!
//! ```toml
//! [cache]
//! max_entries = 256
//! ```

mod config;
mod keys;
mod lock;
mod snapshot;
mod store;

pub use config::CacheConfig;
pub use keys::{QueryKey, ResourceKind};
pub use snapshot::{DehydratedQuery, DehydratedState};
pub use store::{CacheEntry, QueryCache};

//! Typed ports for remote playlist backends.
//!
//! This crate defines everything the reconciliation engine needs to talk
//! about a remote system without knowing one: typed identifiers, the
//! placement and video value types, the [`PlaylistStore`] and
//! [`VideoSource`] port traits, the [`StoreError`] taxonomy, and the
//! [`QuotaPool`] that meters calls against a fixed budget.
//!
//! Concrete backends (the real API client, test fakes) implement the
//! traits; the engine in `cuesync-engine` consumes them.

pub mod error;
pub mod ids;
pub mod quota;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use ids::{ChannelId, ItemId, PlaylistId, VideoId};
pub use quota::{DEFAULT_QUOTA_BUDGET, OpKind, QuotaPool};
pub use traits::{PlaylistStore, VideoSource};
pub use types::{PlaylistEntry, VideoEntry};

//! Metadata providers for castrank.
//!
//! - [`ImdbProvider`] talks to IMDb over HTTP (blocking `ureq` agent).
//! - [`SnapshotProvider`] answers from a JSON file, for offline runs and tests.

mod imdb;
mod snapshot;

pub use imdb::ImdbProvider;
pub use snapshot::{ProviderCall, Snapshot, SnapshotCredit, SnapshotPerson, SnapshotProvider};

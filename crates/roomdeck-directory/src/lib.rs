//! Room directory cache for Roomdeck.
//!
//! The matchmaking service never sends the full room list twice. It sends
//! incremental batches ("room A appeared", "room B now has 3 players",
//! "room C is gone") and the client is expected to keep its own copy.
//! This crate is that copy.
//!
//! # Key types
//!
//! - [`DirectoryCache`]: `name → room` map plus the reconciliation
//!   algorithm that merges update batches into it
//! - [`ViewFactory`]: the seam through which a UI creates, refreshes and
//!   releases the widget that shows each room
//! - [`DirectoryChange`]: what changed, for listeners
//! - [`Reconciliation`]: the outcome of one batch
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection layer (above)  ← feeds batches in, forwards changes out
//!     ↕
//! Directory layer (this crate)  ← owns the cache and its invariants
//!     ↕
//! Protocol layer (below)  ← provides RoomRecord, RoomUpdate
//! ```

mod cache;
mod change;
mod view;

pub use cache::DirectoryCache;
pub use change::{DirectoryChange, Reconciliation};
pub use view::{NoViews, ViewFactory};

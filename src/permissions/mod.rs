//! Permission system for capability checks.
//!
//! This module decides whether the identity behind an event holds a
//! required privilege level: the global owner/dev/sudo tiers, generic
//! chat-admin status, chat ownership, or a specific admin privilege
//! flag (restrict/promote/change-info/pin).
//!
//! ## Usage
//!
//! ```rust,ignore
//! let checker = CapabilityChecker::new(identity, admin_cache, reply_sink);
//!
//! if checker.check(&event, CapabilityRequirement::CanRestrict).await {
//!     // run the ban/mute handler
//! }
//! ```
//!
//! Checks return a bare boolean; deny reasons are delivered out-of-band
//! through the configured [`ReplySink`](crate::membership::ReplySink).

mod checker;

pub use checker::{CapabilityChecker, CapabilityRequirement};

//! # GuildPost Delivery
//!
//! Resolves a concrete destination for a sign-up announcement through a
//! prioritized fallback chain with permission checks at each step.
//!
//! ## Tier chain
//! ```text
//! DeliveryChannelResolver
//!   ├── 1. Preferred channel → private thread (needs ManageThreads)
//!   ├── 2. Guild scan        → first channel allowing CreatePrivateThreads
//!   └── 3. Direct message    → DM channel, if sendable
//!            └── exhausted   → NoDeliveryTarget (logged, occurrence skipped)
//! ```
//!
//! Failures inside a tier are swallowed and the chain moves on; only full
//! exhaustion surfaces as an error.

pub mod resolver;

pub use resolver::DeliveryChannelResolver;

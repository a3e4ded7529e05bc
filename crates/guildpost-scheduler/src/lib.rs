//! # GuildPost Scheduler
//!
//! Recurring announcement scheduling engine — computes exactly when a session
//! template's next sign-up post is due and drives the periodic sweep that
//! publishes it.
//!
//! ## Architecture
//! ```text
//! SweepEngine (tokio interval)
//!   ├── TemplateStore::load_due_templates(now)
//!   ├── next_due_post(template, now)
//!   │     ├── anchor:     wall-clock ↔ UTC in the guild's IANA zone
//!   │     ├── recurrence: RRULE → next occurrence on/after start of day
//!   │     └── offset:     "day before"/"day of" post time, clamped ≤ 0
//!   ├── DeliveryChannelResolver → thread or DM
//!   └── TemplateStore::persist_schedule (conditional, claim-then-send)
//! ```
//!
//! All computation is pure; the engine owns the only side effects.

pub mod anchor;
pub mod engine;
pub mod next_post;
pub mod offset;
pub mod recurrence;

pub use engine::{EngineConfig, SweepEngine};
pub use next_post::{GRACE_BUFFER_MS, next_due_post};

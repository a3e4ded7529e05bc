//! Core data types shared across GuildPost crates.

mod delivery;
mod template;

pub use delivery::{Capability, ChannelKind, ChannelRef, DeliveryTarget};
pub use template::{DayPolicy, LocalDateFields, PostTime, SessionTemplate};

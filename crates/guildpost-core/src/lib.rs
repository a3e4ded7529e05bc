//! # GuildPost Core
//! Shared foundation for the GuildPost session bot — data model, error
//! taxonomy, and the collaborator traits the scheduler and delivery layers
//! are written against.
//!
//! The chat-platform client and the database live behind [`traits::Messaging`]
//! and [`traits::TemplateStore`]; this crate owns only the contracts.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{GuildPostError, Result};
pub use types::{
    Capability, ChannelKind, ChannelRef, DayPolicy, DeliveryTarget, LocalDateFields, PostTime,
    SessionTemplate,
};

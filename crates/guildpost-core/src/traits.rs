//! Collaborator traits — the seams between the scheduling core and the
//! chat platform / database it runs against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Capability, ChannelRef, SessionTemplate};

/// Chat-platform operations the delivery layer needs. Implemented over the
/// platform SDK in the integration crate; mocked in tests.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Whether `agent_id` holds `capability` on `channel_id`.
    async fn has_capability(
        &self,
        agent_id: &str,
        channel_id: &str,
        capability: Capability,
    ) -> Result<bool>;

    /// Create a private thread under `channel_id`, returning its id.
    /// Not idempotent — a retry after partial failure can leave an orphaned
    /// empty thread behind.
    async fn create_private_thread(
        &self,
        channel_id: &str,
        name: &str,
    ) -> Result<String>;

    async fn add_thread_member(&self, thread_id: &str, user_id: &str) -> Result<()>;

    /// All text-capable channels of the guild, in the platform's order.
    async fn list_text_channels(&self, guild_id: &str) -> Result<Vec<ChannelRef>>;

    /// Open (or fetch) the DM channel with `user_id`.
    async fn open_direct_message(&self, user_id: &str) -> Result<String>;

    /// Whether the agent can actually send into the DM channel.
    async fn is_sendable(&self, dm_channel_id: &str) -> Result<bool>;

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()>;
}

/// Persistence operations for session templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Templates whose cached `next_post_utc` is unset or at/before `now`.
    async fn load_due_templates(&self, now: DateTime<Utc>) -> Result<Vec<SessionTemplate>>;

    /// Conditional bookkeeping write: applies only while the stored
    /// `last_post_utc` still equals `expected_last_post`. Returns `false`
    /// when a concurrent sweep advanced the template first; the caller must
    /// then skip its post. This is what keeps announcements
    /// at-most-once-per-occurrence under overlapping sweeps.
    async fn persist_schedule(
        &self,
        template_id: Uuid,
        expected_last_post: Option<DateTime<Utc>>,
        last_post: Option<DateTime<Utc>>,
        next_post: Option<DateTime<Utc>>,
    ) -> Result<bool>;
}

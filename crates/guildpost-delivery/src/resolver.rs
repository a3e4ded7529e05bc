//! Delivery destination resolution — ordered tier chain, terminal on first
//! success.

use std::sync::Arc;
use std::time::Duration;

use guildpost_core::error::{GuildPostError, Result};
use guildpost_core::traits::Messaging;
use guildpost_core::types::{Capability, ChannelRef, DeliveryTarget};

const DEFAULT_TIER_TIMEOUT: Duration = Duration::from_secs(10);

/// One ranked strategy in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Preferred,
    GuildScan,
    DirectMessage,
}

const TIER_ORDER: [Tier; 3] = [Tier::Preferred, Tier::GuildScan, Tier::DirectMessage];

/// Resolves where a sign-up announcement can actually be delivered.
///
/// Tiers 1–2 perform live thread creation against the platform; they are not
/// idempotent, so a retry after partial failure can leave an orphaned empty
/// thread. Accepted trade-off.
pub struct DeliveryChannelResolver {
    messaging: Arc<dyn Messaging>,
    tier_timeout: Duration,
}

impl DeliveryChannelResolver {
    pub fn new(messaging: Arc<dyn Messaging>) -> Self {
        Self {
            messaging,
            tier_timeout: DEFAULT_TIER_TIMEOUT,
        }
    }

    /// Bound each tier so one unresponsive platform call cannot stall the
    /// whole sweep.
    pub fn with_tier_timeout(mut self, tier_timeout: Duration) -> Self {
        self.tier_timeout = tier_timeout;
        self
    }

    /// Walk the tier chain; first success wins.
    ///
    /// `agent_id` is the bot's own user id, passed explicitly rather than
    /// read from ambient state. `preferred` may reference a thread, in which
    /// case its parent channel is attempted instead.
    pub async fn resolve(
        &self,
        guild_id: &str,
        agent_id: &str,
        user_id: &str,
        preferred: Option<&ChannelRef>,
        thread_name: &str,
    ) -> Result<DeliveryTarget> {
        for tier in TIER_ORDER {
            let attempt = self.try_tier(tier, guild_id, agent_id, user_id, preferred, thread_name);
            match tokio::time::timeout(self.tier_timeout, attempt).await {
                Ok(Ok(Some(target))) => {
                    tracing::debug!("Delivery resolved via {tier:?}: {target:?}");
                    return Ok(target);
                }
                Ok(Ok(None)) => {
                    tracing::trace!("Tier {tier:?} yielded no target, falling through");
                }
                Ok(Err(e)) => {
                    tracing::debug!("Tier {tier:?} failed ({e}), falling through");
                }
                Err(_) => {
                    tracing::warn!(
                        "Tier {tier:?} timed out after {:?}, falling through",
                        self.tier_timeout
                    );
                }
            }
        }
        Err(GuildPostError::NoDeliveryTarget(format!(
            "guild {guild_id}, user {user_id}: all delivery tiers exhausted"
        )))
    }

    async fn try_tier(
        &self,
        tier: Tier,
        guild_id: &str,
        agent_id: &str,
        user_id: &str,
        preferred: Option<&ChannelRef>,
        thread_name: &str,
    ) -> Result<Option<DeliveryTarget>> {
        match tier {
            Tier::Preferred => self.try_preferred(agent_id, user_id, preferred, thread_name).await,
            Tier::GuildScan => self.try_guild_scan(guild_id, agent_id, user_id, thread_name).await,
            Tier::DirectMessage => self.try_direct_message(user_id).await,
        }
    }

    async fn try_preferred(
        &self,
        agent_id: &str,
        user_id: &str,
        preferred: Option<&ChannelRef>,
        thread_name: &str,
    ) -> Result<Option<DeliveryTarget>> {
        let Some(channel) = preferred else {
            return Ok(None);
        };
        // A thread reference is attempted on its parent channel.
        let channel_id = channel.creation_target();
        if !self
            .messaging
            .has_capability(agent_id, channel_id, Capability::ManageThreads)
            .await?
        {
            return Ok(None);
        }
        self.open_thread(channel_id, agent_id, user_id, thread_name).await
    }

    async fn try_guild_scan(
        &self,
        guild_id: &str,
        agent_id: &str,
        user_id: &str,
        thread_name: &str,
    ) -> Result<Option<DeliveryTarget>> {
        let channels = self.messaging.list_text_channels(guild_id).await?;
        for channel in &channels {
            let permitted = matches!(
                self.messaging
                    .has_capability(agent_id, &channel.id, Capability::CreatePrivateThreads)
                    .await,
                Ok(true)
            );
            if !permitted {
                continue;
            }
            // One channel's failure must not block the rest of the guild.
            match self.open_thread(&channel.id, agent_id, user_id, thread_name).await {
                Ok(Some(target)) => return Ok(Some(target)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("Thread creation in {} failed ({e}), trying next", channel.id);
                    continue;
                }
            }
        }
        Ok(None)
    }

    async fn try_direct_message(&self, user_id: &str) -> Result<Option<DeliveryTarget>> {
        let dm_channel = self.messaging.open_direct_message(user_id).await?;
        if self.messaging.is_sendable(&dm_channel).await? {
            Ok(Some(DeliveryTarget::DirectMessage {
                channel_id: dm_channel,
            }))
        } else {
            Ok(None)
        }
    }

    async fn open_thread(
        &self,
        channel_id: &str,
        agent_id: &str,
        user_id: &str,
        thread_name: &str,
    ) -> Result<Option<DeliveryTarget>> {
        let thread_id = self
            .messaging
            .create_private_thread(channel_id, thread_name)
            .await?;
        // The thread exists and is usable even if a member add fails.
        for member in [agent_id, user_id] {
            if let Err(e) = self.messaging.add_thread_member(&thread_id, member).await {
                tracing::warn!("Could not add {member} to thread {thread_id}: {e}");
            }
        }
        Ok(Some(DeliveryTarget::Thread {
            channel_id: channel_id.to_string(),
            thread_id,
        }))
    }
}

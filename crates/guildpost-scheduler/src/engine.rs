//! Periodic sweep driver — loads due templates, publishes sign-up posts,
//! and advances schedule bookkeeping.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use guildpost_core::error::{GuildPostError, Result};
use guildpost_core::traits::{Messaging, TemplateStore};
use guildpost_core::types::{ChannelRef, SessionTemplate};
use guildpost_delivery::DeliveryChannelResolver;
use serde::{Deserialize, Serialize};

use crate::next_post::next_due_post;

/// Sweep engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_tier_timeout_secs")]
    pub tier_timeout_secs: u64,
    /// The bot's own user id — the acting agent for permission checks,
    /// passed through explicitly instead of read from global state.
    pub agent_id: String,
}

fn default_sweep_interval_secs() -> u64 {
    60
}
fn default_tier_timeout_secs() -> u64 {
    10
}

/// Drives the announcement lifecycle on a fixed interval.
///
/// Templates are processed independently within a sweep; one template's
/// failure never blocks the rest.
pub struct SweepEngine {
    config: EngineConfig,
    store: Arc<dyn TemplateStore>,
    messaging: Arc<dyn Messaging>,
    resolver: DeliveryChannelResolver,
}

impl SweepEngine {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn TemplateStore>,
        messaging: Arc<dyn Messaging>,
    ) -> Self {
        let resolver = DeliveryChannelResolver::new(messaging.clone())
            .with_tier_timeout(StdDuration::from_secs(config.tier_timeout_secs));
        Self {
            config,
            store,
            messaging,
            resolver,
        }
    }

    /// Run sweeps forever. A tick that overruns the interval is skipped, not
    /// queued up.
    pub async fn run(&self) {
        let mut ticker =
            tokio::time::interval(StdDuration::from_secs(self.config.sweep_interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::info!(
            "Sweep engine started (every {}s)",
            self.config.sweep_interval_secs
        );
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep(Utc::now()).await {
                tracing::error!("Sweep failed: {e}");
            }
        }
    }

    /// One pass over every due template.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<()> {
        let due = self.store.load_due_templates(now).await?;
        tracing::debug!("Sweep at {now}: {} template(s) to check", due.len());
        for template in due {
            if let Err(e) = self.process_template(&template, now).await {
                if e.is_template_config() {
                    tracing::warn!(
                        "Template {} ({}) misconfigured, not scheduled until corrected: {e}",
                        template.id,
                        template.name
                    );
                } else {
                    tracing::warn!("Template {} failed this sweep: {e}", template.id);
                }
            }
        }
        Ok(())
    }

    async fn process_template(&self, template: &SessionTemplate, now: DateTime<Utc>) -> Result<()> {
        // Recompute first: the cached next_post_utc is advisory only, and a
        // config error here must block the template before anything fires.
        let next = next_due_post(template, now)?;

        let Some(due_at) = template.next_post_utc.filter(|t| *t <= now) else {
            // Nothing due; refresh the advisory cache if it drifted.
            if next != template.next_post_utc {
                self.store
                    .persist_schedule(template.id, template.last_post_utc, template.last_post_utc, next)
                    .await?;
            }
            return Ok(());
        };

        // Claim the occurrence before sending. The conditional write keyed
        // on the previous last_post_utc is what guarantees at-most-one post
        // per occurrence under overlapping sweeps.
        let claimed = self
            .store
            .persist_schedule(template.id, template.last_post_utc, Some(due_at), next)
            .await?;
        if !claimed {
            tracing::debug!(
                "Template {} already advanced by a concurrent sweep",
                template.id
            );
            return Ok(());
        }

        match self.deliver(template).await {
            Ok(()) => {
                tracing::info!("Posted sign-up for template {} ({})", template.id, template.name);
                Ok(())
            }
            Err(GuildPostError::NoDeliveryTarget(msg)) => {
                // Skip-until-next-occurrence, by design; see DESIGN.md.
                tracing::warn!(
                    "Template {}: no delivery target ({msg}); occurrence skipped",
                    template.id
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn deliver(&self, template: &SessionTemplate) -> Result<()> {
        let preferred = template.post_channel_id.as_deref().map(ChannelRef::text);
        let thread_name = format!("{} sign-up", template.name);
        let target = self
            .resolver
            .resolve(
                &template.guild_id,
                &self.config.agent_id,
                &template.owner_id,
                preferred.as_ref(),
                &thread_name,
            )
            .await?;
        let content = format!("**{}** is coming up — sign up here!", template.name);
        self.messaging
            .send_message(target.send_channel_id(), &content)
            .await
    }
}

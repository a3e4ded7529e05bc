//! Delivery destination types for sign-up announcements.

use serde::{Deserialize, Serialize};

/// What a channel reference points at on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Text,
    /// A thread; delivery resolution substitutes the parent channel.
    Thread { parent_id: String },
}

/// Reference to a guild channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: ChannelKind,
}

impl ChannelRef {
    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: ChannelKind::Text,
        }
    }

    pub fn thread(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: ChannelKind::Thread {
                parent_id: parent_id.into(),
            },
        }
    }

    /// Channel id that thread creation must target — a thread ref yields
    /// its parent.
    pub fn creation_target(&self) -> &str {
        match &self.kind {
            ChannelKind::Text => &self.id,
            ChannelKind::Thread { parent_id } => parent_id,
        }
    }
}

/// Concrete destination a sign-up announcement is published into.
/// Resolution either produces one of these or fails explicitly; there is
/// no null target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryTarget {
    Thread {
        /// Parent channel the thread was created under.
        channel_id: String,
        thread_id: String,
    },
    DirectMessage {
        channel_id: String,
    },
}

impl DeliveryTarget {
    /// Channel id messages are sent into.
    pub fn send_channel_id(&self) -> &str {
        match self {
            DeliveryTarget::Thread { thread_id, .. } => thread_id,
            DeliveryTarget::DirectMessage { channel_id } => channel_id,
        }
    }
}

/// Platform capability checks performed before thread creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageThreads,
    CreatePrivateThreads,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_target_substitutes_parent() {
        let text = ChannelRef::text("c1");
        assert_eq!(text.creation_target(), "c1");

        let thread = ChannelRef::thread("t9", "c1");
        assert_eq!(thread.creation_target(), "c1");
    }

    #[test]
    fn test_send_channel_id() {
        let t = DeliveryTarget::Thread {
            channel_id: "c1".into(),
            thread_id: "t1".into(),
        };
        assert_eq!(t.send_channel_id(), "t1");

        let dm = DeliveryTarget::DirectMessage {
            channel_id: "d1".into(),
        };
        assert_eq!(dm.send_channel_id(), "d1");
    }

    #[test]
    fn test_target_tagged_serde() {
        let t = DeliveryTarget::DirectMessage {
            channel_id: "d1".into(),
        };
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"type\":\"direct_message\""));
    }
}

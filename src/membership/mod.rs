//! Chat membership model and collaborator interfaces.
//!
//! The gating layer never talks to the platform itself. It reads
//! per-chat admin lists through [`AdminCache`], resolves single members
//! through [`ChatMemberLookup`], and delivers deny-reason replies
//! through [`ReplySink`]. The embedding bot implements these against
//! its SDK of choice.

mod cache;

pub use cache::InMemoryAdminCache;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{ChatContext, ChatId, UserId};

/// A member's standing in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

/// Per-admin privilege flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privileges {
    pub can_delete_messages: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    pub can_pin_messages: bool,
}

impl Privileges {
    /// Every flag set. Chat owners implicitly hold all privileges.
    pub fn all() -> Self {
        Self {
            can_delete_messages: true,
            can_restrict_members: true,
            can_promote_members: true,
            can_change_info: true,
            can_invite_users: true,
            can_pin_messages: true,
        }
    }
}

/// A resolved chat member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub user_id: UserId,
    pub status: MemberStatus,
    pub privileges: Privileges,
}

impl MemberInfo {
    /// A chat owner entry (all privileges).
    pub fn owner(user_id: UserId) -> Self {
        Self {
            user_id,
            status: MemberStatus::Owner,
            privileges: Privileges::all(),
        }
    }

    /// An administrator entry with explicit privileges.
    pub fn admin(user_id: UserId, privileges: Privileges) -> Self {
        Self {
            user_id,
            status: MemberStatus::Administrator,
            privileges,
        }
    }

    /// An ordinary member entry.
    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id,
            status: MemberStatus::Member,
            privileges: Privileges::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.status, MemberStatus::Owner | MemberStatus::Administrator)
    }
}

/// The admins known for a single chat.
#[derive(Debug, Clone, Default)]
pub struct AdminRecord {
    admins: HashMap<UserId, MemberInfo>,
}

impl AdminRecord {
    /// Build a record from a member list, keeping only admin-status
    /// entries.
    pub fn from_members(members: impl IntoIterator<Item = MemberInfo>) -> Self {
        Self {
            admins: members
                .into_iter()
                .filter(MemberInfo::is_admin)
                .map(|m| (m.user_id, m))
                .collect(),
        }
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.admins.contains_key(&user)
    }

    pub fn get(&self, user: UserId) -> Option<&MemberInfo> {
        self.admins.get(&user)
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

/// Membership resolution failures.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// No cached admin list for this chat; a reload may recover.
    #[error("no cached admin list for chat {0}")]
    NotCached(ChatId),

    /// The chat id names a private user rather than a group. Checks
    /// treat this as an allow carve-out, not a failure.
    #[error("chat {0} belongs to a private user")]
    PrivateChat(ChatId),

    /// Member details could not be resolved; terminal for this check.
    #[error("failed to resolve chat member details")]
    Resolution(#[source] anyhow::Error),
}

/// Per-chat admin list source with explicit miss/reload semantics.
#[async_trait]
pub trait AdminCache: Send + Sync {
    /// Look up the cached admin record for a chat. Misses surface as
    /// [`MembershipError::NotCached`].
    async fn get(&self, chat_id: ChatId) -> Result<AdminRecord, MembershipError>;

    /// Repopulate the record for a chat. `reason` is an audit tag for
    /// logs, naming the code path that forced the reload.
    async fn reload(&self, ctx: &ChatContext, reason: &str)
    -> Result<AdminRecord, MembershipError>;
}

/// Live member data from the platform.
#[async_trait]
pub trait ChatMemberLookup: Send + Sync {
    /// Resolve a single member of a chat.
    async fn member(&self, chat_id: ChatId, user_id: UserId)
    -> Result<MemberInfo, MembershipError>;

    /// List the full admin set of a chat.
    async fn admins(&self, chat_id: ChatId) -> Result<Vec<MemberInfo>, MembershipError>;
}

/// Outbound deny-reason delivery, fire-and-forget.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, ctx: &ChatContext, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_only_admins() {
        let record = AdminRecord::from_members([
            MemberInfo::owner(UserId(1)),
            MemberInfo::admin(UserId(2), Privileges::default()),
            MemberInfo::member(UserId(3)),
        ]);

        assert_eq!(record.len(), 2);
        assert!(record.contains(UserId(1)));
        assert!(record.contains(UserId(2)));
        assert!(!record.contains(UserId(3)));
    }

    #[test]
    fn owner_holds_all_privileges() {
        let owner = MemberInfo::owner(UserId(1));
        assert!(owner.is_admin());
        assert!(owner.privileges.can_pin_messages);
        assert!(owner.privileges.can_restrict_members);
    }
}

//! Capability checker.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::IdentityConfig;
use crate::event::{ChatContext, Event};
use crate::membership::{AdminCache, AdminRecord, MemberStatus, MembershipError, Privileges, ReplySink};

const MSG_OWNER_ONLY: &str = "Only owner allowed to use this...!";
const MSG_DEV_ONLY: &str = "Only devs allowed to use this...!";
const MSG_SUDO_ONLY: &str = "Only sudos and above allowed to use it...!";
const MSG_GROUPS_ONLY: &str = "This command is made to be used in groups not in pm!";
const MSG_NOT_ADMIN: &str = "You cannot use an admin command!";
const MSG_ADMIN_LIMITS: &str = "You're an admin only, stay in your limits!";
const MSG_NOT_CHAT_OWNER: &str = "Do you think that you can execute owner commands?";
const MSG_NO_RESTRICT: &str = "You don't have permissions to restrict members!";
const MSG_NO_PROMOTE: &str = "You don't have permission to promote members!";
const MSG_NO_CHANGE_INFO: &str = "You don't have: can_change_info permission!";
const MSG_NO_PIN: &str = "You don't have: can_pin_messages permission!";
const MSG_BOT_NOT_ADMIN: &str = "I am not an admin to receive updates in this group; Mind Promoting?";

/// What a command requires of its invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapabilityRequirement {
    /// Anyone may invoke.
    #[default]
    None,
    /// The bot owner.
    Owner,
    /// Dev level (devs and the owner).
    Dev,
    /// Sudo level (sudo users, devs, and the owner).
    Sudo,
    /// Any admin of the current chat.
    ChatAdmin,
    /// The owner of the current chat.
    ChatOwner,
    /// An admin holding `can_restrict_members`.
    CanRestrict,
    /// An admin holding `can_promote_members`.
    CanPromote,
    /// An admin holding `can_change_info`.
    CanChangeInfo,
    /// An admin holding `can_pin_messages`; sudo level bypasses.
    CanPin,
}

/// Outcome of an admin-record lookup, after the one permitted reload.
enum Lookup {
    Record(AdminRecord),
    /// The source reported the chat id belongs to a private user.
    PrivateChat,
    Unavailable,
}

/// Decides allow/deny for a capability requirement.
///
/// Each check is terminal in one call: a cache miss triggers a single
/// reload, and any remaining failure resolves to deny. Deny reasons go
/// out through the reply sink; the return value is a bare boolean.
#[derive(Clone)]
pub struct CapabilityChecker {
    identity: Arc<IdentityConfig>,
    admins: Arc<dyn AdminCache>,
    replies: Arc<dyn ReplySink>,
}

impl CapabilityChecker {
    pub fn new(
        identity: Arc<IdentityConfig>,
        admins: Arc<dyn AdminCache>,
        replies: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            identity,
            admins,
            replies,
        }
    }

    /// Check an event against a requirement.
    pub async fn check(&self, event: &Event, requirement: CapabilityRequirement) -> bool {
        match requirement {
            CapabilityRequirement::None => true,
            CapabilityRequirement::Owner => self.is_global_owner(event).await,
            CapabilityRequirement::Dev => self.is_dev(event).await,
            CapabilityRequirement::Sudo => self.is_sudo(event).await,
            CapabilityRequirement::ChatAdmin => self.is_chat_admin(event).await,
            CapabilityRequirement::ChatOwner => self.is_chat_owner(event).await,
            CapabilityRequirement::CanRestrict => self.can_restrict(event).await,
            CapabilityRequirement::CanPromote => self.can_promote(event).await,
            CapabilityRequirement::CanChangeInfo => self.can_change_info(event).await,
            CapabilityRequirement::CanPin => self.can_pin(event).await,
        }
    }

    /// Is the sender the bot owner?
    pub async fn is_global_owner(&self, event: &Event) -> bool {
        self.global_tier(event, MSG_OWNER_ONLY, |cfg, id| cfg.is_owner(id))
            .await
    }

    /// Is the sender dev level or above?
    pub async fn is_dev(&self, event: &Event) -> bool {
        self.global_tier(event, MSG_DEV_ONLY, IdentityConfig::dev_level)
            .await
    }

    /// Is the sender sudo level or above?
    pub async fn is_sudo(&self, event: &Event) -> bool {
        self.global_tier(event, MSG_SUDO_ONLY, IdentityConfig::sudo_level)
            .await
    }

    /// Is the sender an admin of this chat?
    pub async fn is_chat_admin(&self, event: &Event) -> bool {
        let ctx = event.chat();
        if !ctx.kind.is_group_like() {
            return false;
        }
        if ctx.anonymous_sender {
            return true;
        }
        let Some(who) = event.sender() else {
            return false;
        };

        match self.admin_record(ctx, "admin_check").await {
            Lookup::Record(record) => {
                if record.contains(who.id) {
                    true
                } else {
                    self.replies.reply(ctx, MSG_NOT_ADMIN).await;
                    false
                }
            }
            Lookup::PrivateChat => true,
            Lookup::Unavailable => false,
        }
    }

    /// Is the sender the owner of this chat?
    pub async fn is_chat_owner(&self, event: &Event) -> bool {
        let ctx = event.chat();
        if !ctx.kind.is_group_like() {
            return false;
        }
        if ctx.anonymous_sender {
            return true;
        }
        let Some(who) = event.sender() else {
            return false;
        };

        match self.admin_record(ctx, "owner_check").await {
            Lookup::Record(record) => match record.get(who.id) {
                Some(m) if m.status == MemberStatus::Owner => true,
                Some(_) => {
                    self.replies.reply(ctx, MSG_ADMIN_LIMITS).await;
                    false
                }
                None => {
                    self.replies.reply(ctx, MSG_NOT_CHAT_OWNER).await;
                    false
                }
            },
            Lookup::PrivateChat => true,
            Lookup::Unavailable => false,
        }
    }

    /// Can the sender restrict (ban, mute) members here?
    pub async fn can_restrict(&self, event: &Event) -> bool {
        self.privilege_check(
            event,
            |p| p.can_restrict_members,
            MSG_NO_RESTRICT,
            false,
            false,
        )
        .await
    }

    /// Can the sender promote or demote members here?
    pub async fn can_promote(&self, event: &Event) -> bool {
        self.privilege_check(
            event,
            |p| p.can_promote_members,
            MSG_NO_PROMOTE,
            false,
            false,
        )
        .await
    }

    /// Can the sender change this chat's info?
    pub async fn can_change_info(&self, event: &Event) -> bool {
        self.privilege_check(event, |p| p.can_change_info, MSG_NO_CHANGE_INFO, true, false)
            .await
    }

    /// Can the sender pin messages here? Sudo level bypasses the
    /// chat-level lookup entirely.
    pub async fn can_pin(&self, event: &Event) -> bool {
        self.privilege_check(event, |p| p.can_pin_messages, MSG_NO_PIN, true, true)
            .await
    }

    /// Is the bot itself an admin of this chat?
    pub async fn bot_is_admin(&self, event: &Event) -> bool {
        let ctx = event.chat();
        if !ctx.kind.is_group_like() {
            return false;
        }
        if ctx.anonymous_sender {
            return true;
        }

        match self.admin_record(ctx, "bot_admin_check").await {
            Lookup::Record(record) => {
                if record.contains(self.identity.bot_id) {
                    true
                } else {
                    self.replies.reply(ctx, MSG_BOT_NOT_ADMIN).await;
                    false
                }
            }
            Lookup::PrivateChat => true,
            Lookup::Unavailable => false,
        }
    }

    async fn global_tier(
        &self,
        event: &Event,
        deny_msg: &str,
        allowed: fn(&IdentityConfig, crate::event::UserId) -> bool,
    ) -> bool {
        let Some(who) = event.sender() else {
            return false;
        };
        if allowed(&self.identity, who.id) {
            true
        } else {
            self.replies.reply(event.chat(), deny_msg).await;
            false
        }
    }

    /// Shared path for the privilege-flag checks.
    async fn privilege_check(
        &self,
        event: &Event,
        flag: fn(&Privileges) -> bool,
        deny_msg: &str,
        reply_in_private: bool,
        sudo_bypass: bool,
    ) -> bool {
        let ctx = event.chat();
        if !ctx.kind.is_group_like() {
            if reply_in_private {
                self.replies.reply(ctx, MSG_GROUPS_ONLY).await;
            }
            return false;
        }
        if ctx.anonymous_sender {
            return true;
        }
        let Some(who) = event.sender() else {
            return false;
        };
        if sudo_bypass && self.identity.sudo_level(who.id) {
            return true;
        }

        match self.admin_record(ctx, "privilege_check").await {
            Lookup::Record(record) => {
                let allowed = record
                    .get(who.id)
                    .map(|m| flag(&m.privileges))
                    .unwrap_or(false);
                if !allowed {
                    self.replies.reply(ctx, deny_msg).await;
                }
                allowed
            }
            Lookup::PrivateChat => true,
            Lookup::Unavailable => false,
        }
    }

    /// Admin-record lookup with a single reload retry on a cold cache.
    async fn admin_record(&self, ctx: &ChatContext, reason: &str) -> Lookup {
        let result = match self.admins.get(ctx.id).await {
            Err(MembershipError::NotCached(_)) => {
                debug!(chat = %ctx.id, reason, "admin cache miss, reloading");
                self.admins.reload(ctx, reason).await
            }
            other => other,
        };

        match result {
            Ok(record) => Lookup::Record(record),
            Err(MembershipError::PrivateChat(_)) => Lookup::PrivateChat,
            Err(e) => {
                warn!(chat = %ctx.id, error = %e, "could not resolve admin list, denying");
                Lookup::Unavailable
            }
        }
    }
}

impl std::fmt::Debug for CapabilityChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityChecker")
            .field("identity", &self.identity)
            .finish()
    }
}

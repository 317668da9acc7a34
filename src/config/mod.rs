//! Configuration module for the gating layer.
//!
//! Loads the static identity tiers from environment variables. The
//! resulting struct is immutable; checks only ever read it.

use std::collections::HashSet;
use std::env;

use crate::event::UserId;

/// Static, bot-wide identity tiers.
///
/// Tier membership is cumulative downwards: the owner counts as a dev,
/// and devs count as sudo users.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// The bot's own user id (for bot-admin checks).
    pub bot_id: UserId,

    /// Bot username (without @) for command mention matching.
    pub bot_username: String,

    /// The single bot owner.
    pub owner_id: UserId,

    /// Developer user ids.
    pub dev_ids: HashSet<UserId>,

    /// Sudo user ids.
    pub sudo_ids: HashSet<UserId>,
}

impl IdentityConfig {
    pub fn new(
        bot_id: i64,
        bot_username: impl Into<String>,
        owner_id: i64,
        dev_ids: impl IntoIterator<Item = i64>,
        sudo_ids: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            bot_id: UserId(bot_id),
            bot_username: bot_username.into().trim_start_matches('@').to_string(),
            owner_id: UserId(owner_id),
            dev_ids: dev_ids.into_iter().map(UserId).collect(),
            sudo_ids: sudo_ids.into_iter().map(UserId).collect(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bot_id = env::var("BOT_ID")
            .expect("BOT_ID must be set")
            .trim()
            .parse::<i64>()
            .expect("BOT_ID must be a numeric user id");

        let bot_username = env::var("BOT_USERNAME")
            .expect("BOT_USERNAME must be set")
            .trim_start_matches('@')
            .to_string();

        let owner_id = env::var("OWNER_ID")
            .expect("OWNER_ID must be set")
            .trim()
            .parse::<i64>()
            .expect("OWNER_ID must be a numeric user id");

        Self {
            bot_id: UserId(bot_id),
            bot_username,
            owner_id: UserId(owner_id),
            dev_ids: parse_id_list(&env::var("DEV_IDS").unwrap_or_default()),
            sudo_ids: parse_id_list(&env::var("SUDO_IDS").unwrap_or_default()),
        }
    }

    /// Is this user the bot owner?
    pub fn is_owner(&self, user: UserId) -> bool {
        user == self.owner_id
    }

    /// Dev level: devs and the owner.
    pub fn dev_level(&self, user: UserId) -> bool {
        self.is_owner(user) || self.dev_ids.contains(&user)
    }

    /// Sudo level: sudo users, devs, and the owner.
    pub fn sudo_level(&self, user: UserId) -> bool {
        self.dev_level(user) || self.sudo_ids.contains(&user)
    }
}

/// Parse a comma-separated list of user ids, skipping malformed entries.
fn parse_id_list(raw: &str) -> HashSet<UserId> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .map(UserId)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IdentityConfig {
        IdentityConfig::new(999, "@testbot", 1, [2, 3], [4])
    }

    #[test]
    fn tiers_are_cumulative() {
        let cfg = config();

        assert!(cfg.is_owner(UserId(1)));
        assert!(!cfg.is_owner(UserId(2)));

        assert!(cfg.dev_level(UserId(1)));
        assert!(cfg.dev_level(UserId(2)));
        assert!(!cfg.dev_level(UserId(4)));

        assert!(cfg.sudo_level(UserId(1)));
        assert!(cfg.sudo_level(UserId(3)));
        assert!(cfg.sudo_level(UserId(4)));
        assert!(!cfg.sudo_level(UserId(5)));
    }

    #[test]
    fn username_is_stripped() {
        assert_eq!(config().bot_username, "testbot");
    }

    #[test]
    fn id_list_skips_garbage() {
        let ids = parse_id_list("1, 2,abc, 3,");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&UserId(2)));
    }
}

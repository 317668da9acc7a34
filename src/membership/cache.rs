//! Moka-backed admin cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{AdminCache, AdminRecord, ChatMemberLookup, MembershipError};
use crate::cache::{CacheConfig, TypedCache};
use crate::event::{ChatContext, ChatId};

/// Default [`AdminCache`] implementation: an in-process LRU keyed by
/// chat id, repopulated from a [`ChatMemberLookup`] on reload.
///
/// Entries expire on the cache's TTL; callers that observe an admin
/// change (promotion, demotion) can invalidate a chat eagerly.
#[derive(Clone)]
pub struct InMemoryAdminCache {
    lookup: Arc<dyn ChatMemberLookup>,
    cache: TypedCache<i64, AdminRecord>,
}

impl InMemoryAdminCache {
    pub fn new(lookup: Arc<dyn ChatMemberLookup>) -> Self {
        Self::with_config(lookup, CacheConfig::admin_lookup())
    }

    pub fn with_config(lookup: Arc<dyn ChatMemberLookup>, config: CacheConfig) -> Self {
        Self {
            lookup,
            cache: TypedCache::new("chat_admins", config),
        }
    }

    /// Drop the cached record for a chat.
    pub fn invalidate(&self, chat_id: ChatId) {
        self.cache.invalidate(&chat_id.0);
        debug!(chat = %chat_id, "invalidated admin cache");
    }

    /// Drop every cached record.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        debug!("invalidated all admin caches");
    }
}

impl std::fmt::Debug for InMemoryAdminCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAdminCache")
            .field("cache", &self.cache)
            .finish()
    }
}

#[async_trait]
impl AdminCache for InMemoryAdminCache {
    async fn get(&self, chat_id: ChatId) -> Result<AdminRecord, MembershipError> {
        self.cache
            .get(&chat_id.0)
            .ok_or(MembershipError::NotCached(chat_id))
    }

    async fn reload(
        &self,
        ctx: &ChatContext,
        reason: &str,
    ) -> Result<AdminRecord, MembershipError> {
        debug!(chat = %ctx.id, reason, "reloading admin list");
        let members = self.lookup.admins(ctx.id).await?;
        let record = AdminRecord::from_members(members);
        self.cache.insert(ctx.id.0, record.clone());
        Ok(record)
    }
}

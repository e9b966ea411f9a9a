use super::{Client, INDEX_PAGE_SIZE};
use crate::api::{ChatsQuery, GroupsQuery, Transport};
use crate::error::{Error, Result};
use crate::types::{Chat, Group, Id, User};
use std::time::{Duration, Instant};

impl<T: Transport> Client<T> {
    /// First [`INDEX_PAGE_SIZE`] groups. Anything beyond is not fetched.
    pub async fn index_all_groups(&self) -> Result<Vec<Group>> {
        let query = GroupsQuery {
            per_page: Some(INDEX_PAGE_SIZE),
            ..Default::default()
        };
        self.transport
            .index_groups(&query)
            .await
            .inspect_err(|e| self.log.warn(&format!("Failed to index groups: {}", e)))
    }

    /// First [`INDEX_PAGE_SIZE`] direct conversations.
    pub async fn index_all_chats(&self) -> Result<Vec<Chat>> {
        let query = ChatsQuery {
            per_page: Some(INDEX_PAGE_SIZE),
            ..Default::default()
        };
        self.transport
            .index_chats(&query)
            .await
            .inspect_err(|e| self.log.warn(&format!("Failed to index chats: {}", e)))
    }

    pub async fn index_all_relations(&self) -> Result<Vec<User>> {
        self.transport
            .index_relations()
            .await
            .inspect_err(|e| self.log.warn(&format!("Failed to index relations: {}", e)))
    }

    /// Kick `user_id` out of `group_id`.
    pub async fn remove_from_group(&self, user_id: &Id, group_id: &Id) -> Result<()> {
        let group = self.transport.show_group(group_id).await?;
        let member = group
            .member_by_user_id(user_id)
            .ok_or_else(|| Error::MemberNotFound {
                user_id: user_id.clone(),
                group_id: group_id.clone(),
            })?;
        self.transport.remove_member(group_id, &member.id).await?;
        self.log.info(&format!(
            "Removed {} (membership {}) from group {}",
            user_id, member.id, group_id
        ));
        Ok(())
    }

    /// Round-trip time of a `users/me` call.
    pub async fn ping(&self) -> Result<Duration> {
        let start = Instant::now();
        self.transport.my_user().await?;
        Ok(start.elapsed())
    }
}

//! Message operations: lifecycle (send, edit, delete), listing, reactions,
//! and membership-scoped search.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::backend::capabilities::ActivityEntry;
use crate::backend::messages::db;
use crate::shared::messaging::{
    ListMessagesResponse, Message, SearchMessagesParams, SendMessageRequest,
};
use crate::shared::{ConversationEvent, ServiceError};

use super::conversations::clamp_limit;
use super::ConversationService;

/// How long after creation a message stays editable by its author
pub const EDIT_WINDOW_MINUTES: i64 = 15;

const DEFAULT_PAGE_LIMIT: u32 = 50;
const MAX_PAGE_LIMIT: u32 = 200;
const DEFAULT_SEARCH_LIMIT: u32 = 20;
const MAX_SEARCH_LIMIT: u32 = 100;
const MIN_QUERY_LEN: usize = 2;

fn normalized(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}

impl ConversationService {
    /// Send a message
    ///
    /// A reply is re-rooted to the target's own thread root, so arbitrarily
    /// nested reply chains flatten into a single thread under the original
    /// root.
    pub async fn create_message(
        &self,
        conversation_id: Uuid,
        author_id: Uuid,
        request: SendMessageRequest,
    ) -> Result<Message, ServiceError> {
        self.require_member(conversation_id, author_id).await?;

        let body = normalized(request.body.as_deref());
        let asset_id = normalized(request.asset_id.as_deref());
        if body.is_none() && asset_id.is_none() {
            return Err(ServiceError::validation(
                "body",
                "a message needs text or an attachment",
            ));
        }

        let thread_root_id = match request.reply_to_id {
            Some(reply_to_id) => {
                let target = db::get_message(&self.pool, reply_to_id)
                    .await?
                    .filter(|m| m.conversation_id == conversation_id)
                    .ok_or_else(|| {
                        ServiceError::validation("reply_to_id", "unknown reply target")
                    })?;
                Some(target.thread_root_id.unwrap_or(target.id))
            }
            None => None,
        };

        let message = db::create_message(
            &self.pool,
            Uuid::new_v4(),
            conversation_id,
            author_id,
            body,
            asset_id,
            request.reply_to_id,
            thread_root_id,
            false,
        )
        .await?;

        self.log_activity(ActivityEntry::new(
            author_id,
            "message.created",
            conversation_id,
            Some(message.id),
        ))
        .await;
        self.publish(ConversationEvent::message_created(&message));

        Ok(message)
    }

    /// Record a system message (membership changes and the like); fans out
    /// like a regular message
    pub(crate) async fn create_system_message(
        &self,
        conversation_id: Uuid,
        actor_id: Uuid,
        body: String,
    ) -> Result<Message, ServiceError> {
        let message = db::create_message(
            &self.pool,
            Uuid::new_v4(),
            conversation_id,
            actor_id,
            Some(&body),
            None,
            None,
            None,
            true,
        )
        .await?;

        self.publish(ConversationEvent::message_created(&message));
        Ok(message)
    }

    /// Edit a message body; author only, within the edit window
    pub async fn edit_message(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<Message, ServiceError> {
        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        self.require_member(message.conversation_id, user_id).await?;

        if message.is_deleted() {
            return Err(ServiceError::NotFound);
        }
        if message.author_id != user_id {
            return Err(ServiceError::unauthorized("only the author may edit"));
        }
        if Utc::now() - message.created_at > Duration::minutes(EDIT_WINDOW_MINUTES) {
            return Err(ServiceError::EditWindowExpired);
        }

        let body = normalized(Some(body.as_str()))
            .ok_or_else(|| ServiceError::validation("body", "edited body cannot be empty"))?
            .to_string();

        // The guard on deleted_at makes a concurrent delete win the race.
        let updated = db::edit_message(&self.pool, message_id, &body).await?;
        if updated == 0 {
            return Err(ServiceError::NotFound);
        }

        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        self.log_activity(ActivityEntry::new(
            user_id,
            "message.edited",
            message.conversation_id,
            Some(message.id),
        ))
        .await;
        self.publish(ConversationEvent::message_edited(&message));

        Ok(message)
    }

    /// Soft-delete a message; author or conversation admin
    ///
    /// Returns whether the call changed anything; deleting an
    /// already-deleted message is a no-op, not an error.
    pub async fn delete_message(
        &self,
        message_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let member = self.require_member(message.conversation_id, user_id).await?;

        if message.author_id != user_id && !member.is_admin() {
            return Err(ServiceError::unauthorized(
                "only the author or an admin may delete",
            ));
        }

        let deleted = db::soft_delete_message(&self.pool, message_id).await?;
        if deleted == 0 {
            return Ok(false);
        }

        self.log_activity(ActivityEntry::new(
            user_id,
            "message.deleted",
            message.conversation_id,
            Some(message.id),
        ))
        .await;
        self.publish(ConversationEvent::message_deleted(
            message.conversation_id,
            message.id,
            user_id,
        ));

        Ok(true)
    }

    /// List messages newest first; `before` is a stateless seq cursor
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        limit: Option<u32>,
        before: Option<i64>,
    ) -> Result<ListMessagesResponse, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let messages = db::list_messages(&self.pool, conversation_id, limit, before).await?;
        let has_more = messages.len() as i64 == limit;

        Ok(ListMessagesResponse { messages, has_more })
    }

    /// Add a reaction; re-adding an existing (user, emoji) pair is a no-op
    pub async fn add_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: String,
    ) -> Result<Message, ServiceError> {
        let message = self.reaction_target(message_id, user_id).await?;
        if message.is_deleted() {
            return Err(ServiceError::validation(
                "message_id",
                "cannot react to a deleted message",
            ));
        }

        let changed = db::add_reaction(&self.pool, message_id, user_id, &emoji).await?;
        self.reaction_result(message_id, changed).await
    }

    /// Remove a reaction; removing an absent pair is a no-op
    pub async fn remove_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: String,
    ) -> Result<Message, ServiceError> {
        self.reaction_target(message_id, user_id).await?;
        let changed = db::remove_reaction(&self.pool, message_id, user_id, &emoji).await?;
        self.reaction_result(message_id, changed).await
    }

    async fn reaction_target(
        &self,
        message_id: Uuid,
        user_id: Uuid,
    ) -> Result<Message, ServiceError> {
        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        self.require_member(message.conversation_id, user_id).await?;
        Ok(message)
    }

    async fn reaction_result(
        &self,
        message_id: Uuid,
        changed: u64,
    ) -> Result<Message, ServiceError> {
        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if changed > 0 {
            self.publish(ConversationEvent::reaction_updated(&message));
        }
        Ok(message)
    }

    /// Search message bodies across the requester's conversations
    pub async fn search_messages(
        &self,
        requester: Uuid,
        params: SearchMessagesParams,
    ) -> Result<Vec<Message>, ServiceError> {
        let query = params.query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(ServiceError::validation(
                "query",
                "search query must be at least 2 characters",
            ));
        }
        self.search_limiter.check(requester)?;

        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let offset = i64::from(params.offset.unwrap_or(0));

        Ok(db::search_messages(
            &self.pool,
            requester,
            query,
            params.conversation_id,
            limit,
            offset,
        )
        .await?)
    }
}

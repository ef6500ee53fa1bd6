//! Conversation operations: creation, visibility-gated reads, membership
//! management, and the user's conversation list.

use std::collections::HashSet;

use uuid::Uuid;

use crate::backend::capabilities::ActivityEntry;
use crate::backend::conversations::db;
use crate::backend::read_state::db as read_state_db;
use crate::shared::messaging::{
    Conversation, ConversationListEntry, CreateConversationRequest, Member, MemberRole,
    UpdateConversationRequest,
};
use crate::shared::ServiceError;

use super::ConversationService;

const DEFAULT_LIST_LIMIT: u32 = 50;
const MAX_LIST_LIMIT: u32 = 200;

pub(crate) fn clamp_limit(limit: Option<u32>, default: u32, max: u32) -> i64 {
    i64::from(limit.unwrap_or(default).clamp(1, max))
}

/// Validate a creation request, returning the deduplicated non-creator
/// member list
fn validate_create(
    creator_id: Uuid,
    request: &CreateConversationRequest,
) -> Result<Vec<Uuid>, ServiceError> {
    let mut seen = HashSet::new();
    for id in &request.member_ids {
        if !seen.insert(*id) {
            return Err(ServiceError::validation(
                "member_ids",
                "member ids must be distinct",
            ));
        }
    }

    let others: Vec<Uuid> = request
        .member_ids
        .iter()
        .copied()
        .filter(|id| *id != creator_id)
        .collect();

    if others.is_empty() {
        return Err(ServiceError::validation(
            "member_ids",
            "a conversation needs at least one member besides the creator",
        ));
    }

    if request.is_group {
        if request.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(ServiceError::validation(
                "name",
                "group conversations require a name",
            ));
        }
    } else if others.len() != 1 {
        return Err(ServiceError::validation(
            "member_ids",
            "a direct conversation has exactly two members",
        ));
    }

    Ok(others)
}

impl ConversationService {
    /// Create a conversation; the creator becomes its admin
    pub async fn create_conversation(
        &self,
        creator_id: Uuid,
        request: CreateConversationRequest,
    ) -> Result<Conversation, ServiceError> {
        let others = validate_create(creator_id, &request)?;

        let mut members = vec![(creator_id, MemberRole::Admin)];
        members.extend(others.iter().map(|id| (*id, MemberRole::Member)));

        let id = Uuid::new_v4();
        db::create_conversation(
            &self.pool,
            id,
            request.organization_id,
            request.project_id,
            request.name.as_deref(),
            request.is_group,
            creator_id,
            &members,
        )
        .await?;

        tracing::info!(
            "[Service] conversation {} created by {} ({} members)",
            id,
            creator_id,
            members.len()
        );

        self.log_activity(ActivityEntry::new(creator_id, "conversation.created", id, None))
            .await;

        db::get_conversation(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::internal("conversation vanished after insert"))
    }

    /// Get a conversation; non-members get the same `NotFound` as a missing
    /// id
    pub async fn get_conversation(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> Result<Conversation, ServiceError> {
        self.require_member(conversation_id, requester).await?;
        db::get_conversation(&self.pool, conversation_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Update mutable fields (name, is_group); admin only
    pub async fn update_conversation(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        patch: UpdateConversationRequest,
    ) -> Result<Conversation, ServiceError> {
        let member = self.require_member(conversation_id, requester).await?;
        if !member.is_admin() {
            return Err(ServiceError::unauthorized(
                "only an admin may update the conversation",
            ));
        }

        let current = db::get_conversation(&self.pool, conversation_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let becomes_group = patch.is_group.unwrap_or(current.is_group);
        let new_name = patch
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if becomes_group && new_name.is_none() && current.name.is_none() {
            return Err(ServiceError::validation(
                "name",
                "group conversations require a name",
            ));
        }
        if !becomes_group && current.members.len() != 2 {
            return Err(ServiceError::validation(
                "is_group",
                "a direct conversation has exactly two members",
            ));
        }

        db::update_conversation(&self.pool, conversation_id, new_name, patch.is_group).await?;

        db::get_conversation(&self.pool, conversation_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Add a member to a group conversation; admin only
    pub async fn add_member(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        user_id: Uuid,
        admin: bool,
    ) -> Result<Member, ServiceError> {
        let member = self.require_member(conversation_id, requester).await?;
        if !member.is_admin() {
            return Err(ServiceError::unauthorized("only an admin may add members"));
        }

        let conversation = db::get_conversation(&self.pool, conversation_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if !conversation.is_group {
            return Err(ServiceError::validation(
                "conversation",
                "cannot add members to a direct conversation",
            ));
        }

        let role = if admin { MemberRole::Admin } else { MemberRole::Member };
        match db::insert_member(&self.pool, conversation_id, user_id, role).await? {
            Some(added) => {
                self.create_system_message(
                    conversation_id,
                    requester,
                    format!("{} joined the conversation", user_id),
                )
                .await?;
                Ok(added)
            }
            // Already present: report the existing membership, not an error
            None => db::get_member(&self.pool, conversation_id, user_id)
                .await?
                .ok_or(ServiceError::NotFound),
        }
    }

    /// Remove a member (admin) or leave (self); returns the removed count,
    /// 0 when the member was already absent
    pub async fn remove_member(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        user_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let member = self.require_member(conversation_id, requester).await?;
        if !member.is_admin() && requester != user_id {
            return Err(ServiceError::unauthorized(
                "only an admin may remove other members",
            ));
        }

        let conversation = db::get_conversation(&self.pool, conversation_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if !conversation.is_group {
            return Err(ServiceError::validation(
                "conversation",
                "cannot remove members from a direct conversation",
            ));
        }

        let target = match conversation.member(user_id) {
            Some(target) => target.clone(),
            None => return Ok(0),
        };

        if target.is_admin() && db::count_admins(&self.pool, conversation_id).await? <= 1 {
            return Err(ServiceError::validation(
                "user_id",
                "cannot remove the last admin of a group",
            ));
        }

        let removed = db::delete_member(&self.pool, conversation_id, user_id).await?;
        if removed > 0 {
            self.create_system_message(
                conversation_id,
                requester,
                format!("{} left the conversation", user_id),
            )
            .await?;
        }
        Ok(removed)
    }

    /// List the requester's conversations, most recently active first, with
    /// unread counts
    pub async fn list_conversations(
        &self,
        requester: Uuid,
        limit: Option<u32>,
        offset: Option<u32>,
        project_id: Option<Uuid>,
    ) -> Result<Vec<ConversationListEntry>, ServiceError> {
        let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = i64::from(offset.unwrap_or(0));

        let conversations =
            db::list_for_user(&self.pool, requester, limit, offset, project_id).await?;

        let mut entries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let unread_count =
                read_state_db::unread_count(&self.pool, conversation.id, requester).await?;
            entries.push(ConversationListEntry {
                conversation,
                unread_count,
            });
        }
        Ok(entries)
    }

    /// Mute or unmute a conversation for the requester
    pub async fn set_muted(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        muted: bool,
    ) -> Result<(), ServiceError> {
        self.require_member(conversation_id, requester).await?;
        db::set_muted(&self.pool, conversation_id, requester, muted).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(member_ids: Vec<Uuid>, is_group: bool, name: Option<&str>) -> CreateConversationRequest {
        CreateConversationRequest {
            member_ids,
            is_group,
            name: name.map(String::from),
            project_id: None,
            organization_id: None,
        }
    }

    #[test]
    fn test_direct_conversation_needs_exactly_one_other() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(validate_create(creator, &request(vec![other], false, None)).is_ok());

        let too_many = request(vec![Uuid::new_v4(), Uuid::new_v4()], false, None);
        assert!(matches!(
            validate_create(creator, &too_many),
            Err(ServiceError::Validation { .. })
        ));
    }

    #[test]
    fn test_group_requires_name() {
        let creator = Uuid::new_v4();
        let others = vec![Uuid::new_v4(), Uuid::new_v4()];

        assert!(matches!(
            validate_create(creator, &request(others.clone(), true, None)),
            Err(ServiceError::Validation { .. })
        ));
        assert!(matches!(
            validate_create(creator, &request(others.clone(), true, Some("   "))),
            Err(ServiceError::Validation { .. })
        ));
        assert!(validate_create(creator, &request(others, true, Some("design"))).is_ok());
    }

    #[test]
    fn test_duplicate_member_ids_rejected() {
        let creator = Uuid::new_v4();
        let dup = Uuid::new_v4();
        let result = validate_create(creator, &request(vec![dup, dup], true, Some("x")));
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[test]
    fn test_creator_in_member_ids_is_filtered() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        let others = validate_create(creator, &request(vec![creator, other], false, None)).unwrap();
        assert_eq!(others, vec![other]);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 50, 200), 50);
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
        assert_eq!(clamp_limit(Some(1000), 50, 200), 200);
    }
}

//! Conversation Data Structures
//!
//! Represents a conversation between two or more users, plus the membership
//! records that carry role and read-cursor state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a member within a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Regular member
    Member,
    /// Conversation administrator (can manage membership, delete any message)
    Admin,
}

impl MemberRole {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Admin => "admin",
        }
    }

    /// Parse from string (database)
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => MemberRole::Admin,
            _ => MemberRole::Member,
        }
    }
}

/// A user's participation record in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Conversation the membership belongs to
    pub conversation_id: Uuid,
    /// The participating user
    pub user_id: Uuid,
    /// Role within the conversation
    pub role: MemberRole,
    /// When the user joined
    pub joined_at: DateTime<Utc>,
    /// Sequence number of the last message this member has read
    pub last_read_seq: Option<i64>,
    /// When the read cursor was last advanced
    pub last_read_at: Option<DateTime<Utc>>,
    /// When the member muted the conversation, if muted
    pub muted_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Whether this member administers the conversation
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    /// Whether the member has muted the conversation
    pub fn is_muted(&self) -> bool {
        self.muted_at.is_some()
    }
}

/// Represents a conversation
///
/// A direct conversation has exactly two members and no name; a group
/// conversation has a name and at least one member besides its creator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,
    /// Owning organization, if any
    pub organization_id: Option<Uuid>,
    /// Owning project, if any
    pub project_id: Option<Uuid>,
    /// Display name (required for groups)
    pub name: Option<String>,
    /// Whether this is a group conversation
    pub is_group: bool,
    /// User who created the conversation
    pub created_by: Uuid,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
    /// When the conversation last received a message
    pub last_activity_at: DateTime<Utc>,
    /// Membership records
    pub members: Vec<Member>,
}

impl Conversation {
    /// Check if a user is a member
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    /// Look up a membership record
    pub fn member(&self, user_id: Uuid) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Get the other participant (for direct conversations)
    pub fn other_member(&self, current_user_id: Uuid) -> Option<Uuid> {
        self.members
            .iter()
            .map(|m| m.user_id)
            .find(|&id| id != current_user_id)
    }
}

/// One row of a user's conversation list, most-recently-active first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationListEntry {
    /// The conversation
    pub conversation: Conversation,
    /// Unread messages for the requesting user
    pub unread_count: i64,
}

/// Request to create a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    /// Members besides the creator
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_group: bool,
    pub name: Option<String>,
    pub project_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
}

/// Patch for mutable conversation fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConversationRequest {
    pub name: Option<String>,
    pub is_group: Option<bool>,
}

/// Request to add a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub admin: bool,
}

/// Result of a member removal; `removed` is 0 when the member was absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMemberResponse {
    pub removed: u64,
}

/// Query parameters for listing conversations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListConversationsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub project_id: Option<Uuid>,
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationListEntry>,
}

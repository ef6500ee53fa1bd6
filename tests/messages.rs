//! Message lifecycle integration tests: send, edit, delete, list, react,
//! search

mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use pretty_assertions::assert_eq;

use confab::shared::messaging::{SearchMessagesParams, SendMessageRequest};
use confab::shared::ServiceError;
use common::{
    backdate_message, direct_conversation, group_conversation, send_text, test_service, uid,
};

#[tokio::test]
async fn message_needs_text_or_attachment() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let result = service
        .create_message(
            conversation.id,
            a,
            SendMessageRequest {
                body: Some("   ".to_string()),
                asset_id: None,
                reply_to_id: None,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation { field, .. }) if field == "body");

    let attachment_only = service
        .create_message(
            conversation.id,
            a,
            SendMessageRequest {
                body: None,
                asset_id: Some("asset-17".to_string()),
                reply_to_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(attachment_only.asset_id.as_deref(), Some("asset-17"));
}

#[tokio::test]
async fn sequence_numbers_increase_per_conversation() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let other = direct_conversation(&service, a, uid()).await;

    let m1 = send_text(&service, conversation.id, a, "one").await;
    let m2 = send_text(&service, conversation.id, b, "two").await;
    let elsewhere = send_text(&service, other.id, a, "unrelated").await;

    assert_eq!(m1.seq, 1);
    assert_eq!(m2.seq, 2);
    assert_eq!(elsewhere.seq, 1);
}

#[tokio::test]
async fn non_member_cannot_send() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let result = service
        .create_message(
            conversation.id,
            uid(),
            SendMessageRequest {
                body: Some("hi".to_string()),
                asset_id: None,
                reply_to_id: None,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::NotFound));
}

#[tokio::test]
async fn direct_conversation_happy_path() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    let message = send_text(&service, conversation.id, a, "hi").await;
    assert_eq!(service.unread_count(conversation.id, b).await.unwrap(), 1);

    let updated = service.mark_read(conversation.id, b, message.id).await.unwrap();
    assert!(updated);
    assert_eq!(service.unread_count(conversation.id, b).await.unwrap(), 0);
}

#[tokio::test]
async fn edit_by_non_author_is_unauthorized_and_unchanged() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "original").await;

    let result = service
        .edit_message(message.id, b, "hijacked".to_string())
        .await;
    assert_matches!(result, Err(ServiceError::Unauthorized { .. }));

    let listing = service.list_messages(conversation.id, a, None, None).await.unwrap();
    assert_eq!(listing.messages[0].body.as_deref(), Some("original"));
}

#[tokio::test]
async fn edit_within_window_succeeds() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "typo").await;

    backdate_message(service.pool(), message.id, Duration::minutes(14)).await;

    let edited = service
        .edit_message(message.id, a, "fixed".to_string())
        .await
        .unwrap();

    assert_eq!(edited.body.as_deref(), Some("fixed"));
    assert!(edited.is_edited());
    // created_at is what it was before the edit
    assert!(edited.created_at < edited.edited_at.unwrap());
}

#[tokio::test]
async fn edit_past_window_expires() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "too old").await;

    backdate_message(
        service.pool(),
        message.id,
        Duration::minutes(15) + Duration::seconds(1),
    )
    .await;

    let result = service.edit_message(message.id, a, "late".to_string()).await;
    assert_matches!(result, Err(ServiceError::EditWindowExpired));
}

#[tokio::test]
async fn delete_clears_content_and_is_idempotent() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "oops").await;

    assert!(service.delete_message(message.id, a).await.unwrap());
    assert!(!service.delete_message(message.id, a).await.unwrap());

    let listing = service.list_messages(conversation.id, a, None, None).await.unwrap();
    let deleted = &listing.messages[0];
    assert!(deleted.is_deleted());
    assert_eq!(deleted.body, None);
    assert_eq!(deleted.asset_id, None);
    // Row retained for thread and pin integrity
    assert_eq!(deleted.id, message.id);
}

#[tokio::test]
async fn delete_permissions() {
    let service = test_service().await;
    let (creator, author, bystander) = (uid(), uid(), uid());
    let group = group_conversation(&service, creator, &[author, bystander], "team").await;
    let message = send_text(&service, group.id, author, "target").await;

    // A plain member who is not the author cannot delete
    let result = service.delete_message(message.id, bystander).await;
    assert_matches!(result, Err(ServiceError::Unauthorized { .. }));

    // The conversation admin can
    assert!(service.delete_message(message.id, creator).await.unwrap());
}

#[tokio::test]
async fn editing_deleted_message_is_not_found() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "gone").await;

    service.delete_message(message.id, a).await.unwrap();

    let result = service.edit_message(message.id, a, "revive".to_string()).await;
    assert_matches!(result, Err(ServiceError::NotFound));
}

#[tokio::test]
async fn listing_is_newest_first_with_restartable_cursor() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;

    for i in 1..=5 {
        send_text(&service, conversation.id, a, &format!("m{}", i)).await;
    }

    let page1 = service
        .list_messages(conversation.id, a, Some(2), None)
        .await
        .unwrap();
    assert_eq!(page1.messages.len(), 2);
    assert!(page1.has_more);
    assert_eq!(page1.messages[0].seq, 5);
    assert_eq!(page1.messages[1].seq, 4);

    let cursor = page1.messages.last().unwrap().seq;
    let page2 = service
        .list_messages(conversation.id, a, Some(2), Some(cursor))
        .await
        .unwrap();
    assert_eq!(page2.messages[0].seq, 3);

    // The cursor is stateless: re-running the same page gives the same rows
    let page2_again = service
        .list_messages(conversation.id, a, Some(2), Some(cursor))
        .await
        .unwrap();
    assert_eq!(page2.messages, page2_again.messages);
}

#[tokio::test]
async fn reaction_add_is_idempotent() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "nice").await;

    let once = service
        .add_reaction(message.id, b, "👍".to_string())
        .await
        .unwrap();
    let twice = service
        .add_reaction(message.id, b, "👍".to_string())
        .await
        .unwrap();

    assert_eq!(once.reactions, twice.reactions);
    assert_eq!(twice.reactions.get("👍").unwrap(), &vec![b]);
}

#[tokio::test]
async fn reaction_remove_absent_is_noop() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "hm").await;

    let result = service
        .remove_reaction(message.id, b, "🎉".to_string())
        .await
        .unwrap();
    assert!(result.reactions.is_empty());
}

#[tokio::test]
async fn reactions_from_multiple_users_accumulate() {
    let service = test_service().await;
    let (creator, m1, m2) = (uid(), uid(), uid());
    let group = group_conversation(&service, creator, &[m1, m2], "team").await;
    let message = send_text(&service, group.id, creator, "ship it").await;

    service.add_reaction(message.id, m1, "🚀".to_string()).await.unwrap();
    let after = service.add_reaction(message.id, m2, "🚀".to_string()).await.unwrap();

    let reactors = after.reactions.get("🚀").unwrap();
    assert_eq!(reactors.len(), 2);
    assert!(reactors.contains(&m1) && reactors.contains(&m2));
}

#[tokio::test]
async fn reacting_to_deleted_message_is_rejected() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "bye").await;
    service.delete_message(message.id, a).await.unwrap();

    let result = service.add_reaction(message.id, b, "👍".to_string()).await;
    assert_matches!(result, Err(ServiceError::Validation { .. }));
}

#[tokio::test]
async fn search_requires_two_characters() {
    let service = test_service().await;
    let result = service
        .search_messages(
            uid(),
            SearchMessagesParams {
                query: "a".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation { field, .. }) if field == "query");
}

#[tokio::test]
async fn search_is_scoped_to_own_conversations() {
    let service = test_service().await;
    let (a, b, outsider) = (uid(), uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    send_text(&service, conversation.id, a, "the launch plan").await;

    let mine = service
        .search_messages(
            b,
            SearchMessagesParams {
                query: "launch".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    let theirs = service
        .search_messages(
            outsider,
            SearchMessagesParams {
                query: "launch".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn search_excludes_deleted_messages() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    let message = send_text(&service, conversation.id, a, "secret ingredient").await;
    service.delete_message(message.id, a).await.unwrap();

    let found = service
        .search_messages(
            a,
            SearchMessagesParams {
                query: "ingredient".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn search_is_rate_limited_per_user() {
    let service = test_service().await;
    let (a, b) = (uid(), uid());
    let conversation = direct_conversation(&service, a, b).await;
    send_text(&service, conversation.id, a, "needle").await;

    let params = || SearchMessagesParams {
        query: "needle".to_string(),
        ..Default::default()
    };

    // Default budget is 30 per minute
    for _ in 0..30 {
        service.search_messages(a, params()).await.unwrap();
    }
    let over = service.search_messages(a, params()).await;
    assert_matches!(over, Err(ServiceError::RateLimited { .. }));

    // Another user is unaffected
    service.search_messages(b, params()).await.unwrap();
}

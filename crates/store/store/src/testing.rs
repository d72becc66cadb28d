use veridoc_core::{Document, DocumentId, DocumentStatus, Extraction, Notification, NotificationId, NotificationKind};

use crate::error::StoreError;
use crate::store::{DocumentStore, NotificationStore};

fn test_document(name: &str) -> Document {
    Document::new(name, format!("uploads/0-{name}"), "image/jpeg")
}

/// Run the full document store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_document_store_conformance_tests(
    store: &dyn DocumentStore,
) -> Result<(), StoreError> {
    test_get_missing(store).await?;
    test_create_and_get(store).await?;
    test_create_rejects_duplicate_id(store).await?;
    test_list_newest_first(store).await?;
    test_list_filters_by_owner(store).await?;
    test_complete_processed(store).await?;
    test_complete_failed(store).await?;
    test_complete_is_one_shot(store).await?;
    test_complete_missing(store).await?;
    test_complete_rejects_pending(store).await?;
    Ok(())
}

/// Run the full notification store conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_notification_store_conformance_tests(
    store: &dyn NotificationStore,
) -> Result<(), StoreError> {
    test_notifications_newest_first(store).await?;
    test_notifications_owner_filter(store).await?;
    test_mark_read(store).await?;
    test_mark_read_idempotent(store).await?;
    test_mark_read_missing(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = store.get(&DocumentId::new("missing")).await?;
    assert!(doc.is_none(), "get on missing id should return None");
    Ok(())
}

async fn test_create_and_get(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("create-get.jpg");
    store.create(&doc).await?;
    let fetched = store.get(&doc.id).await?;
    let fetched = fetched.ok_or_else(|| StoreError::NotFound(doc.id.to_string()))?;
    assert_eq!(fetched.id, doc.id);
    assert_eq!(fetched.original_name, "create-get.jpg");
    assert_eq!(fetched.status, DocumentStatus::Pending);
    Ok(())
}

async fn test_create_rejects_duplicate_id(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("duplicate.jpg");
    store.create(&doc).await?;

    let mut clash = test_document("impostor.jpg");
    clash.id = doc.id.clone();
    let result = store.create(&clash).await;
    assert!(
        matches!(result, Err(StoreError::Backend(_))),
        "second create with the same id should be refused"
    );

    let fetched = store.get(&doc.id).await?;
    assert_eq!(
        fetched.map(|d| d.original_name),
        Some("duplicate.jpg".to_string()),
        "refused create should not replace the existing document"
    );
    Ok(())
}

async fn test_list_newest_first(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let mut older = test_document("older.jpg");
    older.uploaded_at -= chrono::Duration::seconds(60);
    let newer = test_document("newer.jpg");
    store.create(&older).await?;
    store.create(&newer).await?;

    let docs = store.list(None).await?;
    let older_pos = docs.iter().position(|d| d.id == older.id);
    let newer_pos = docs.iter().position(|d| d.id == newer.id);
    assert!(
        newer_pos < older_pos,
        "newer uploads should come before older ones"
    );
    Ok(())
}

async fn test_list_filters_by_owner(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let mine = test_document("mine.jpg").with_owner("owner-a");
    let theirs = test_document("theirs.jpg").with_owner("owner-b");
    store.create(&mine).await?;
    store.create(&theirs).await?;

    let docs = store.list(Some(&"owner-a".into())).await?;
    assert!(docs.iter().any(|d| d.id == mine.id));
    assert!(
        !docs.iter().any(|d| d.id == theirs.id),
        "owner filter should exclude other owners' documents"
    );
    Ok(())
}

async fn test_complete_processed(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("processed.jpg");
    store.create(&doc).await?;

    let extraction = Extraction::default().with_doc_type("White Card");
    let updated = store
        .complete(&doc.id, DocumentStatus::Processed, Some(extraction))
        .await?;
    assert_eq!(updated.status, DocumentStatus::Processed);
    assert_eq!(
        updated.extraction.as_ref().and_then(|e| e.doc_type.as_deref()),
        Some("White Card")
    );

    let fetched = store.get(&doc.id).await?;
    assert_eq!(
        fetched.map(|d| d.status),
        Some(DocumentStatus::Processed),
        "completion should be visible to subsequent reads"
    );
    Ok(())
}

async fn test_complete_failed(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("failed.jpg");
    store.create(&doc).await?;

    let updated = store.complete(&doc.id, DocumentStatus::Failed, None).await?;
    assert_eq!(updated.status, DocumentStatus::Failed);
    assert!(updated.extraction.is_none());
    Ok(())
}

async fn test_complete_is_one_shot(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("one-shot.jpg");
    store.create(&doc).await?;
    store.complete(&doc.id, DocumentStatus::Failed, None).await?;

    let second = store
        .complete(&doc.id, DocumentStatus::Processed, None)
        .await;
    assert!(
        matches!(second, Err(StoreError::AlreadyTerminal { .. })),
        "second completion should be refused"
    );

    let fetched = store.get(&doc.id).await?;
    assert_eq!(
        fetched.map(|d| d.status),
        Some(DocumentStatus::Failed),
        "refused completion should not change the stored status"
    );
    Ok(())
}

async fn test_complete_missing(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let result = store
        .complete(&DocumentId::new("no-such-doc"), DocumentStatus::Failed, None)
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    Ok(())
}

async fn test_complete_rejects_pending(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let doc = test_document("reject-pending.jpg");
    store.create(&doc).await?;
    let result = store
        .complete(&doc.id, DocumentStatus::Pending, None)
        .await;
    assert!(
        result.is_err(),
        "complete with a non-terminal status should be rejected"
    );
    Ok(())
}

async fn test_notifications_newest_first(store: &dyn NotificationStore) -> Result<(), StoreError> {
    let mut older = Notification::new(NotificationKind::SystemInfo, "older");
    older.created_at -= chrono::Duration::seconds(60);
    let newer = Notification::new(NotificationKind::SystemInfo, "newer");
    store.create(&older).await?;
    store.create(&newer).await?;

    let all = store.list(None).await?;
    let older_pos = all.iter().position(|n| n.id == older.id);
    let newer_pos = all.iter().position(|n| n.id == newer.id);
    assert!(newer_pos < older_pos, "newer notifications should come first");
    Ok(())
}

async fn test_notifications_owner_filter(store: &dyn NotificationStore) -> Result<(), StoreError> {
    let mine = Notification::new(NotificationKind::ExpiryWarning, "yours expires").with_owner("owner-a");
    let theirs = Notification::new(NotificationKind::ExpiryWarning, "not yours").with_owner("owner-b");
    let broadcast = Notification::new(NotificationKind::SystemInfo, "everyone");
    store.create(&mine).await?;
    store.create(&theirs).await?;
    store.create(&broadcast).await?;

    let visible = store.list(Some(&"owner-a".into())).await?;
    assert!(visible.iter().any(|n| n.id == mine.id));
    assert!(
        visible.iter().any(|n| n.id == broadcast.id),
        "unaddressed notifications should be visible to every owner"
    );
    assert!(!visible.iter().any(|n| n.id == theirs.id));
    Ok(())
}

async fn test_mark_read(store: &dyn NotificationStore) -> Result<(), StoreError> {
    let n = Notification::new(NotificationKind::SystemInfo, "read me");
    store.create(&n).await?;
    let updated = store.mark_read(&n.id).await?;
    assert!(updated.read);
    Ok(())
}

async fn test_mark_read_idempotent(store: &dyn NotificationStore) -> Result<(), StoreError> {
    let n = Notification::new(NotificationKind::SystemInfo, "read twice");
    store.create(&n).await?;
    store.mark_read(&n.id).await?;
    let again = store.mark_read(&n.id).await?;
    assert!(again.read, "repeated mark_read should succeed");
    Ok(())
}

async fn test_mark_read_missing(store: &dyn NotificationStore) -> Result<(), StoreError> {
    let result = store.mark_read(&NotificationId::new("no-such")).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    Ok(())
}

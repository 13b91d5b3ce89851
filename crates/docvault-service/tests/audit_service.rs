//! Audit service tests: admin-only querying over the shared trail.

mod support;

use bytes::Bytes;

use docvault_core::error::ErrorKind;
use docvault_core::types::pagination::PageRequest;
use docvault_entity::audit::AuditAction;
use docvault_entity::user::UserRole;
use docvault_service::{CreateDocumentRequest, UpdateDocumentRequest};

use support::{audit_harness, ctx, Harness};

fn upload(title: &str) -> CreateDocumentRequest {
    CreateDocumentRequest {
        title: title.to_string(),
        description: String::new(),
        file_name: format!("{}.txt", title.to_lowercase()),
        content_type: "text/plain".to_string(),
        data: Bytes::from_static(b"content"),
    }
}

#[tokio::test]
async fn test_listing_requires_admin() {
    let h = Harness::new();
    let audit = audit_harness(h.audit_entries.clone());

    for role in [UserRole::Viewer, UserRole::Editor] {
        let err = audit
            .list_audit_logs(&ctx(role), None, &PageRequest::first(20))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    audit
        .list_audit_logs(&ctx(UserRole::Admin), None, &PageRequest::first(20))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_entries_listed_newest_first() {
    let h = Harness::new();
    let audit = audit_harness(h.audit_entries.clone());
    let editor = ctx(UserRole::Editor);

    let document = h.service.create(&editor, upload("Alpha")).await.unwrap();
    h.service.get(&editor, document.id).await.unwrap();
    h.service
        .update(
            &editor,
            document.id,
            UpdateDocumentRequest {
                title: Some("Beta".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let page = audit
        .list_audit_logs(&ctx(UserRole::Admin), None, &PageRequest::first(20))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    let actions: Vec<AuditAction> = page.items.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Update, AuditAction::Read, AuditAction::Create]
    );
}

#[tokio::test]
async fn test_filter_by_document() {
    let h = Harness::new();
    let audit = audit_harness(h.audit_entries.clone());
    let editor = ctx(UserRole::Editor);
    let admin = ctx(UserRole::Admin);

    let kept = h.service.create(&editor, upload("Kept")).await.unwrap();
    let other = h.service.create(&editor, upload("Other")).await.unwrap();
    h.service.get(&editor, kept.id).await.unwrap();

    let page = audit
        .list_audit_logs(&admin, Some(kept.id), &PageRequest::first(20))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|e| e.document_id == Some(kept.id)));

    // Deleting a document detaches its entries, so the per-document view
    // empties while the global trail keeps everything.
    h.service.delete(&admin, other.id).await.unwrap();
    let detached = audit
        .list_audit_logs(&admin, Some(other.id), &PageRequest::first(20))
        .await
        .unwrap();
    assert_eq!(detached.total, 0);

    let global = audit
        .list_audit_logs(&admin, None, &PageRequest::first(20))
        .await
        .unwrap();
    assert_eq!(global.total, 4);
}

#[tokio::test]
async fn test_pagination() {
    let h = Harness::new();
    let audit = audit_harness(h.audit_entries.clone());
    let editor = ctx(UserRole::Editor);

    let document = h.service.create(&editor, upload("Busy")).await.unwrap();
    for _ in 0..6 {
        h.service.get(&editor, document.id).await.unwrap();
    }

    let admin = ctx(UserRole::Admin);
    let first = audit
        .list_audit_logs(&admin, None, &PageRequest::new(3, 0))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.total, 7);
    assert!(first.has_next());

    let last = audit
        .list_audit_logs(&admin, None, &PageRequest::new(3, 6))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next());
}

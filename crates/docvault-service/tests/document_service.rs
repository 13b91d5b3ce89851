//! End-to-end document service tests against in-memory collaborators.

mod support;

use bytes::Bytes;
use futures::StreamExt;

use docvault_cache::keys;
use docvault_core::error::ErrorKind;
use docvault_core::events::DocumentEvent;
use docvault_core::traits::cache::CacheProvider;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::types::filter::DocumentFilter;
use docvault_core::types::pagination::PageRequest;
use docvault_entity::audit::AuditAction;
use docvault_entity::document::Document;
use docvault_entity::job::POST_PROCESS_JOB;
use docvault_entity::user::UserRole;
use docvault_service::{CreateDocumentRequest, ReplacePayload, UpdateDocumentRequest};

use support::{ctx, Harness};

fn upload(title: &str, file_name: &str, content_type: &str, data: &str) -> CreateDocumentRequest {
    CreateDocumentRequest {
        title: title.to_string(),
        description: String::new(),
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::from(data.to_string()),
    }
}

async fn read_stream(stream: docvault_core::traits::storage::ByteStream) -> Vec<u8> {
    let mut stream = stream;
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk.unwrap());
    }
    buf
}

#[tokio::test]
async fn test_create_roundtrip() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Q3 Report", "report.pdf", "application/pdf", "pdf content"))
        .await
        .unwrap();

    assert_eq!(document.title, "Q3 Report");
    assert_eq!(document.file_name, "report.pdf");
    assert_eq!(document.file_size, 11);
    assert_eq!(document.uploaded_by, editor.user_id);

    // Payload landed in storage under the recorded path.
    let stored = h.storage.read_bytes(&document.storage_path).await.unwrap();
    assert_eq!(&stored[..], b"pdf content");

    // Create audit entry pairs with the row.
    let entries = h.audit_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Create);
    assert_eq!(entries[0].document_id, Some(document.id));
    assert_eq!(entries[0].document_title, "Q3 Report");
    assert_eq!(entries[0].details, "Uploaded file: report.pdf (11 bytes)");
    assert_eq!(entries[0].ip_address.as_deref(), Some("127.0.0.1"));

    // Change event and post-processing job went out.
    let events = h.publisher.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DocumentEvent::Created { document: d, user, .. } => {
            assert_eq!(d.id, document.id);
            assert_eq!(user, &editor.username);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let jobs = h.jobs.dispatched();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].0, POST_PROCESS_JOB);
    assert_eq!(jobs[0].1["document_id"], document.id.to_string());
}

#[tokio::test]
async fn test_viewer_cannot_create() {
    let h = Harness::new();

    let err = h
        .service
        .create(&ctx(UserRole::Viewer), upload("Nope", "nope.txt", "text/plain", "x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authorization);
    // Denied before any side effect.
    assert_eq!(h.documents.row_count(), 0);
    assert!(h.audit_entries().is_empty());
    assert!(h.storage.is_empty().await);
    assert!(h.jobs.dispatched().is_empty());
}

#[tokio::test]
async fn test_create_rejects_oversized_payload() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let big = "x".repeat(52_428_801);
    let err = h
        .service
        .create(&editor, upload("Big", "big.bin", "application/octet-stream", &big))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.storage.is_empty().await);
}

#[tokio::test]
async fn test_get_records_read_on_every_call() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);
    let viewer = ctx(UserRole::Viewer);

    let document = h
        .service
        .create(&editor, upload("Notes", "notes.txt", "text/plain", "hello"))
        .await
        .unwrap();

    // First call misses the cache, second hits it; both must audit.
    let first = h.service.get(&viewer, document.id).await.unwrap();
    let second = h.service.get(&viewer, document.id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.title, "Notes");

    let reads: Vec<_> = h
        .audit_entries()
        .into_iter()
        .filter(|e| e.action == AuditAction::Read)
        .collect();
    assert_eq!(reads.len(), 2);
    assert_eq!(reads[0].user_id, Some(viewer.user_id));
    assert_eq!(reads[0].document_id, Some(document.id));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let h = Harness::new();
    let err = h
        .service
        .get(&ctx(UserRole::Viewer), uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_download_streams_payload() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Img", "photo.png", "image/png", "binary-ish"))
        .await
        .unwrap();

    let download = h.service.download(&ctx(UserRole::Viewer), document.id).await.unwrap();
    assert_eq!(download.file_name, "photo.png");
    assert_eq!(download.content_type, "image/png");
    assert_eq!(download.file_size, 10);
    assert_eq!(read_stream(download.stream).await, b"binary-ish");

    assert!(h
        .audit_entries()
        .iter()
        .any(|e| e.action == AuditAction::Download && e.document_id == Some(document.id)));
}

#[tokio::test]
async fn test_update_metadata_describes_changes() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Draft", "draft.txt", "text/plain", "v1"))
        .await
        .unwrap();

    let updated = h
        .service
        .update(
            &editor,
            document.id,
            UpdateDocumentRequest {
                title: Some("Final".to_string()),
                description: Some("ready for review".to_string()),
                payload: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.description, "ready for review");
    assert!(updated.updated_at > document.updated_at);

    let entry = h
        .audit_entries()
        .into_iter()
        .find(|e| e.action == AuditAction::Update)
        .unwrap();
    assert_eq!(entry.details, "title: 'Draft' -> 'Final'; description updated");
    assert_eq!(entry.document_title, "Final");

    assert!(matches!(
        h.publisher.events().last().unwrap(),
        DocumentEvent::Updated { .. }
    ));
}

#[tokio::test]
async fn test_noop_update_writes_nothing() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Same", "same.txt", "text/plain", "v1"))
        .await
        .unwrap();

    // Warm the detail and list caches so survival can be asserted below.
    h.service.get(&editor, document.id).await.unwrap();
    h.service
        .list(&editor, &DocumentFilter::default(), &PageRequest::first(10))
        .await
        .unwrap();
    let detail_key = keys::document_detail(document.id);
    let list_key = keys::document_list(&DocumentFilter::default());
    assert!(h.cache.exists(&detail_key).await.unwrap());
    assert!(h.cache.exists(&list_key).await.unwrap());

    let result = h
        .service
        .update(
            &editor,
            document.id,
            UpdateDocumentRequest {
                title: Some("Same".to_string()),
                description: Some(String::new()),
                payload: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.updated_at, document.updated_at);
    // The create entry plus the warming read, nothing from the update.
    assert_eq!(h.audit_entries().len(), 2);
    assert_eq!(h.publisher.events().len(), 1);

    // A change-free update must not invalidate either cache entry.
    assert!(h.cache.exists(&detail_key).await.unwrap());
    assert!(h.cache.exists(&list_key).await.unwrap());
}

#[tokio::test]
async fn test_payload_replacement() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Spec", "spec-v1.txt", "text/plain", "old"))
        .await
        .unwrap();
    let old_path = document.storage_path.clone();

    let updated = h
        .service
        .update(
            &editor,
            document.id,
            UpdateDocumentRequest {
                payload: Some(ReplacePayload {
                    file_name: "spec-v2.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    data: Bytes::from_static(b"new content"),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.file_name, "spec-v2.pdf");
    assert_eq!(updated.content_type, "application/pdf");
    assert_eq!(updated.file_size, 11);
    assert_ne!(updated.storage_path, old_path);

    assert!(!h.storage.exists(&old_path).await.unwrap());
    let stored = h.storage.read_bytes(&updated.storage_path).await.unwrap();
    assert_eq!(&stored[..], b"new content");

    let entry = h
        .audit_entries()
        .into_iter()
        .find(|e| e.action == AuditAction::Update)
        .unwrap();
    assert_eq!(entry.details, "file replaced: spec-v1.txt -> spec-v2.pdf");

    // Replacing the payload re-enqueues post-processing.
    let jobs = h.jobs.dispatched();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|(t, _)| t == POST_PROCESS_JOB));
}

#[tokio::test]
async fn test_delete_freezes_audit_trail() {
    let h = Harness::new();
    let admin = ctx(UserRole::Admin);

    let document = h
        .service
        .create(&admin, upload("Doomed", "doomed.txt", "text/plain", "bye"))
        .await
        .unwrap();

    h.service.delete(&admin, document.id).await.unwrap();

    assert_eq!(h.documents.row_count(), 0);
    assert!(!h.storage.exists(&document.storage_path).await.unwrap());

    let entry = h
        .audit_entries()
        .into_iter()
        .find(|e| e.action == AuditAction::Delete)
        .unwrap();
    // The entry outlives the row: no reference, frozen title.
    assert_eq!(entry.document_id, None);
    assert_eq!(entry.document_title, "Doomed");
    assert_eq!(entry.details, "Deleted document: Doomed (doomed.txt)");

    let err = h.service.get(&admin, document.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_editor_cannot_delete() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Kept", "kept.txt", "text/plain", "x"))
        .await
        .unwrap();

    let err = h.service.delete(&editor, document.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(h.documents.row_count(), 1);
}

#[tokio::test]
async fn test_list_pagination() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    for i in 0..15 {
        h.service
            .create(&editor, upload(&format!("Doc {i}"), "d.txt", "text/plain", "x"))
            .await
            .unwrap();
    }

    let filter = DocumentFilter::default();
    let viewer = ctx(UserRole::Viewer);

    let mut seen: Vec<Document> = Vec::new();
    for offset in [0, 5, 10] {
        let page = h
            .service
            .list(&viewer, &filter, &PageRequest::new(5, offset))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.has_next(), offset < 10);
        seen.extend(page.items);
    }

    // Pages are disjoint and cover everything.
    let mut ids: Vec<_> = seen.iter().map(|d| d.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 15);

    let past_end = h
        .service
        .list(&viewer, &filter, &PageRequest::new(5, 100))
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 15);
}

#[tokio::test]
async fn test_list_filters() {
    let h = Harness::new();
    let alice = ctx(UserRole::Editor);
    let bob = ctx(UserRole::Editor);

    h.service
        .create(&alice, upload("Budget 2026", "budget.xlsx", "application/vnd.ms-excel", "x"))
        .await
        .unwrap();
    h.service
        .create(&alice, upload("Team photo", "team.png", "image/png", "x"))
        .await
        .unwrap();
    h.service
        .create(&bob, upload("Budget notes", "notes.txt", "text/plain", "x"))
        .await
        .unwrap();

    let page = PageRequest::first(10);

    let by_title = h
        .service
        .list(
            &alice,
            &DocumentFilter {
                title: Some("budget".to_string()),
                ..Default::default()
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(by_title.total, 2);

    let by_owner = h
        .service
        .list(
            &alice,
            &DocumentFilter {
                uploaded_by: Some(bob.user_id),
                ..Default::default()
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(by_owner.total, 1);
    assert_eq!(by_owner.items[0].title, "Budget notes");

    let by_type = h
        .service
        .list(
            &alice,
            &DocumentFilter {
                content_type: Some("image".to_string()),
                ..Default::default()
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(by_type.total, 1);
    assert_eq!(by_type.items[0].file_name, "team.png");
}

#[tokio::test]
async fn test_list_date_range_filters_are_inclusive() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let early = h
        .service
        .create(&editor, upload("Early", "early.txt", "text/plain", "x"))
        .await
        .unwrap();
    let middle = h
        .service
        .create(&editor, upload("Middle", "middle.txt", "text/plain", "x"))
        .await
        .unwrap();
    let late = h
        .service
        .create(&editor, upload("Late", "late.txt", "text/plain", "x"))
        .await
        .unwrap();

    let page = PageRequest::first(10);

    // A document created exactly at the lower bound matches.
    let from_middle = h
        .service
        .list(
            &editor,
            &DocumentFilter {
                created_after: Some(middle.created_at),
                ..Default::default()
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(from_middle.total, 2);
    assert_eq!(from_middle.items[0].id, late.id);
    assert_eq!(from_middle.items[1].id, middle.id);

    // Same for the upper bound.
    let up_to_middle = h
        .service
        .list(
            &editor,
            &DocumentFilter {
                created_before: Some(middle.created_at),
                ..Default::default()
            },
            &page,
        )
        .await
        .unwrap();
    assert_eq!(up_to_middle.total, 2);
    assert_eq!(up_to_middle.items[0].id, middle.id);
    assert_eq!(up_to_middle.items[1].id, early.id);

    // A degenerate range selects exactly the document at that instant.
    let exact = DocumentFilter {
        created_after: Some(middle.created_at),
        created_before: Some(middle.created_at),
        ..Default::default()
    };
    let at_middle = h.service.list(&editor, &exact, &page).await.unwrap();
    assert_eq!(at_middle.total, 1);
    assert_eq!(at_middle.items[0].id, middle.id);

    // Different ranges cache under different keys, so resolving a wide
    // range must not bleed into the cached narrow listing.
    let wide = DocumentFilter {
        created_after: Some(early.created_at),
        created_before: Some(late.created_at),
        ..Default::default()
    };
    assert_ne!(keys::document_list(&wide), keys::document_list(&exact));
    assert_eq!(h.service.list(&editor, &wide, &page).await.unwrap().total, 3);
    assert_eq!(h.service.list(&editor, &exact, &page).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_list_cache_invalidated_by_mutations() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);
    let filter = DocumentFilter::default();
    let page = PageRequest::first(10);

    let first = h
        .service
        .create(&editor, upload("First", "1.txt", "text/plain", "x"))
        .await
        .unwrap();

    // Warm the list cache.
    assert_eq!(h.service.list(&editor, &filter, &page).await.unwrap().total, 1);

    // A create must not leave the old list visible.
    h.service
        .create(&editor, upload("Second", "2.txt", "text/plain", "x"))
        .await
        .unwrap();
    assert_eq!(h.service.list(&editor, &filter, &page).await.unwrap().total, 2);

    // Neither must a delete.
    h.service.delete(&ctx(UserRole::Admin), first.id).await.unwrap();
    let after_delete = h.service.list(&editor, &filter, &page).await.unwrap();
    assert_eq!(after_delete.total, 1);
    assert_eq!(after_delete.items[0].title, "Second");
}

#[tokio::test]
async fn test_detail_cache_invalidated_by_update() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    let document = h
        .service
        .create(&editor, upload("Before", "b.txt", "text/plain", "x"))
        .await
        .unwrap();

    // Warm the detail cache.
    h.service.get(&editor, document.id).await.unwrap();

    h.service
        .update(
            &editor,
            document.id,
            UpdateDocumentRequest {
                title: Some("After".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fetched = h.service.get(&editor, document.id).await.unwrap();
    assert_eq!(fetched.title, "After");
}

#[tokio::test]
async fn test_post_process_dispatch_retries() {
    let h = Harness::new();
    let editor = ctx(UserRole::Editor);

    // Two failures are absorbed by the retry loop.
    h.jobs.fail_next(2);
    h.service
        .create(&editor, upload("Retried", "r.txt", "text/plain", "x"))
        .await
        .unwrap();
    assert_eq!(h.jobs.dispatched().len(), 1);

    // Three failures exhaust it; the create still succeeds.
    h.jobs.fail_next(3);
    h.service
        .create(&editor, upload("Dropped", "d.txt", "text/plain", "x"))
        .await
        .unwrap();
    assert_eq!(h.jobs.dispatched().len(), 1);
    assert_eq!(h.documents.row_count(), 2);
}

//! In-memory fakes and wiring helpers shared by the service tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use docvault_auth::{PasswordHasher, PasswordValidator, RbacEnforcer};
use docvault_cache::memory::MemoryCacheProvider;
use docvault_cache::CacheManager;
use docvault_core::config::cache::MemoryCacheConfig;
use docvault_core::config::{AppConfig, DatabaseConfig};
use docvault_core::events::DocumentEvent;
use docvault_core::traits::notify::ChangePublisher;
use docvault_core::traits::queue::JobDispatcher;
use docvault_core::types::filter::DocumentFilter;
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::{AppError, AppResult};
use docvault_entity::audit::{AuditLogEntry, AuditStore, CreateAuditLogEntry};
use docvault_entity::document::{CreateDocument, Document, DocumentStore};
use docvault_entity::user::{CreateUser, User, UserRole, UserStore};
use docvault_service::{AuditService, DocumentService, RequestContext, UserService};
use docvault_storage::providers::MemoryStorageProvider;

/// Shared audit sink. The document store and the audit store both write
/// into it, mirroring how the real repositories share one table.
pub type AuditSink = Arc<Mutex<Vec<AuditLogEntry>>>;

fn materialize(entry: &CreateAuditLogEntry, document_id: Option<Uuid>) -> AuditLogEntry {
    AuditLogEntry {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        document_id,
        action: entry.action,
        document_title: entry.document_title.clone(),
        ip_address: entry.ip_address.clone(),
        details: entry.details.clone(),
        created_at: Utc::now(),
    }
}

#[derive(Debug)]
pub struct InMemoryAuditStore {
    entries: AuditSink,
}

impl InMemoryAuditStore {
    pub fn new(entries: AuditSink) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let materialized = materialize(entry, entry.document_id);
        self.entries.lock().unwrap().push(materialized.clone());
        Ok(materialized)
    }

    async fn list(
        &self,
        document_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let entries = self.entries.lock().unwrap();
        let mut matching: Vec<AuditLogEntry> = entries
            .iter()
            .filter(|e| document_id.is_none() || e.document_id == document_id)
            .cloned()
            .collect();
        matching.reverse();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PageResponse::new(items, total, page))
    }
}

#[derive(Debug)]
pub struct InMemoryDocumentStore {
    documents: Mutex<Vec<Document>>,
    audit: AuditSink,
}

impl InMemoryDocumentStore {
    pub fn new(audit: AuditSink) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            audit,
        }
    }

    pub fn row_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(
        &self,
        doc: &CreateDocument,
        audit: &CreateAuditLogEntry,
    ) -> AppResult<Document> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            title: doc.title.clone(),
            description: doc.description.clone(),
            storage_path: doc.storage_path.clone(),
            file_name: doc.file_name.clone(),
            file_size: doc.file_size,
            content_type: doc.content_type.clone(),
            uploaded_by: doc.uploaded_by,
            created_at: now,
            updated_at: now,
        };
        self.documents.lock().unwrap().push(document.clone());
        self.audit
            .lock()
            .unwrap()
            .push(materialize(audit, Some(document.id)));
        Ok(document)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Document>> {
        let documents = self.documents.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| documents.iter().find(|d| d.id == *id).cloned())
            .collect())
    }

    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let documents = self.documents.lock().unwrap();
        let mut matching: Vec<Document> = documents
            .iter()
            .filter(|d| {
                filter
                    .title
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .is_none_or(|t| d.title.to_lowercase().contains(&t.trim().to_lowercase()))
                    && filter
                        .content_type
                        .as_deref()
                        .filter(|c| !c.trim().is_empty())
                        .is_none_or(|c| {
                            d.content_type
                                .to_lowercase()
                                .contains(&c.trim().to_lowercase())
                        })
                    && filter.uploaded_by.is_none_or(|u| d.uploaded_by == u)
                    && filter.created_after.is_none_or(|a| d.created_at >= a)
                    && filter.created_before.is_none_or(|b| d.created_at <= b)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update(&self, doc: &Document, audit: &CreateAuditLogEntry) -> AppResult<Document> {
        let mut documents = self.documents.lock().unwrap();
        let slot = documents
            .iter_mut()
            .find(|d| d.id == doc.id)
            .ok_or_else(|| AppError::not_found(format!("Document {} not found", doc.id)))?;
        *slot = doc.clone();
        self.audit
            .lock()
            .unwrap()
            .push(materialize(audit, Some(doc.id)));
        Ok(doc.clone())
    }

    async fn delete(&self, id: Uuid, audit: &CreateAuditLogEntry) -> AppResult<bool> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Ok(false);
        }
        // Mirror ON DELETE SET NULL: existing entries survive the row
        // but lose their reference to it.
        let mut entries = self.audit.lock().unwrap();
        for entry in entries.iter_mut() {
            if entry.document_id == Some(id) {
                entry.document_id = None;
            }
        }
        entries.push(materialize(audit, None));
        Ok(true)
    }

    async fn storage_paths(&self) -> AppResult<Vec<String>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.storage_path.clone())
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let users = self.users.lock().unwrap();
        let mut all: Vec<User> = users.iter().cloned().collect();
        all.reverse();
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PageResponse::new(items, total, page))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.role = role;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.is_active = is_active;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

/// Captures dispatched jobs; can be primed to fail the next N dispatches.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    dispatched: Mutex<Vec<(String, serde_json::Value)>>,
    failures_remaining: AtomicUsize,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    pub fn dispatched(&self) -> Vec<(String, serde_json::Value)> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobDispatcher for RecordingDispatcher {
    async fn enqueue(&self, job_type: &str, payload: serde_json::Value) -> AppResult<()> {
        if self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::internal("Queue unavailable"));
        }
        self.dispatched
            .lock()
            .unwrap()
            .push((job_type.to_string(), payload));
        Ok(())
    }
}

/// Captures published change events.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DocumentEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DocumentEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChangePublisher for RecordingPublisher {
    async fn publish(&self, event: DocumentEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: "postgres://localhost/docvault_test".to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
        },
        cache: Default::default(),
        storage: Default::default(),
        worker: Default::default(),
        realtime: Default::default(),
        logging: Default::default(),
        auth: Default::default(),
    }
}

/// Fully wired document service plus handles on every collaborator.
pub struct Harness {
    pub service: DocumentService,
    pub documents: Arc<InMemoryDocumentStore>,
    pub storage: Arc<MemoryStorageProvider>,
    pub cache: CacheManager,
    pub jobs: Arc<RecordingDispatcher>,
    pub publisher: Arc<RecordingPublisher>,
    pub audit_entries: AuditSink,
}

impl Harness {
    pub fn new() -> Self {
        let audit_entries: AuditSink = Arc::new(Mutex::new(Vec::new()));
        let documents = Arc::new(InMemoryDocumentStore::new(audit_entries.clone()));
        let audit = Arc::new(InMemoryAuditStore::new(audit_entries.clone()));
        let storage = Arc::new(MemoryStorageProvider::new());
        let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig::default(),
        )));
        let jobs = Arc::new(RecordingDispatcher::new());
        let publisher = Arc::new(RecordingPublisher::new());

        let service = DocumentService::new(
            documents.clone(),
            audit.clone(),
            storage.clone(),
            cache.clone(),
            Arc::new(RbacEnforcer::new()),
            jobs.clone(),
            publisher.clone(),
            &test_config(),
        );

        Self {
            service,
            documents,
            storage,
            cache,
            jobs,
            publisher,
            audit_entries,
        }
    }

    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.audit_entries.lock().unwrap().clone()
    }
}

pub fn user_harness() -> (UserService, Arc<InMemoryUserStore>) {
    let users = Arc::new(InMemoryUserStore::new());
    let service = UserService::new(
        users.clone(),
        PasswordHasher::new(),
        PasswordValidator::default(),
        Arc::new(RbacEnforcer::new()),
    );
    (service, users)
}

pub fn audit_harness(entries: AuditSink) -> AuditService {
    AuditService::new(
        Arc::new(InMemoryAuditStore::new(entries)),
        Arc::new(RbacEnforcer::new()),
    )
}

pub fn ctx(role: UserRole) -> RequestContext {
    RequestContext::new(
        Uuid::new_v4(),
        format!("{}-user", role.as_str()),
        role,
        Some("127.0.0.1".to_string()),
    )
}

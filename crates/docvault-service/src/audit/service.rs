//! Audit log query service.
//!
//! Audit entries are only ever written inside the document mutation and
//! access paths; this service is the read side, restricted to admins.

use std::sync::Arc;

use uuid::Uuid;

use docvault_auth::{RbacEnforcer, SystemPermission};
use docvault_core::types::pagination::{PageRequest, PageResponse};
use docvault_core::AppResult;
use docvault_entity::audit::{AuditLogEntry, AuditStore};

use crate::context::RequestContext;

/// Read access to the audit log.
#[derive(Debug)]
pub struct AuditService {
    audit: Arc<dyn AuditStore>,
    rbac: Arc<RbacEnforcer>,
}

impl AuditService {
    /// Create a new audit service.
    pub fn new(audit: Arc<dyn AuditStore>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { audit, rbac }
    }

    /// List audit entries, newest first, optionally restricted to one
    /// document. Admin only.
    pub async fn list_audit_logs(
        &self,
        ctx: &RequestContext,
        document_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::AuditView)?;
        self.audit.list(document_id, page).await
    }
}

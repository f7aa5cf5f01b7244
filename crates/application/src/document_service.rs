//! Scope-filtered document listing and upload metadata registration.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult};
use deskhive_domain::{DepartmentId, Document, UserProfile};

use crate::access_service::AccessService;
use crate::ports::{DocumentRepository, NewDocument};

/// Input for registering an uploaded document.
#[derive(Debug, Clone)]
pub struct RegisterDocumentInput {
    /// Display name.
    pub name: String,
    /// Object storage path written by the upload flow.
    pub storage_locator: String,
    /// MIME type.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Scoping department; `None` registers a company-wide document.
    pub department_id: Option<DepartmentId>,
}

/// Application service for document metadata.
#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    access: AccessService,
}

impl DocumentService {
    /// Creates a new document service.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>, access: AccessService) -> Self {
        Self { documents, access }
    }

    /// Lists the documents visible to the actor.
    ///
    /// Department members see their scoped departments plus the tenant's
    /// company-wide documents; an empty department scope therefore still
    /// surfaces company-wide documents, never department-scoped ones.
    pub async fn list_documents(&self, actor: &UserProfile) -> AppResult<Vec<Document>> {
        let scope = self.access.scope_for_profile(actor).await?;

        if scope.platform_wide {
            return self.documents.list_all().await;
        }

        let company_id = actor.company_id.ok_or_else(|| {
            AppError::Forbidden("document access requires a company affiliation".to_owned())
        })?;

        if scope.company_wide {
            return self.documents.list_for_company(company_id).await;
        }

        let department_ids: Vec<DepartmentId> = scope.department_ids.iter().copied().collect();
        self.documents
            .list_for_departments(company_id, &department_ids)
            .await
    }

    /// Registers uploaded document metadata.
    ///
    /// A department-scoped upload requires the department to be in the
    /// actor's scope; a company-wide upload requires company-wide scope.
    pub async fn register_upload(
        &self,
        actor: &UserProfile,
        input: RegisterDocumentInput,
    ) -> AppResult<Document> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation(
                "document name must not be empty".to_owned(),
            ));
        }
        if input.file_size < 0 {
            return Err(AppError::Validation(
                "document file size must not be negative".to_owned(),
            ));
        }

        let scope = self.access.scope_for_profile(actor).await?;
        let company_id = actor.company_id.ok_or_else(|| {
            AppError::Forbidden("document upload requires a company affiliation".to_owned())
        })?;

        match input.department_id {
            Some(department_id) if !scope.covers_department(department_id) => {
                return Err(AppError::Forbidden(format!(
                    "department '{department_id}' is outside the caller's scope"
                )));
            }
            None if !scope.company_wide => {
                return Err(AppError::Forbidden(
                    "company-wide documents require company-wide scope".to_owned(),
                ));
            }
            _ => {}
        }

        self.documents
            .insert(NewDocument {
                company_id,
                department_id: input.department_id,
                name: input.name,
                storage_locator: input.storage_locator,
                file_type: input.file_type,
                file_size: input.file_size,
                uploaded_by: actor.id,
            })
            .await
    }
}

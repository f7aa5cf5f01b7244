use deskhive_core::AppError;
use deskhive_domain::Document;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use deskhive_application::RegisterDocumentInput;

use super::parse_department_id;

/// API representation of document metadata.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/document-response.ts"
)]
pub struct DocumentResponse {
    pub id: String,
    pub company_id: String,
    /// Absent for company-wide documents.
    pub department_id: Option<String>,
    pub name: String,
    pub storage_locator: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: String,
    pub created_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.to_string(),
            company_id: document.company_id.to_string(),
            department_id: document.department_id.map(|id| id.to_string()),
            name: document.name,
            storage_locator: document.storage_locator,
            file_type: document.file_type,
            file_size: document.file_size,
            uploaded_by: document.uploaded_by.to_string(),
            created_at: document.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for registering an uploaded document.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/register-document-request.ts"
)]
pub struct RegisterDocumentRequest {
    pub name: String,
    pub storage_locator: String,
    pub file_type: String,
    pub file_size: i64,
    /// Omit for a company-wide document.
    pub department_id: Option<String>,
}

impl TryFrom<RegisterDocumentRequest> for RegisterDocumentInput {
    type Error = AppError;

    fn try_from(request: RegisterDocumentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: request.name,
            storage_locator: request.storage_locator,
            file_type: request.file_type,
            file_size: request.file_size,
            department_id: request
                .department_id
                .as_deref()
                .map(parse_department_id)
                .transpose()?,
        })
    }
}

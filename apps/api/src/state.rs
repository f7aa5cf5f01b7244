use deskhive_application::{
    DepartmentService, DirectoryService, DocumentService, GrantService, ProfileService,
    TenantService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub directory_service: DirectoryService,
    pub grant_service: GrantService,
    pub document_service: DocumentService,
    pub department_service: DepartmentService,
    pub tenant_service: TenantService,
    pub frontend_url: String,
}

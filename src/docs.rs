// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Employees ---
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        handlers::employees::assign_role,
        handlers::employees::unassign_role,
        handlers::employees::set_roles,

        // --- Departments ---
        handlers::departments::list_departments,
        handlers::departments::create_department,
        handlers::departments::update_department,
        handlers::departments::delete_department,

        // --- Roles ---
        handlers::roles::list_roles,
        handlers::roles::create_role,
        handlers::roles::update_role,
        handlers::roles::delete_role,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::CredentialsPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,

            // --- Employees ---
            models::employee::Employee,
            models::employee::RoleSummary,
            models::employee::EmployeePage,
            models::employee::EmployeePayload,
            models::employee::CreatedId,
            models::employee::RoleAssignmentPayload,
            models::employee::SetRolesPayload,
            models::employee::RoleChanges,

            // --- Departments ---
            models::department::Department,
            models::department::DepartmentPayload,
            models::department::DepartmentCreated,

            // --- Roles ---
            models::role::Role,
            models::role::RoleList,
            models::role::RolePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Employees", description = "Funcionários e atribuição de cargos"),
        (name = "Departments", description = "Departamentos"),
        (name = "Roles", description = "Cargos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/employees",
            "/api/employees/{id}",
            "/api/employees/assign-role",
            "/api/employees/unassign-role",
            "/api/employees/{id}/roles",
            "/api/departments",
            "/api/departments/{id}",
            "/api/roles",
            "/api/roles/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

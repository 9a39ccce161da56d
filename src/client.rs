// src/client.rs
//
// Camada de dados do cliente: wrappers tipados por endpoint, o protocolo de
// reconciliação de cargos e o estado da listagem de funcionários.

pub mod api;
pub mod error;
pub mod list_view;
pub mod reconcile;
pub mod retry;
pub mod session;

use async_trait::async_trait;

pub use api::{ApiClient, EmployeeQuery};
pub use error::{ClientError, ClientResult};
pub use list_view::EmployeeListState;
pub use reconcile::{reconcile_roles, ReconcileReport, RoleOperation};
pub use session::RoleAssignmentSession;

use crate::models::{
    employee::{Employee, EmployeePage},
    role::Role,
};

/// O subconjunto da API que as telas de listagem e de cargos usam.
/// `ApiClient` é a implementação real; os testes usam um dublê em memória.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list_employees(&self, query: &EmployeeQuery) -> ClientResult<EmployeePage>;
    async fn list_roles(&self) -> ClientResult<Vec<Role>>;
    async fn get_employee(&self, id: i32) -> ClientResult<Employee>;
    async fn assign_role(&self, employee_id: i32, role_id: i32) -> ClientResult<()>;
    async fn unassign_role(&self, employee_id: i32, role_id: i32) -> ClientResult<()>;
}

// src/client/api.rs

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{ClientError, ClientResult, EmployeeApi};
use crate::models::{
    auth::{AuthResponse, CredentialsPayload, MessageResponse},
    department::{Department, DepartmentCreated, DepartmentPayload},
    employee::{
        CreatedId, Employee, EmployeePage, EmployeePayload, RoleAssignmentPayload, RoleChanges,
        SetRolesPayload,
    },
    role::{Role, RoleList, RolePayload},
};

/// Parâmetros de `GET /api/employees`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeQuery {
    pub page: i64,
    pub limit: i64,
    pub search: String,
}

// Corpo de erro padrão do servidor
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Cliente HTTP da API. O token obtido no login vai automaticamente em todas
/// as chamadas seguintes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` inclui o prefixo `/api`, ex.: `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            http: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error);
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        Ok(response.json().await?)
    }

    // =========================================================================
    //  AUTH
    // =========================================================================

    pub async fn register(&self, email: &str, password: &str) -> ClientResult<MessageResponse> {
        let req = self
            .request(Method::POST, "/auth/register")
            .json(&CredentialsPayload::new(email, password));
        self.send(req).await
    }

    /// Faz login e guarda o token para as próximas chamadas.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<String> {
        let req = self
            .request(Method::POST, "/auth/login")
            .json(&CredentialsPayload::new(email, password));
        let AuthResponse { token } = self.send(req).await?;
        self.token = Some(token.clone());
        Ok(token)
    }

    // =========================================================================
    //  EMPLOYEES
    // =========================================================================

    pub async fn list_employees(&self, query: &EmployeeQuery) -> ClientResult<EmployeePage> {
        let req = self.request(Method::GET, "/employees").query(query);
        self.send(req).await
    }

    pub async fn get_employee(&self, id: i32) -> ClientResult<Employee> {
        self.send(self.request(Method::GET, &format!("/employees/{id}"))).await
    }

    pub async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<CreatedId> {
        self.send(self.request(Method::POST, "/employees").json(payload)).await
    }

    pub async fn update_employee(
        &self,
        id: i32,
        payload: &EmployeePayload,
    ) -> ClientResult<MessageResponse> {
        let req = self.request(Method::PUT, &format!("/employees/{id}")).json(payload);
        self.send(req).await
    }

    pub async fn delete_employee(&self, id: i32) -> ClientResult<MessageResponse> {
        self.send(self.request(Method::DELETE, &format!("/employees/{id}"))).await
    }

    pub async fn assign_role(&self, employee_id: i32, role_id: i32) -> ClientResult<MessageResponse> {
        let req = self
            .request(Method::POST, "/employees/assign-role")
            .json(&RoleAssignmentPayload::new(employee_id, role_id));
        self.send(req).await
    }

    pub async fn unassign_role(
        &self,
        employee_id: i32,
        role_id: i32,
    ) -> ClientResult<MessageResponse> {
        let req = self
            .request(Method::DELETE, "/employees/unassign-role")
            .json(&RoleAssignmentPayload::new(employee_id, role_id));
        self.send(req).await
    }

    /// Endpoint transacional: o servidor calcula e aplica a diferença de uma vez.
    pub async fn set_roles(&self, employee_id: i32, role_ids: &[i32]) -> ClientResult<RoleChanges> {
        let req = self
            .request(Method::PUT, &format!("/employees/{employee_id}/roles"))
            .json(&SetRolesPayload { role_ids: Some(role_ids.to_vec()) });
        self.send(req).await
    }

    // =========================================================================
    //  DEPARTMENTS
    // =========================================================================

    pub async fn list_departments(&self) -> ClientResult<Vec<Department>> {
        self.send(self.request(Method::GET, "/departments")).await
    }

    pub async fn create_department(
        &self,
        payload: &DepartmentPayload,
    ) -> ClientResult<DepartmentCreated> {
        self.send(self.request(Method::POST, "/departments").json(payload)).await
    }

    pub async fn update_department(
        &self,
        id: i32,
        payload: &DepartmentPayload,
    ) -> ClientResult<MessageResponse> {
        let req = self.request(Method::PUT, &format!("/departments/{id}")).json(payload);
        self.send(req).await
    }

    pub async fn delete_department(&self, id: i32) -> ClientResult<MessageResponse> {
        self.send(self.request(Method::DELETE, &format!("/departments/{id}"))).await
    }

    // =========================================================================
    //  ROLES
    // =========================================================================

    pub async fn list_roles(&self) -> ClientResult<Vec<Role>> {
        let RoleList { roles } = self.send(self.request(Method::GET, "/roles")).await?;
        Ok(roles)
    }

    pub async fn create_role(&self, payload: &RolePayload) -> ClientResult<CreatedId> {
        self.send(self.request(Method::POST, "/roles").json(payload)).await
    }

    pub async fn update_role(&self, id: i32, payload: &RolePayload) -> ClientResult<MessageResponse> {
        let req = self.request(Method::PUT, &format!("/roles/{id}")).json(payload);
        self.send(req).await
    }

    pub async fn delete_role(&self, id: i32) -> ClientResult<MessageResponse> {
        self.send(self.request(Method::DELETE, &format!("/roles/{id}"))).await
    }
}

#[async_trait]
impl EmployeeApi for ApiClient {
    async fn list_employees(&self, query: &EmployeeQuery) -> ClientResult<EmployeePage> {
        ApiClient::list_employees(self, query).await
    }

    async fn list_roles(&self) -> ClientResult<Vec<Role>> {
        ApiClient::list_roles(self).await
    }

    async fn get_employee(&self, id: i32) -> ClientResult<Employee> {
        ApiClient::get_employee(self, id).await
    }

    async fn assign_role(&self, employee_id: i32, role_id: i32) -> ClientResult<()> {
        ApiClient::assign_role(self, employee_id, role_id).await.map(|_| ())
    }

    async fn unassign_role(&self, employee_id: i32, role_id: i32) -> ClientResult<()> {
        ApiClient::unassign_role(self, employee_id, role_id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.token(), None);
    }

    #[test]
    fn bearer_token_is_attached_once_set() {
        let mut client = ApiClient::new("http://localhost:8080/api").unwrap();
        client.set_token(Some("abc".into()));

        let request = client.request(Method::GET, "/employees").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/employees");
        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }

    #[test]
    fn list_query_is_encoded() {
        let client = ApiClient::new("http://localhost:8080/api").unwrap();
        let query = EmployeeQuery { page: 2, limit: 5, search: "jo hn".into() };
        let request = client
            .request(Method::GET, "/employees")
            .query(&query)
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("page=2&limit=5&search=jo+hn"));
    }
}

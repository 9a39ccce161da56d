// Testes contra um Postgres real. Cada teste recebe um banco novo com as
// migrations aplicadas. Ficam fora do `cargo test` padrão; rode com:
//   DATABASE_URL=postgres://... cargo test --test db_api -- --ignored

use std::collections::BTreeSet;

use employee_management::{
    client::{reconcile_roles, ApiClient, EmployeeListState, RoleAssignmentSession},
    common::error::AppError,
    config::AppState,
    models::{
        department::{DepartmentFields, DepartmentPayload},
        employee::{EmployeeFields, EmployeePayload, Pagination},
        role::{RoleFields, RolePayload},
    },
    routes,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

const JWT_SECRET: &str = "test_jwt_secret";

fn employee(email: &str, department_id: Option<i32>) -> EmployeeFields {
    EmployeeFields {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: email.into(),
        position: "Developer".into(),
        salary: Decimal::new(50000, 0),
        department_id,
    }
}

async fn seed_roles(state: &AppState, titles: &[&str]) -> Vec<i32> {
    let mut ids = Vec::new();
    for title in titles {
        let fields = RoleFields { title: title.to_string(), description: None };
        ids.push(state.role_repo.create(&fields).await.unwrap());
    }
    ids
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(pool: PgPool) -> Self {
        let app = routes::app(AppState::from_pool(pool, JWT_SECRET.to_string()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}/api"), handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
//  REPOSITÓRIOS E SERVIÇOS
// =============================================================================

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_employee_email_is_a_conflict(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    state.employee_service.create(&employee("dup@example.com", None)).await.unwrap();

    let err = state
        .employee_service
        .create(&employee("dup@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already exists"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn unknown_department_is_rejected(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    let err = state
        .employee_service
        .create(&employee("x@example.com", Some(999)))
        .await
        .unwrap_err();
    assert_eq!(err.client_message(), "Invalid department_id: Department does not exist");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn employee_carries_department_name_and_roles(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    let dept = state
        .department_repo
        .create(&DepartmentFields { name: "IT".into(), location: "Floor 2".into() })
        .await
        .unwrap();
    let id = state.employee_service.create(&employee("it@example.com", Some(dept))).await.unwrap();
    let roles = seed_roles(&state, &["Admin", "Viewer"]).await;
    state.employee_service.assign_role(id, roles[1]).await.unwrap();

    let fetched = state.employee_service.get(id).await.unwrap();
    assert_eq!(fetched.department_name.as_deref(), Some("IT"));
    assert_eq!(fetched.role_ids(), vec![roles[1]]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn pages_cover_every_match_exactly_once(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    for i in 0..7 {
        state
            .employee_service
            .create(&employee(&format!("p{i}@example.com"), None))
            .await
            .unwrap();
    }
    state.employee_service.create(&employee("other@test.org", None)).await.unwrap();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = state
            .employee_service
            .list(Pagination::new(Some(page), Some(3)).unwrap(), "EXAMPLE")
            .await
            .unwrap();
        assert_eq!(result.total, 7);
        seen.extend(result.employees.into_iter().map(|e| e.id));
    }

    let unique: BTreeSet<i32> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 7);
    assert_eq!(unique.len(), 7);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn assignment_pair_is_unique(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    let id = state.employee_service.create(&employee("r@example.com", None)).await.unwrap();
    let roles = seed_roles(&state, &["Admin"]).await;

    state.employee_service.assign_role(id, roles[0]).await.unwrap();
    let err = state.employee_service.assign_role(id, roles[0]).await.unwrap_err();
    assert_eq!(err.client_message(), "Role already assigned");

    state.employee_service.unassign_role(id, roles[0]).await.unwrap();
    let err = state.employee_service.unassign_role(id, roles[0]).await.unwrap_err();
    assert_eq!(err.client_message(), "Role assignment not found");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn deleting_an_employee_drops_its_assignments(pool: PgPool) {
    let state = AppState::from_pool(pool.clone(), JWT_SECRET.into());
    let id = state.employee_service.create(&employee("d@example.com", None)).await.unwrap();
    let roles = seed_roles(&state, &["Admin"]).await;
    state.employee_service.assign_role(id, roles[0]).await.unwrap();

    state.employee_service.delete(id).await.unwrap();

    let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee_roles WHERE employee_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(left, 0);
    assert!(matches!(
        state.employee_service.get(id).await,
        Err(AppError::NotFound("Employee"))
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn replace_roles_applies_the_difference(pool: PgPool) {
    let state = AppState::from_pool(pool, JWT_SECRET.into());
    let id = state.employee_service.create(&employee("t@example.com", None)).await.unwrap();
    let r = seed_roles(&state, &["A", "B", "C"]).await;
    state.employee_service.assign_role(id, r[0]).await.unwrap();
    state.employee_service.assign_role(id, r[1]).await.unwrap();

    let changes = state.employee_service.replace_roles(id, &[r[1], r[2]]).await.unwrap();
    assert_eq!(changes.assigned, vec![r[2]]);
    assert_eq!(changes.unassigned, vec![r[0]]);
    assert_eq!(state.employee_service.get(id).await.unwrap().role_ids(), vec![r[1], r[2]]);

    // Cargo inexistente: nada muda
    let err = state.employee_service.replace_roles(id, &[999]).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidReference(_)));
    assert_eq!(state.employee_service.get(id).await.unwrap().role_ids(), vec![r[1], r[2]]);
}

// =============================================================================
//  PONTA A PONTA (CLIENTE HTTP + SERVIDOR)
// =============================================================================

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn register_login_and_wrong_password(pool: PgPool) {
    let server = TestServer::spawn(pool).await;
    let mut client = ApiClient::new(&server.base_url).unwrap();

    let registered = client.register("a@x.com", "pw1").await.unwrap();
    assert_eq!(registered.message, "User registered");

    let err = client.register("a@x.com", "pw1").await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = client.login("a@x.com", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");

    let token = client.login("a@x.com", "pw1").await.unwrap();
    assert!(!token.is_empty());
    assert!(client.list_departments().await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn client_reconciliation_against_the_server(pool: PgPool) {
    let server = TestServer::spawn(pool).await;
    let mut client = ApiClient::new(&server.base_url).unwrap();
    client.register("admin@x.com", "pw").await.unwrap();
    client.login("admin@x.com", "pw").await.unwrap();

    let payload = EmployeePayload {
        first_name: Some("Ana".into()),
        last_name: Some("Lima".into()),
        email: Some("ana@example.com".into()),
        position: Some("Analyst".into()),
        salary: Some(Decimal::new(4200, 0)),
        department_id: None,
    };
    let employee_id = client.create_employee(&payload).await.unwrap().id;

    let mut role_ids = Vec::new();
    for title in ["R1", "R2", "R3"] {
        let role = RolePayload { title: Some(title.into()), description: None };
        role_ids.push(client.create_role(&role).await.unwrap().id);
    }
    let (r1, r2, r3) = (role_ids[0], role_ids[1], role_ids[2]);

    let mut session = RoleAssignmentSession::open(&client, employee_id).await;
    assert!(session.toggle(&client, r1, true).await);
    assert!(session.toggle(&client, r2, true).await);

    // {r1, r2} -> {r2, r3}
    let report = session.apply(&client, &[r2, r3]).await;
    assert!(report.is_complete());
    assert_eq!(report.applied.len(), 2);
    assert_eq!(client.get_employee(employee_id).await.unwrap().role_ids(), vec![r2, r3]);

    // Conjunto anterior desatualizado: o servidor recusa o assign repetido
    let stale = reconcile_roles(&client, employee_id, &[], &[r2]).await;
    assert_eq!(stale.failed.len(), 1);

    let mut list = EmployeeListState::new();
    list.set_search("ana");
    list.refresh(&client).await;
    assert!(list.error.is_none());
    assert_eq!(list.total, 1);
    assert_eq!(list.roles.len(), 3);
    assert_eq!(list.employees[0].role_ids(), vec![r2, r3]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn missing_resources_answer_404_with_their_name(pool: PgPool) {
    let server = TestServer::spawn(pool).await;
    let mut client = ApiClient::new(&server.base_url).unwrap();
    client.register("nf@x.com", "pw").await.unwrap();
    client.login("nf@x.com", "pw").await.unwrap();

    let employee = EmployeePayload {
        first_name: Some("Ana".into()),
        last_name: Some("Lima".into()),
        email: Some("ana@example.com".into()),
        position: Some("Analyst".into()),
        salary: Some(Decimal::new(4200, 0)),
        department_id: None,
    };
    let department = DepartmentPayload { name: Some("IT".into()), location: None };
    let role = RolePayload { title: Some("Admin".into()), description: None };

    let cases = [
        (client.update_employee(999, &employee).await.unwrap_err(), "Employee not found"),
        (client.delete_employee(999).await.unwrap_err(), "Employee not found"),
        (client.update_department(999, &department).await.unwrap_err(), "Department not found"),
        (client.delete_department(999).await.unwrap_err(), "Department not found"),
        (client.update_role(999, &role).await.unwrap_err(), "Role not found"),
        (client.delete_role(999).await.unwrap_err(), "Role not found"),
    ];

    for (err, expected) in cases {
        assert_eq!(err.status(), Some(404), "{expected}");
        assert_eq!(err.user_message("unexpected"), expected);
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn non_existent_department_id_is_rejected_on_create_and_update(pool: PgPool) {
    let server = TestServer::spawn(pool.clone()).await;
    let mut client = ApiClient::new(&server.base_url).unwrap();
    client.register("dept@x.com", "pw").await.unwrap();
    client.login("dept@x.com", "pw").await.unwrap();

    let mut payload = EmployeePayload {
        first_name: Some("Neg".into()),
        last_name: Some("Dept".into()),
        email: Some("neg@example.com".into()),
        position: Some("Dev".into()),
        salary: Some(Decimal::new(1000, 0)),
        department_id: Some(-5),
    };
    for department_id in [-5, 999] {
        payload.department_id = Some(department_id);
        let err = client.create_employee(&payload).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.user_message("unexpected"),
            "Invalid department_id: Department does not exist"
        );
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    payload.department_id = None;
    let id = client.create_employee(&payload).await.unwrap().id;
    payload.department_id = Some(-5);
    let err = client.update_employee(id, &payload).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(client.get_employee(id).await.unwrap().department_id, None);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn optional_columns_are_stored_with_their_defaults(pool: PgPool) {
    let server = TestServer::spawn(pool.clone()).await;
    let mut client = ApiClient::new(&server.base_url).unwrap();
    client.register("opt@x.com", "pw").await.unwrap();
    client.login("opt@x.com", "pw").await.unwrap();

    let role_id = client
        .create_role(&RolePayload { title: Some("Viewer".into()), description: None })
        .await
        .unwrap()
        .id;
    let department_id = client
        .create_department(&DepartmentPayload { name: Some("Ops".into()), location: None })
        .await
        .unwrap()
        .id;

    let description: Option<String> =
        sqlx::query_scalar("SELECT description FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(description, None);

    let location: String = sqlx::query_scalar("SELECT location FROM departments WHERE id = $1")
        .bind(department_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(location, "");

    // Descrição vazia também vira NULL
    client
        .update_role(role_id, &RolePayload { title: Some("Viewer".into()), description: Some(String::new()) })
        .await
        .unwrap();
    let description: Option<String> =
        sqlx::query_scalar("SELECT description FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(description, None);
}

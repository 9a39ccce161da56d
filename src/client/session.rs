// src/client/session.rs

use std::collections::BTreeSet;

use super::reconcile::{reconcile_roles, ReconcileReport};
use super::EmployeeApi;

const LOAD_FAILED: &str = "Failed to load roles";
const OPERATION_FAILED: &str = "Role operation failed";

/// Tela de cargos de um funcionário: o conjunto marcado espelha o que o
/// servidor confirmou, não o que o usuário clicou.
#[derive(Debug, Clone)]
pub struct RoleAssignmentSession {
    pub employee_id: i32,
    pub selected: BTreeSet<i32>,
    pub loading: bool,
    pub error: Option<String>,
}

impl RoleAssignmentSession {
    /// Abre a sessão buscando os cargos atuais do funcionário no servidor.
    pub async fn open<A>(api: &A, employee_id: i32) -> Self
    where
        A: EmployeeApi + ?Sized,
    {
        let mut session = Self {
            employee_id,
            selected: BTreeSet::new(),
            loading: true,
            error: None,
        };

        match api.get_employee(employee_id).await {
            Ok(employee) => session.selected = employee.role_ids().into_iter().collect(),
            Err(e) => {
                tracing::error!(employee_id, "Error fetching employee roles: {}", e);
                session.error = Some(e.user_message(LOAD_FAILED));
            }
        }
        session.loading = false;
        session
    }

    pub fn is_selected(&self, role_id: i32) -> bool {
        self.selected.contains(&role_id)
    }

    /// Marca ou desmarca um cargo com uma única chamada. Retorna `false` se
    /// outra operação ainda estiver em andamento ou se a chamada falhar.
    pub async fn toggle<A>(&mut self, api: &A, role_id: i32, checked: bool) -> bool
    where
        A: EmployeeApi + ?Sized,
    {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;

        let result = if checked {
            api.assign_role(self.employee_id, role_id).await
        } else {
            api.unassign_role(self.employee_id, role_id).await
        };

        let ok = match result {
            Ok(()) => {
                if checked {
                    self.selected.insert(role_id);
                } else {
                    self.selected.remove(&role_id);
                }
                true
            }
            Err(e) => {
                tracing::error!(employee_id = self.employee_id, role_id, "Error updating role: {}", e);
                self.error = Some(e.user_message(OPERATION_FAILED));
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Leva o funcionário de `selected` para `desired`. Em falha parcial,
    /// `selected` passa a ser o estado efetivo e `error` mostra a primeira falha.
    pub async fn apply<A>(&mut self, api: &A, desired: &[i32]) -> ReconcileReport
    where
        A: EmployeeApi + ?Sized,
    {
        self.loading = true;
        self.error = None;

        let previous: Vec<i32> = self.selected.iter().copied().collect();
        let report = reconcile_roles(api, self.employee_id, &previous, desired).await;

        self.selected = report.roles_after(&previous).into_iter().collect();
        if let Some((_, e)) = report.failed.first() {
            self.error = Some(e.user_message(OPERATION_FAILED));
        }
        self.loading = false;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{Call, MockApi};

    #[tokio::test]
    async fn open_fetches_current_roles() {
        let api = MockApi::with_roles(&[2, 5]);
        let session = RoleAssignmentSession::open(&api, 3).await;

        assert_eq!(api.calls(), vec![Call::GetEmployee(3)]);
        assert!(session.is_selected(2));
        assert!(session.is_selected(5));
        assert!(!session.loading);
        assert!(session.error.is_none());
    }

    #[tokio::test]
    async fn toggle_sends_one_call_per_click() {
        let api = MockApi::with_roles(&[1]);
        let mut session = RoleAssignmentSession::open(&api, 1).await;

        assert!(session.toggle(&api, 4, true).await);
        assert!(session.toggle(&api, 1, false).await);

        assert_eq!(&api.calls()[1..], &[Call::Assign(1, 4), Call::Unassign(1, 1)]);
        assert_eq!(session.selected.iter().copied().collect::<Vec<_>>(), vec![4]);
    }

    #[tokio::test]
    async fn toggle_is_ignored_while_loading() {
        let api = MockApi::default();
        let mut session = RoleAssignmentSession::open(&api, 1).await;
        session.loading = true;

        assert!(!session.toggle(&api, 2, true).await);
        assert_eq!(api.calls(), vec![Call::GetEmployee(1)]);
    }

    #[tokio::test]
    async fn failed_toggle_keeps_selection_and_shows_message() {
        let mut api = MockApi::default();
        api.failing_roles.insert(2);
        let mut session = RoleAssignmentSession::open(&api, 1).await;

        assert!(!session.toggle(&api, 2, true).await);
        assert!(!session.is_selected(2));
        assert_eq!(session.error.as_deref(), Some("Database error assigning role"));
    }

    #[tokio::test]
    async fn apply_tracks_the_effective_state_on_partial_failure() {
        let mut api = MockApi::with_roles(&[1, 2]);
        api.failing_roles.insert(1);
        let mut session = RoleAssignmentSession::open(&api, 8).await;

        let report = session.apply(&api, &[2, 3]).await;

        assert!(!report.is_complete());
        // o 3 entrou, o 1 não saiu
        assert_eq!(session.selected.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(session.error.is_some());
    }
}

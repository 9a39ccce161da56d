// src/client/reconcile.rs
//
// Protocolo de atribuição de cargos do lado cliente: calcula a diferença entre
// os cargos atuais e os desejados e dispara uma chamada por cargo alterado.
// Não é atômico. Se parte das chamadas falhar, o servidor fica num estado
// intermediário e nada é desfeito; o relatório diz exatamente o que ficou.

use std::collections::BTreeSet;
use std::fmt;

use super::{ClientError, EmployeeApi};
use crate::models::employee::RoleChanges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOperation {
    Assign(i32),
    Unassign(i32),
}

impl fmt::Display for RoleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleOperation::Assign(id) => write!(f, "assign role {id}"),
            RoleOperation::Unassign(id) => write!(f, "unassign role {id}"),
        }
    }
}

/// Plano de chamadas: primeiro os assigns, depois os unassigns, ids crescentes.
pub fn plan(previous: &[i32], desired: &[i32]) -> Vec<RoleOperation> {
    let changes = RoleChanges::between(previous, desired);
    changes
        .assigned
        .into_iter()
        .map(RoleOperation::Assign)
        .chain(changes.unassigned.into_iter().map(RoleOperation::Unassign))
        .collect()
}

#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub applied: Vec<RoleOperation>,
    pub failed: Vec<(RoleOperation, ClientError)>,
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Cargos que o funcionário tem depois das chamadas que deram certo.
    pub fn roles_after(&self, previous: &[i32]) -> Vec<i32> {
        let mut roles: BTreeSet<i32> = previous.iter().copied().collect();
        for op in &self.applied {
            match op {
                RoleOperation::Assign(id) => {
                    roles.insert(*id);
                }
                RoleOperation::Unassign(id) => {
                    roles.remove(id);
                }
            }
        }
        roles.into_iter().collect()
    }
}

/// Aplica `desired` sobre `previous` com chamadas independentes e sequenciais.
/// Todas as chamadas são tentadas, mesmo depois de uma falha.
pub async fn reconcile_roles<A>(
    api: &A,
    employee_id: i32,
    previous: &[i32],
    desired: &[i32],
) -> ReconcileReport
where
    A: EmployeeApi + ?Sized,
{
    let mut report = ReconcileReport::default();

    for op in plan(previous, desired) {
        let result = match op {
            RoleOperation::Assign(role_id) => api.assign_role(employee_id, role_id).await,
            RoleOperation::Unassign(role_id) => api.unassign_role(employee_id, role_id).await,
        };

        match result {
            Ok(()) => report.applied.push(op),
            Err(e) => {
                tracing::warn!(employee_id, "Role change failed ({}): {}", op, e);
                report.failed.push((op, e));
            }
        }
    }

    if !report.is_complete() {
        tracing::warn!(
            employee_id,
            applied = report.applied.len(),
            failed = report.failed.len(),
            "Role reconciliation left a partial state"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{Call, MockApi};

    #[tokio::test]
    async fn only_the_difference_is_sent() {
        let api = MockApi::with_roles(&[1, 2]);

        let report = reconcile_roles(&api, 7, &[1, 2], &[2, 3]).await;

        assert!(report.is_complete());
        assert_eq!(api.calls(), vec![Call::Assign(7, 3), Call::Unassign(7, 1)]);
        assert_eq!(report.roles_after(&[1, 2]), vec![2, 3]);
    }

    #[tokio::test]
    async fn unchanged_selection_sends_nothing() {
        let api = MockApi::with_roles(&[4, 5]);
        let report = reconcile_roles(&api, 1, &[4, 5], &[5, 4]).await;
        assert!(report.applied.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_not_rolled_back() {
        let mut api = MockApi::with_roles(&[1, 2]);
        api.failing_roles.insert(4);

        // +3 +4 +5 -1 -2, com o 4 falhando
        let report = reconcile_roles(&api, 9, &[1, 2], &[3, 4, 5]).await;

        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, RoleOperation::Assign(4));
        assert_eq!(api.calls().len(), 5);

        // O que deu certo continua valendo
        let server_state: Vec<i32> = api.assigned.lock().unwrap().iter().copied().collect();
        assert_eq!(server_state, vec![3, 5]);
        assert_eq!(report.roles_after(&[1, 2]), server_state);
    }

    #[tokio::test]
    async fn stale_previous_set_surfaces_server_errors() {
        // O cliente acha que o cargo 2 não está atribuído, mas está
        let api = MockApi::with_roles(&[2]);
        let report = reconcile_roles(&api, 1, &[], &[2]).await;

        let (op, err) = &report.failed[0];
        assert_eq!(*op, RoleOperation::Assign(2));
        assert_eq!(err.user_message("Role operation failed"), "Role already assigned");
    }

    #[test]
    fn plan_orders_assigns_before_unassigns() {
        assert_eq!(
            plan(&[9, 1], &[8, 2]),
            vec![
                RoleOperation::Assign(2),
                RoleOperation::Assign(8),
                RoleOperation::Unassign(1),
                RoleOperation::Unassign(9),
            ]
        );
    }
}

// src/client/list_view.rs

use super::retry::{with_retry, LIST_FETCH_RETRIES, RETRY_DELAY};
use super::{EmployeeApi, EmployeeQuery};
use crate::models::{
    employee::{total_pages, Employee},
    role::Role,
};

/// Tamanho fixo da página na tela de funcionários.
pub const PAGE_SIZE: i64 = 5;

const LOAD_FAILED: &str = "Failed to load data";

/// Estado da listagem paginada de funcionários.
#[derive(Debug, Clone)]
pub struct EmployeeListState {
    pub page: i64,
    pub search: String,
    pub employees: Vec<Employee>,
    pub roles: Vec<Role>,
    pub total: i64,
    pub error: Option<String>,
    pub loading: bool,
}

impl Default for EmployeeListState {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeListState {
    pub fn new() -> Self {
        Self {
            page: 1,
            search: String::new(),
            employees: Vec::new(),
            roles: Vec::new(),
            total: 0,
            error: None,
            loading: false,
        }
    }

    /// Trocar a busca sempre volta para a primeira página.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn total_pages(&self) -> i64 {
        total_pages(self.total, PAGE_SIZE)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// Avança uma página; retorna `false` se já estiver na última.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn query(&self) -> EmployeeQuery {
        EmployeeQuery {
            page: self.page,
            limit: PAGE_SIZE,
            search: self.search.clone(),
        }
    }

    /// Busca funcionários e cargos juntos, repetindo a busca inteira em caso de
    /// falha. Respostas de tentativas anteriores não são descartadas por id:
    /// o estado fica com o resultado da última tentativa concluída.
    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: EmployeeApi + ?Sized,
    {
        self.loading = true;
        self.error = None;

        let query = &self.query();
        let result = with_retry(LIST_FETCH_RETRIES, RETRY_DELAY, move || async move {
            futures::try_join!(api.list_employees(query), api.list_roles())
        })
        .await;

        match result {
            Ok((page, roles)) => {
                self.employees = page.employees;
                self.total = page.total;
                self.roles = roles;
            }
            Err(e) => {
                tracing::error!("Error loading employees: {}", e);
                self.error = Some(e.user_message(LOAD_FAILED));
            }
        }
        self.loading = false;
    }
}

// src/common/db_utils.rs

/// Violações de constraint que sabemos traduzir para erros de domínio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
}

/// Classifica o erro pelo código reportado pelo Postgres (23505 / 23503).
/// Qualquer outra coisa devolve `None` e deve virar `AppError::Database`.
pub fn violation(e: &sqlx::Error) -> Option<Violation> {
    let db_err = e.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else {
        None
    }
}

/// Termo de busca para `ILIKE`: substring em qualquer posição.
pub fn like_pattern(search: &str) -> String {
    format!("%{}%", search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_unclassified() {
        assert_eq!(violation(&sqlx::Error::RowNotFound), None);
        assert_eq!(violation(&sqlx::Error::PoolTimedOut), None);
    }

    #[test]
    fn empty_search_matches_everything() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("John"), "%John%");
    }
}

// src/models/department.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    #[schema(example = 1)]
    pub id: i32,

    #[schema(example = "IT")]
    pub name: String,

    // Nunca NULL: ausente vira string vazia
    #[schema(example = "Building A")]
    pub location: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DepartmentPayload {
    #[validate(
        required(message = "Department name is required"),
        length(min = 1, message = "Department name is required")
    )]
    #[schema(example = "IT")]
    pub name: Option<String>,

    #[schema(example = "Building A")]
    pub location: Option<String>,
}

/// Campos prontos para gravar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentFields {
    pub name: String,
    pub location: String,
}

impl TryFrom<DepartmentPayload> for DepartmentFields {
    type Error = AppError;

    fn try_from(payload: DepartmentPayload) -> Result<Self, Self::Error> {
        let name = payload
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("Department name is required".into()))?;

        Ok(Self {
            name,
            location: payload.location.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentCreated {
    pub message: String,
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_defaults_to_empty_string() {
        let fields = DepartmentFields::try_from(DepartmentPayload {
            name: Some("IT".into()),
            location: None,
        })
        .unwrap();
        assert_eq!(fields.location, "");
    }

    #[test]
    fn name_is_required() {
        let payload = DepartmentPayload { name: None, location: Some("HQ".into()) };
        assert!(payload.validate().is_err());
        assert!(DepartmentFields::try_from(payload).is_err());

        let empty = DepartmentPayload { name: Some(String::new()), location: None };
        assert!(empty.validate().is_err());
    }
}

// src/models/role.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    #[schema(example = 1)]
    pub id: i32,

    #[schema(example = "Admin")]
    pub title: String,

    // Diferente de Department.location: ausente fica NULL
    #[schema(example = "Full access")]
    pub description: Option<String>,
}

// GET /api/roles devolve `{ roles: [...] }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleList {
    pub roles: Vec<Role>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RolePayload {
    #[validate(
        required(message = "Role title is required"),
        length(min = 1, message = "Role title is required")
    )]
    #[schema(example = "Admin")]
    pub title: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFields {
    pub title: String,
    pub description: Option<String>,
}

impl TryFrom<RolePayload> for RoleFields {
    type Error = AppError;

    fn try_from(payload: RolePayload) -> Result<Self, Self::Error> {
        let title = payload
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Role title is required".into()))?;

        Ok(Self {
            title,
            description: payload.description.filter(|d| !d.is_empty()),
        })
    }
}

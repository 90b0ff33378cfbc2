use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "empId": 7,
        "fullName": "Jane Doe",
        "email": "jane@x.com",
        "department": "Engineering",
        "createdAt": "2024-03-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub emp_id: u32,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[schema(example = "jane@x.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-03-01T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Raw create/update payload. Every field is optional so that missing and
/// malformed values surface as field errors rather than body parse failures.
/// `createdAt` is not part of the payload and is ignored if sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[schema(example = 7)]
    pub emp_id: Option<i64>,
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    #[schema(example = "jane@x.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
}

/// Validated, normalized values ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub emp_id: u32,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Validated subset of columns to change; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub emp_id: Option<u32>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl EmployeeChanges {
    /// Full set of values, present only when every column was supplied.
    pub fn into_new(self) -> Option<NewEmployee> {
        Some(NewEmployee {
            emp_id: self.emp_id?,
            full_name: self.full_name?,
            email: self.email?,
            department: self.department?,
        })
    }
}

//! Persistence ports for the registry and the ledger.
//!
//! The SQL schema's unique keys and foreign key are the authoritative guard
//! for the record invariants; implementations must report violations of them
//! as [`StoreError::UniqueViolation`] / [`StoreError::ForeignKeyViolation`]
//! so services can turn a lost race into the same error a pre-check gives.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::{Attendance, AttendanceChanges, AttendanceFilter, NewAttendance};
use crate::model::employee::{Employee, EmployeeChanges, NewEmployee};

pub mod mysql;

pub use mysql::MySqlStore;

pub const EMP_ID_KEY: &str = "uq_employees_emp_id";
pub const EMAIL_KEY: &str = "uq_employees_email";
pub const EMPLOYEE_DATE_KEY: &str = "uq_attendance_employee_date";

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key violated; carries the key name when it can be identified.
    #[error("unique key violated: {0}")]
    UniqueViolation(String),

    #[error("referenced row does not exist")]
    ForeignKeyViolation,

    #[error("unreadable row: {0}")]
    CorruptRow(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn violates(&self, key: &str) -> bool {
        matches!(self, StoreError::UniqueViolation(k) if k == key)
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All employees, newest first
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;

    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, StoreError>;

    /// Whether another employee (not `exclude`) already uses `emp_id`
    async fn emp_id_taken(&self, emp_id: u32, exclude: Option<u64>) -> Result<bool, StoreError>;

    /// Whether another employee (not `exclude`) already uses `email`
    async fn email_taken(&self, email: &str, exclude: Option<u64>) -> Result<bool, StoreError>;

    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, StoreError>;

    /// Apply `changes`; `None` when the employee does not exist
    async fn update_employee(
        &self,
        id: u64,
        changes: &EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError>;

    /// Delete the employee and every attendance row that references it.
    /// Returns false when nothing was deleted.
    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Records matching every supplied filter, latest date first
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, StoreError>;

    async fn find_attendance(&self, id: u64) -> Result<Option<Attendance>, StoreError>;

    /// Whether a record other than `exclude` exists for this employee and day
    async fn attendance_marked(
        &self,
        employee_id: u64,
        date: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool, StoreError>;

    async fn insert_attendance(&self, new: &NewAttendance) -> Result<Attendance, StoreError>;

    async fn update_attendance(
        &self,
        id: u64,
        changes: &AttendanceChanges,
    ) -> Result<Option<Attendance>, StoreError>;

    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError>;
}

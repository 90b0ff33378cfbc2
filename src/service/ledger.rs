//! Attendance ledger: one record per employee per day.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::model::attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceInput, AttendanceStatus,
    NewAttendance,
};
use crate::store::{AttendanceStore, EMPLOYEE_DATE_KEY, EmployeeStore, StoreError};
use crate::utils::validation::{FieldErrors, REQUIRED};

pub const DUPLICATE_ATTENDANCE: &str = "Attendance already marked for this employee on this date";
pub const DATE_FORMAT_INVALID: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

pub fn unknown_employee(id: u64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DATE_FORMAT_INVALID.to_string())
}

pub fn parse_status(value: &str) -> Result<AttendanceStatus, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("\"{value}\" is not a valid choice."))
}

pub struct AttendanceLedger {
    employees: Arc<dyn EmployeeStore>,
    records: Arc<dyn AttendanceStore>,
}

impl AttendanceLedger {
    pub fn new(employees: Arc<dyn EmployeeStore>, records: Arc<dyn AttendanceStore>) -> Self {
        Self { employees, records }
    }

    pub async fn list(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, ApiError> {
        debug!(filter = ?filter, "Listing attendance");
        Ok(self.records.list_attendance(filter).await?)
    }

    pub async fn get(&self, id: u64) -> Result<Attendance, ApiError> {
        self.records
            .find_attendance(id)
            .await?
            .ok_or(ApiError::NotFound("Attendance"))
    }

    #[instrument(name = "attendance_create", skip(self, input))]
    pub async fn create(&self, input: AttendanceInput) -> Result<Attendance, ApiError> {
        let changes = self.validate(&input, false).await?;
        let (Some(employee_id), Some(date), Some(status)) =
            (changes.employee_id, changes.date, changes.status)
        else {
            return Err(ApiError::BadRequest("Incomplete attendance payload".to_string()));
        };

        if self.records.attendance_marked(employee_id, date, None).await? {
            return Err(ApiError::Rule(DUPLICATE_ATTENDANCE.to_string()));
        }

        let new = NewAttendance {
            employee_id,
            date,
            status,
        };
        let record = self
            .records
            .insert_attendance(&new)
            .await
            .map_err(|e| map_write_error(e, employee_id))?;

        info!(id = record.id, employee_id, %date, %status, "Attendance marked");
        Ok(record)
    }

    /// The pair check only runs when employee or date actually moves, and
    /// never counts the record being updated.
    #[instrument(name = "attendance_update", skip(self, input))]
    pub async fn update(
        &self,
        id: u64,
        input: AttendanceInput,
        partial: bool,
    ) -> Result<Attendance, ApiError> {
        let current = self.get(id).await?;
        let changes = self.validate(&input, partial).await?;

        let employee_id = changes.employee_id.unwrap_or(current.employee);
        let date = changes.date.unwrap_or(current.date);
        let pair_moved = employee_id != current.employee || date != current.date;

        if pair_moved && self.records.attendance_marked(employee_id, date, Some(id)).await? {
            return Err(ApiError::Rule(DUPLICATE_ATTENDANCE.to_string()));
        }

        let record = self
            .records
            .update_attendance(id, &changes)
            .await
            .map_err(|e| map_write_error(e, employee_id))?
            .ok_or(ApiError::NotFound("Attendance"))?;

        info!(id, employee_id, "Attendance updated");
        Ok(record)
    }

    #[instrument(name = "attendance_delete", skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        if !self.records.delete_attendance(id).await? {
            return Err(ApiError::NotFound("Attendance"));
        }
        info!(id, "Attendance deleted");
        Ok(())
    }

    async fn validate(
        &self,
        input: &AttendanceInput,
        partial: bool,
    ) -> Result<AttendanceChanges, ApiError> {
        let mut changes = AttendanceChanges::default();
        let mut errors = FieldErrors::new();

        match input.employee {
            Some(id) => {
                if self.employees.find_employee(id).await?.is_some() {
                    changes.employee_id = Some(id);
                } else {
                    errors.add("employee", unknown_employee(id));
                }
            }
            None if !partial => errors.add("employee", REQUIRED),
            None => {}
        }

        match input.date.as_deref() {
            Some(value) => match parse_date(value) {
                Ok(date) => changes.date = Some(date),
                Err(message) => errors.add("date", message),
            },
            None if !partial => errors.add("date", REQUIRED),
            None => {}
        }

        match input.status.as_deref() {
            Some(value) => match parse_status(value) {
                Ok(status) => changes.status = Some(status),
                Err(message) => errors.add("status", message),
            },
            None if !partial => errors.add("status", REQUIRED),
            None => {}
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

fn map_write_error(e: StoreError, employee_id: u64) -> ApiError {
    if e.violates(EMPLOYEE_DATE_KEY) {
        warn!(employee_id, "Attendance pair taken by a concurrent write");
        return ApiError::Rule(DUPLICATE_ATTENDANCE.to_string());
    }
    if matches!(e, StoreError::ForeignKeyViolation) {
        warn!(employee_id, "Employee removed by a concurrent write");
        return ApiError::Validation(FieldErrors::single("employee", unknown_employee(employee_id)));
    }
    ApiError::Store(e)
}

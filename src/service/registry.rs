//! Employee registry: field validation and uniqueness of `empId` / `email`.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::model::employee::{Employee, EmployeeChanges, EmployeeInput};
use crate::store::{EMAIL_KEY, EMP_ID_KEY, EmployeeStore, StoreError};
use crate::utils::validation::{
    FieldErrors, REQUIRED, is_valid_email, max_length_message, required_text,
};

pub const EMP_ID_MAX: i64 = 2_147_483_647;
pub const EMP_ID_NOT_POSITIVE: &str = "Employee ID must be a positive number.";
pub const EMP_ID_TAKEN: &str = "An employee with this ID already exists.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Invalid email format.";
pub const EMAIL_TAKEN: &str = "An employee with this email already exists.";
pub const FULL_NAME_REQUIRED: &str = "Full name is required.";
pub const DEPARTMENT_REQUIRED: &str = "Department is required.";

const EMAIL_MAX_LEN: usize = 254;
const FULL_NAME_MAX_LEN: usize = 100;
const DEPARTMENT_MAX_LEN: usize = 50;

pub fn check_emp_id(value: i64) -> Result<u32, String> {
    if value <= 0 {
        return Err(EMP_ID_NOT_POSITIVE.to_string());
    }
    if value > EMP_ID_MAX {
        return Err(format!("Ensure this value is less than or equal to {EMP_ID_MAX}."));
    }
    u32::try_from(value).map_err(|e| e.to_string())
}

pub fn check_email(value: &str) -> Result<String, String> {
    let email = value.trim();
    if email.is_empty() {
        return Err(EMAIL_REQUIRED.to_string());
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(max_length_message(EMAIL_MAX_LEN));
    }
    if !is_valid_email(email) {
        return Err(EMAIL_INVALID.to_string());
    }
    Ok(email.to_string())
}

/// Format checks for every supplied field. Missing fields are errors unless
/// `partial` is set.
fn check_fields(input: &EmployeeInput, partial: bool) -> (EmployeeChanges, FieldErrors) {
    let mut changes = EmployeeChanges::default();
    let mut errors = FieldErrors::new();

    match input.emp_id {
        Some(value) => match check_emp_id(value) {
            Ok(emp_id) => changes.emp_id = Some(emp_id),
            Err(message) => errors.add("empId", message),
        },
        None if !partial => errors.add("empId", REQUIRED),
        None => {}
    }

    match input.full_name.as_deref() {
        Some(value) => match required_text(value, FULL_NAME_MAX_LEN, FULL_NAME_REQUIRED) {
            Ok(full_name) => changes.full_name = Some(full_name),
            Err(message) => errors.add("fullName", message),
        },
        None if !partial => errors.add("fullName", REQUIRED),
        None => {}
    }

    match input.email.as_deref() {
        Some(value) => match check_email(value) {
            Ok(email) => changes.email = Some(email),
            Err(message) => errors.add("email", message),
        },
        None if !partial => errors.add("email", REQUIRED),
        None => {}
    }

    match input.department.as_deref() {
        Some(value) => match required_text(value, DEPARTMENT_MAX_LEN, DEPARTMENT_REQUIRED) {
            Ok(department) => changes.department = Some(department),
            Err(message) => errors.add("department", message),
        },
        None if !partial => errors.add("department", REQUIRED),
        None => {}
    }

    (changes, errors)
}

/// Turn a unique-key violation caught by the database into the field error
/// the pre-check would have reported.
fn map_write_error(e: StoreError) -> ApiError {
    if e.violates(EMP_ID_KEY) {
        warn!("empId taken by a concurrent write");
        return ApiError::Validation(FieldErrors::single("empId", EMP_ID_TAKEN));
    }
    if e.violates(EMAIL_KEY) {
        warn!("email taken by a concurrent write");
        return ApiError::Validation(FieldErrors::single("email", EMAIL_TAKEN));
    }
    ApiError::Store(e)
}

pub struct EmployeeRegistry {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeRegistry {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, ApiError> {
        Ok(self.store.list_employees().await?)
    }

    pub async fn get(&self, id: u64) -> Result<Employee, ApiError> {
        self.store
            .find_employee(id)
            .await?
            .ok_or(ApiError::NotFound("Employee"))
    }

    #[instrument(name = "employee_create", skip(self, input))]
    pub async fn create(&self, input: EmployeeInput) -> Result<Employee, ApiError> {
        let new = self
            .validate(&input, false, None)
            .await?
            .into_new()
            .ok_or_else(|| ApiError::BadRequest("Incomplete employee payload".to_string()))?;

        let employee = self
            .store
            .insert_employee(&new)
            .await
            .map_err(map_write_error)?;

        info!(id = employee.id, emp_id = employee.emp_id, "Employee created");
        Ok(employee)
    }

    #[instrument(name = "employee_update", skip(self, input))]
    pub async fn update(
        &self,
        id: u64,
        input: EmployeeInput,
        partial: bool,
    ) -> Result<Employee, ApiError> {
        self.get(id).await?;

        let changes = self.validate(&input, partial, Some(id)).await?;

        let employee = self
            .store
            .update_employee(id, &changes)
            .await
            .map_err(map_write_error)?
            .ok_or(ApiError::NotFound("Employee"))?;

        info!(id, emp_id = employee.emp_id, "Employee updated");
        Ok(employee)
    }

    #[instrument(name = "employee_delete", skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        if !self.store.delete_employee(id).await? {
            return Err(ApiError::NotFound("Employee"));
        }
        info!(id, "Employee deleted together with its attendance");
        Ok(())
    }

    /// Run every check before anything is written. Uniqueness is looked up
    /// only for values that passed their format check, excluding `exclude`.
    async fn validate(
        &self,
        input: &EmployeeInput,
        partial: bool,
        exclude: Option<u64>,
    ) -> Result<EmployeeChanges, ApiError> {
        let (changes, mut errors) = check_fields(input, partial);

        if let Some(emp_id) = changes.emp_id {
            if self.store.emp_id_taken(emp_id, exclude).await? {
                errors.add("empId", EMP_ID_TAKEN);
            }
        }

        if let Some(email) = &changes.email {
            if self.store.email_taken(email, exclude).await? {
                errors.add("email", EMAIL_TAKEN);
            }
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

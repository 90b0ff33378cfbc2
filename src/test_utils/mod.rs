//! Test utilities: an in-memory store and payload fixtures.

pub mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use std::sync::Arc;

use crate::model::attendance::AttendanceInput;
use crate::model::employee::EmployeeInput;
use crate::service::{AttendanceLedger, EmployeeRegistry};

pub fn services(store: Arc<InMemoryStore>) -> (EmployeeRegistry, AttendanceLedger) {
    (
        EmployeeRegistry::new(store.clone()),
        AttendanceLedger::new(store.clone(), store),
    )
}

pub fn employee_input(emp_id: i64, full_name: &str, email: &str, department: &str) -> EmployeeInput {
    EmployeeInput {
        emp_id: Some(emp_id),
        full_name: Some(full_name.to_string()),
        email: Some(email.to_string()),
        department: Some(department.to_string()),
    }
}

pub fn attendance_input(employee: u64, date: &str, status: &str) -> AttendanceInput {
    AttendanceInput {
        employee: Some(employee),
        date: Some(date.to_string()),
        status: Some(status.to_string()),
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

//! In-memory store enforcing the same unique keys, foreign key and cascade
//! as the SQL schema.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::model::attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceStatus, NewAttendance,
};
use crate::model::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::store::{
    AttendanceStore, EMAIL_KEY, EMP_ID_KEY, EMPLOYEE_DATE_KEY, EmployeeStore, StoreError,
};

#[derive(Clone)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    status: AttendanceStatus,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    last_employee_id: u64,
    last_attendance_id: u64,
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<u64, AttendanceRow>,
}

impl State {
    fn check_employee_keys(&self, id: Option<u64>, emp_id: u32, email: &str) -> Result<(), StoreError> {
        let others = self.employees.values().filter(|e| Some(e.id) != id);
        for other in others {
            if other.emp_id == emp_id {
                return Err(StoreError::UniqueViolation(EMP_ID_KEY.to_string()));
            }
            if other.email == email {
                return Err(StoreError::UniqueViolation(EMAIL_KEY.to_string()));
            }
        }
        Ok(())
    }

    fn check_attendance_keys(&self, id: Option<u64>, employee_id: u64, date: NaiveDate) -> Result<(), StoreError> {
        if !self.employees.contains_key(&employee_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        let taken = self
            .attendance
            .values()
            .any(|r| Some(r.id) != id && r.employee_id == employee_id && r.date == date);
        if taken {
            return Err(StoreError::UniqueViolation(EMPLOYEE_DATE_KEY.to_string()));
        }
        Ok(())
    }

    fn joined(&self, row: &AttendanceRow) -> Result<Attendance, StoreError> {
        let employee = self
            .employees
            .get(&row.employee_id)
            .cloned()
            .ok_or_else(|| StoreError::CorruptRow(format!("attendance {} is orphaned", row.id)))?;

        Ok(Attendance {
            id: row.id,
            employee: row.employee_id,
            employee_detail: employee,
            date: row.date,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

fn matches(filter: &AttendanceFilter, record: &Attendance) -> bool {
    filter.employee.is_none_or(|id| record.employee == id)
        && filter.date.is_none_or(|date| record.date == date)
        && filter.status.is_none_or(|status| record.status == status)
        && filter.date_from.is_none_or(|from| record.date >= from)
        && filter.date_to.is_none_or(|to| record.date <= to)
        && filter.department.as_deref().is_none_or(|needle| {
            record
                .employee_detail
                .department
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    /// Make every uniqueness pre-check answer "free", so only the write-time
    /// key checks stand between two conflicting records.
    blind_prechecks: bool,
}

impl InMemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shared_with_blind_prechecks() -> Arc<Self> {
        Arc::new(Self {
            blind_prechecks: true,
            ..Self::default()
        })
    }

    pub fn employee_count(&self) -> usize {
        self.state.read().unwrap().employees.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.state.read().unwrap().attendance.len()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let state = self.state.read().unwrap();
        let mut employees: Vec<Employee> = state.employees.values().cloned().collect();
        employees.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(employees)
    }

    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.state.read().unwrap().employees.get(&id).cloned())
    }

    async fn emp_id_taken(&self, emp_id: u32, exclude: Option<u64>) -> Result<bool, StoreError> {
        if self.blind_prechecks {
            return Ok(false);
        }
        let state = self.state.read().unwrap();
        Ok(state
            .employees
            .values()
            .any(|e| e.emp_id == emp_id && Some(e.id) != exclude))
    }

    async fn email_taken(&self, email: &str, exclude: Option<u64>) -> Result<bool, StoreError> {
        if self.blind_prechecks {
            return Ok(false);
        }
        let state = self.state.read().unwrap();
        Ok(state
            .employees
            .values()
            .any(|e| e.email == email && Some(e.id) != exclude))
    }

    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let mut state = self.state.write().unwrap();
        state.check_employee_keys(None, new.emp_id, &new.email)?;

        state.last_employee_id += 1;
        let employee = Employee {
            id: state.last_employee_id,
            emp_id: new.emp_id,
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            department: new.department.clone(),
            created_at: Utc::now(),
        };
        state.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: &EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        let mut state = self.state.write().unwrap();
        let Some(mut employee) = state.employees.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(emp_id) = changes.emp_id {
            employee.emp_id = emp_id;
        }
        if let Some(full_name) = &changes.full_name {
            employee.full_name = full_name.clone();
        }
        if let Some(email) = &changes.email {
            employee.email = email.clone();
        }
        if let Some(department) = &changes.department {
            employee.department = department.clone();
        }

        state.check_employee_keys(Some(id), employee.emp_id, &employee.email)?;
        state.employees.insert(id, employee.clone());
        Ok(Some(employee))
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError> {
        let mut state = self.state.write().unwrap();
        if state.employees.remove(&id).is_none() {
            return Ok(false);
        }
        state.attendance.retain(|_, row| row.employee_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, StoreError> {
        let state = self.state.read().unwrap();
        let mut records = Vec::new();
        for row in state.attendance.values() {
            let record = state.joined(row)?;
            if matches(filter, &record) {
                records.push(record);
            }
        }
        records.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        Ok(records)
    }

    async fn find_attendance(&self, id: u64) -> Result<Option<Attendance>, StoreError> {
        let state = self.state.read().unwrap();
        state.attendance.get(&id).map(|row| state.joined(row)).transpose()
    }

    async fn attendance_marked(
        &self,
        employee_id: u64,
        date: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool, StoreError> {
        if self.blind_prechecks {
            return Ok(false);
        }
        let state = self.state.read().unwrap();
        Ok(state
            .attendance
            .values()
            .any(|r| r.employee_id == employee_id && r.date == date && Some(r.id) != exclude))
    }

    async fn insert_attendance(&self, new: &NewAttendance) -> Result<Attendance, StoreError> {
        let mut state = self.state.write().unwrap();
        state.check_attendance_keys(None, new.employee_id, new.date)?;

        state.last_attendance_id += 1;
        let row = AttendanceRow {
            id: state.last_attendance_id,
            employee_id: new.employee_id,
            date: new.date,
            status: new.status,
            created_at: Utc::now(),
        };
        state.attendance.insert(row.id, row.clone());
        state.joined(&row)
    }

    async fn update_attendance(
        &self,
        id: u64,
        changes: &AttendanceChanges,
    ) -> Result<Option<Attendance>, StoreError> {
        let mut state = self.state.write().unwrap();
        let Some(mut row) = state.attendance.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(employee_id) = changes.employee_id {
            row.employee_id = employee_id;
        }
        if let Some(date) = changes.date {
            row.date = date;
        }
        if let Some(status) = changes.status {
            row.status = status;
        }

        state.check_attendance_keys(Some(id), row.employee_id, row.date)?;
        state.attendance.insert(id, row.clone());
        state.joined(&row).map(Some)
    }

    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.state.write().unwrap().attendance.remove(&id).is_some())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use crate::model::attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceStatus, NewAttendance,
};
use crate::model::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::store::{AttendanceStore, EmployeeStore, StoreError};
use crate::utils::db_utils::{
    SqlValue, bind_value, bind_value_as, build_attendance_where, build_update_sql,
};

const EMPLOYEE_COLUMNS: &str = "id, emp_id, full_name, email, department, created_at";

const ATTENDANCE_SELECT: &str = r#"
    SELECT
        a.id,
        a.employee_id,
        a.date,
        a.status,
        a.created_at,
        e.emp_id AS employee_emp_id,
        e.full_name AS employee_full_name,
        e.email AS employee_email,
        e.department AS employee_department,
        e.created_at AS employee_created_at
    FROM attendance a
    INNER JOIN employees e ON e.id = a.employee_id
"#;

/// Attendance joined with its employee, as read from the database
#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    employee_emp_id: u32,
    employee_full_name: String,
    employee_email: String,
    employee_department: String,
    employee_created_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AttendanceStatus>().map_err(|_| {
            StoreError::CorruptRow(format!("attendance {} has status {:?}", row.id, row.status))
        })?;

        Ok(Attendance {
            id: row.id,
            employee: row.employee_id,
            employee_detail: Employee {
                id: row.employee_id,
                emp_id: row.employee_emp_id,
                full_name: row.employee_full_name,
                email: row.employee_email,
                department: row.employee_department,
                created_at: row.employee_created_at,
            },
            date: row.date,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let sql = format!(
            "SELECT {} FROM employees ORDER BY created_at DESC, id DESC",
            EMPLOYEE_COLUMNS
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn emp_id_taken(&self, emp_id: u32, exclude: Option<u64>) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE emp_id = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(emp_id)
        .bind(exclude)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn email_taken(&self, email: &str, exclude: Option<u64>) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE email = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(email)
        .bind(exclude)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (emp_id, full_name, email, department)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.emp_id)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.department)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        self.find_employee(id).await?.ok_or_else(|| {
            StoreError::CorruptRow(format!("employee {} vanished after insert", id))
        })
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: &EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        let mut columns = Vec::new();
        if let Some(emp_id) = changes.emp_id {
            columns.push(("emp_id", SqlValue::U32(emp_id)));
        }
        if let Some(full_name) = &changes.full_name {
            columns.push(("full_name", SqlValue::String(full_name.clone())));
        }
        if let Some(email) = &changes.email {
            columns.push(("email", SqlValue::String(email.clone())));
        }
        if let Some(department) = &changes.department {
            columns.push(("department", SqlValue::String(department.clone())));
        }

        if let Some(update) = build_update_sql("employees", columns, "id", id) {
            debug!(sql = %update.sql, id, "Updating employee");
            let mut query = sqlx::query(&update.sql);
            for value in update.values {
                query = bind_value(query, value);
            }
            query.execute(&self.pool).await?;
        }

        // MySQL reports changed rows, not matched rows, so re-read instead.
        self.find_employee(id).await
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError> {
        // attendance rows go with it through fk_attendance_employee
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, StoreError> {
        let filter_sql = build_attendance_where(filter);

        let sql = format!(
            "{} {} ORDER BY a.date DESC, a.id DESC",
            ATTENDANCE_SELECT, filter_sql.clause
        );
        debug!(sql = %sql, bindings = ?filter_sql.values, "Fetching attendance");

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql);
        for value in filter_sql.values {
            query = bind_value_as(query, value);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Attendance::try_from)
            .collect()
    }

    async fn find_attendance(&self, id: u64) -> Result<Option<Attendance>, StoreError> {
        let sql = format!("{} WHERE a.id = ?", ATTENDANCE_SELECT);
        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Attendance::try_from)
            .transpose()
    }

    async fn attendance_marked(
        &self,
        employee_id: u64,
        date: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendance
            WHERE employee_id = ? AND date = ? AND (? IS NULL OR id <> ?)
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(exclude)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn insert_attendance(&self, new: &NewAttendance) -> Result<Attendance, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(new.status.as_ref())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        self.find_attendance(id).await?.ok_or_else(|| {
            StoreError::CorruptRow(format!("attendance {} vanished after insert", id))
        })
    }

    async fn update_attendance(
        &self,
        id: u64,
        changes: &AttendanceChanges,
    ) -> Result<Option<Attendance>, StoreError> {
        let mut columns = Vec::new();
        if let Some(employee_id) = changes.employee_id {
            columns.push(("employee_id", SqlValue::U64(employee_id)));
        }
        if let Some(date) = changes.date {
            columns.push(("date", SqlValue::Date(date)));
        }
        if let Some(status) = changes.status {
            columns.push(("status", SqlValue::String(status.to_string())));
        }

        if let Some(update) = build_update_sql("attendance", columns, "id", id) {
            debug!(sql = %update.sql, id, "Updating attendance");
            let mut query = sqlx::query(&update.sql);
            for value in update.values {
                query = bind_value(query, value);
            }
            query.execute(&self.pool).await?;
        }

        self.find_attendance(id).await
    }

    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

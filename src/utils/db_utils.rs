use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::{Query, QueryAs};

use crate::model::attendance::AttendanceFilter;
use crate::store::StoreError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    U32(u32),
    Date(NaiveDate),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// Column names come from the caller's own constants, never from user input.
/// Returns `None` when there is nothing to set.
pub fn build_update_sql(
    table: &str,
    columns: Vec<(&str, SqlValue)>,
    id_column: &str,
    id_value: u64,
) -> Option<SqlUpdate> {
    if columns.is_empty() {
        return None;
    }

    let set_clause = columns
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values: Vec<SqlValue> = columns.into_iter().map(|(_, value)| value).collect();
    values.push(SqlValue::U64(id_value));

    Some(SqlUpdate { sql, values })
}

/// ===============================
/// WHERE clause container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlWhere {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build attendance list WHERE clause
/// ===============================
/// Columns refer to the `a` (attendance) and `e` (employees) aliases of the
/// list query. Every supplied filter is ANDed; an empty filter gives an
/// empty clause.
pub fn build_attendance_where(filter: &AttendanceFilter) -> SqlWhere {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(employee) = filter.employee {
        conditions.push("a.employee_id = ?");
        values.push(SqlValue::U64(employee));
    }

    if let Some(date) = filter.date {
        conditions.push("a.date = ?");
        values.push(SqlValue::Date(date));
    }

    if let Some(status) = filter.status {
        conditions.push("a.status = ?");
        values.push(SqlValue::String(status.to_string()));
    }

    if let Some(department) = &filter.department {
        conditions.push("LOWER(e.department) LIKE ?");
        values.push(SqlValue::String(format!(
            "%{}%",
            escape_like(&department.to_lowercase())
        )));
    }

    if let Some(date_from) = filter.date_from {
        conditions.push("a.date >= ?");
        values.push(SqlValue::Date(date_from));
    }

    if let Some(date_to) = filter.date_to {
        conditions.push("a.date <= ?");
        values.push(SqlValue::Date(date_to));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    SqlWhere { clause, values }
}

pub fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::String(v) => query.bind(v),
        SqlValue::U64(v) => query.bind(v),
        SqlValue::U32(v) => query.bind(v),
        SqlValue::Date(v) => query.bind(v),
    }
}

pub fn bind_value_as<'q, O>(
    query: QueryAs<'q, MySql, O, MySqlArguments>,
    value: SqlValue,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    match value {
        SqlValue::String(v) => query.bind(v),
        SqlValue::U64(v) => query.bind(v),
        SqlValue::U32(v) => query.bind(v),
        SqlValue::Date(v) => query.bind(v),
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside LIKE.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// MySQL reports duplicates as `Duplicate entry 'x' for key 'table.key_name'`
/// (older servers omit the `table.` part).
pub fn duplicate_key_name(message: &str) -> Option<&str> {
    let rest = message.split("for key '").nth(1)?;
    let key = rest.split('\'').next()?;
    Some(key.rsplit('.').next().unwrap_or(key))
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let key = duplicate_key_name(db_err.message()).unwrap_or(db_err.message());
                return StoreError::UniqueViolation(key.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation;
            }
        }
        StoreError::Database(e)
    }
}

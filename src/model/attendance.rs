use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::Employee;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee": 1,
    "employee_detail": {
        "id": 1,
        "empId": 7,
        "fullName": "Jane Doe",
        "email": "jane@x.com",
        "department": "Engineering",
        "createdAt": "2024-03-01T09:00:00Z"
    },
    "date": "2024-03-01",
    "status": "PRESENT",
    "created_at": "2024-03-01T09:05:00Z"
}))]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    /// Storage id of the employee this record belongs to
    #[schema(example = 1)]
    pub employee: u64,

    /// Read-only copy of the linked employee
    pub employee_detail: Employee,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "2024-03-01T09:05:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Raw create/update payload; `date` and `status` stay textual so bad values
/// are reported per field.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AttendanceInput {
    #[schema(example = 1)]
    pub employee: Option<u64>,
    #[schema(example = "2024-03-01", format = "date")]
    pub date: Option<String>,
    #[schema(example = "PRESENT")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceChanges {
    pub employee_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

/// List filters. Every filter is optional; empty query values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Exact employee storage id
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<u64>, example = 1)]
    pub employee: Option<u64>,

    /// Exact date (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2024-03-01")]
    pub date: Option<NaiveDate>,

    /// PRESENT or ABSENT
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "PRESENT")]
    pub status: Option<AttendanceStatus>,

    /// Case-insensitive substring of the employee's department
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "eng")]
    pub department: Option<String>,

    /// Inclusive lower bound on date
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2024-01-01")]
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound on date
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2024-01-31")]
    pub date_to: Option<NaiveDate>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    fn parse(query: &str) -> Result<AttendanceFilter, actix_web::error::QueryPayloadError> {
        Query::<AttendanceFilter>::from_query(query).map(Query::into_inner)
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        assert_eq!(AttendanceStatus::Present.as_ref(), "PRESENT");
        assert_eq!("ABSENT".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Absent);
        assert!("present".parse::<AttendanceStatus>().is_err());
        assert_eq!(serde_json::to_value(AttendanceStatus::Absent).unwrap(), "ABSENT");
    }

    #[test]
    fn filter_parses_query_string() {
        let filter = parse(
            "employee=3&status=ABSENT&date_from=2024-01-01&date_to=2024-01-31&department=eng",
        )
        .unwrap();

        assert_eq!(filter.employee, Some(3));
        assert_eq!(filter.status, Some(AttendanceStatus::Absent));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filter.department.as_deref(), Some("eng"));
        assert_eq!(filter.date, None);
    }

    #[test]
    fn empty_query_values_are_not_applied() {
        let filter = parse("employee=&date=&status=&department=").unwrap();
        assert_eq!(filter, AttendanceFilter::default());
    }

    #[test]
    fn malformed_query_values_are_rejected() {
        assert!(parse("date=01/03/2024").is_err());
        assert!(parse("status=LATE").is_err());
        assert!(parse("employee=abc").is_err());
    }
}

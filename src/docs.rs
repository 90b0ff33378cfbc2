use crate::model::attendance::{Attendance, AttendanceInput, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeInput};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "0.1.0",
        description = r#"
## Employee Registry & Attendance Ledger

Records employees and one attendance mark per employee per calendar day.

### Employees
- `empId` and `email` are unique across the registry
- Deleting an employee deletes its attendance

### Attendance
- `status` is `PRESENT` or `ABSENT`
- Marking the same employee twice on one day is rejected
- The list can be filtered by employee, date, date range, status and department

### Errors
- Field problems: `{"message": "Validation failed", "errors": {"field": ["..."]}}`
- Everything else: `{"message": "..."}`
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::partial_update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::partial_update_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            Employee,
            EmployeeInput,
            Attendance,
            AttendanceInput,
            AttendanceStatus
        )
    ),
    tags(
        (name = "Employee", description = "Employee registry APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
    )
)]
pub struct ApiDoc;

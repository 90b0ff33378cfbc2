pub mod ledger;
pub mod registry;

pub use ledger::AttendanceLedger;
pub use registry::EmployeeRegistry;

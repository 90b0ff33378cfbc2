use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::model::employee::EmployeeInput;
use crate::service::EmployeeRegistry;

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    registry: web::Data<EmployeeRegistry>,
) -> actix_web::Result<impl Responder> {
    let employees = registry.list().await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee storage ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee = registry.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Field validation failed", body = Object, example = json!({
            "message": "Validation failed",
            "errors": { "empId": ["An employee with this ID already exists."] }
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    registry: web::Data<EmployeeRegistry>,
    payload: web::Json<EmployeeInput>,
) -> actix_web::Result<impl Responder> {
    let employee = registry.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// Replace Employee (every field required)
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee storage ID")
    ),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Field validation failed"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<u64>,
    payload: web::Json<EmployeeInput>,
) -> actix_web::Result<impl Responder> {
    let employee = registry
        .update(path.into_inner(), payload.into_inner(), false)
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Partially update Employee
#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee storage ID")
    ),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Field validation failed"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn partial_update_employee(
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<u64>,
    payload: web::Json<EmployeeInput>,
) -> actix_web::Result<impl Responder> {
    let employee = registry
        .update(path.into_inner(), payload.into_inner(), true)
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee and its attendance
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee storage ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    registry.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

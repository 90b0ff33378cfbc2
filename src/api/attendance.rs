use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::model::attendance::{AttendanceFilter, AttendanceInput};
use crate::service::AttendanceLedger;

/// List attendance, latest date first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Matching attendance records", body = [Attendance]),
        (status = 400, description = "Malformed filter value")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let records = ledger.list(&query).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Get attendance record by ID
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance ID")
    ),
    responses(
        (status = 200, description = "Attendance found", body = Attendance),
        (status = 404, description = "Attendance not found", body = Object, example = json!({
            "message": "Attendance not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = ledger.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceInput,
    responses(
        (status = 201, description = "Attendance marked", body = Attendance),
        (status = 400, description = "Already marked for this day, or invalid fields", body = Object, example = json!({
            "message": "Attendance already marked for this employee on this date"
        }))
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<AttendanceInput>,
) -> actix_web::Result<impl Responder> {
    let record = ledger.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Replace attendance record (every field required)
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance ID")
    ),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 400, description = "Invalid fields or day already marked"),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceInput>,
) -> actix_web::Result<impl Responder> {
    let record = ledger
        .update(path.into_inner(), payload.into_inner(), false)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Partially update attendance record
#[utoipa::path(
    patch,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance ID")
    ),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 400, description = "Invalid fields or day already marked"),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn partial_update_attendance(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceInput>,
) -> actix_web::Result<impl Responder> {
    let record = ledger
        .update(path.into_inner(), payload.into_inner(), true)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    ledger.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

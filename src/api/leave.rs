use crate::api::domain_error_response;
use crate::auth::auth::AuthUser;
use crate::domain::leave::{self, LeaveBalance, LeaveType};
use crate::model::leave_request::LeaveRequest;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Acara keluarga di luar kota")]
    pub reason: String,
}

/* =========================
Create leave request
========================= */
/// Submits a leave request after running it through the balance ledger.
/// Annual leave deducts its inclusive day count from the profile balance in
/// the same transaction as the insert; other types leave the balance alone.
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending",
            "remaining_days": 7
         })
        ),
        (status = 400, description = "Reversed date range, empty reason, or insufficient balance"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No profile found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    // 1️⃣ all fields are mandatory on the form
    if payload.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Reason must not be empty"
        })));
    }

    // 2️⃣ current balance snapshot
    let remaining_days = sqlx::query_scalar::<_, i64>(
        "SELECT annual_leave_balance FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Profile lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .ok_or_else(|| actix_web::error::ErrorForbidden("No profile found"))?;

    // 3️⃣ ledger check before anything is written
    let balance = LeaveBalance { remaining_days };
    let new_balance = match leave::request_deduction(
        balance,
        payload.leave_type,
        payload.start_date,
        payload.end_date,
    ) {
        Ok(b) => b,
        Err(e) => {
            tracing::info!(user_id, error = %e, "Leave request rejected");
            return Ok(domain_error_response(e));
        }
    };

    // 4️⃣ insert request + apply deduction atomically
    let result = async {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leave_requests
                (user_id, leave_type, start_date, end_date, reason, status)
            VALUES (?, ?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(user_id)
        .bind(payload.leave_type.as_str())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.reason.trim())
        .execute(&mut *tx)
        .await?;

        if payload.leave_type.consumes_balance() {
            sqlx::query("UPDATE profiles SET annual_leave_balance = ? WHERE user_id = ?")
                .bind(new_balance.remaining_days)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, user_id, "Failed to create leave request");
        return Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        ));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending",
        "remaining_days": new_balance.remaining_days
    })))
}

/* =========================
List own leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    responses(
        (status = 200, description = "Caller's leave requests, newest first", body = Object, example = json!({
            "data": []
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    let leaves = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, user_id, leave_type, start_date, end_date, reason, status, created_at
        FROM leave_requests
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch leave list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": leaves
    })))
}

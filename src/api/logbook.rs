use crate::api::domain_error_response;
use crate::auth::auth::AuthUser;
use crate::model::logbook::Logbook;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLogbook {
    /// Defaults to today; past or future dates are rejected.
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub log_date: Option<NaiveDate>,
    #[schema(example = "08:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    /// One entry per task worked on; at least one is required.
    #[schema(example = json!(["Verifikasi Surat Perintah Membayar (SPM)"]))]
    pub tasks: Vec<String>,
    #[schema(example = "Rekonsiliasi berjalan lancar")]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LogbookQuery {
    /// Defaults to today
    pub log_date: Option<NaiveDate>,
}

/// Submit the daily logbook
#[utoipa::path(
    post,
    path = "/api/v1/logbook",
    request_body = CreateLogbook,
    responses(
        (status = 200, description = "Logbook submitted", body = Object, example = json!({
            "message": "Logbook submitted",
            "entries": 3
        })),
        (status = 400, description = "No tasks, bad time window, wrong date, or not checked in yet"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No profile found"),
        (status = 409, description = "Logbook already filled for this date"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn create_logbook(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLogbook>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let today = Local::now().date_naive();

    // 1️⃣ validate the submission itself
    let tasks: Vec<&str> = payload
        .tasks
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    if tasks.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "At least one task entry is required"
        })));
    }

    let log_date = payload.log_date.unwrap_or(today);
    if log_date != today {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Logbook entries can only be submitted for today"
        })));
    }

    if payload.end_time < payload.start_time {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "end_time cannot be before start_time"
        })));
    }

    // 2️⃣ the submission must land in a checked-in, not-yet-logged day
    let snapshot = crate::api::attendance::fetch_snapshot(pool.get_ref(), user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Logbook snapshot fetch failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if let Err(e) = snapshot.fill_logbook() {
        tracing::info!(user_id, error = %e, "Logbook submission rejected");
        return Ok(domain_error_response(e));
    }

    // 3️⃣ job title snapshot for the rows
    let position = sqlx::query_scalar::<_, String>(
        "SELECT position FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Profile lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .ok_or_else(|| actix_web::error::ErrorForbidden("No profile found"))?;

    // 4️⃣ one row per task, all or nothing
    let notes = payload.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let result = async {
        let mut tx = pool.begin().await?;

        for task in &tasks {
            sqlx::query(
                r#"
                INSERT INTO logbooks
                    (user_id, log_date, start_time, end_time, position_at_time, task, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(log_date)
            .bind(payload.start_time)
            .bind(payload.end_time)
            .bind(&position)
            .bind(task)
            .bind(notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, user_id, "Logbook insert failed");
        return Err(actix_web::error::ErrorInternalServerError(
            "Internal Server Error",
        ));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logbook submitted",
        "entries": tasks.len()
    })))
}

/// List one day's logbook entries
#[utoipa::path(
    get,
    path = "/api/v1/logbook",
    params(LogbookQuery),
    responses(
        (status = 200, description = "The day's entries", body = Object, example = json!({
            "data": []
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn list_logbook(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LogbookQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let log_date = query.log_date.unwrap_or_else(|| Local::now().date_naive());

    let entries = sqlx::query_as::<_, Logbook>(
        r#"
        SELECT id, user_id, log_date, start_time, end_time, position_at_time, task, notes
        FROM logbooks
        WHERE user_id = ? AND log_date = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .bind(log_date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch logbook entries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "log_date": log_date,
        "data": entries
    })))
}

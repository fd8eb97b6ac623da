use crate::auth::auth::AuthUser;
use crate::model::profile::Profile;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::Value;
use sqlx::MySqlPool;
use utoipa::ToSchema;

/// Columns the profile endpoint may touch. The leave balance is only ever
/// changed by the leave ledger.
const UPDATABLE_COLUMNS: &[&str] = &["full_name", "position"];

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "budi.santoso@kppn.go.id")]
    pub email: String,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[schema(example = "Staf Pelaksana")]
    pub position: String,
    #[schema(example = 12)]
    pub annual_leave_balance: i64,
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, full_name, position, annual_leave_balance
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(ProfileResponse {
            email: auth.email,
            full_name: p.full_name,
            position: p.position,
            annual_leave_balance: p.annual_leave_balance,
        })),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Profile not found"
        }))),
    }
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body(
        content = Object,
        description = "Partial update; accepts full_name and position",
        content_type = "application/json",
        example = json!({ "full_name": "Budi Santoso", "position": "Kepala Seksi" })
    ),
    responses(
        (status = 200, description = "Profile updated", body = Object, example = json!({
            "message": "Profile updated"
        })),
        (status = 400, description = "Empty payload or non-updatable field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let update = build_update_sql(
        "profiles",
        &payload,
        UPDATABLE_COLUMNS,
        "user_id",
        auth.user_id,
    )?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Profile update failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Profile not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile updated"
    })))
}

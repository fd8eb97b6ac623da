use crate::api::domain_error_response;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::DomainError;
use crate::domain::geo::Coordinate;
use crate::domain::geofence::{GeofenceValidator, GeofenceVerdict, Zone};
use crate::domain::state::{AttendanceMark, AttendanceSnapshot, AttendanceState};
use crate::model::attendance::Attendance;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

pub const STATUS_PRESENT: &str = "present";
pub const STATUS_LATE: &str = "late";

/// The two validators the attendance endpoints gate on. Check-in uses the
/// tight office radius only; check-out uses the wide radius plus the
/// place-name allow-list. Built once at startup so bad zone configuration
/// aborts the process instead of failing requests.
#[derive(Clone)]
pub struct Geofences {
    pub check_in: GeofenceValidator,
    pub check_out: GeofenceValidator,
}

impl Geofences {
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let office = Coordinate::new(config.office_latitude, config.office_longitude)?;

        let check_in =
            GeofenceValidator::new(vec![Zone::new("kantor", office, config.checkin_radius_m)?])?;

        let check_out =
            GeofenceValidator::new(vec![Zone::new("kantor", office, config.checkout_radius_m)?])?
                .with_allowed_places(config.allowed_place_names.iter().cloned());

        Ok(Self {
            check_in,
            check_out,
        })
    }
}

/// Geolocation failure reported by the device, forwarded as-is by the client.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SensorError {
    PermissionDenied,
    Unavailable,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 5.178827)]
    pub latitude: Option<f64>,
    #[schema(example = 97.149306)]
    pub longitude: Option<f64>,
    /// Reported GPS accuracy in meters; logged, not used for gating.
    pub accuracy_m: Option<f64>,
    /// Present when the device could not produce a fix.
    pub sensor_error: Option<SensorError>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = 5.178827)]
    pub latitude: Option<f64>,
    #[schema(example = 97.149306)]
    pub longitude: Option<f64>,
    /// Reverse-geocoded address of the reading, when the client resolved one.
    #[schema(example = "Jalan Merdeka, Banda Sakti, Kota Lhokseumawe, Aceh")]
    pub address: Option<String>,
    pub sensor_error: Option<SensorError>,
}

#[derive(Serialize)]
pub struct TodayResponse {
    pub state: AttendanceState,
    #[serde(flatten)]
    pub snapshot: AttendanceSnapshot,
}

fn reading_from(
    latitude: Option<f64>,
    longitude: Option<f64>,
    sensor_error: Option<SensorError>,
) -> Result<Coordinate, DomainError> {
    if let Some(e) = sensor_error {
        return Err(match e {
            SensorError::PermissionDenied => DomainError::PermissionDenied,
            SensorError::Unavailable => DomainError::SensorUnavailable,
        });
    }

    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => Err(DomainError::SensorUnavailable),
    }
}

/// Loads today's persisted facts for the state machine.
pub(crate) async fn fetch_snapshot(
    pool: &MySqlPool,
    user_id: u64,
    date: NaiveDate,
) -> Result<AttendanceSnapshot, sqlx::Error> {
    let row = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, user_id, date, status,
               check_in_time, check_in_latitude, check_in_longitude,
               check_out_time, check_out_latitude, check_out_longitude,
               check_out_address
        FROM attendance
        WHERE user_id = ? AND date = ?
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    let logbook_filled = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM logbooks WHERE user_id = ? AND log_date = ? LIMIT 1)",
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool)
    .await?
        > 0;

    match row {
        Some(r) => r.snapshot(logbook_filled).map_err(|e| {
            tracing::error!(error = %e, user_id, "Stored attendance row failed validation");
            sqlx::Error::RowNotFound
        }),
        None => Ok(AttendanceSnapshot::empty(date)),
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "present",
            "distance_m": 12.4
        })),
        (status = 400, description = "Outside the office geofence, sensor failure, or already checked in"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    geofences: web::Data<Geofences>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    let reading = match reading_from(payload.latitude, payload.longitude, payload.sensor_error) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(user_id, error = %e, accuracy_m = ?payload.accuracy_m, "Check-in without a usable fix");
            return Ok(domain_error_response(e));
        }
    };

    let verdict = geofences.check_in.evaluate(reading);

    let now = Local::now();
    let today = now.date_naive();
    let mark = AttendanceMark {
        time: now.time(),
        coordinate: reading,
    };

    let snapshot = fetch_snapshot(pool.get_ref(), user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Check-in snapshot fetch failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if let Err(e) = snapshot.check_in(&verdict, mark) {
        tracing::info!(user_id, error = %e, distance_m = verdict.distance_m, "Check-in rejected");
        return Ok(domain_error_response(e));
    }

    let status = if mark.time <= config.workday_start {
        STATUS_PRESENT
    } else {
        STATUS_LATE
    };

    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (user_id, date, status, check_in_time, check_in_latitude, check_in_longitude)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(today)
    .bind(status)
    .bind(mark.time)
    .bind(reading.latitude())
    .bind(reading.longitude())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully",
            "status": status,
            "distance_m": verdict.distance_m
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, user_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "rule": "within_radius"
        })),
        (status = 400, description = "Logbook missing, outside the permitted area, or no active check-in"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    geofences: web::Data<Geofences>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    let reading = match reading_from(payload.latitude, payload.longitude, payload.sensor_error) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Check-out without a usable fix");
            return Ok(domain_error_response(e));
        }
    };

    let address = payload.address.as_deref().map(str::trim).filter(|a| !a.is_empty());

    let verdict: GeofenceVerdict = match address {
        Some(addr) => geofences.check_out.evaluate_with_address(reading, addr),
        None => geofences.check_out.evaluate(reading),
    };

    let now = Local::now();
    let today = now.date_naive();
    let mark = AttendanceMark {
        time: now.time(),
        coordinate: reading,
    };

    let snapshot = fetch_snapshot(pool.get_ref(), user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Check-out snapshot fetch failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if let Err(e) = snapshot.check_out(&verdict, mark) {
        tracing::info!(user_id, error = %e, distance_m = verdict.distance_m, "Check-out rejected");
        return Ok(domain_error_response(e));
    }

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?,
            check_out_latitude = ?,
            check_out_longitude = ?,
            check_out_address = ?
        WHERE user_id = ?
        AND date = ?
        AND check_out_time IS NULL
        "#,
    )
    .bind(mark.time)
    .bind(reading.latitude())
    .bind(reading.longitude())
    .bind(address)
    .bind(user_id)
    .bind(today)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "rule": verdict.rule
    })))
}

/// Today's attendance snapshot and derived state. This is the authoritative
/// view the dashboard gates its buttons on; clients must not cache it.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "Today's snapshot and derived state", body = Object, example = json!({
            "state": "checked_in",
            "date": "2024-01-15",
            "check_in": { "time": "07:55:00", "coordinate": { "latitude": 5.178827, "longitude": 97.149306 } },
            "logbook_filled": false,
            "check_out": null
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let today = Local::now().date_naive();

    let snapshot = fetch_snapshot(pool.get_ref(), user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Snapshot fetch failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(TodayResponse {
        state: snapshot.state(),
        snapshot,
    }))
}

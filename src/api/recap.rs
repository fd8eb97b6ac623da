use crate::api::attendance::{STATUS_LATE, STATUS_PRESENT};
use crate::auth::auth::AuthUser;
use crate::model::attendance::Attendance;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RecapQuery {
    /// Start of the period filter (inclusive)
    pub start_date: Option<NaiveDate>,
    /// End of the period filter (inclusive)
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecapSummary {
    #[schema(example = 18)]
    pub present: u32,
    #[schema(example = 2)]
    pub late: u32,
    #[schema(example = 1)]
    pub absent: u32,
    #[schema(example = 21)]
    pub total_days: u32,
}

/// Counts day statuses the way the recap card shows them: anything that is
/// neither present nor late lands in the absent bucket.
fn tally<'a>(statuses: impl IntoIterator<Item = &'a str>) -> RecapSummary {
    let mut summary = RecapSummary {
        present: 0,
        late: 0,
        absent: 0,
        total_days: 0,
    };

    for status in statuses {
        match status {
            s if s == STATUS_PRESENT => summary.present += 1,
            s if s == STATUS_LATE => summary.late += 1,
            _ => summary.absent += 1,
        }
        summary.total_days += 1;
    }

    summary
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/// Attendance recap over a period
#[utoipa::path(
    get,
    path = "/api/v1/attendance/recap",
    params(RecapQuery),
    responses(
        (status = 200, description = "Attendance rows in the period plus status tallies", body = Object, example = json!({
            "data": [],
            "summary": { "present": 18, "late": 2, "absent": 1, "total_days": 21 }
        })),
        (status = 400, description = "Reversed period filter"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn recap(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecapQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if end < start {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "end_date must not be before start_date"
            })));
        }
    }

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE user_id = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::U64(user_id)];

    if let Some(start) = query.start_date {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(start));
    }

    if let Some(end) = query.end_date {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(end));
    }

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, user_id, date, status,
               check_in_time, check_in_latitude, check_in_longitude,
               check_out_time, check_out_latitude, check_out_longitude,
               check_out_address
        FROM attendance
        {}
        ORDER BY date DESC
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Attendance>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let rows = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch attendance recap");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let summary = tally(rows.iter().map(|r| r.status.as_str()));

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": rows,
        "summary": summary
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_bucket() {
        let summary = tally(["present", "late", "present", "sick", "present"]);
        assert_eq!(
            summary,
            RecapSummary {
                present: 3,
                late: 1,
                absent: 1,
                total_days: 5
            }
        );
    }

    #[test]
    fn tally_of_nothing_is_all_zero() {
        let summary = tally(Vec::<&str>::new());
        assert_eq!(
            summary,
            RecapSummary {
                present: 0,
                late: 0,
                absent: 0,
                total_days: 0
            }
        );
    }

    #[test]
    fn unknown_statuses_count_as_absent() {
        let summary = tally(["", "alfa", "late"]);
        assert_eq!(summary.absent, 2);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.total_days, 3);
    }
}

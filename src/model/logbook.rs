use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per task entry; a single submission inserts several rows sharing
/// the same date and time window.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Logbook {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub log_date: NaiveDate,
    #[schema(example = "08:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    /// Job title snapshot taken from the profile at submission time.
    #[schema(example = "Staf Pelaksana")]
    pub position_at_time: String,
    #[schema(example = "Verifikasi Surat Perintah Membayar (SPM)")]
    pub task: String,
    pub notes: Option<String>,
}

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::domain::geo::Coordinate;
use crate::domain::state::{AttendanceMark, AttendanceSnapshot};

/// One attendance row per user per calendar date.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// "present" or "late", decided at check-in time.
    #[schema(example = "present")]
    pub status: String,
    #[schema(example = "07:55:00", value_type = String)]
    pub check_in_time: Option<NaiveTime>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    #[schema(example = "17:05:00", value_type = String)]
    pub check_out_time: Option<NaiveTime>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    /// Reverse-geocoded address captured at check-out, when the client sent one.
    pub check_out_address: Option<String>,
}

impl Attendance {
    /// Converts the stored facts into the state machine's snapshot.
    ///
    /// Stored coordinates were validated on the way in, so a failure here
    /// means the row was tampered with outside the application.
    pub fn snapshot(&self, logbook_filled: bool) -> Result<AttendanceSnapshot, DomainError> {
        let check_in = match (self.check_in_time, self.check_in_latitude, self.check_in_longitude) {
            (Some(time), Some(lat), Some(lon)) => Some(AttendanceMark {
                time,
                coordinate: Coordinate::new(lat, lon)?,
            }),
            _ => None,
        };

        let check_out = match (
            self.check_out_time,
            self.check_out_latitude,
            self.check_out_longitude,
        ) {
            (Some(time), Some(lat), Some(lon)) => Some(AttendanceMark {
                time,
                coordinate: Coordinate::new(lat, lon)?,
            }),
            _ => None,
        };

        Ok(AttendanceSnapshot {
            date: self.date,
            check_in,
            logbook_filled,
            check_out,
        })
    }
}

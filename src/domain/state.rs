use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::geo::Coordinate;
use crate::domain::geofence::GeofenceVerdict;

/// Where the working day currently stands. Never persisted as a column:
/// it is re-derived from the snapshot on every load, so a page reload or
/// session resume always agrees with the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    NotCheckedIn,
    CheckedIn,
    LoggedActivity,
    CheckedOut,
}

/// Time and place of a check-in or check-out event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceMark {
    pub time: NaiveTime,
    pub coordinate: Coordinate,
}

/// The persisted facts for one user on one calendar date, fetched fresh
/// from the store before every transition attempt.
///
/// Transition methods return a new snapshot and never touch `self`, so a
/// failed attempt leaves nothing to roll back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSnapshot {
    pub date: NaiveDate,
    pub check_in: Option<AttendanceMark>,
    pub logbook_filled: bool,
    pub check_out: Option<AttendanceMark>,
}

impl AttendanceSnapshot {
    /// The day before any event was recorded.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            check_in: None,
            logbook_filled: false,
            check_out: None,
        }
    }

    pub fn state(&self) -> AttendanceState {
        if self.check_out.is_some() {
            AttendanceState::CheckedOut
        } else if self.check_in.is_some() && self.logbook_filled {
            AttendanceState::LoggedActivity
        } else if self.check_in.is_some() {
            AttendanceState::CheckedIn
        } else {
            AttendanceState::NotCheckedIn
        }
    }

    /// NotCheckedIn -> CheckedIn. Requires an inside verdict.
    pub fn check_in(
        &self,
        verdict: &GeofenceVerdict,
        mark: AttendanceMark,
    ) -> Result<Self, DomainError> {
        if self.state() != AttendanceState::NotCheckedIn {
            return Err(DomainError::InvalidTransition);
        }
        if !verdict.inside {
            return Err(DomainError::OutsideGeofence);
        }
        Ok(Self {
            check_in: Some(mark),
            ..self.clone()
        })
    }

    /// CheckedIn -> LoggedActivity. A second submission on the same date is
    /// rejected rather than duplicated.
    pub fn fill_logbook(&self) -> Result<Self, DomainError> {
        if self.logbook_filled {
            return Err(DomainError::LogbookAlreadyFilled);
        }
        if self.state() != AttendanceState::CheckedIn {
            return Err(DomainError::InvalidTransition);
        }
        Ok(Self {
            logbook_filled: true,
            ..self.clone()
        })
    }

    /// LoggedActivity -> CheckedOut. Requires the logbook and an inside
    /// verdict (by radius or address allow-list).
    pub fn check_out(
        &self,
        verdict: &GeofenceVerdict,
        mark: AttendanceMark,
    ) -> Result<Self, DomainError> {
        match self.state() {
            AttendanceState::LoggedActivity => {
                if !verdict.inside {
                    return Err(DomainError::OutsideGeofence);
                }
                Ok(Self {
                    check_out: Some(mark),
                    ..self.clone()
                })
            }
            // Checked in but no logbook yet: the one precondition with its
            // own error, so the client can point the user at the form.
            AttendanceState::CheckedIn => Err(DomainError::LogbookRequired),
            AttendanceState::NotCheckedIn | AttendanceState::CheckedOut => {
                Err(DomainError::InvalidTransition)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geofence::{GeofenceValidator, Zone};

    fn office() -> Coordinate {
        Coordinate::new(5.178827, 97.149306).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn mark(h: u32, m: u32) -> AttendanceMark {
        AttendanceMark {
            time: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            coordinate: office(),
        }
    }

    fn inside_verdict() -> GeofenceVerdict {
        let validator =
            GeofenceValidator::new(vec![Zone::new("kantor", office(), 100.0).unwrap()]).unwrap();
        validator.evaluate(office())
    }

    fn outside_verdict() -> GeofenceVerdict {
        let validator =
            GeofenceValidator::new(vec![Zone::new("kantor", office(), 100.0).unwrap()]).unwrap();
        validator.evaluate(Coordinate::new(5.2, 97.2).unwrap())
    }

    #[test]
    fn state_is_derived_from_the_facts() {
        let mut snapshot = AttendanceSnapshot::empty(today());
        assert_eq!(snapshot.state(), AttendanceState::NotCheckedIn);

        snapshot.check_in = Some(mark(7, 55));
        assert_eq!(snapshot.state(), AttendanceState::CheckedIn);

        snapshot.logbook_filled = true;
        assert_eq!(snapshot.state(), AttendanceState::LoggedActivity);

        snapshot.check_out = Some(mark(17, 5));
        assert_eq!(snapshot.state(), AttendanceState::CheckedOut);
    }

    #[test]
    fn the_full_day_in_order() {
        let day = AttendanceSnapshot::empty(today());
        let day = day.check_in(&inside_verdict(), mark(7, 55)).unwrap();
        let day = day.fill_logbook().unwrap();
        let day = day.check_out(&inside_verdict(), mark(17, 5)).unwrap();
        assert_eq!(day.state(), AttendanceState::CheckedOut);
    }

    #[test]
    fn check_in_outside_the_zone_is_rejected() {
        let day = AttendanceSnapshot::empty(today());
        assert_eq!(
            day.check_in(&outside_verdict(), mark(7, 55)).unwrap_err(),
            DomainError::OutsideGeofence
        );
    }

    #[test]
    fn double_check_in_is_rejected() {
        let day = AttendanceSnapshot::empty(today())
            .check_in(&inside_verdict(), mark(7, 55))
            .unwrap();
        assert_eq!(
            day.check_in(&inside_verdict(), mark(8, 0)).unwrap_err(),
            DomainError::InvalidTransition
        );
    }

    #[test]
    fn logbook_before_check_in_is_rejected() {
        let day = AttendanceSnapshot::empty(today());
        assert_eq!(day.fill_logbook().unwrap_err(), DomainError::InvalidTransition);
    }

    #[test]
    fn second_logbook_on_the_same_date_is_rejected() {
        let day = AttendanceSnapshot::empty(today())
            .check_in(&inside_verdict(), mark(7, 55))
            .unwrap()
            .fill_logbook()
            .unwrap();
        assert_eq!(day.fill_logbook().unwrap_err(), DomainError::LogbookAlreadyFilled);
    }

    #[test]
    fn check_out_without_logbook_leaves_the_day_unchanged() {
        let day = AttendanceSnapshot::empty(today())
            .check_in(&inside_verdict(), mark(7, 55))
            .unwrap();
        let before = day.clone();

        assert_eq!(
            day.check_out(&inside_verdict(), mark(17, 5)).unwrap_err(),
            DomainError::LogbookRequired
        );
        assert_eq!(day, before);
    }

    #[test]
    fn check_out_without_check_in_is_rejected() {
        let day = AttendanceSnapshot::empty(today());
        assert_eq!(
            day.check_out(&inside_verdict(), mark(17, 5)).unwrap_err(),
            DomainError::InvalidTransition
        );
    }

    #[test]
    fn check_out_outside_without_address_override_is_rejected() {
        let day = AttendanceSnapshot::empty(today())
            .check_in(&inside_verdict(), mark(7, 55))
            .unwrap()
            .fill_logbook()
            .unwrap();
        assert_eq!(
            day.check_out(&outside_verdict(), mark(17, 5)).unwrap_err(),
            DomainError::OutsideGeofence
        );
    }

    #[test]
    fn checked_out_is_terminal_for_the_day() {
        let day = AttendanceSnapshot::empty(today())
            .check_in(&inside_verdict(), mark(7, 55))
            .unwrap()
            .fill_logbook()
            .unwrap()
            .check_out(&inside_verdict(), mark(17, 5))
            .unwrap();

        assert_eq!(
            day.check_in(&inside_verdict(), mark(18, 0)).unwrap_err(),
            DomainError::InvalidTransition
        );
        assert_eq!(day.fill_logbook().unwrap_err(), DomainError::LogbookAlreadyFilled);
        assert_eq!(
            day.check_out(&inside_verdict(), mark(18, 0)).unwrap_err(),
            DomainError::InvalidTransition
        );
    }
}

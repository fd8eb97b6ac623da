use derive_more::{Display, Error};

/// Errors produced by the pure attendance/leave components.
///
/// `InvalidZone` and `NoZonesConfigured` are configuration errors and abort
/// startup; the rest are expected business outcomes the HTTP layer maps to
/// 4xx responses. Database failures are `sqlx::Error` and stay on their own
/// path.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[display(fmt = "latitude or longitude out of range")]
    InvalidCoordinate,

    #[display(fmt = "zone radius must be a positive number of meters")]
    InvalidZone,

    #[display(fmt = "at least one geofence zone must be configured")]
    NoZonesConfigured,

    #[display(fmt = "location is outside the permitted office area")]
    OutsideGeofence,

    #[display(fmt = "action is not allowed in the current attendance state")]
    InvalidTransition,

    #[display(fmt = "daily logbook has already been filled for this date")]
    LogbookAlreadyFilled,

    #[display(fmt = "daily logbook must be filled before checking out")]
    LogbookRequired,

    #[display(fmt = "insufficient annual leave balance")]
    InsufficientBalance,

    #[display(fmt = "end date must not be before start date")]
    InvalidRange,

    #[display(fmt = "location access was denied on the device")]
    PermissionDenied,

    #[display(fmt = "device location could not be determined")]
    SensorUnavailable,
}

pub mod attendance;
pub mod leave;
pub mod logbook;
pub mod profile;
pub mod recap;

use actix_web::HttpResponse;
use serde_json::json;

use crate::domain::DomainError;

/// Maps a domain outcome to the HTTP layer. Business rejections become 4xx
/// with the rule's own message; configuration errors abort startup, so one
/// reaching a handler maps to a plain 500.
pub fn domain_error_response(err: DomainError) -> HttpResponse {
    match err {
        DomainError::InvalidZone | DomainError::NoZonesConfigured => {
            tracing::error!(error = %err, "Geofence configuration error reached a handler");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
        DomainError::LogbookAlreadyFilled => HttpResponse::Conflict().json(json!({
            "message": err.to_string()
        })),
        _ => HttpResponse::BadRequest().json(json!({
            "message": err.to_string()
        })),
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default job title for freshly registered users, matching what the intake
/// form pre-fills.
pub const DEFAULT_POSITION: &str = "Staf Pelaksana";

/// Annual leave entitlement granted at registration.
pub const DEFAULT_ANNUAL_LEAVE_DAYS: i64 = 12;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub user_id: u64,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[schema(example = "Staf Pelaksana")]
    pub position: String,
    #[schema(example = 12)]
    pub annual_leave_balance: i64,
}

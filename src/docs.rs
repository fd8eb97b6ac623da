use crate::api::attendance::{CheckInRequest, CheckOutRequest, SensorError};
use crate::api::leave::CreateLeave;
use crate::api::logbook::{CreateLogbook, LogbookQuery};
use crate::api::profile::ProfileResponse;
use crate::api::recap::{RecapQuery, RecapSummary};
use crate::domain::leave::LeaveType;
use crate::model::attendance::Attendance;
use crate::model::leave_request::LeaveRequest;
use crate::model::logbook::Logbook;
use crate::model::profile::Profile;
use crate::models::{LoginReqDto, RegisterReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Absensi & Logbook API",
        version = "1.0.0",
        description = r#"
## Employee Attendance & Daily Logbook

Backend for the KPPN Lhokseumawe attendance application.

### 🔹 Key Features
- **Attendance**
  - Geofenced daily check-in and check-out with an address fallback for check-out
- **Logbook**
  - Daily work log with one entry per task, required before check-out
- **Leave Management**
  - Leave requests with an annual-leave balance ledger
- **Recap**
  - Per-period attendance listing with present/late/absent tallies

### 🔐 Security
All endpoints except registration and login require **JWT Bearer authentication**.
Every user only sees and changes their own records.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::recap::recap,

        crate::api::logbook::create_logbook,
        crate::api::logbook::list_logbook,

        crate::api::leave::create_leave,
        crate::api::leave::leave_list,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            CheckInRequest,
            CheckOutRequest,
            SensorError,
            CreateLogbook,
            LogbookQuery,
            Logbook,
            CreateLeave,
            LeaveType,
            LeaveRequest,
            RecapQuery,
            RecapSummary,
            Attendance,
            Profile,
            ProfileResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token lifecycle"),
        (name = "Attendance", description = "Check-in, check-out and recap APIs"),
        (name = "Logbook", description = "Daily logbook APIs"),
        (name = "Leave", description = "Leave request APIs"),
        (name = "Profile", description = "Profile APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

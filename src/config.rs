use std::env;
use dotenvy::dotenv;
use chrono::NaiveTime;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Office geofence. Check-in uses the tight radius; check-out accepts the
    // wider radius or a reverse-geocoded address containing one of the
    // allow-listed place names.
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub checkin_radius_m: f64,
    pub checkout_radius_m: f64,
    pub allowed_place_names: Vec<String>,

    // Check-ins after this time are recorded as "late".
    pub workday_start: NaiveTime,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            // KPPN Lhokseumawe front office.
            office_latitude: env::var("OFFICE_LATITUDE")
                .unwrap_or_else(|_| "5.178827".to_string())
                .parse()
                .unwrap(),
            office_longitude: env::var("OFFICE_LONGITUDE")
                .unwrap_or_else(|_| "97.149306".to_string())
                .parse()
                .unwrap(),
            checkin_radius_m: env::var("CHECKIN_RADIUS_M")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),
            checkout_radius_m: env::var("CHECKOUT_RADIUS_M")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap(),
            allowed_place_names: env::var("ALLOWED_PLACE_NAMES")
                .unwrap_or_else(|_| "lhokseumawe".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            workday_start: env::var("WORKDAY_START")
                .unwrap_or_else(|_| "08:00:00".to_string())
                .parse()
                .unwrap(),
        }
    }
}

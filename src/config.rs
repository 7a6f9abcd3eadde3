use std::env;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub default_rating: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:seekboard.db?mode=rwc".to_string()),
            default_rating: env::var("DEFAULT_RATING")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(seekboard::lobby::DEFAULT_RATING),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Médiature service configuration loaded from environment variables.
#[derive(Debug)]
pub struct MediatureConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Frontend base URL, used to build sign-up links in invitation emails
    /// (e.g. "https://mediature.example.org"). Env var: `FRONT_BASE_URL`.
    pub front_base_url: String,
    /// TCP port to listen on (default 3115). Env var: `MEDIATURE_PORT`.
    pub mediature_port: u16,
}

impl MediatureConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            front_base_url: std::env::var("FRONT_BASE_URL").expect("FRONT_BASE_URL"),
            mediature_port: std::env::var("MEDIATURE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3115),
        }
    }
}

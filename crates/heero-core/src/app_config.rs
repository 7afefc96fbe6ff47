use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, loaded once at startup and passed to the loader,
/// cache layer and map engine.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_ttl_secs: u64,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub map_access_token: Option<String>,
    pub map_style_url: String,
    pub marker_min_distance_px: f64,
    pub cluster_radius_px: f64,
    pub click_tolerance_deg: f64,
    pub select_zoom: f64,
    pub fly_duration_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "map_access_token",
                &self.map_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("map_style_url", &self.map_style_url)
            .field("marker_min_distance_px", &self.marker_min_distance_px)
            .field("cluster_radius_px", &self.cluster_radius_px)
            .field("click_tolerance_deg", &self.click_tolerance_deg)
            .field("select_zoom", &self.select_zoom)
            .field("fly_duration_ms", &self.fly_duration_ms)
            .finish()
    }
}

use serde::Deserialize;

/// Main configuration structure for Krisha-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Source site configuration
///
/// Every field carries its own fallback, so a partial table overrides only
/// what it names.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the source site
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://krisha.kz".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Pacing and backoff configuration
///
/// All delays are uniform random samples from their [min, max] ranges; a
/// fixed cadence is exactly the signature the pacing layer exists to avoid.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Delay range before each per-listing request (seconds)
    #[serde(rename = "listing-delay-min-secs", default = "default_listing_delay_min")]
    pub listing_delay_min_secs: f64,
    #[serde(rename = "listing-delay-max-secs", default = "default_listing_delay_max")]
    pub listing_delay_max_secs: f64,

    /// Delay range between list pages (seconds)
    #[serde(rename = "page-delay-min-secs", default = "default_page_delay_min")]
    pub page_delay_min_secs: f64,
    #[serde(rename = "page-delay-max-secs", default = "default_page_delay_max")]
    pub page_delay_max_secs: f64,

    /// Serviced-request count range after which a long rest is taken;
    /// the threshold is re-randomized, with a raised floor, after each rest
    #[serde(rename = "rest-after-min", default = "default_rest_after_min")]
    pub rest_after_min: u32,
    #[serde(rename = "rest-after-max", default = "default_rest_after_max")]
    pub rest_after_max: u32,

    /// Rest duration range (seconds)
    #[serde(rename = "rest-min-secs", default = "default_rest_min_secs")]
    pub rest_min_secs: u64,
    #[serde(rename = "rest-max-secs", default = "default_rest_max_secs")]
    pub rest_max_secs: u64,

    /// Fixed cooldown applied on a detected ban (seconds)
    #[serde(rename = "ban-cooldown-secs", default = "default_ban_cooldown_secs")]
    pub ban_cooldown_secs: u64,

    /// Consecutive transient failures that count as a ban signal
    #[serde(rename = "max-errors-before-ban", default = "default_max_errors_before_ban")]
    pub max_errors_before_ban: u32,
}

fn default_listing_delay_min() -> f64 {
    2.0
}

fn default_listing_delay_max() -> f64 {
    5.0
}

fn default_page_delay_min() -> f64 {
    5.0
}

fn default_page_delay_max() -> f64 {
    10.0
}

fn default_rest_after_min() -> u32 {
    15
}

fn default_rest_after_max() -> u32 {
    25
}

fn default_rest_min_secs() -> u64 {
    60
}

fn default_rest_max_secs() -> u64 {
    120
}

fn default_ban_cooldown_secs() -> u64 {
    900
}

fn default_max_errors_before_ban() -> u32 {
    3
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            listing_delay_min_secs: default_listing_delay_min(),
            listing_delay_max_secs: default_listing_delay_max(),
            page_delay_min_secs: default_page_delay_min(),
            page_delay_max_secs: default_page_delay_max(),
            rest_after_min: default_rest_after_min(),
            rest_after_max: default_rest_after_max(),
            rest_min_secs: default_rest_min_secs(),
            rest_max_secs: default_rest_max_secs(),
            ban_cooldown_secs: default_ban_cooldown_secs(),
            max_errors_before_ban: default_max_errors_before_ban(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the checkpoint files are written into
    #[serde(rename = "dir", default = "default_output_dir")]
    pub dir: String,

    /// Buffered records per automatic flush
    #[serde(rename = "flush-every", default = "default_flush_every")]
    pub flush_every: usize,
}

fn default_output_dir() -> String {
    "./out".to_string()
}

fn default_flush_every() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            flush_every: default_flush_every(),
        }
    }
}

/// Credential session configuration (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// External challenge-solver configuration (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// How long to wait for the solver to clear a challenge (seconds)
    #[serde(rename = "timeout-secs", default = "default_solver_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_solver_timeout_secs() -> u64 {
    120
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: default_solver_timeout_secs(),
        }
    }
}

use serde::Deserialize;

/// Main configuration structure for Letterboxd-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root of the site, e.g. `https://letterboxd.com/`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of fetches in flight across all seeds and leaderboards
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Maximum number of pooled connections kept per host
    #[serde(rename = "limit-per-host", default = "default_limit_per_host")]
    pub limit_per_host: u32,

    /// Total per-request timeout in seconds; unbounded when absent
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Popular-members leaderboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: u32,

    #[serde(rename = "last-page", default = "default_last_page")]
    pub last_page: u32,

    /// Time windows to crawl; an empty list disables leaderboards
    #[serde(default = "default_windows")]
    pub windows: Vec<LeaderboardWindow>,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            first_page: default_first_page(),
            last_page: default_last_page(),
            windows: default_windows(),
        }
    }
}

/// Time window of a popular-members leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeaderboardWindow {
    AllTime,
    Weekly,
    Monthly,
    Yearly,
}

impl LeaderboardWindow {
    pub const ALL: [LeaderboardWindow; 4] = [
        LeaderboardWindow::AllTime,
        LeaderboardWindow::Weekly,
        LeaderboardWindow::Monthly,
        LeaderboardWindow::Yearly,
    ];

    /// Path segment used by the site for this window
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::AllTime => "all-time",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

/// Seed input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV file listing the seed films
    #[serde(rename = "seeds-path")]
    pub seeds_path: String,

    /// Header of the column holding the film slug
    #[serde(rename = "seed-column", default = "default_seed_column")]
    pub seed_column: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the durable handle store
    #[serde(rename = "handles-path")]
    pub handles_path: String,

    #[serde(default)]
    pub backend: StoreBackend,
}

/// Durable storage backend for discovered handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Append-only file, one handle per line
    #[default]
    Csv,
    /// SQLite database with a `handles` table
    Sqlite,
}

fn default_base_url() -> String {
    "https://letterboxd.com/".to_string()
}

fn default_max_concurrency() -> u32 {
    4
}

fn default_limit_per_host() -> u32 {
    60
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_first_page() -> u32 {
    1
}

fn default_last_page() -> u32 {
    256
}

fn default_windows() -> Vec<LeaderboardWindow> {
    LeaderboardWindow::ALL.to_vec()
}

fn default_seed_column() -> String {
    "film_id".to_string()
}

use serde::Deserialize;

/// Main configuration structure for Douban-Roast
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub roast: RoastConfig,
}

/// Where and how collect pages are fetched
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Scheme and host of the site, e.g. "https://movie.douban.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Browser-like user agent sent with every page request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Static session cookie string sent as the `Cookie` header
    pub cookie: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of pages fetched per scrape
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

/// Text-generation endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct RoastConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(rename = "api-base", default = "default_api_base")]
    pub api_base: String,

    /// Model name passed through to the endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(rename = "max-tokens", default = "default_max_tokens")]
    pub max_tokens: u32,

    /// What to do with the scraped list when generation fails
    #[serde(rename = "on-failure", default)]
    pub on_failure: FailurePolicy,
}

/// Partial-success posture of the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Print the scraped items and a warning, exit successfully
    #[default]
    ShowItems,
    /// Treat the failure as fatal
    Fail,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_pages() -> u32 {
    5
}

fn default_page_delay_ms() -> u64 {
    500
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

use serde::Deserialize;

/// Browser-identifying User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

/// Main configuration structure for Sumi-Sift
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Worker pool size for the first pass
    pub workers: usize,

    /// Worker pool size for the retry pass over rate-limited URLs
    #[serde(rename = "retry-workers")]
    pub retry_workers: usize,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// Heading tag levels extracted from each page (1 = `<h1>`)
    #[serde(rename = "heading-levels")]
    pub heading_levels: Vec<u8>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            retry_workers: 5,
            request_timeout: 30,
            connect_timeout: 10,
            heading_levels: vec![1, 2],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the report file is written into
    pub directory: String,

    /// Field delimiter of the report (single ASCII character)
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            delimiter: ',',
        }
    }
}

impl OutputConfig {
    /// File extension matching the delimiter
    pub fn extension(&self) -> &'static str {
        match self.delimiter {
            ',' => "csv",
            '\t' => "tsv",
            _ => "txt",
        }
    }
}

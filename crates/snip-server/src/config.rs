use snip_lib::EvaluatorConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BODY: usize = 1024 * 1024;

/// Everything the server needs to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_body: usize,
    pub evaluator: EvaluatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            max_body: DEFAULT_MAX_BODY,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, suitable for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

use clap::Parser;
use ecosaur_core::domain::common::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, EcosaurConfig, LLMConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "ecosaur-api", version, about = "Ecosaur chat backend")]
pub struct Args {
    #[command(flatten)]
    pub gemini: GeminiArgs,
    #[command(flatten)]
    pub server: ServerArgs,
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GeminiArgs {
    /// Gemini API key. `API_KEY` is honored when this is unset.
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    #[arg(long = "api-key", env = "API_KEY", hide = true, hide_env_values = true)]
    pub legacy_api_key: Option<String>,
    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,
    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub base_url: String,
}

impl GeminiArgs {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .iter()
            .chain(self.legacy_api_key.iter())
            .find(|key| !key.trim().is_empty())
            .cloned()
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,
    #[arg(long, env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,
    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl From<Args> for EcosaurConfig {
    fn from(args: Args) -> Self {
        EcosaurConfig {
            llm: LLMConfig {
                gemini_api_key: args.gemini.resolve_api_key().unwrap_or_default(),
                gemini_model: args.gemini.model,
                gemini_base_url: args.gemini.base_url,
            },
        }
    }
}

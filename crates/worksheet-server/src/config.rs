use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use worksheet_bedrock::client::{CredentialSource, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID};
use worksheet_bedrock::pipeline::PipelineOptions;
use worksheet_export::pdf::RenderOptions;
use worksheet_export::styles::DocumentStyles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format {other:?} (expected json or pretty)")),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub region: String,
    pub credentials: CredentialSource,
    pub model_id: String,
    pub max_tokens: i32,
    pub generation_timeout: Duration,
    pub tex_engine: String,
    pub compile_timeout: Duration,
    pub styles: DocumentStyles,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let styles_default = DocumentStyles::default();

        let credentials = match get("WORKSHEET_AWS_PROFILE") {
            Some(profile_name) => CredentialSource::Profile { profile_name },
            None => CredentialSource::DefaultChain,
        };

        let max_tokens: i32 = parse(&get, "WORKSHEET_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens <= 0 {
            return Err(eyre::eyre!("WORKSHEET_MAX_TOKENS must be positive, got {max_tokens}"));
        }

        Ok(Self {
            bind: parse(&get, "WORKSHEET_BIND", SocketAddr::from(([127, 0, 0, 1], 8080)))?,
            region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            credentials,
            model_id: get("WORKSHEET_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            max_tokens,
            generation_timeout: Duration::from_secs(parse(
                &get,
                "WORKSHEET_GENERATION_TIMEOUT_SECS",
                300,
            )?),
            tex_engine: get("WORKSHEET_TEX_ENGINE").unwrap_or_else(|| "pdflatex".to_string()),
            compile_timeout: Duration::from_secs(parse(
                &get,
                "WORKSHEET_COMPILE_TIMEOUT_SECS",
                120,
            )?),
            styles: DocumentStyles {
                document_class: get("WORKSHEET_DOCUMENT_CLASS")
                    .unwrap_or(styles_default.document_class),
                margin: get("WORKSHEET_MARGIN").unwrap_or(styles_default.margin),
            },
            log_format: parse(&get, "WORKSHEET_LOG_FORMAT", LogFormat::Json)?,
        })
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            call_timeout: self.generation_timeout,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            engine: self.tex_engine.clone(),
            compile_timeout: self.compile_timeout,
            styles: self.styles.clone(),
            scratch_root: None,
        }
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}

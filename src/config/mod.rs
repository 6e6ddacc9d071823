//! Runtime settings, read from CLI flags with environment fallbacks.
//!
//! A `.env` file in the working directory is loaded by `main` before the
//! CLI is parsed, so its entries behave like real environment variables.
//! Settings are built once at startup and handed to each component.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;

use crate::classifier::openai::OpenAiConfig;
use crate::consts::{
    DEFAULT_API_BASE, DEFAULT_INPUT_CSV, DEFAULT_MODEL, DEFAULT_OUTPUT_CSV, DEFAULT_TIMEOUT_SECS,
};
use crate::prompts::build_classify_system_prompt;

/// Secondary variable consulted when `OPEN_API_KEY` is unset.
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Input table of licenses to classify
    #[arg(long, global = true, env = "INPUT_LICENSES_CSV", default_value = DEFAULT_INPUT_CSV)]
    pub input_csv: PathBuf,

    /// Output table of classified licenses (read and rewritten by the API)
    #[arg(long, global = true, env = "OUTPUT_LICENSES_CSV", default_value = DEFAULT_OUTPUT_CSV)]
    pub output_csv: PathBuf,

    /// OpenAI API key
    #[arg(long, global = true, env = "OPEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI model name
    #[arg(long, global = true, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Classification request timeout in seconds
    #[arg(
        long = "timeout",
        global = true,
        env = "CLASSIFY_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,
}

impl Settings {
    /// Build the classifier configuration. Fails if no API key is available.
    pub fn openai_config(&self) -> Result<OpenAiConfig> {
        let api_key = resolve_api_key(
            self.api_key.as_deref(),
            std::env::var(FALLBACK_API_KEY_ENV).ok(),
        )?;
        Ok(OpenAiConfig {
            api_key,
            model: self.model.clone(),
            base_url: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            system_prompt: build_classify_system_prompt(),
        })
    }
}

/// Priority: explicit key (flag or `OPEN_API_KEY`) → fallback variable.
fn resolve_api_key(explicit: Option<&str>, fallback: Option<String>) -> Result<String> {
    if let Some(key) = explicit
        && !key.is_empty()
    {
        return Ok(key.to_string());
    }
    if let Some(key) = fallback
        && !key.is_empty()
    {
        return Ok(key);
    }
    bail!("no OpenAI API key found. Set OPEN_API_KEY (or {FALLBACK_API_KEY_ENV}) or pass --api-key.")
}

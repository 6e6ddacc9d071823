//! Project-wide constants.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const API_TITLE: &str = "License Classification API";
pub const API_DESCRIPTION: &str = "API for classifying software licenses using Open AI";

/// Default OpenAI model when none is specified.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Upper bound on a single classification request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_INPUT_CSV: &str = "data/licenses.csv";
pub const DEFAULT_OUTPUT_CSV: &str = "data/classified_licenses.csv";

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";

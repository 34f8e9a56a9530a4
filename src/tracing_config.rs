//! Tracing setup for hosts that embed the analyzer.
//!
//! Output format is picked with `SHARPGEN_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span tree via `tracing-tree`, handy for following one
//!   unit's extraction decisions
//! - `json`: one JSON object per event
//!
//! ```bash
//! SHARPGEN_LOG=sharpgen_analysis=debug SHARPGEN_LOG_FORMAT=tree my-generator
//! SHARPGEN_LOG="sharpgen_analysis::naming=debug,sharpgen_model=trace" my-generator
//! ```
//!
//! Nothing is installed unless `SHARPGEN_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "SHARPGEN_LOG";
const LOG_FORMAT_VAR: &str = "SHARPGEN_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Case-insensitive; anything unrecognized is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// `SHARPGEN_LOG` wins over `RUST_LOG`; both use `RUST_LOG` syntax.
fn filter_from_env() -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_VAR) {
        return Some(EnvFilter::builder().parse_lossy(directives));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when logging was not requested or a subscriber is
/// already installed.
pub fn init_tracing() -> bool {
    let Some(filter) = filter_from_env() else {
        return false;
    };

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init().is_ok()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init().is_ok()
        }
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;

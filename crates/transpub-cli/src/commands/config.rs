use anyhow::{Context, Result};
use transpub_core::config::RootConfig;

pub fn render(config: &RootConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to render configuration")
}

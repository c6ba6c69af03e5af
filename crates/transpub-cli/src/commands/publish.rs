use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use transpub_application::{PublisherSettings, TranslationPublisher};
use transpub_core::config::RootConfig;
use transpub_core::locale::LocaleId;
use transpub_core::outcome::PublishOutcome;
use transpub_core::session::{SessionProvider, StaticSessionProvider};
use transpub_core::translation::TranslationSet;
use transpub_infrastructure::{GitHubClient, SecretSessionProvider};

/// Exit status when no access token could be found.
const EXIT_UNAUTHENTICATED: u8 = 2;

pub async fn run(
    config: &RootConfig,
    locale: &str,
    file: &Path,
    token: Option<String>,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let locale = LocaleId::parse(locale)?;
    let translations = load_translations(file)?;

    let sessions = session_provider(token, config_path);
    let host = Arc::new(GitHubClient::new(config.github.clone()));
    let publisher = TranslationPublisher::new(host, sessions, PublisherSettings::from(config));

    let Some(outcome) = publisher.publish(&translations, &locale).await else {
        tracing::warn!(
            "[PublishCommand] Not signed in: pass --token, set GITHUB_TOKEN \
             or add github.access_token to secret.json"
        );
        return Ok(ExitCode::from(EXIT_UNAUTHENTICATED));
    };

    if outcome.is_success() {
        tracing::info!(
            "[PublishCommand] Published {} translations for {}",
            translations.len(),
            locale
        );
    } else {
        tracing::info!("[PublishCommand] Publishing {} did not complete", locale);
    }
    println!("{}", render_outcome(&outcome)?);
    Ok(exit_code(&outcome))
}

/// `--token` wins; otherwise secret.json is read next to the config file in use.
fn session_provider(
    token: Option<String>,
    config_path: Option<&Path>,
) -> Arc<dyn SessionProvider> {
    if let Some(token) = token {
        return Arc::new(StaticSessionProvider::with_token(token));
    }
    match config_path.and_then(Path::parent) {
        Some(dir) => Arc::new(SecretSessionProvider::in_dir(dir)),
        None => Arc::new(SecretSessionProvider::new_default()),
    }
}

fn load_translations(file: &Path) -> Result<TranslationSet> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    TranslationSet::from_json_str(&content)
        .with_context(|| format!("Failed to load translations from {}", file.display()))
}

fn render_outcome(outcome: &PublishOutcome) -> Result<String> {
    serde_json::to_string_pretty(&outcome.to_result()).context("Failed to render result")
}

fn exit_code(outcome: &PublishOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

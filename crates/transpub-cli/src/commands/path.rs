use anyhow::Result;
use transpub_core::config::RootConfig;
use transpub_core::locale::LocaleId;

/// Repository path of `locale`'s translations file under the configured directory.
pub fn resolve(config: &RootConfig, locale: &str) -> Result<String> {
    let locale = LocaleId::parse(locale)?;
    Ok(config.upstream.file_path(&locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let config = RootConfig::default();
        assert_eq!(resolve(&config, "zh-cn").unwrap(), "translations/zh/cn.json");
        assert_eq!(resolve(&config, "fr").unwrap(), "translations/fr.json");
    }

    #[test]
    fn test_resolve_rejects_invalid_locale() {
        let err = resolve(&RootConfig::default(), "../fr").unwrap_err();
        assert!(err.to_string().contains("Invalid locale identifier"));
    }
}

use inquire::{Password, PasswordDisplayMode};

use crate::config::{Config, ProviderKind};
use crate::error::{AppError, Result};

/// Looks up a secret by name: environment first, then the config file.
pub fn get_api_key(name: &str, config_value: Option<&str>) -> Option<String> {
    pick_key(std::env::var(name).ok(), config_value)
}

fn pick_key(env_value: Option<String>, config_value: Option<&str>) -> Option<String> {
    env_value
        .as_deref()
        .into_iter()
        .chain(config_value)
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

/// Resolves the API key for `provider`, asking on the terminal when allowed.
pub fn resolve_api_key(provider: ProviderKind, config: &Config, interactive: bool) -> Result<String> {
    let name = provider.key_name();

    if let Some(key) = get_api_key(name, config.api_key(provider)) {
        tracing::debug!("Using {} from environment or config", name);
        return Ok(key);
    }

    if !interactive {
        return Err(AppError::ProviderUnavailable(format!(
            "{} is not set (export it or add it to {})",
            name,
            Config::config_path().display()
        )));
    }

    eprintln!("{} not found in the environment or config.", name);
    let key = Password::new(&format!("Please enter your {} API key:", provider))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::ProviderUnavailable(format!(
            "{} API key cannot be empty",
            provider
        )));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_wins_over_config() {
        assert_eq!(
            pick_key(Some("env-key".into()), Some("file-key")),
            Some("env-key".to_string())
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(
            pick_key(Some("   ".into()), Some(" file-key ")),
            Some("file-key".to_string())
        );
        assert_eq!(pick_key(None, Some("")), None);
        assert_eq!(pick_key(None, None), None);
    }

    #[test]
    fn missing_key_without_terminal_is_unavailable() {
        let config = Config {
            gemini_api_key: None,
            ..Config::default()
        };
        // Nothing sets this variable in the test environment.
        if std::env::var(ProviderKind::Gemini.key_name()).is_ok() {
            return;
        }
        let err = resolve_api_key(ProviderKind::Gemini, &config, false).unwrap_err();
        assert!(matches!(err, AppError::ProviderUnavailable(_)));
    }

    #[test]
    fn configured_key_is_used() {
        let config = Config {
            mistral_api_key: Some("from-config".into()),
            ..Config::default()
        };
        if std::env::var(ProviderKind::Mistral.key_name()).is_ok() {
            return;
        }
        assert_eq!(
            resolve_api_key(ProviderKind::Mistral, &config, false).unwrap(),
            "from-config"
        );
    }
}

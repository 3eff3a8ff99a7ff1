//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::SwitchConfig;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Show => handle_show(store, presenter).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Path => {
            presenter.output(&store.path().display().to_string());
            Ok(())
        }
        ConfigAction::Reset => {
            store.save(&SwitchConfig::default()).await?;
            presenter.success("Configuration reset to defaults");
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_show<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::WriteError(e.to_string()))?;
    presenter.output(&json);
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    validate_key(key)?;
    let config = store.load().await?;
    presenter.key_value(key, &get_value(&config, key));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    validate_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn get_value(config: &SwitchConfig, key: &str) -> String {
    match key {
        "open_mic" => config.open_mic.join(", "),
        "open_output" => config.open_output.join(", "),
        "open_camera" => config.open_camera.join(", "),
        "closed_mic" => config.closed_mic.join(", "),
        "closed_output" => config.closed_output.join(", "),
        "closed_camera" => config.closed_camera.join(", "),
        "blocked_mic_keywords" => config.blocked_mic_keywords.join(", "),
        "blocked_output_keywords" => config.blocked_output_keywords.join(", "),
        "stream_cam_keyword" => config.stream_cam_keyword.clone(),
        "allow_builtin_speakers" => config.allow_builtin_speakers.to_string(),
        _ => unreachable!(), // Already validated
    }
}

fn set_value(config: &mut SwitchConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "open_mic" => config.open_mic = parse_list(value),
        "open_output" => config.open_output = parse_list(value),
        "open_camera" => config.open_camera = parse_list(value),
        "closed_mic" => config.closed_mic = parse_list(value),
        "closed_output" => config.closed_output = parse_list(value),
        "closed_camera" => config.closed_camera = parse_list(value),
        "blocked_mic_keywords" => config.blocked_mic_keywords = parse_list(value),
        "blocked_output_keywords" => config.blocked_output_keywords = parse_list(value),
        "stream_cam_keyword" => config.stream_cam_keyword = value.trim().to_string(),
        "allow_builtin_speakers" => {
            config.allow_builtin_speakers =
                parse_bool(value).ok_or_else(|| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be 'true' or 'false'".to_string(),
                })?
        }
        _ => unreachable!(), // Already validated
    }
    Ok(())
}

/// Comma-separated device names; empty segments are dropped
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::JsonConfigStore;

    fn temp_store() -> (tempfile::TempDir, JsonConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::with_path(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list("Logi StreamCam, Desk Mic,, "),
            vec!["Logi StreamCam".to_string(), "Desk Mic".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn parse_bool_accepts_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[tokio::test]
    async fn set_list_key_persists() {
        let (_dir, store) = temp_store();
        let presenter = Presenter::new();

        handle_config_command(
            ConfigAction::Set {
                key: "closed_mic".to_string(),
                value: "Logi StreamCam, Desk Mic".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(
            config.closed_mic,
            vec!["Logi StreamCam".to_string(), "Desk Mic".to_string()]
        );
    }

    #[tokio::test]
    async fn set_bool_key_validates() {
        let (_dir, store) = temp_store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "allow_builtin_speakers".to_string(),
                value: "maybe".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let (_dir, store) = temp_store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Get {
                key: "api_key".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let (_dir, store) = temp_store();
        let presenter = Presenter::new();

        handle_config_command(
            ConfigAction::Set {
                key: "stream_cam_keyword".to_string(),
                value: "Brio".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap();

        handle_config_command(ConfigAction::Reset, &store, &presenter)
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap(), SwitchConfig::default());
    }
}

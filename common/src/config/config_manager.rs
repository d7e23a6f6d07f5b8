use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads a config once, validates it and caches it.
/// A missing config yields `TConfig::default()`.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl AsRef<Path>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path.as_ref()),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|e| format!("Config cache poisoned: {}", e))?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|e| format!("Config cache poisoned: {}", e))?;
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{BotType, GameMode, Mark, TicTacToeSettings};

    fn get_temp_file_path() -> std::path::PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_tictactoe_config_{}.yaml", random_number))
    }

    #[test]
    fn test_default_settings_roundtrip_string() {
        let settings = TicTacToeSettings::default();
        let serializer = YamlConfigSerializer::new();
        let serialized: String = serializer.serialize(&settings).unwrap();
        assert!(serialized.contains("vs_computer"));
        let deserialized: TicTacToeSettings = serializer.deserialize(&serialized).unwrap();
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let manager: ConfigManager<_, TicTacToeSettings> =
            ConfigManager::from_yaml_file(get_temp_file_path());
        assert_eq!(manager.get_config().unwrap(), TicTacToeSettings::default());
    }

    #[test]
    fn test_set_then_get_through_file() {
        let file_path = get_temp_file_path();
        let settings = TicTacToeSettings {
            mode: GameMode::Pvp,
            bot_type: BotType::Random,
            thinking_delay_ms: 0,
            seed: Some(5),
            ..TicTacToeSettings::default()
        };

        let writer: ConfigManager<_, TicTacToeSettings> =
            ConfigManager::from_yaml_file(&file_path);
        writer.set_config(&settings).unwrap();

        let reader: ConfigManager<_, TicTacToeSettings> =
            ConfigManager::from_yaml_file(&file_path);
        assert_eq!(reader.get_config().unwrap(), settings);

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let file_path = get_temp_file_path();
        std::fs::write(
            &file_path,
            "mode: pvp\nhuman_mark: X\ncomputer_mark: X\nthinking_delay_ms: 100\n",
        )
        .unwrap();

        let manager: ConfigManager<_, TicTacToeSettings> =
            ConfigManager::from_yaml_file(&file_path);
        let err = manager.get_config().unwrap_err();
        assert!(err.starts_with("Config validation error"));

        let bad = TicTacToeSettings {
            computer_mark: Mark::X,
            ..TicTacToeSettings::default()
        };
        assert!(manager.set_config(&bad).is_err());

        let _ = std::fs::remove_file(&file_path);
    }
}

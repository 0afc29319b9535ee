//! Модуль конфигурации библиотеки chat-tts
//!
//! Этот модуль содержит настройки TTS. Конфигурацию можно прочитать из JSON
//! или из переменных окружения; изменения применяются через `TtsSystem::update_config`.

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Result, TtsError};

/// Формат аудио, который запрашивается у API
pub const AUDIO_FORMAT: &str = "ogg";

/// Конфигурация TTS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TtsConfig {
    /// Включен ли TTS
    pub enabled: bool,
    /// Максимальное количество записей в кэше
    pub max_cached: usize,
    /// Адрес API синтеза речи
    pub api_url: String,
    /// Токен авторизации для API
    pub api_token: String,
    /// Таймаут запроса к API в секундах
    pub timeout_secs: u64,
    /// Сообщения длиннее этого значения не озвучиваются
    pub max_message_chars: usize,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_cached: 200,
            api_url: String::new(),
            api_token: String::new(),
            timeout_secs: 5,
            max_message_chars: 400,
        }
    }
}

impl TtsConfig {
    /// Таймаут запроса в виде `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Разобрать конфигурацию из JSON строки
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Загрузить конфигурацию из JSON файла
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Собрать конфигурацию из переменных окружения `TTS_*`
    ///
    /// Отсутствующие переменные берутся из значений по умолчанию.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("TTS_ENABLED") {
            config.enabled = parse_var("TTS_ENABLED", &v)?;
        }
        if let Some(v) = lookup("TTS_MAX_CACHE") {
            config.max_cached = parse_var("TTS_MAX_CACHE", &v)?;
        }
        if let Some(v) = lookup("TTS_API_URL") {
            config.api_url = v;
        }
        if let Some(v) = lookup("TTS_API_TOKEN") {
            config.api_token = v;
        }
        if let Some(v) = lookup("TTS_API_TIMEOUT") {
            config.timeout_secs = parse_var("TTS_API_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("TTS_MAX_MESSAGE_CHARS") {
            config.max_message_chars = parse_var("TTS_MAX_MESSAGE_CHARS", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Проверить согласованность настроек
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.api_url.trim().is_empty() {
            return Err(TtsError::Configuration("TTS API URL is required when TTS is enabled".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(TtsError::Configuration("TTS API timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TtsError::Configuration(format!("Invalid value for {}: {:?}", name, value)))
}

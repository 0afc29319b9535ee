//! Модуль обработки ошибок библиотеки chat-tts
//!
//! Ни одна из этих ошибок не является фатальной: каждая относится к одному запросу.
//! Ошибки синтеза не выходят за границу HTTP клиента и превращаются в `None`.

use std::time::Duration;
use reqwest::StatusCode;
use thiserror::Error;

/// Ошибки подготовки запроса и загрузки конфигурации
#[derive(Debug, Error)]
pub enum TtsError {
    /// TTS выключен в конфигурации
    #[error("TTS is disabled")]
    Disabled,

    /// Сообщение длиннее допустимого
    #[error("Message is too long: {len} chars (max {max})")]
    MessageTooLong { len: usize, max: usize },

    /// После очистки текста ничего не осталось
    #[error("Nothing to synthesize after sanitization")]
    EmptyAfterSanitization,

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка построения HTTP клиента
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Исход неудачного запроса к API синтеза
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Сервер ответил 429
    #[error("TTS request was rate limited")]
    RateLimited,

    /// Любой другой не-2xx ответ
    #[error("TTS request returned bad status code: {0}")]
    UpstreamStatus(StatusCode),

    /// Ответ не получен за отведенное время
    #[error("TTS request timed out after {0:?}")]
    Timeout(Duration),

    /// Ошибка соединения или протокола
    #[error("TTS request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SynthesisError {
    /// Метка исхода для гистограммы задержек
    pub fn outcome(&self) -> crate::metrics::Outcome {
        match self {
            Self::Timeout(_) => crate::metrics::Outcome::Timeout,
            _ => crate::metrics::Outcome::Error,
        }
    }
}

/// Тип Result для библиотеки chat-tts
pub type Result<T> = std::result::Result<T, TtsError>;

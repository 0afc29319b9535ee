//! Модуль для работы с TTS
//!
//! Этот модуль содержит кэш, объединение запросов и клиент API синтеза речи.

pub mod cache;
pub mod client;
pub mod coalescer;

use std::sync::Arc;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use crate::error::{Result, TtsError};
use crate::text::sanitizer::{is_letter, sanitize};
use self::cache::CacheKey;
use self::coalescer::RequestKey;

/// Режим речи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMode {
    #[default]
    Say,
    Whisper,
}

/// Источник синтезированного аудио
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Синтезировать речь; `None` при любой ошибке
    async fn synthesize(&self, speaker: &str, text: &str) -> Option<Bytes>;
}

#[async_trait]
impl<T: SpeechSynthesizer> SpeechSynthesizer for Arc<T> {
    async fn synthesize(&self, speaker: &str, text: &str) -> Option<Bytes> {
        (**self).synthesize(speaker, text).await
    }
}

/// Подготовленный запрос на синтез: очищенный текст и ключи
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub speaker: String,
    pub text: String,
    pub mode: SpeechMode,
    pub key: RequestKey,
}

impl SpeechRequest {
    /// Очистить текст и вывести ключ запроса.
    ///
    /// Если очищенный текст заканчивается буквой, к нему добавляется точка:
    /// точка входит в текст запроса и, значит, в ключ кэша.
    pub fn prepare(text: &str, speaker: &str, mode: SpeechMode) -> Result<Self> {
        let mut sanitized = sanitize(text);
        if sanitized.is_empty() {
            return Err(TtsError::EmptyAfterSanitization);
        }

        if sanitized.chars().last().map_or(false, is_letter) {
            sanitized.push('.');
        }

        let key = RequestKey {
            cache_key: CacheKey::new(speaker, &sanitized),
            mode,
        };

        Ok(Self {
            speaker: speaker.to_string(),
            text: sanitized,
            mode,
            key,
        })
    }
}

//! Основной файл библиотеки chat-tts
//!
//! Библиотека озвучивает сообщения чата через внешний HTTP API синтеза речи.
//! Текст очищается и нормализуется для русского произношения, одинаковые
//! одновременные запросы объединяются в один, а результаты кэшируются.

pub mod config;
pub mod error;
pub mod metrics;
pub mod text;
pub mod tts;

use std::borrow::Cow;
use std::sync::Arc;
use bytes::Bytes;
use parking_lot::RwLock;
use crate::metrics::{MetricsSnapshot, TtsMetrics};
use crate::tts::coalescer::Coalescer;
use crate::tts::client::HttpSynthesizer;

pub use crate::config::TtsConfig;
pub use crate::error::{Result, SynthesisError, TtsError};
pub use crate::tts::{SpeechMode, SpeechRequest, SpeechSynthesizer};

/// Аудио для слушателей, которые понимают язык говорящего, и для остальных
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub clear: Bytes,
    pub obfuscated: Bytes,
}

/// Основная структура для работы с библиотекой
pub struct TtsSystem<S: SpeechSynthesizer = HttpSynthesizer> {
    /// Актуальная конфигурация, общая с HTTP клиентом
    config: Arc<RwLock<TtsConfig>>,
    synthesizer: Arc<S>,
    coalescer: Coalescer,
    metrics: Arc<TtsMetrics>,
}

impl TtsSystem<HttpSynthesizer> {
    /// Создать систему с HTTP клиентом API синтеза речи
    pub fn new(config: TtsConfig) -> Result<Self> {
        config.validate()?;

        let config = Arc::new(RwLock::new(config));
        let metrics = Arc::new(TtsMetrics::new());
        let synthesizer = HttpSynthesizer::new(config.clone(), metrics.clone())?;

        Ok(Self::assemble(config, synthesizer, metrics))
    }
}

impl<S: SpeechSynthesizer> TtsSystem<S> {
    /// Создать систему с произвольным источником аудио
    pub fn with_synthesizer(config: TtsConfig, synthesizer: S) -> Result<Self> {
        config.validate()?;

        Ok(Self::assemble(
            Arc::new(RwLock::new(config)),
            synthesizer,
            Arc::new(TtsMetrics::new()),
        ))
    }

    fn assemble(config: Arc<RwLock<TtsConfig>>, synthesizer: S, metrics: Arc<TtsMetrics>) -> Self {
        let max_cached = config.read().max_cached;

        Self {
            config,
            synthesizer: Arc::new(synthesizer),
            coalescer: Coalescer::new(max_cached, metrics.clone()),
            metrics,
        }
    }

    /// Проверить, нужно ли озвучивать сообщение, и подготовить запрос
    pub fn prepare(&self, text: &str, speaker: &str, mode: SpeechMode) -> Result<SpeechRequest> {
        {
            let config = self.config.read();
            if !config.enabled {
                return Err(TtsError::Disabled);
            }

            let len = text.chars().count();
            if len > config.max_message_chars {
                return Err(TtsError::MessageTooLong { len, max: config.max_message_chars });
            }
        }

        SpeechRequest::prepare(text, speaker, mode)
    }

    /// Получить аудио для текста.
    ///
    /// `None` означает, что озвучивать нечего или синтез не удался;
    /// причина пишется в лог.
    pub async fn generate(&self, text: &str, speaker: &str, mode: SpeechMode) -> Option<Bytes> {
        let request = match self.prepare(text, speaker, mode) {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Skip TTS for speaker '{}': {}", speaker, e);
                return None;
            }
        };

        let SpeechRequest { speaker, text, key, .. } = request;
        let synthesizer = self.synthesizer.clone();

        self.coalescer
            .obtain(key, move || async move { synthesizer.synthesize(&speaker, &text).await })
            .await
    }

    /// Сгенерировать обе версии реплики: понятную и искаженную.
    ///
    /// Если хотя бы одна версия не получилась, не возвращается ничего.
    pub async fn speak(
        &self,
        message: &str,
        obfuscated: &str,
        speaker: &str,
        mode: SpeechMode,
    ) -> Option<SpeechAudio> {
        let clear = self.generate(message, speaker, mode).await?;
        let obfuscated = self.generate(obfuscated, speaker, mode).await?;

        Some(SpeechAudio { clear, obfuscated })
    }

    /// Убрать знаки ударения `+` из текста, который увидят игроки
    pub fn strip_stress_marks<'a>(&self, message: &'a str) -> Cow<'a, str> {
        if self.config.read().enabled && message.contains('+') {
            Cow::Owned(message.replace('+', ""))
        } else {
            Cow::Borrowed(message)
        }
    }

    /// Очистить кэш (например, при перезапуске раунда)
    pub fn reset_cache(&self) {
        log::info!("Resetting TTS cache");
        self.coalescer.reset();
    }

    /// Применить новую конфигурацию.
    ///
    /// Изменение размера кэша очищает кэш целиком. Размер кэша меняется под
    /// блокировкой конфигурации.
    pub fn update_config(&self, config: TtsConfig) -> Result<()> {
        config.validate()?;

        let mut current = self.config.write();
        let new_max = config.max_cached;
        let resized = current.max_cached != new_max;
        *current = config;

        if resized {
            self.coalescer.set_maximum(new_max);
            log::info!("TTS cache size changed to {}, cache cleared", new_max);
        }

        Ok(())
    }

    pub fn config(&self) -> TtsConfig {
        self.config.read().clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Текущий предельный размер кэша
    pub fn cache_maximum(&self) -> usize {
        self.coalescer.maximum()
    }

    pub fn cached_len(&self) -> usize {
        self.coalescer.cached_len()
    }
}

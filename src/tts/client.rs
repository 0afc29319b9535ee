//! Клиент HTTP API синтеза речи
//!
//! Запрос: `GET {api_url}?speaker=..&text=..&ext=ogg` с Bearer токеном.
//! Клиент никогда не возвращает ошибку вызывающему: любой неуспех
//! логируется, учитывается в метриках и превращается в `None`.

use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use crate::config::{TtsConfig, AUDIO_FORMAT};
use crate::error::{Result, SynthesisError};
use crate::metrics::{Outcome, TtsMetrics};
use super::SpeechSynthesizer;

/// Клиент API синтеза речи
pub struct HttpSynthesizer {
    client: Client,
    /// Актуальная конфигурация; адрес, токен и таймаут читаются на каждый запрос
    config: Arc<RwLock<TtsConfig>>,
    metrics: Arc<TtsMetrics>,
}

impl HttpSynthesizer {
    pub fn new(config: Arc<RwLock<TtsConfig>>, metrics: Arc<TtsMetrics>) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    /// Выполнить запрос и классифицировать исход
    pub async fn fetch(&self, speaker: &str, text: &str) -> std::result::Result<Bytes, SynthesisError> {
        let (api_url, api_token, timeout) = {
            let config = self.config.read();
            (config.api_url.clone(), config.api_token.clone(), config.timeout())
        };

        let request = async {
            let response = self
                .client
                .get(api_url.as_str())
                .query(&[("speaker", speaker), ("text", text), ("ext", AUDIO_FORMAT)])
                .bearer_auth(&api_token)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(SynthesisError::RateLimited);
            }
            if !status.is_success() {
                return Err(SynthesisError::UpstreamStatus(status));
            }

            Ok::<Bytes, SynthesisError>(response.bytes().await?)
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result.map_err(|e| match e {
                SynthesisError::Transport(e) if e.is_timeout() => SynthesisError::Timeout(timeout),
                other => other,
            }),
            Err(_) => Err(SynthesisError::Timeout(timeout)),
        }
    }

    fn report(&self, speaker: &str, text: &str, error: &SynthesisError, elapsed: Duration) {
        self.metrics.record_latency(error.outcome(), elapsed);

        match error {
            SynthesisError::RateLimited => {
                self.metrics.record_rate_limited();
                log::warn!("TTS API rate limited the request for speaker '{}'", speaker);
            }
            SynthesisError::UpstreamStatus(status) => {
                log::error!("TTS API responded with {} for speaker '{}'", status, speaker);
            }
            SynthesisError::Timeout(timeout) => {
                log::error!(
                    "TTS API did not respond within {:?} (speaker '{}', text '{}')",
                    timeout, speaker, text
                );
            }
            SynthesisError::Transport(e) => {
                log::error!(
                    "TTS request failed (speaker '{}', text '{}'): {:?}",
                    speaker, text, e
                );
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, speaker: &str, text: &str) -> Option<Bytes> {
        log::debug!("Requesting TTS audio for '{}' (speaker '{}')", text, speaker);

        let started = Instant::now();
        match self.fetch(speaker, text).await {
            Ok(audio) => {
                self.metrics.record_latency(Outcome::Success, started.elapsed());
                log::debug!(
                    "Received {} bytes of TTS audio for '{}' (speaker '{}')",
                    audio.len(), text, speaker
                );
                Some(audio)
            }
            Err(error) => {
                self.report(speaker, text, &error, started.elapsed());
                None
            }
        }
    }
}

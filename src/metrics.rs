//! Метрики запросов TTS
//!
//! Локальные счетчики дублируются в фасад `metrics`, чтобы приложение
//! могло подключить любой экспортер (например, Prometheus).

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use ::metrics::{counter, histogram};
use parking_lot::Mutex;

/// Сколько последних замеров задержки хранить в памяти
const MAX_LATENCY_SAMPLES: usize = 1000;

/// Класс исхода запроса к API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Timeout,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Снимок состояния метрик
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub requested: u64,
    pub served_from_cache: u64,
    pub rate_limited: u64,
    pub latencies: Vec<(Outcome, Duration)>,
}

impl MetricsSnapshot {
    /// Количество замеров задержки с указанной меткой
    pub fn latency_count(&self, outcome: Outcome) -> usize {
        self.latencies.iter().filter(|(o, _)| *o == outcome).count()
    }
}

/// Метрики TTS
#[derive(Debug, Default)]
pub struct TtsMetrics {
    requested: AtomicU64,
    served_from_cache: AtomicU64,
    rate_limited: AtomicU64,
    latencies: Mutex<VecDeque<(Outcome, Duration)>>,
}

impl TtsMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запрошена генерация аудио
    pub fn record_requested(&self) {
        self.requested.fetch_add(1, Ordering::Relaxed);
        counter!("tts_wanted_count").increment(1);
    }

    /// Аудио отдано из кэша
    pub fn record_cache_hit(&self) {
        self.served_from_cache.fetch_add(1, Ordering::Relaxed);
        counter!("tts_reused_count").increment(1);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
        counter!("tts_rate_limited_count").increment(1);
    }

    /// Записать задержку запроса к API с меткой исхода
    pub fn record_latency(&self, outcome: Outcome, elapsed: Duration) {
        {
            let mut latencies = self.latencies.lock();
            if latencies.len() == MAX_LATENCY_SAMPLES {
                latencies.pop_front();
            }
            latencies.push_back((outcome, elapsed));
        }

        histogram!("tts_req_timings", "type" => outcome.as_str()).record(elapsed.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requested: self.requested.load(Ordering::Relaxed),
            served_from_cache: self.served_from_cache.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            latencies: self.latencies.lock().iter().copied().collect(),
        }
    }
}

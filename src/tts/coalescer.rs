//! Объединение одинаковых запросов на генерацию речи
//!
//! Пока аудио для ключа генерируется, все новые запросы с тем же ключом
//! подписываются на уже запущенную генерацию, а не создают новую.
//! Кэш и карта выполняющихся запросов защищены одним мьютексом: так
//! завершение генерации не может разойтись с проверкой "есть ли запрос" у
//! нового вызова.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use crate::metrics::TtsMetrics;
use super::cache::{CacheKey, CacheStore};
use super::SpeechMode;

/// Результат генерации, общий для всех ожидающих
pub type SharedAudio = Shared<BoxFuture<'static, Option<Bytes>>>;

/// Ключ объединения запросов
///
/// Режим речи входит в ключ объединения, но не в ключ кэша: шепот и обычная
/// речь с одинаковым текстом используют одну запись кэша.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub cache_key: CacheKey,
    pub mode: SpeechMode,
}

struct CoalescerState {
    cache: CacheStore,
    pending: HashMap<RequestKey, SharedAudio>,
}

pub struct Coalescer {
    state: Arc<Mutex<CoalescerState>>,
    metrics: Arc<TtsMetrics>,
}

impl Coalescer {
    pub fn new(max_cached: usize, metrics: Arc<TtsMetrics>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CoalescerState {
                cache: CacheStore::new(max_cached),
                pending: HashMap::new(),
            })),
            metrics,
        }
    }

    /// Получить аудио из кэша, из уже идущей генерации или запустить новую.
    ///
    /// `producer` вызывается только если ни того, ни другого нет, и выполняется
    /// в отдельной задаче: отмена вызывающего не прерывает запрос к API.
    /// Неудачный результат (`None`) не кэшируется.
    ///
    /// Счетчик запросов увеличивают только попадание в кэш и запуск новой
    /// генерации; присоединившиеся к идущей генерации его не трогают.
    pub async fn obtain<F, Fut>(&self, key: RequestKey, producer: F) -> Option<Bytes>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Bytes>> + Send + 'static,
    {
        let (shared, sender) = {
            let mut state = self.state.lock();

            if let Some(audio) = state.cache.get(&key.cache_key) {
                self.metrics.record_requested();
                self.metrics.record_cache_hit();
                log::trace!("Use cached sound for key {}", key.cache_key);
                return Some(audio);
            }

            if let Some(pending) = state.pending.get(&key) {
                log::trace!("Attach to pending generation for key {}", key.cache_key);
                (pending.clone(), None)
            } else {
                self.metrics.record_requested();
                log::debug!("Generate new audio for key {}", key.cache_key);
                let (tx, rx) = oneshot::channel();
                let shared = async move { rx.await.unwrap_or(None) }.boxed().shared();
                state.pending.insert(key, shared.clone());
                (shared, Some(tx))
            }
        };

        if let Some(sender) = sender {
            let completion = Completion {
                state: self.state.clone(),
                key,
                sender: Some(sender),
            };
            let generation = producer();
            tokio::spawn(async move {
                let outcome = generation.await;
                completion.finish(outcome);
            });
        }

        shared.await
    }

    /// Очистить кэш. Выполняющиеся генерации не затрагиваются.
    pub fn reset(&self) {
        self.state.lock().cache.reset();
    }

    /// Изменить размер кэша; кэш при этом очищается
    pub fn set_maximum(&self, max_cached: usize) {
        self.state.lock().cache.set_maximum(max_cached);
    }

    pub fn maximum(&self) -> usize {
        self.state.lock().cache.maximum()
    }

    pub fn cached_len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }
}

/// Завершение генерации: запись в кэш, снятие запроса, рассылка результата.
///
/// Если генерация паникует, `Drop` все равно снимает запрос, а ожидающие
/// получают `None`.
struct Completion {
    state: Arc<Mutex<CoalescerState>>,
    key: RequestKey,
    sender: Option<oneshot::Sender<Option<Bytes>>>,
}

impl Completion {
    fn finish(mut self, outcome: Option<Bytes>) {
        {
            let mut state = self.state.lock();
            if let Some(audio) = &outcome {
                state.cache.put(self.key.cache_key, audio.clone());
            }
            state.pending.remove(&self.key);
        }

        if let Some(sender) = self.sender.take() {
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            log::error!("TTS generation for key {} ended without a result", self.key.cache_key);
            self.state.lock().pending.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use futures::future::join_all;

    fn request_key(text: &str, mode: SpeechMode) -> RequestKey {
        RequestKey {
            cache_key: CacheKey::new("speaker", text),
            mode,
        }
    }

    fn coalescer(max_cached: usize) -> Arc<Coalescer> {
        Arc::new(Coalescer::new(max_cached, Arc::new(TtsMetrics::new())))
    }

    /// Производитель, который считает вызовы и отвечает с задержкой
    fn counting_producer(
        calls: Arc<AtomicUsize>,
        result: Option<&'static str>,
    ) -> impl FnOnce() -> BoxFuture<'static, Option<Bytes>> {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                result.map(|audio| Bytes::from_static(audio.as_bytes()))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_share_one_call() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = request_key("привет", SpeechMode::Say);

        let tasks = (0..16).map(|_| {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                coalescer.obtain(key, counting_producer(calls, Some("ogg"))).await
            })
        });

        let results = join_all(tasks).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for result in results {
            assert_eq!(result.unwrap(), Some(Bytes::from_static(b"ogg")));
        }
        assert_eq!(coalescer.pending_len(), 0);
        assert_eq!(coalescer.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_producer() {
        let metrics = Arc::new(TtsMetrics::new());
        let coalescer = Coalescer::new(10, metrics.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = request_key("привет", SpeechMode::Say);

        coalescer.obtain(key, counting_producer(calls.clone(), Some("ogg"))).await;
        let second = coalescer.obtain(key, counting_producer(calls.clone(), Some("other"))).await;

        assert_eq!(second, Some(Bytes::from_static(b"ogg")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.served_from_cache, 1);
        assert_eq!(snapshot.requested, 2);
    }

    #[tokio::test]
    async fn test_followers_are_not_counted_as_requests() {
        let metrics = Arc::new(TtsMetrics::new());
        let coalescer = Arc::new(Coalescer::new(10, metrics.clone()));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = request_key("привет", SpeechMode::Say);

        let tasks = (0..8).map(|_| {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                coalescer.obtain(key, counting_producer(calls, Some("ogg"))).await
            })
        });
        join_all(tasks).await;

        let snapshot = metrics.snapshot();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.requested, 1);
        assert_eq!(snapshot.served_from_cache, 0);
        // Число реальных генераций равно разнице запросов и попаданий в кэш
        assert_eq!(
            snapshot.requested - snapshot.served_from_cache,
            calls.load(Ordering::SeqCst) as u64
        );
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = request_key("привет", SpeechMode::Say);

        assert_eq!(coalescer.obtain(key, counting_producer(calls.clone(), None)).await, None);
        assert_eq!(coalescer.pending_len(), 0);
        assert_eq!(coalescer.cached_len(), 0);

        let retry = coalescer.obtain(key, counting_producer(calls.clone(), Some("ogg"))).await;
        assert_eq!(retry, Some(Bytes::from_static(b"ogg")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_modes_coalesce_separately_but_share_cache() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let say = request_key("привет", SpeechMode::Say);
        let whisper = request_key("привет", SpeechMode::Whisper);

        let (a, b) = tokio::join!(
            coalescer.obtain(say, counting_producer(calls.clone(), Some("say"))),
            coalescer.obtain(whisper, counting_producer(calls.clone(), Some("whisper"))),
        );
        assert!(a.is_some() && b.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(coalescer.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_in_parallel() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));

        let started = std::time::Instant::now();
        let tasks = (0..8).map(|n| {
            let key = request_key(&format!("фраза {}", n), SpeechMode::Say);
            coalescer.obtain(key, counting_producer(calls.clone(), Some("ogg")))
        });
        let results = join_all(tasks).await;

        assert!(results.iter().all(Option::is_some));
        assert_eq!(calls.load(Ordering::SeqCst), 8);
        // Восемь последовательных вызовов заняли бы не меньше 400 мс
        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_cancel_generation() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = request_key("привет", SpeechMode::Say);

        let first = coalescer.obtain(key, counting_producer(calls.clone(), Some("ogg")));
        let abandoned = tokio::time::timeout(Duration::from_millis(5), first).await;
        assert!(abandoned.is_err());

        let second = coalescer.obtain(key, counting_producer(calls.clone(), Some("other"))).await;
        assert_eq!(second, Some(Bytes::from_static(b"ogg")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_producer_releases_key() {
        let coalescer = coalescer(10);
        let key = request_key("привет", SpeechMode::Say);

        let result = coalescer
            .obtain(key, || async {
                if true {
                    panic!("synthesis exploded");
                }
                Option::<Bytes>::None
            })
            .await;
        assert_eq!(result, None);
        assert_eq!(coalescer.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_set_maximum_clears_cache() {
        let coalescer = coalescer(10);
        let calls = Arc::new(AtomicUsize::new(0));
        coalescer
            .obtain(request_key("а", SpeechMode::Say), counting_producer(calls, Some("ogg")))
            .await;
        assert_eq!(coalescer.cached_len(), 1);

        coalescer.set_maximum(20);
        assert_eq!(coalescer.cached_len(), 0);
        assert_eq!(coalescer.maximum(), 20);
    }
}

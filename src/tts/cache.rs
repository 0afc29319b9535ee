//! Модуль для кэширования результатов TTS
//!
//! Кэш хранит сгенерированное аудио в памяти и вытесняет записи в порядке
//! добавления (FIFO). Обращение к записи не продлевает ей жизнь.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use bytes::Bytes;

/// Ключ кэша: md5 от пары (голос, текст)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 16]);

impl CacheKey {
    /// Генерировать ключ для кэша
    pub fn new(speaker: &str, text: &str) -> Self {
        let mut hasher = md5::Context::new();
        hasher.consume(speaker.as_bytes());
        hasher.consume(b"/");
        hasher.consume(text.as_bytes());

        Self(hasher.compute().0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Ограниченный по количеству записей кэш аудио
///
/// Сам по себе кэш не синхронизирован: им владеет `Coalescer`, который
/// защищает его тем же мьютексом, что и карту выполняющихся запросов.
#[derive(Debug)]
pub struct CacheStore {
    /// Аудио по ключу
    entries: HashMap<CacheKey, Bytes>,
    /// Ключи в порядке добавления
    order: VecDeque<CacheKey>,
    /// Максимальное количество записей
    max_entries: usize,
}

impl CacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    /// Добавить аудио в кэш и вытеснить самые старые записи сверх лимита
    pub fn put(&mut self, key: CacheKey, audio: Bytes) {
        if self.entries.insert(key, audio).is_none() {
            self.order.push_back(key);
        }

        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    /// Очистить кэш
    pub fn reset(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Изменить лимит. Кэш при этом очищается целиком, даже если новый лимит больше.
    pub fn set_maximum(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.reset();
    }

    pub fn maximum(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

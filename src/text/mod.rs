//! Нормализация текста перед синтезом речи
//!
//! Этот модуль превращает сообщения чата в текст, который движок синтеза
//! может корректно произнести: без разметки, латиницы, аббревиатур и цифр.

pub mod numerals;
pub mod sanitizer;
pub mod tables;

pub use numerals::{to_words, Gender};
pub use sanitizer::sanitize;

//! Подготовка текста чата для синтеза речи
//!
//! Очистка выполняется цепочкой независимых преобразований. Порядок важен:
//! каждое следующее преобразование рассчитывает на результат предыдущего.

use std::borrow::Cow;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use super::numerals::{to_words, Gender};
use super::tables::{ABBREVIATIONS, DECIMAL_POINT, MAX_TRANSLIT_LEN, TRANSLIT};

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(
        r"\[(/?font.*?|/?bold|/?italic|/?color.*?|/?Name|/?BubbleHeader|/?BubbleContent)\]"
    ).unwrap();
    static ref UNWANTED_CHARS_REGEX: Regex = Regex::new(r"[^a-zA-Zа-яА-ЯёЁ0-9,\-+?!. ]").unwrap();
    static ref NUMBERS_REGEX: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Одно преобразование текста
pub type Stage = fn(&str) -> String;

/// Этапы очистки в порядке применения
pub const STAGES: [(&str, Stage); 6] = [
    ("strip_markup", strip_markup),
    ("filter_allowed", filter_allowed),
    ("transliterate", transliterate),
    ("expand_abbreviations", expand_abbreviations),
    ("rewrite_decimal_separators", rewrite_decimal_separators),
    ("expand_numbers", expand_numbers),
];

/// Очистить текст для синтеза речи.
///
/// Пустой результат означает, что озвучивать нечего.
pub fn sanitize(text: &str) -> String {
    let text = STAGES
        .iter()
        .fold(text.trim().to_string(), |text, (name, stage)| {
            let next = stage(&text);
            log::trace!("sanitize {}: {:?} -> {:?}", name, text, next);
            next
        });

    text.trim().to_string()
}

/// Буква, которую знает очистка: латиница или русский алфавит
pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || is_cyrillic(c)
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Удалить теги разметки чата (`[bold]`, `[color=red]` и т.д.)
pub fn strip_markup(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Удалить все символы, кроме букв, цифр, пробела и `, - + ? ! .`
pub fn filter_allowed(text: &str) -> String {
    UNWANTED_CHARS_REGEX.replace_all(text, "").into_owned()
}

/// Заменить латиницу кириллицей, начиная с самых длинных сочетаний
pub fn transliterate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_alphabetic() {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        let longest = chars[i..]
            .iter()
            .take(MAX_TRANSLIT_LEN)
            .take_while(|c| c.is_ascii_alphabetic())
            .count();

        let matched = (1..=longest).rev().find_map(|len| {
            let key: String = chars[i..i + len].iter().map(|c| c.to_ascii_lowercase()).collect();
            TRANSLIT.get(key.as_str()).map(|replacement| (len, *replacement))
        });

        match matched {
            Some((len, replacement)) => {
                result.push_str(replacement);
                i += len;
            }
            None => {
                result.push(chars[i]);
                i += 1;
            }
        }
    }

    result
}

/// Раскрыть аббревиатуры в произношение по буквам
pub fn expand_abbreviations(text: &str) -> String {
    map_letter_runs(text, |word| {
        let lower = word.to_lowercase();
        match ABBREVIATIONS.get(lower.as_str()) {
            Some(expansion) => Cow::Borrowed(*expansion),
            None => Cow::Borrowed(word),
        }
    })
}

/// Заменить десятичный разделитель между цифрами словом "целых"
pub fn rewrite_decimal_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).map_or(false, |next| next.is_ascii_digit());

        if (c == '.' || c == ',') && between_digits {
            result.push(' ');
            result.push_str(DECIMAL_POINT);
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

/// Записать последовательности цифр словами
///
/// Слишком большие числа остаются цифрами.
pub fn expand_numbers(text: &str) -> String {
    NUMBERS_REGEX
        .replace_all(text, |caps: &Captures| {
            let digits = &caps[0];
            let words = digits
                .parse::<i64>()
                .map(|number| to_words(number, Gender::Masculine))
                .unwrap_or_default();

            if words.is_empty() {
                digits.to_string()
            } else {
                words
            }
        })
        .into_owned()
}

/// Применить `f` к каждой максимальной последовательности букв
fn map_letter_runs<'a, F>(text: &'a str, mut f: F) -> String
where
    F: FnMut(&'a str) -> Cow<'a, str>,
{
    let mut result = String::with_capacity(text.len());
    let mut run_start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        match (is_letter(c), run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                result.push_str(&f(&text[start..idx]));
                run_start = None;
                result.push(c);
            }
            (false, None) => result.push(c),
            (true, Some(_)) => {}
        }
    }

    if let Some(start) = run_start {
        result.push_str(&f(&text[start..]));
    }

    result
}

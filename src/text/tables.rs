//! Статические таблицы для нормализации текста
//!
//! Таблицы строятся один раз при первом обращении и больше не изменяются.

use std::collections::HashMap;
use lazy_static::lazy_static;

/// Самая длинная последовательность латинских букв в таблице транслитерации
pub const MAX_TRANSLIT_LEN: usize = 3;

lazy_static! {
    /// Латиница → кириллица. Ключи в нижнем регистре.
    pub static ref TRANSLIT: HashMap<&'static str, &'static str> = [
        ("jsh", "щ"),
        ("je", "ё"),
        ("zh", "ж"),
        ("ch", "ч"),
        ("hh", "ъ"),
        ("sh", "ш"),
        ("ih", "ы"),
        ("jh", "ь"),
        ("eh", "э"),
        ("ju", "ю"),
        ("ja", "я"),
        ("a", "а"),
        ("b", "б"),
        ("v", "в"),
        ("g", "г"),
        ("d", "д"),
        ("e", "е"),
        ("z", "з"),
        ("i", "и"),
        ("j", "й"),
        ("y", "й"),
        ("k", "к"),
        ("l", "л"),
        ("m", "м"),
        ("n", "н"),
        ("o", "о"),
        ("p", "п"),
        ("q", "к"),
        ("r", "р"),
        ("s", "с"),
        ("t", "т"),
        ("u", "у"),
        ("f", "ф"),
        ("h", "х"),
        ("c", "ц"),
        ("w", "в"),
        ("x", "кс"),
    ]
    .into_iter()
    .collect();

    /// Аббревиатуры, которые нужно произносить по буквам. Ключи в нижнем регистре.
    ///
    /// Букву "К" записываем как "Каа", а не "Ка": "ка" сама есть ключ таблицы,
    /// и повторная очистка текста раскрыла бы ее еще раз. Произношение
    /// от этого чуть тянется.
    pub static ref ABBREVIATIONS: HashMap<&'static str, &'static str> = [
        ("нт", "Эн Тэ"),
        ("смо", "Эс Мэ О"),
        ("гп", "Гэ Пэ"),
        ("рд", "Эр Дэ"),
        ("гсб", "Гэ Эс Бэ"),
        ("гв", "Гэ Вэ"),
        ("нр", "Эн Эр"),
        ("нра", "Эн Эра"),
        ("нру", "Эн Эру"),
        ("км", "Кэ Эм"),
        ("кма", "Кэ Эма"),
        ("кму", "Кэ Эму"),
        ("си", "Эс И"),
        ("срп", "Эс Эр Пэ"),
        ("цк", "Цэ Каа"),
        ("сцк", "Эс Цэ Каа"),
        ("пцк", "Пэ Цэ Каа"),
        ("оцк", "О Цэ Каа"),
        ("шцк", "Эш Цэ Каа"),
        ("ншцк", "Эн Эш Цэ Каа"),
        ("дсо", "Дэ Эс О"),
        ("рнд", "Эр Эн Дэ"),
        ("сб", "Эс Бэ"),
        ("рцд", "Эр Цэ Дэ"),
        ("брпд", "Бэ Эр Пэ Дэ"),
        ("рпд", "Эр Пэ Дэ"),
        ("рпед", "Эр Пед"),
        ("тсф", "Тэ Эс Эф"),
        ("срт", "Эс Эр Тэ"),
        ("обр", "О Бэ Эр"),
        ("кпк", "Кэ Пэ Каа"),
        ("пда", "Пэ Дэ А"),
        ("id", "Ай Ди"),
        ("мщ", "Эм Ще"),
        ("вт", "Вэ Тэ"),
        ("wt", "Вэ Тэ"),
        ("ерп", "Йе Эр Пэ"),
        ("се", "Эс Йе"),
        ("апц", "А Пэ Цэ"),
        ("лкп", "Эл Каа Пэ"),
        ("см", "Эс Эм"),
        ("ека", "Йе Каа"),
        ("ка", "Кэ А"),
        ("бса", "Бэ Эс Аа"),
        ("тк", "Тэ Каа"),
        ("бфл", "Бэ Эф Эл"),
        ("бщ", "Бэ Щэ"),
        ("кк", "Кэ Каа"),
        ("ск", "Эс Каа"),
        ("зк", "Зэ Каа"),
        ("ерт", "Йе Эр Тэ"),
        ("вкд", "Вэ Каа Дэ"),
        ("нтр", "Эн Тэ Эр"),
        ("пнт", "Пэ Эн Тэ"),
        ("авд", "А Вэ Дэ"),
        ("пнв", "Пэ Эн Вэ"),
        ("ссд", "Эс Эс Дэ"),
        ("крс", "Каа Эр Эс"),
        ("кпб", "Кэ Пэ Бэ"),
        ("сссп", "Эс Эс Эс Пэ"),
        ("крб", "Каа Эр Бэ"),
        ("бд", "Бэ Дэ"),
        ("сст", "Эс Эс Тэ"),
        ("скс", "Эс Каа Эс"),
        ("икн", "И Каа Эн"),
        ("нсс", "Эн Эс Эс"),
        ("емп", "Йе Эм Пэ"),
        ("бс", "Бэ Эс"),
        ("цкс", "Цэ Каа Эс"),
        ("срд", "Эс Эр Дэ"),
        ("жпс", "Джи Пи Эс"),
        ("gps", "Джи Пи Эс"),
        ("ннксс", "Эн Эн Каа Эс Эс"),
        ("ss", "Эс Эс"),
        ("тесла", "тэсла"),
        ("трейзен", "трэйзэн"),
        ("нанотрейзен", "нанотрэйзэн"),
        ("рпзд", "Эр Пэ Зэ Дэ"),
        ("кз", "Кэ Зэ"),
        ("рхбз", "Эр Хэ Бэ Зэ"),
        ("рхбзз", "Эр Хэ Бэ Зэ Зэ"),
        ("днк", "Дэ Эн Каа"),
        ("мк", "Эм Каа"),
        ("mk", "Эм Каа"),
        ("рпг", "Эр Пэ Гэ"),
        ("бсс", "Бэ Эс Эс"),
        ("сии", "Эс И И"),
        ("ии", "И И"),
        ("опз", "О Пэ Зэ"),
    ]
    .into_iter()
    .collect();
}

/// Числительные 0-19 мужского рода
pub const UNITS_MASCULINE: [&str; 20] = [
    "", "один", "два", "три", "четыре", "пять", "шесть",
    "семь", "восемь", "девять", "десять", "одиннадцать",
    "двенадцать", "тринадцать", "четырнадцать", "пятнадцать",
    "шестнадцать", "семнадцать", "восемнадцать", "девятнадцать",
];

/// Числительные 0-19 женского рода
pub const UNITS_FEMININE: [&str; 20] = [
    "", "одна", "две", "три", "четыре", "пять", "шесть",
    "семь", "восемь", "девять", "десять", "одиннадцать",
    "двенадцать", "тринадцать", "четырнадцать", "пятнадцать",
    "шестнадцать", "семнадцать", "восемнадцать", "девятнадцать",
];

pub const TENS: [&str; 10] = [
    "", "десять", "двадцать", "тридцать", "сорок", "пятьдесят",
    "шестьдесят", "семьдесят", "восемьдесят", "девяносто",
];

pub const HUNDREDS: [&str; 10] = [
    "", "сто", "двести", "триста", "четыреста",
    "пятьсот", "шестьсот", "семьсот", "восемьсот", "девятьсот",
];

pub const ZERO: &str = "ноль";
pub const MINUS: &str = "минус";
pub const DECIMAL_POINT: &str = "целых";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translit_covers_latin_alphabet() {
        for c in 'a'..='z' {
            let key = c.to_string();
            assert!(TRANSLIT.contains_key(key.as_str()), "missing {}", c);
        }
        assert!(TRANSLIT.keys().all(|k| k.len() <= MAX_TRANSLIT_LEN));
    }

    #[test]
    fn test_expansions_are_not_abbreviations() {
        // Иначе повторная очистка текста меняла бы результат
        for expansion in ABBREVIATIONS.values() {
            for word in expansion.split(' ') {
                let lower = word.to_lowercase();
                assert!(
                    !ABBREVIATIONS.contains_key(lower.as_str()),
                    "expansion {:?} contains abbreviation {:?}",
                    expansion,
                    word
                );
            }
        }
    }
}

//! Запись целых чисел словами с учетом рода и склонения
//!
//! ```
//! use chat_tts::text::numerals::{to_words, Gender};
//!
//! assert_eq!(to_words(21, Gender::Masculine), "двадцать один");
//! assert_eq!(to_words(2002, Gender::Feminine), "две тысячи две");
//! ```

use super::tables::{HUNDREDS, MINUS, TENS, UNITS_FEMININE, UNITS_MASCULINE, ZERO};

/// Граница поддерживаемых значений: числа по модулю от 10^15 не озвучиваются
pub const MAX_MAGNITUDE: u64 = 1_000_000_000_000_000;

/// Грамматический род числительного
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Masculine,
    Feminine,
}

/// Формы существительного-разряда: "один", "два-четыре", "пять и больше"
struct ScaleWord {
    power: u64,
    one: &'static str,
    few: &'static str,
    many: &'static str,
    gender: Gender,
}

const SCALES: [ScaleWord; 4] = [
    ScaleWord { power: 1_000_000_000_000, one: "триллион", few: "триллиона", many: "триллионов", gender: Gender::Masculine },
    ScaleWord { power: 1_000_000_000, one: "миллиард", few: "миллиарда", many: "миллиардов", gender: Gender::Masculine },
    ScaleWord { power: 1_000_000, one: "миллион", few: "миллиона", many: "миллионов", gender: Gender::Masculine },
    ScaleWord { power: 1_000, one: "тысяча", few: "тысячи", many: "тысяч", gender: Gender::Feminine },
];

impl ScaleWord {
    fn declension(&self, chunk: u64) -> &'static str {
        if (11..=19).contains(&(chunk % 100)) {
            return self.many;
        }
        match chunk % 10 {
            1 => self.one,
            2..=4 => self.few,
            _ => self.many,
        }
    }
}

/// Записать число словами.
///
/// Для значений по модулю от 10^15 возвращает пустую строку: вызывающий код
/// должен оставить цифры как есть.
pub fn to_words(value: i64, gender: Gender) -> String {
    let magnitude = value.unsigned_abs();
    if magnitude >= MAX_MAGNITUDE {
        return String::new();
    }
    if magnitude == 0 {
        return ZERO.to_string();
    }

    let mut parts: Vec<&'static str> = Vec::new();
    if value < 0 {
        parts.push(MINUS);
    }

    for scale in &SCALES {
        let chunk = (magnitude / scale.power) % 1000;
        if chunk > 0 {
            push_chunk(&mut parts, chunk, scale.gender);
            parts.push(scale.declension(chunk));
        }
    }

    push_chunk(&mut parts, magnitude % 1000, gender);

    parts.join(" ")
}

/// Добавить слова для числа 0-999; ноль ничего не добавляет
fn push_chunk(parts: &mut Vec<&'static str>, chunk: u64, gender: Gender) {
    let units = match gender {
        Gender::Masculine => &UNITS_MASCULINE,
        Gender::Feminine => &UNITS_FEMININE,
    };

    let hundreds = (chunk / 100) as usize;
    let less100 = (chunk % 100) as usize;

    let words = if less100 < 20 {
        [HUNDREDS[hundreds], units[less100], ""]
    } else {
        [HUNDREDS[hundreds], TENS[less100 / 10], units[less100 % 10]]
    };

    parts.extend(words.into_iter().filter(|w| !w.is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gender::{Feminine, Masculine};

    #[test]
    fn test_zero() {
        assert_eq!(to_words(0, Masculine), "ноль");
        assert_eq!(to_words(0, Feminine), "ноль");
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(to_words(1, Masculine), "один");
        assert_eq!(to_words(1, Feminine), "одна");
        assert_eq!(to_words(15, Masculine), "пятнадцать");
        assert_eq!(to_words(20, Masculine), "двадцать");
        assert_eq!(to_words(21, Masculine), "двадцать один");
        assert_eq!(to_words(42, Feminine), "сорок две");
        assert_eq!(to_words(100, Masculine), "сто");
        assert_eq!(to_words(119, Masculine), "сто девятнадцать");
        assert_eq!(to_words(999, Masculine), "девятьсот девяносто девять");
    }

    #[test]
    fn test_thousands_are_feminine() {
        assert_eq!(to_words(1000, Masculine), "одна тысяча");
        assert_eq!(to_words(1000, Feminine), "одна тысяча");
        assert_eq!(to_words(2000, Masculine), "две тысячи");
        assert_eq!(to_words(5000, Masculine), "пять тысяч");
        assert_eq!(to_words(21_001, Masculine), "двадцать одна тысяча один");
    }

    #[test]
    fn test_teen_chunks_use_many_form() {
        assert_eq!(to_words(11_000, Masculine), "одиннадцать тысяч");
        assert_eq!(to_words(12_000_000, Masculine), "двенадцать миллионов");
        assert_eq!(to_words(111_000, Masculine), "сто одиннадцать тысяч");
        assert_eq!(to_words(114_000, Masculine), "сто четырнадцать тысяч");
    }

    #[test]
    fn test_higher_periods_are_masculine() {
        assert_eq!(to_words(1_000_000, Masculine), "один миллион");
        assert_eq!(to_words(2_000_000_000, Feminine), "два миллиарда");
        assert_eq!(to_words(3_000_000_000_000, Masculine), "три триллиона");
        assert_eq!(
            to_words(1_002_003_004, Masculine),
            "один миллиард два миллиона три тысячи четыре"
        );
    }

    #[test]
    fn test_negative() {
        assert_eq!(to_words(-5, Masculine), "минус пять");
        assert_eq!(to_words(-1001, Masculine), "минус одна тысяча один");
    }

    #[test]
    fn test_unsupported_magnitude() {
        assert_eq!(to_words(1_000_000_000_000_000, Masculine), "");
        assert_eq!(to_words(-1_000_000_000_000_000, Masculine), "");
        assert_eq!(to_words(i64::MAX, Masculine), "");
        assert_eq!(to_words(i64::MIN, Masculine), "");
        assert!(!to_words(999_999_999_999_999, Masculine).is_empty());
    }

    #[test]
    fn test_no_stray_spaces() {
        for value in [1, 10, 100, 1000, 1_000_000, 1_000_000_000_000, 100_010] {
            let words = to_words(value, Masculine);
            assert_eq!(words.trim(), words);
            assert!(!words.contains("  "), "{:?}", words);
        }
    }
}

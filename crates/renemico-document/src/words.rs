// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// French number-to-words conversion for amounts printed on invoices and
// statements.
//
// Words are assembled lower-case and only the first letter of the final
// string is capitalized. Orthography follows the traditional rules: "et"
// liaison for 21..71 (not 81/91), "quatre-vingts" and "cents" take an "s"
// when they end the number and are not followed by "mille", "mille" never
// takes "un" and never pluralizes, "million"/"milliard" do.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Returned for negative, non-finite or non-numeric input.
pub const INVALID: &str = "Nombre invalide";

const SMALL: [&str; 17] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze",
    "douze", "treize", "quatorze", "quinze", "seize",
];

const TENS: [&str; 7] = ["", "", "vingt", "trente", "quarante", "cinquante", "soixante"];

/// 0..=99. `plural` allows the trailing "s" of "quatre-vingts".
fn below_hundred(n: u64, plural: bool) -> String {
    match n {
        0..=16 => SMALL[n as usize].to_string(),
        17..=19 => format!("dix-{}", SMALL[(n - 10) as usize]),
        20..=69 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                1 => format!("{tens}-et-un"),
                u => format!("{tens}-{}", SMALL[u as usize]),
            }
        }
        70..=79 => {
            let link = if n == 71 { "-et-" } else { "-" };
            format!("soixante{link}{}", below_hundred(n - 60, plural))
        }
        80 if plural => "quatre-vingts".to_string(),
        80 => "quatre-vingt".to_string(),
        _ => format!("quatre-vingt-{}", below_hundred(n - 80, plural)),
    }
}

/// 1..=999.
fn below_thousand(n: u64, plural: bool) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    let head = match hundreds {
        0 => None,
        1 => Some("cent".to_string()),
        h if rest == 0 && plural => Some(format!("{} cents", SMALL[h as usize])),
        h => Some(format!("{} cent", SMALL[h as usize])),
    };
    let tail = (rest > 0).then(|| below_hundred(rest, plural));
    match (head, tail) {
        (Some(h), Some(t)) => format!("{h} {t}"),
        (Some(h), None) => h,
        (None, Some(t)) => t,
        (None, None) => String::new(),
    }
}

/// Lower-case words for `n > 0`.
fn spell(n: u64) -> String {
    const BILLION: u64 = 1_000_000_000;
    const MILLION: u64 = 1_000_000;

    let mut parts: Vec<String> = Vec::new();

    let billions = n / BILLION;
    if billions == 1 {
        parts.push("un milliard".into());
    } else if billions > 1 {
        parts.push(format!("{} milliards", spell(billions)));
    }

    let millions = (n / MILLION) % 1000;
    if millions == 1 {
        parts.push("un million".into());
    } else if millions > 1 {
        parts.push(format!("{} millions", below_thousand(millions, true)));
    }

    let thousands = (n / 1000) % 1000;
    if thousands == 1 {
        parts.push("mille".into());
    } else if thousands > 1 {
        parts.push(format!("{} mille", below_thousand(thousands, false)));
    }

    let rest = n % 1000;
    if rest > 0 {
        parts.push(below_thousand(rest, true));
    }

    parts.join(" ")
}

fn lower_words(n: u64) -> String {
    if n == 0 {
        SMALL[0].to_string()
    } else {
        spell(n)
    }
}

fn capitalize(words: &str) -> String {
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalized French words for a non-negative integer.
pub fn integer_to_words(n: u64) -> String {
    capitalize(&lower_words(n))
}

/// Split a non-negative amount into whole units and rounded cents.
fn split_cents(value: Decimal) -> Option<(u64, u64)> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    let cents_total = value.checked_mul(Decimal::ONE_HUNDRED)?.round().to_u64()?;
    Some((cents_total / 100, cents_total % 100))
}

/// Words for a decimal amount: `"Douze et cinquante"` for 12.50.
pub fn decimal_to_words(value: Decimal) -> String {
    match split_cents(value) {
        None => INVALID.to_string(),
        Some((units, 0)) => integer_to_words(units),
        Some((units, cents)) => {
            capitalize(&format!("{} et {}", lower_words(units), lower_words(cents)))
        }
    }
}

/// Words for a float; NaN, infinities and negatives are invalid.
pub fn number_to_words(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return INVALID.to_string();
    }
    match Decimal::try_from(value) {
        Ok(d) => decimal_to_words(d),
        Err(_) => INVALID.to_string(),
    }
}

/// Words for user-provided text; anything that is not a number is invalid.
pub fn text_to_words(input: &str) -> String {
    match Decimal::from_str(input.trim()) {
        Ok(d) => decimal_to_words(d),
        Err(_) => INVALID.to_string(),
    }
}

/// The amount-in-words line of invoices and statements:
/// `"Cent vingt-trois dollars américains et cinquante cents"`.
pub fn amount_in_words(amount: Decimal, currency: &str) -> String {
    match split_cents(amount) {
        None => INVALID.to_string(),
        Some((units, 0)) => format!("{} {currency}", integer_to_words(units)),
        Some((units, cents)) => format!(
            "{} {currency} et {} cents",
            integer_to_words(units),
            lower_words(cents)
        ),
    }
}

/// Greedy word wrap to lines of at most `width` characters. A single word
/// longer than `width` gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_outputs() {
        let cases = [
            (0, "Zéro"),
            (1, "Un"),
            (16, "Seize"),
            (17, "Dix-sept"),
            (21, "Vingt-et-un"),
            (61, "Soixante-et-un"),
            (70, "Soixante-dix"),
            (71, "Soixante-et-onze"),
            (72, "Soixante-douze"),
            (77, "Soixante-dix-sept"),
            (80, "Quatre-vingts"),
            (81, "Quatre-vingt-un"),
            (90, "Quatre-vingt-dix"),
            (91, "Quatre-vingt-onze"),
            (99, "Quatre-vingt-dix-neuf"),
            (100, "Cent"),
            (101, "Cent un"),
            (123, "Cent vingt-trois"),
            (180, "Cent quatre-vingts"),
            (200, "Deux cents"),
            (201, "Deux cent un"),
            (1000, "Mille"),
            (1001, "Mille un"),
            (2080, "Deux mille quatre-vingts"),
            (80_000, "Quatre-vingt mille"),
            (200_000, "Deux cent mille"),
            (1_000_000, "Un million"),
            (2_000_000, "Deux millions"),
            (200_000_000, "Deux cents millions"),
            (1_000_000_000, "Un milliard"),
            (3_000_000_021, "Trois milliards vingt-et-un"),
        ];
        for (n, expected) in cases {
            assert_eq!(integer_to_words(n), expected, "n = {n}");
        }
    }

    #[test]
    fn decimals_join_with_et() {
        assert_eq!(decimal_to_words(Decimal::new(1250, 2)), "Douze et cinquante");
        assert_eq!(decimal_to_words(Decimal::new(500, 2)), "Cinq");
        assert_eq!(number_to_words(0.5), "Zéro et cinquante");
        assert_eq!(number_to_words(99.999), "Cent");
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(number_to_words(-1.0), INVALID);
        assert_eq!(number_to_words(f64::NAN), INVALID);
        assert_eq!(decimal_to_words(Decimal::new(-5, 0)), INVALID);
        assert_eq!(text_to_words("douze"), INVALID);
        assert_eq!(text_to_words("42"), "Quarante-deux");
    }

    #[test]
    fn huge_values_are_invalid() {
        assert_eq!(text_to_words("79228162514264337593543950335"), INVALID);
        assert_eq!(number_to_words(1e28), INVALID);
        assert_eq!(decimal_to_words(Decimal::MAX), INVALID);
        assert_eq!(amount_in_words(Decimal::MAX, "dollars"), INVALID);
        assert_eq!(number_to_words(1e20), INVALID);
    }

    #[test]
    fn amount_line() {
        assert_eq!(
            amount_in_words(Decimal::new(123, 0), "dollars américains"),
            "Cent vingt-trois dollars américains"
        );
        assert_eq!(
            amount_in_words(Decimal::new(12350, 2), "dollars américains"),
            "Cent vingt-trois dollars américains et cinquante cents"
        );
    }

    #[test]
    fn wrapping_respects_width() {
        let text = amount_in_words(Decimal::new(987_654_321_99, 2), "dollars américains");
        let lines = wrap_words(&text, 80);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 80));
        assert_eq!(lines.join(" "), text);
        assert!(wrap_words("", 80).is_empty());
    }
}

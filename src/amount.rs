//! Ingredient amount parsing.
//!
//! Amounts are written by hand on the recipe pages: `500g`, `½ Stiel/e`,
//! `1,5 l`, `2 ½ EL`, `etwas`. [`split_amount`] separates the leading numeral
//! from the unit text, [`normalize_value`] turns that numeral into a number.

use crate::model::AmountValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode vulgar fraction glyphs and their values
pub const FRACTIONS: [(char, f64); 18] = [
    ('½', 1.0 / 2.0),
    ('⅓', 1.0 / 3.0),
    ('⅕', 1.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅛', 1.0 / 8.0),
    ('⅔', 2.0 / 3.0),
    ('⅖', 2.0 / 5.0),
    ('⅚', 5.0 / 6.0),
    ('⅜', 3.0 / 8.0),
    ('¾', 3.0 / 4.0),
    ('⅗', 3.0 / 5.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
    ('⅘', 4.0 / 5.0),
    ('¼', 1.0 / 4.0),
    ('⅐', 1.0 / 7.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 1.0 / 10.0),
];

fn fraction_glyphs() -> String {
    FRACTIONS.iter().map(|(glyph, _)| *glyph).collect()
}

/// Value of a single fraction glyph
pub fn fraction_value(glyph: char) -> Option<f64> {
    FRACTIONS
        .iter()
        .find(|(g, _)| *g == glyph)
        .map(|(_, value)| *value)
}

/// Number (with optional fraction glyph) followed by an optional unit
static AMOUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*([0-9]*\s*[{}]|[0-9,.]+)\s*(\w.*)?$",
        fraction_glyphs()
    ))
    .unwrap()
});

static VALUE_WITH_FRACTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^([0-9]*)\s*([{}])$", fraction_glyphs())).unwrap());

static DECIMAL_COMMA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+),([0-9]+)$").unwrap());

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

// Not anchored at the end: anything after the decimal number is dropped.
static DECIMAL_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+").unwrap());

/// Split an amount like `500g` or `½ Stiel/e` into its value and unit.
///
/// Returns `(None, Some(amount))` when the amount has no leading numeral, so
/// the whole text ends up as the unit.
pub fn split_amount(amount: &str) -> (Option<String>, Option<String>) {
    match AMOUNT_REGEX.captures(amount) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, Some(amount.to_string())),
    }
}

/// Normalize a numeric value token split off an amount.
///
/// Decimal commas become points (which misreads thousands separators such
/// as `1,234`), fraction glyphs are added to the optional whole number.
/// Tokens that can't be read as a number are returned trimmed, as text.
pub fn normalize_value(token: Option<&str>) -> Option<AmountValue> {
    let token = token?.trim();
    let token = DECIMAL_COMMA_REGEX.replace(token, "$1.$2");

    if let Some(caps) = VALUE_WITH_FRACTION_REGEX.captures(&token) {
        let whole = match &caps[1] {
            "" => 0.0,
            digits => digits.parse::<f64>().unwrap_or(0.0),
        };
        let fraction = caps[2].chars().next().and_then(fraction_value);
        if let Some(fraction) = fraction {
            return Some(AmountValue::Float(whole + fraction));
        }
    }

    if INTEGER_REGEX.is_match(&token) {
        return Some(match token.parse::<u64>() {
            Ok(n) => AmountValue::Integer(n),
            Err(_) => AmountValue::BigInteger(token.into_owned()),
        });
    }

    if let Some(m) = DECIMAL_PREFIX_REGEX.find(&token) {
        if let Ok(x) = m.as_str().parse::<f64>() {
            return Some(AmountValue::Float(x));
        }
    }

    Some(AmountValue::Text(token.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(value: Option<&str>, unit: Option<&str>) -> (Option<String>, Option<String>) {
        (value.map(String::from), unit.map(String::from))
    }

    #[test]
    fn test_split_number_with_attached_unit() {
        assert_eq!(split_amount("500g"), parts(Some("500"), Some("g")));
    }

    #[test]
    fn test_split_fraction_glyph() {
        assert_eq!(split_amount("½ Stiel/e"), parts(Some("½"), Some("Stiel/e")));
        assert_eq!(split_amount("2 ½ EL"), parts(Some("2 ½"), Some("EL")));
        assert_eq!(split_amount("1¼ Liter"), parts(Some("1¼"), Some("Liter")));
    }

    #[test]
    fn test_split_decimal_comma_and_point() {
        assert_eq!(split_amount("1,5 l"), parts(Some("1,5"), Some("l")));
        assert_eq!(split_amount("0.25 kg"), parts(Some("0.25"), Some("kg")));
    }

    #[test]
    fn test_split_without_unit() {
        assert_eq!(split_amount("3"), parts(Some("3"), None));
        assert_eq!(split_amount("¾"), parts(Some("¾"), None));
    }

    #[test]
    fn test_split_skips_leading_whitespace() {
        assert_eq!(split_amount("  2 Dose/n"), parts(Some("2"), Some("Dose/n")));
    }

    #[test]
    fn test_split_without_numeral_keeps_text_as_unit() {
        assert_eq!(split_amount("etwas"), parts(None, Some("etwas")));
        assert_eq!(
            split_amount("nach Geschmack"),
            parts(None, Some("nach Geschmack"))
        );
    }

    #[test]
    fn test_split_range_does_not_match() {
        // the unit must start with a word character
        assert_eq!(
            split_amount("1-2 Zehe/n"),
            parts(None, Some("1-2 Zehe/n"))
        );
    }

    #[test]
    fn test_normalize_integer() {
        assert_eq!(normalize_value(Some("500")), Some(AmountValue::Integer(500)));
        assert_eq!(normalize_value(Some(" 12 ")), Some(AmountValue::Integer(12)));
    }

    #[test]
    fn test_normalize_decimal_comma() {
        assert_eq!(normalize_value(Some("1,5")), Some(AmountValue::Float(1.5)));
        // thousands separators are misread as decimal commas
        assert_eq!(normalize_value(Some("1,234")), Some(AmountValue::Float(1.234)));
    }

    #[test]
    fn test_normalize_fractions() {
        assert_eq!(normalize_value(Some("½")), Some(AmountValue::Float(0.5)));
        assert_eq!(normalize_value(Some("2½")), Some(AmountValue::Float(2.5)));
        assert_eq!(normalize_value(Some("2 ½")), Some(AmountValue::Float(2.5)));
        assert_eq!(normalize_value(Some("1 ¾")), Some(AmountValue::Float(1.75)));
        assert_eq!(
            normalize_value(Some("⅓")),
            Some(AmountValue::Float(1.0 / 3.0))
        );
    }

    #[test]
    fn test_every_glyph_has_a_value_below_one() {
        for (glyph, value) in FRACTIONS {
            assert!(value > 0.0 && value < 1.0, "{}", glyph);
            assert_eq!(fraction_value(glyph), Some(value));
        }
        assert_eq!(fraction_value('x'), None);
    }

    #[test]
    fn test_normalize_decimal_prefix_drops_suffix() {
        assert_eq!(normalize_value(Some("0.25")), Some(AmountValue::Float(0.25)));
        assert_eq!(normalize_value(Some("2.5cm")), Some(AmountValue::Float(2.5)));
    }

    #[test]
    fn test_normalize_none_passes_through() {
        assert_eq!(normalize_value(None), None);
    }

    #[test]
    fn test_normalize_unreadable_keeps_text() {
        assert_eq!(
            normalize_value(Some("a bit")),
            Some(AmountValue::Text("a bit".to_string()))
        );
        assert_eq!(
            normalize_value(Some(" 1,5,0 ")),
            Some(AmountValue::Text("1,5,0".to_string()))
        );
    }

    #[test]
    fn test_normalize_huge_integer_stays_integer() {
        let digits = "12345678901234567890123";
        assert_eq!(
            normalize_value(Some(digits)),
            Some(AmountValue::BigInteger(digits.to_string()))
        );
        assert_eq!(
            normalize_value(Some("18446744073709551615")),
            Some(AmountValue::Integer(u64::MAX))
        );
    }
}

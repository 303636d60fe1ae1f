use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Ingredient;

/// Units the ingredient parser recognises.
///
/// `aliases` folds long spellings onto their canonical short form before
/// matching, so "2 tablespoons butter" and "2 tbsp butter" parse the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitVocabulary {
    pub units: Vec<String>,
    pub aliases: HashMap<String, String>,
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        let units = ["tbsp", "oz", "tsp", "cup", "pound", "kg", "g"];
        let aliases = [
            ("tablespoons", "tbsp"),
            ("tablespoon", "tbsp"),
            ("ounces", "oz"),
            ("ounce", "oz"),
            ("teaspoons", "tsp"),
            ("teaspoon", "tsp"),
            ("cups", "cup"),
            ("pounds", "pound"),
        ];

        UnitVocabulary {
            units: units.iter().map(|u| u.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(long, short)| (long.to_string(), short.to_string()))
                .collect(),
        }
    }
}

impl UnitVocabulary {
    /// Canonical unit for a token, if the token names one
    pub fn canonical(&self, token: &str) -> Option<&str> {
        let token = token.trim_end_matches([',', '.', ';', ':']);
        let folded = self.aliases.get(token).map(String::as_str).unwrap_or(token);
        self.units.iter().find(|u| *u == folded).map(String::as_str)
    }
}

/// Strip parenthesised asides ("1 cup (8 oz) milk" -> "1 cup milk")
pub fn strip_parens(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Lowercase, drop asides, and split on whitespace
pub fn tokenize(line: &str) -> Vec<String> {
    strip_parens(&line.to_lowercase())
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

/// Parse one amount token: `2`, `1.5`, `1/2`, or `1-1/2` (dash reads as "and")
pub fn parse_amount(token: &str) -> Option<f64> {
    let mut total = 0.0;
    for part in token.split('-') {
        total += parse_simple_amount(part)?;
    }
    Some(total)
}

fn parse_simple_amount(part: &str) -> Option<f64> {
    if part.is_empty() {
        return None;
    }
    let value = match part.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => part.parse().ok()?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Sum a run of amount tokens ("1 1/2" -> 1.5). `None` if any token isn't one.
fn parse_quantity(tokens: &[String]) -> Option<f64> {
    if tokens.is_empty() {
        return None;
    }
    tokens.iter().map(|t| parse_amount(t)).sum()
}

/// Split a raw ingredient line into quantity, unit and name.
///
/// Best effort: a line whose lead isn't numeric has no quantity, and a line
/// whose unit isn't in the vocabulary keeps everything after the quantity
/// as the name. Never fails.
pub fn parse_ingredient(line: &str, units: &UnitVocabulary) -> Ingredient {
    let tokens = tokenize(line);

    let unit_index = tokens.iter().position(|t| units.canonical(t).is_some());

    if let Some(i) = unit_index {
        let unit = units.canonical(&tokens[i]).unwrap_or_default().to_string();
        let name = tokens[i + 1..].join(" ");
        if i == 0 {
            return Ingredient {
                quantity: None,
                unit,
                name,
            };
        }
        if let Some(quantity) = parse_quantity(&tokens[..i]) {
            return Ingredient {
                quantity: Some(quantity),
                unit,
                name,
            };
        }
        // words between the amount and the unit: keep the amount, the rest is the name
    }

    numeric_lead(&tokens)
}

/// Leading run of amounts as the quantity, everything after it as the name
fn numeric_lead(tokens: &[String]) -> Ingredient {
    let lead = tokens.iter().take_while(|t| parse_amount(t).is_some()).count();
    Ingredient {
        quantity: parse_quantity(&tokens[..lead]),
        unit: String::new(),
        name: tokens[lead..].join(" "),
    }
}

pub fn parse_ingredients(lines: &[String], units: &UnitVocabulary) -> Vec<Ingredient> {
    lines.iter().map(|line| parse_ingredient(line, units)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Ingredient {
        parse_ingredient(line, &UnitVocabulary::default())
    }

    #[test]
    fn test_unit_and_quantity() {
        let ing = parse("4 1/2 cups unbleached high-gluten flour");
        assert_eq!(ing.quantity, Some(4.5));
        assert_eq!(ing.unit, "cup");
        assert_eq!(ing.name, "unbleached high-gluten flour");
    }

    #[test]
    fn test_long_unit_folds_to_short() {
        let ing = parse("2 Tablespoons olive oil");
        assert_eq!(ing.quantity, Some(2.0));
        assert_eq!(ing.unit, "tbsp");
        assert_eq!(ing.name, "olive oil");
    }

    #[test]
    fn test_dash_fraction() {
        let ing = parse("1-1/3 cup water");
        let q = ing.quantity.unwrap();
        assert!((q - (1.0 + 1.0 / 3.0)).abs() < 1e-9);
        assert_eq!(ing.unit, "cup");
    }

    #[test]
    fn test_parenthesised_aside_removed() {
        let ing = parse("1 package (7 ounces) feta cheese");
        // "ounces" sat inside the aside, so there is no unit left
        assert_eq!(ing.quantity, Some(1.0));
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "package feta cheese");
    }

    #[test]
    fn test_no_unit_numeric_lead() {
        let ing = parse("3 eggs");
        assert_eq!(ing.quantity, Some(3.0));
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "eggs");
    }

    #[test]
    fn test_non_numeric_lead_has_no_quantity() {
        let ing = parse("Salt and pepper to taste");
        assert_eq!(ing.quantity, None);
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "salt and pepper to taste");
    }

    #[test]
    fn test_unknown_unit_stays_in_name() {
        let ing = parse("2 tbs butter");
        assert_eq!(ing.quantity, Some(2.0));
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "tbs butter");
    }

    #[test]
    fn test_words_before_unit_fall_back() {
        let ing = parse("a few g of saffron");
        assert_eq!(ing.quantity, None);
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "a few g of saffron");
    }

    #[test]
    fn test_words_between_amount_and_unit() {
        let ing = parse("2 heaping cups flour");
        assert_eq!(ing.quantity, Some(2.0));
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "heaping cups flour");

        let ing = parse("1 large egg, about 50 g");
        assert_eq!(ing.quantity, Some(1.0));
        assert_eq!(ing.name, "large egg, about 50 g");

        // same shape without a unit anywhere
        assert_eq!(parse("2 large eggs").quantity, Some(2.0));
    }

    #[test]
    fn test_injected_vocabulary() {
        let mut units = UnitVocabulary::default();
        units.units.push("clove".to_string());
        units.aliases.insert("cloves".to_string(), "clove".to_string());
        let ing = parse_ingredient("3 cloves garlic", &units);
        assert_eq!(ing.quantity, Some(3.0));
        assert_eq!(ing.unit, "clove");
        assert_eq!(ing.name, "garlic");
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("1/0"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("3/4"), Some(0.75));
    }

    #[test]
    fn test_empty_line() {
        let ing = parse("   ");
        assert_eq!(ing.quantity, None);
        assert_eq!(ing.name, "");
    }
}

use serde::{Deserialize, Serialize};

/// How negative amounts are shown in rendered reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

/// Presentation settings for monetary amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping_separator: char,
    #[serde(default)]
    pub negative_style: NegativeStyle,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            grouping_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

impl CurrencyFormat {
    pub fn with_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// `$1,234.50`, `-$12.00` or `($12.00)` depending on [`NegativeStyle`].
    pub fn format(&self, amount: f64) -> String {
        let digits = format_number(amount.abs(), self.grouping_separator);
        let body = format!("{}{}", self.symbol, digits);
        if amount < 0.0 && digits != "0.00" {
            match self.negative_style {
                NegativeStyle::Sign => format!("-{body}"),
                NegativeStyle::Parentheses => format!("({body})"),
            }
        } else {
            body
        }
    }
}

/// Two-decimal rendering with thousands grouping.
pub fn format_number(value: f64, separator: char) -> String {
    let body = format!("{:.2}", value);
    let (int_part, fraction) = body.split_at(body.find('.').unwrap_or(body.len()));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    format!("{sign}{}{fraction}", group_digits(digits, separator))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Percentage with two decimals, e.g. `12.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

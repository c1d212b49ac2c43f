use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// `1.500,50`, `2.000` or `1500,5`: German grouping or a decimal comma.
    #[error("ambiguous decimal '{input}': use '.' for the fraction, e.g. 1500.50")]
    GermanSeparators { input: String },
}

/// Error returned when a string is neither an ISO date nor a German one.
#[derive(Debug, Error)]
#[error("invalid date '{input}', expected YYYY-MM-DD or DD.MM.YYYY")]
pub struct ParseDateError {
    input: String,
}

/// Trims whitespace and drops commas used as thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// True for input a German reader writes differently: a dot before a comma,
/// a comma not followed by exactly three digits, or dots that group the
/// integer part in threes (`2.000`, `1.234.567`).
fn has_german_separators(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if let (Some(dot), Some(comma)) = (s.find('.'), s.rfind(',')) {
        if dot < comma {
            return true;
        }
    }

    let decimal_comma = s.match_indices(',').any(|(i, _)| {
        s[i + 1..].bytes().take_while(u8::is_ascii_digit).count() != 3
    });

    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut groups = unsigned.split('.');
    let dot_grouping = match groups.next() {
        Some(lead) if all_digits(lead) && lead.len() <= 3 && !lead.starts_with('0') => {
            let rest: Vec<&str> = groups.collect();
            !rest.is_empty() && rest.iter().all(|g| g.len() == 3 && all_digits(g))
        }
        _ => false,
    };

    decimal_comma || dot_grouping
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0. German-formatted amounts
/// such as `"1.500,50"` are rejected rather than misread.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let trimmed = s.trim();
    if has_german_separators(trimmed) {
        tracing::debug!(input = %s, "decimal uses German separators");
        return Err(ParseDecimalError::GermanSeparators {
            input: s.to_string(),
        });
    }

    let normalized = normalize_decimal_input(trimmed);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses `2025-01-31` or `31.01.2025`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseDateError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map_err(|_| ParseDateError {
            input: s.to_string(),
        })
}

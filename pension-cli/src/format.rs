//! German locale display formatting.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};

use pension_core::BreakEvenAge;

/// `1234.5` → `"1.234,50 €"`
pub fn format_currency(value: Decimal) -> String {
    format!("{} €", format_number(value, 2))
}

/// Takes a value already in percent: `97` → `"97,0 %"`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{} %", format_number(value, 1))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Day-first date with hours and minutes in the zone of `at`.
pub fn format_timestamp<Tz>(at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%d.%m.%Y %H:%M").to_string()
}

/// Age with one decimal, or `∞` when break-even is never reached.
pub fn format_break_even(age: BreakEvenAge) -> String {
    match age {
        BreakEvenAge::At(age) => format_number(age, 1),
        BreakEvenAge::Never => "∞".to_string(),
    }
}

/// Formats with `.` between thousands and `,` before the fraction.
pub fn format_number(
    value: Decimal,
    places: u32,
) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", places as usize, rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn currency_uses_german_separators() {
        assert_eq!(format_currency(dec!(2000)), "2.000,00 €");
        assert_eq!(format_currency(dec!(31.55)), "31,55 €");
        assert_eq!(format_currency(dec!(1234567.891)), "1.234.567,89 €");
        assert_eq!(format_currency(dec!(0)), "0,00 €");
    }

    #[test]
    fn negative_currency_keeps_sign() {
        assert_eq!(format_currency(dec!(-111.7)), "-111,70 €");
        assert_eq!(format_currency(dec!(-1567)), "-1.567,00 €");
    }

    #[test]
    fn tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(format_currency(dec!(-0.001)), "0,00 €");
    }

    #[test]
    fn percentage_has_one_place() {
        assert_eq!(format_percentage(dec!(85)), "85,0 %");
        assert_eq!(format_percentage(dec!(97.05)), "97,1 %");
    }

    #[test]
    fn dates_are_day_first() {
        let date = NaiveDate::from_ymd_opt(2037, 2, 1).unwrap();

        assert_eq!(format_date(date), "01.02.2037");
    }

    #[test]
    fn timestamps_are_day_first_to_the_minute() {
        let at = chrono::Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 59).unwrap();

        assert_eq!(format_timestamp(at), "07.03.2025 09:05");
    }

    #[test]
    fn break_even_never_is_infinity() {
        assert_eq!(format_break_even(BreakEvenAge::At(dec!(81.4))), "81,4");
        assert_eq!(format_break_even(BreakEvenAge::Never), "∞");
    }
}

//! Calendar arithmetic around the retirement start.

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month after the `age`-th birthday.
///
/// A 29 February birthday falls on 1 March in non-leap years, so the
/// pension then starts on 1 April. Returns `None` if the date is out of
/// range.
///
/// ```
/// use chrono::NaiveDate;
/// use pension_core::calculations::regular_retirement_date;
///
/// let birthday = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
///
/// assert_eq!(
///     regular_retirement_date(birthday, 67),
///     NaiveDate::from_ymd_opt(2037, 2, 1)
/// );
/// ```
pub fn regular_retirement_date(
    birthday: NaiveDate,
    age: u32,
) -> Option<NaiveDate> {
    let year = birthday.year().checked_add(i32::try_from(age).ok()?)?;
    let anniversary = NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))?;
    anniversary
        .with_day(1)?
        .checked_add_months(Months::new(1))
}

/// Retirement date brought forward by `months_early`.
pub fn early_retirement_date(
    regular: NaiveDate,
    months_early: u32,
) -> Option<NaiveDate> {
    regular.checked_sub_months(Months::new(months_early))
}

/// Calendar year used to pick the taxable portion: the nominal year of the
/// regular retirement age minus the whole years retirement is brought
/// forward.
pub fn retirement_start_year(
    birthday: NaiveDate,
    age: u32,
    months_early: u32,
) -> i32 {
    let whole_years = i32::try_from(months_early / 12).unwrap_or(i32::MAX);
    let age = i32::try_from(age).unwrap_or(i32::MAX);
    birthday
        .year()
        .saturating_add(age)
        .saturating_sub(whole_years)
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
/// Negative when `to` lies before `from`.
pub fn months_between(
    from: NaiveDate,
    to: NaiveDate,
) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

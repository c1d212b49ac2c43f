//! Plain-text rendering of the projection table.

use rust_decimal::Decimal;

use pension_core::{ScenarioResult, UserInput};

use crate::format::{format_break_even, format_currency, format_date, format_percentage};

pub const TITLE: &str = "Ihre Rentenberechnung";

pub const HEADERS: [&str; 12] = [
    "Monate früher",
    "Rentenbeginn",
    "Bruttorente",
    "Abschlag",
    "KV-Beitrag",
    "PV-Beitrag",
    "Besteuerung",
    "Steuer",
    "Kirchensteuer",
    "Nettorente",
    "Break-even",
    "Differenz",
];

const COLUMN_GAP: &str = "  ";

fn cells(result: &ScenarioResult) -> [String; 12] {
    [
        result.months_early.to_string(),
        format_date(result.retirement_date),
        format_currency(result.gross_pension),
        format_currency(result.deduction_early_retirement),
        format_currency(result.kv_contribution),
        format_currency(result.pv_contribution),
        format_percentage(result.taxation_percentage),
        format_currency(result.tax),
        format_currency(result.church_tax),
        format_currency(result.net_pension),
        format_break_even(result.break_even_age),
        format_currency(result.net_difference_to_standard),
    ]
}

/// Renders the title, a header row and one right-aligned row per scenario.
/// An empty slice yields just the title and header.
pub fn render_results(results: &[ScenarioResult]) -> String {
    let rows: Vec<[String; 12]> = results.iter().map(cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(TITLE);
    out.push_str("\n\n");
    push_line(&mut out, HEADERS.iter().copied(), &widths);

    let rule_len = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

/// One labelled line per input field.
pub fn render_input(input: &UserInput) -> String {
    let lines = [
        ("Geburtstag", format_date(input.birthday)),
        ("Voraussichtliche Altersrente", format_currency(input.expected_pension)),
        (
            "Bislang erreichte Rentenanwartschaft",
            format_currency(input.current_pension_entitlement),
        ),
        ("Datum des Rentenbescheids", format_date(input.statement_date)),
        ("Kinder", if input.has_children { "ja" } else { "nein" }.to_string()),
        (
            "Kirchensteuersatz",
            format_percentage(input.church_tax_rate * Decimal::ONE_HUNDRED),
        ),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count() + 1)
        .max()
        .unwrap_or(0);
    lines
        .iter()
        .map(|(label, value)| format!("{:<label_width$} {value}\n", format!("{label}:")))
        .collect()
}

fn push_line<'a>(
    out: &mut String,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) {
    let line = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    out.push_str(&line);
    out.push('\n');
}

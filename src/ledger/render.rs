use rust_decimal::{Decimal, RoundingStrategy};

use crate::util::{
    date::to_pretty_datetime_string,
    decimal::{dollar_precision_str, is_negative, to_string_normalized},
};

use super::{
    csv_common::ReportCol, cumulative_gains::CumulativeCapitalGains, LedgerEvent, LedgerReport,
};

pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub notes: Vec<String>,
}

impl RenderTable {
    /// Position of the column named `col`.
    pub fn col_index(&self, col: &str) -> Option<usize> {
        self.header.iter().position(|h| h == col)
    }
}

/// Formats a money value as $1.23 (or -$1.23). Values are rounded to cents
/// unless `full` is set.
pub fn money_str(d: &Decimal, full: bool) -> String {
    let (shown, digits) = if full {
        (d.normalize(), to_string_normalized(&d.abs()))
    } else {
        let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        (rounded, dollar_precision_str(&rounded.abs()))
    };
    if is_negative(&shown) {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

fn event_row(e: &LedgerEvent, full: bool) -> Vec<String> {
    vec![
        e.action.to_string(),
        e.major.to_string(),
        e.minor.to_string(),
        to_string_normalized(&e.amount),
        money_str(&e.rate, full),
        to_pretty_datetime_string(&e.timestamp),
        money_str(&e.acb, full),
        to_string_normalized(&e.units_held),
        e.capital_gain.map(|g| money_str(&g, full)).unwrap_or_default(),
        money_str(&e.capital_gains, full),
        to_string_normalized(&e.exchange_rate),
    ]
}

fn report_notes(report: &LedgerReport) -> Vec<String> {
    let mut notes = vec![format!(
        "Money values are in {}", report.base_currency.as_str().to_uppercase())];
    if let Some(year) = report.tax_year {
        notes.push(format!("Only trades made in {} are included", year));
    }
    notes
}

/// One row per ledger event, with the ending position in the footer.
pub fn render_ledger_table(report: &LedgerReport, render_full_values: bool) -> RenderTable {
    let header: Vec<String> = ReportCol::trade_table_header().iter().map(|h| h.to_string()).collect();
    let rows: Vec<Vec<String>> = report.events.iter()
        .map(|e| event_row(e, render_full_values))
        .collect();

    let mut table = RenderTable { header, rows, footer: vec![], notes: report_notes(report) };
    if !table.rows.is_empty() {
        let totals = &report.totals;
        let mut footer = vec![String::new(); table.header.len()];
        for (col, val) in [
            (ReportCol::ACB, money_str(&totals.acb, render_full_values)),
            (ReportCol::UNITS_HELD, to_string_normalized(&totals.units_held)),
            (ReportCol::TOTAL_CAPITAL_GAINS, money_str(&totals.capital_gains, render_full_values)),
        ] {
            if let Some(i) = table.col_index(col) {
                footer[i] = val;
            }
        }
        table.footer = footer;
    }
    table
}

pub fn render_totals_table(report: &LedgerReport, render_full_values: bool) -> RenderTable {
    let t = &report.totals;
    let full = render_full_values;
    let row = |name: &str, val: String| vec![name.to_string(), val];
    RenderTable {
        header: vec!["Total".to_string(), "Value".to_string()],
        rows: vec![
            row("ACB", money_str(&t.acb, full)),
            row("Sum ACB Dispositions", money_str(&t.sum_acb_dispositions, full)),
            row("Units Held", to_string_normalized(&t.units_held)),
            row("Buys", money_str(&t.outlays, full)),
            row("Sells", money_str(&t.proceeds, full)),
            row("Capital Gains", money_str(&t.capital_gains, full)),
        ],
        footer: vec![],
        notes: vec![],
    }
}

pub fn render_yearly_gains_table(
    gains: &CumulativeCapitalGains,
    render_full_values: bool,
) -> RenderTable {
    let rows = gains.capital_gains_year_totals_keys_sorted().iter()
        .map(|year| vec![
            year.to_string(),
            money_str(&gains.capital_gains_years_totals[year], render_full_values),
        ])
        .collect();
    RenderTable {
        header: vec!["Year".to_string(), "Capital Gains".to_string()],
        rows,
        footer: vec![
            "Total".to_string(),
            money_str(&gains.capital_gains_total, render_full_values),
        ],
        notes: vec![],
    }
}

use itertools::Itertools;

use crate::fx::io::RateSource;
use crate::ledger::{
    Carryover, Currency, LedgerError, LedgerReport, Tabulation, Trade,
};

use super::{convert_trades, is_target_tax_year, trades_to_ledger};

#[derive(Clone, Debug)]
pub struct CalcOptions {
    pub base_currency: Currency,
    /// Only trades in this year are tabulated. None for all trades.
    pub tax_year: Option<i32>,
    pub carryover: Option<Carryover>,
}

impl Default for CalcOptions {
    fn default() -> Self {
        CalcOptions {
            base_currency: Currency::default_base(),
            tax_year: None,
            carryover: None,
        }
    }
}

fn check_single_asset(trades: &[Trade]) -> Result<(), LedgerError> {
    let majors: Vec<Currency> = trades.iter().map(|t| t.major.clone()).sorted().dedup().collect();
    if majors.len() > 1 {
        return Err(LedgerError::MixedAssets(majors));
    }
    Ok(())
}

/// Runs the full calculation over the trades of a single asset.
///
/// Trades are put in time order (keeping read order for ties), restricted
/// to the tax year, converted to the base currency, then applied one at a
/// time. Any failure aborts the whole calculation.
pub fn calculate(
    mut trades: Vec<Trade>,
    rates: &dyn RateSource,
    opts: &CalcOptions,
) -> Result<LedgerReport, LedgerError> {
    // Stable, and read_index breaks ties anyway.
    trades.sort();

    if let Some(year) = opts.tax_year {
        let n_before = trades.len();
        trades.retain(|t| is_target_tax_year(&t.timestamp, year));
        tracing::debug!("calculate: {} of {} trade(s) are in {}", trades.len(), n_before, year);
    }

    check_single_asset(&trades)?;

    let base_trades = convert_trades(trades, &opts.base_currency, rates)?;
    let (events, totals) = trades_to_ledger(Tabulation::new(opts.carryover), &base_trades)?;

    Ok(LedgerReport {
        base_currency: opts.base_currency.clone(),
        tax_year: opts.tax_year,
        events,
        totals,
    })
}

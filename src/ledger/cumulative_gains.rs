use std::collections::HashMap;

use rust_decimal::Decimal;

use super::LedgerEvent;

pub struct CumulativeCapitalGains {
    pub capital_gains_total: Decimal,
    pub capital_gains_years_totals: HashMap<i32, Decimal>,
}

impl CumulativeCapitalGains {
    pub fn capital_gains_year_totals_keys_sorted(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.capital_gains_years_totals.keys().copied().collect();
        years.sort();
        years
    }
}

/// Sums the realized gains of `events` by the year of each sale.
pub fn calc_cumulative_capital_gains(events: &[LedgerEvent]) -> CumulativeCapitalGains {
    let mut capital_gains_total = Decimal::ZERO;
    let mut cap_gains_year_totals = HashMap::<i32, Decimal>::new();

    for e in events {
        if let Some(cap_gain) = e.capital_gain {
            capital_gains_total += cap_gain;
            *cap_gains_year_totals.entry(e.timestamp.year()).or_insert(Decimal::ZERO) += cap_gain;
        }
    }

    CumulativeCapitalGains {
        capital_gains_total,
        capital_gains_years_totals: cap_gains_year_totals,
    }
}

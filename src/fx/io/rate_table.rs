use std::collections::HashMap;

use time::Date;

use crate::{fx::DailyRate, ledger::Currency, util::decimal::PosDecimal};

/// Historical exchange rates, keyed by calendar day and currency.
pub trait RateSource {
    /// None if there is no rate for this exact day. There is no fallback
    /// to nearby days.
    fn get_rate(&self, date: Date, currency: &Currency) -> Option<PosDecimal>;
}

#[derive(Clone, Debug, Default)]
pub struct ExchangeRateTable {
    rates: HashMap<(Date, Currency), PosDecimal>,
}

impl ExchangeRateTable {
    pub fn new() -> ExchangeRateTable {
        ExchangeRateTable { rates: HashMap::new() }
    }

    /// Later entries for the same day and currency replace earlier ones.
    pub fn from_rates(rates: Vec<DailyRate>) -> ExchangeRateTable {
        let mut table = ExchangeRateTable::new();
        for rate in rates {
            table.insert(rate);
        }
        table
    }

    /// Returns the replaced rate, if there was one.
    pub fn insert(&mut self, rate: DailyRate) -> Option<PosDecimal> {
        self.rates.insert((rate.date, rate.currency), rate.rate)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateSource for ExchangeRateTable {
    fn get_rate(&self, date: Date, currency: &Currency) -> Option<PosDecimal> {
        self.rates.get(&(date, currency.clone())).copied()
    }
}

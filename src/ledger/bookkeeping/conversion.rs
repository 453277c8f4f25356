use itertools::Itertools;

use crate::fx::io::RateSource;
use crate::ledger::{BaseTrade, Currency, LedgerError, MissingRate, Trade};

fn needs_rate(trade: &Trade, base_currency: &Currency) -> bool {
    trade.minor != *base_currency
}

/// Every (date, currency) pair `trades` need which `rates` cannot provide,
/// sorted and without repeats.
pub fn find_missing_rates(
    trades: &[Trade],
    base_currency: &Currency,
    rates: &dyn RateSource,
) -> Vec<MissingRate> {
    trades.iter()
        .filter(|t| needs_rate(t, base_currency))
        .filter(|t| rates.get_rate(t.timestamp.date(), &t.minor).is_none())
        .map(|t| MissingRate { date: t.timestamp.date(), currency: t.minor.clone() })
        .sorted()
        .dedup()
        .collect()
}

/// Expresses `trade` in the base currency, using the rate for the day of
/// the trade (in the offset of its timestamp).
pub fn convert_trade(
    trade: Trade,
    base_currency: &Currency,
    rates: &dyn RateSource,
) -> Result<BaseTrade, LedgerError> {
    if !needs_rate(&trade, base_currency) {
        return Ok(BaseTrade::unconverted(trade));
    }
    let date = trade.timestamp.date();
    let rate = rates.get_rate(date, &trade.minor).ok_or_else(|| {
        LedgerError::MissingExchangeRates(vec![MissingRate {
            date,
            currency: trade.minor.clone(),
        }])
    })?;
    let context = trade.describe();
    BaseTrade::convert(trade, rate)
        .map_err(|reason| LedgerError::MalformedTrade { context, reason })
}

/// Converts all of `trades`, or none of them. Rates are checked for every
/// trade up front, so that all missing rates can be reported together.
pub fn convert_trades(
    trades: Vec<Trade>,
    base_currency: &Currency,
    rates: &dyn RateSource,
) -> Result<Vec<BaseTrade>, LedgerError> {
    let missing = find_missing_rates(&trades, base_currency, rates);
    if !missing.is_empty() {
        return Err(LedgerError::MissingExchangeRates(missing));
    }
    trades.into_iter()
        .map(|t| convert_trade(t, base_currency, rates))
        .collect()
}

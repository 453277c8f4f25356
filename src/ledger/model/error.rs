use std::fmt::Display;

use itertools::Itertools;
use time::{Date, OffsetDateTime};

use crate::util::{
    date::to_pretty_datetime_string,
    decimal::{GreaterEqualZeroDecimal, PosDecimal},
};

use super::currency::Currency;

/// A (date, currency) pair with no known exchange rate.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct MissingRate {
    pub date: Date,
    pub currency: Currency,
}

impl Display for MissingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.currency, self.date)
    }
}

/// Failures which make a calculation run unusable. None of these are
/// recoverable: the input must be fixed and the run repeated.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum LedgerError {
    /// Every missing pair across the whole trade set, sorted.
    MissingExchangeRates(Vec<MissingRate>),
    InsufficientUnits {
        timestamp: OffsetDateTime,
        asset: Currency,
        sold_units: PosDecimal,
        units_held: GreaterEqualZeroDecimal,
    },
    UnrecognizedTradeFormat {
        desc: String,
        header: String,
    },
    MalformedTrade {
        context: String,
        reason: String,
    },
    UnreadableInput {
        desc: String,
        reason: String,
    },
    MixedAssets(Vec<Currency>),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::MissingExchangeRates(missing) => write!(
                f,
                "Missing exchange rates for {} (date, currency) pair(s): {}",
                missing.len(),
                missing.iter().map(|m| m.to_string()).join(", ")
            ),
            LedgerError::InsufficientUnits {
                timestamp, asset, sold_units, units_held
            } => write!(
                f,
                "Cannot sell {} {} on {} when only holding {}",
                sold_units, asset, to_pretty_datetime_string(timestamp), units_held
            ),
            LedgerError::UnrecognizedTradeFormat { desc, header } => write!(
                f,
                "Unrecognized trade format in {}. Header was: {}",
                desc, header
            ),
            LedgerError::MalformedTrade { context, reason } => {
                write!(f, "Invalid trade in {}: {}", context, reason)
            }
            LedgerError::UnreadableInput { desc, reason } => {
                write!(f, "Could not read {}: {}", desc, reason)
            }
            LedgerError::MixedAssets(assets) => write!(
                f,
                "Trades for more than one asset were found ({}). \
                Only one asset can be tabulated at a time",
                assets.iter().join(", ")
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

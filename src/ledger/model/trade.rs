use std::fmt::Display;

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::util::decimal::{GreaterEqualZeroDecimal, PosDecimal};

use super::currency::Currency;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl TradeKind {
    pub fn parse(value: &str) -> Result<TradeKind, String> {
        match value.trim().to_lowercase().as_str() {
            "buy" => Ok(TradeKind::Buy),
            "sell" => Ok(TradeKind::Sell),
            _ => Err(format!("Invalid trade type '{value}'")),
        }
    }

    fn pretty_str(&self) -> &str {
        match self {
            TradeKind::Buy => "Buy",
            TradeKind::Sell => "Sell",
        }
    }
}

impl Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_str())
    }
}

/// A trade exactly as it was read from an exchange export, before any
/// validation. Each exchange format produces these.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RawTrade {
    pub kind: TradeKind,
    pub major: Currency,
    pub minor: Currency,
    pub amount: Decimal,
    pub unit_rate: Decimal,
    pub gross_value: Decimal,
    pub net_total: Decimal,
    pub timestamp: OffsetDateTime,
    pub read_index: u32,
}

/// A single executed trade of `major`, priced in `minor`.
///
/// `net_total` is in units of `major` for buys (what landed in the account
/// after the exchange kept its commission), and in `minor` for sells (the
/// proceeds after commission).
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Trade {
    pub kind: TradeKind,
    pub major: Currency,
    pub minor: Currency,
    pub amount: PosDecimal,
    pub unit_rate: PosDecimal,
    pub gross_value: GreaterEqualZeroDecimal,
    pub net_total: GreaterEqualZeroDecimal,
    pub timestamp: OffsetDateTime,

    // The absolute order in which the trade was read from file.
    // Used as a tiebreak in sorting.
    pub read_index: u32,
}

impl TryFrom<RawTrade> for Trade {
    type Error = String;

    fn try_from(raw: RawTrade) -> Result<Self, Self::Error> {
        if raw.major.is_empty() || raw.minor.is_empty() {
            return Err("major and minor assets must not be empty".to_string());
        }
        if raw.major == raw.minor {
            return Err(format!(
                "major and minor assets are both {}", raw.major));
        }
        let amount = PosDecimal::try_from(raw.amount)
            .map_err(|_| format!("amount ({}) must be positive", raw.amount))?;
        let unit_rate = PosDecimal::try_from(raw.unit_rate)
            .map_err(|_| format!("rate ({}) must be positive", raw.unit_rate))?;
        let gross_value = GreaterEqualZeroDecimal::try_from(raw.gross_value)
            .map_err(|_| format!("value ({}) was negative", raw.gross_value))?;
        let net_total = GreaterEqualZeroDecimal::try_from(raw.net_total)
            .map_err(|_| format!("total ({}) was negative", raw.net_total))?;

        match raw.kind {
            TradeKind::Buy => if net_total > GreaterEqualZeroDecimal::from(amount) {
                return Err(format!(
                    "buy total ({} {}) is more than the amount bought ({} {})",
                    net_total, raw.major, amount, raw.major));
            },
            TradeKind::Sell => if net_total > gross_value {
                return Err(format!(
                    "sell total ({} {}) is more than the sale value ({} {})",
                    net_total, raw.minor, gross_value, raw.minor));
            },
        }

        Ok(Trade {
            kind: raw.kind,
            major: raw.major,
            minor: raw.minor,
            amount,
            unit_rate,
            gross_value,
            net_total,
            timestamp: raw.timestamp,
            read_index: raw.read_index,
        })
    }
}

impl Trade {
    /// Eg. "sell of 1.5 btc at 2018-04-04 19:58:01 -05:00:00", for errors.
    pub fn describe(&self) -> String {
        format!("{} of {} {} at {}", self.kind, self.amount, self.major, self.timestamp)
    }
}

impl PartialOrd for Trade {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Trade {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.timestamp.cmp(&other.timestamp)
            .then_with(|| self.read_index.cmp(&other.read_index))
    }
}

/// A Trade with all of its `minor`-denominated values expressed in the base
/// currency. This can only be built from a Trade and the rate to apply, so
/// the ledger never sees an unconverted (or twice converted) trade.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct BaseTrade {
    pub trade: Trade,
    pub unit_rate: PosDecimal,
    pub gross_value: GreaterEqualZeroDecimal,
    pub net_total: GreaterEqualZeroDecimal,
    /// Units of trade.minor per unit of the base currency
    pub exchange_rate: PosDecimal,
}

impl BaseTrade {
    /// For trades already priced in the base currency.
    pub fn unconverted(trade: Trade) -> BaseTrade {
        BaseTrade {
            unit_rate: trade.unit_rate,
            gross_value: trade.gross_value,
            net_total: trade.net_total,
            exchange_rate: PosDecimal::one(),
            trade,
        }
    }

    /// Divides the minor currency values by `exchange_rate`.
    /// Buy totals are in units of the major asset, so they are left as-is.
    ///
    /// Fails if a converted value is too large, or (for the rate) too small,
    /// to be represented.
    pub fn convert(trade: Trade, exchange_rate: PosDecimal) -> Result<BaseTrade, String> {
        let unrepresentable = |field: &str, value: &dyn std::fmt::Display| {
            format!("{} ({}) cannot be represented at an exchange rate of {}",
                    field, value, exchange_rate)
        };
        let unit_rate = trade.unit_rate.checked_div(exchange_rate)
            .ok_or_else(|| unrepresentable("rate", &trade.unit_rate))?;
        let gross_value = trade.gross_value.checked_div(exchange_rate)
            .ok_or_else(|| unrepresentable("value", &trade.gross_value))?;
        let net_total = match trade.kind {
            TradeKind::Buy => trade.net_total,
            TradeKind::Sell => trade.net_total.checked_div(exchange_rate)
                .ok_or_else(|| unrepresentable("total", &trade.net_total))?,
        };
        Ok(BaseTrade {
            trade,
            unit_rate,
            gross_value,
            net_total,
            exchange_rate,
        })
    }

    pub fn kind(&self) -> TradeKind {
        self.trade.kind
    }

    pub fn amount(&self) -> PosDecimal {
        self.trade.amount
    }

    pub fn timestamp(&self) -> &OffsetDateTime {
        &self.trade.timestamp
    }
}

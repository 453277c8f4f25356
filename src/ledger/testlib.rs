use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::OffsetDateTime;

use crate::ledger::{BaseTrade, Currency, RawTrade, Trade, TradeKind};
use crate::util::date::pub_testlib::doy_instant;

/// Test trade builder. Any field not set falls back to a small, valid buy
/// of btc in cad.
#[derive(Clone, Debug)]
pub struct TTrade {
    pub kind: TradeKind,
    pub major: &'static str,
    pub minor: &'static str,
    pub amount: Decimal,
    pub rate: Decimal,
    /// Defaults to amount * rate
    pub value: Option<Decimal>,
    pub total: Decimal,
    pub year: u32,
    pub t_day: i64,
    /// Overrides year and t_day
    pub time: Option<OffsetDateTime>,
    pub read_index: u32,
}

impl TTrade {
    pub fn d() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> RawTrade {
        RawTrade {
            kind: self.kind,
            major: Currency::new(self.major),
            minor: Currency::new(self.minor),
            amount: self.amount,
            unit_rate: self.rate,
            gross_value: self.value.unwrap_or_else(|| self.amount * self.rate),
            net_total: self.total,
            timestamp: self.time.unwrap_or_else(|| doy_instant(self.year, self.t_day)),
            read_index: self.read_index,
        }
    }

    pub fn x(&self) -> Trade {
        Trade::try_from(self.raw()).unwrap()
    }

    /// As a trade already priced in the base currency
    pub fn bx(&self) -> BaseTrade {
        BaseTrade::unconverted(self.x())
    }
}

impl Default for TTrade {
    fn default() -> Self {
        Self {
            kind: TradeKind::Buy,
            major: "btc",
            minor: "cad",
            amount: dec!(1),
            rate: dec!(10),
            value: None,
            total: dec!(1),
            year: 2018,
            t_day: 0,
            time: None,
            read_index: 0,
        }
    }
}

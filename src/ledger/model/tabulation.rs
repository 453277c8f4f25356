use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::util::decimal::{GreaterEqualZeroDecimal, PosDecimal};

use super::{currency::Currency, trade::TradeKind};

/// Holdings carried over from before the first trade processed.
/// Usually the ending position of the previous tax year.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Carryover {
    pub units_held: GreaterEqualZeroDecimal,
    pub acb: GreaterEqualZeroDecimal,
}

impl Carryover {
    pub fn try_new(
        units_held: GreaterEqualZeroDecimal,
        acb: GreaterEqualZeroDecimal,
    ) -> Result<Carryover, String> {
        if units_held.is_zero() && !acb.is_zero() {
            return Err(format!("Carryover ACB ({acb}) given for zero units held"));
        }
        Ok(Carryover { units_held, acb })
    }
}

/// The running state of the ledger. All monetary values are in the
/// base currency.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tabulation {
    pub acb: GreaterEqualZeroDecimal,
    pub units_held: GreaterEqualZeroDecimal,
    pub capital_gains: Decimal,
    /// Total cost of all buys
    pub outlays: GreaterEqualZeroDecimal,
    /// Total gross value of all sells
    pub proceeds: GreaterEqualZeroDecimal,
    pub sum_acb_dispositions: GreaterEqualZeroDecimal,
}

impl Tabulation {
    pub fn new(carryover: Option<Carryover>) -> Tabulation {
        let zero = GreaterEqualZeroDecimal::zero();
        let (units_held, acb) = match carryover {
            Some(c) => (c.units_held, c.acb),
            None => (zero, zero),
        };
        Tabulation {
            acb,
            units_held,
            capital_gains: Decimal::ZERO,
            outlays: zero,
            proceeds: zero,
            sum_acb_dispositions: zero,
        }
    }

    /// None when nothing is held.
    pub fn avg_unit_cost(&self) -> Option<Decimal> {
        PosDecimal::try_from(*self.units_held).ok()
            .and_then(|units| self.acb.checked_div(units))
            .map(|avg| *avg)
    }
}

impl Default for Tabulation {
    fn default() -> Self {
        Tabulation::new(None)
    }
}

/// The record of one processed trade, and the ledger state right after it.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct LedgerEvent {
    pub action: TradeKind,
    pub major: Currency,
    pub minor: Currency,
    pub amount: PosDecimal,
    /// Base currency per unit of major
    pub rate: PosDecimal,
    pub timestamp: OffsetDateTime,
    pub acb: GreaterEqualZeroDecimal,
    pub units_held: GreaterEqualZeroDecimal,
    /// None for buys, which never realize a gain
    pub capital_gain: Option<Decimal>,
    pub capital_gains: Decimal,
    pub exchange_rate: PosDecimal,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct LedgerReport {
    pub base_currency: Currency,
    pub tax_year: Option<i32>,
    pub events: Vec<LedgerEvent>,
    pub totals: Tabulation,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::gezdec;
    use crate::ledger::{Carryover, Tabulation};
    use crate::testlib::assert_re;

    #[test]
    fn test_carryover() {
        let c = Carryover::try_new(gezdec!(2), gezdec!(22)).unwrap();
        assert_eq!(c.units_held, gezdec!(2));
        assert_eq!(c.acb, gezdec!(22));

        let _ = Carryover::try_new(gezdec!(0), gezdec!(0)).unwrap();
        // Free units are odd, but legal (eg. an airdrop)
        let _ = Carryover::try_new(gezdec!(1), gezdec!(0)).unwrap();

        let err = Carryover::try_new(gezdec!(0), gezdec!(10)).unwrap_err();
        assert_re("given for zero units held", &err);
    }

    #[test]
    fn test_tabulation_new() {
        let t = Tabulation::default();
        assert_eq!(t.acb, gezdec!(0));
        assert_eq!(t.units_held, gezdec!(0));
        assert_eq!(t.capital_gains, dec!(0));
        assert_eq!(t.avg_unit_cost(), None);

        let t = Tabulation::new(Some(
            Carryover::try_new(gezdec!(4), gezdec!(10)).unwrap()));
        assert_eq!(t.acb, gezdec!(10));
        assert_eq!(t.units_held, gezdec!(4));
        assert_eq!(t.outlays, gezdec!(0));
        assert_eq!(t.avg_unit_cost(), Some(dec!(2.5)));
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{ledger::Carryover, util::decimal::GreaterEqualZeroDecimal};

pub type Error = String;

/// Parses a position carried in from before the first trade, formatted as
/// UNITS:ACB. Eg. 1.5:9000.00
pub fn parse_carryover(carryover: &str) -> Result<Carryover, Error> {
    let (units_str, acb_str) = match carryover.split(':').collect::<Vec<&str>>()[..] {
        [units, acb] => (units.trim(), acb.trim()),
        _ => return Err(format!("Invalid carryover format '{carryover}'. Expected UNITS:ACB")),
    };

    let units = Decimal::from_str(units_str)
        .map_err(|e| format!("Invalid units format '{units_str}'. {e}"))?;
    let units = GreaterEqualZeroDecimal::try_from(units)
        .map_err(|_| format!("Units {units} was negative"))?;

    let acb = Decimal::from_str(acb_str)
        .map_err(|e| format!("Invalid ACB format '{acb_str}'. {e}"))?;
    let acb = GreaterEqualZeroDecimal::try_from(acb)
        .map_err(|_| format!("ACB {acb} was negative"))?;

    Carryover::try_new(units, acb)
}

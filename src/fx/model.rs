use std::fmt::Display;

use time::Date;

use crate::{ledger::Currency, util::decimal::PosDecimal};

/// The exchange rate of one currency on a given day.
///
/// An amount in `currency` divided by `rate` gives the amount in the base
/// currency.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct DailyRate {
    pub date: Date,
    pub currency: Currency,
    pub rate: PosDecimal,
}

impl DailyRate {
    pub fn new(date: Date, currency: Currency, rate: PosDecimal) -> DailyRate {
        DailyRate { date, currency, rate }
    }
}

// Auto-implements to_string()
impl Display for DailyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} : {}", self.date, self.currency, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use crate::{ledger::Currency, pdec};

    use super::DailyRate;

    #[test]
    fn test_rate_string() {
        let rate = DailyRate::new(
            Date::from_calendar_date(2018, Month::April, 4).unwrap(),
            Currency::new("MXN"),
            pdec!(14.3),
        );
        assert_eq!(rate.to_string(), "2018-04-04 mxn : 14.3");
    }
}

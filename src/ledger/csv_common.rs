/// Column names of exchange trade exports. Headers are matched after
/// trimming and lowercasing.
pub struct TradeCsvCol();
impl TradeCsvCol {
    pub const TYPE: &'static str = "type";
    pub const MAJOR: &'static str = "major";
    pub const MINOR: &'static str = "minor";
    pub const AMOUNT: &'static str = "amount";
    pub const RATE: &'static str = "rate";
    pub const VALUE: &'static str = "value";
    pub const FEE: &'static str = "fee";
    pub const TOTAL: &'static str = "total";
    pub const TIMESTAMP: &'static str = "timestamp";
    pub const DATETIME: &'static str = "datetime";

    /// Bitso and QuadrigaCX exports
    pub const BITSO_QCX_HEADER: [&'static str; 10] = [
        TradeCsvCol::TYPE,
        TradeCsvCol::MAJOR,
        TradeCsvCol::MINOR,
        TradeCsvCol::AMOUNT,
        TradeCsvCol::RATE,
        TradeCsvCol::VALUE,
        TradeCsvCol::FEE,
        TradeCsvCol::TOTAL,
        TradeCsvCol::TIMESTAMP,
        TradeCsvCol::DATETIME,
    ];

    /// For hand-written files, or exchanges with no dedicated format.
    pub const GENERIC_HEADER: [&'static str; 8] = [
        TradeCsvCol::TYPE,
        TradeCsvCol::MAJOR,
        TradeCsvCol::MINOR,
        TradeCsvCol::AMOUNT,
        TradeCsvCol::RATE,
        TradeCsvCol::VALUE,
        TradeCsvCol::TOTAL,
        TradeCsvCol::DATETIME,
    ];
}

/// Column names of the trade report.
pub struct ReportCol();
impl ReportCol {
    pub const ACTION: &'static str = "Action";
    pub const MAJOR: &'static str = "Major";
    pub const MINOR: &'static str = "Minor";
    pub const AMOUNT: &'static str = "Amount";
    pub const RATE: &'static str = "Rate";
    pub const DATE: &'static str = "Date";
    pub const ACB: &'static str = "Adjusted Cost Base";
    pub const UNITS_HELD: &'static str = "Units Held";
    pub const CAPITAL_GAIN: &'static str = "Capital Gain";
    pub const TOTAL_CAPITAL_GAINS: &'static str = "Total Capital Gains";
    pub const EXCHANGE_RATE: &'static str = "Exchange Rate";

    pub fn trade_table_header() -> Vec<&'static str> {
        vec![
            ReportCol::ACTION,
            ReportCol::MAJOR,
            ReportCol::MINOR,
            ReportCol::AMOUNT,
            ReportCol::RATE,
            ReportCol::DATE,
            ReportCol::ACB,
            ReportCol::UNITS_HELD,
            ReportCol::CAPITAL_GAIN,
            ReportCol::TOTAL_CAPITAL_GAINS,
            ReportCol::EXCHANGE_RATE,
        ]
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::ledger::csv_common::TradeCsvCol;
use crate::ledger::{Currency, RawTrade, TradeKind};
use crate::util::date::{parse_rfc3339_instant, unix_timestamp_to_instant, TradeTimeZone};

type Error = String;

/// Turns one row of an exchange's trade export into a RawTrade.
pub trait RowNormalizer: Sync {
    fn name(&self) -> &'static str;

    /// The exact (normalized) header row which identifies this format.
    fn header(&self) -> &'static [&'static str];

    fn matches(&self, header: &[String]) -> bool {
        let expected = self.header();
        header.len() == expected.len()
            && header.iter().zip(expected.iter()).all(|(h, e)| h == e)
    }

    /// `header` is the normalized header of the file `record` was read from.
    /// The timestamp is expressed in `time_zone`.
    fn normalize(
        &self,
        record: &csv::StringRecord,
        header: &csv::StringRecord,
        read_index: u32,
        time_zone: TradeTimeZone,
    ) -> Result<RawTrade, Error>;
}

fn parse_decimal(value: &str, field_name: &str) -> Result<Decimal, Error> {
    Decimal::from_str(value).map_err(|e| {
        format!("Failed to parse number for {} ('{}'): {}", field_name, value, e)
    })
}

// The columns every format has, still as text.
struct TradeValues<'a> {
    kind: &'a str,
    major: &'a str,
    minor: &'a str,
    amount: &'a str,
    rate: &'a str,
    value: &'a str,
    total: &'a str,
}

impl<'a> TradeValues<'a> {
    fn into_raw(self, timestamp: OffsetDateTime, read_index: u32) -> Result<RawTrade, Error> {
        Ok(RawTrade {
            kind: TradeKind::parse(self.kind)?,
            major: Currency::new(self.major),
            minor: Currency::new(self.minor),
            amount: parse_decimal(self.amount, TradeCsvCol::AMOUNT)?,
            unit_rate: parse_decimal(self.rate, TradeCsvCol::RATE)?,
            gross_value: parse_decimal(self.value, TradeCsvCol::VALUE)?,
            net_total: parse_decimal(self.total, TradeCsvCol::TOTAL)?,
            timestamp,
            read_index,
        })
    }
}

fn deserialize_row<'de, T: Deserialize<'de>>(
    record: &'de csv::StringRecord,
    header: &'de csv::StringRecord,
) -> Result<T, Error> {
    record.deserialize(Some(header)).map_err(|e| e.to_string())
}

// MARK: Bitso / QuadrigaCX

#[derive(Deserialize, Debug)]
struct BitsoQcxRow<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    major: &'a str,
    minor: &'a str,
    amount: &'a str,
    rate: &'a str,
    value: &'a str,
    total: &'a str,
    // Unix seconds. The datetime column is a rendering of this in an
    // unspecified zone, so is not used.
    timestamp: &'a str,
}

pub struct BitsoQcxFormat;

impl RowNormalizer for BitsoQcxFormat {
    fn name(&self) -> &'static str {
        "Bitso/QuadrigaCX"
    }

    fn header(&self) -> &'static [&'static str] {
        &TradeCsvCol::BITSO_QCX_HEADER
    }

    fn normalize(
        &self,
        record: &csv::StringRecord,
        header: &csv::StringRecord,
        read_index: u32,
        time_zone: TradeTimeZone,
    ) -> Result<RawTrade, Error> {
        let row: BitsoQcxRow = deserialize_row(record, header)?;
        let secs = parse_decimal(row.timestamp, TradeCsvCol::TIMESTAMP)?;
        let timestamp = unix_timestamp_to_instant(&secs, time_zone)?;
        TradeValues {
            kind: row.kind,
            major: row.major,
            minor: row.minor,
            amount: row.amount,
            rate: row.rate,
            value: row.value,
            total: row.total,
        }
        .into_raw(timestamp, read_index)
    }
}

// MARK: Generic

#[derive(Deserialize, Debug)]
struct GenericRow<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    major: &'a str,
    minor: &'a str,
    amount: &'a str,
    rate: &'a str,
    value: &'a str,
    total: &'a str,
    // RFC 3339, with an explicit offset
    datetime: &'a str,
}

pub struct GenericFormat;

impl RowNormalizer for GenericFormat {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn header(&self) -> &'static [&'static str] {
        &TradeCsvCol::GENERIC_HEADER
    }

    fn normalize(
        &self,
        record: &csv::StringRecord,
        header: &csv::StringRecord,
        read_index: u32,
        time_zone: TradeTimeZone,
    ) -> Result<RawTrade, Error> {
        let row: GenericRow = deserialize_row(record, header)?;
        let timestamp = parse_rfc3339_instant(row.datetime, time_zone).map_err(|e| {
            format!("Failed to parse {} \"{}\": {}", TradeCsvCol::DATETIME, row.datetime, e)
        })?;
        TradeValues {
            kind: row.kind,
            major: row.major,
            minor: row.minor,
            amount: row.amount,
            rate: row.rate,
            value: row.value,
            total: row.total,
        }
        .into_raw(timestamp, read_index)
    }
}

static BITSO_QCX_FORMAT: BitsoQcxFormat = BitsoQcxFormat;
static GENERIC_FORMAT: GenericFormat = GenericFormat;

pub fn known_formats() -> [&'static dyn RowNormalizer; 2] {
    [&BITSO_QCX_FORMAT, &GENERIC_FORMAT]
}

/// Finds the format whose header is exactly `header`.
pub fn detect_format(header: &[String]) -> Option<&'static dyn RowNormalizer> {
    known_formats().into_iter().find(|f| f.matches(header))
}

/// Lowercases and trims each column name.
pub fn normalize_header<'a, I: IntoIterator<Item = &'a str>>(header: I) -> Vec<String> {
    header.into_iter().map(|h| h.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::{datetime, offset};
    use time::UtcOffset;

    use crate::ledger::{Currency, RawTrade, TradeKind};
    use crate::testlib::assert_re;
    use crate::util::date::TradeTimeZone;

    use super::{detect_format, normalize_header, BitsoQcxFormat, GenericFormat, RowNormalizer};

    fn header_of(s: &str) -> Vec<String> {
        normalize_header(s.split(','))
    }

    #[test]
    fn test_detect_format() {
        let f = detect_format(&header_of(
            "type,major,minor,amount,rate,value,fee,total,timestamp,datetime")).unwrap();
        assert_eq!(f.name(), "Bitso/QuadrigaCX");

        let f = detect_format(&header_of(
            " Type,MAJOR,minor,amount,rate, value,fee,total,timestamp,datetime ")).unwrap();
        assert_eq!(f.name(), "Bitso/QuadrigaCX");

        let f = detect_format(&header_of(
            "type,major,minor,amount,rate,value,total,datetime")).unwrap();
        assert_eq!(f.name(), "generic");

        // Reordered, missing or extra columns are all unknown
        assert!(detect_format(&header_of(
            "major,type,minor,amount,rate,value,fee,total,timestamp,datetime")).is_none());
        assert!(detect_format(&header_of(
            "type,major,minor,amount,rate,value,fee,total,timestamp")).is_none());
        assert!(detect_format(&header_of(
            "type,major,minor,amount,rate,value,total,datetime,memo")).is_none());
        assert!(detect_format(&[]).is_none());
    }

    fn normalize(
        f: &dyn RowNormalizer, header: &str, row: &str, offset: UtcOffset,
    ) -> Result<RawTrade, String> {
        let header = csv::StringRecord::from(header_of(header));
        let record = csv::StringRecord::from(row.split(',').collect::<Vec<&str>>());
        f.normalize(&record, &header, 7, TradeTimeZone::Fixed(offset))
    }

    const BITSO_HEADER: &str = "type,major,minor,amount,rate,value,fee,total,timestamp,datetime";
    const GENERIC_HEADER: &str = "type,major,minor,amount,rate,value,total,datetime";

    #[test]
    fn test_bitso_row() {
        let raw = normalize(
            &BitsoQcxFormat, BITSO_HEADER,
            "buy,BTC,MXN,0.00295835,135000.00,399.38,0.00000591,0.00295244,\
             1522889881.138,2018-04-04 19:58:01",
            offset!(-5),
        ).unwrap();
        assert_eq!(raw, RawTrade {
            kind: TradeKind::Buy,
            major: Currency::btc(),
            minor: Currency::new("mxn"),
            amount: dec!(0.00295835),
            unit_rate: dec!(135000),
            gross_value: dec!(399.38),
            net_total: dec!(0.00295244),
            timestamp: datetime!(2018-04-04 19:58:01.138 -5),
            read_index: 7,
        });

        let err = normalize(
            &BitsoQcxFormat, BITSO_HEADER,
            "buy,btc,mxn,1,100,100,0,1,yesterday,", UtcOffset::UTC,
        ).unwrap_err();
        assert_re("^Failed to parse number for timestamp \\('yesterday'\\)", &err);

        let err = normalize(
            &BitsoQcxFormat, BITSO_HEADER,
            "trade,btc,mxn,1,100,100,0,1,1522889881,", UtcOffset::UTC,
        ).unwrap_err();
        assert_eq!(err, "Invalid trade type 'trade'");

        let err = normalize(
            &BitsoQcxFormat, BITSO_HEADER,
            "sell,btc,mxn,1,abc,100,0,1,1522889881,", UtcOffset::UTC,
        ).unwrap_err();
        assert_re("^Failed to parse number for rate \\('abc'\\)", &err);
    }

    #[test]
    fn test_generic_row() {
        let raw = normalize(
            &GenericFormat, GENERIC_HEADER,
            "sell,eth,usd,2,450.5,901,899,2019-12-31T23:30:00-05:00",
            UtcOffset::UTC,
        ).unwrap();
        assert_eq!(raw.kind, TradeKind::Sell);
        assert_eq!(raw.major, Currency::new("eth"));
        assert_eq!(raw.minor, Currency::usd());
        assert_eq!(raw.net_total, dec!(899));
        // Expressed in the requested offset
        assert_eq!(raw.timestamp, datetime!(2020-01-01 04:30:00 UTC));
        assert_eq!(raw.timestamp.offset(), UtcOffset::UTC);

        let err = normalize(
            &GenericFormat, GENERIC_HEADER,
            "sell,eth,usd,2,450.5,901,899,2019-12-31 23:30:00", UtcOffset::UTC,
        ).unwrap_err();
        assert_re("^Failed to parse datetime \"2019-12-31 23:30:00\"", &err);
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    fx::DailyRate,
    ledger::Currency,
    util::{
        date::parse_rate_date,
        decimal::PosDecimal,
        rw::{DescribedReader, WriteHandle},
    },
    write_errln,
};

use super::{Error, ExchangeRateTable};

const DATE_COL: &str = "date";

/// Reads rate tables of the form
///
/// ```text
/// date,usd,mxn
/// 2018-04-04,0.78,14.3
/// 2018/04/05,,14.5
/// ```
///
/// Rates are relative to the base currency (see DailyRate).
///
/// Empty cells are simply absent rates. Cells or rows which cannot be used
/// are reported to err_writer and skipped, so a pair that turns out to be
/// needed later will be reported as missing.
pub struct CsvRateTableReader {
    err_writer: WriteHandle,
}

impl CsvRateTableReader {
    pub fn new(err_writer: WriteHandle) -> CsvRateTableReader {
        CsvRateTableReader { err_writer }
    }

    pub fn read_table(&mut self, desc_reader: &DescribedReader) -> Result<ExchangeRateTable, Error> {
        let rates = self.read_rates(desc_reader)?;
        let table = ExchangeRateTable::from_rates(rates);
        tracing::info!("Loaded {} exchange rate(s) from {}", table.len(), desc_reader.desc());
        Ok(table)
    }

    pub fn read_rates(&mut self, desc_reader: &DescribedReader) -> Result<Vec<DailyRate>, Error> {
        let desc = desc_reader.desc();
        let reader = desc_reader.reader()
            .map_err(|e| format!("Failed to open {}: {}", desc, e))?;

        let mut csv_r = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let currencies = Self::header_currencies(
            csv_r.headers().map_err(|e| format!("Error reading header of {}: {}", desc, e))?,
            desc)?;

        let mut rates: Vec<DailyRate> = Vec::new();

        for (i, record_res) in csv_r.records().enumerate() {
            let record = match record_res {
                Ok(r) => r,
                Err(e) => {
                    write_errln!(self.err_writer,
                        "Warning: skipping unreadable rate row in {}: {}", desc, e);
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

            if record.iter().all(|c| c.is_empty()) {
                continue;
            }
            let date_str = record.get(0).unwrap_or("");
            let date = match parse_rate_date(date_str) {
                Ok(d) => d,
                Err(e) => {
                    write_errln!(self.err_writer,
                        "Warning: skipping rate row with invalid date '{}' ({} line {}): {}",
                        date_str, desc, line, e);
                    continue;
                }
            };

            for (currency, cell) in currencies.iter().zip(record.iter().skip(1)) {
                if cell.is_empty() {
                    continue;
                }
                let rate = Decimal::from_str(cell)
                    .map_err(|e| e.to_string())
                    .and_then(|d| PosDecimal::try_from(d)
                        .map_err(|_| "rate must be positive".to_string()));
                match rate {
                    Ok(rate) => rates.push(DailyRate::new(date, currency.clone(), rate)),
                    Err(e) => write_errln!(self.err_writer,
                        "Warning: ignoring {} rate '{}' on {} ({} line {}): {}",
                        currency, cell, date, desc, line, e),
                }
            }
        }

        Ok(rates)
    }

    fn header_currencies(header: &csv::StringRecord, desc: &str) -> Result<Vec<Currency>, Error> {
        match header.get(0) {
            Some(first) if first.eq_ignore_ascii_case(DATE_COL) => (),
            _ => return Err(format!(
                "Rate table {} must start with a '{}' column", desc, DATE_COL)),
        }

        let mut currencies = Vec::<Currency>::with_capacity(header.len());
        for name in header.iter().skip(1) {
            let currency = Currency::new(name);
            if currency.is_empty() {
                return Err(format!("Rate table {} has an unnamed column", desc));
            }
            if currencies.contains(&currency) {
                return Err(format!(
                    "Rate table {} has more than one column for {}", desc, currency));
            }
            currencies.push(currency);
        }
        Ok(currencies)
    }
}

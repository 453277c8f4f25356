mod common;

use common::{csv_reader, BITSO_HEADER, GENERIC_HEADER};
use crypto_acb::{
    app::{
        approot::{run_app_to_writer, Options},
        outfmt::text::TextWriter,
    },
    ledger::{Carryover, Currency},
    testlib::assert_re,
    util::{
        decimal::GreaterEqualZeroDecimal,
        rw::{DescribedReader, WriteHandle},
    },
};
use rust_decimal_macros::dec;

struct RunOutput {
    ok: bool,
    out: String,
    err: String,
}

fn run(
    trade_readers: Vec<DescribedReader>,
    rates_reader: Option<DescribedReader>,
    options: &Options,
) -> RunOutput {
    let (out_h, out_buff) = WriteHandle::string_buff_write_handle();
    let (err_h, err_buff) = WriteHandle::string_buff_write_handle();
    let mut writer = TextWriter::new(out_h);
    let res = run_app_to_writer(&mut writer, trade_readers, rates_reader, options, err_h);
    let out = out_buff.borrow().as_str().to_string();
    let err = err_buff.borrow().as_str().to_string();
    RunOutput { ok: res.is_ok(), out, err }
}

fn year_opts(year: i32) -> Options {
    Options { tax_year: Some(year), ..Options::default() }
}

fn gez(d: rust_decimal::Decimal) -> GreaterEqualZeroDecimal {
    GreaterEqualZeroDecimal::try_from(d).unwrap()
}

#[test]
fn test_buy_then_full_sell() {
    // 2018-01-01 and 2018-02-01, noon UTC
    let trades = csv_reader("bitso.csv", BITSO_HEADER, &[
        "buy,btc,cad,2.2,10,22,0.2,2,1514808000,2018-01-01 07:00:00",
        "sell,btc,cad,2,20,40,0.2,39.8,1517486400,2018-02-01 07:00:00",
    ]);
    let res = run(vec![trades], None, &year_opts(2018));
    assert!(res.ok, "{}", res.err);
    assert_eq!(res.err, "");

    assert_re("^Trades of BTC\n", &res.out);
    assert_re("Buy .*2018-01-01 12:00:00 .*\\$22.00", &res.out);
    assert_re("Sell .*2018-02-01 12:00:00 .*\\$0.00 .*\\$17.80 .*\\$17.80", &res.out);
    assert_re("BTC Totals", &res.out);
    assert_re("Sum ACB Dispositions .*\\| \\$22.00", &res.out);
    assert_re("Only trades made in 2018 are included", &res.out);
    assert!(!res.out.contains("Capital Gains by Year"));
}

#[test]
fn test_partial_sell_from_carryover() {
    let trades = csv_reader("trades.csv", GENERIC_HEADER, &[
        "buy,btc,cad,1,100,100,1,2018-06-01T12:00:00Z",
        "sell,btc,cad,50,120,6000,5990,2019-06-01T12:00:00Z",
    ]);
    let opts = Options {
        carryover: Some(Carryover::try_new(gez(dec!(100)), gez(dec!(5010))).unwrap()),
        ..year_opts(2019)
    };
    let res = run(vec![trades], None, &opts);
    assert!(res.ok, "{}", res.err);

    assert_re("ACB .*\\| \\$2505.00", &res.out);
    assert_re("Units Held .*\\| 50", &res.out);
    assert_re("Capital Gains .*\\| \\$3485.00", &res.out);
    // The 2018 buy is not part of the 2019 run
    assert!(!res.out.contains("2018-06-01"));
}

#[test]
fn test_insufficient_units() {
    let trades = csv_reader("trades.csv", GENERIC_HEADER, &[
        "buy,eth,usd,1,100,100,1,2018-06-01T12:00:00Z",
        "sell,eth,usd,1.5,100,150,149,2018-06-02T12:00:00Z",
    ]);
    let opts = Options { base_currency: Currency::usd(), ..year_opts(2018) };
    let res = run(vec![trades], None, &opts);
    assert!(!res.ok);
    assert_eq!(res.out, "");
    assert_eq!(res.err,
        "Error: Cannot sell 1.5 eth on 2018-06-02 12:00:00 when only holding 1\n");
}

#[test]
fn test_missing_rates_are_all_reported() {
    let trades = csv_reader("trades.csv", GENERIC_HEADER, &[
        "buy,btc,mxn,1,135000,135000,1,2018-04-04T12:00:00Z",
        "buy,btc,mxn,1,135000,135000,1,2018-04-05T12:00:00Z",
        "buy,btc,usd,1,7000,7000,1,2018-04-05T13:00:00Z",
        "buy,btc,cad,1,9000,9000,1,2018-04-06T12:00:00Z",
    ]);
    let rates = DescribedReader::from_string(
        "rates.csv".to_string(), "date,mxn,usd\n2018-04-05,14.5,\n".to_string());
    let res = run(vec![trades], Some(rates), &year_opts(2018));
    assert!(!res.ok);
    assert_eq!(res.out, "");
    assert_eq!(res.err,
        "Error: Missing exchange rates for 2 (date, currency) pair(s): \
        mxn on 2018-04-04, usd on 2018-04-05\n");
}

#[test]
fn test_foreign_currency_and_multiple_files() {
    let a = csv_reader("a.csv", GENERIC_HEADER, &[
        "buy,btc,mxn,0.5,140000,70000,0.5,2018-04-04T12:00:00Z",
    ]);
    let b = csv_reader("b.csv", BITSO_HEADER, &[
        // 2018-04-05 12:00:00 UTC
        "sell,btc,mxn,0.5,150000,75000,0,72500,1522929600,",
    ]);
    let rates = DescribedReader::from_string(
        "rates.csv".to_string(),
        "date,mxn\n2018-04-04,14\n2018/04/05,15\n".to_string());
    let res = run(vec![a, b], Some(rates), &year_opts(2018));
    assert!(res.ok, "{}", res.err);

    // Buy: 70000 / 14 = 5000. Sell: 75000 / 15, less (5000 - 72500 / 15)
    assert_re("Buy .*\\| \\$10000.00 .*\\| \\$5000.00 .*\\| 14", &res.out);
    assert_re("Capital Gains .*\\| -\\$166.67", &res.out);
}

#[test]
fn test_tax_year_boundaries() {
    let trades = csv_reader("trades.csv", GENERIC_HEADER, &[
        "buy,btc,cad,1,10,10,1,2017-12-31T23:59:59Z",
        "buy,btc,cad,1,10,10,1,2018-01-01T00:00:00Z",
        "buy,btc,cad,1,10,10,1,2019-01-01T00:00:00Z",
    ]);
    let res = run(vec![trades], None, &year_opts(2018));
    assert!(res.ok, "{}", res.err);
    assert!(res.out.contains("2018-01-01 00:00:00"));
    assert!(!res.out.contains("2017-12-31"));
    assert!(!res.out.contains("2019-01-01"));
}

#[test]
fn test_bad_inputs() {
    let res = run(vec![csv_reader("x.csv", "date,action,shares", &[])], None, &year_opts(2018));
    assert!(!res.ok);
    assert_re("^Error: Unrecognized trade format in x.csv", &res.err);

    let trades = csv_reader("trades.csv", GENERIC_HEADER, &[
        "buy,btc,cad,1,10,10,2,2018-01-01T00:00:00Z",
    ]);
    let res = run(vec![trades], None, &year_opts(2018));
    assert!(!res.ok);
    assert_re("^Error: Invalid trade in row 2 of trades.csv", &res.err);
}

//! Unit tests for sensor log decoding.
//!
//! Run with: cargo test --test decode_unit_test

mod common;

use chrono::FixedOffset;
use common::{ts, utc};
use terrarium_dashboard::series::{decode_log, tail_rows};
use terrarium_dashboard::series::time::{parse_instant, parse_lenient_f64};

#[test]
fn missing_humidity_becomes_none() {
    let series = decode_log("2024-01-01T00:00:00Z,ignored,72.5,", &utc());

    assert_eq!(series.len(), 1);
    let p = &series.points()[0];
    assert_eq!(p.timestamp, ts("2024-01-01T00:00:00Z"));
    assert_eq!(p.temperature, Some(72.5));
    assert_eq!(p.humidity, None);
    assert_eq!(p.lux, None);
    assert_eq!(p.tds, None);
}

#[test]
fn trailing_newlines_add_no_rows() {
    let body = "2024-01-01T00:00:00Z,whites,72.5,60\n2024-01-01T00:01:00Z,whites,72.6,61\n\n";

    let series = decode_log(body, &utc());

    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[1].humidity, Some(61.0));
}

#[test]
fn rows_without_usable_timestamp_are_skipped() {
    let body = "\
2024-01-01T00:00:00Z,whites,72.5,60
lonely
not-a-date,whites,1,2
2024-01-01T00:02:00Z,whites,73,59
";

    let series = decode_log(body, &utc());

    let temps: Vec<_> = series.iter().map(|p| p.temperature).collect();
    assert_eq!(temps, vec![Some(72.5), Some(73.0)]);
}

#[test]
fn bad_fields_do_not_spoil_the_row() {
    let series = decode_log("2024-01-01T00:00:00Z,whites,abc,55.5%", &utc());

    let p = &series.points()[0];
    assert_eq!(p.temperature, None);
    assert_eq!(p.humidity, Some(55.5));
}

#[test]
fn stray_quote_stays_inside_its_row() {
    let body = "\
2024-01-01T00:00:00Z,whites,\"72.5,60
2024-01-01T00:01:00Z,whites,73,61
2024-01-01T00:02:00Z,whi\"tes,74,62
2024-01-01T00:03:00Z,whites,75,63
";

    let series = decode_log(body, &utc());

    assert_eq!(series.len(), 4);
    let p = &series.points()[0];
    assert_eq!(p.temperature, None);
    assert_eq!(p.humidity, Some(60.0));
    let temps: Vec<_> = series.iter().skip(1).map(|p| p.temperature).collect();
    assert_eq!(temps, vec![Some(73.0), Some(74.0), Some(75.0)]);
}

#[test]
fn tail_rows_keeps_last_non_blank_lines() {
    let body = "a,1\nb,2\n\nc,3\n  \nd,4\n\n";

    assert_eq!(tail_rows(body, 2), "c,3\n  \nd,4");
    assert_eq!(tail_rows(body, 1), "d,4");
    assert_eq!(tail_rows(body, 10), "a,1\nb,2\n\nc,3\n  \nd,4");
    assert_eq!(tail_rows(body, 0), "");
    assert_eq!(tail_rows("", 3), "");
}

#[test]
fn tailed_log_decodes_like_the_full_log() {
    let mut body = String::new();
    for minute in 0..50 {
        body.push_str(&format!("2024-01-01T00:{minute:02}:00Z,whites,{minute},50\n"));
        if minute % 7 == 0 {
            body.push_str("garbage\n");
        }
    }

    let full = decode_log(&body, &utc()).tail(20);
    let tailed = decode_log(tail_rows(&body, 30), &utc()).tail(20);

    assert_eq!(tailed, full);
}

#[test]
fn lux_and_tds_columns_are_optional() {
    let body = "\
2024-01-01T00:00:00Z,office,70,40
2024-01-01T00:01:00Z,office,70,40,,
2024-01-01T00:02:00Z,office,70,40,310
2024-01-01T00:03:00Z,aquarium,,,,245
";

    let series = decode_log(body, &utc());

    assert_eq!(series.len(), 4);
    assert_eq!(series.points()[0].lux, None);
    assert_eq!(series.points()[1].lux, None);
    assert_eq!(series.points()[2].lux, Some(310.0));
    assert_eq!(series.points()[3].tds, Some(245.0));
    assert_eq!(series.points()[3].temperature, None);
    assert!(series.has_lux());
    assert!(series.has_tds());
}

#[test]
fn empty_optional_columns_do_not_count_as_present() {
    let series = decode_log("2024-01-01 00:00:00,whites,70,40,,\n", &utc());

    assert_eq!(series.len(), 1);
    assert!(!series.has_lux());
    assert!(!series.has_tds());
}

#[test]
fn naive_timestamps_are_local_time() {
    let eastern = FixedOffset::west_opt(5 * 3600).expect("valid offset");

    let series = decode_log("2024-01-01 08:00:00,whites,70,40\n", &eastern);

    assert_eq!(series.points()[0].timestamp, ts("2024-01-01T13:00:00Z"));
}

#[test]
fn tail_keeps_most_recent_points_in_order() {
    let mut body = String::new();
    for minute in 0..30 {
        body.push_str(&format!("2024-01-01T00:{minute:02}:00Z,whites,{minute},50\n"));
    }
    let series = decode_log(&body, &utc());

    let recent = series.tail(20);

    assert_eq!(recent.len(), 20);
    assert_eq!(recent.points()[0].temperature, Some(10.0));
    assert_eq!(recent.last_timestamp(), Some(ts("2024-01-01T00:29:00Z")));
    assert_eq!(series.tail(100).len(), 30);
}

#[test]
fn lenient_float_reads_numeric_prefix() {
    assert_eq!(parse_lenient_f64("72.5"), Some(72.5));
    assert_eq!(parse_lenient_f64(" 72.5F "), Some(72.5));
    assert_eq!(parse_lenient_f64("-3e2x"), Some(-300.0));
    assert_eq!(parse_lenient_f64("12."), Some(12.0));
    assert_eq!(parse_lenient_f64(""), None);
    assert_eq!(parse_lenient_f64("abc"), None);
    assert_eq!(parse_lenient_f64("."), None);
    assert_eq!(parse_lenient_f64("NaN"), None);
    assert_eq!(parse_lenient_f64("inf"), None);
}

#[test]
fn instants_accept_rfc3339_and_logger_format() {
    assert_eq!(
        parse_instant("2024-03-10T12:00:00+02:00", &utc()),
        Some(ts("2024-03-10T10:00:00Z"))
    );
    assert_eq!(
        parse_instant("2024-03-10 12:00:00", &utc()),
        Some(ts("2024-03-10T12:00:00Z"))
    );
    assert_eq!(
        parse_instant("2024-03-10T12:00:00.250", &utc()),
        Some(ts("2024-03-10T12:00:00.250Z"))
    );
    assert_eq!(parse_instant("yesterday", &utc()), None);
    assert_eq!(parse_instant("", &utc()), None);
}

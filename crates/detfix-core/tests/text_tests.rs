// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use detfix_core::{Fixed32, Fixed64, FixedError, FormatSpec};

fn render32(value: Fixed32, spec: &str) -> String {
    let spec: FormatSpec = spec.parse().unwrap();
    value.formatted(spec).to_string()
}

#[test]
fn parse_vectors_pin_raw_values() {
    let vectors: &[(&str, i64)] = &[
        ("114.514", 491_833_884_934),
        ("-0.1", -429_496_730),
        ("+2", 2 << 32),
        ("0", 0),
        ("-0", 0),
        ("2147483647.99999999976716935634613037109375", i64::MAX),
        ("-2147483648", i64::MIN),
    ];
    for &(text, raw) in vectors {
        assert_eq!(Fixed64::parse(text).unwrap().raw(), raw, "{text}");
    }
    assert_eq!(Fixed32::parse("114.514").unwrap().raw(), 7_504_790);
    assert_eq!(Fixed32::parse("3.14159").unwrap(), Fixed32::pi());
    assert_eq!(Fixed32::parse("0.100006103515625").unwrap().raw(), 6554);
}

#[test]
fn parse_errors() {
    assert_eq!(Fixed64::parse(""), Err(FixedError::Empty));
    assert_eq!(
        Fixed64::parse("1e5"),
        Err(FixedError::InvalidDigit { position: 1 })
    );
    assert_eq!(
        Fixed64::parse("--1"),
        Err(FixedError::InvalidDigit { position: 1 })
    );
    assert_eq!(
        Fixed64::parse("1.2.3"),
        Err(FixedError::InvalidDigit { position: 3 })
    );
    assert_eq!(Fixed64::parse("2147483648"), Err(FixedError::Overflow));
    assert_eq!(
        "12345678901234567890".parse::<Fixed32>(),
        Err(FixedError::Overflow)
    );
}

#[test]
fn display_is_the_exact_expansion() {
    assert_eq!(
        Fixed64::from_raw(0x5555_5555).to_string(),
        "0.33333333325572311878204345703125"
    );
    assert_eq!(Fixed32::MAX.to_string(), "32767.9999847412109375");
    assert_eq!(Fixed32::MIN.to_string(), "-32768");
    assert_eq!(Fixed64::MIN.to_string(), "-2147483648");
    assert_eq!(Fixed32::from_f64(-2.5).to_string(), "-2.5");
    assert_eq!(Fixed32::ZERO.to_string(), "0");
}

#[test]
fn display_honours_formatter_flags() {
    let third = Fixed64::from_raw(0x5555_5555);
    assert_eq!(format!("{third:.3}"), "0.333");
    assert_eq!(format!("{:.3}", Fixed32::from_int(2)), "2.000");
    assert_eq!(format!("{:+08.2}", Fixed32::from_f64(1.5)), "+0001.50");
    assert_eq!(format!("{:>8}", Fixed32::from_f64(2.5)), "     2.5");
    assert_eq!(format!("{:<6}|", Fixed32::from_f64(2.5)), "2.5   |");
    assert_eq!(format!("{:*^7}", Fixed32::from_f64(2.5)), "**2.5**");
}

#[test]
fn radix_traits_include_fraction_digits() {
    assert_eq!(format!("{:x}", Fixed32::from_f64(255.5)), "ff.8");
    assert_eq!(format!("{:#X}", Fixed32::from_f64(255.5)), "0XFF.8");
    assert_eq!(format!("{:b}", Fixed32::from_f64(2.25)), "10.01");
    assert_eq!(format!("{:#b}", Fixed32::from_f64(2.25)), "0b10.01");
    assert_eq!(format!("{:o}", Fixed32::from_f64(8.5)), "10.4");
    assert_eq!(format!("{:x}", Fixed32::from_f64(-0.75)), "-0.c");
}

#[test]
fn debug_shows_value_and_raw_bits() {
    assert_eq!(
        format!("{:?}", Fixed32::from_f64(-1.5)),
        "Fixed(-1.5, raw = 0xfffe8000)"
    );
    assert_eq!(
        format!("{:?}", Fixed64::one()),
        "Fixed(1, raw = 0x100000000)"
    );
}

#[test]
fn format_spec_styles() {
    assert_eq!(render32(Fixed32::from_f64(-3.75), "d"), "-3");
    assert_eq!(render32(Fixed32::from_f64(255.9), "x"), "ff");
    assert_eq!(render32(Fixed32::from_int(5), "#b"), "0b101");
    assert_eq!(render32(Fixed32::from_int(3), "#B"), "0B11");
    assert_eq!(render32(Fixed32::from_f64(64.5), "#o"), "100");
    assert_eq!(render32(Fixed32::from_f64(-1.5), "?"), "-18000");
    assert_eq!(render32(Fixed32::from_f64(-1.5), "#?"), "-0x18000");
    assert_eq!(render32(Fixed32::from_int(2), "f"), "2.000000");
    assert_eq!(render32(Fixed32::from_f64(2.75), ".0f"), "2");
    assert_eq!(render32(Fixed32::from_f64(2.75), "g"), "2.75");
    assert_eq!(render32(Fixed32::from_f64(2.75), ".1g"), "2.7");
    assert_eq!(render32(Fixed32::from_f64(2.75), ""), "2.75");
    assert_eq!(render32(Fixed32::from_int(-1), "^9.2f"), "  -1.00  ");
    assert_eq!(render32(Fixed32::from_int(2), " g"), " 2");
    assert_eq!(render32(Fixed32::from_int(-2), "+g"), "-2");
    assert_eq!(render32(Fixed32::from_int(7), "_>+5d"), "___+7");
}

#[test]
fn write_formatted_targets_any_writer() {
    let spec: FormatSpec = "08.3f".parse().unwrap();
    let mut out = String::from("x=");
    Fixed64::from_f64(-0.125).write_formatted(&mut out, &spec).unwrap();
    assert_eq!(out, "x=-000.125");
}

#[test]
fn parse_prefix_reports_consumed_bytes() {
    let (value, used) = Fixed64::parse_prefix("-12.75,rest").unwrap();
    assert_eq!(value, Fixed64::from_f64(-12.75));
    assert_eq!(used, 6);
}

#[test]
fn display_then_parse_round_trips_at_the_extremes() {
    for value in [Fixed32::MIN, Fixed32::MAX, Fixed32::DELTA, -Fixed32::DELTA] {
        assert_eq!(value.to_string().parse::<Fixed32>(), Ok(value));
    }
    for value in [Fixed64::MIN, Fixed64::MAX, Fixed64::DELTA, -Fixed64::DELTA] {
        assert_eq!(value.to_string().parse::<Fixed64>(), Ok(value));
    }
}

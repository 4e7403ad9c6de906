// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used)]

use detfix_core::{Fixed, Fixed32, Fixed32R, Fixed64, Fixed64R, FixedError};

#[test]
fn raw_encoding_of_basic_values() {
    assert_eq!(Fixed64::ZERO.raw(), 0);
    assert_eq!(Fixed64::one().raw(), 1_i64 << 32);
    assert_eq!(Fixed32::from_int(-3).raw(), -3 << 16);
    assert_eq!(Fixed32::DELTA.raw(), 1);
    assert_eq!(Fixed32::from(7).to_int(), 7);
    assert_eq!(Fixed64::FRACTION_BITS, 32);
    assert!(Fixed64R::ROUNDING);
    assert!(!Fixed64::ROUNDING);
}

#[test]
fn add_sub_neg_wrap_instead_of_panicking() {
    assert_eq!(Fixed32::MAX + Fixed32::DELTA, Fixed32::MIN);
    assert_eq!(Fixed32::MIN - Fixed32::DELTA, Fixed32::MAX);
    assert_eq!(-Fixed64::MIN, Fixed64::MIN);
    assert_eq!(Fixed64::MIN.abs(), Fixed64::MIN);
}

#[test]
fn multiply_truncates_or_rounds_by_type() {
    // 1.5 ulp * 0.5 = 0.75 ulp
    let a = Fixed32::from_raw(3);
    let half = Fixed32::from_raw(1 << 15);
    assert_eq!((a * half).raw(), 1);

    let a = Fixed32R::from_raw(3);
    let half = Fixed32R::from_raw(1 << 15);
    assert_eq!((a * half).raw(), 2);

    let x = Fixed64::from_int(6) * Fixed64::from_f64(-0.5);
    assert_eq!(x, Fixed64::from_int(-3));
}

#[test]
fn divide_truncates_or_rounds_by_type() {
    let two = Fixed64::from_int(2);
    assert_eq!((Fixed64::one() / Fixed64::from_int(3)).raw(), 0x5555_5555);
    assert_eq!((Fixed64R::from_int(2) / Fixed64R::from_int(3)).raw(), 0xAAAA_AAAB);
    assert_eq!((Fixed64::from_int(2) / Fixed64::from_int(3)).raw(), 0xAAAA_AAAA);
    assert_eq!(Fixed64::from_int(-7) / two, Fixed64::from_f64(-3.5));
}

#[test]
fn remainder_keeps_the_sign_of_the_dividend() {
    let three = Fixed32::from_int(3);
    assert_eq!(Fixed32::from_f64(7.5) % three, Fixed32::from_f64(1.5));
    assert_eq!(Fixed32::from_f64(-7.5) % three, Fixed32::from_f64(-1.5));
}

#[test]
fn integer_operands_scale_the_raw_value() {
    let x = Fixed32::from_f64(1.25);
    assert_eq!(x * 4, Fixed32::from_int(5));
    assert_eq!(x / 5, Fixed32::from_f64(0.25));
    let mut y = x;
    y *= -2;
    assert_eq!(y, Fixed32::from_f64(-2.5));
    y /= 2;
    assert_eq!(y, Fixed32::from_f64(-1.25));
}

#[test]
fn compound_assignment_matches_binary_operators() {
    let mut x = Fixed64::from_f64(1.5);
    x += Fixed64::one();
    x -= Fixed64::from_f64(0.25);
    x *= Fixed64::from_int(4);
    x /= Fixed64::from_int(3);
    assert_eq!(x, Fixed64::from_int(3));
    x %= Fixed64::from_int(2);
    assert_eq!(x, Fixed64::one());
}

#[test]
fn divide_by_zero_is_reported_by_the_checked_forms() {
    let x = Fixed64::from_f64(3.25);
    assert_eq!(
        Fixed64::one().divide(Fixed64::ZERO),
        Err(FixedError::DivideByZero)
    );
    assert_eq!(x.divide_int(0), Err(FixedError::DivideByZero));
    assert_eq!(x.fmod(Fixed64::ZERO), Err(FixedError::DivideByZero));
    assert_eq!(x.divide(Fixed64::from_int(2)), Ok(Fixed64::from_f64(1.625)));
    assert_eq!(x.divide_int(-13), Ok(Fixed64::from_f64(-0.25)));
}

#[test]
#[should_panic]
fn unchecked_division_by_zero_panics_like_integers() {
    let _ = Fixed32::one() / Fixed32::ZERO;
}

#[test]
fn increments_return_new_or_previous_value() {
    let mut x = Fixed32::from_int(5);
    assert_eq!(x.post_increment(), Fixed32::from_int(5));
    assert_eq!(x, Fixed32::from_int(6));
    assert_eq!(x.increment(), Fixed32::from_int(7));
    assert_eq!(x.decrement(), Fixed32::from_int(6));
    assert_eq!(x.post_decrement(), Fixed32::from_int(6));
    assert_eq!(x, Fixed32::from_int(5));
}

#[test]
fn nearly_comparisons_use_epsilon() {
    let x = Fixed64::one();
    let close = x + Fixed64::from_f64(5.0e-5);
    let far = x + Fixed64::from_f64(1.0e-3);
    assert!(x.nearly_eq(close));
    assert!(x.nearly_ne(far));
    assert!(far.nearly_gt(x));
    assert!(!close.nearly_gt(x));
    assert!(x.nearly_lt(far));
    assert!(x.nearly_ge(close) && x.nearly_le(close));
    assert!(!x.nearly_ge(far));
    assert_eq!(Fixed32::epsilon().raw(), 5);
}

#[test]
fn ordering_min_max_clamp() {
    let a = Fixed32::from_f64(-0.5);
    let b = Fixed32::from_f64(0.25);
    assert!(a < b);
    assert_eq!(a.min(b), a);
    assert_eq!(a.max(b), b);
    assert_eq!(Fixed32::from_int(9).clamp(a, b), b);
}

#[test]
fn rescaling_between_layouts() {
    let x = Fixed32::from_f64(-1.75);
    let wide: Fixed64 = Fixed::from_fixed(x);
    assert_eq!(wide, Fixed64::from_f64(-1.75));
    assert_eq!(Fixed32::from_fixed(wide), x);

    // One ulp of Fixed64 is far below Fixed32 resolution.
    let tiny = Fixed64::from_raw(0x8000);
    assert_eq!(Fixed32::from_fixed(tiny), Fixed32::ZERO);
    assert_eq!(Fixed32R::from_fixed(tiny), Fixed32R::DELTA);

    let q: Fixed<i64, 48> = Fixed::from_fixed(Fixed64::from_f64(0.125));
    assert_eq!(q.raw(), 1_i64 << 45);
}

#[test]
fn round_half_away_from_zero() {
    let cases = [
        ("114.414", 114),
        ("114.514", 115),
        ("-114.414", -114),
        ("-114.514", -115),
        ("2.5", 3),
        ("-2.5", -3),
        ("0.4999", 0),
    ];
    for (text, expected) in cases {
        let x: Fixed64 = text.parse().expect(text);
        assert_eq!(x.round().to_int(), expected, "round({text})");
        let y: Fixed32 = text.parse().expect(text);
        assert_eq!(y.round().to_int(), expected, "round({text}) on Fixed32");
    }
}

#[test]
fn floor_ceil_trunc_across_zero() {
    let x = Fixed32::from_f64(-2.25);
    assert_eq!(x.floor(), Fixed32::from_int(-3));
    assert_eq!(x.ceil(), Fixed32::from_int(-2));
    assert_eq!(x.trunc(), Fixed32::from_int(-2));
    let y = Fixed32::from_f64(2.25);
    assert_eq!(y.floor(), Fixed32::from_int(2));
    assert_eq!(y.ceil(), Fixed32::from_int(3));
    assert_eq!(y.trunc(), Fixed32::from_int(2));
    assert_eq!(Fixed32::from_f64(-0.5).to_int(), 0);
}

#[test]
fn fmod_and_modf() {
    let r = Fixed64::from_f64(-7.5).fmod(Fixed64::from_int(2));
    assert_eq!(r, Ok(Fixed64::from_f64(0.5)));
    let (whole, frac) = Fixed64::from_f64(3.75).modf();
    assert_eq!(whole, Fixed64::from_int(3));
    assert_eq!(frac, Fixed64::from_f64(0.75));
}

#[test]
fn sign_and_magnitude_decomposition() {
    let one = Fixed64::one();
    assert!((-one).signbit());
    assert!(!one.signbit());
    assert_eq!(one.integral_part(), 1);
    assert_eq!((-one).integral_part(), 1);
    let half = one / Fixed64::from_int(2);
    assert_eq!(half.fractional_part(), 1_i64 << 31);
    assert_eq!(Fixed32::from_f64(-1.5).raw_integral_part(), -2);
}

#[test]
fn float_conversions_saturate_and_reject_nan() {
    assert_eq!(Fixed32::from_f64(1.0e9), Fixed32::MAX);
    assert_eq!(Fixed32::from_f64(-1.0e9), Fixed32::MIN);
    assert_eq!(Fixed64::from_f64(f64::NAN), Fixed64::ZERO);
    assert_eq!(Fixed64::from_f32(0.5).to_f32(), 0.5);
    assert_eq!(Fixed64::from_f64(-1.5).to_f64(), -1.5);
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Batched `x % 2π` for [`Fixed64`] angles.
//!
//! Range reduction is the first step of every sine evaluation; when a caller
//! has many angles it can reduce them up front in vector registers and then
//! evaluate the polynomial on already-reduced inputs. Every path produces
//! bit-for-bit the remainder that `Fixed64 % Fixed64::two_pi()` produces.
//!
//! | Path | Needs | Lanes |
//! |------|-------|-------|
//! | AVX2 | `avx2` | 4 |
//! | SSE4.2 | `sse4.2` (for 64-bit compares) | 2 |
//! | Scalar | - | 1 |
//!
//! Neither instruction set has a 64x64 multiply-high, so the quotient is
//! estimated from 32x32 partial products against a 32-bit reciprocal of 2π.
//! The estimate is at most one below the true quotient; a single compare and
//! conditional subtract fixes it.
//!
//! # Safety
//!
//! This is the only module allowed to contain `unsafe`. Each kernel is a
//! `#[target_feature]` function called only after [`CpuFeatures::detect`]
//! confirmed the feature at runtime, and loads/stores go through unaligned
//! intrinsics on stack arrays, so no alignment or lifetime invariants leak out.
#![allow(unsafe_code)]

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::consts;
use crate::fixed::{rescale_raw, Fixed64};

/// A set of x86 SIMD extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CpuFeatures(u8);

impl CpuFeatures {
    /// SSE2.
    pub const SSE2: Self = Self(1 << 0);
    /// SSE4.2.
    pub const SSE4_2: Self = Self(1 << 1);
    /// AVX.
    pub const AVX: Self = Self(1 << 2);
    /// AVX2.
    pub const AVX2: Self = Self(1 << 3);
    /// AVX-512 Foundation.
    pub const AVX512F: Self = Self(1 << 4);
    /// AVX-512 Doubleword and Quadword.
    pub const AVX512DQ: Self = Self(1 << 5);

    const NAMED: [(Self, &'static str); 6] = [
        (Self::SSE2, "sse2"),
        (Self::SSE4_2, "sse4.2"),
        (Self::AVX, "avx"),
        (Self::AVX2, "avx2"),
        (Self::AVX512F, "avx512f"),
        (Self::AVX512DQ, "avx512dq"),
    ];

    /// No features.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Every feature in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set union.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Each known feature paired with whether it is in the set.
    pub fn iter_names(self) -> impl Iterator<Item = (&'static str, bool)> {
        Self::NAMED
            .into_iter()
            .map(move |(flag, name)| (name, self.contains(flag)))
    }

    /// Features of the running CPU, probed on first call and cached.
    ///
    /// Non-x86_64 targets report the empty set.
    pub fn detect() -> Self {
        let cached = CACHE.load(Ordering::Relaxed);
        if cached & DETECTED != 0 {
            return Self(cached & !DETECTED);
        }
        let features = detect_uncached();
        CACHE.store(features.0 | DETECTED, Ordering::Relaxed);
        tracing::debug!(%features, path = ?BatchPath::for_features(features), "cpu features detected");
        features
    }
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, present) in self.iter_names() {
            if present {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Set once detection has run; the low bits hold the feature set.
const DETECTED: u8 = 1 << 7;
static CACHE: AtomicU8 = AtomicU8::new(0);

#[cfg(target_arch = "x86_64")]
#[cold]
fn detect_uncached() -> CpuFeatures {
    let probes = [
        (CpuFeatures::SSE2, is_x86_feature_detected!("sse2")),
        (CpuFeatures::SSE4_2, is_x86_feature_detected!("sse4.2")),
        (CpuFeatures::AVX, is_x86_feature_detected!("avx")),
        (CpuFeatures::AVX2, is_x86_feature_detected!("avx2")),
        (CpuFeatures::AVX512F, is_x86_feature_detected!("avx512f")),
        (CpuFeatures::AVX512DQ, is_x86_feature_detected!("avx512dq")),
    ];
    probes
        .into_iter()
        .filter(|&(_, present)| present)
        .fold(CpuFeatures::empty(), |set, (flag, _)| set.union(flag))
}

#[cfg(not(target_arch = "x86_64"))]
#[cold]
fn detect_uncached() -> CpuFeatures {
    CpuFeatures::empty()
}

/// Shorthand for `CpuFeatures::detect().contains(feature)`.
pub fn has(feature: CpuFeatures) -> bool {
    CpuFeatures::detect().contains(feature)
}

/// Kernel chosen by [`reduce_angles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchPath {
    /// Four lanes per step.
    Avx2,
    /// Two lanes per step.
    Sse42,
    /// One value at a time.
    Scalar,
}

impl BatchPath {
    /// The path used on this CPU.
    pub fn current() -> Self {
        Self::for_features(CpuFeatures::detect())
    }

    /// The path a CPU with `features` would use.
    pub const fn for_features(features: CpuFeatures) -> Self {
        if features.contains(CpuFeatures::AVX2) {
            Self::Avx2
        } else if features.contains(CpuFeatures::SSE4_2) {
            Self::Sse42
        } else {
            Self::Scalar
        }
    }

    /// Values reduced per kernel call.
    pub const fn lanes(self) -> usize {
        match self {
            Self::Avx2 => 4,
            Self::Sse42 => 2,
            Self::Scalar => 1,
        }
    }

    /// Short name for reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avx2 => "avx2",
            Self::Sse42 => "sse4.2",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for BatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Fixed64::two_pi()` as a raw integer.
#[allow(clippy::cast_possible_truncation)]
const TWO_PI_RAW: i64 = rescale_raw(consts::TWO_PI.raw(), consts::TWO_PI.fraction(), 32, false) as i64;

#[allow(clippy::cast_sign_loss)]
const TWO_PI_U64: u64 = TWO_PI_RAW as u64;

/// `floor(2^64 / 2π_raw)`; below 2^30, so every partial product fits.
const RECIPROCAL: u64 = u64::MAX / TWO_PI_U64;

fn reduce_scalar(raw: i64) -> i64 {
    (Fixed64::from_raw(raw) % Fixed64::two_pi()).raw()
}

fn reduce_lanes_x4(lanes: [i64; 4]) -> [i64; 4] {
    #[cfg(target_arch = "x86_64")]
    {
        if has(CpuFeatures::AVX2) {
            // SAFETY: AVX2 confirmed at runtime.
            return unsafe { x86::reduce_x4_avx2(lanes) };
        }
        if has(CpuFeatures::SSE4_2) {
            let [a, b, c, d] = lanes;
            // SAFETY: SSE4.2 confirmed at runtime.
            let ([a, b], [c, d]) = unsafe { (x86::reduce_x2_sse42([a, b]), x86::reduce_x2_sse42([c, d])) };
            return [a, b, c, d];
        }
    }
    lanes.map(reduce_scalar)
}

fn reduce_lanes_x2(lanes: [i64; 2]) -> [i64; 2] {
    #[cfg(target_arch = "x86_64")]
    {
        if has(CpuFeatures::SSE4_2) {
            // SAFETY: SSE4.2 confirmed at runtime.
            return unsafe { x86::reduce_x2_sse42(lanes) };
        }
    }
    lanes.map(reduce_scalar)
}

/// Reduces four angles modulo 2π.
pub fn reduce_angle_x4(values: [Fixed64; 4]) -> [Fixed64; 4] {
    reduce_lanes_x4(values.map(Fixed64::raw)).map(Fixed64::from_raw)
}

/// Reduces two angles modulo 2π.
pub fn reduce_angle_x2(values: [Fixed64; 2]) -> [Fixed64; 2] {
    reduce_lanes_x2(values.map(Fixed64::raw)).map(Fixed64::from_raw)
}

/// Reduces every angle in place modulo 2π, keeping the sign of each input.
///
/// ```
/// use detfix_core::{simd, Fixed64};
///
/// let mut angles = [Fixed64::from_int(7), Fixed64::from_int(-7), Fixed64::one()];
/// simd::reduce_angles(&mut angles);
/// assert_eq!(angles[0], Fixed64::from_int(7) % Fixed64::two_pi());
/// assert_eq!(angles[1], Fixed64::from_int(-7) % Fixed64::two_pi());
/// assert_eq!(angles[2], Fixed64::one());
/// ```
pub fn reduce_angles(values: &mut [Fixed64]) {
    let rest = match BatchPath::current() {
        BatchPath::Avx2 => {
            let mut chunks = values.chunks_exact_mut(4);
            for chunk in &mut chunks {
                let lanes = [chunk[0], chunk[1], chunk[2], chunk[3]];
                chunk.copy_from_slice(&reduce_angle_x4(lanes));
            }
            chunks.into_remainder()
        }
        BatchPath::Sse42 => {
            let mut chunks = values.chunks_exact_mut(2);
            for chunk in &mut chunks {
                chunk.copy_from_slice(&reduce_angle_x2([chunk[0], chunk[1]]));
            }
            chunks.into_remainder()
        }
        BatchPath::Scalar => values,
    };
    for value in rest {
        *value = Fixed64::from_raw(reduce_scalar(value.raw()));
    }
}

#[cfg(target_arch = "x86_64")]
mod x86 {
    use core::arch::x86_64::{
        __m128i, __m256i, _mm256_add_epi64, _mm256_and_si256, _mm256_cmpgt_epi64,
        _mm256_loadu_si256, _mm256_mul_epu32, _mm256_set1_epi64x, _mm256_setzero_si256,
        _mm256_slli_epi64, _mm256_srli_epi64, _mm256_storeu_si256, _mm256_sub_epi64,
        _mm256_xor_si256, _mm_add_epi64, _mm_and_si128, _mm_cmpgt_epi64, _mm_loadu_si128,
        _mm_mul_epu32, _mm_set1_epi64x, _mm_setzero_si128, _mm_slli_epi64, _mm_srli_epi64,
        _mm_storeu_si128, _mm_sub_epi64, _mm_xor_si128,
    };

    use super::{RECIPROCAL, TWO_PI_RAW};

    #[allow(clippy::cast_possible_wrap)]
    const RECIPROCAL_LANE: i64 = RECIPROCAL as i64;
    const P_HI: i64 = TWO_PI_RAW >> 32;
    const P_LO: i64 = TWO_PI_RAW & 0xFFFF_FFFF;

    /// Four-lane `x % 2π`.
    ///
    /// Per lane, with `a = |x|` as an unsigned integer:
    /// `n = (hi(a)·M + (lo(a)·M >> 32)) >> 32`, `r = a - n·P`, then one
    /// conditional subtract of `P`, then the sign of `x` is restored.
    #[target_feature(enable = "avx2")]
    #[allow(clippy::cast_ptr_alignment)]
    pub(super) unsafe fn reduce_x4_avx2(lanes: [i64; 4]) -> [i64; 4] {
        let x = _mm256_loadu_si256(lanes.as_ptr().cast::<__m256i>());
        let m = _mm256_set1_epi64x(RECIPROCAL_LANE);
        let p = _mm256_set1_epi64x(TWO_PI_RAW);
        let p_hi = _mm256_set1_epi64x(P_HI);
        let p_lo = _mm256_set1_epi64x(P_LO);
        let p_minus_one = _mm256_set1_epi64x(TWO_PI_RAW - 1);

        let sign = _mm256_cmpgt_epi64(_mm256_setzero_si256(), x);
        let a = _mm256_sub_epi64(_mm256_xor_si256(x, sign), sign);

        let high = _mm256_mul_epu32(_mm256_srli_epi64::<32>(a), m);
        let low = _mm256_srli_epi64::<32>(_mm256_mul_epu32(a, m));
        let n = _mm256_srli_epi64::<32>(_mm256_add_epi64(high, low));

        let np = _mm256_add_epi64(
            _mm256_mul_epu32(n, p_lo),
            _mm256_slli_epi64::<32>(_mm256_mul_epu32(n, p_hi)),
        );
        let r = _mm256_sub_epi64(a, np);
        let over = _mm256_cmpgt_epi64(r, p_minus_one);
        let r = _mm256_sub_epi64(r, _mm256_and_si256(over, p));

        let result = _mm256_sub_epi64(_mm256_xor_si256(r, sign), sign);
        let mut out = [0_i64; 4];
        _mm256_storeu_si256(out.as_mut_ptr().cast::<__m256i>(), result);
        out
    }

    /// Two-lane `x % 2π`; same arithmetic as the AVX2 kernel.
    #[target_feature(enable = "sse4.2")]
    #[allow(clippy::cast_ptr_alignment)]
    pub(super) unsafe fn reduce_x2_sse42(lanes: [i64; 2]) -> [i64; 2] {
        let x = _mm_loadu_si128(lanes.as_ptr().cast::<__m128i>());
        let m = _mm_set1_epi64x(RECIPROCAL_LANE);
        let p = _mm_set1_epi64x(TWO_PI_RAW);
        let p_hi = _mm_set1_epi64x(P_HI);
        let p_lo = _mm_set1_epi64x(P_LO);
        let p_minus_one = _mm_set1_epi64x(TWO_PI_RAW - 1);

        let sign = _mm_cmpgt_epi64(_mm_setzero_si128(), x);
        let a = _mm_sub_epi64(_mm_xor_si128(x, sign), sign);

        let high = _mm_mul_epu32(_mm_srli_epi64::<32>(a), m);
        let low = _mm_srli_epi64::<32>(_mm_mul_epu32(a, m));
        let n = _mm_srli_epi64::<32>(_mm_add_epi64(high, low));

        let np = _mm_add_epi64(
            _mm_mul_epu32(n, p_lo),
            _mm_slli_epi64::<32>(_mm_mul_epu32(n, p_hi)),
        );
        let r = _mm_sub_epi64(a, np);
        let over = _mm_cmpgt_epi64(r, p_minus_one);
        let r = _mm_sub_epi64(r, _mm_and_si128(over, p));

        let result = _mm_sub_epi64(_mm_xor_si128(r, sign), sign);
        let mut out = [0_i64; 2];
        _mm_storeu_si128(out.as_mut_ptr().cast::<__m128i>(), result);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{
        reduce_lanes_x2, reduce_lanes_x4, reduce_scalar, BatchPath, CpuFeatures, RECIPROCAL,
        TWO_PI_RAW, TWO_PI_U64,
    };

    /// The lane arithmetic of the vector kernels, on one `i64`.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn lane_model(x: i64) -> i64 {
        let a = x.wrapping_abs() as u64;
        let high = (a >> 32) * RECIPROCAL;
        let low = ((a & 0xFFFF_FFFF) * RECIPROCAL) >> 32;
        let n = (high + low) >> 32;
        let np = n * (TWO_PI_U64 & 0xFFFF_FFFF) + ((n * (TWO_PI_U64 >> 32)) << 32);
        let mut r = a - np;
        if r >= TWO_PI_U64 {
            r -= TWO_PI_U64;
        }
        let r = r as i64;
        if x < 0 {
            r.wrapping_neg()
        } else {
            r
        }
    }

    const EDGES: [i64; 12] = [
        0,
        1,
        -1,
        TWO_PI_RAW - 1,
        TWO_PI_RAW,
        TWO_PI_RAW + 1,
        -TWO_PI_RAW,
        i64::MAX,
        i64::MIN,
        i64::MIN + 1,
        123_456_789_012_345,
        -987_654_321_098,
    ];

    #[test]
    fn two_pi_constant_matches_fixed64() {
        assert_eq!(TWO_PI_RAW, 26_986_075_409);
        assert!(RECIPROCAL < 1 << 30);
    }

    #[test]
    fn lane_model_matches_remainder() {
        for &x in &EDGES {
            assert_eq!(lane_model(x), reduce_scalar(x), "x = {x}");
        }
        let mut x: i64 = 0x0123_4567_89AB_CDEF;
        for _ in 0..10_000 {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            assert_eq!(lane_model(x), reduce_scalar(x), "x = {x}");
        }
    }

    #[test]
    fn dispatched_kernels_match_remainder() {
        for quad in EDGES.chunks_exact(4) {
            let lanes = [quad[0], quad[1], quad[2], quad[3]];
            assert_eq!(reduce_lanes_x4(lanes), lanes.map(reduce_scalar));
            assert_eq!(
                reduce_lanes_x2([quad[0], quad[3]]),
                [reduce_scalar(quad[0]), reduce_scalar(quad[3])]
            );
        }
    }

    #[test]
    fn detection_is_stable() {
        let first = CpuFeatures::detect();
        assert_eq!(CpuFeatures::detect(), first);
        assert_eq!(BatchPath::current(), BatchPath::for_features(first));
    }

    #[test]
    fn feature_set_display() {
        assert_eq!(CpuFeatures::empty().to_string(), "none");
        let set = CpuFeatures::SSE2.union(CpuFeatures::AVX2);
        assert_eq!(set.to_string(), "sse2+avx2");
        assert_eq!(BatchPath::for_features(set), BatchPath::Avx2);
        assert_eq!(BatchPath::for_features(CpuFeatures::SSE2), BatchPath::Scalar);
    }
}

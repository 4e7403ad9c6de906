// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rendering with a format-spec mini-language:
//!
//! ```text
//! [[fill]align][sign][#][0][width][.precision][type]
//!
//! align     '<' left, '>' right (default), '^' centre
//! sign      '-' negative only (default), '+' always, ' ' space for positive
//! '#'       alternate form: 0x / 0X / 0b / 0B prefix on x, X, b, B and '?'
//! '0'       sign-aware zero padding up to width
//! type      g  general: fraction digits until exact or precision (default)
//!           f  fixed: exactly `precision` fraction digits (default 6)
//!           d  integral part in decimal
//!           x X b B o  integral part in hex, binary, octal
//!           ?  raw storage value in hex
//! ```
//!
//! Fraction digits are produced exactly (the expansion of `raw / 2^F` is
//! finite in every supported base) and truncated at the precision. Nothing
//! allocates: [`Fixed::write_formatted`] writes into any [`fmt::Write`].
//!
//! The standard formatting traits are implemented too. `{}` prints the exact
//! decimal expansion and honours width, fill, alignment, `+`, `0` and
//! `.precision` (which pads like `f`). `{:x}`, `{:X}`, `{:o}` and `{:b}` print
//! integral and fractional digits in that base. `{:?}` prints the value with
//! its raw bits.

use core::fmt::{self, Write as _};
use core::str::FromStr;

use thiserror::Error;

use crate::fixed::Fixed;
use crate::storage::Storage;

/// Horizontal placement inside the field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// `<`
    Left,
    /// `>`
    Right,
    /// `^`
    Center,
}

/// When to print a sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignMode {
    /// Only for negative values.
    #[default]
    Minus,
    /// `+` for non-negative values.
    Plus,
    /// A space for non-negative values.
    Space,
}

/// Presentation type, the trailing character of a spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// `g`
    #[default]
    General,
    /// `f`
    Fixed,
    /// `d`
    Decimal,
    /// `x`
    Hex,
    /// `X`
    UpperHex,
    /// `b`
    Binary,
    /// `B`
    UpperBinary,
    /// `o`
    Octal,
    /// `?`
    Raw,
}

/// A parsed format spec. See the module documentation for the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatSpec {
    /// Padding character.
    pub fill: char,
    /// Placement; `None` means right-aligned.
    pub align: Option<Align>,
    /// Sign policy.
    pub sign: SignMode,
    /// Print the radix prefix.
    pub alternate: bool,
    /// Pad with zeros between the sign and the digits.
    pub zero_pad: bool,
    /// Minimum field width in characters.
    pub width: usize,
    /// Fraction digits, or `None` for the style's default.
    pub precision: Option<usize>,
    /// Presentation type.
    pub style: Style,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: SignMode::Minus,
            alternate: false,
            zero_pad: false,
            width: 0,
            precision: None,
            style: Style::General,
        }
    }
}

/// A format spec that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A character that does not fit the grammar at this point.
    #[error("unexpected {found:?} at byte {position} of format spec")]
    Unexpected {
        /// Byte offset into the spec.
        position: usize,
        /// Offending character.
        found: char,
    },
    /// `.` was not followed by digits.
    #[error("missing precision after '.' at byte {position}")]
    MissingPrecision {
        /// Byte offset just past the `.`.
        position: usize,
    },
    /// Width or precision does not fit in `usize`.
    #[error("width or precision too large")]
    TooLarge,
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.text[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<Option<usize>, SpecError> {
        let mut value: Option<usize> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(d as usize))
                .ok_or(SpecError::TooLarge)?;
            value = Some(next);
            self.pos += 1;
        }
        Ok(value)
    }
}

const fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    }
}

impl FromStr for FormatSpec {
    type Err = SpecError;

    fn from_str(text: &str) -> Result<Self, SpecError> {
        let mut spec = Self::default();
        let mut cursor = Cursor { text, pos: 0 };

        if let Some(align) = cursor.peek_second().and_then(align_of) {
            if let Some(fill) = cursor.bump() {
                spec.fill = fill;
            }
            cursor.bump();
            spec.align = Some(align);
        } else if let Some(align) = cursor.peek().and_then(align_of) {
            cursor.bump();
            spec.align = Some(align);
        }

        if cursor.eat('+') {
            spec.sign = SignMode::Plus;
        } else if cursor.eat(' ') {
            spec.sign = SignMode::Space;
        } else {
            cursor.eat('-');
        }
        spec.alternate = cursor.eat('#');
        spec.zero_pad = cursor.eat('0');
        spec.width = cursor.number()?.unwrap_or(0);
        if cursor.eat('.') {
            let position = cursor.pos;
            spec.precision = Some(
                cursor
                    .number()?
                    .ok_or(SpecError::MissingPrecision { position })?,
            );
        }

        let position = cursor.pos;
        if let Some(c) = cursor.bump() {
            spec.style = match c {
                'g' => Style::General,
                'f' => Style::Fixed,
                'd' => Style::Decimal,
                'x' => Style::Hex,
                'X' => Style::UpperHex,
                'b' => Style::Binary,
                'B' => Style::UpperBinary,
                'o' => Style::Octal,
                '?' => Style::Raw,
                found => return Err(SpecError::Unexpected { position, found }),
            };
        }
        if let Some(found) = cursor.peek() {
            return Err(SpecError::Unexpected {
                position: cursor.pos,
                found,
            });
        }
        Ok(spec)
    }
}

impl FormatSpec {
    /// Lifts the flags of a `core::fmt` formatter into a spec.
    fn from_formatter(f: &fmt::Formatter<'_>, style: Style) -> Self {
        Self {
            fill: f.fill(),
            align: f.align().map(|a| match a {
                fmt::Alignment::Left => Align::Left,
                fmt::Alignment::Right => Align::Right,
                fmt::Alignment::Center => Align::Center,
            }),
            sign: if f.sign_plus() {
                SignMode::Plus
            } else {
                SignMode::Minus
            },
            alternate: f.alternate(),
            zero_pad: f.sign_aware_zero_pad(),
            width: f.width().unwrap_or(0),
            precision: f.precision(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Fraction {
    Omit,
    Trim(Option<usize>),
    Pad(usize),
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    radix: u32,
    uppercase: bool,
    prefix: &'static str,
    fraction: Fraction,
}

impl Layout {
    const fn integral(radix: u32, uppercase: bool, prefix: &'static str) -> Self {
        Self {
            radix,
            uppercase,
            prefix,
            fraction: Fraction::Omit,
        }
    }

    const fn for_style(style: Style, precision: Option<usize>) -> Self {
        match style {
            Style::General => Self {
                fraction: Fraction::Trim(precision),
                ..Self::integral(10, false, "")
            },
            Style::Fixed => Self {
                fraction: Fraction::Pad(match precision {
                    Some(p) => p,
                    None => 6,
                }),
                ..Self::integral(10, false, "")
            },
            Style::Decimal => Self::integral(10, false, ""),
            Style::Hex | Style::Raw => Self::integral(16, false, "0x"),
            Style::UpperHex => Self::integral(16, true, "0X"),
            Style::Binary => Self::integral(2, false, "0b"),
            Style::UpperBinary => Self::integral(2, false, "0B"),
            Style::Octal => Self::integral(8, false, ""),
        }
    }
}

/// Counts characters without storing them.
struct Counter(usize);

impl fmt::Write for Counter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.chars().count();
        Ok(())
    }
}

const DIGITS: &[u8; 16] = b"0123456789abcdef";

#[allow(clippy::cast_possible_truncation)]
fn write_digit<W: fmt::Write>(out: &mut W, digit: u128, uppercase: bool) -> fmt::Result {
    let c = char::from(DIGITS[(digit & 0xf) as usize]);
    out.write_char(if uppercase { c.to_ascii_uppercase() } else { c })
}

fn write_fill<W: fmt::Write>(out: &mut W, fill: char, count: usize) -> fmt::Result {
    for _ in 0..count {
        out.write_char(fill)?;
    }
    Ok(())
}

/// Writes `magnitude / 2^frac_bits` in the layout's radix, unsigned.
fn write_digits<W: fmt::Write>(
    out: &mut W,
    magnitude: u128,
    frac_bits: u32,
    layout: Layout,
) -> fmt::Result {
    let radix = u128::from(layout.radix);
    let integral = magnitude >> frac_bits;
    let mask = (1_u128 << frac_bits) - 1;

    let mut place = 1_u128;
    while place <= integral / radix {
        place *= radix;
    }
    loop {
        write_digit(out, (integral / place) % radix, layout.uppercase)?;
        if place == 1 {
            break;
        }
        place /= radix;
    }

    let (limit, pad) = match layout.fraction {
        Fraction::Omit => return Ok(()),
        Fraction::Trim(precision) => (precision.unwrap_or(usize::MAX), false),
        Fraction::Pad(precision) => (precision, true),
    };
    let mut value = magnitude & mask;
    if limit == 0 || (value == 0 && !pad) {
        return Ok(());
    }

    out.write_char('.')?;
    let mut written = 0;
    while written < limit && value != 0 {
        value *= radix;
        write_digit(out, value >> frac_bits, layout.uppercase)?;
        value &= mask;
        written += 1;
    }
    if pad {
        write_fill(out, '0', limit - written)?;
    }
    Ok(())
}

fn render<W: fmt::Write>(
    out: &mut W,
    negative: bool,
    magnitude: u128,
    frac_bits: u32,
    layout: Layout,
    spec: &FormatSpec,
) -> fmt::Result {
    let sign = match (negative, spec.sign) {
        (true, _) => "-",
        (false, SignMode::Plus) => "+",
        (false, SignMode::Space) => " ",
        (false, SignMode::Minus) => "",
    };
    let prefix = if spec.alternate { layout.prefix } else { "" };

    let mut counter = Counter(0);
    write_digits(&mut counter, magnitude, frac_bits, layout)?;
    let pad = spec
        .width
        .saturating_sub(sign.len() + prefix.len() + counter.0);

    if spec.zero_pad {
        out.write_str(sign)?;
        out.write_str(prefix)?;
        write_fill(out, '0', pad)?;
        return write_digits(out, magnitude, frac_bits, layout);
    }

    let (before, after) = match spec.align.unwrap_or(Align::Right) {
        Align::Left => (0, pad),
        Align::Right => (pad, 0),
        Align::Center => (pad / 2, pad - pad / 2),
    };
    write_fill(out, spec.fill, before)?;
    out.write_str(sign)?;
    out.write_str(prefix)?;
    write_digits(out, magnitude, frac_bits, layout)?;
    write_fill(out, spec.fill, after)
}

impl<S: Storage, const F: u32, const ROUND: bool> Fixed<S, F, ROUND> {
    /// Writes `self` according to `spec`.
    ///
    /// ```
    /// use detfix_core::{Fixed32, FormatSpec};
    ///
    /// let spec: FormatSpec = "*^+10.3f".parse()?;
    /// let mut out = String::new();
    /// Fixed32::from_f64(-2.5).write_formatted(&mut out, &spec)?;
    /// assert_eq!(out, "**-2.500**");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_formatted<W: fmt::Write>(self, out: &mut W, spec: &FormatSpec) -> fmt::Result {
        self.render_layout(out, spec, Layout::for_style(spec.style, spec.precision))
    }

    /// A [`Display`](fmt::Display) adapter that renders with `spec`.
    pub fn formatted(self, spec: FormatSpec) -> Formatted<S, F, ROUND> {
        Formatted { value: self, spec }
    }

    fn render_layout<W: fmt::Write>(self, out: &mut W, spec: &FormatSpec, layout: Layout) -> fmt::Result {
        let raw = self.to_i128();
        let frac_bits = if spec.style == Style::Raw { 0 } else { F };
        render(out, raw < 0, raw.unsigned_abs(), frac_bits, layout, spec)
    }

    fn fmt_radix(
        self,
        f: &mut fmt::Formatter<'_>,
        radix: u32,
        uppercase: bool,
        prefix: &'static str,
    ) -> fmt::Result {
        let spec = FormatSpec::from_formatter(f, Style::General);
        let layout = Layout {
            fraction: Fraction::Trim(spec.precision),
            ..Layout::integral(radix, uppercase, prefix)
        };
        self.render_layout(f, &spec, layout)
    }
}

/// Output of [`Fixed::formatted`].
#[derive(Debug, Clone, Copy)]
pub struct Formatted<S: Storage, const F: u32, const ROUND: bool> {
    value: Fixed<S, F, ROUND>,
    spec: FormatSpec,
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::Display for Formatted<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.write_formatted(f, &self.spec)
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::Display for Fixed<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if f.precision().is_some() {
            Style::Fixed
        } else {
            Style::General
        };
        let spec = FormatSpec::from_formatter(f, style);
        self.write_formatted(f, &spec)
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::Debug for Fixed<S, F, ROUND> {
    #[allow(clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = (self.to_i128() as u128) & (u128::MAX >> (128 - S::BITS));
        f.write_str("Fixed(")?;
        self.write_formatted(f, &FormatSpec::default())?;
        write!(f, ", raw = {bits:#x})")
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::LowerHex for Fixed<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(f, 16, false, "0x")
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::UpperHex for Fixed<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(f, 16, true, "0X")
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::Octal for Fixed<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(f, 8, false, "")
    }
}

impl<S: Storage, const F: u32, const ROUND: bool> fmt::Binary for Fixed<S, F, ROUND> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(f, 2, false, "0b")
    }
}

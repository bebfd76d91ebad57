use fixed::types::I32F32;

/// Points per inch.
pub const INCH: f32 = 72.0;

/// Length in PDF points, held as I32F32 and quantised to 1/1000 pt so that
/// layout arithmetic is reproducible across platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Pt(I32F32);

const FRAC_SCALE: i128 = 1 << 32;

/// Integer division rounding half away from zero.
fn round_div(num: i128, den: i128) -> i128 {
    if den == 0 {
        return 0;
    }
    let half = den.abs() / 2;
    let magnitude = (num.abs() + half) / den.abs();
    if (num < 0) != (den < 0) { -magnitude } else { magnitude }
}

impl Pt {
    pub const ZERO: Pt = Pt(I32F32::from_bits(0));

    fn from_milli(milli: i128) -> Pt {
        let bits = round_div(milli * FRAC_SCALE, 1000);
        Pt(I32F32::from_bits(
            bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
        ))
    }

    fn milli(self) -> i128 {
        round_div(i128::from(self.0.to_bits()) * 1000, FRAC_SCALE)
    }

    pub fn from_f32(value: f32) -> Pt {
        if !value.is_finite() {
            return Pt::ZERO;
        }
        Pt::from_milli((f64::from(value) * 1000.0).round() as i128)
    }

    pub fn from_i32(value: i32) -> Pt {
        Pt::from_milli(i128::from(value) * 1000)
    }

    pub fn from_milli_i64(milli: i64) -> Pt {
        Pt::from_milli(i128::from(milli))
    }

    pub fn inches(value: f32) -> Pt {
        Pt::from_f32(value * INCH)
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    pub fn to_milli_i64(self) -> i64 {
        self.milli().clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn max(self, other: Pt) -> Pt {
        if other > self { other } else { self }
    }

    pub fn min(self, other: Pt) -> Pt {
        if other < self { other } else { self }
    }

    /// `self * num / denom`, rounded to the nearest milli-point.
    pub fn mul_ratio(self, num: i32, denom: i32) -> Pt {
        Pt::from_milli(round_div(
            self.milli().saturating_mul(i128::from(num)),
            i128::from(denom),
        ))
    }
}

impl std::ops::Add for Pt {
    type Output = Pt;
    fn add(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() + rhs.milli())
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() - rhs.milli())
    }
}

impl std::ops::AddAssign for Pt {
    fn add_assign(&mut self, rhs: Pt) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Pt {
    fn sub_assign(&mut self, rhs: Pt) {
        *self = *self - rhs;
    }
}

impl std::ops::Neg for Pt {
    type Output = Pt;
    fn neg(self) -> Pt {
        Pt::from_milli(-self.milli())
    }
}

impl std::ops::Mul<i32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: i32) -> Pt {
        self.mul_ratio(rhs, 1)
    }
}

impl std::ops::Div<i32> for Pt {
    type Output = Pt;
    fn div(self, rhs: i32) -> Pt {
        self.mul_ratio(1, rhs)
    }
}

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f32) -> Pt {
        Pt::from_f32(self.to_f32() * rhs)
    }
}

impl std::iter::Sum for Pt {
    fn sum<I: Iterator<Item = Pt>>(iter: I) -> Pt {
        Pt::from_milli(iter.map(Pt::milli).sum())
    }
}

impl<'a> std::iter::Sum<&'a Pt> for Pt {
    fn sum<I: Iterator<Item = &'a Pt>>(iter: I) -> Pt {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Pt,
    pub height: Pt,
}

impl Size {
    pub fn a4() -> Self {
        Self {
            width: Pt::from_f32(595.28),
            height: Pt::from_f32(841.89),
        }
    }

    pub fn letter() -> Self {
        // 8.5in x 11in at 72pt/in.
        Self {
            width: Pt::from_f32(612.0),
            height: Pt::from_f32(792.0),
        }
    }

    pub fn from_inches(width_in: f32, height_in: f32) -> Self {
        Self {
            width: Pt::inches(width_in),
            height: Pt::inches(height_in),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        let v = Pt::from_f32(value);
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Content rectangle of a page of `size` inside these margins.
    pub fn content_rect(&self, size: Size) -> Rect {
        Rect {
            x: self.left,
            y: self.top,
            width: (size.width - self.left - self.right).max(Pt::ZERO),
            height: (size.height - self.top - self.bottom).max(Pt::ZERO),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |idx: usize| u8::from_str_radix(&digits[idx..idx + 2], 16).ok();
        Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_convert_at_72_points() {
        assert_eq!(Pt::inches(0.5).to_milli_i64(), 36_000);
        assert_eq!(Pt::inches(6.5).to_milli_i64(), 468_000);
    }

    #[test]
    fn default_length_is_zero() {
        assert_eq!(Pt::default(), Pt::ZERO);
        assert_eq!(Pt::default().to_milli_i64(), 0);
    }

    #[test]
    fn arithmetic_stays_on_the_milli_grid() {
        let third = Pt::from_i32(10).mul_ratio(1, 3);
        assert_eq!(third.to_milli_i64(), 3_333);
        assert_eq!((third * 3).to_milli_i64(), 9_999);
        assert_eq!((-Pt::from_f32(1.5)).to_milli_i64(), -1_500);
        assert_eq!(Pt::from_i32(7) / 0, Pt::ZERO);
        let total: Pt = [Pt::from_f32(0.1), Pt::from_f32(0.2)].iter().sum();
        assert_eq!(total, Pt::from_f32(0.3));
    }

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        let navy = Color::from_hex("#1a365d").expect("navy");
        assert_eq!(navy, Color::from_rgb8(0x1a, 0x36, 0x5d));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
    }

    #[test]
    fn content_rect_subtracts_margins() {
        let margins = Margins {
            top: Pt::inches(0.6),
            right: Pt::inches(0.6),
            bottom: Pt::inches(0.75),
            left: Pt::inches(0.6),
        };
        let rect = margins.content_rect(Size::letter());
        assert_eq!(rect.x, Pt::inches(0.6));
        assert_eq!(rect.width.to_milli_i64(), 525_600);
        assert_eq!(rect.height.to_milli_i64(), 694_800);
    }
}

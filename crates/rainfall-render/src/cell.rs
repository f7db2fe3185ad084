#![forbid(unsafe_code)]

//! Cell types and colors.
//!
//! A [`Cell`] is one terminal grid position: a glyph plus straight-alpha
//! foreground and background colors. Translucent colors are kept as-is in
//! the grid so that repeated fades accumulate the way they would on a
//! canvas; the presenter flattens them onto an opaque backdrop at output
//! time.

/// Glyph content of a cell.
///
/// Stores a Unicode scalar value, or `0` for an empty cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CellContent(u32);

impl CellContent {
    /// Empty cell content.
    pub const EMPTY: Self = Self(0);

    /// Content holding a single character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    /// The stored character, if any.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.0 == 0 {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Whether the cell has no glyph.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw storage value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "Char({c:?})"),
            None => f.write_str("Empty"),
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Glyph content.
    pub content: CellContent,
    /// Foreground (glyph) color.
    pub fg: PackedRgba,
    /// Background color.
    pub bg: PackedRgba,
}

impl Cell {
    /// Create a cell from a single character with a transparent background.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self {
            content: CellContent::from_char(c),
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
        }
    }

    /// Check if this cell has no glyph.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Set the foreground color.
    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }
}

impl Default for Cell {
    /// An empty, fully transparent cell (a freshly cleared canvas).
    fn default() -> Self {
        Self {
            content: CellContent::EMPTY,
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
        }
    }
}

/// A compact RGBA color.
///
/// - **Layout:** `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
/// - **Straight alpha**: RGB channels are not pre-multiplied.
///
/// Compositing uses Porter-Duff **SourceOver** (`src over dst`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Create a color from RGB channels and a CSS-style opacity in `[0, 1]`.
    ///
    /// `rgba(10, 25, 47, 0.02)` becomes `rgba_f32(10, 25, 47, 0.02)`.
    #[inline]
    pub fn rgba_f32(r: u8, g: u8, b: u8, opacity: f32) -> Self {
        Self::rgb(r, g, b).with_opacity(opacity)
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether alpha is 255.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a() == 255
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        debug_assert!(denom != 0);
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `self over dst`.
    ///
    /// Computed in exact rational form and rounded once at the end.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;

        // numer_a = 255*s_a + d_a*(255 - s_a), i.e. out_a scaled by 255^2.
        let numer_a = 255 * s_a + d_a * inv_s_a;
        let out_a = Self::div_round_u8(numer_a, 255);

        let channel = |s: u8, d: u8| {
            Self::div_round_u8(
                (s as u64) * s_a * 255 + (d as u64) * d_a * inv_s_a,
                numer_a,
            )
        };

        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            out_a,
        )
    }

    /// Apply uniform opacity in `[0.0, 1.0]` by scaling alpha.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = ((self.a() as f32) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_roundtrip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn opaque_source_wins() {
        let src = PackedRgba::rgb(100, 255, 218);
        assert_eq!(src.over(PackedRgba::BLACK), src);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let dst = PackedRgba::rgb(10, 25, 47);
        assert_eq!(PackedRgba::TRANSPARENT.over(dst), dst);
    }

    #[test]
    fn translucent_over_transparent_keeps_color() {
        let src = PackedRgba::rgba(10, 25, 47, 5);
        let out = src.over(PackedRgba::TRANSPARENT);
        assert_eq!(out, src);
    }

    #[test]
    fn half_alpha_over_opaque_mixes() {
        let src = PackedRgba::rgba(255, 0, 0, 128);
        let out = src.over(PackedRgba::rgb(0, 0, 255));
        assert_eq!(out.a(), 255);
        assert!(out.r() > 120 && out.r() < 135);
        assert!(out.b() > 120 && out.b() < 135);
    }

    #[test]
    fn css_opacity_maps_to_alpha() {
        assert_eq!(PackedRgba::rgba_f32(10, 25, 47, 0.02).a(), 5);
        assert_eq!(PackedRgba::rgba_f32(100, 255, 218, 0.35).a(), 89);
        assert_eq!(PackedRgba::rgba_f32(0, 0, 0, 2.0).a(), 255);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(
            PackedRgba::from_hex("#0a192f"),
            Some(PackedRgba::rgb(10, 25, 47))
        );
        assert_eq!(
            PackedRgba::from_hex("64ffda59"),
            Some(PackedRgba::rgba(100, 255, 218, 0x59))
        );
        assert_eq!(PackedRgba::from_hex("#xyz"), None);
        assert_eq!(PackedRgba::from_hex("#12345"), None);
        assert_eq!(PackedRgba::from_hex("#ééé"), None);
    }

    #[test]
    fn default_cell_is_clear() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.fg, PackedRgba::TRANSPARENT);
        assert_eq!(cell.bg, PackedRgba::TRANSPARENT);
    }

    #[test]
    fn content_debug() {
        assert_eq!(format!("{:?}", CellContent::from_char('A')), "Char('A')");
        assert_eq!(format!("{:?}", CellContent::EMPTY), "Empty");
    }
}

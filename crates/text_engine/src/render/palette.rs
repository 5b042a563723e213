//! Color palettes for indexed glyph pixels
//!
//! Glyph bitmaps store palette indices. A [`Palette`] maps those indices to
//! colors and is shared between fonts, atlas pages, spans and containers
//! through [`SharedPalette`] handles.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{TextError, TextResult};

/// Number of entries in every palette
pub const PALETTE_SIZE: usize = 256;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red, used for debug outlines
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Create a color from all four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels as an `[r, g, b, a]` array
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn lerp(from: Self, to: Self, t: usize, steps: usize) -> Self {
        let mix = |a: u8, b: u8| {
            let a = i32::from(a);
            let b = i32::from(b);
            // t <= steps, so the result stays within the channel range
            u8::try_from(a + (b - a) * t as i32 / steps as i32).unwrap_or(u8::MAX)
        };
        Self::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b), mix(from.a, to.a))
    }
}

/// Immutable table of [`PALETTE_SIZE`] colors
///
/// Index 0 is the transparent background entry; glyph pixels with value 0
/// are never drawn.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from explicit colors
    ///
    /// Missing entries are filled with transparent black. More than
    /// [`PALETTE_SIZE`] colors is an error.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> TextResult<Self> {
        let mut colors: Vec<Color> = colors.into_iter().collect();
        if colors.len() > PALETTE_SIZE {
            return Err(TextError::InvalidBitmap(format!(
                "palette has {} colors, at most {} are allowed",
                colors.len(),
                PALETTE_SIZE
            )));
        }
        colors.resize(PALETTE_SIZE, Color::TRANSPARENT);
        Ok(Self { colors })
    }

    /// Build a font palette ramping from `back` (index 1) to `fore` (index 255)
    pub fn gradient(fore: Color, back: Color) -> Self {
        let steps = PALETTE_SIZE - 2;
        let colors = std::iter::once(Color::TRANSPARENT)
            .chain((0..=steps).map(|t| Color::lerp(back, fore, t, steps)))
            .collect();
        Self { colors }
    }

    /// Look up the color for a pixel index
    pub fn color(&self, index: u8) -> Color {
        self.colors[usize::from(index)]
    }

    /// All colors in index order
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::gradient(Color::WHITE, Color::BLACK)
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("background", &self.colors[1])
            .field("foreground", &self.colors[PALETTE_SIZE - 1])
            .finish()
    }
}

/// Reference-counted handle to a shared palette
///
/// Every holder owns exactly one reference: [`SharedPalette::acquire`]
/// takes one and dropping the handle releases it. The palette is freed
/// when the last handle is dropped, and it cannot be mutated while shared.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedPalette(Rc<Palette>);

impl SharedPalette {
    /// Wrap a palette; the returned handle holds the first reference
    pub fn new(palette: Palette) -> Self {
        Self(Rc::new(palette))
    }

    /// Take another reference to the same palette
    #[must_use = "dropping the handle releases the reference immediately"]
    pub fn acquire(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// Number of live references, including this one
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Check whether two handles refer to the same palette
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedPalette {
    type Target = Palette;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Palette> for SharedPalette {
    fn from(palette: Palette) -> Self {
        Self::new(palette)
    }
}

impl Default for SharedPalette {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

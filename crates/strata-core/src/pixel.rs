//! Pixel, channel and coordinate types.
//!
//! # Types
//!
//! - [`Pixel`] - RGB triple with signed, unbounded channels
//! - [`Channel`] - selector for one of the three components
//! - [`PixelCoord`] - zero-based (row, column) position
//!
//! # Channel Range
//!
//! Channels are plain `i32` values and are **not** bounded when a pixel is
//! built. Intermediate results of a color transform may leave `[0, 255]`;
//! operations bound them explicitly with [`Pixel::clamped`]:
//!
//! ```
//! use strata_core::Pixel;
//!
//! let hot = Pixel::new(300, -20, 128);
//! assert_eq!(hot.clamped(), Pixel::new(255, 0, 128));
//! ```

use std::fmt;

/// Lowest value a displayable channel may hold.
pub const CHANNEL_MIN: i32 = 0;

/// Highest value a displayable channel may hold.
pub const CHANNEL_MAX: i32 = 255;

/// One of the three color components of a [`Pixel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red component.
    Red,
    /// Green component.
    Green,
    /// Blue component.
    Blue,
}

impl Channel {
    /// All channels in R, G, B order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// An RGB color triple.
///
/// Equality is channel-wise. `Pixel` is `Copy`: storing it into an image
/// copies its channels, so no two grid cells can alias one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    /// Red channel value.
    pub r: i32,
    /// Green channel value.
    pub g: i32,
    /// Blue channel value.
    pub b: i32,
}

impl Pixel {
    /// Opaque white, the default fill of a new image.
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    /// Black.
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    /// Creates a pixel from its channels.
    #[inline]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Creates a gray pixel with equal channels.
    #[inline]
    pub const fn gray(v: i32) -> Self {
        Self::new(v, v, v)
    }

    /// Returns the value of one channel.
    #[inline]
    pub const fn channel(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// Returns a copy with one channel replaced.
    #[inline]
    pub const fn with_channel(self, channel: Channel, value: i32) -> Self {
        match channel {
            Channel::Red => Self::new(value, self.g, self.b),
            Channel::Green => Self::new(self.r, value, self.b),
            Channel::Blue => Self::new(self.r, self.g, value),
        }
    }

    /// Returns a copy with every channel bounded to `[0, 255]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(CHANNEL_MIN, CHANNEL_MAX),
            self.g.clamp(CHANNEL_MIN, CHANNEL_MAX),
            self.b.clamp(CHANNEL_MIN, CHANNEL_MAX),
        )
    }

    /// Returns `true` if every channel lies in `[0, 255]`.
    #[inline]
    pub fn is_displayable(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|v| (CHANNEL_MIN..=CHANNEL_MAX).contains(v))
    }

    /// Channels as an `[r, g, b]` array.
    #[inline]
    pub const fn to_array(self) -> [i32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[i32; 3]> for Pixel {
    fn from([r, g, b]: [i32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r.into(), g.into(), b.into())
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A zero-based (row, column) position.
///
/// Components are signed so that neighborhoods around edge pixels can be
/// expressed; whether a coordinate is valid depends on the image asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelCoord {
    /// Row index (y).
    pub row: i32,
    /// Column index (x).
    pub col: i32,
}

impl PixelCoord {
    /// Creates a coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Taxicab (Manhattan) distance: `|Δrow| + |Δcol|`.
    ///
    /// ```
    /// use strata_core::PixelCoord;
    ///
    /// let a = PixelCoord::new(1, 1);
    /// assert_eq!(a.taxicab_distance(PixelCoord::new(4, -1)), 5);
    /// ```
    #[inline]
    pub fn taxicab_distance(self, other: PixelCoord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the coordinate shifted by the given offsets.
    #[inline]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

impl From<(i32, i32)> for PixelCoord {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

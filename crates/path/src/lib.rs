#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]

//! Packed path command streams and stroke configuration.
//!
//! A [`Path`] stores its commands as a byte stream in one of several numeric
//! formats (see [`NumericFormat`] and the [commands](commands/index.html)
//! module for the opcode table). Besides the usual move, line and bézier
//! commands the stream can contain relative coordinates, horizontal and
//! vertical lines, smooth curves and elliptic arcs. The [`Normalizer`]
//! resolves all of these into canonical [`PathEvent`]s.
//!
//! A path can own a stroke ([`StrokeState`]), configured with
//! [`Path::set_stroke`]. The stroke outline itself is built by the
//! `ribbon_stroke` crate.
//!
//! This crate is reexported in [ribbon](../ribbon/index.html).
//!
//! # Examples
//!
//! ```
//! use ribbon_path::{Command, NumericFormat, Path, PathEvent, Quality};
//! use ribbon_path::math::point;
//!
//! let mut path = Path::new(NumericFormat::S16, Quality::High);
//! path.append_commands(&[
//!     Command::MoveTo { to: point(0.0, 0.0), relative: false },
//!     Command::HorizontalLineTo { x: 100.0, relative: false },
//!     Command::VerticalLineTo { y: 50.0, relative: true },
//!     Command::Close,
//! ]).unwrap();
//!
//! for event in path.events() {
//!     match event {
//!         PathEvent::Begin { at } => { println!("begin {:?}", at); }
//!         PathEvent::Line { to, .. } => { println!("line to {:?}", to); }
//!         PathEvent::End { close, .. } => { println!("end (close: {})", close); }
//!         _ => {}
//!     }
//! }
//! ```

pub use ribbon_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod commands;
mod error;
mod format;
mod normalize;
mod path;
mod style;

#[doc(inline)]
pub use crate::commands::{decode_commands, encode_commands, Command, Commands, Opcode};
pub use crate::error::{Error, InvalidArgument, StrokeResult};
pub use crate::format::NumericFormat;
pub use crate::geom::ArcFlags;
pub use crate::normalize::{Events, Normalizer, PathEvent};
#[doc(inline)]
pub use crate::path::Path;
pub use crate::style::{DashCursor, DashPattern, StrokeState, StrokeStyle};

pub mod math {
    //! f32 version of the ribbon_geom types used everywhere. Most other ribbon crates
    //! reexport them.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```
    pub type Box2D = euclid::default::Box2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}

/// Line cap as defined by the SVG specification.
///
/// See: <https://svgwg.org/specs/strokes/#StrokeLinecapProperty>
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke for each sub-path does not extend beyond its two endpoints.
    /// A zero length sub-path will therefore not have any stroke.
    Butt,
    /// At the end of each sub-path, the shape representing the stroke will be
    /// extended by a rectangle with the same width as the stroke width and
    /// whose length is half of the stroke width. If a sub-path has zero length,
    /// then the resulting effect is that the stroke for that sub-path consists
    /// solely of a square with side length equal to the stroke width, centered
    /// at the sub-path's point.
    Square,
    /// At each end of each sub-path, the shape representing the stroke will be
    /// extended by a half circle with a radius equal to half of the stroke width.
    /// If a sub-path has zero length, then the resulting effect is that the
    /// stroke for that sub-path consists solely of a full circle centered at
    /// the sub-path's point.
    Round,
}

/// Line join as defined by the SVG specification.
///
/// See: <https://svgwg.org/specs/strokes/#StrokeLinejoinProperty>
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// A sharp corner is to be used to join path segments, as long as the
    /// miter limit allows it. Falls back to `Bevel` otherwise.
    Miter,
    /// A round corner is to be used to join path segments.
    Round,
    /// A bevelled corner is to be used to join path segments.
    /// The bevel shape is a triangle that fills the area between the two stroked
    /// segments.
    Bevel,
}

/// Whether a path is meant to be filled, stroked or both.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathType {
    Fill,
    Stroke,
    FillStroke,
}

impl Default for PathType {
    fn default() -> Self {
        PathType::Fill
    }
}

/// Rendering quality hint, stored for the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Default for Quality {
    fn default() -> Self {
        Quality::High
    }
}

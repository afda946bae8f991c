#![deny(bare_trait_objects)]

//! Compact 2D paths and their stroke outlines.
//!
//! # Crates
//!
//! This meta-crate (`ribbon`) reexports the following sub-crates for convenience:
//!
//! * **ribbon_stroke** - Turns the stroke of a path into a fillable outline.
//! * **ribbon_path** - Packed command streams, normalization and stroke styles.
//! * **ribbon_geom** - Line segments, bézier curves and arcs.
//!
//! Each `ribbon_<name>` crate is reexported as a `<name>` module in `ribbon`. For example:
//!
//! ```ignore
//! use ribbon_stroke::Stroker;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use ribbon::stroke::Stroker;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! Dash patterns are enabled by default and can be removed by disabling the
//! `dash` feature, in which case setting a dashed stroke fails with
//! `Error::NotSupported`.
//!
//! # Examples
//!
//! ```
//! use ribbon::path::{Command, LineCap, NumericFormat, Path, Quality, StrokeStyle};
//! use ribbon::math::point;
//!
//! let mut path = Path::new(NumericFormat::S16, Quality::High);
//! path.append_commands(&[
//!     Command::MoveTo { to: point(10.0, 10.0), relative: false },
//!     Command::LineTo { to: point(90.0, 10.0), relative: false },
//!     Command::LineTo { to: point(90.0, 90.0), relative: false },
//!     Command::Close,
//! ]).unwrap();
//!
//! path.set_stroke(&StrokeStyle::line_width(4.0).with_line_cap(LineCap::Round)).unwrap();
//! ribbon::stroke::update_stroke(&mut path).unwrap();
//!
//! // The outline is a regular command stream, filled with the non-zero rule.
//! let outline = path.stroke_commands().unwrap();
//! assert_eq!(outline.last(), Some(&Command::End));
//! ```

pub use ribbon_stroke as stroke;
pub use stroke::geom;
pub use stroke::path;

pub use path::math;

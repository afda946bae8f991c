#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Stroke outlines.
//!
//! This crate turns the stroke of a [`Path`] into a path that, filled with the
//! non-zero rule, covers the same area as the stroke. The outline is stored on
//! the path's stroke state as a command stream in `NumericFormat::Fp32` (see
//! [`Path::stroke_path`](path::Path::stroke_path)).
//!
//! The work happens in three steps:
//!
//! - The path's events are flattened into polylines. Curves are approximated
//!   within the stroke's tolerance.
//! - Each polyline is offset on both sides by half of the line width, with
//!   joins at the vertices and caps at the ends. If the stroke has a dash
//!   pattern, the polylines are split into dashes first.
//! - The resulting rings are written as move, line and quadratic bézier
//!   commands. Round joins and caps are approximated with quadratic curves.
//!
//! # Examples
//!
//! ```
//! use ribbon_stroke::path::{Command, LineJoin, NumericFormat, Path, Quality, StrokeStyle};
//! use ribbon_stroke::math::point;
//! use ribbon_stroke::update_stroke;
//!
//! let mut path = Path::new(NumericFormat::S16, Quality::High);
//! path.append_commands(&[
//!     Command::MoveTo { to: point(0.0, 0.0), relative: false },
//!     Command::LineTo { to: point(100.0, 0.0), relative: false },
//!     Command::LineTo { to: point(100.0, 100.0), relative: false },
//! ]).unwrap();
//!
//! path.set_stroke(&StrokeStyle::line_width(10.0).with_line_join(LineJoin::Round)).unwrap();
//! update_stroke(&mut path).unwrap();
//!
//! for cmd in path.stroke_commands().unwrap() {
//!     println!("{:?}", cmd);
//! }
//! ```

pub use ribbon_path as path;

pub use crate::path::geom;
pub use crate::path::math;

#[doc(inline)]
pub use crate::path::{
    DashPattern, Error, InvalidArgument, LineCap, LineJoin, StrokeResult, StrokeState,
    StrokeStyle,
};

#[cfg(feature = "dash")]
mod dash;
mod flatten;
mod outline;
mod serialize;

#[cfg(test)]
mod stroke_tests;

use crate::flatten::{Flattener, Vertex};
use crate::math::vector;
use crate::outline::OutlineBuilder;
use crate::path::{Command, Path};

/// Builds the stroke outline of a path.
///
/// This is a shorthand for `Stroker::new().update(path)`. Use a [`Stroker`] to
/// reuse the allocations when updating many paths.
pub fn update_stroke(path: &mut Path) -> StrokeResult {
    Stroker::new().update(path)
}

/// A context object that builds stroke outlines.
///
/// The stroker only holds scratch memory. It can be used with any number of
/// paths, one at a time.
///
/// # Examples
///
/// ```
/// use ribbon_stroke::path::{Command, LineCap, NumericFormat, Path, Quality, StrokeStyle};
/// use ribbon_stroke::math::point;
/// use ribbon_stroke::Stroker;
///
/// let mut stroker = Stroker::new();
///
/// let mut path = Path::new(NumericFormat::Fp32, Quality::Medium);
/// path.append_commands(&[
///     Command::MoveTo { to: point(10.0, 10.0), relative: false },
///     Command::QuadraticTo { ctrl: point(60.0, 90.0), to: point(110.0, 10.0), relative: false },
/// ]).unwrap();
/// path.set_stroke(
///     &StrokeStyle::line_width(4.0)
///         .with_line_cap(LineCap::Round)
///         .with_dash_pattern(&[10.0, 4.0], 0.0)
/// ).unwrap();
///
/// stroker.update(&mut path).unwrap();
/// assert!(path.stroke_path().is_some());
/// ```
pub struct Stroker {
    flattener: Flattener,
    builder: OutlineBuilder,
    vertices: Vec<Vertex>,
    #[cfg(feature = "dash")]
    dasher: dash::Dasher,
    commands: Vec<Command>,
}

impl Stroker {
    pub fn new() -> Self {
        Stroker {
            flattener: Flattener::new(),
            builder: OutlineBuilder::new(),
            vertices: Vec::new(),
            #[cfg(feature = "dash")]
            dasher: dash::Dasher::new(),
            commands: Vec::new(),
        }
    }

    /// Builds the stroke outline of a path and stores it on the path's stroke
    /// state.
    ///
    /// The path must have a stroke (see `Path::set_stroke`). On failure the
    /// previous outline of the path is left untouched.
    pub fn update(&mut self, path: &mut Path) -> StrokeResult {
        let data = match self.stroke(path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Failed to update the stroke, keeping the previous outline: {}", e);
                return Err(e);
            }
        };

        let bytes = data.len();
        if let Some(state) = path.stroke_state_mut() {
            state.replace_stroke_path(data);
        }

        log::debug!(
            "Stroked {} sub-paths ({} vertices) into {} rings ({} bytes)",
            self.flattener.sub_paths().len(),
            self.flattener.arena().len(),
            self.builder.outline().ring_count(),
            bytes,
        );

        Ok(())
    }

    fn stroke(&mut self, path: &Path) -> Result<Vec<u8>, Error> {
        let state = path
            .stroke_state()
            .ok_or(InvalidArgument::MissingStroke)?;

        #[cfg(not(feature = "dash"))]
        {
            if state.dash().is_some() {
                return Err(Error::NotSupported("dash patterns"));
            }
        }

        self.flattener.reset(state.tolerance(), state.line_width());
        self.flattener.flatten(path.events())?;

        self.builder.reset(state);
        self.build_outline(state)?;

        let mut output = Vec::new();
        serialize::serialize(self.builder.outline(), &mut self.commands, &mut output)?;

        Ok(output)
    }

    #[cfg_attr(not(feature = "dash"), allow(unused_variables))]
    fn build_outline(&mut self, state: &StrokeState) -> Result<(), Error> {
        #[cfg(feature = "dash")]
        let pattern = state.dash();
        #[cfg(feature = "dash")]
        {
            if let Some(pattern) = pattern {
                self.dasher.begin(pattern);
            }
        }

        let arena = self.flattener.arena();
        for sub_path in self.flattener.sub_paths() {
            #[cfg(feature = "dash")]
            {
                if let Some(pattern) = pattern {
                    if state.dash_phase_reset() {
                        self.dasher.begin(pattern);
                    }
                }
            }

            if sub_path.is_zero_length() {
                #[cfg(feature = "dash")]
                {
                    if pattern.is_some() && !self.dasher.is_on() {
                        continue;
                    }
                }
                let at = arena.get(sub_path.first).position;
                self.builder.dot(at, vector(1.0, 0.0))?;
                continue;
            }

            self.vertices.clear();
            self.vertices.try_reserve(sub_path.count)?;
            self.vertices.extend(arena.chain(sub_path).cloned());

            #[cfg(feature = "dash")]
            {
                if let Some(pattern) = pattern {
                    self.dasher.polyline(
                        pattern,
                        &self.vertices,
                        sub_path.closed,
                        &mut self.builder,
                    )?;
                    continue;
                }
            }

            self.builder.polyline(&self.vertices, sub_path.closed)?;
        }

        Ok(())
    }
}

impl Default for Stroker {
    fn default() -> Self {
        Self::new()
    }
}

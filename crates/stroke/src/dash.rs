//! Splits flattened sub-paths into dashes.
//!
//! The dash cursor walks along the segments of each sub-path. Every visible
//! run becomes an open polyline with its own caps. On a closed sub-path that
//! starts and ends inside a visible run, the last and first runs are spliced
//! into a single dash joined at the seam.

use crate::flatten::{PointKind, Vertex};
use crate::outline::OutlineBuilder;
use crate::path::{DashCursor, DashPattern, Error};

/// Upper bound of the number of pattern periods along a single polyline.
const MAX_DASH_PERIODS: f32 = 1_048_576.0;

/// Walks dash patterns along polylines.
pub struct Dasher {
    cursor: DashCursor,
    run: Vec<Vertex>,
    first_run: Vec<Vertex>,
}

impl Dasher {
    pub fn new() -> Self {
        Dasher {
            cursor: DashCursor {
                index: 0,
                remaining: 0.0,
            },
            run: Vec::new(),
            first_run: Vec::new(),
        }
    }

    /// Moves the cursor to the phase of the pattern.
    pub fn begin(&mut self, pattern: &DashPattern) {
        self.cursor = pattern.start();
        self.run.clear();
        self.first_run.clear();
    }

    /// Whether the cursor is in a visible part of the pattern.
    pub fn is_on(&self) -> bool {
        self.cursor.is_on()
    }

    /// Dashes a polyline.
    ///
    /// If `closed` is true the first vertex carries the closing segment and
    /// the polyline is walked back to its first vertex.
    pub fn polyline(
        &mut self,
        pattern: &DashPattern,
        vertices: &[Vertex],
        closed: bool,
        output: &mut OutlineBuilder,
    ) -> Result<(), Error> {
        let first = match vertices.first() {
            Some(v) => *v,
            None => return Ok(()),
        };

        let mut length: f32 = vertices[1..].iter().map(|v| v.length).sum();
        if closed {
            length += first.length;
        }
        let periods = length / pattern.period();
        if periods > MAX_DASH_PERIODS {
            log::warn!(
                "dash pattern repeats {} times along a sub-path of length {}, giving up",
                periods,
                length,
            );
            return Err(Error::OutOfResources);
        }

        self.run.clear();
        self.first_run.clear();

        let starts_on = self.cursor.is_on();
        let mut toggled = false;
        let mut runs = 0;

        if starts_on {
            push(&mut self.run, Vertex {
                kind: PointKind::Corner,
                ..first
            })?;
        }

        let n = vertices.len();
        let count = if closed { n + 1 } else { n };
        for i in 1..count {
            let from = vertices[i - 1].position;
            let v = vertices[i % n];

            let mut done = 0.0;
            loop {
                let left = v.length - done;
                if self.cursor.remaining > left {
                    self.cursor.remaining -= left;
                    if self.cursor.is_on() && (left > 0.0 || self.run.is_empty()) {
                        push(&mut self.run, Vertex { length: left, ..v })?;
                    }
                    break;
                }

                // The current entry of the pattern ends on this segment.
                let step = self.cursor.remaining;
                let next = done + step;
                done = if next > done || step == 0.0 {
                    next.min(v.length)
                } else {
                    // Too small to make progress at this scale.
                    v.length
                };
                let position = if done >= v.length {
                    v.position
                } else {
                    from + v.tangent * done
                };

                if self.cursor.is_on() {
                    push(&mut self.run, Vertex {
                        position,
                        tangent: v.tangent,
                        length: step,
                        kind: PointKind::Corner,
                    })?;

                    if closed && starts_on && !toggled {
                        // Kept for later, it may continue the last run.
                        core::mem::swap(&mut self.run, &mut self.first_run);
                    } else {
                        output.polyline(&self.run, false)?;
                    }
                    self.run.clear();
                    runs += 1;
                }

                toggled = true;
                pattern.advance(&mut self.cursor);

                if self.cursor.is_on() {
                    push(&mut self.run, Vertex {
                        position,
                        tangent: v.tangent,
                        length: 0.0,
                        kind: PointKind::Corner,
                    })?;
                }
            }
        }

        if closed && !toggled {
            // The whole loop is in a single entry.
            if starts_on {
                output.polyline(vertices, true)?;
                runs += 1;
            }
        } else if !self.first_run.is_empty() {
            if self.cursor.is_on() && !self.run.is_empty() {
                self.run.try_reserve(self.first_run.len())?;
                self.run.extend_from_slice(&self.first_run[1..]);
                output.polyline(&self.run, false)?;
            } else {
                output.polyline(&self.first_run, false)?;
            }
            runs += 1;
        } else if self.cursor.is_on() && self.run.len() > 1 {
            output.polyline(&self.run, false)?;
            runs += 1;
        }

        self.run.clear();
        self.first_run.clear();

        log::trace!("dashed a polyline of {} vertices into {} dashes", n, runs);

        Ok(())
    }
}

impl Default for Dasher {
    fn default() -> Self {
        Self::new()
    }
}

fn push(run: &mut Vec<Vertex>, vertex: Vertex) -> Result<(), Error> {
    run.try_reserve(1)?;
    run.push(vertex);

    Ok(())
}

#[cfg(test)]
fn dash_line(length: f32, pattern: &[f32], phase: f32) -> Vec<(f32, f32)> {
    use crate::math::{point, vector};
    use crate::path::{StrokeState, StrokeStyle};

    let style = StrokeStyle::line_width(2.0).with_dash_pattern(pattern, phase);
    let state = StrokeState::new(&style).unwrap();
    let pattern = state.dash().unwrap();

    let mut output = OutlineBuilder::new();
    output.reset(&state);
    let mut dasher = Dasher::new();
    dasher.begin(pattern);

    let vertices = [
        Vertex {
            position: point(0.0, 0.0),
            tangent: vector(1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        Vertex {
            position: point(length, 0.0),
            tangent: vector(1.0, 0.0),
            length,
            kind: PointKind::Corner,
        },
    ];
    dasher.polyline(pattern, &vertices, false, &mut output).unwrap();

    output
        .outline()
        .rings()
        .map(|ring| {
            let min = ring.iter().map(|p| p.position.x).fold(core::f32::MAX, f32::min);
            let max = ring.iter().map(|p| p.position.x).fold(core::f32::MIN, f32::max);
            (min, max)
        })
        .collect()
}

#[test]
fn dashes_along_a_line() {
    let dashes = dash_line(30.0, &[10.0, 5.0], 0.0);
    assert_eq!(dashes, vec![(0.0, 10.0), (15.0, 25.0)]);
}

#[test]
fn dash_phase() {
    let dashes = dash_line(30.0, &[10.0, 5.0], 12.0);
    // Starts in the gap, 3 units before the next dash.
    assert_eq!(dashes, vec![(3.0, 13.0), (18.0, 28.0)]);

    let dashes = dash_line(30.0, &[10.0, 5.0], 5.0);
    assert_eq!(dashes, vec![(0.0, 5.0), (10.0, 20.0), (25.0, 30.0)]);
}

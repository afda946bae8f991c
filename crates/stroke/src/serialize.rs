//! Writes outlines as path command streams.

use crate::geom::Arc;
use crate::math::{Angle, Point};
use crate::outline::{Outline, OutlineKind};
use crate::path::{encode_commands, Command, Error, NumericFormat};

use core::f32::consts::PI;

/// Encodes the rings of an outline in `NumericFormat::Fp32`.
///
/// Each ring is a `MoveTo` followed by lines and quadratic curves, and ends
/// where it started. Rings are separated by `Close`, the last one ends with
/// `End`. Arcs are converted into quadratic bézier curves spanning at most
/// 45 degrees each.
pub fn serialize(
    outline: &Outline,
    commands: &mut Vec<Command>,
    output: &mut Vec<u8>,
) -> Result<(), Error> {
    commands.clear();

    let ring_count = outline.ring_count();
    for (i, ring) in outline.rings().enumerate() {
        let first = ring[0].position;
        push(commands, Command::MoveTo { to: first, relative: false })?;

        let mut current = first;
        for point in &ring[1..] {
            let to = point.position;
            match point.kind {
                OutlineKind::Line => {
                    if to != current {
                        push(commands, Command::LineTo { to, relative: false })?;
                    }
                }
                OutlineKind::Quadratic { ctrl } => {
                    push(commands, Command::QuadraticTo { ctrl, to, relative: false })?;
                }
                OutlineKind::Arc {
                    center,
                    radius,
                    sweep,
                } => {
                    arc_to(commands, current, to, center, radius, sweep)?;
                }
                OutlineKind::HalfArc { center, radius } => {
                    arc_to(commands, current, to, center, radius, PI)?;
                }
            }
            current = to;
        }

        if current != first {
            push(commands, Command::LineTo { to: first, relative: false })?;
        }

        let end = if i + 1 < ring_count {
            Command::Close
        } else {
            Command::End
        };
        push(commands, end)?;
    }

    if ring_count == 0 {
        push(commands, Command::End)?;
    }

    encode_commands(NumericFormat::Fp32, commands, output)
}

/// Approximates a circular arc from `from` to `to` with quadratic curves.
///
/// The last curve ends exactly at `to`.
fn arc_to(
    commands: &mut Vec<Command>,
    from: Point,
    to: Point,
    center: Point,
    radius: f32,
    sweep: f32,
) -> Result<(), Error> {
    if sweep == 0.0 || !(radius > 0.0) {
        if to != from {
            push(commands, Command::LineTo { to, relative: false })?;
        }
        return Ok(());
    }

    let start = (from - center).angle_from_x_axis();
    let arc = Arc::circle(center, radius, start, Angle::radians(sweep));
    let count = arc.quadratic_bezier_count();
    commands.try_reserve(count)?;

    let mut i = 0;
    arc.for_each_quadratic_bezier(&mut |curve| {
        i += 1;
        commands.push(Command::QuadraticTo {
            ctrl: curve.ctrl,
            to: if i == count { to } else { curve.to },
            relative: false,
        });
    });

    Ok(())
}

#[inline]
fn push(commands: &mut Vec<Command>, command: Command) -> Result<(), Error> {
    commands.try_reserve(1)?;
    commands.push(command);

    Ok(())
}

//! Conversion of the full command set into canonical path events.
//!
//! Relative coordinates, horizontal and vertical lines, smooth curves and
//! elliptic arcs only exist in the packed representation. Everything
//! downstream sees absolute lines, quadratic and cubic bézier curves.

use crate::commands::{Command, Commands};
use crate::geom::arrayvec::ArrayVec;
use crate::geom::{SvgArc, Angle};
use crate::math::{point, Point};

/// A canonical path event.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathEvent {
    Begin {
        at: Point,
    },
    Line {
        from: Point,
        to: Point,
    },
    Quadratic {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    End {
        last: Point,
        first: Point,
        close: bool,
    },
}

impl PathEvent {
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            PathEvent::Line { .. }
                | PathEvent::Quadratic { .. }
                | PathEvent::Cubic { .. }
                | PathEvent::End { close: true, .. }
        )
    }

    pub fn from(&self) -> Point {
        match *self {
            PathEvent::Line { from, .. }
            | PathEvent::Quadratic { from, .. }
            | PathEvent::Cubic { from, .. }
            | PathEvent::Begin { at: from }
            | PathEvent::End { last: from, .. } => from,
        }
    }

    pub fn to(&self) -> Point {
        match *self {
            PathEvent::Line { to, .. }
            | PathEvent::Quadratic { to, .. }
            | PathEvent::Cubic { to, .. }
            | PathEvent::Begin { at: to }
            | PathEvent::End { first: to, .. } => to,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Verb {
    None,
    Begin,
    Line,
    Quadratic,
    Cubic,
    Arc,
    Close,
}

/// Resolves commands into canonical path events.
///
/// The normalizer tracks the current point, the start of the sub-path and
/// the last control point so that relative and smooth commands resolve
/// correctly. This context is reset at each move-to.
///
/// Drawing commands that are not preceded by a move-to start a sub-path at
/// the current point: the origin for the first sub-path, the start of the
/// previous sub-path after a close.
#[derive(Clone, Debug)]
pub struct Normalizer {
    first: Point,
    current: Point,
    last_ctrl: Point,
    last_verb: Verb,
    in_subpath: bool,
    done: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer {
            first: point(0.0, 0.0),
            current: point(0.0, 0.0),
            last_ctrl: point(0.0, 0.0),
            last_verb: Verb::None,
            in_subpath: false,
            done: false,
        }
    }

    /// The current point.
    pub fn current_position(&self) -> Point {
        self.current
    }

    /// Whether an `End` command was processed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Processes one command, sending the resulting events to `output`.
    ///
    /// Commands are ignored after an `End` command.
    pub fn command(&mut self, cmd: &Command, output: &mut dyn FnMut(PathEvent)) {
        if self.done {
            return;
        }

        match *cmd {
            Command::End => {
                self.end_if_needed(output);
                self.done = true;
            }
            Command::Close => {
                if self.in_subpath {
                    output(PathEvent::End {
                        last: self.current,
                        first: self.first,
                        close: true,
                    });
                    self.in_subpath = false;
                }
                self.current = self.first;
                self.last_verb = Verb::Close;
            }
            Command::MoveTo { to, relative } => {
                let to = self.resolve(to, relative);
                self.move_to(to, output);
            }
            Command::LineTo { to, relative } => {
                let to = self.resolve(to, relative);
                self.line_to(to, output);
            }
            Command::HorizontalLineTo { x, relative } => {
                let x = if relative { self.current.x + x } else { x };
                self.line_to(point(x, self.current.y), output);
            }
            Command::VerticalLineTo { y, relative } => {
                let y = if relative { self.current.y + y } else { y };
                self.line_to(point(self.current.x, y), output);
            }
            Command::QuadraticTo { ctrl, to, relative } => {
                let ctrl = self.resolve(ctrl, relative);
                let to = self.resolve(to, relative);
                self.quadratic_bezier_to(ctrl, to, output);
            }
            Command::SmoothQuadraticTo { to, relative } => {
                let ctrl = self.smooth_ctrl(Verb::Quadratic);
                let to = self.resolve(to, relative);
                self.quadratic_bezier_to(ctrl, to, output);
            }
            Command::CubicTo {
                ctrl1,
                ctrl2,
                to,
                relative,
            } => {
                let ctrl1 = self.resolve(ctrl1, relative);
                let ctrl2 = self.resolve(ctrl2, relative);
                let to = self.resolve(to, relative);
                self.cubic_bezier_to(ctrl1, ctrl2, to, output);
            }
            Command::SmoothCubicTo {
                ctrl2,
                to,
                relative,
            } => {
                let ctrl1 = self.smooth_ctrl(Verb::Cubic);
                let ctrl2 = self.resolve(ctrl2, relative);
                let to = self.resolve(to, relative);
                self.cubic_bezier_to(ctrl1, ctrl2, to, output);
            }
            Command::ArcTo {
                radii,
                x_rotation,
                flags,
                to,
                relative,
            } => {
                let to = self.resolve(to, relative);
                let arc = SvgArc {
                    from: self.current,
                    to,
                    radii,
                    x_rotation: Angle::degrees(x_rotation),
                    flags,
                };
                self.arc_to(&arc, output);
            }
        }
    }

    /// Terminates the last sub-path if it is still open.
    pub fn finish(&mut self, output: &mut dyn FnMut(PathEvent)) {
        self.end_if_needed(output);
        self.done = true;
    }

    fn move_to(&mut self, to: Point, output: &mut dyn FnMut(PathEvent)) {
        self.end_if_needed(output);

        output(PathEvent::Begin { at: to });

        self.in_subpath = true;
        self.first = to;
        self.current = to;
        self.last_ctrl = to;
        self.last_verb = Verb::Begin;
    }

    fn line_to(&mut self, to: Point, output: &mut dyn FnMut(PathEvent)) {
        self.begin_if_needed(output);

        output(PathEvent::Line {
            from: self.current,
            to,
        });

        self.current = to;
        self.last_verb = Verb::Line;
    }

    fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point, output: &mut dyn FnMut(PathEvent)) {
        self.begin_if_needed(output);

        output(PathEvent::Quadratic {
            from: self.current,
            ctrl,
            to,
        });

        self.current = to;
        self.last_ctrl = ctrl;
        self.last_verb = Verb::Quadratic;
    }

    fn cubic_bezier_to(
        &mut self,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        output: &mut dyn FnMut(PathEvent),
    ) {
        self.begin_if_needed(output);

        output(PathEvent::Cubic {
            from: self.current,
            ctrl1,
            ctrl2,
            to,
        });

        self.current = to;
        self.last_ctrl = ctrl2;
        self.last_verb = Verb::Cubic;
    }

    fn arc_to(&mut self, arc: &SvgArc<f32>, output: &mut dyn FnMut(PathEvent)) {
        if arc.is_straight_line() {
            // Identical end points produce a zero-length line that the
            // flattener discards.
            self.line_to(arc.to, output);
            self.last_verb = Verb::Arc;
            return;
        }

        self.begin_if_needed(output);

        arc.for_each_quadratic_bezier(&mut |curve| {
            output(PathEvent::Quadratic {
                from: curve.from,
                ctrl: curve.ctrl,
                to: curve.to,
            });
        });

        self.current = arc.to;
        self.last_ctrl = arc.to;
        self.last_verb = Verb::Arc;
    }

    fn begin_if_needed(&mut self, output: &mut dyn FnMut(PathEvent)) {
        if !self.in_subpath {
            let at = self.current;
            self.move_to(at, output);
        }
    }

    fn end_if_needed(&mut self, output: &mut dyn FnMut(PathEvent)) {
        if self.in_subpath {
            output(PathEvent::End {
                last: self.current,
                first: self.first,
                close: false,
            });
            self.in_subpath = false;
        }
    }

    fn resolve(&self, p: Point, relative: bool) -> Point {
        if relative {
            self.current + p.to_vector()
        } else {
            p
        }
    }

    fn smooth_ctrl(&self, verb: Verb) -> Point {
        if self.last_verb == verb {
            self.current + (self.current - self.last_ctrl)
        } else {
            self.current
        }
    }
}

/// An iterator of canonical events over a command stream.
pub struct Events<'l> {
    commands: Commands<'l>,
    normalizer: Normalizer,
    // A command produces at most nine events (implicit begin and eight arc segments).
    pending: ArrayVec<PathEvent, 10>,
    read: usize,
}

impl<'l> Events<'l> {
    pub fn new(commands: Commands<'l>) -> Self {
        Events {
            commands,
            normalizer: Normalizer::new(),
            pending: ArrayVec::new(),
            read: 0,
        }
    }
}

impl<'l> Iterator for Events<'l> {
    type Item = PathEvent;

    fn next(&mut self) -> Option<PathEvent> {
        loop {
            if self.read < self.pending.len() {
                self.read += 1;
                return Some(self.pending[self.read - 1]);
            }

            if self.normalizer.is_done() {
                return None;
            }

            self.pending.clear();
            self.read = 0;
            let pending = &mut self.pending;
            let mut output = |event| {
                let _ = pending.try_push(event);
            };
            match self.commands.next() {
                Some(cmd) => self.normalizer.command(&cmd, &mut output),
                None => self.normalizer.finish(&mut output),
            }
        }
    }
}

#[cfg(test)]
fn normalize(commands: &[Command]) -> Vec<PathEvent> {
    let mut events = Vec::new();
    let mut normalizer = Normalizer::new();
    for cmd in commands {
        normalizer.command(cmd, &mut |e| events.push(e));
    }
    normalizer.finish(&mut |e| events.push(e));

    events
}

#[test]
fn relative_and_shorthand_lines() {
    let events = normalize(&[
        Command::MoveTo {
            to: point(10.0, 10.0),
            relative: false,
        },
        Command::LineTo {
            to: point(5.0, 0.0),
            relative: true,
        },
        Command::HorizontalLineTo {
            x: 30.0,
            relative: false,
        },
        Command::VerticalLineTo {
            y: -5.0,
            relative: true,
        },
        Command::Close,
    ]);

    assert_eq!(
        events,
        vec![
            PathEvent::Begin {
                at: point(10.0, 10.0)
            },
            PathEvent::Line {
                from: point(10.0, 10.0),
                to: point(15.0, 10.0)
            },
            PathEvent::Line {
                from: point(15.0, 10.0),
                to: point(30.0, 10.0)
            },
            PathEvent::Line {
                from: point(30.0, 10.0),
                to: point(30.0, 5.0)
            },
            PathEvent::End {
                last: point(30.0, 5.0),
                first: point(10.0, 10.0),
                close: true
            },
        ]
    );
}

#[test]
fn smooth_curves_reflect_only_after_same_kind() {
    let events = normalize(&[
        Command::MoveTo {
            to: point(0.0, 0.0),
            relative: false,
        },
        Command::QuadraticTo {
            ctrl: point(10.0, 10.0),
            to: point(20.0, 0.0),
            relative: false,
        },
        Command::SmoothQuadraticTo {
            to: point(40.0, 0.0),
            relative: false,
        },
        Command::SmoothCubicTo {
            ctrl2: point(50.0, 10.0),
            to: point(60.0, 0.0),
            relative: false,
        },
        Command::SmoothCubicTo {
            ctrl2: point(10.0, -10.0),
            to: point(20.0, 0.0),
            relative: true,
        },
    ]);

    assert_eq!(
        events[2],
        PathEvent::Quadratic {
            from: point(20.0, 0.0),
            ctrl: point(30.0, -10.0),
            to: point(40.0, 0.0)
        }
    );
    // The previous command is a quadratic curve: no reflection.
    assert_eq!(
        events[3],
        PathEvent::Cubic {
            from: point(40.0, 0.0),
            ctrl1: point(40.0, 0.0),
            ctrl2: point(50.0, 10.0),
            to: point(60.0, 0.0)
        }
    );
    assert_eq!(
        events[4],
        PathEvent::Cubic {
            from: point(60.0, 0.0),
            ctrl1: point(70.0, -10.0),
            ctrl2: point(70.0, -10.0),
            to: point(80.0, 0.0)
        }
    );
}

#[test]
fn context_is_reset_at_move_to() {
    let events = normalize(&[
        Command::MoveTo {
            to: point(0.0, 0.0),
            relative: false,
        },
        Command::QuadraticTo {
            ctrl: point(10.0, 10.0),
            to: point(20.0, 0.0),
            relative: false,
        },
        Command::MoveTo {
            to: point(100.0, 0.0),
            relative: false,
        },
        Command::SmoothQuadraticTo {
            to: point(120.0, 0.0),
            relative: false,
        },
    ]);

    assert_eq!(
        events[2],
        PathEvent::End {
            last: point(20.0, 0.0),
            first: point(0.0, 0.0),
            close: false
        }
    );
    assert_eq!(
        events[4],
        PathEvent::Quadratic {
            from: point(100.0, 0.0),
            ctrl: point(100.0, 0.0),
            to: point(120.0, 0.0)
        }
    );
}

#[test]
fn arcs_become_quadratic_curves() {
    use crate::geom::ArcFlags;

    let events = normalize(&[
        Command::MoveTo {
            to: point(0.0, 0.0),
            relative: false,
        },
        Command::ArcTo {
            radii: crate::math::vector(5.0, 5.0),
            x_rotation: 0.0,
            flags: ArcFlags {
                large_arc: false,
                sweep: true,
            },
            to: point(10.0, 0.0),
            relative: false,
        },
        Command::ArcTo {
            radii: crate::math::vector(0.0, 5.0),
            x_rotation: 0.0,
            flags: ArcFlags::default(),
            to: point(10.0, 10.0),
            relative: true,
        },
    ]);

    // Begin, four quarter segments of 45 degrees, a line and the end.
    assert_eq!(events.len(), 7);
    for event in &events[1..5] {
        match event {
            PathEvent::Quadratic { .. } => {}
            _ => panic!("unexpected event {:?}", event),
        }
    }
    assert_eq!(events[4].to(), point(10.0, 0.0));
    assert_eq!(events[1].from(), point(0.0, 0.0));
    assert_eq!(
        events[5],
        PathEvent::Line {
            from: point(10.0, 0.0),
            to: point(20.0, 10.0)
        }
    );
}

#[test]
fn implicit_sub_paths() {
    let events = normalize(&[
        Command::LineTo {
            to: point(10.0, 0.0),
            relative: false,
        },
        Command::Close,
        Command::LineTo {
            to: point(0.0, 10.0),
            relative: false,
        },
        Command::End,
        Command::LineTo {
            to: point(50.0, 50.0),
            relative: false,
        },
    ]);

    assert_eq!(
        events,
        vec![
            PathEvent::Begin {
                at: point(0.0, 0.0)
            },
            PathEvent::Line {
                from: point(0.0, 0.0),
                to: point(10.0, 0.0)
            },
            PathEvent::End {
                last: point(10.0, 0.0),
                first: point(0.0, 0.0),
                close: true
            },
            PathEvent::Begin {
                at: point(0.0, 0.0)
            },
            PathEvent::Line {
                from: point(0.0, 0.0),
                to: point(0.0, 10.0)
            },
            PathEvent::End {
                last: point(0.0, 10.0),
                first: point(0.0, 0.0),
                close: false
            },
        ]
    );
}

//! The path data structure.

use crate::commands::{read_command, Command, Commands, Opcode};
use crate::error::{Error, InvalidArgument, StrokeResult};
use crate::format::NumericFormat;
use crate::math::{point, Box2D, Point};
use crate::normalize::Events;
use crate::style::{StrokeState, StrokeStyle};
use crate::{PathType, Quality};

use log::trace;

/// Running state of the command stream, used to resolve relative
/// coordinates and to maintain the bounding box when appending.
#[derive(Copy, Clone, Debug, PartialEq)]
struct AppendCursor {
    current: Point,
    start: Point,
    bounds_seeded: bool,
}

impl AppendCursor {
    const ORIGIN: Self = AppendCursor {
        current: Point::new(0.0, 0.0),
        start: Point::new(0.0, 0.0),
        bounds_seeded: false,
    };
}

/// How the stream is terminated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Termination {
    Open,
    /// Ends with an `End` written by the caller.
    End,
    /// Ends with an `End` that was added after a trailing `Close`.
    SyntheticEnd,
}

/// A path stored as a packed command stream.
///
/// The path owns its commands in a given numeric format, a bounding box of
/// its anchor points and optionally a stroke.
///
/// # Example
///
/// ```
/// use ribbon_path::{Path, NumericFormat, Quality, Opcode};
///
/// let mut path = Path::new(NumericFormat::Fp32, Quality::High);
/// path.append(
///     &[Opcode::Move as u8, Opcode::Line as u8, Opcode::Line as u8, Opcode::Close as u8],
///     &[0.0, 0.0, 10.0, 0.0, 10.0, 5.0],
/// ).unwrap();
///
/// assert_eq!(path.commands().count(), 5);
/// assert_eq!(path.bounding_box().max.x, 10.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    format: NumericFormat,
    quality: Quality,
    path_type: PathType,
    data: Vec<u8>,
    bounding_box: Box2D,
    cursor: AppendCursor,
    termination: Termination,
    stroke: Option<StrokeState>,
}

impl Path {
    /// Creates an empty path.
    pub fn new(format: NumericFormat, quality: Quality) -> Self {
        Path {
            format,
            quality,
            path_type: PathType::Fill,
            data: Vec::new(),
            bounding_box: Box2D::zero(),
            cursor: AppendCursor::ORIGIN,
            termination: Termination::Open,
            stroke: None,
        }
    }

    /// Wraps existing path data.
    ///
    /// The data is decoded once to validate it and to restore the running state
    /// that subsequent appends rely on. The bounding box is trusted.
    pub fn with_data(
        format: NumericFormat,
        quality: Quality,
        data: Vec<u8>,
        bounding_box: Box2D,
    ) -> Result<Self, Error> {
        let mut path = Path::new(format, quality);
        let mut cursor = AppendCursor::ORIGIN;
        let mut last = None;
        let mut offset = 0;
        while offset < data.len() {
            let (cmd, next) = read_command(format, &data, offset)?;
            check_command(&cmd)?;
            if cursor.advance(&cmd).is_some() {
                cursor.bounds_seeded = true;
            }
            last = Some(cmd);
            offset = next;
            if cmd == Command::End {
                break;
            }
        }

        let mut data = data;
        // Bytes after the end command are not part of the path.
        data.truncate(offset);

        path.data = data;
        path.bounding_box = bounding_box;
        path.cursor = cursor;
        match last {
            Some(Command::End) => {
                path.termination = Termination::End;
            }
            Some(Command::Close) => {
                path.data.try_reserve(format.slot_size())?;
                format.write_opcode(Opcode::End as u8, &mut path.data);
                path.termination = Termination::SyntheticEnd;
            }
            _ => {}
        }

        Ok(path)
    }

    /// Appends packed opcodes and their operands.
    ///
    /// Each opcode consumes `Opcode::operand_count` operands, in order. The whole
    /// batch is validated before anything is written: on error the path is left
    /// unchanged.
    pub fn append(&mut self, opcodes: &[u8], operands: &[f32]) -> StrokeResult {
        let mut commands = Vec::new();
        commands.try_reserve(opcodes.len())?;

        let mut remaining = operands;
        for &byte in opcodes {
            let opcode = Opcode::from_u8(byte).ok_or(InvalidArgument::UnknownOpcode(byte))?;
            let count = opcode.operand_count();
            let cmd = Command::from_operands(opcode, remaining)?;
            remaining = &remaining[count..];
            commands.push(cmd);
        }

        self.append_commands(&commands)
    }

    /// Appends commands.
    ///
    /// If the last command is a `Close`, an `End` is added after it. It is
    /// removed by the next append, as is an explicit trailing `End`.
    pub fn append_commands(&mut self, commands: &[Command]) -> StrokeResult {
        if commands.is_empty() {
            return Ok(());
        }

        let mut quantized = Vec::new();
        quantized.try_reserve(commands.len())?;
        for cmd in commands {
            check_command(cmd)?;
            let opcode = cmd.opcode();
            let mut operands = cmd.operands();
            for op in &mut operands {
                *op = self.format.quantize(*op);
            }
            quantized.push(Command::from_operands(opcode, &operands)?);
        }

        let slot = self.format.slot_size();
        let slots: usize = commands
            .iter()
            .map(|cmd| 1 + cmd.opcode().operand_count())
            .sum();
        // One more slot for the end marker.
        self.data.try_reserve((slots + 1) * slot)?;

        if self.termination != Termination::Open {
            let len = self.data.len() - slot;
            self.data.truncate(len);
            self.termination = Termination::Open;
        }

        for cmd in &quantized {
            self.format.write_opcode(cmd.opcode() as u8, &mut self.data);
            for op in cmd.operands() {
                self.format.write_operand(op, &mut self.data);
            }

            if let Some(anchor) = self.cursor.advance(cmd) {
                self.add_to_bounding_box(anchor);
            }
        }

        match commands.last() {
            Some(Command::Close) => {
                self.format.write_opcode(Opcode::End as u8, &mut self.data);
                self.termination = Termination::SyntheticEnd;
            }
            Some(Command::End) => {
                self.termination = Termination::End;
            }
            _ => {}
        }

        trace!(
            "appended {} commands, {} bytes total",
            commands.len(),
            self.data.len()
        );

        Ok(())
    }

    fn add_to_bounding_box(&mut self, p: Point) {
        if self.cursor.bounds_seeded {
            self.bounding_box.min = self.bounding_box.min.min(p);
            self.bounding_box.max = self.bounding_box.max.max(p);
        } else {
            self.bounding_box = Box2D { min: p, max: p };
            self.cursor.bounds_seeded = true;
        }
    }

    /// Configures the stroke, discarding any previously built stroke outline.
    pub fn set_stroke(&mut self, style: &StrokeStyle) -> StrokeResult {
        let state = StrokeState::new(style)?;
        trace!(
            "stroke set: width {}, {:?} cap, {:?} join, dashed: {}",
            state.line_width(),
            state.line_cap(),
            state.line_join(),
            state.dash().is_some()
        );
        self.stroke = Some(state);

        Ok(())
    }

    /// Releases the commands and the stroke.
    ///
    /// The numeric format, quality and path type are kept.
    pub fn clear(&mut self) -> StrokeResult {
        self.data = Vec::new();
        self.bounding_box = Box2D::zero();
        self.cursor = AppendCursor::ORIGIN;
        self.termination = Termination::Open;
        self.stroke = None;

        Ok(())
    }

    /// Iterates over the stored commands.
    pub fn commands(&self) -> Commands<'_> {
        Commands::new(self.format, &self.data)
    }

    /// Iterates over the canonical events of the path.
    ///
    /// Relative coordinates, shorthand commands and arcs are resolved.
    pub fn events(&self) -> Events<'_> {
        Events::new(self.commands())
    }

    /// The packed command stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bounding box of the anchor points.
    ///
    /// Control points are not taken into account.
    pub fn bounding_box(&self) -> Box2D {
        self.bounding_box
    }

    pub fn format(&self) -> NumericFormat {
        self.format
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn set_path_type(&mut self, path_type: PathType) {
        self.path_type = path_type;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the stream ends with an `End` that was added after a `Close`.
    pub fn has_synthetic_end(&self) -> bool {
        self.termination == Termination::SyntheticEnd
    }

    pub fn stroke_state(&self) -> Option<&StrokeState> {
        self.stroke.as_ref()
    }

    pub fn stroke_state_mut(&mut self) -> Option<&mut StrokeState> {
        self.stroke.as_mut()
    }

    /// The stroke outline in `NumericFormat::Fp32`, meant to be filled with the
    /// non-zero fill rule.
    pub fn stroke_path(&self) -> Option<&[u8]> {
        self.stroke.as_ref().and_then(StrokeState::stroke_path)
    }

    /// Decodes the stroke outline.
    ///
    /// Returns an empty vector if the outline was not built.
    pub fn stroke_commands(&self) -> Result<Vec<Command>, Error> {
        match self.stroke_path() {
            Some(data) => crate::commands::decode_commands(NumericFormat::Fp32, data),
            None => Ok(Vec::new()),
        }
    }
}

impl AppendCursor {
    /// Updates the running points and returns the anchor of the command, if any.
    fn advance(&mut self, cmd: &Command) -> Option<Point> {
        let resolve = |p: Point, relative: bool, current: Point| {
            if relative {
                current + p.to_vector()
            } else {
                p
            }
        };
        let current = self.current;
        let anchor = match *cmd {
            Command::End => return None,
            Command::Close => {
                self.current = self.start;
                return None;
            }
            Command::MoveTo { to, relative } => {
                let to = resolve(to, relative, current);
                self.start = to;
                to
            }
            Command::HorizontalLineTo { x, relative } => {
                point(if relative { current.x + x } else { x }, current.y)
            }
            Command::VerticalLineTo { y, relative } => {
                point(current.x, if relative { current.y + y } else { y })
            }
            Command::LineTo { to, relative }
            | Command::QuadraticTo { to, relative, .. }
            | Command::CubicTo { to, relative, .. }
            | Command::SmoothQuadraticTo { to, relative }
            | Command::SmoothCubicTo { to, relative, .. }
            | Command::ArcTo { to, relative, .. } => resolve(to, relative, current),
        };

        self.current = anchor;

        Some(anchor)
    }
}

fn check_command(cmd: &Command) -> StrokeResult {
    if !cmd.operands().iter().all(|v| v.is_finite()) {
        return Err(InvalidArgument::NonFiniteValue.into());
    }
    if let Command::ArcTo { radii, .. } = cmd {
        if radii.x < 0.0 || radii.y < 0.0 {
            return Err(InvalidArgument::NegativeRadius.into());
        }
    }

    Ok(())
}

#[cfg(test)]
fn line_path(format: NumericFormat) -> Path {
    let mut path = Path::new(format, Quality::Medium);
    path.append(
        &[Opcode::Move as u8, Opcode::Line as u8, Opcode::LineRel as u8],
        &[10.0, 20.0, 30.0, 5.0, -50.0, 40.0],
    )
    .unwrap();

    path
}

#[test]
fn bounding_box_tracks_anchors() {
    let mut path = line_path(NumericFormat::Fp32);
    assert_eq!(
        path.bounding_box(),
        Box2D {
            min: point(-20.0, 5.0),
            max: point(30.0, 45.0)
        }
    );

    // Control points do not widen the bounding box.
    path.append(&[Opcode::Quad as u8], &[500.0, 500.0, 0.0, 0.0])
        .unwrap();
    assert_eq!(
        path.bounding_box(),
        Box2D {
            min: point(-20.0, 0.0),
            max: point(30.0, 45.0)
        }
    );

    path.append(&[Opcode::VLineRel as u8, Opcode::HLine as u8], &[-7.0, 100.0])
        .unwrap();
    assert_eq!(
        path.bounding_box(),
        Box2D {
            min: point(-20.0, -7.0),
            max: point(100.0, 45.0)
        }
    );
}

#[test]
fn first_anchor_seeds_bounding_box() {
    let mut path = Path::new(NumericFormat::S16, Quality::High);
    assert_eq!(path.bounding_box(), Box2D::zero());

    path.append(&[Opcode::Move as u8], &[100.0, 200.0]).unwrap();
    assert_eq!(
        path.bounding_box(),
        Box2D {
            min: point(100.0, 200.0),
            max: point(100.0, 200.0)
        }
    );
}

#[test]
fn integer_formats_quantize_operands() {
    let mut path = Path::new(NumericFormat::S8, Quality::Low);
    path.append(&[Opcode::Move as u8, Opcode::Line as u8], &[1.4, 1.6, 1000.0, -1000.0])
        .unwrap();

    assert_eq!(path.data(), &[0x02, 1, 2, 0x04, 127, 0x80]);
    assert_eq!(
        path.bounding_box(),
        Box2D {
            min: point(1.0, -128.0),
            max: point(127.0, 2.0)
        }
    );
}

#[test]
fn synthetic_end_after_close() {
    let mut path = Path::new(NumericFormat::S8, Quality::High);
    path.append(
        &[Opcode::Move as u8, Opcode::Line as u8, Opcode::Close as u8],
        &[0.0, 0.0, 10.0, 0.0],
    )
    .unwrap();

    assert!(path.has_synthetic_end());
    assert_eq!(path.data(), &[0x02, 0, 0, 0x04, 10, 0, 0x01, 0x00]);
    assert_eq!(path.commands().last(), Some(Command::End));

    // The next append removes the end marker.
    path.append(&[Opcode::LineRel as u8], &[0.0, 5.0]).unwrap();
    assert!(!path.has_synthetic_end());
    assert_eq!(path.data(), &[0x02, 0, 0, 0x04, 10, 0, 0x01, 0x05, 0, 5]);
    // Relative to the start of the closed sub-path.
    assert_eq!(path.bounding_box().max, point(10.0, 5.0));
}

#[test]
fn explicit_end() {
    let mut path = line_path(NumericFormat::S16);
    path.append(&[Opcode::End as u8], &[]).unwrap();
    assert!(!path.has_synthetic_end());
    assert_eq!(path.commands().last(), Some(Command::End));

    path.append(&[Opcode::HLine as u8], &[0.0]).unwrap();
    assert_eq!(path.commands().count(), 4);
}

#[test]
fn append_errors_leave_the_path_unchanged() {
    let mut path = line_path(NumericFormat::Fp32);
    let before = path.clone();

    assert_eq!(
        path.append(&[Opcode::Line as u8, 0x0A], &[1.0, 1.0]),
        Err(Error::InvalidArgument(InvalidArgument::UnknownOpcode(0x0A)))
    );
    assert_eq!(
        path.append(&[0x42], &[]),
        Err(Error::InvalidArgument(InvalidArgument::UnknownOpcode(0x42)))
    );
    assert_eq!(
        path.append(&[Opcode::Line as u8, Opcode::Cubic as u8], &[1.0, 1.0, 2.0]),
        Err(Error::InvalidArgument(InvalidArgument::MissingOperands))
    );
    assert_eq!(
        path.append(&[Opcode::Line as u8], &[1.0, core::f32::NAN]),
        Err(Error::InvalidArgument(InvalidArgument::NonFiniteValue))
    );
    assert_eq!(
        path.append(
            &[Opcode::Line as u8, Opcode::SmallCcwArc as u8],
            &[1.0, 1.0, -5.0, 5.0, 0.0, 10.0, 0.0]
        ),
        Err(Error::InvalidArgument(InvalidArgument::NegativeRadius))
    );
    assert_eq!(
        path.append(&[Opcode::LargeCwArcRel as u8], &[5.0, -0.5, 0.0, 10.0, 0.0]),
        Err(Error::InvalidArgument(InvalidArgument::NegativeRadius))
    );

    assert_eq!(path, before);

    // Zero radii are valid, such arcs are drawn as lines.
    path.append(&[Opcode::SmallCcwArc as u8], &[0.0, 0.0, 0.0, 10.0, 0.0])
        .unwrap();
}

#[test]
fn with_data_restores_state() {
    let source = line_path(NumericFormat::S32);
    let bbox = source.bounding_box();

    let mut path =
        Path::with_data(NumericFormat::S32, Quality::High, source.data().to_vec(), bbox).unwrap();
    assert_eq!(path.bounding_box(), bbox);
    assert_eq!(path.commands().count(), 3);

    // Relative commands resolve against the restored current point (-20, 45).
    path.append(&[Opcode::LineRel as u8], &[0.0, 10.0]).unwrap();
    assert_eq!(path.bounding_box().max, point(30.0, 55.0));

    assert_eq!(
        Path::with_data(NumericFormat::S8, Quality::High, vec![0x02, 1], bbox),
        Err(Error::InvalidArgument(InvalidArgument::TruncatedData))
    );

    let closed = Path::with_data(NumericFormat::S8, Quality::High, vec![0x02, 1, 1, 0x01], bbox)
        .unwrap();
    assert!(closed.has_synthetic_end());
    assert_eq!(closed.data(), &[0x02, 1, 1, 0x01, 0x00]);
}

#[test]
fn set_stroke_and_clear() {
    let mut path = line_path(NumericFormat::Fp32);
    assert_eq!(path.stroke_path(), None);
    assert_eq!(
        path.set_stroke(&StrokeStyle::line_width(-2.0)),
        Err(Error::InvalidArgument(InvalidArgument::InvalidLineWidth))
    );
    assert!(path.stroke_state().is_none());

    path.set_stroke(&StrokeStyle::line_width(2.0)).unwrap();
    assert_eq!(path.stroke_state().unwrap().half_width(), 1.0);
    path.stroke_state_mut()
        .unwrap()
        .replace_stroke_path(vec![0, 0, 0, 0]);
    assert_eq!(path.stroke_commands(), Ok(vec![Command::End]));

    // Configuring the stroke again discards the outline.
    path.set_stroke(&StrokeStyle::line_width(3.0)).unwrap();
    assert_eq!(path.stroke_path(), None);

    path.set_path_type(PathType::FillStroke);
    path.clear().unwrap();
    assert!(path.is_empty());
    assert!(path.stroke_state().is_none());
    assert_eq!(path.bounding_box(), Box2D::zero());
    assert_eq!(path.path_type(), PathType::FillStroke);
    assert_eq!(path.commands().count(), 0);
}

//! Opcodes and the commands they encode.
//!
//! A command stream is a sequence of slots in a given [`NumericFormat`]: one
//! slot for the opcode followed by one slot per operand.
//!
//! | opcode | command            | operands                  |
//! |--------|--------------------|---------------------------|
//! | `0x00` | end                |                           |
//! | `0x01` | close              |                           |
//! | `0x02` | move to            | x y                       |
//! | `0x04` | line to            | x y                       |
//! | `0x06` | quadratic to       | cx cy x y                 |
//! | `0x08` | cubic to           | c1x c1y c2x c2y x y       |
//! | `0x0B` | horizontal line to | x                         |
//! | `0x0D` | vertical line to   | y                         |
//! | `0x0F` | smooth quadratic   | x y                       |
//! | `0x11` | smooth cubic       | c2x c2y x y               |
//! | `0x13` | small ccw arc      | rx ry rotation x y        |
//! | `0x15` | small cw arc       | rx ry rotation x y        |
//! | `0x17` | large ccw arc      | rx ry rotation x y        |
//! | `0x19` | large cw arc       | rx ry rotation x y        |
//!
//! Each drawing opcode is followed by its relative variant (`opcode + 1`).
//! The arc rotation is expressed in degrees.

use crate::error::{Error, InvalidArgument};
use crate::format::NumericFormat;
use crate::geom::arrayvec::ArrayVec;
use crate::geom::ArcFlags;
use crate::math::{point, vector, Point, Vector};

/// The opcodes of a command stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Opcode {
    End = 0x00,
    Close = 0x01,
    Move = 0x02,
    MoveRel = 0x03,
    Line = 0x04,
    LineRel = 0x05,
    Quad = 0x06,
    QuadRel = 0x07,
    Cubic = 0x08,
    CubicRel = 0x09,
    HLine = 0x0B,
    HLineRel = 0x0C,
    VLine = 0x0D,
    VLineRel = 0x0E,
    SQuad = 0x0F,
    SQuadRel = 0x10,
    SCubic = 0x11,
    SCubicRel = 0x12,
    SmallCcwArc = 0x13,
    SmallCcwArcRel = 0x14,
    SmallCwArc = 0x15,
    SmallCwArcRel = 0x16,
    LargeCcwArc = 0x17,
    LargeCcwArcRel = 0x18,
    LargeCwArc = 0x19,
    LargeCwArcRel = 0x1A,
}

impl Opcode {
    pub fn from_u8(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        Some(match byte {
            0x00 => End,
            0x01 => Close,
            0x02 => Move,
            0x03 => MoveRel,
            0x04 => Line,
            0x05 => LineRel,
            0x06 => Quad,
            0x07 => QuadRel,
            0x08 => Cubic,
            0x09 => CubicRel,
            0x0B => HLine,
            0x0C => HLineRel,
            0x0D => VLine,
            0x0E => VLineRel,
            0x0F => SQuad,
            0x10 => SQuadRel,
            0x11 => SCubic,
            0x12 => SCubicRel,
            0x13 => SmallCcwArc,
            0x14 => SmallCcwArcRel,
            0x15 => SmallCwArc,
            0x16 => SmallCwArcRel,
            0x17 => LargeCcwArc,
            0x18 => LargeCcwArcRel,
            0x19 => LargeCwArc,
            0x1A => LargeCwArcRel,
            _ => return None,
        })
    }

    /// Number of operand slots following the opcode.
    pub fn operand_count(self) -> usize {
        use Opcode::*;
        match self {
            End | Close => 0,
            HLine | HLineRel | VLine | VLineRel => 1,
            Move | MoveRel | Line | LineRel | SQuad | SQuadRel => 2,
            Quad | QuadRel | SCubic | SCubicRel => 4,
            SmallCcwArc | SmallCcwArcRel | SmallCwArc | SmallCwArcRel | LargeCcwArc
            | LargeCcwArcRel | LargeCwArc | LargeCwArcRel => 5,
            Cubic | CubicRel => 6,
        }
    }

    /// Whether the coordinates are relative to the current point.
    pub fn is_relative(self) -> bool {
        let byte = self as u8;
        if byte < Opcode::HLine as u8 {
            byte >= Opcode::Move as u8 && byte % 2 == 1
        } else {
            byte % 2 == 0
        }
    }
}

/// A decoded command.
///
/// The `relative` flag indicates that the coordinates are relative to the
/// current point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Command {
    End,
    Close,
    MoveTo {
        to: Point,
        relative: bool,
    },
    LineTo {
        to: Point,
        relative: bool,
    },
    HorizontalLineTo {
        x: f32,
        relative: bool,
    },
    VerticalLineTo {
        y: f32,
        relative: bool,
    },
    QuadraticTo {
        ctrl: Point,
        to: Point,
        relative: bool,
    },
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        relative: bool,
    },
    SmoothQuadraticTo {
        to: Point,
        relative: bool,
    },
    SmoothCubicTo {
        ctrl2: Point,
        to: Point,
        relative: bool,
    },
    ArcTo {
        radii: Vector,
        /// In degrees.
        x_rotation: f32,
        flags: ArcFlags,
        to: Point,
        relative: bool,
    },
}

impl Command {
    /// Builds a command from an opcode and at least `opcode.operand_count()` operands.
    pub fn from_operands(opcode: Opcode, operands: &[f32]) -> Result<Command, Error> {
        use Opcode::*;
        if operands.len() < opcode.operand_count() {
            return Err(InvalidArgument::MissingOperands.into());
        }

        let relative = opcode.is_relative();
        let o = operands;
        Ok(match opcode {
            End => Command::End,
            Close => Command::Close,
            Move | MoveRel => Command::MoveTo {
                to: point(o[0], o[1]),
                relative,
            },
            Line | LineRel => Command::LineTo {
                to: point(o[0], o[1]),
                relative,
            },
            HLine | HLineRel => Command::HorizontalLineTo { x: o[0], relative },
            VLine | VLineRel => Command::VerticalLineTo { y: o[0], relative },
            Quad | QuadRel => Command::QuadraticTo {
                ctrl: point(o[0], o[1]),
                to: point(o[2], o[3]),
                relative,
            },
            Cubic | CubicRel => Command::CubicTo {
                ctrl1: point(o[0], o[1]),
                ctrl2: point(o[2], o[3]),
                to: point(o[4], o[5]),
                relative,
            },
            SQuad | SQuadRel => Command::SmoothQuadraticTo {
                to: point(o[0], o[1]),
                relative,
            },
            SCubic | SCubicRel => Command::SmoothCubicTo {
                ctrl2: point(o[0], o[1]),
                to: point(o[2], o[3]),
                relative,
            },
            SmallCcwArc | SmallCcwArcRel | SmallCwArc | SmallCwArcRel | LargeCcwArc
            | LargeCcwArcRel | LargeCwArc | LargeCwArcRel => Command::ArcTo {
                radii: vector(o[0], o[1]),
                x_rotation: o[2],
                flags: ArcFlags {
                    large_arc: matches!(
                        opcode,
                        LargeCcwArc | LargeCcwArcRel | LargeCwArc | LargeCwArcRel
                    ),
                    sweep: matches!(
                        opcode,
                        SmallCcwArc | SmallCcwArcRel | LargeCcwArc | LargeCcwArcRel
                    ),
                },
                to: point(o[3], o[4]),
                relative,
            },
        })
    }

    pub fn opcode(&self) -> Opcode {
        use Opcode::*;
        let (absolute, relative) = match *self {
            Command::End => return End,
            Command::Close => return Close,
            Command::MoveTo { relative, .. } => (Move, relative),
            Command::LineTo { relative, .. } => (Line, relative),
            Command::HorizontalLineTo { relative, .. } => (HLine, relative),
            Command::VerticalLineTo { relative, .. } => (VLine, relative),
            Command::QuadraticTo { relative, .. } => (Quad, relative),
            Command::CubicTo { relative, .. } => (Cubic, relative),
            Command::SmoothQuadraticTo { relative, .. } => (SQuad, relative),
            Command::SmoothCubicTo { relative, .. } => (SCubic, relative),
            Command::ArcTo {
                flags, relative, ..
            } => {
                let op = match (flags.large_arc, flags.sweep) {
                    (false, true) => SmallCcwArc,
                    (false, false) => SmallCwArc,
                    (true, true) => LargeCcwArc,
                    (true, false) => LargeCwArc,
                };
                (op, relative)
            }
        };

        if relative {
            // The relative variant always directly follows the absolute one.
            Opcode::from_u8(absolute as u8 + 1).unwrap_or(absolute)
        } else {
            absolute
        }
    }

    pub fn operands(&self) -> ArrayVec<f32, 6> {
        let mut ops = ArrayVec::new();
        let push_point = |ops: &mut ArrayVec<f32, 6>, p: &Point| {
            ops.push(p.x);
            ops.push(p.y);
        };
        match self {
            Command::End | Command::Close => {}
            Command::MoveTo { to, .. }
            | Command::LineTo { to, .. }
            | Command::SmoothQuadraticTo { to, .. } => {
                push_point(&mut ops, to);
            }
            Command::HorizontalLineTo { x, .. } => ops.push(*x),
            Command::VerticalLineTo { y, .. } => ops.push(*y),
            Command::QuadraticTo { ctrl, to, .. } => {
                push_point(&mut ops, ctrl);
                push_point(&mut ops, to);
            }
            Command::CubicTo {
                ctrl1, ctrl2, to, ..
            } => {
                push_point(&mut ops, ctrl1);
                push_point(&mut ops, ctrl2);
                push_point(&mut ops, to);
            }
            Command::SmoothCubicTo { ctrl2, to, .. } => {
                push_point(&mut ops, ctrl2);
                push_point(&mut ops, to);
            }
            Command::ArcTo {
                radii,
                x_rotation,
                to,
                ..
            } => {
                ops.push(radii.x);
                ops.push(radii.y);
                ops.push(*x_rotation);
                push_point(&mut ops, to);
            }
        }

        ops
    }
}

/// Appends commands to a byte stream in the given format.
pub fn encode_commands(
    format: NumericFormat,
    commands: &[Command],
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let slots: usize = commands.iter().map(|cmd| 1 + cmd.opcode().operand_count()).sum();
    out.try_reserve(slots * format.slot_size())?;

    for cmd in commands {
        format.write_opcode(cmd.opcode() as u8, out);
        for op in cmd.operands() {
            format.write_operand(op, out);
        }
    }

    Ok(())
}

/// Decodes a whole byte stream.
///
/// Decoding stops after the first `End` command. Trailing bytes that do not
/// form a complete slot are an error.
pub fn decode_commands(format: NumericFormat, data: &[u8]) -> Result<Vec<Command>, Error> {
    let mut commands = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (cmd, next) = read_command(format, data, offset)?;
        commands.try_reserve(1)?;
        commands.push(cmd);
        offset = next;
        if cmd == Command::End {
            break;
        }
    }

    Ok(commands)
}

/// Reads the command at `offset` and returns it with the offset of the next one.
pub fn read_command(
    format: NumericFormat,
    data: &[u8],
    offset: usize,
) -> Result<(Command, usize), Error> {
    let byte = format.read_opcode(data, offset)?;
    let opcode = Opcode::from_u8(byte).ok_or(InvalidArgument::UnknownOpcode(byte))?;
    let slot = format.slot_size();

    let mut operands = [0.0; 6];
    let mut cursor = offset + slot;
    for operand in operands.iter_mut().take(opcode.operand_count()) {
        *operand = format.read_operand(data, cursor)?;
        cursor += slot;
    }

    Ok((Command::from_operands(opcode, &operands)?, cursor))
}

/// An iterator over the commands of a byte stream that was validated beforehand.
///
/// Iteration stops at the first `End` command or at the first malformed one.
#[derive(Clone)]
pub struct Commands<'l> {
    format: NumericFormat,
    data: &'l [u8],
    offset: usize,
}

impl<'l> Commands<'l> {
    pub fn new(format: NumericFormat, data: &'l [u8]) -> Self {
        Commands {
            format,
            data,
            offset: 0,
        }
    }
}

impl<'l> Iterator for Commands<'l> {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        if self.offset >= self.data.len() {
            return None;
        }

        match read_command(self.format, self.data, self.offset) {
            Ok((cmd, next)) => {
                self.offset = if cmd == Command::End {
                    self.data.len()
                } else {
                    next
                };
                Some(cmd)
            }
            Err(_) => {
                self.offset = self.data.len();
                None
            }
        }
    }
}

#[test]
fn opcode_table() {
    for byte in 0..=255u8 {
        match Opcode::from_u8(byte) {
            Some(op) => assert_eq!(op as u8, byte),
            None => assert!(byte == 0x0A || byte > 0x1A, "{:#x}", byte),
        }
    }

    assert!(!Opcode::End.is_relative());
    assert!(!Opcode::Close.is_relative());
    assert!(!Opcode::Move.is_relative());
    assert!(Opcode::MoveRel.is_relative());
    assert!(Opcode::CubicRel.is_relative());
    assert!(!Opcode::HLine.is_relative());
    assert!(Opcode::HLineRel.is_relative());
    assert!(Opcode::VLineRel.is_relative());
    assert!(!Opcode::SQuad.is_relative());
    assert!(Opcode::LargeCwArcRel.is_relative());
    assert!(!Opcode::LargeCwArc.is_relative());

    assert_eq!(Opcode::HLine.operand_count(), 1);
    assert_eq!(Opcode::SCubicRel.operand_count(), 4);
    assert_eq!(Opcode::SmallCwArc.operand_count(), 5);
    assert_eq!(Opcode::Cubic.operand_count(), 6);
}

#[test]
fn arc_opcodes_map_to_flags() {
    let ops = [10.0, 5.0, 30.0, 1.0, 2.0];
    let flags = |op| match Command::from_operands(op, &ops).unwrap() {
        Command::ArcTo { flags, .. } => flags,
        _ => panic!(),
    };

    assert_eq!(flags(Opcode::SmallCcwArc), ArcFlags { large_arc: false, sweep: true });
    assert_eq!(flags(Opcode::SmallCwArc), ArcFlags { large_arc: false, sweep: false });
    assert_eq!(flags(Opcode::LargeCcwArc), ArcFlags { large_arc: true, sweep: true });
    assert_eq!(flags(Opcode::LargeCwArcRel), ArcFlags { large_arc: true, sweep: false });

    for op in &[
        Opcode::SmallCcwArc,
        Opcode::SmallCwArcRel,
        Opcode::LargeCcwArcRel,
        Opcode::LargeCwArc,
    ] {
        let cmd = Command::from_operands(*op, &ops).unwrap();
        assert_eq!(cmd.opcode(), *op);
        assert_eq!(&cmd.operands()[..], &ops[..]);
    }
}

#[test]
fn encode_and_decode_s8() {
    let commands = [
        Command::MoveTo {
            to: point(1.0, 2.0),
            relative: false,
        },
        Command::HorizontalLineTo {
            x: -3.0,
            relative: true,
        },
        Command::QuadraticTo {
            ctrl: point(4.0, 5.0),
            to: point(6.0, 7.0),
            relative: false,
        },
        Command::Close,
        Command::End,
    ];

    let mut data = Vec::new();
    encode_commands(NumericFormat::S8, &commands, &mut data).unwrap();
    assert_eq!(
        data,
        vec![0x02, 1, 2, 0x0C, 0xfd, 0x06, 4, 5, 6, 7, 0x01, 0x00]
    );

    assert_eq!(decode_commands(NumericFormat::S8, &data).unwrap(), commands.to_vec());
    assert_eq!(Commands::new(NumericFormat::S8, &data).count(), 5);
}

#[test]
fn decode_errors() {
    assert_eq!(
        decode_commands(NumericFormat::S8, &[0x02, 1]),
        Err(Error::InvalidArgument(InvalidArgument::TruncatedData))
    );
    assert_eq!(
        decode_commands(NumericFormat::S8, &[0x0A]),
        Err(Error::InvalidArgument(InvalidArgument::UnknownOpcode(0x0A)))
    );
    assert_eq!(
        decode_commands(NumericFormat::S16, &[0x01, 0x00, 0x00]),
        Err(Error::InvalidArgument(InvalidArgument::TruncatedData))
    );

    // Everything after an end command is ignored.
    assert_eq!(
        decode_commands(NumericFormat::S8, &[0x01, 0x00, 0xff]),
        Ok(vec![Command::Close, Command::End])
    );
    assert_eq!(
        Commands::new(NumericFormat::S8, &[0x02, 1, 1, 0x04, 1]).collect::<Vec<_>>(),
        vec![Command::MoveTo {
            to: point(1.0, 1.0),
            relative: false
        }]
    );
}

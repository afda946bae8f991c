//! Numeric formats of the packed command streams.

use crate::error::{Error, InvalidArgument};

/// Numeric format of the slots of a command stream.
///
/// Every opcode and every operand occupies one slot, stored in little endian.
/// Opcode slots hold the opcode byte followed by zero padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum NumericFormat {
    S8,
    S16,
    S32,
    Fp32,
}

impl NumericFormat {
    /// Size in bytes of a slot.
    #[inline]
    pub fn slot_size(self) -> usize {
        match self {
            NumericFormat::S8 => 1,
            NumericFormat::S16 => 2,
            NumericFormat::S32 | NumericFormat::Fp32 => 4,
        }
    }

    /// Returns the value that is actually stored when writing `value` in this format.
    ///
    /// Integer formats round to the nearest integer and saturate.
    #[inline]
    pub fn quantize(self, value: f32) -> f32 {
        match self {
            NumericFormat::S8 => value.round() as i8 as f32,
            NumericFormat::S16 => value.round() as i16 as f32,
            NumericFormat::S32 => value.round() as i32 as f32,
            NumericFormat::Fp32 => value,
        }
    }

    /// Appends an operand slot.
    pub fn write_operand(self, value: f32, out: &mut Vec<u8>) {
        match self {
            NumericFormat::S8 => out.extend_from_slice(&(value.round() as i8).to_le_bytes()),
            NumericFormat::S16 => out.extend_from_slice(&(value.round() as i16).to_le_bytes()),
            NumericFormat::S32 => out.extend_from_slice(&(value.round() as i32).to_le_bytes()),
            NumericFormat::Fp32 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Appends an opcode slot.
    pub fn write_opcode(self, opcode: u8, out: &mut Vec<u8>) {
        out.push(opcode);
        for _ in 1..self.slot_size() {
            out.push(0);
        }
    }

    /// Reads the operand slot at `offset`.
    pub fn read_operand(self, data: &[u8], offset: usize) -> Result<f32, Error> {
        let bytes = data
            .get(offset..offset + self.slot_size())
            .ok_or(InvalidArgument::TruncatedData)?;

        Ok(match self {
            NumericFormat::S8 => bytes[0] as i8 as f32,
            NumericFormat::S16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
            NumericFormat::S32 => {
                i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32
            }
            NumericFormat::Fp32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    /// Reads the opcode byte of the slot at `offset`.
    pub fn read_opcode(self, data: &[u8], offset: usize) -> Result<u8, Error> {
        if offset + self.slot_size() > data.len() {
            return Err(InvalidArgument::TruncatedData.into());
        }

        Ok(data[offset])
    }
}

#[test]
fn integer_formats_round_and_saturate() {
    assert_eq!(NumericFormat::S8.quantize(1.6), 2.0);
    assert_eq!(NumericFormat::S8.quantize(-1.6), -2.0);
    assert_eq!(NumericFormat::S8.quantize(300.0), 127.0);
    assert_eq!(NumericFormat::S8.quantize(-300.0), -128.0);
    assert_eq!(NumericFormat::S16.quantize(40000.0), 32767.0);
    assert_eq!(NumericFormat::S32.quantize(0.4), 0.0);
    assert_eq!(NumericFormat::Fp32.quantize(0.4), 0.4);
}

#[test]
fn slots_are_little_endian() {
    let mut out = Vec::new();
    NumericFormat::S16.write_opcode(0x04, &mut out);
    NumericFormat::S16.write_operand(-2.0, &mut out);
    NumericFormat::S16.write_operand(258.0, &mut out);
    assert_eq!(out, vec![0x04, 0x00, 0xfe, 0xff, 0x02, 0x01]);

    assert_eq!(NumericFormat::S16.read_opcode(&out, 0), Ok(0x04));
    assert_eq!(NumericFormat::S16.read_operand(&out, 2), Ok(-2.0));
    assert_eq!(NumericFormat::S16.read_operand(&out, 4), Ok(258.0));
    assert_eq!(
        NumericFormat::S16.read_operand(&out, 5),
        Err(Error::InvalidArgument(InvalidArgument::TruncatedData))
    );

    let mut out = Vec::new();
    NumericFormat::Fp32.write_opcode(0x02, &mut out);
    NumericFormat::Fp32.write_operand(1.5, &mut out);
    assert_eq!(out.len(), 8);
    assert_eq!(&out[0..4], &[0x02, 0, 0, 0]);
    assert_eq!(NumericFormat::Fp32.read_operand(&out, 4), Ok(1.5));
}

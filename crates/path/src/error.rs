use std::collections::TryReserveError;

use thiserror::Error;

/// The result type of operations that modify a path or its stroke.
pub type StrokeResult = Result<(), Error>;

/// Describes why an argument was rejected.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum InvalidArgument {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("not enough operands for the given opcodes")]
    MissingOperands,
    #[error("path data ends in the middle of a command")]
    TruncatedData,
    #[error("the line width must be finite and greater than zero")]
    InvalidLineWidth,
    #[error("dash pattern entries must be finite and non-negative")]
    InvalidDashPattern,
    #[error("the path has no stroke configured")]
    MissingStroke,
    #[error("non-finite coordinate or parameter")]
    NonFiniteValue,
    #[error("arc radii must not be negative")]
    NegativeRadius,
}

/// The error enumeration shared by all ribbon crates.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    #[error("out of memory")]
    OutOfResources,
    #[error("not supported: {0}")]
    NotSupported(&'static str),
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfResources
    }
}

#[test]
fn error_messages() {
    let err: Error = InvalidArgument::UnknownOpcode(0x2a).into();
    assert_eq!(err, Error::InvalidArgument(InvalidArgument::UnknownOpcode(42)));
    assert_eq!(err.to_string(), "invalid argument: unknown opcode 0x2a");
    assert_eq!(Error::OutOfResources.to_string(), "out of memory");

    let mut v: Vec<u8> = Vec::new();
    let err: Error = v.try_reserve(usize::MAX).unwrap_err().into();
    assert_eq!(err, Error::OutOfResources);
}

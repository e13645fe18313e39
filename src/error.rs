//! Error types for bit-level encoding and decoding

use crate::width::Container;

/// Errors that can occur while writing or reading bit fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bit width outside the legal range of its integer container
    InvalidWidth {
        /// Integer container the width was checked against
        container: Container,
        /// Whether the field was unsigned
        unsigned: bool,
        /// Offending width
        width: u32,
    },
    /// Exponent size outside `[MIN_EXPONENT_SIZE, EXPONENT_SIZE]`
    InvalidExponentSize(u32),
    /// Significand size outside `[MIN_SIGNIFICAND_SIZE, SIGNIFICAND_SIZE]`
    InvalidSignificandSize(u32),
    /// Alignment byte multiple was zero
    InvalidAlignment,
    /// Length prefix size outside `1..=32`
    InvalidLengthSize(u32),
    /// Value handed to the zero codec has exponent or significand bits set
    NotZero,
    /// Value handed to the infinity codec is not an infinity
    NotInfinity,
    /// Significand bits selected by a NaN or subnormal codec are all zero
    ZeroSignificand,
    /// Length does not fit in the configured length prefix
    LengthOverflow,
    /// Element cannot be represented by the configured element encoding
    InvalidElement(u8),
    /// Decoded bytes are not valid UTF-8
    InvalidUtf8,
    /// Fixed-size byte sink is full
    ShortBuffer,
    /// Byte source ran out of data while bits were still required
    UnexpectedEof,
    /// Underlying I/O endpoint failed
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::InvalidWidth { .. } => "bit width out of range for integer container",
            Error::InvalidExponentSize(_) => "exponent size out of range",
            Error::InvalidSignificandSize(_) => "significand size out of range",
            Error::InvalidAlignment => "alignment byte multiple is not positive",
            Error::InvalidLengthSize(_) => "length prefix size out of range",
            Error::NotZero => "exponent or significand bits are not all zero",
            Error::NotInfinity => "value is not an infinity",
            Error::ZeroSignificand => "significand bits are all zero",
            Error::LengthOverflow => "length does not fit in length prefix",
            Error::InvalidElement(_) => "element not representable in element encoding",
            Error::InvalidUtf8 => "decoded bytes are not valid UTF-8",
            Error::ShortBuffer => "buffer too small for operation",
            Error::UnexpectedEof => "unexpected end of data",
            #[cfg(feature = "std")]
            Error::Io(_) => "byte endpoint I/O failure",
        }
    }

    /// Whether the error is a configuration or value error raised before any I/O
    pub const fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidWidth { .. }
                | Error::InvalidExponentSize(_)
                | Error::InvalidSignificandSize(_)
                | Error::InvalidAlignment
                | Error::InvalidLengthSize(_)
                | Error::NotZero
                | Error::NotInfinity
                | Error::ZeroSignificand
                | Error::LengthOverflow
                | Error::InvalidElement(_)
        )
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidWidth {
                container,
                unsigned,
                width,
            } => write!(
                f,
                "{}: {} {} field of width {}",
                self.description(),
                if *unsigned { "unsigned" } else { "signed" },
                container,
                width
            ),
            Error::InvalidExponentSize(size)
            | Error::InvalidSignificandSize(size)
            | Error::InvalidLengthSize(size) => write!(f, "{} ({})", self.description(), size),
            Error::InvalidElement(byte) => write!(f, "{} ({:#04x})", self.description(), byte),
            Error::Io(kind) => write!(f, "{}: {}", self.description(), kind),
            _ => write!(f, "{}", self.description()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
            kind => Error::Io(kind),
        }
    }
}

/// Result type alias for bit I/O operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_includes_width() {
        let err = Error::InvalidWidth {
            container: Container::Bits16,
            unsigned: false,
            width: 17,
        };
        let text = err.to_string();
        assert!(text.contains("signed 16-bit"));
        assert!(text.contains("17"));
    }

    #[test]
    fn test_io_eof_maps_to_unexpected_eof() {
        let err: Error = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert_eq!(err, Error::UnexpectedEof);

        let err: Error = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert_eq!(err, Error::Io(std::io::ErrorKind::BrokenPipe));
        assert!(!err.is_argument_error());
    }

    #[test]
    fn test_argument_errors() {
        assert!(Error::InvalidAlignment.is_argument_error());
        assert!(Error::ZeroSignificand.is_argument_error());
        assert!(!Error::UnexpectedEof.is_argument_error());
        assert!(!Error::ShortBuffer.is_argument_error());
    }
}

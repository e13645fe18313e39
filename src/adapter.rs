//! Length-prefixed adapters for byte arrays, strings and sequences
//!
//! Every adapter writes its element count first, as an unsigned field of
//! `length_size` bits (1..=32), followed by the elements themselves.

use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::{ValueReader, ValueWriter};
use crate::endpoint::{ByteSink, ByteSource};
use crate::error::{Error, Result};
use crate::input::BitInput;
use crate::output::BitOutput;

/// Largest accepted length prefix size in bits
pub const MAX_LENGTH_SIZE: u32 = 32;

/// Upper bound on capacity reserved up front from an untrusted length prefix
const MAX_PREALLOCATION: usize = 4096;

fn require_valid_length_size(length_size: u32) -> Result<u32> {
    if !(1..=MAX_LENGTH_SIZE).contains(&length_size) {
        return Err(Error::InvalidLengthSize(length_size));
    }
    Ok(length_size)
}

fn write_length<S: ByteSink>(
    output: &mut BitOutput<S>,
    length_size: u32,
    len: usize,
) -> Result<()> {
    let len = len as u64;
    if len >> length_size != 0 {
        return Err(Error::LengthOverflow);
    }
    output.write_unsigned(length_size, len)
}

fn read_length<S: ByteSource>(input: &mut BitInput<S>, length_size: u32) -> Result<usize> {
    usize::try_from(input.read_unsigned(length_size)?).map_err(|_| Error::LengthOverflow)
}

/// How each byte of a byte array goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementEncoding {
    /// Full 8 bits per byte
    Octet,
    /// 7 bits per byte; bytes `>= 0x80` are rejected
    Ascii,
    /// Printable ASCII (`0x20..=0x7E`) in 6 or 7 bits
    ///
    /// A selector bit picks the range: `0` then 6 bits of `b - 0x20` for
    /// `0x20..=0x5F`, or `1` then 5 bits of `b - 0x60` for `0x60..=0x7E`.
    AsciiPrintable,
}

impl ElementEncoding {
    /// Check that `byte` can be written with this encoding
    #[inline]
    pub fn accepts(&self, byte: u8) -> bool {
        match self {
            ElementEncoding::Octet => true,
            ElementEncoding::Ascii => byte < 0x80,
            ElementEncoding::AsciiPrintable => (0x20..=0x7E).contains(&byte),
        }
    }

    /// Number of bits `byte` takes on the wire
    #[inline]
    pub fn encoded_size(&self, byte: u8) -> u32 {
        match self {
            ElementEncoding::Octet => 8,
            ElementEncoding::Ascii => 7,
            ElementEncoding::AsciiPrintable if byte < 0x60 => 7,
            ElementEncoding::AsciiPrintable => 6,
        }
    }

    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, byte: u8) -> Result<()> {
        match self {
            ElementEncoding::Octet => output.write_unsigned(8, byte as u64),
            ElementEncoding::Ascii => output.write_unsigned(7, byte as u64),
            ElementEncoding::AsciiPrintable if byte < 0x60 => {
                output.write_bool(false)?;
                output.write_unsigned(6, (byte - 0x20) as u64)
            }
            ElementEncoding::AsciiPrintable => {
                output.write_bool(true)?;
                output.write_unsigned(5, (byte - 0x60) as u64)
            }
        }
    }

    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<u8> {
        let byte = match self {
            ElementEncoding::Octet => input.read_unsigned(8)? as u8,
            ElementEncoding::Ascii => input.read_unsigned(7)? as u8,
            ElementEncoding::AsciiPrintable => {
                if input.read_bool()? {
                    input.read_unsigned(5)? as u8 + 0x60
                } else {
                    input.read_unsigned(6)? as u8 + 0x20
                }
            }
        };
        Ok(byte)
    }
}

/// Length-prefixed byte array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteArrayAdapter {
    length_size: u32,
    element: ElementEncoding,
}

impl ByteArrayAdapter {
    /// Create an adapter with a `length_size`-bit prefix (1..=32)
    pub fn new(length_size: u32, element: ElementEncoding) -> Result<Self> {
        Ok(Self {
            length_size: require_valid_length_size(length_size)?,
            element,
        })
    }

    /// Size of the length prefix in bits
    #[inline]
    pub fn length_size(&self) -> u32 {
        self.length_size
    }

    /// Element encoding
    #[inline]
    pub fn element(&self) -> ElementEncoding {
        self.element
    }
}

impl ValueWriter<[u8]> for ByteArrayAdapter {
    /// Fails before writing anything if the length overflows the prefix or
    /// any byte is outside the element encoding.
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &[u8]) -> Result<()> {
        if let Some(&byte) = value.iter().find(|&&b| !self.element.accepts(b)) {
            return Err(Error::InvalidElement(byte));
        }
        write_length(output, self.length_size, value.len())?;
        for &byte in value {
            self.element.write(output, byte)?;
        }
        Ok(())
    }
}

impl ValueWriter<Vec<u8>> for ByteArrayAdapter {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &Vec<u8>) -> Result<()> {
        ValueWriter::<[u8]>::write(self, output, value.as_slice())
    }
}

impl ValueReader<Vec<u8>> for ByteArrayAdapter {
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<Vec<u8>> {
        let len = read_length(input, self.length_size)?;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        for _ in 0..len {
            bytes.push(self.element.read(input)?);
        }
        Ok(bytes)
    }
}

/// UTF-8 string over a byte array adapter
///
/// The length prefix counts encoded bytes, not characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringAdapter {
    bytes: ByteArrayAdapter,
}

impl StringAdapter {
    /// Create a string adapter over `bytes`
    #[inline]
    pub fn new(bytes: ByteArrayAdapter) -> Self {
        Self { bytes }
    }

    /// Plain UTF-8 with a `length_size`-bit prefix
    pub fn utf8(length_size: u32) -> Result<Self> {
        Ok(Self::new(ByteArrayAdapter::new(
            length_size,
            ElementEncoding::Octet,
        )?))
    }
}

impl ValueWriter<str> for StringAdapter {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &str) -> Result<()> {
        ValueWriter::<[u8]>::write(&self.bytes, output, value.as_bytes())
    }
}

impl ValueWriter<String> for StringAdapter {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &String) -> Result<()> {
        ValueWriter::<str>::write(self, output, value.as_str())
    }
}

impl ValueReader<String> for StringAdapter {
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<String> {
        let bytes = self.bytes.read(input)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}

/// Length-prefixed sequence of values sharing one element codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceAdapter<C> {
    length_size: u32,
    element: C,
}

impl<C> SequenceAdapter<C> {
    /// Create an adapter with a `length_size`-bit prefix (1..=32)
    pub fn new(length_size: u32, element: C) -> Result<Self> {
        Ok(Self {
            length_size: require_valid_length_size(length_size)?,
            element,
        })
    }

    /// Size of the length prefix in bits
    #[inline]
    pub fn length_size(&self) -> u32 {
        self.length_size
    }

    /// Borrow the element codec
    #[inline]
    pub fn element(&self) -> &C {
        &self.element
    }
}

impl<T, C: ValueWriter<T>> ValueWriter<[T]> for SequenceAdapter<C> {
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &[T]) -> Result<()> {
        write_length(output, self.length_size, value.len())?;
        for element in value {
            self.element.write(output, element)?;
        }
        Ok(())
    }
}

impl<T, C: ValueWriter<T>> ValueWriter<Vec<T>> for SequenceAdapter<C> {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &Vec<T>) -> Result<()> {
        ValueWriter::<[T]>::write(self, output, value.as_slice())
    }
}

impl<T, C: ValueReader<T>> ValueReader<Vec<T>> for SequenceAdapter<C> {
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<Vec<T>> {
        let len = read_length(input, self.length_size)?;
        let mut values = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        for _ in 0..len {
            values.push(self.element.read(input)?);
        }
        Ok(values)
    }
}

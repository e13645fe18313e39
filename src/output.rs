//! Bit accumulator for writing
//!
//! [`BitOutput`] packs fields of arbitrary bit width into whole bytes and
//! hands every completed byte to its [`ByteSink`]. Bits are placed
//! most-significant first; at most one partially filled octet is held back.

use crate::codec::BitWritable;
use crate::compact::{Infinity, NaN, Subnormal, Zero};
use crate::endpoint::ByteSink;
use crate::error::{Error, Result};
use crate::float::{FloatCodec, FloatShape, IeeeFloat};
use crate::width::{require_valid_width, BitInt, Width};

/// Bit writer over a byte sink
///
/// One instance covers one logical message: create it on a sink, write the
/// fields, then [`align`](Self::align) to flush the trailing partial byte.
#[derive(Debug)]
pub struct BitOutput<S> {
    sink: S,
    /// Bits written into the current byte, right-justified
    octet: u8,
    /// Free bit slots in `octet`
    available: u32,
    /// Whole bytes handed to the sink
    count: u64,
}

impl<S: ByteSink> BitOutput<S> {
    /// Create new writer over the given sink
    #[inline]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            octet: 0,
            available: 8,
            count: 0,
        }
    }

    /// Write an integer of type `T` using `width` bits
    ///
    /// Unsigned values lose every bit above `width`. Signed values are
    /// written as a sign bit followed by the low `width - 1` bits.
    #[inline]
    pub fn write_int<T: BitInt>(&mut self, width: u32, value: T) -> Result<()> {
        require_valid_width(T::CONTAINER, T::UNSIGNED, width)?;
        if T::UNSIGNED {
            self.write_unsigned(width, value.to_u64())
        } else {
            self.write_signed(width, value.to_u64() as i64)
        }
    }

    /// Write a value using a pre-validated width descriptor
    ///
    /// `value` is interpreted as unsigned or signed according to `width`.
    /// Unsigned 64-bit values above `i64::MAX` are passed bit-cast (`v as i64`).
    #[inline]
    pub fn write_width(&mut self, width: Width, value: i64) -> Result<()> {
        if width.is_unsigned() {
            self.write_unsigned(width.bits(), value as u64)
        } else {
            self.write_signed(width.bits(), value)
        }
    }

    /// Write a u8 value using `width` bits (1..=8)
    #[inline]
    pub fn write_u8(&mut self, width: u32, value: u8) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write a u16 value using `width` bits (1..=16)
    #[inline]
    pub fn write_u16(&mut self, width: u32, value: u16) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write a u32 value using `width` bits (1..=32)
    #[inline]
    pub fn write_u32(&mut self, width: u32, value: u32) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write a u64 value using `width` bits (1..=64)
    #[inline]
    pub fn write_u64(&mut self, width: u32, value: u64) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write an i8 value using `width` bits (1..=8)
    #[inline]
    pub fn write_i8(&mut self, width: u32, value: i8) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write an i16 value using `width` bits (1..=16)
    #[inline]
    pub fn write_i16(&mut self, width: u32, value: i16) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write an i32 value using `width` bits (1..=32)
    #[inline]
    pub fn write_i32(&mut self, width: u32, value: i32) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write an i64 value using `width` bits (1..=64)
    #[inline]
    pub fn write_i64(&mut self, width: u32, value: i64) -> Result<()> {
        self.write_int(width, value)
    }

    /// Write a single bit
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.unsigned8(1, value as u8)
    }

    /// Write a float with the given exponent and significand sizes
    #[inline]
    pub fn write_float<F: IeeeFloat>(
        &mut self,
        exponent_size: u32,
        significand_size: u32,
        value: F,
    ) -> Result<()> {
        let shape = FloatShape::<F>::new(exponent_size, significand_size)?;
        FloatCodec::new(shape).write(self, value)
    }

    /// Write an f32 with the given exponent (2..=8) and significand (1..=23) sizes
    #[inline]
    pub fn write_f32(
        &mut self,
        exponent_size: u32,
        significand_size: u32,
        value: f32,
    ) -> Result<()> {
        self.write_float(exponent_size, significand_size, value)
    }

    /// Write an f64 with the given exponent (2..=11) and significand (1..=52) sizes
    #[inline]
    pub fn write_f64(
        &mut self,
        exponent_size: u32,
        significand_size: u32,
        value: f64,
    ) -> Result<()> {
        self.write_float(exponent_size, significand_size, value)
    }

    /// Write a signed zero as its sign bit
    #[inline]
    pub fn write_float_zero<F: IeeeFloat>(&mut self, value: F) -> Result<()> {
        Zero::<F>::new().write(self, value)
    }

    /// Write a signed infinity as its sign bit
    #[inline]
    pub fn write_float_infinity<F: IeeeFloat>(&mut self, value: F) -> Result<()> {
        Infinity::<F>::new().write(self, value)
    }

    /// Write a NaN as its sign and `significand_size` significand bits
    #[inline]
    pub fn write_float_nan<F: IeeeFloat>(&mut self, significand_size: u32, value: F) -> Result<()> {
        NaN::<F>::new(significand_size)?.write(self, value)
    }

    /// Write a subnormal as its sign and `significand_size` significand bits
    #[inline]
    pub fn write_float_subnormal<F: IeeeFloat>(
        &mut self,
        significand_size: u32,
        value: F,
    ) -> Result<()> {
        Subnormal::<F>::new(significand_size)?.write(self, value)
    }

    /// Write a value that knows how to write itself
    #[inline]
    pub fn write_value<T: BitWritable + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.write_to(self)
    }

    /// Pad with zero bits up to the next multiple of `bytes` bytes
    ///
    /// First completes the current partial byte, then emits whole zero bytes
    /// until the byte count is a multiple of `bytes`. Returns the number of
    /// padding bits written.
    pub fn align(&mut self, bytes: u32) -> Result<u64> {
        if bytes == 0 {
            return Err(Error::InvalidAlignment);
        }

        let mut bits = 0u64;
        if self.available < 8 {
            bits += self.available as u64;
            self.unsigned8(self.available, 0)?;
        }
        debug_assert_eq!(self.available, 8);

        let bytes = bytes as u64;
        while self.count % bytes != 0 {
            self.unsigned8(8, 0)?;
            bits += 8;
        }

        Ok(bits)
    }

    /// Number of whole bytes handed to the sink so far
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of bits held in the current partial byte (0..=7)
    #[inline]
    pub fn pending_bits(&self) -> u32 {
        8 - self.available
    }

    /// Total number of bits written, including the partial byte
    #[inline]
    pub fn bit_count(&self) -> u64 {
        self.count * 8 + self.pending_bits() as u64
    }

    /// Borrow the underlying sink
    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Unwrap the underlying sink
    ///
    /// Bits not yet completed into a byte are dropped; call
    /// [`align`](Self::align) first to keep them.
    #[inline]
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Write the low `width` bits of `value`, most significant first
    pub(crate) fn write_unsigned(&mut self, width: u32, value: u64) -> Result<()> {
        debug_assert!(width > 0 && width <= 64);
        let quotient = width >> 3;
        let remainder = width & 7;
        if remainder > 0 {
            self.unsigned8(remainder, (value >> (quotient << 3)) as u8)?;
        }
        for i in (0..quotient).rev() {
            self.unsigned8(8, (value >> (i << 3)) as u8)?;
        }
        Ok(())
    }

    /// Write a sign bit, then the low `width - 1` bits of `value`
    pub(crate) fn write_signed(&mut self, width: u32, value: i64) -> Result<()> {
        debug_assert!(width > 0 && width <= 64);
        self.unsigned8(1, (value < 0) as u8)?;
        if width > 1 {
            self.write_unsigned(width - 1, value as u64)?;
        }
        Ok(())
    }

    /// Place the low `size` bits of `value` (1..=8) into the octet
    fn unsigned8(&mut self, size: u32, value: u8) -> Result<()> {
        debug_assert!(size > 0 && size <= 8);

        if size == 8 && self.available == 8 {
            self.sink.write_byte(value)?;
            self.count += 1;
            return Ok(());
        }

        if size > self.available {
            let required = size - self.available;
            self.unsigned8(self.available, value >> required)?;
            return self.unsigned8(required, value);
        }

        self.octet = (self.octet << size) | (value & mask(size));
        self.available -= size;
        if self.available == 0 {
            self.sink.write_byte(self.octet)?;
            self.count += 1;
            self.octet = 0;
            self.available = 8;
        }
        Ok(())
    }
}

/// Mask of the low `size` bits (0..=8)
#[inline]
pub(crate) const fn mask(size: u32) -> u8 {
    ((1u16 << size) - 1) as u8
}

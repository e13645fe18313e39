//! Bit accumulator for reading
//!
//! [`BitInput`] is the mirror of [`BitOutput`](crate::output::BitOutput): it
//! pulls bytes from a [`ByteSource`] one at a time and hands out fields of
//! arbitrary bit width, most-significant bit first.

use crate::codec::BitReadable;
use crate::compact::{Infinity, NaN, Subnormal, Zero};
use crate::endpoint::ByteSource;
use crate::error::{Error, Result};
use crate::float::{FloatCodec, FloatShape, IeeeFloat};
use crate::output::mask;
use crate::width::{require_valid_width, BitInt, Width};

/// Bit reader over a byte source
#[derive(Debug)]
pub struct BitInput<S> {
    source: S,
    /// Last byte pulled from the source
    octet: u8,
    /// Unread bits remaining at the low end of `octet`
    available: u32,
    /// Whole bytes pulled from the source
    count: u64,
}

impl<S: ByteSource> BitInput<S> {
    /// Create new reader over the given source
    #[inline]
    pub fn new(source: S) -> Self {
        Self {
            source,
            octet: 0,
            available: 0,
            count: 0,
        }
    }

    /// Read an integer of type `T` stored in `width` bits
    ///
    /// Signed fields are sign-extended from their leading sign bit.
    #[inline]
    pub fn read_int<T: BitInt>(&mut self, width: u32) -> Result<T> {
        require_valid_width(T::CONTAINER, T::UNSIGNED, width)?;
        let bits = if T::UNSIGNED {
            self.read_unsigned(width)?
        } else {
            self.read_signed(width)? as u64
        };
        Ok(T::from_u64(bits))
    }

    /// Read a value described by a pre-validated width descriptor
    ///
    /// Unsigned fields are returned bit-cast into `i64`: a 64-bit unsigned
    /// value above `i64::MAX` comes back negative, and `as u64` recovers it.
    #[inline]
    pub fn read_width(&mut self, width: Width) -> Result<i64> {
        if width.is_unsigned() {
            Ok(self.read_unsigned(width.bits())? as i64)
        } else {
            self.read_signed(width.bits())
        }
    }

    /// Read a u8 value stored in `width` bits (1..=8)
    #[inline]
    pub fn read_u8(&mut self, width: u32) -> Result<u8> {
        self.read_int(width)
    }

    /// Read a u16 value stored in `width` bits (1..=16)
    #[inline]
    pub fn read_u16(&mut self, width: u32) -> Result<u16> {
        self.read_int(width)
    }

    /// Read a u32 value stored in `width` bits (1..=32)
    #[inline]
    pub fn read_u32(&mut self, width: u32) -> Result<u32> {
        self.read_int(width)
    }

    /// Read a u64 value stored in `width` bits (1..=64)
    #[inline]
    pub fn read_u64(&mut self, width: u32) -> Result<u64> {
        self.read_int(width)
    }

    /// Read an i8 value stored in `width` bits (1..=8)
    #[inline]
    pub fn read_i8(&mut self, width: u32) -> Result<i8> {
        self.read_int(width)
    }

    /// Read an i16 value stored in `width` bits (1..=16)
    #[inline]
    pub fn read_i16(&mut self, width: u32) -> Result<i16> {
        self.read_int(width)
    }

    /// Read an i32 value stored in `width` bits (1..=32)
    #[inline]
    pub fn read_i32(&mut self, width: u32) -> Result<i32> {
        self.read_int(width)
    }

    /// Read an i64 value stored in `width` bits (1..=64)
    #[inline]
    pub fn read_i64(&mut self, width: u32) -> Result<i64> {
        self.read_int(width)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.unsigned8(1)? == 1)
    }

    /// Read a float written with the given exponent and significand sizes
    #[inline]
    pub fn read_float<F: IeeeFloat>(
        &mut self,
        exponent_size: u32,
        significand_size: u32,
    ) -> Result<F> {
        let shape = FloatShape::<F>::new(exponent_size, significand_size)?;
        FloatCodec::new(shape).read(self)
    }

    /// Read an f32 written with the given exponent and significand sizes
    #[inline]
    pub fn read_f32(&mut self, exponent_size: u32, significand_size: u32) -> Result<f32> {
        self.read_float(exponent_size, significand_size)
    }

    /// Read an f64 written with the given exponent and significand sizes
    #[inline]
    pub fn read_f64(&mut self, exponent_size: u32, significand_size: u32) -> Result<f64> {
        self.read_float(exponent_size, significand_size)
    }

    /// Read a signed zero written by the zero codec
    #[inline]
    pub fn read_float_zero<F: IeeeFloat>(&mut self) -> Result<F> {
        Zero::<F>::new().read(self)
    }

    /// Read a signed infinity written by the infinity codec
    #[inline]
    pub fn read_float_infinity<F: IeeeFloat>(&mut self) -> Result<F> {
        Infinity::<F>::new().read(self)
    }

    /// Read a NaN written by the NaN codec
    #[inline]
    pub fn read_float_nan<F: IeeeFloat>(&mut self, significand_size: u32) -> Result<F> {
        NaN::<F>::new(significand_size)?.read(self)
    }

    /// Read a subnormal written by the subnormal codec
    #[inline]
    pub fn read_float_subnormal<F: IeeeFloat>(&mut self, significand_size: u32) -> Result<F> {
        Subnormal::<F>::new(significand_size)?.read(self)
    }

    /// Read a value that knows how to read itself
    #[inline]
    pub fn read_value<T: BitReadable>(&mut self) -> Result<T> {
        T::read_from(self)
    }

    /// Skip to the next multiple of `bytes` bytes
    ///
    /// Discards the rest of the current byte and any whole bytes needed to
    /// reach the boundary. Returns the number of bits discarded.
    pub fn align(&mut self, bytes: u32) -> Result<u64> {
        if bytes == 0 {
            return Err(Error::InvalidAlignment);
        }

        let mut bits = 0u64;
        if self.available > 0 {
            bits += self.available as u64;
            self.unsigned8(self.available)?;
        }
        debug_assert_eq!(self.available, 0);

        let bytes = bytes as u64;
        while self.count % bytes != 0 {
            self.unsigned8(8)?;
            bits += 8;
        }

        Ok(bits)
    }

    /// Number of whole bytes pulled from the source so far
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of unread bits left in the current byte (0..=7)
    #[inline]
    pub fn pending_bits(&self) -> u32 {
        self.available
    }

    /// Total number of bits consumed
    #[inline]
    pub fn bit_count(&self) -> u64 {
        self.count * 8 - self.available as u64
    }

    /// Borrow the underlying source
    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Unwrap the underlying source
    #[inline]
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read `width` bits as an unsigned value, most significant first
    pub(crate) fn read_unsigned(&mut self, width: u32) -> Result<u64> {
        debug_assert!(width > 0 && width <= 64);
        let quotient = width >> 3;
        let remainder = width & 7;
        let mut value = 0u64;
        if remainder > 0 {
            value = self.unsigned8(remainder)? as u64;
        }
        for _ in 0..quotient {
            value = (value << 8) | self.unsigned8(8)? as u64;
        }
        Ok(value)
    }

    /// Read a sign bit, then `width - 1` bits, sign-extending the result
    pub(crate) fn read_signed(&mut self, width: u32) -> Result<i64> {
        debug_assert!(width > 0 && width <= 64);
        let negative = self.unsigned8(1)? == 1;
        if width == 1 {
            return Ok(if negative { -1 } else { 0 });
        }
        let rest = width - 1;
        let bits = self.read_unsigned(rest)?;
        if negative {
            Ok((-1i64 << rest) | bits as i64)
        } else {
            Ok(bits as i64)
        }
    }

    /// Take `size` bits (1..=8) from the octet, refilling when exhausted
    fn unsigned8(&mut self, size: u32) -> Result<u8> {
        debug_assert!(size > 0 && size <= 8);

        if self.available == 0 {
            let byte = self.source.read_byte()?;
            self.count += 1;
            if size == 8 {
                return Ok(byte);
            }
            self.octet = byte;
            self.available = 8;
        }

        if size > self.available {
            let required = size - self.available;
            let high = self.unsigned8(self.available)?;
            let low = self.unsigned8(required)?;
            return Ok((high << required) | low);
        }

        self.available -= size;
        Ok((self.octet >> self.available) & mask(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::SliceSource;
    use crate::output::BitOutput;
    use alloc::vec::Vec;

    #[test]
    fn test_input_unpacks_fields() {
        let data = [0b1001_1101];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert_eq!(input.read_u8(5).unwrap(), 19);
        assert_eq!(input.read_u8(3).unwrap(), 5);
        assert_eq!(input.count(), 1);
        assert_eq!(input.align(1).unwrap(), 0);
    }

    #[test]
    fn test_input_unaligned_multi_byte() {
        let data = [0b1101_0101, 0b1110_0000];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert!(input.read_bool().unwrap());
        assert_eq!(input.read_u16(12).unwrap(), 0xABC);
        assert_eq!(input.bit_count(), 13);
        assert_eq!(input.align(1).unwrap(), 3);
    }

    #[test]
    fn test_input_signed_values() {
        let data = [0b1101_0011];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert_eq!(input.read_i8(4).unwrap(), -3);
        assert_eq!(input.read_i8(4).unwrap(), 3);
    }

    #[test]
    fn test_input_signed_extremes() {
        let mut output = BitOutput::new(Vec::new());
        output.write_i64(64, i64::MIN).unwrap();
        output.write_i64(64, i64::MAX).unwrap();
        output.write_i8(8, i8::MIN).unwrap();
        output.write_i16(1, -1).unwrap();
        output.align(1).unwrap();
        let bytes = output.into_inner();

        let mut input = BitInput::new(SliceSource::new(&bytes));
        assert_eq!(input.read_i64(64).unwrap(), i64::MIN);
        assert_eq!(input.read_i64(64).unwrap(), i64::MAX);
        assert_eq!(input.read_i8(8).unwrap(), i8::MIN);
        assert_eq!(input.read_i16(1).unwrap(), -1);
    }

    #[test]
    fn test_input_unexpected_eof() {
        let data = [0xFF];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert_eq!(input.read_u8(6).unwrap(), 0b11_1111);
        assert_eq!(input.read_u8(4), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_input_invalid_width() {
        let data = [0xFF];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert!(input.read_u32(33).is_err());
        assert!(input.read_i8(0).is_err());
        // Nothing was consumed
        assert_eq!(input.count(), 0);
    }

    #[test]
    fn test_input_align_multiple() {
        let data = [0xFF, 0x00, 0x00, 0x00, 0xAB];
        let mut input = BitInput::new(SliceSource::new(&data));
        input.read_u8(2).unwrap();
        assert_eq!(input.align(4).unwrap(), 6 + 24);
        assert_eq!(input.read_u8(8).unwrap(), 0xAB);
        assert_eq!(input.align(0), Err(Error::InvalidAlignment));
    }

    #[test]
    fn test_input_width_descriptor() {
        let data = [0b1111_1011];
        let mut input = BitInput::new(SliceSource::new(&data));
        assert_eq!(input.read_width(Width::of::<i16>(6).unwrap()).unwrap(), -2);
        assert_eq!(input.read_width(Width::of::<u8>(2).unwrap()).unwrap(), 3);
    }

    #[test]
    fn test_input_width_descriptor_full_u64() {
        let data = [0xFF; 8];
        let mut input = BitInput::new(SliceSource::new(&data));
        let read = input.read_width(Width::of::<u64>(64).unwrap()).unwrap();
        assert_eq!(read, -1);
        assert_eq!(read as u64, u64::MAX);
    }
}

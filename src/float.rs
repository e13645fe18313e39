//! Configurable IEEE-754 float codec
//!
//! A [`FloatShape`] picks how many exponent and significand bits of a value
//! go on the wire. Fields are repacked, not rescaled. The exponent field is
//! treated as a signed value and written as a signed `exponent_size` field:
//! its top bit, then its low `exponent_size - 1` bits. Reading sign-extends
//! it back to full width, so exponents whose upper bits are all zeros or all
//! ones survive. The significand is written as its top bit followed by its
//! low `significand_size - 1` bits.
//!
//! ```text
//! +------+---------+----------------------+-------------+-----------------------+
//! | sign | exp top | exp (low bits)       | signif. top | signif. (low bits)    |
//! | 1    | 1       | exponent_size - 1    | 1           | significand_size - 1  |
//! +------+---------+----------------------+-------------+-----------------------+
//! ```
//!
//! With the canonical shape (8/23 for `f32`, 11/52 for `f64`) the layout is
//! exactly the raw IEEE bit pattern, written as one unsigned field.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::codec::{ValueReader, ValueWriter};
use crate::endpoint::{ByteSink, ByteSource};
use crate::error::{Error, Result};
use crate::input::BitInput;
use crate::output::BitOutput;

/// Smallest exponent size accepted by any shape
pub const MIN_EXPONENT_SIZE: u32 = 2;

/// Smallest significand size accepted by any shape or compact codec
pub const MIN_SIGNIFICAND_SIZE: u32 = 1;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// IEEE-754 binary floating point formats (`f32` and `f64`)
pub trait IeeeFloat:
    Copy + PartialEq + fmt::Debug + Send + Sync + 'static + sealed::Sealed
{
    /// Total size in bits
    const SIZE: u32;
    /// Canonical exponent field size
    const EXPONENT_SIZE: u32;
    /// Canonical significand field size (without the implicit bit)
    const SIGNIFICAND_SIZE: u32;

    /// Position of the sign bit
    const SIGN_SHIFT: u32 = Self::SIZE - 1;
    /// Mask of the exponent field in its canonical position
    const EXPONENT_MASK: u64 = ((1u64 << Self::EXPONENT_SIZE) - 1) << Self::SIGNIFICAND_SIZE;
    /// Mask of the significand field
    const SIGNIFICAND_MASK: u64 = (1u64 << Self::SIGNIFICAND_SIZE) - 1;

    /// Raw bit pattern, zero-extended to 64 bits
    fn to_raw(self) -> u64;

    /// Value from a raw bit pattern (upper bits beyond `SIZE` are ignored)
    fn from_raw(bits: u64) -> Self;
}

impl IeeeFloat for f32 {
    const SIZE: u32 = 32;
    const EXPONENT_SIZE: u32 = 8;
    const SIGNIFICAND_SIZE: u32 = 23;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_raw(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl IeeeFloat for f64 {
    const SIZE: u32 = 64;
    const EXPONENT_SIZE: u32 = 11;
    const SIGNIFICAND_SIZE: u32 = 52;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_raw(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// Validate an exponent size for format `F`
#[inline]
pub fn require_valid_exponent_size<F: IeeeFloat>(size: u32) -> Result<u32> {
    if !(MIN_EXPONENT_SIZE..=F::EXPONENT_SIZE).contains(&size) {
        return Err(Error::InvalidExponentSize(size));
    }
    Ok(size)
}

/// Validate a significand size for format `F`
#[inline]
pub fn require_valid_significand_size<F: IeeeFloat>(size: u32) -> Result<u32> {
    if !(MIN_SIGNIFICAND_SIZE..=F::SIGNIFICAND_SIZE).contains(&size) {
        return Err(Error::InvalidSignificandSize(size));
    }
    Ok(size)
}

/// IEEE-754 special value classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatClass {
    /// Exponent and significand all zero
    Zero,
    /// Exponent all ones, significand zero
    Infinity,
    /// Exponent all ones, significand non-zero
    NaN,
    /// Exponent zero, significand non-zero
    Subnormal,
    /// Anything else
    Normal,
}

/// Classify a value from its raw bit pattern
pub fn classify<F: IeeeFloat>(value: F) -> FloatClass {
    let bits = value.to_raw();
    let exponent = bits & F::EXPONENT_MASK;
    let significand = bits & F::SIGNIFICAND_MASK;
    match (exponent, significand) {
        (0, 0) => FloatClass::Zero,
        (0, _) => FloatClass::Subnormal,
        (e, 0) if e == F::EXPONENT_MASK => FloatClass::Infinity,
        (e, _) if e == F::EXPONENT_MASK => FloatClass::NaN,
        _ => FloatClass::Normal,
    }
}

/// Exponent and significand sizes for one wire variant of format `F`
pub struct FloatShape<F> {
    exponent_size: u32,
    significand_size: u32,
    _format: PhantomData<fn() -> F>,
}

impl<F: IeeeFloat> FloatShape<F> {
    /// Create a shape, validating both sizes against `F`'s bounds
    pub fn new(exponent_size: u32, significand_size: u32) -> Result<Self> {
        Ok(Self {
            exponent_size: require_valid_exponent_size::<F>(exponent_size)?,
            significand_size: require_valid_significand_size::<F>(significand_size)?,
            _format: PhantomData,
        })
    }

    /// Full-width shape of `F`
    #[inline]
    pub fn canonical() -> Self {
        Self {
            exponent_size: F::EXPONENT_SIZE,
            significand_size: F::SIGNIFICAND_SIZE,
            _format: PhantomData,
        }
    }

    /// Whether both sizes equal the canonical widths
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.exponent_size == F::EXPONENT_SIZE && self.significand_size == F::SIGNIFICAND_SIZE
    }

    /// Bits written per value
    #[inline]
    pub fn encoded_size(&self) -> u32 {
        1 + self.exponent_size + self.significand_size
    }
}

impl<F> FloatShape<F> {
    /// Number of exponent bits on the wire
    #[inline]
    pub const fn exponent_size(&self) -> u32 {
        self.exponent_size
    }

    /// Number of significand bits on the wire
    #[inline]
    pub const fn significand_size(&self) -> u32 {
        self.significand_size
    }
}

impl<F> Clone for FloatShape<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FloatShape<F> {}

impl<F> PartialEq for FloatShape<F> {
    fn eq(&self, other: &Self) -> bool {
        self.exponent_size == other.exponent_size
            && self.significand_size == other.significand_size
    }
}

impl<F> Eq for FloatShape<F> {}

impl<F> Hash for FloatShape<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exponent_size.hash(state);
        self.significand_size.hash(state);
    }
}

impl<F> fmt::Debug for FloatShape<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatShape")
            .field("format", &core::any::type_name::<F>())
            .field("exponent_size", &self.exponent_size)
            .field("significand_size", &self.significand_size)
            .finish()
    }
}

/// Float codec for one shape
#[derive(Debug)]
pub struct FloatCodec<F> {
    shape: FloatShape<F>,
}

impl<F> Clone for FloatCodec<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FloatCodec<F> {}

impl<F> PartialEq for FloatCodec<F> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

impl<F> Eq for FloatCodec<F> {}

impl<F: IeeeFloat> FloatCodec<F> {
    /// Create a codec for the given shape
    #[inline]
    pub fn new(shape: FloatShape<F>) -> Self {
        Self { shape }
    }

    /// Shape this codec writes
    #[inline]
    pub fn shape(&self) -> FloatShape<F> {
        self.shape
    }

    /// Write `value` using this codec's shape
    pub fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: F) -> Result<()> {
        let bits = value.to_raw();
        if self.shape.is_canonical() {
            return output.write_unsigned(F::SIZE, bits);
        }
        output.write_unsigned(1, bits >> F::SIGN_SHIFT)?;
        output.write_signed(self.shape.exponent_size, signed_exponent::<F>(bits))?;
        write_significand::<F, S>(output, self.shape.significand_size, bits)
    }

    /// Read a value written with this codec's shape
    pub fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        if self.shape.is_canonical() {
            return Ok(F::from_raw(input.read_unsigned(F::SIZE)?));
        }
        let mut bits = input.read_unsigned(1)? << F::SIGN_SHIFT;
        bits |= ((input.read_signed(self.shape.exponent_size)? as u64) << F::SIGNIFICAND_SIZE)
            & F::EXPONENT_MASK;
        bits |= read_significand::<F, S>(input, self.shape.significand_size)?;
        Ok(F::from_raw(bits))
    }
}

impl<F: IeeeFloat> ValueWriter<F> for FloatCodec<F> {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &F) -> Result<()> {
        FloatCodec::write(self, output, *value)
    }
}

impl<F: IeeeFloat> ValueReader<F> for FloatCodec<F> {
    #[inline]
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        FloatCodec::read(self, input)
    }
}

/// Exponent field of `bits`, sign-extended from its top bit
#[inline]
fn signed_exponent<F: IeeeFloat>(bits: u64) -> i64 {
    let field = (bits & F::EXPONENT_MASK) >> F::SIGNIFICAND_SIZE;
    let shift = 64 - F::EXPONENT_SIZE;
    ((field << shift) as i64) >> shift
}

/// Write the significand top bit, then its low `size - 1` bits
pub(crate) fn write_significand<F: IeeeFloat, S: ByteSink>(
    output: &mut BitOutput<S>,
    size: u32,
    bits: u64,
) -> Result<()> {
    output.write_unsigned(1, bits >> (F::SIGNIFICAND_SIZE - 1))?;
    if size > 1 {
        output.write_unsigned(size - 1, bits)?;
    }
    Ok(())
}

/// Inverse of [`write_significand`], returning the field in canonical position
pub(crate) fn read_significand<F: IeeeFloat, S: ByteSource>(
    input: &mut BitInput<S>,
    size: u32,
) -> Result<u64> {
    let mut bits = input.read_unsigned(1)? << (F::SIGNIFICAND_SIZE - 1);
    if size > 1 {
        bits |= input.read_unsigned(size - 1)?;
    }
    Ok(bits)
}

/// Mask of the low `size` bits (0..=64)
#[inline]
pub(crate) const fn low_mask(size: u32) -> u64 {
    if size >= 64 {
        u64::MAX
    } else {
        (1u64 << size) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::SliceSource;
    use alloc::vec::Vec;

    fn roundtrip<F: IeeeFloat>(shape: FloatShape<F>, value: F) -> (F, usize) {
        let codec = FloatCodec::new(shape);
        let mut output = BitOutput::new(Vec::new());
        codec.write(&mut output, value).unwrap();
        output.align(1).unwrap();
        let bytes = output.into_inner();

        let mut input = BitInput::new(SliceSource::new(&bytes));
        (codec.read(&mut input).unwrap(), bytes.len())
    }

    #[test]
    fn test_shape_bounds() {
        assert!(FloatShape::<f32>::new(2, 1).is_ok());
        assert!(FloatShape::<f32>::new(8, 23).unwrap().is_canonical());
        assert_eq!(
            FloatShape::<f32>::new(1, 23),
            Err(Error::InvalidExponentSize(1))
        );
        assert_eq!(
            FloatShape::<f32>::new(9, 23),
            Err(Error::InvalidExponentSize(9))
        );
        assert_eq!(
            FloatShape::<f32>::new(8, 0),
            Err(Error::InvalidSignificandSize(0))
        );
        assert_eq!(
            FloatShape::<f32>::new(8, 24),
            Err(Error::InvalidSignificandSize(24))
        );
        assert!(FloatShape::<f64>::new(11, 52).unwrap().is_canonical());
        assert!(FloatShape::<f64>::new(12, 52).is_err());
        assert!(FloatShape::<f64>::new(11, 53).is_err());
    }

    #[test]
    fn test_canonical_roundtrip() {
        for value in [0.0f32, -0.0, 1.5, -1.0e-40, f32::MAX, f32::INFINITY] {
            let (read, len) = roundtrip(FloatShape::canonical(), value);
            assert_eq!(read.to_bits(), value.to_bits());
            assert_eq!(len, 4);
        }
        for value in [0.0f64, 3.25, -f64::MIN_POSITIVE, f64::NEG_INFINITY] {
            let (read, len) = roundtrip(FloatShape::canonical(), value);
            assert_eq!(read.to_bits(), value.to_bits());
            assert_eq!(len, 8);
        }
    }

    #[test]
    fn test_reduced_shape_roundtrip() {
        // exponent field 0b0000_0011, significand top bit plus low 3 bits
        let bits: u32 = (1 << 31) | (0b011 << 23) | (1 << 22) | 0b110;
        let value = f32::from_bits(bits);
        let shape = FloatShape::<f32>::new(3, 4).unwrap();
        assert_eq!(shape.encoded_size(), 8);

        let (read, len) = roundtrip(shape, value);
        assert_eq!(read.to_bits(), bits);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_reduced_shape_layout() {
        // exponent field 0b1111_1110 is -2 as a signed byte
        let bits: u32 = (0xFE << 23) | (1 << 22) | 0b1;
        let shape = FloatShape::<f32>::new(2, 2).unwrap();
        let mut output = BitOutput::new(Vec::new());
        FloatCodec::new(shape)
            .write(&mut output, f32::from_bits(bits))
            .unwrap();
        output.align(1).unwrap();
        let bytes = output.into_inner();
        // sign 0 | exponent 10 | top 1 | low 1 | padding
        assert_eq!(bytes, [0b0101_1000]);

        let read = FloatCodec::new(shape)
            .read(&mut BitInput::new(SliceSource::new(&bytes)))
            .unwrap();
        assert_eq!(read.to_bits(), bits);
    }

    #[test]
    fn test_reduced_shape_sign_extends_exponent() {
        let shape = FloatShape::<f32>::new(4, 23).unwrap();

        // 2.0 has exponent field 0b1000_0000: top bit 1, low three bits 000
        let mut output = BitOutput::new(Vec::new());
        FloatCodec::new(shape).write(&mut output, 2.0f32).unwrap();
        output.align(1).unwrap();
        let bytes = output.into_inner();
        assert_eq!(bytes, [0b0100_0000, 0, 0, 0]);
        let (read, _) = roundtrip(shape, 2.0f32);
        assert_eq!(read.to_bits(), 0xF8 << 23);

        // exponents with all-ones upper bits come back intact
        let bits: u32 = (0xFE << 23) | 0x12345;
        let (read, _) = roundtrip(shape, f32::from_bits(bits));
        assert_eq!(read.to_bits(), bits);
        let (read, _) = roundtrip(shape, f32::INFINITY);
        assert_eq!(read, f32::INFINITY);
    }

    #[test]
    fn test_single_bit_significand() {
        let shape = FloatShape::<f64>::new(11, 1).unwrap();
        let (read, _) = roundtrip(shape, 1.5f64);
        assert_eq!(read, 1.5);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(0.0f32), FloatClass::Zero);
        assert_eq!(classify(-0.0f64), FloatClass::Zero);
        assert_eq!(classify(f32::NEG_INFINITY), FloatClass::Infinity);
        assert_eq!(classify(f64::NAN), FloatClass::NaN);
        assert_eq!(classify(f32::from_bits(1)), FloatClass::Subnormal);
        assert_eq!(classify(1.0f64), FloatClass::Normal);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(5), 0b1_1111);
        assert_eq!(low_mask(64), u64::MAX);
    }
}

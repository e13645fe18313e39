//! Compact codecs for special float values
//!
//! Once an enclosing protocol has classified a value (for example with a
//! short tag), the bits implied by that class are dead weight. These codecs
//! write only the bits that still vary within the class:
//!
//! | codec         | wire bits                        | implied on read             |
//! |---------------|----------------------------------|-----------------------------|
//! | [`Zero`]      | sign                             | exponent 0, significand 0   |
//! | [`Infinity`]  | sign                             | exponent ones, signif. 0    |
//! | [`NaN`]       | sign, top bit, low `n - 1` bits  | exponent all ones           |
//! | [`Subnormal`] | sign, top `n` significand bits   | exponent 0                  |
//!
//! `Zero` and `Infinity` are bit-identical on the wire. A reader must know
//! from context which of the two was written; mixing them up silently turns
//! zeros into infinities and back.

use core::fmt;
use core::marker::PhantomData;

use crate::codec::{ValueReader, ValueWriter};
use crate::endpoint::{ByteSink, ByteSource};
use crate::error::{Error, Result};
use crate::float::{
    low_mask, read_significand, require_valid_significand_size, write_significand, IeeeFloat,
};
use crate::input::BitInput;
use crate::output::BitOutput;

macro_rules! marker_impls {
    ($($codec:ident),*) => {
        $(
            impl<F> Clone for $codec<F> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<F> Copy for $codec<F> {}

            impl<F> PartialEq for $codec<F> {
                fn eq(&self, other: &Self) -> bool {
                    self.significand_size() == other.significand_size()
                }
            }

            impl<F> Eq for $codec<F> {}

            impl<F> fmt::Debug for $codec<F> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($codec))
                        .field("format", &core::any::type_name::<F>())
                        .field("significand_size", &self.significand_size())
                        .finish()
                }
            }

            impl<F: IeeeFloat> ValueWriter<F> for $codec<F> {
                #[inline]
                fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &F) -> Result<()> {
                    $codec::write(self, output, *value)
                }
            }

            impl<F: IeeeFloat> ValueReader<F> for $codec<F> {
                #[inline]
                fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
                    $codec::read(self, input)
                }
            }
        )*
    };
}

/// Codec for `+0.0` / `-0.0`, written as the sign bit alone
///
/// Shares its wire form with [`Infinity`]; see the module docs.
pub struct Zero<F> {
    _format: PhantomData<fn() -> F>,
}

impl<F> Zero<F> {
    /// Create the codec
    #[inline]
    pub const fn new() -> Self {
        Self {
            _format: PhantomData,
        }
    }

    const fn significand_size(&self) -> u32 {
        0
    }
}

impl<F> Default for Zero<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: IeeeFloat> Zero<F> {
    /// Write the sign of a signed zero
    ///
    /// Fails with [`Error::NotZero`] if any exponent or significand bit is set.
    pub fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: F) -> Result<()> {
        let bits = value.to_raw();
        if bits & (F::EXPONENT_MASK | F::SIGNIFICAND_MASK) != 0 {
            return Err(Error::NotZero);
        }
        output.write_unsigned(1, bits >> F::SIGN_SHIFT)
    }

    /// Read a signed zero
    pub fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        Ok(F::from_raw(input.read_unsigned(1)? << F::SIGN_SHIFT))
    }
}

/// Codec for `+inf` / `-inf`, written as the sign bit alone
///
/// Shares its wire form with [`Zero`]; see the module docs.
pub struct Infinity<F> {
    _format: PhantomData<fn() -> F>,
}

impl<F> Infinity<F> {
    /// Create the codec
    #[inline]
    pub const fn new() -> Self {
        Self {
            _format: PhantomData,
        }
    }

    const fn significand_size(&self) -> u32 {
        0
    }
}

impl<F> Default for Infinity<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: IeeeFloat> Infinity<F> {
    /// Write the sign of an infinity
    ///
    /// Fails with [`Error::NotInfinity`] for anything but `+inf` / `-inf`.
    pub fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: F) -> Result<()> {
        let bits = value.to_raw();
        if bits & (F::EXPONENT_MASK | F::SIGNIFICAND_MASK) != F::EXPONENT_MASK {
            return Err(Error::NotInfinity);
        }
        output.write_unsigned(1, bits >> F::SIGN_SHIFT)
    }

    /// Read a signed infinity
    pub fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        Ok(F::from_raw(
            (input.read_unsigned(1)? << F::SIGN_SHIFT) | F::EXPONENT_MASK,
        ))
    }
}

/// Codec for NaN values
///
/// Keeps the sign, the significand's top bit (quiet/signalling on most
/// platforms) and the low `significand_size - 1` payload bits.
pub struct NaN<F> {
    significand_size: u32,
    _format: PhantomData<fn() -> F>,
}

impl<F> NaN<F> {
    /// Number of significand bits on the wire
    #[inline]
    pub const fn significand_size(&self) -> u32 {
        self.significand_size
    }
}

impl<F: IeeeFloat> NaN<F> {
    /// Create a codec keeping `significand_size` significand bits
    pub fn new(significand_size: u32) -> Result<Self> {
        Ok(Self {
            significand_size: require_valid_significand_size::<F>(significand_size)?,
            _format: PhantomData,
        })
    }

    /// Significand bits this codec keeps, in canonical position
    #[inline]
    fn mask(&self) -> u64 {
        (1u64 << (F::SIGNIFICAND_SIZE - 1)) | low_mask(self.significand_size - 1)
    }

    /// Write a NaN
    ///
    /// Fails with [`Error::ZeroSignificand`] if every kept significand bit is
    /// zero, since reading that back would produce an infinity.
    pub fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: F) -> Result<()> {
        let bits = value.to_raw();
        let significand = bits & self.mask();
        if significand == 0 {
            return Err(Error::ZeroSignificand);
        }
        output.write_unsigned(1, bits >> F::SIGN_SHIFT)?;
        write_significand::<F, S>(output, self.significand_size, significand)
    }

    /// Read a NaN
    pub fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        let mut bits = input.read_unsigned(1)? << F::SIGN_SHIFT;
        bits |= F::EXPONENT_MASK;
        bits |= read_significand::<F, S>(input, self.significand_size)?;
        Ok(F::from_raw(bits))
    }
}

/// Codec for subnormal values
///
/// Keeps the sign and the top `significand_size` significand bits.
pub struct Subnormal<F> {
    significand_size: u32,
    _format: PhantomData<fn() -> F>,
}

impl<F> Subnormal<F> {
    /// Number of significand bits on the wire
    #[inline]
    pub const fn significand_size(&self) -> u32 {
        self.significand_size
    }
}

impl<F: IeeeFloat> Subnormal<F> {
    /// Create a codec keeping `significand_size` significand bits
    pub fn new(significand_size: u32) -> Result<Self> {
        Ok(Self {
            significand_size: require_valid_significand_size::<F>(significand_size)?,
            _format: PhantomData,
        })
    }

    #[inline]
    fn shift(&self) -> u32 {
        F::SIGNIFICAND_SIZE - self.significand_size
    }

    /// Write a subnormal
    ///
    /// Fails with [`Error::ZeroSignificand`] if the kept significand bits are
    /// all zero, since reading that back would produce a signed zero.
    pub fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: F) -> Result<()> {
        let bits = value.to_raw();
        let significand = (bits >> self.shift()) & low_mask(self.significand_size);
        if significand == 0 {
            return Err(Error::ZeroSignificand);
        }
        output.write_unsigned(1, bits >> F::SIGN_SHIFT)?;
        output.write_unsigned(self.significand_size, significand)
    }

    /// Read a subnormal
    pub fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<F> {
        let mut bits = input.read_unsigned(1)? << F::SIGN_SHIFT;
        bits |= input.read_unsigned(self.significand_size)? << self.shift();
        Ok(F::from_raw(bits))
    }
}

marker_impls!(Zero, Infinity, NaN, Subnormal);

//! Codec capability traits
//!
//! Two families of traits connect values to the bit accumulators:
//!
//! - [`BitWritable`] / [`BitReadable`] are implemented by a type that knows its
//!   own wire form (primitives at full width, or user structs that write
//!   their fields in order).
//! - [`ValueWriter`] / [`ValueReader`] are implemented by small, reusable
//!   codec values that carry a configuration (a bit width, a float shape, a
//!   length prefix size) and apply it to values of another type.
//!
//! ```
//! use bitio::{BitInput, BitOutput, BitReadable, BitWritable, SliceSource};
//!
//! struct Point { x: i16, y: i16 }
//!
//! impl BitWritable for Point {
//!     fn write_to<S: bitio::ByteSink>(&self, output: &mut BitOutput<S>) -> bitio::Result<()> {
//!         output.write_i16(10, self.x)?;
//!         output.write_i16(10, self.y)
//!     }
//! }
//!
//! impl BitReadable for Point {
//!     fn read_from<S: bitio::ByteSource>(input: &mut BitInput<S>) -> bitio::Result<Self> {
//!         Ok(Point { x: input.read_i16(10)?, y: input.read_i16(10)? })
//!     }
//! }
//!
//! let mut output = BitOutput::new(Vec::new());
//! output.write_value(&Point { x: -300, y: 511 }).unwrap();
//! output.align(1).unwrap();
//! let bytes = output.into_inner();
//! assert_eq!(bytes.len(), 3);
//!
//! let point: Point = BitInput::new(SliceSource::new(&bytes)).read_value().unwrap();
//! assert_eq!((point.x, point.y), (-300, 511));
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::endpoint::{ByteSink, ByteSource};
use crate::error::Result;
use crate::float::{FloatCodec, FloatShape};
use crate::input::BitInput;
use crate::output::BitOutput;
use crate::width::{BitInt, Width};

/// A codec that writes values of type `T`
pub trait ValueWriter<T: ?Sized> {
    /// Write `value` to the output
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &T) -> Result<()>;
}

/// A codec that reads values of type `T`
pub trait ValueReader<T> {
    /// Read one value from the input
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<T>;
}

/// A type that writes itself to a bit output
pub trait BitWritable {
    /// Write `self` to the output
    fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()>;
}

/// A type that reads itself from a bit input
pub trait BitReadable: Sized {
    /// Read a value of this type from the input
    fn read_from<S: ByteSource>(input: &mut BitInput<S>) -> Result<Self>;
}

impl<T: BitWritable + ?Sized> BitWritable for &T {
    #[inline]
    fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()> {
        (**self).write_to(output)
    }
}

impl BitWritable for bool {
    #[inline]
    fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()> {
        output.write_bool(*self)
    }
}

impl BitReadable for bool {
    #[inline]
    fn read_from<S: ByteSource>(input: &mut BitInput<S>) -> Result<Self> {
        input.read_bool()
    }
}

macro_rules! full_width_int {
    ($($ty:ty),*) => {
        $(
            impl BitWritable for $ty {
                #[inline]
                fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()> {
                    output.write_int(<$ty>::BITS, *self)
                }
            }

            impl BitReadable for $ty {
                #[inline]
                fn read_from<S: ByteSource>(input: &mut BitInput<S>) -> Result<Self> {
                    input.read_int(<$ty>::BITS)
                }
            }
        )*
    };
}

full_width_int!(u8, u16, u32, u64, i8, i16, i32, i64);

macro_rules! canonical_float {
    ($($ty:ty),*) => {
        $(
            impl BitWritable for $ty {
                #[inline]
                fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()> {
                    FloatCodec::new(FloatShape::canonical()).write(output, *self)
                }
            }

            impl BitReadable for $ty {
                #[inline]
                fn read_from<S: ByteSource>(input: &mut BitInput<S>) -> Result<Self> {
                    FloatCodec::new(FloatShape::canonical()).read(input)
                }
            }
        )*
    };
}

canonical_float!(f32, f64);

/// Optional values carry a 1-bit presence flag (1 = present)
impl<T: BitWritable> BitWritable for Option<T> {
    fn write_to<S: ByteSink>(&self, output: &mut BitOutput<S>) -> Result<()> {
        match self {
            Some(value) => {
                output.write_bool(true)?;
                value.write_to(output)
            }
            None => output.write_bool(false),
        }
    }
}

impl<T: BitReadable> BitReadable for Option<T> {
    fn read_from<S: ByteSource>(input: &mut BitInput<S>) -> Result<Self> {
        if input.read_bool()? {
            Ok(Some(T::read_from(input)?))
        } else {
            Ok(None)
        }
    }
}

/// Integer codec bound to a validated width
pub struct IntCodec<T> {
    width: u32,
    _int: PhantomData<fn() -> T>,
}

impl<T: BitInt> IntCodec<T> {
    /// Create a codec writing `T` in `width` bits
    pub fn new(width: u32) -> Result<Self> {
        let width = Width::of::<T>(width)?;
        Ok(Self {
            width: width.bits(),
            _int: PhantomData,
        })
    }

    /// Number of bits per value
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }
}

impl<T> Clone for IntCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IntCodec<T> {}

impl<T> fmt::Debug for IntCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntCodec")
            .field("type", &core::any::type_name::<T>())
            .field("width", &self.width)
            .finish()
    }
}

impl<T: BitInt> ValueWriter<T> for IntCodec<T> {
    #[inline]
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &T) -> Result<()> {
        output.write_int(self.width, *value)
    }
}

impl<T: BitInt> ValueReader<T> for IntCodec<T> {
    #[inline]
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<T> {
        input.read_int(self.width)
    }
}

/// Wraps a codec with a 1-bit presence flag (1 = present)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nullable<C> {
    inner: C,
}

impl<C> Nullable<C> {
    /// Wrap `inner`
    #[inline]
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped codec
    #[inline]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, C: ValueWriter<T>> ValueWriter<Option<T>> for Nullable<C> {
    fn write<S: ByteSink>(&self, output: &mut BitOutput<S>, value: &Option<T>) -> Result<()> {
        match value {
            Some(value) => {
                output.write_bool(true)?;
                self.inner.write(output, value)
            }
            None => output.write_bool(false),
        }
    }
}

impl<T, C: ValueReader<T>> ValueReader<Option<T>> for Nullable<C> {
    fn read<S: ByteSource>(&self, input: &mut BitInput<S>) -> Result<Option<T>> {
        if input.read_bool()? {
            Ok(Some(self.inner.read(input)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::SliceSource;
    use crate::error::Error;
    use alloc::vec::Vec;

    #[test]
    fn test_int_codec() {
        let codec = IntCodec::<i32>::new(7).unwrap();
        let mut output = BitOutput::new(Vec::new());
        codec.write(&mut output, &-64).unwrap();
        codec.write(&mut output, &63).unwrap();
        assert_eq!(output.bit_count(), 14);
        output.align(1).unwrap();
        let bytes = output.into_inner();

        let mut input = BitInput::new(SliceSource::new(&bytes));
        assert_eq!(codec.read(&mut input).unwrap(), -64);
        assert_eq!(codec.read(&mut input).unwrap(), 63);

        assert!(IntCodec::<u16>::new(17).is_err());
        assert!(IntCodec::<u8>::new(0).is_err());
    }

    #[test]
    fn test_nullable_flag() {
        let codec = Nullable::new(IntCodec::<u8>::new(3).unwrap());
        let mut output = BitOutput::new(Vec::new());
        codec.write(&mut output, &Some(5)).unwrap();
        codec.write(&mut output, &None).unwrap();
        output.align(1).unwrap();
        // 1 101 | 0 | 000
        let bytes = output.into_inner();
        assert_eq!(bytes, [0b1101_0000]);

        let mut input = BitInput::new(SliceSource::new(&bytes));
        assert_eq!(codec.read(&mut input).unwrap(), Some(5));
        assert_eq!(codec.read(&mut input).unwrap(), None);
    }

    #[test]
    fn test_primitive_values() {
        let mut output = BitOutput::new(Vec::new());
        output.write_value(&true).unwrap();
        output.write_value(&-2i16).unwrap();
        output.write_value(&Some(1.5f32)).unwrap();
        output.write_value(&Option::<u64>::None).unwrap();
        assert_eq!(output.bit_count(), 1 + 16 + 1 + 32 + 1);
        output.align(1).unwrap();
        let bytes = output.into_inner();

        let mut input = BitInput::new(SliceSource::new(&bytes));
        assert!(input.read_value::<bool>().unwrap());
        assert_eq!(input.read_value::<i16>().unwrap(), -2);
        assert_eq!(input.read_value::<Option<f32>>().unwrap(), Some(1.5));
        assert_eq!(input.read_value::<Option<u64>>().unwrap(), None);
        assert_eq!(input.read_value::<u8>(), Err(Error::UnexpectedEof));
    }
}

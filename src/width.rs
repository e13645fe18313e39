//! Bit width validation for integer fields
//!
//! Every integer field is written into, or read out of, one of four
//! containers: 8, 16, 32 or 64 bits. A field's width must fit its
//! container:
//!
//! | container | unsigned | signed  |
//! |-----------|----------|---------|
//! | 8-bit     | 1..=8    | 1..=8   |
//! | 16-bit    | 1..=16   | 1..=16  |
//! | 32-bit    | 1..=32   | 1..=32  |
//! | 64-bit    | 1..=64   | 1..=64  |
//!
//! A 1-bit signed field carries the sign bit alone and decodes to `0` or `-1`.

use crate::error::{Error, Result};

/// Integer container categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// 8-bit container (`u8` / `i8`)
    Bits8,
    /// 16-bit container (`u16` / `i16`)
    Bits16,
    /// 32-bit container (`u32` / `i32`)
    Bits32,
    /// 64-bit container (`u64` / `i64`)
    Bits64,
}

impl Container {
    /// Size of the container in bits
    #[inline]
    pub const fn size(&self) -> u32 {
        match self {
            Container::Bits8 => 8,
            Container::Bits16 => 16,
            Container::Bits32 => 32,
            Container::Bits64 => 64,
        }
    }

    /// Smallest legal width
    #[inline]
    pub const fn min_width(&self, _unsigned: bool) -> u32 {
        1
    }

    /// Largest legal width
    #[inline]
    pub const fn max_width(&self, _unsigned: bool) -> u32 {
        self.size()
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.size())
    }
}

/// Check whether `width` is legal for the given container and signedness
#[inline]
pub const fn is_valid_width(container: Container, unsigned: bool, width: u32) -> bool {
    width >= container.min_width(unsigned) && width <= container.max_width(unsigned)
}

/// Validate `width`, returning it unchanged on success
#[inline]
pub fn require_valid_width(container: Container, unsigned: bool, width: u32) -> Result<u32> {
    if !is_valid_width(container, unsigned, width) {
        return Err(Error::InvalidWidth {
            container,
            unsigned,
            width,
        });
    }
    Ok(width)
}

/// Validated width descriptor
///
/// Carries no state beyond the checked (container, signedness, bits) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Width {
    container: Container,
    unsigned: bool,
    bits: u32,
}

impl Width {
    /// Create a descriptor, validating `bits` against the container
    #[inline]
    pub fn new(container: Container, unsigned: bool, bits: u32) -> Result<Self> {
        let bits = require_valid_width(container, unsigned, bits)?;
        Ok(Self {
            container,
            unsigned,
            bits,
        })
    }

    /// Create a descriptor for integer type `T`
    #[inline]
    pub fn of<T: BitInt>(bits: u32) -> Result<Self> {
        Self::new(T::CONTAINER, T::UNSIGNED, bits)
    }

    /// Integer container
    #[inline]
    pub const fn container(&self) -> Container {
        self.container
    }

    /// Whether the field is unsigned
    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Number of bits on the wire
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Primitive integer types that can be written as bit fields
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32` and `i64`.
pub trait BitInt: Copy + sealed::Sealed {
    /// Container the type belongs to
    const CONTAINER: Container;
    /// Whether the type is unsigned
    const UNSIGNED: bool;

    /// Widen to 64 bits (zero-extended if unsigned, sign-extended if signed)
    fn to_u64(self) -> u64;

    /// Truncate 64 bits to this type
    fn from_u64(bits: u64) -> Self;
}

macro_rules! impl_bit_int {
    ($($ty:ty => $container:ident, $unsigned:expr, $wide:ty;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl BitInt for $ty {
                const CONTAINER: Container = Container::$container;
                const UNSIGNED: bool = $unsigned;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as $wide as u64
                }

                #[inline]
                fn from_u64(bits: u64) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

impl_bit_int! {
    u8 => Bits8, true, u64;
    u16 => Bits16, true, u64;
    u32 => Bits32, true, u64;
    u64 => Bits64, true, u64;
    i8 => Bits8, false, i64;
    i16 => Bits16, false, i64;
    i32 => Bits32, false, i64;
    i64 => Bits64, false, i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINERS: [Container; 4] = [
        Container::Bits8,
        Container::Bits16,
        Container::Bits32,
        Container::Bits64,
    ];

    #[test]
    fn test_boundaries() {
        for container in CONTAINERS {
            for unsigned in [true, false] {
                let max = container.size();
                assert!(!is_valid_width(container, unsigned, 0));
                assert!(is_valid_width(container, unsigned, 1));
                assert!(is_valid_width(container, unsigned, max));
                assert!(!is_valid_width(container, unsigned, max + 1));
            }
        }
    }

    #[test]
    fn test_require_valid_width_error() {
        assert_eq!(require_valid_width(Container::Bits32, true, 7), Ok(7));
        assert_eq!(
            require_valid_width(Container::Bits8, false, 9),
            Err(Error::InvalidWidth {
                container: Container::Bits8,
                unsigned: false,
                width: 9,
            })
        );
    }

    #[test]
    fn test_width_descriptor() {
        let width = Width::of::<i16>(12).unwrap();
        assert_eq!(width.container(), Container::Bits16);
        assert!(!width.is_unsigned());
        assert_eq!(width.bits(), 12);

        assert!(Width::of::<u8>(0).is_err());
        assert!(Width::of::<u64>(65).is_err());
    }

    #[test]
    fn test_bit_int_extension() {
        assert_eq!((-1i8).to_u64(), u64::MAX);
        assert_eq!(0xFFu8.to_u64(), 0xFF);
        assert_eq!(i16::from_u64(0xFFFF_FFFF_FFFF_8000), i16::MIN);
        assert_eq!(u32::from_u64(0x1_0000_0001), 1);
    }
}

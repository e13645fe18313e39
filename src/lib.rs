//! bitio: bit-level reading and writing over byte streams
//!
//! This crate packs integers and floats of arbitrary bit width into a stream
//! of bytes and reads them back, most-significant bit first, with no gaps
//! between fields.
//!
//! # Bit Layout
//!
//! ```text
//!  write_u8(5, 19)   write_u8(3, 5)
//! +-----------------+--------------+
//! | 1  0  0  1  1   | 1  0  1      |   -> one byte 0b1001_1101
//! +-----------------+--------------+
//!  msb                          lsb
//!
//! signed field of width w:   | sign (1 = negative) | low w-1 bits |
//! float with shape (e, s):   | sign | exponent (e) | significand (s) |
//! ```
//!
//! # Features
//!
//! - Unsigned and signed integers from 1 bit up to the container width
//! - IEEE-754 `f32`/`f64` with configurable exponent and significand sizes
//! - Compact codecs for zero, infinity, NaN and subnormal values
//! - Byte alignment to any multiple of bytes
//! - Length-prefixed byte arrays, strings and sequences
//! - Shared codec instances with background reclamation (std)
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use bitio::*;
//!
//! let mut output = BitOutput::new(Vec::new());
//! output.write_u8(5, 19)?;
//! output.write_u8(3, 5)?;
//! output.write_i16(10, -300)?;
//! output.write_f64(11, 20, 1.5)?;
//! output.align(1)?;
//! let bytes = output.into_inner();
//! assert_eq!(bytes[0], 0b1001_1101);
//!
//! let mut input = BitInput::new(SliceSource::new(&bytes));
//! assert_eq!(input.read_u8(5)?, 19);
//! assert_eq!(input.read_u8(3)?, 5);
//! assert_eq!(input.read_i16(10)?, -300);
//! assert_eq!(input.read_f64(11, 20)?, 1.5);
//! # Ok::<(), bitio::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod adapter;
pub mod codec;
pub mod compact;
pub mod endpoint;
pub mod error;
pub mod float;
pub mod input;
pub mod output;
pub mod width;

#[cfg(feature = "std")]
pub mod cache;
#[cfg(feature = "std")]
pub mod registry;

#[cfg(all(feature = "std", test))]
pub mod bench;

// Re-export main types
pub use adapter::{ByteArrayAdapter, ElementEncoding, SequenceAdapter, StringAdapter};
pub use codec::{BitReadable, BitWritable, IntCodec, Nullable, ValueReader, ValueWriter};
pub use compact::{Infinity, NaN, Subnormal, Zero};
pub use endpoint::{ByteSink, ByteSource, SliceSink, SliceSource};
pub use error::{Error, Result};
pub use float::{classify, FloatClass, FloatCodec, FloatShape, IeeeFloat};
pub use input::BitInput;
pub use output::BitOutput;
pub use width::{BitInt, Container, Width};

#[cfg(feature = "std")]
pub use cache::{Cached, InstanceCache};
#[cfg(feature = "std")]
pub use endpoint::{ReadSource, WriteSink};
#[cfg(feature = "std")]
pub use registry::CodecRegistry;

/// Number of bits in one byte
pub const OCTET_SIZE: u32 = 8;

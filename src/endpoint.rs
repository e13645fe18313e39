//! Byte endpoints
//!
//! The bit accumulators move whole bytes through these two traits and never
//! buffer more than the single octet in flight. Implementations are provided
//! for borrowed slices, `Vec<u8>` and, with the `std` feature, any
//! [`std::io::Write`] / [`std::io::Read`].

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Something that accepts one unsigned byte at a time
pub trait ByteSink {
    /// Accept a single byte
    fn write_byte(&mut self, byte: u8) -> Result<()>;
}

/// Something that yields one unsigned byte at a time
pub trait ByteSource {
    /// Produce the next byte, or [`Error::UnexpectedEof`] when exhausted
    fn read_byte(&mut self) -> Result<u8>;
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// Sink writing into a user-provided buffer
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Create new sink over the given buffer
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining buffer capacity
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Slice of the bytes written so far
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl ByteSink for SliceSink<'_> {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.pos >= self.buf.len() {
            return Err(Error::ShortBuffer);
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }
}

/// Source reading from a borrowed slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create new source over the given bytes
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining unread bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if all bytes have been consumed
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = *self.buf.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }
}

#[cfg(feature = "std")]
pub use self::io::{ReadSource, WriteSink};

#[cfg(feature = "std")]
mod io {
    use std::io::{ErrorKind, Read, Write};

    use super::{ByteSink, ByteSource};
    use crate::error::{Error, Result};

    /// Sink over any [`Write`] (streams, files, sockets)
    ///
    /// Each byte is handed to the writer as it completes; wrap the writer in a
    /// [`std::io::BufWriter`] when per-byte writes are expensive.
    #[derive(Debug)]
    pub struct WriteSink<W> {
        inner: W,
    }

    impl<W: Write> WriteSink<W> {
        /// Wrap a writer
        #[inline]
        pub fn new(inner: W) -> Self {
            Self { inner }
        }

        /// Borrow the wrapped writer
        #[inline]
        pub fn get_ref(&self) -> &W {
            &self.inner
        }

        /// Flush the wrapped writer
        #[inline]
        pub fn flush(&mut self) -> Result<()> {
            self.inner.flush().map_err(Error::from)
        }

        /// Unwrap the writer
        #[inline]
        pub fn into_inner(self) -> W {
            self.inner
        }
    }

    impl<W: Write> ByteSink for WriteSink<W> {
        fn write_byte(&mut self, byte: u8) -> Result<()> {
            loop {
                match self.inner.write(&[byte]) {
                    Ok(1) => return Ok(()),
                    Ok(_) => return Err(Error::Io(ErrorKind::WriteZero)),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    /// Source over any [`Read`] (streams, files, sockets)
    #[derive(Debug)]
    pub struct ReadSource<R> {
        inner: R,
    }

    impl<R: Read> ReadSource<R> {
        /// Wrap a reader
        #[inline]
        pub fn new(inner: R) -> Self {
            Self { inner }
        }

        /// Borrow the wrapped reader
        #[inline]
        pub fn get_ref(&self) -> &R {
            &self.inner
        }

        /// Unwrap the reader
        #[inline]
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read> ByteSource for ReadSource<R> {
        fn read_byte(&mut self) -> Result<u8> {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Err(Error::UnexpectedEof),
                    Ok(_) => return Ok(byte[0]),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
}

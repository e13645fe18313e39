//! Process-wide registry of shared float codecs
//!
//! Codecs are cheap to build, but protocols that describe many fields by
//! shape tend to ask for the same few over and over. The registry keeps one
//! [`InstanceCache`] per format and codec kind so equal configurations share
//! one instance while anybody holds it.

use std::sync::{Arc, OnceLock};

use crate::cache::{Cached, InstanceCache};
use crate::compact::{NaN, Subnormal};
use crate::error::Result;
use crate::float::{FloatCodec, FloatShape, IeeeFloat};

/// Shared float codec handed out by the registry
pub type SharedFloatCodec<F> = Arc<Cached<FloatShape<F>, FloatCodec<F>>>;

/// Shared NaN codec handed out by the registry
pub type SharedNaN<F> = Arc<Cached<u32, NaN<F>>>;

/// Shared subnormal codec handed out by the registry
pub type SharedSubnormal<F> = Arc<Cached<u32, Subnormal<F>>>;

mod sealed {
    use super::*;

    pub struct FormatCaches<F: IeeeFloat> {
        pub(super) floats: InstanceCache<FloatShape<F>, FloatCodec<F>>,
        pub(super) nans: InstanceCache<u32, NaN<F>>,
        pub(super) subnormals: InstanceCache<u32, Subnormal<F>>,
    }

    impl<F: IeeeFloat> FormatCaches<F> {
        pub(super) fn new() -> Self {
            Self {
                floats: InstanceCache::new(),
                nans: InstanceCache::new(),
                subnormals: InstanceCache::new(),
            }
        }
    }

    pub trait Sealed: IeeeFloat {
        fn caches(registry: &CodecRegistry) -> &FormatCaches<Self>;
    }

    impl Sealed for f32 {
        fn caches(registry: &CodecRegistry) -> &FormatCaches<Self> {
            &registry.single
        }
    }

    impl Sealed for f64 {
        fn caches(registry: &CodecRegistry) -> &FormatCaches<Self> {
            &registry.double
        }
    }
}

use sealed::{FormatCaches, Sealed};

/// Formats the registry keeps caches for (`f32` and `f64`)
pub trait RegisteredFormat: Sealed {}

impl RegisteredFormat for f32 {}
impl RegisteredFormat for f64 {}

/// Registry of shared codecs for `f32` and `f64`
pub struct CodecRegistry {
    single: FormatCaches<f32>,
    double: FormatCaches<f64>,
}

impl CodecRegistry {
    /// Create an empty registry
    ///
    /// Most callers want [`global`](Self::global) instead.
    pub fn new() -> Self {
        Self {
            single: FormatCaches::new(),
            double: FormatCaches::new(),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static CodecRegistry {
        static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();
        GLOBAL.get_or_init(CodecRegistry::new)
    }

    /// Shared codec for the given shape
    ///
    /// Sizes are validated before the cache is consulted.
    pub fn float<F: RegisteredFormat>(
        &self,
        exponent_size: u32,
        significand_size: u32,
    ) -> Result<SharedFloatCodec<F>> {
        let shape = FloatShape::<F>::new(exponent_size, significand_size)?;
        Ok(<F as Sealed>::caches(self).floats.get(shape, |shape| FloatCodec::new(*shape)))
    }

    /// Shared NaN codec keeping `significand_size` significand bits
    pub fn nan<F: RegisteredFormat>(&self, significand_size: u32) -> Result<SharedNaN<F>> {
        <F as Sealed>::caches(self)
            .nans
            .try_get(significand_size, |&size| NaN::new(size))
    }

    /// Shared subnormal codec keeping `significand_size` significand bits
    pub fn subnormal<F: RegisteredFormat>(
        &self,
        significand_size: u32,
    ) -> Result<SharedSubnormal<F>> {
        <F as Sealed>::caches(self)
            .subnormals
            .try_get(significand_size, |&size| Subnormal::new(size))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("f32_floats", &self.single.floats.len())
            .field("f64_floats", &self.double.floats.len())
            .finish_non_exhaustive()
    }
}

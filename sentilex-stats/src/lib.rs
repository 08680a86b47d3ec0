#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod matcher;
pub mod scoring;
pub mod statistics;

/// Common type definitions
pub type Polarity = f64;

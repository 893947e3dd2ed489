//! Keeps defmt optional: re-exports its macros when the feature is on,
//! otherwise provides no-op stand-ins

#![macro_use]
#![allow(unused_macros, unused_imports)]

#[cfg(feature = "defmt")]
pub use defmt::{bitflags, debug, info, trace};

#[cfg(not(feature = "defmt"))]
pub use bitflags::bitflags;

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($item:expr),*) => {};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($item:expr),*) => {};
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($item:expr),*) => {};
}

/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Log macros: defmt when the `defmt` feature is on, no-ops otherwise.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, trace};

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
pub(crate) use {debug, trace};

//! Fixed-point signal-processing building blocks for the AFSK1200 modem.
//!
//! Kept free of any MCU or allocator dependency so it builds and tests on
//! the host, the same role `stabilizer`'s `dsp`/`idsp` crate plays for its
//! firmware: the numerically interesting code lives here, the hardware
//! glue lives in the firmware crate that depends on it.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), deny(warnings))]

#[cfg(test)]
extern crate std;

pub mod bitsync;
pub mod dds;
pub mod iir;
pub mod sin_table;

pub use bitsync::BitSync;
pub use dds::{Dds, Tone};
pub use iir::{Filter, IirState};
pub use sin_table::{sin_sample, SIN_LEN};

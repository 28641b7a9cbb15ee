//! Board-agnostic application switching and persistence core
//!
//! This crate contains everything the Kaleido module needs to host several
//! independent applications on one set of hardware, without depending on a
//! specific board:
//!
//! - Application descriptors and the compiled-in registry
//! - The app switcher (switch, save, restore, reset-to-default)
//! - The lock-free active-app cell read by the sample-clock interrupt
//! - The slot storage boundary trait and on-slot framing
//! - Bounded stream writer/reader used by app save/restore
//!
//! The main loop and the interrupt both observe the active application
//! through [`switcher::ActiveApp`]; only the main-loop switcher mutates it.
//! Slot I/O never happens on the interrupt path.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod app;
pub mod storage;
pub mod stream;
pub mod switcher;

pub use app::{two_cc, AppDescriptor, AppEvent, AppHandle, Registry, RegistryError};
pub use storage::{RamSlotStorage, SlotError, SlotStorage};
pub use stream::{StreamError, StreamReader, StreamWriter};
pub use switcher::{ActiveApp, AppSwitcher, SaveError, SwitchError};

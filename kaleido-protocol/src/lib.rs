//! Front-panel input events for the Kaleido module
//!
//! The panel has two push buttons and two detented encoders (each with a
//! built-in switch). The input driver debounces the hardware and emits the
//! value types defined here; the active application consumes them through
//! its `handle_button_event`/`handle_encoder_event` capabilities.
//!
//! Only the event values live here. How events travel from the driver to
//! the dispatch loop (queue depth, wire encoding on a remote panel) is the
//! driver's concern.

#![no_std]
#![deny(unsafe_code)]

pub mod events;

pub use events::{Button, ButtonAction, ButtonEvent, Encoder, EncoderEvent};

//! Persistent slot storage boundary
//!
//! The storage device presents a fixed number of fixed-capacity slots plus
//! one small meta region. The switcher is the only caller: it frames each
//! app's serialized state with a validated header ([`header`]), keeps the
//! last-active-app record in the meta region ([`meta`]), and never touches
//! storage from interrupt context.
//!
//! Implementations own the byte-level medium (flash sectors, FRAM, a file
//! on the host). Wear leveling and write latency are theirs to handle; the
//! switcher only assumes a slot write that returns `Ok` is durable.

pub mod header;
pub mod memory;
pub mod meta;

pub use header::{crc32, SlotHeader, SLOT_HEADER_LEN, SLOT_MAGIC};
pub use memory::{RamSlotStorage, META_REGION_LEN};
pub use meta::{MetaError, MetaRecord, META_VERSION};

/// Errors from slot storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotError {
    /// Slot index is outside the device's slot table
    BadSlot,
    /// Offset + length runs past the slot's capacity
    OutOfBounds,
    /// No data stored in the requested region
    NotFound,
    /// Device-level failure
    Device,
}

/// Slot storage trait
///
/// Sequential positioned access to numbered slots plus a meta region.
/// All methods are main-loop only.
pub trait SlotStorage {
    /// Number of app slots the device provides
    fn num_slots(&self) -> usize;

    /// Fixed byte capacity of one slot
    fn slot_capacity(&self, slot: usize) -> usize;

    /// Write `bytes` at `offset` within `slot`
    fn write(&mut self, slot: usize, offset: usize, bytes: &[u8]) -> Result<(), SlotError>;

    /// Read up to `buf.len()` bytes from `offset` within `slot`
    ///
    /// Returns the number of bytes read; short only when the read runs
    /// into the end of the slot.
    fn read(&mut self, slot: usize, offset: usize, buf: &mut [u8]) -> Result<usize, SlotError>;

    /// Read the meta region
    ///
    /// Returns the stored record length, or [`SlotError::NotFound`] if
    /// nothing was ever written.
    fn read_meta(&mut self, buf: &mut [u8]) -> Result<usize, SlotError>;

    /// Replace the meta region contents
    fn write_meta(&mut self, bytes: &[u8]) -> Result<(), SlotError>;
}

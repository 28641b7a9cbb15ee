//! Persisted switcher meta record
//!
//! One small record in the storage device's meta region remembers which
//! app was active and which slot it used, so `init(reset_settings=false)`
//! can resume the previous session. Serialized with postcard; a version
//! byte guards against stale layouts after a firmware upgrade.

use serde::{Deserialize, Serialize};

use crate::storage::{SlotError, SlotStorage};

/// Current meta record layout version
pub const META_VERSION: u8 = 1;

/// Upper bound on the postcard-encoded record size
pub const META_MAX_LEN: usize = 16;

/// Last-active-app record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MetaRecord {
    /// Record layout version, must equal [`META_VERSION`]
    pub version: u8,
    /// Id of the app that was active
    pub last_app_id: u16,
    /// Slot that app saves to
    pub last_slot: u8,
}

/// Why a stored meta record was unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetaError {
    /// Storage-level failure or nothing stored yet
    Slot(SlotError),
    /// Record would not decode
    Deserialize,
    /// Record layout version does not match this firmware
    VersionMismatch,
}

impl From<SlotError> for MetaError {
    fn from(e: SlotError) -> Self {
        MetaError::Slot(e)
    }
}

impl MetaRecord {
    /// Build a record for the given app and slot
    pub fn new(last_app_id: u16, last_slot: u8) -> Self {
        Self {
            version: META_VERSION,
            last_app_id,
            last_slot,
        }
    }

    /// Load and validate the record from the meta region
    pub fn load<S: SlotStorage>(storage: &mut S) -> Result<Self, MetaError> {
        let mut buf = [0u8; META_MAX_LEN];
        let len = storage.read_meta(&mut buf)?;

        let record: MetaRecord =
            postcard::from_bytes(&buf[..len]).map_err(|_| MetaError::Deserialize)?;

        if record.version != META_VERSION {
            return Err(MetaError::VersionMismatch);
        }
        Ok(record)
    }

    /// Write the record to the meta region
    pub fn store<S: SlotStorage>(&self, storage: &mut S) -> Result<(), MetaError> {
        let mut buf = [0u8; META_MAX_LEN];
        let encoded = postcard::to_slice(self, &mut buf).map_err(|_| MetaError::Deserialize)?;
        storage.write_meta(encoded)?;
        Ok(())
    }
}

//! The app switcher
//!
//! Owns the only write path into the [`ActiveApp`] cell and the only use
//! of the [`SlotStorage`] boundary. Each app saves to the slot matching
//! its registry index; the stored header's id and schema version are
//! checked on every restore, so a reordered or re-versioned registry
//! rejects stale slots instead of feeding them to the wrong app.
//!
//! A switch always completes: restore problems degrade to the incoming
//! app's factory defaults, persistence problems skip the save, and the
//! module is never left without an active app. Nothing here is callable
//! from interrupt context.

pub mod active;

pub use active::ActiveApp;

use heapless::Vec;

use crate::app::{AppEvent, AppHandle, Registry, RegistryError};
use crate::storage::{MetaRecord, SlotError, SlotHeader, SlotStorage, SLOT_HEADER_LEN};
use crate::stream::{StreamReader, StreamWriter};

/// App activated when there is no usable session to resume
pub const DEFAULT_APP_INDEX: usize = 0;

/// Upper bound on a single app's persisted state
///
/// Sizes the save/restore staging buffer; a slot additionally needs
/// [`SLOT_HEADER_LEN`] bytes of capacity for the framing header.
pub const MAX_APP_STATE_LEN: usize = 512;

/// Errors from explicit save requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveError {
    /// No app is active yet
    NoActiveApp,
    /// Slot index outside the storage device's table
    BadSlot,
    /// `storage_size()` does not fit the slot (or the staging buffer);
    /// nothing was written
    Capacity,
    /// The app wrote fewer bytes than `storage_size()` reported; the slot
    /// was not committed
    ShortSave,
    /// Storage device failure
    Storage(SlotError),
}

impl From<SlotError> for SaveError {
    fn from(e: SlotError) -> Self {
        SaveError::Storage(e)
    }
}

/// Errors from switch/load requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchError {
    /// App index outside the registry
    UnknownApp,
    /// The slot holds no valid state for its owning app; nothing changed
    NoStoredState,
}

/// The application switcher
///
/// One per module. `S` is the storage boundary; the cell is shared with
/// the interrupt handler, which is why it lives outside this struct.
pub struct AppSwitcher<'a, S: SlotStorage> {
    active: &'a ActiveApp,
    storage: S,
    last_slot: Option<usize>,
    save_on_switch: bool,
}

impl<'a, S: SlotStorage> AppSwitcher<'a, S> {
    /// Create a switcher over a validated registry
    ///
    /// Fails fast on registry invariant violations (duplicate ids, empty
    /// table); no storage access happens here.
    pub fn new(active: &'a ActiveApp, storage: S) -> Result<Self, RegistryError> {
        active.registry().validate()?;
        Ok(Self {
            active,
            storage,
            last_slot: None,
            save_on_switch: true,
        })
    }

    /// Bring up the first active app of the session
    ///
    /// With `reset_settings` false, resume the session recorded in the
    /// meta region; any failure along that path (missing or stale meta,
    /// unknown id, no stored state) falls back to factory defaults for
    /// the default app. With `reset_settings` true, the fallback path
    /// runs unconditionally. Exactly one of the two paths executes.
    pub fn init(&mut self, reset_settings: bool) -> Result<(), SwitchError> {
        if !reset_settings {
            if let Some(slot) = self.stored_session_slot() {
                if self.load_app_from_slot(slot, false).is_ok() {
                    return Ok(());
                }
            }
        }
        self.load_app_from_defaults(DEFAULT_APP_INDEX)
    }

    /// Switch to the app at `app_index`
    ///
    /// The outgoing app is saved to its slot first (unless disabled via
    /// [`set_save_on_switch`]); a failed save skips persistence and the
    /// switch proceeds, leaving the slot at its previous valid contents.
    /// The incoming app restores from its slot when the stored state
    /// validates, otherwise it comes up from factory defaults.
    ///
    /// [`set_save_on_switch`]: AppSwitcher::set_save_on_switch
    pub fn switch_to_app(&mut self, app_index: usize) -> Result<(), SwitchError> {
        let app = self
            .active
            .registry()
            .app_desc(app_index)
            .ok_or(SwitchError::UnknownApp)?;

        if self.save_on_switch {
            self.save_outgoing();
        }
        self.bring_up(app_index, app, true);
        Ok(())
    }

    /// Resume the app owning `slot_index` from its stored state
    ///
    /// Fails without switching when the slot holds no valid header for
    /// its owning app; payload-level problems found later degrade to the
    /// owning app's defaults, as in [`switch_to_app`]. With `save_state`,
    /// the outgoing app is saved to its slot first.
    ///
    /// [`switch_to_app`]: AppSwitcher::switch_to_app
    pub fn load_app_from_slot(
        &mut self,
        slot_index: usize,
        save_state: bool,
    ) -> Result<(), SwitchError> {
        let app = self
            .active
            .registry()
            .app_desc(slot_index)
            .ok_or(SwitchError::UnknownApp)?;
        let header = self
            .read_header(slot_index)
            .ok_or(SwitchError::NoStoredState)?;
        if header.app_id != app.id {
            return Err(SwitchError::NoStoredState);
        }

        if save_state {
            self.save_outgoing();
        }
        self.bring_up(slot_index, app, true);
        Ok(())
    }

    /// Switch to the app at `app_index`, factory-fresh
    ///
    /// As [`switch_to_app`], but stored slot contents are ignored and the
    /// incoming app is unconditionally reset and initialized. This is the
    /// explicit "factory reset this app" path and the `init` fallback.
    ///
    /// [`switch_to_app`]: AppSwitcher::switch_to_app
    pub fn load_app_from_defaults(&mut self, app_index: usize) -> Result<(), SwitchError> {
        let app = self
            .active
            .registry()
            .app_desc(app_index)
            .ok_or(SwitchError::UnknownApp)?;

        if self.save_on_switch {
            self.save_outgoing();
        }
        self.bring_up(app_index, app, false);
        Ok(())
    }

    /// Save the active app's state to `slot_index`
    ///
    /// The payload is staged in RAM and only committed when the app wrote
    /// exactly `storage_size()` bytes; the framing header goes in last,
    /// so an interrupted save leaves a slot that fails validation rather
    /// than one that restores half-written state.
    pub fn save_current_app_to_slot(&mut self, slot_index: usize) -> Result<(), SaveError> {
        let app = self.active.get().ok_or(SaveError::NoActiveApp)?;
        if slot_index >= self.storage.num_slots() {
            return Err(SaveError::BadSlot);
        }

        let size = (app.storage_size)();
        let capacity = self.storage.slot_capacity(slot_index);
        if size > MAX_APP_STATE_LEN || SLOT_HEADER_LEN + size > capacity {
            return Err(SaveError::Capacity);
        }

        let mut stage: Vec<u8, MAX_APP_STATE_LEN> = Vec::new();
        // Cannot fail: size was bounds-checked above
        let _ = stage.resize(size, 0);

        let written = {
            let mut writer = StreamWriter::new(&mut stage);
            (app.save)(&mut writer)
        };
        if written != size {
            return Err(SaveError::ShortSave);
        }

        self.storage.write(slot_index, SLOT_HEADER_LEN, &stage)?;

        let header = SlotHeader::for_payload(app.id, app.storage_version, &stage);
        let mut header_buf = [0u8; SLOT_HEADER_LEN];
        header.encode(&mut header_buf);
        self.storage.write(slot_index, 0, &header_buf)?;

        self.last_slot = Some(slot_index);
        Ok(())
    }

    /// The active app, if `init` has completed
    pub fn current_app(&self) -> Option<AppHandle> {
        self.active.get()
    }

    /// Id of the active app
    pub fn current_app_id(&self) -> Option<u16> {
        self.active.get().map(|app| app.id)
    }

    /// Slot most recently loaded from or saved to
    pub fn last_slot_index(&self) -> Option<usize> {
        self.last_slot
    }

    /// The compiled-in registry
    pub fn registry(&self) -> Registry {
        self.active.registry()
    }

    /// Look up an app by id
    pub fn find(&self, id: u16) -> Option<AppHandle> {
        self.active.registry().find(id)
    }

    /// Number of compiled-in applications
    pub fn num_available_apps(&self) -> usize {
        self.active.registry().num_available_apps()
    }

    /// Bounds-checked positional access, for UI enumeration
    pub fn app_desc(&self, index: usize) -> Option<AppHandle> {
        self.active.registry().app_desc(index)
    }

    /// Interrupt dispatch, delegated to the shared cell
    ///
    /// Interrupt handlers should call [`ActiveApp::isr`] on the shared
    /// `static` directly; this delegate exists for main-loop callers that
    /// only hold the switcher.
    pub fn isr(&self) {
        self.active.isr();
    }

    /// Whether switches persist the outgoing app first (defaults to on)
    pub fn set_save_on_switch(&mut self, enabled: bool) {
        self.save_on_switch = enabled;
    }

    /// Hand the storage device back to the caller
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Best-effort save of the outgoing app to its own slot
    ///
    /// Failure is absorbed: the slot keeps its previous valid contents
    /// and the switch goes ahead.
    fn save_outgoing(&mut self) {
        if let Some(slot) = self.active.index() {
            let _ = self.save_current_app_to_slot(slot);
        }
    }

    /// Steps shared by every activation path
    ///
    /// Clears the cell before `Suspend` and publishes only after the
    /// incoming app is fully restored or reset; see [`ActiveApp`] for the
    /// ordering contract with the interrupt.
    fn bring_up(&mut self, index: usize, app: AppHandle, try_restore: bool) {
        if let Some(outgoing) = self.active.get() {
            self.active.clear();
            (outgoing.handle_app_event)(AppEvent::Suspend);
        }

        let restored = try_restore && self.restore_into(index, app);
        if !restored {
            (app.reset)();
            (app.init)();
        }

        self.active.publish(index);
        (app.handle_app_event)(AppEvent::Resume);

        self.last_slot = Some(index);
        // Meta write failure is not fatal; the session just won't resume
        // here after the next power cycle.
        let _ = MetaRecord::new(app.id, index as u8).store(&mut self.storage);
    }

    /// Validate and replay a slot into `app`; false means "use defaults"
    fn restore_into(&mut self, slot: usize, app: AppHandle) -> bool {
        let Some(header) = self.read_header(slot) else {
            return false;
        };
        if header.app_id != app.id || header.storage_version != app.storage_version {
            return false;
        }

        let len = header.payload_len as usize;
        if len > MAX_APP_STATE_LEN {
            return false;
        }
        let mut stage: Vec<u8, MAX_APP_STATE_LEN> = Vec::new();
        let _ = stage.resize(len, 0);
        match self.storage.read(slot, SLOT_HEADER_LEN, &mut stage) {
            Ok(n) if n == len => {}
            _ => return false,
        }
        if !header.matches_payload(&stage) {
            return false;
        }

        let mut reader = StreamReader::new(&stage);
        (app.restore)(&mut reader) == len
    }

    fn read_header(&mut self, slot: usize) -> Option<SlotHeader> {
        let mut buf = [0u8; SLOT_HEADER_LEN];
        match self.storage.read(slot, 0, &mut buf) {
            Ok(n) if n == SLOT_HEADER_LEN => SlotHeader::decode(&buf),
            _ => None,
        }
    }

    /// Slot recorded by the previous session, if it still names a
    /// registered app bound to that slot
    fn stored_session_slot(&mut self) -> Option<usize> {
        let meta = MetaRecord::load(&mut self.storage).ok()?;
        let index = self.active.registry().index_of(meta.last_app_id)?;
        (index == meta.last_slot as usize).then_some(index)
    }
}

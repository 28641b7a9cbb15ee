//! Application descriptors and the compiled-in registry
//!
//! Every firmware personality the module can host is described by one
//! [`AppDescriptor`]: its identity (packed two-character id, persisted-state
//! schema version, display name) and its capability table. The table is a
//! plain struct of `fn` values rather than a trait object so descriptors
//! can live in a `static` array and the sample-clock interrupt reaches an
//! app's `isr` through a single indirect call.
//!
//! Descriptors carry no state of their own; all application state lives in
//! the application's own statics, which is what `save`/`restore` serialize.

pub mod registry;

pub use registry::{Registry, RegistryError};

use crate::stream::{StreamReader, StreamWriter};
use kaleido_protocol::{ButtonEvent, EncoderEvent};

/// Pack a two-character ASCII tag into an app id
///
/// Ids are conventionally two packed ASCII characters so they read in hex
/// dumps: `two_cc(b"SQ")` for a sequencer, `two_cc(b"CL")` for a clock.
pub const fn two_cc(tag: &[u8; 2]) -> u16 {
    u16::from_be_bytes(*tag)
}

/// Lifecycle notifications delivered through `handle_app_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppEvent {
    /// About to be switched away from, or power may be cut; flush any
    /// in-memory-only state worth keeping
    Suspend,
    /// Became the active application again
    Resume,
    /// Display idle timeout started
    ScreensaverOn,
    /// Display idle timeout ended
    ScreensaverOff,
}

/// One application's identity and capability table
///
/// All capabilities except `isr` are mandatory; an app with nothing to do
/// in a hook supplies an empty function. `isr` stays optional because the
/// dispatch entry checks it on every sample tick and most utility apps
/// have no real-time work at all.
///
/// Context contract: `isr` runs in interrupt context and must be O(1),
/// allocation-free, and must not touch any main-loop-only hook. Everything
/// else runs on the cooperative main loop only. `tick` must return
/// promptly; it is called once per outer loop iteration.
pub struct AppDescriptor {
    /// Unique id, conventionally [`two_cc`]-packed
    pub id: u16,
    /// Schema version of this app's persisted state
    pub storage_version: u16,
    /// Display label; no uniqueness requirement
    pub name: &'static str,

    /// One-time setup when the app first becomes active in a session
    pub init: fn(),
    /// Exact number of bytes `save` will write
    pub storage_size: fn() -> usize,
    /// Serialize state; returns bytes written (short count = aborted save)
    pub save: fn(&mut StreamWriter<'_>) -> usize,
    /// Deserialize state; returns bytes read (mismatch = corrupt slot)
    pub restore: fn(&mut StreamReader<'_>) -> usize,
    /// Return to factory defaults; callable at any time
    pub reset: fn(),

    /// Lifecycle notifications, see [`AppEvent`]
    pub handle_app_event: fn(AppEvent),

    /// Cooperative main-loop tick
    pub tick: fn(),
    /// Render the app's menu page
    pub draw_menu: fn(),
    /// Render the app's screensaver page
    pub draw_screensaver: fn(),

    /// Button input, main-loop context
    pub handle_button_event: fn(&ButtonEvent),
    /// Encoder input, main-loop context
    pub handle_encoder_event: fn(&EncoderEvent),

    /// Real-time sample-tick callback, interrupt context
    pub isr: Option<fn()>,
}

/// A borrowed registry entry, valid for the life of the process
pub type AppHandle = &'static AppDescriptor;

impl core::fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("id", &self.id)
            .field("storage_version", &self.storage_version)
            .field("name", &self.name)
            .field("has_isr", &self.isr.is_some())
            .finish()
    }
}

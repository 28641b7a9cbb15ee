//! Lock-free active-app cell
//!
//! The one piece of state both execution contexts touch: the sample-clock
//! interrupt reads it on every tick, the main-loop switcher writes it
//! during a switch. The cell stores the active app's registry index in a
//! single word, so the interrupt observes every update all-or-nothing.
//!
//! Publish discipline (single writer): the switcher clears the cell before
//! the outgoing app's `Suspend` notification and publishes the incoming
//! app only after its restore-or-reset completed. The interrupt therefore
//! never reaches a suspended app's `isr`, never a half-initialized one; in
//! the window between the two it simply sees no active app and returns.

use portable_atomic::{AtomicUsize, Ordering};

use crate::app::{AppHandle, Registry};

/// Sentinel index meaning "no active app"
const NO_APP: usize = usize::MAX;

/// The shared active-app cell
///
/// Construct one in a `static` next to the descriptor table and hand a
/// reference to both the interrupt handler and the [`AppSwitcher`].
///
/// [`AppSwitcher`]: crate::switcher::AppSwitcher
pub struct ActiveApp {
    registry: Registry,
    index: AtomicUsize,
}

impl ActiveApp {
    /// Create an empty cell over the given registry
    pub const fn new(registry: Registry) -> Self {
        Self {
            registry,
            index: AtomicUsize::new(NO_APP),
        }
    }

    /// The registry this cell publishes indices into
    pub fn registry(&self) -> Registry {
        self.registry
    }

    /// Registry index of the active app, if one is published
    pub fn index(&self) -> Option<usize> {
        let index = self.index.load(Ordering::Acquire);
        (index != NO_APP).then_some(index)
    }

    /// The active app, if one is published
    pub fn get(&self) -> Option<AppHandle> {
        self.registry.app_desc(self.index.load(Ordering::Acquire))
    }

    /// Interrupt-context dispatch entry point
    ///
    /// One atomic load; if an app is published and it has an `isr`
    /// capability, call it. O(1), allocation-free, never iterates the
    /// registry. The only operation in this crate that may run in
    /// interrupt context.
    pub fn isr(&self) {
        if let Some(app) = self.registry.app_desc(self.index.load(Ordering::Acquire)) {
            if let Some(isr) = app.isr {
                isr();
            }
        }
    }

    /// Publish `index` as the active app
    ///
    /// The app at `index` must be fully restored or reset before this
    /// store; the `Release` ordering makes that initialization visible to
    /// the interrupt's `Acquire` load.
    pub(crate) fn publish(&self, index: usize) {
        debug_assert!(index < self.registry.num_available_apps());
        self.index.store(index, Ordering::Release);
    }

    /// Withdraw the active app from the interrupt's view
    pub(crate) fn clear(&self) {
        self.index.store(NO_APP, Ordering::Release);
    }
}

//! The compiled-in application table
//!
//! The registry is a read-only view over a `static` descriptor array,
//! built once at boot and never mutated. Lookup is a linear scan; the
//! table is a handful of entries, fixed at compile time.

use super::{AppDescriptor, AppHandle};

/// Registry construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Two descriptors share an id
    DuplicateId(u16),
    /// The descriptor table is empty
    Empty,
}

/// Read-only view over the compiled-in descriptor table
#[derive(Clone, Copy)]
pub struct Registry {
    apps: &'static [AppDescriptor],
}

impl Registry {
    /// Wrap a descriptor table
    ///
    /// `const` so a registry can be embedded in a `static` [`ActiveApp`]
    /// cell; id uniqueness is checked separately by [`Registry::validate`]
    /// during switcher construction.
    ///
    /// [`ActiveApp`]: crate::switcher::ActiveApp
    pub const fn new(apps: &'static [AppDescriptor]) -> Self {
        Self { apps }
    }

    /// Check the registry invariants, failing fast on a duplicate id
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.apps.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, app) in self.apps.iter().enumerate() {
            if self.apps[..i].iter().any(|other| other.id == app.id) {
                return Err(RegistryError::DuplicateId(app.id));
            }
        }
        Ok(())
    }

    /// Look up an app by id
    pub fn find(&self, id: u16) -> Option<AppHandle> {
        self.apps.iter().find(|app| app.id == id)
    }

    /// Registry index of the app with the given id
    pub fn index_of(&self, id: u16) -> Option<usize> {
        self.apps.iter().position(|app| app.id == id)
    }

    /// Number of compiled-in applications
    pub fn num_available_apps(&self) -> usize {
        self.apps.len()
    }

    /// Bounds-checked positional access, for UI enumeration
    pub fn app_desc(&self, index: usize) -> Option<AppHandle> {
        self.apps.get(index)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.apps.len())
            .finish()
    }
}

use crate::backend::CapabilityProvider;
use crate::error::{InspectError, Result};
use crate::inspector::key::PropertyKey;
use crate::inspector::query::Inspector;

/// Cached profile, name, version and vendor strings of one platform.
///
/// Slots are empty until first retrieved; re-retrieving a key overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo<H> {
    handle: H,
    profile: Option<String>,
    name: Option<String>,
    version: Option<String>,
    vendor: Option<String>,
}

impl<H: Copy> PlatformInfo<H> {
    pub const KEYS: [PropertyKey; 4] = [
        PropertyKey::PlatformProfile,
        PropertyKey::PlatformName,
        PropertyKey::PlatformVersion,
        PropertyKey::PlatformVendor,
    ];

    pub fn new(handle: H) -> Self {
        Self {
            handle,
            profile: None,
            name: None,
            version: None,
            vendor: None,
        }
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    /// Returns the cached value of `key`, if it has been retrieved.
    pub fn get(&self, key: PropertyKey) -> Result<Option<&str>> {
        let slot = match key {
            PropertyKey::PlatformProfile => &self.profile,
            PropertyKey::PlatformName => &self.name,
            PropertyKey::PlatformVersion => &self.version,
            PropertyKey::PlatformVendor => &self.vendor,
            _ => return Err(unknown(key)),
        };
        Ok(slot.as_deref())
    }

    /// Queries `key` from the provider and stores it.
    pub fn retrieve<P>(&mut self, inspector: &Inspector<P>, key: PropertyKey) -> Result<&str>
    where
        P: CapabilityProvider<Handle = H>,
    {
        // Check the slot first so unknown keys never reach the provider.
        self.slot_mut(key)?;
        let value = inspector.query_string(self.handle, key)?;
        let slot = self.slot_mut(key)?;
        Ok(slot.insert(value).as_str())
    }

    /// Retrieves all four slots.
    pub fn refresh<P>(&mut self, inspector: &Inspector<P>) -> Result<()>
    where
        P: CapabilityProvider<Handle = H>,
    {
        for key in Self::KEYS {
            self.retrieve(inspector, key)?;
        }
        Ok(())
    }

    /// Retrieves `key` and renders it as `"\t<NAME>\t<value>"`.
    pub fn display<P>(&mut self, inspector: &Inspector<P>, key: PropertyKey) -> Result<String>
    where
        P: CapabilityProvider<Handle = H>,
    {
        let value = self.retrieve(inspector, key)?;
        Ok(format!("\t{}\t{}", key, value))
    }

    fn slot_mut(&mut self, key: PropertyKey) -> Result<&mut Option<String>> {
        match key {
            PropertyKey::PlatformProfile => Ok(&mut self.profile),
            PropertyKey::PlatformName => Ok(&mut self.name),
            PropertyKey::PlatformVersion => Ok(&mut self.version),
            PropertyKey::PlatformVendor => Ok(&mut self.vendor),
            _ => Err(unknown(key)),
        }
    }
}

fn unknown(key: PropertyKey) -> InspectError {
    InspectError::UnknownKey {
        key: key.to_string(),
    }
}

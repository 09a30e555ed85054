use crate::backend::CapabilityProvider;
use crate::error::{InspectError, QueryStage, Result};
use crate::inspector::decode::{self, PropertyValue};
use crate::inspector::key::{Decoding, PropertyKey};

/// Reads and decodes properties from a [`CapabilityProvider`].
///
/// Holds no state besides the provider, so device queries are never cached.
#[derive(Debug, Clone)]
pub struct Inspector<P> {
    provider: P,
}

impl<P: CapabilityProvider> Inspector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches the raw bytes of `key`: one size round-trip, then one fill round-trip.
    pub fn query_raw(&self, handle: P::Handle, key: PropertyKey) -> Result<Vec<u8>> {
        let size = self
            .provider
            .query_size(handle, key)
            .map_err(|status| provider_error(key, QueryStage::Size, status))?;

        let mut buf = vec![0u8; size];
        self.provider
            .query_fill(handle, key, &mut buf)
            .map_err(|status| provider_error(key, QueryStage::Fill, status))?;

        log::trace!("{:?}: {} = {} bytes", handle, key, size);
        Ok(buf)
    }

    /// Fetches and decodes `key`.
    ///
    /// Array keys cost an extra round-trip: the element count is read from the
    /// key's count property before the array itself.
    pub fn query(&self, handle: P::Handle, key: PropertyKey) -> Result<PropertyValue> {
        let count = match key.decoding() {
            Decoding::Array { count, .. } => Some(self.query_count(handle, count)?),
            _ => None,
        };
        let raw = self.query_raw(handle, key)?;
        let value = decode::decode(key, &raw, count)?;
        log::debug!("{:?}: {} = {}", handle, key, value);
        Ok(value)
    }

    pub fn query_string(&self, handle: P::Handle, key: PropertyKey) -> Result<String> {
        match self.query(handle, key)? {
            PropertyValue::Text(s) => Ok(s),
            _ => Err(InspectError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn format(&self, handle: P::Handle, key: PropertyKey) -> Result<String> {
        self.query(handle, key).map(|value| value.to_string())
    }

    /// One diagnostic line: `"\t<NAME>\t<value>"`.
    pub fn display_line(&self, handle: P::Handle, key: PropertyKey) -> Result<String> {
        Ok(format!("\t{}\t{}", key, self.format(handle, key)?))
    }

    fn query_count(&self, handle: P::Handle, key: PropertyKey) -> Result<usize> {
        match self.query(handle, key)? {
            PropertyValue::Integer(n) => Ok(n as usize),
            _ => Err(InspectError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }
}

fn provider_error(key: PropertyKey, stage: QueryStage, status: i32) -> InspectError {
    InspectError::ProviderQuery {
        key: key.to_string(),
        stage,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockProvider;

    fn sizes(values: &[usize]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn failed_size_query_skips_fill() {
        let inspector = Inspector::new(MockProvider::default());
        let err = inspector.query_raw(7, PropertyKey::PlatformName).unwrap_err();
        match err {
            InspectError::ProviderQuery { key, stage, .. } => {
                assert_eq!(key, "CL_PLATFORM_NAME");
                assert_eq!(stage, QueryStage::Size);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(inspector.provider().size_calls.get(), 1);
        assert_eq!(inspector.provider().fill_calls.get(), 0);
    }

    #[test]
    fn failed_fill_query_is_reported() {
        let provider = MockProvider::default()
            .with_text(1, PropertyKey::DeviceName, "gfx1030")
            .with_fill_failure(1, PropertyKey::DeviceName);
        let inspector = Inspector::new(provider);
        let err = inspector.query_raw(1, PropertyKey::DeviceName).unwrap_err();
        assert!(matches!(err, InspectError::ProviderQuery { stage: QueryStage::Fill, .. }));
    }

    #[test]
    fn raw_query_uses_two_round_trips() {
        let provider =
            MockProvider::default().with_text(1, PropertyKey::PlatformName, "Intel(R) OpenCL");
        let inspector = Inspector::new(provider);
        let raw = inspector.query_raw(1, PropertyKey::PlatformName).unwrap();
        assert_eq!(raw, b"Intel(R) OpenCL\0");
        assert_eq!(inspector.provider().size_calls.get(), 1);
        assert_eq!(inspector.provider().fill_calls.get(), 1);
    }

    #[test]
    fn array_length_comes_from_dimension_query() {
        let provider = MockProvider::default()
            .with_bytes(1, PropertyKey::DeviceMaxWorkItemDimensions, &3u32.to_ne_bytes())
            .with_bytes(1, PropertyKey::DeviceMaxWorkItemSizes, &sizes(&[1024, 1024, 64, 0]));
        let inspector = Inspector::new(provider);
        let value = inspector.query(1, PropertyKey::DeviceMaxWorkItemSizes).unwrap();
        assert_eq!(value, PropertyValue::Sequence(vec![1024, 1024, 64]));
        assert_eq!(inspector.provider().size_calls.get(), 2);
    }

    #[test]
    fn array_fails_without_dimension_count() {
        let provider = MockProvider::default()
            .with_bytes(1, PropertyKey::DeviceMaxWorkItemSizes, &sizes(&[1024, 1024, 64]));
        let inspector = Inspector::new(provider);
        assert!(inspector.query(1, PropertyKey::DeviceMaxWorkItemSizes).is_err());
    }

    #[test]
    fn display_line_is_tab_separated() {
        let provider = MockProvider::default()
            .with_bytes(1, PropertyKey::DeviceType, &(1u64 << 2 | 1).to_ne_bytes());
        let inspector = Inspector::new(provider);
        assert_eq!(
            inspector.display_line(1, PropertyKey::DeviceType).unwrap(),
            "\tCL_DEVICE_TYPE\tCL_DEVICE_TYPE_GPU | CL_DEVICE_TYPE_DEFAULT"
        );
    }

    #[test]
    fn query_string_rejects_numeric_keys() {
        let provider = MockProvider::default()
            .with_bytes(1, PropertyKey::DeviceAddressBits, &64u32.to_ne_bytes());
        let inspector = Inspector::new(provider);
        assert!(inspector.query_string(1, PropertyKey::DeviceAddressBits).is_err());
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::inspector::PropertyKey;

/// Status code reported by a provider call. Zero is never returned as an error.
pub type Status = i32;

/// Device categories a platform can be asked to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    All,
    Cpu,
    Gpu,
    Accelerator,
    Default,
}

impl DeviceClass {
    /// The `cl_device_type` bits for this class.
    pub fn bits(self) -> u64 {
        match self {
            DeviceClass::Default => 1 << 0,
            DeviceClass::Cpu => 1 << 1,
            DeviceClass::Gpu => 1 << 2,
            DeviceClass::Accelerator => 1 << 3,
            DeviceClass::All => 0xFFFF_FFFF,
        }
    }
}

impl FromStr for DeviceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DeviceClass::All),
            "cpu" => Ok(DeviceClass::Cpu),
            "gpu" => Ok(DeviceClass::Gpu),
            "accelerator" | "acc" => Ok(DeviceClass::Accelerator),
            "default" => Ok(DeviceClass::Default),
            other => Err(format!(
                "unknown device type '{}'; expected all, cpu, gpu, accelerator or default",
                other
            )),
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceClass::All => "all",
            DeviceClass::Cpu => "cpu",
            DeviceClass::Gpu => "gpu",
            DeviceClass::Accelerator => "accelerator",
            DeviceClass::Default => "default",
        };
        f.write_str(s)
    }
}

/// Capability provider shared by the inspector and the report renderer.
///
/// Property queries follow the provider's two-call protocol: ask for the
/// size, then ask for the bytes. The same handle type names both platforms
/// and devices; the key's scope says which one a query means.
pub trait CapabilityProvider {
    type Handle: Copy + fmt::Debug;

    fn platforms(&self) -> Result<Vec<Self::Handle>, Status>;
    fn devices(&self, platform: Self::Handle, class: DeviceClass)
    -> Result<Vec<Self::Handle>, Status>;
    fn query_size(&self, handle: Self::Handle, key: PropertyKey) -> Result<usize, Status>;
    fn query_fill(
        &self,
        handle: Self::Handle,
        key: PropertyKey,
        buf: &mut [u8],
    ) -> Result<(), Status>;
}

impl<T> CapabilityProvider for &T
where
    T: CapabilityProvider + ?Sized,
{
    type Handle = T::Handle;

    fn platforms(&self) -> Result<Vec<Self::Handle>, Status> {
        (**self).platforms()
    }

    fn devices(
        &self,
        platform: Self::Handle,
        class: DeviceClass,
    ) -> Result<Vec<Self::Handle>, Status> {
        (**self).devices(platform, class)
    }

    fn query_size(&self, handle: Self::Handle, key: PropertyKey) -> Result<usize, Status> {
        (**self).query_size(handle, key)
    }

    fn query_fill(
        &self,
        handle: Self::Handle,
        key: PropertyKey,
        buf: &mut [u8],
    ) -> Result<(), Status> {
        (**self).query_fill(handle, key, buf)
    }
}

impl<T> CapabilityProvider for Arc<T>
where
    T: CapabilityProvider + ?Sized,
{
    type Handle = T::Handle;

    fn platforms(&self) -> Result<Vec<Self::Handle>, Status> {
        (**self).platforms()
    }

    fn devices(
        &self,
        platform: Self::Handle,
        class: DeviceClass,
    ) -> Result<Vec<Self::Handle>, Status> {
        (**self).devices(platform, class)
    }

    fn query_size(&self, handle: Self::Handle, key: PropertyKey) -> Result<usize, Status> {
        (**self).query_size(handle, key)
    }

    fn query_fill(
        &self,
        handle: Self::Handle,
        key: PropertyKey,
        buf: &mut [u8],
    ) -> Result<(), Status> {
        (**self).query_fill(handle, key, buf)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_parses_case_insensitively() {
        assert_eq!("GPU".parse::<DeviceClass>().unwrap(), DeviceClass::Gpu);
        assert_eq!(" cpu ".parse::<DeviceClass>().unwrap(), DeviceClass::Cpu);
        assert_eq!("acc".parse::<DeviceClass>().unwrap(), DeviceClass::Accelerator);
        assert!("fpga".parse::<DeviceClass>().is_err());
    }

    #[test]
    fn device_class_bits_match_device_type_table() {
        use crate::inspector::key::DEVICE_TYPE_FLAGS;
        let gpu = DEVICE_TYPE_FLAGS
            .flags
            .iter()
            .find(|(_, name)| *name == "CL_DEVICE_TYPE_GPU")
            .map(|(bit, _)| *bit);
        assert_eq!(gpu, Some(DeviceClass::Gpu.bits()));
    }
}

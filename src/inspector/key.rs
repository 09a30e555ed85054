//! Property keys and the table that says how each one is decoded.

use std::fmt;

/// Whether a key is asked of a platform or of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Platform,
    Device,
}

/// Width of a fixed-size integer in a property buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U32,
    U64,
    /// The provider's `size_t`, i.e. host `usize`.
    Size,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U32 => 4,
            Width::U64 => 8,
            Width::Size => std::mem::size_of::<usize>(),
        }
    }
}

/// An ordered table of `(bit, name)` pairs for one bit-field property.
///
/// Names are emitted in table order, not bit order.
#[derive(Debug, PartialEq, Eq)]
pub struct FlagTable {
    pub width: Width,
    pub flags: &'static [(u64, &'static str)],
}

/// How the raw bytes of a property are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    /// NUL-terminated string.
    Text,
    /// A single integer.
    Scalar(Width),
    /// A bit field rendered through its flag table.
    Flags(&'static FlagTable),
    /// An array whose length is the value of `count`, queried separately.
    Array { width: Width, count: PropertyKey },
    /// No known decoding; the first byte is shown as-is.
    Raw,
}

pub static DEVICE_TYPE_FLAGS: FlagTable = FlagTable {
    width: Width::U64,
    flags: &[
        (1 << 1, "CL_DEVICE_TYPE_CPU"),
        (1 << 2, "CL_DEVICE_TYPE_GPU"),
        (1 << 3, "CL_DEVICE_TYPE_ACCELERATOR"),
        (1 << 0, "CL_DEVICE_TYPE_DEFAULT"),
    ],
};

pub static FP_CONFIG_FLAGS: FlagTable = FlagTable {
    width: Width::U64,
    flags: &[
        (1 << 0, "CL_FP_DENORM"),
        (1 << 1, "CL_FP_INF_NAN"),
        (1 << 2, "CL_FP_ROUND_TO_NEAREST"),
        (1 << 3, "CL_FP_ROUND_TO_ZERO"),
        (1 << 4, "CL_FP_ROUND_TO_INF"),
        (1 << 5, "CL_FP_FMA"),
        (1 << 6, "CL_FP_SOFT_FLOAT"),
    ],
};

// CL_NONE is zero and can never match; it stays for table completeness.
pub static MEM_CACHE_TYPE_FLAGS: FlagTable = FlagTable {
    width: Width::U32,
    flags: &[
        (0, "CL_NONE"),
        (1, "CL_READ_ONLY_CACHE"),
        (2, "CL_READ_WRITE_CACHE"),
    ],
};

pub static LOCAL_MEM_TYPE_FLAGS: FlagTable = FlagTable {
    width: Width::U32,
    flags: &[(1, "CL_LOCAL"), (2, "CL_GLOBAL")],
};

pub static EXEC_CAPABILITY_FLAGS: FlagTable = FlagTable {
    width: Width::U64,
    flags: &[(1 << 0, "CL_EXEC_KERNEL"), (1 << 1, "CL_EXEC_NATIVE_KERNEL")],
};

pub static QUEUE_PROPERTY_FLAGS: FlagTable = FlagTable {
    width: Width::U64,
    flags: &[
        (1 << 0, "CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE"),
        (1 << 1, "CL_QUEUE_PROFILING_ENABLE"),
    ],
};

/// A queryable platform or device attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    PlatformProfile,
    PlatformVersion,
    PlatformName,
    PlatformVendor,
    PlatformExtensions,

    DeviceType,
    DeviceVendorId,
    DeviceMaxComputeUnits,
    DeviceMaxWorkItemDimensions,
    DeviceMaxWorkGroupSize,
    DeviceMaxWorkItemSizes,
    DeviceMaxClockFrequency,
    DeviceAddressBits,
    DeviceMaxMemAllocSize,
    DeviceImageSupport,
    DeviceSingleFpConfig,
    DeviceGlobalMemCacheType,
    DeviceGlobalMemSize,
    DeviceLocalMemType,
    DeviceLocalMemSize,
    DeviceExecutionCapabilities,
    DeviceQueueProperties,
    DeviceName,
    DeviceVendor,
    DriverVersion,
    DeviceProfile,
    DeviceVersion,
    DeviceExtensions,
    DeviceHostUnifiedMemory,

    /// A provider code this crate has no decoding for.
    Other { scope: Scope, code: u32 },
}

impl PropertyKey {
    /// Every key with a known decoding, platform keys first.
    pub const KNOWN: &'static [PropertyKey] = &[
        PropertyKey::PlatformProfile,
        PropertyKey::PlatformVersion,
        PropertyKey::PlatformName,
        PropertyKey::PlatformVendor,
        PropertyKey::PlatformExtensions,
        PropertyKey::DeviceType,
        PropertyKey::DeviceVendorId,
        PropertyKey::DeviceMaxComputeUnits,
        PropertyKey::DeviceMaxWorkItemDimensions,
        PropertyKey::DeviceMaxWorkGroupSize,
        PropertyKey::DeviceMaxWorkItemSizes,
        PropertyKey::DeviceMaxClockFrequency,
        PropertyKey::DeviceAddressBits,
        PropertyKey::DeviceMaxMemAllocSize,
        PropertyKey::DeviceImageSupport,
        PropertyKey::DeviceSingleFpConfig,
        PropertyKey::DeviceGlobalMemCacheType,
        PropertyKey::DeviceGlobalMemSize,
        PropertyKey::DeviceLocalMemType,
        PropertyKey::DeviceLocalMemSize,
        PropertyKey::DeviceExecutionCapabilities,
        PropertyKey::DeviceQueueProperties,
        PropertyKey::DeviceName,
        PropertyKey::DeviceVendor,
        PropertyKey::DriverVersion,
        PropertyKey::DeviceProfile,
        PropertyKey::DeviceVersion,
        PropertyKey::DeviceExtensions,
        PropertyKey::DeviceHostUnifiedMemory,
    ];

    pub fn scope(self) -> Scope {
        use PropertyKey::*;
        match self {
            PlatformProfile | PlatformVersion | PlatformName | PlatformVendor
            | PlatformExtensions => Scope::Platform,
            Other { scope, .. } => scope,
            _ => Scope::Device,
        }
    }

    /// The provider's numeric identifier (`cl_platform_info` / `cl_device_info`).
    pub fn code(self) -> u32 {
        use PropertyKey::*;
        match self {
            PlatformProfile => 0x0900,
            PlatformVersion => 0x0901,
            PlatformName => 0x0902,
            PlatformVendor => 0x0903,
            PlatformExtensions => 0x0904,

            DeviceType => 0x1000,
            DeviceVendorId => 0x1001,
            DeviceMaxComputeUnits => 0x1002,
            DeviceMaxWorkItemDimensions => 0x1003,
            DeviceMaxWorkGroupSize => 0x1004,
            DeviceMaxWorkItemSizes => 0x1005,
            DeviceMaxClockFrequency => 0x100C,
            DeviceAddressBits => 0x100D,
            DeviceMaxMemAllocSize => 0x1010,
            DeviceImageSupport => 0x1016,
            DeviceSingleFpConfig => 0x101B,
            DeviceGlobalMemCacheType => 0x101C,
            DeviceGlobalMemSize => 0x101F,
            DeviceLocalMemType => 0x1022,
            DeviceLocalMemSize => 0x1023,
            DeviceExecutionCapabilities => 0x1029,
            DeviceQueueProperties => 0x102A,
            DeviceName => 0x102B,
            DeviceVendor => 0x102C,
            DriverVersion => 0x102D,
            DeviceProfile => 0x102E,
            DeviceVersion => 0x102F,
            DeviceExtensions => 0x1030,
            DeviceHostUnifiedMemory => 0x1035,

            Other { code, .. } => code,
        }
    }

    /// Display name, e.g. `CL_DEVICE_TYPE`. `None` for [`PropertyKey::Other`].
    pub fn name(self) -> Option<&'static str> {
        use PropertyKey::*;
        let name = match self {
            PlatformProfile => "CL_PLATFORM_PROFILE",
            PlatformVersion => "CL_PLATFORM_VERSION",
            PlatformName => "CL_PLATFORM_NAME",
            PlatformVendor => "CL_PLATFORM_VENDOR",
            PlatformExtensions => "CL_PLATFORM_EXTENSIONS",

            DeviceType => "CL_DEVICE_TYPE",
            DeviceVendorId => "CL_DEVICE_VENDOR_ID",
            DeviceMaxComputeUnits => "CL_DEVICE_MAX_COMPUTE_UNITS",
            DeviceMaxWorkItemDimensions => "CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS",
            DeviceMaxWorkGroupSize => "CL_DEVICE_MAX_WORK_GROUP_SIZE",
            DeviceMaxWorkItemSizes => "CL_DEVICE_MAX_WORK_ITEM_SIZES",
            DeviceMaxClockFrequency => "CL_DEVICE_MAX_CLOCK_FREQUENCY",
            DeviceAddressBits => "CL_DEVICE_ADDRESS_BITS",
            DeviceMaxMemAllocSize => "CL_DEVICE_MAX_MEM_ALLOC_SIZE",
            DeviceImageSupport => "CL_DEVICE_IMAGE_SUPPORT",
            DeviceSingleFpConfig => "CL_DEVICE_SINGLE_FP_CONFIG",
            DeviceGlobalMemCacheType => "CL_DEVICE_GLOBAL_MEM_CACHE_TYPE",
            DeviceGlobalMemSize => "CL_DEVICE_GLOBAL_MEM_SIZE",
            DeviceLocalMemType => "CL_DEVICE_LOCAL_MEM_TYPE",
            DeviceLocalMemSize => "CL_DEVICE_LOCAL_MEM_SIZE",
            DeviceExecutionCapabilities => "CL_DEVICE_EXECUTION_CAPABILITIES",
            DeviceQueueProperties => "CL_DEVICE_QUEUE_PROPERTIES",
            DeviceName => "CL_DEVICE_NAME",
            DeviceVendor => "CL_DEVICE_VENDOR",
            DriverVersion => "CL_DRIVER_VERSION",
            DeviceProfile => "CL_DEVICE_PROFILE",
            DeviceVersion => "CL_DEVICE_VERSION",
            DeviceExtensions => "CL_DEVICE_EXTENSIONS",
            DeviceHostUnifiedMemory => "CL_DEVICE_HOST_UNIFIED_MEMORY",

            Other { .. } => return None,
        };
        Some(name)
    }

    pub fn decoding(self) -> Decoding {
        use PropertyKey::*;
        match self {
            PlatformProfile | PlatformVersion | PlatformName | PlatformVendor
            | PlatformExtensions => Decoding::Text,
            DeviceName | DeviceVendor | DriverVersion | DeviceProfile | DeviceVersion
            | DeviceExtensions => Decoding::Text,

            DeviceType => Decoding::Flags(&DEVICE_TYPE_FLAGS),
            DeviceSingleFpConfig => Decoding::Flags(&FP_CONFIG_FLAGS),
            DeviceGlobalMemCacheType => Decoding::Flags(&MEM_CACHE_TYPE_FLAGS),
            DeviceLocalMemType => Decoding::Flags(&LOCAL_MEM_TYPE_FLAGS),
            DeviceExecutionCapabilities => Decoding::Flags(&EXEC_CAPABILITY_FLAGS),
            DeviceQueueProperties => Decoding::Flags(&QUEUE_PROPERTY_FLAGS),

            DeviceVendorId
            | DeviceMaxComputeUnits
            | DeviceMaxWorkItemDimensions
            | DeviceMaxClockFrequency
            | DeviceAddressBits
            | DeviceImageSupport
            | DeviceHostUnifiedMemory => Decoding::Scalar(Width::U32),
            DeviceMaxMemAllocSize | DeviceGlobalMemSize | DeviceLocalMemSize => {
                Decoding::Scalar(Width::U64)
            }
            DeviceMaxWorkGroupSize => Decoding::Scalar(Width::Size),

            DeviceMaxWorkItemSizes => Decoding::Array {
                width: Width::Size,
                count: DeviceMaxWorkItemDimensions,
            },

            Other { .. } => Decoding::Raw,
        }
    }

    /// Looks a key up by display name, ignoring ASCII case. The `CL_` prefix is optional.
    pub fn from_name(name: &str) -> Option<PropertyKey> {
        let upper = name.trim().to_ascii_uppercase();
        let wanted = upper.strip_prefix("CL_").unwrap_or(&upper);
        Self::KNOWN.iter().copied().find(|key| {
            key.name()
                .and_then(|n| n.strip_prefix("CL_"))
                .is_some_and(|n| n == wanted)
        })
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => {
                let scope = match self.scope() {
                    Scope::Platform => "PLATFORM",
                    Scope::Device => "DEVICE",
                };
                write!(f, "{}_INFO_{:#06x}", scope, self.code())
            }
        }
    }
}

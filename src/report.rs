//! Platform and device listing.
//!
//! Walks every platform (or one selected platform) and its devices, writing one
//! `"\t<NAME>\t<value>"` line per property.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::backend::{CapabilityProvider, DeviceClass};
use crate::error::InspectError;
use crate::inspector::{Inspector, PlatformInfo, PropertyKey};

/// What to do when a single property cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the error.
    Abort,
    /// Log a warning and carry on with the next property.
    #[default]
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" | "continue" => Ok(ErrorPolicy::Skip),
            other => Err(format!("unknown error policy '{}'; expected abort or skip", other)),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Abort => f.write_str("abort"),
            ErrorPolicy::Skip => f.write_str("skip"),
        }
    }
}

pub const DEFAULT_PLATFORM_KEYS: &[PropertyKey] = &[
    PropertyKey::PlatformProfile,
    PropertyKey::PlatformName,
    PropertyKey::PlatformVersion,
    PropertyKey::PlatformVendor,
];

pub const DEFAULT_DEVICE_KEYS: &[PropertyKey] = &[
    PropertyKey::DeviceName,
    PropertyKey::DeviceType,
    PropertyKey::DeviceVendorId,
    PropertyKey::DeviceMaxComputeUnits,
    PropertyKey::DeviceMaxClockFrequency,
    PropertyKey::DeviceAddressBits,
    PropertyKey::DeviceMaxMemAllocSize,
    PropertyKey::DeviceGlobalMemSize,
    PropertyKey::DeviceGlobalMemCacheType,
    PropertyKey::DeviceLocalMemSize,
    PropertyKey::DeviceLocalMemType,
    PropertyKey::DeviceMaxWorkGroupSize,
    PropertyKey::DeviceMaxWorkItemDimensions,
    PropertyKey::DeviceMaxWorkItemSizes,
    PropertyKey::DeviceSingleFpConfig,
    PropertyKey::DeviceImageSupport,
    PropertyKey::DeviceHostUnifiedMemory,
    PropertyKey::DeviceQueueProperties,
    PropertyKey::DeviceExecutionCapabilities,
];

/// Which platforms, devices and properties to list.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Only this platform index (all platforms if `None`)
    pub platform: Option<usize>,
    /// Only this device index within each listed platform
    pub device: Option<usize>,
    pub device_class: DeviceClass,
    pub policy: ErrorPolicy,
    pub platform_keys: Vec<PropertyKey>,
    pub device_keys: Vec<PropertyKey>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            platform: None,
            device: None,
            device_class: DeviceClass::All,
            policy: ErrorPolicy::Skip,
            platform_keys: DEFAULT_PLATFORM_KEYS.to_vec(),
            device_keys: DEFAULT_DEVICE_KEYS.to_vec(),
        }
    }
}

/// Writes the listing described by `config` to `out`.
pub fn write_report<P, W>(
    inspector: &Inspector<P>,
    config: &ReportConfig,
    out: &mut W,
) -> Result<()>
where
    P: CapabilityProvider,
    W: Write,
{
    let platforms = inspector
        .provider()
        .platforms()
        .map_err(|status| InspectError::Enumeration {
            what: "platforms",
            status,
        })
        .context("Failed to get platforms")?;

    writeln!(out, "Number of platforms: {}", platforms.len())?;

    // With no pinned platform the device index applies per platform, and only
    // a miss on every platform is an error.
    let mut device_found = false;

    for (plat_idx, platform) in select(&platforms, config.platform, "Platform")? {
        writeln!(out, "\nPlatform {}:", plat_idx)?;

        let mut info = PlatformInfo::new(platform);
        for &key in &config.platform_keys {
            let line = if PlatformInfo::<P::Handle>::KEYS.contains(&key) {
                info.display(inspector, key)
            } else {
                inspector.display_line(platform, key)
            };
            emit(out, line, config.policy)?;
        }

        let devices = match inspector.provider().devices(platform, config.device_class) {
            Ok(devices) => devices,
            Err(status) => {
                let err = InspectError::Enumeration {
                    what: "devices",
                    status,
                };
                match config.policy {
                    ErrorPolicy::Abort => {
                        return Err(err).with_context(|| {
                            format!("Platform {} device listing failed", plat_idx)
                        });
                    }
                    ErrorPolicy::Skip => {
                        log::warn!("Platform {}: {}", plat_idx, err);
                        Vec::new()
                    }
                }
            }
        };

        writeln!(out, "\nNumber of devices: {}", devices.len())?;

        let selected = match (config.platform, config.device) {
            (None, Some(i)) if i >= devices.len() => {
                log::warn!(
                    "Platform {} has no device {} ({} available), skipping",
                    plat_idx,
                    i,
                    devices.len()
                );
                Vec::new()
            }
            _ => select(&devices, config.device, "Device")?,
        };
        device_found |= !selected.is_empty();

        for (dev_idx, device) in selected {
            writeln!(out, "Device {}:", dev_idx)?;
            for &key in &config.device_keys {
                emit(out, inspector.display_line(device, key), config.policy)?;
            }
            writeln!(out)?;
        }

        writeln!(
            out,
            "-------------------- END OF PLATFORM {} --------------------",
            plat_idx
        )?;
    }

    if let Some(i) = config.device {
        if config.platform.is_none() && !platforms.is_empty() && !device_found {
            bail!("Device index {} not present on any platform", i);
        }
    }

    Ok(())
}

fn emit<W: Write>(out: &mut W, line: crate::Result<String>, policy: ErrorPolicy) -> Result<()> {
    match line {
        Ok(line) => writeln!(out, "{}", line)?,
        Err(e) => match policy {
            ErrorPolicy::Abort => return Err(e.into()),
            ErrorPolicy::Skip => log::warn!("Skipping property: {}", e),
        },
    }
    Ok(())
}

fn select<H: Copy>(items: &[H], index: Option<usize>, what: &str) -> Result<Vec<(usize, H)>> {
    match index {
        None => Ok(items.iter().copied().enumerate().collect()),
        Some(i) => match items.get(i) {
            Some(item) => Ok(vec![(i, *item)]),
            None => bail!("{} index {} out of range ({} available)", what, i, items.len()),
        },
    }
}

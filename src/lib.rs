//! capinspect - query and pretty-print compute platform and device capabilities
//!
//! The [`inspector`] module decodes properties from any [`CapabilityProvider`].
//! With the `opencl` feature (on by default) the [`opencl`] module provides a
//! provider backed by the system's OpenCL runtime, and [`report`] renders a
//! full platform/device listing.

pub mod backend;
pub mod error;
pub mod inspector;
#[cfg(feature = "opencl")]
pub mod opencl;
pub mod report;

pub use backend::{CapabilityProvider, DeviceClass, Status};
pub use error::{InspectError, QueryStage, Result};
pub use inspector::{Inspector, PlatformInfo, PropertyKey, PropertyValue};

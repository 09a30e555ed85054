//! OpenCL capability provider
//!
//! Enumerates platforms and devices through `opencl3` and answers property
//! queries with the runtime's `clGetPlatformInfo` / `clGetDeviceInfo`.

mod provider;

pub use provider::{ClHandle, OpenClProvider};

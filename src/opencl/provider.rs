use std::ffi::c_void;
use std::ptr;

use opencl3::error_codes::CL_DEVICE_NOT_FOUND;
use opencl3::platform::{Platform, get_platforms};
use opencl3::types::{cl_device_id, cl_platform_id};
use opencl_sys::{clGetDeviceInfo, clGetPlatformInfo};

use crate::backend::{CapabilityProvider, DeviceClass, Status};
use crate::inspector::{PropertyKey, Scope};

const CL_SUCCESS: Status = 0;

/// A `cl_platform_id` or `cl_device_id`; the query key's scope says which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClHandle(*mut c_void);

impl ClHandle {
    pub fn from_platform(id: cl_platform_id) -> Self {
        ClHandle(id)
    }

    pub fn from_device(id: cl_device_id) -> Self {
        ClHandle(id)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

/// Provider backed by the installed OpenCL ICD loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenClProvider;

impl OpenClProvider {
    pub fn new() -> Self {
        OpenClProvider
    }

    /// One `clGet*Info` call. With an empty `buf` this only reports the size.
    fn info(&self, handle: ClHandle, key: PropertyKey, buf: &mut [u8]) -> Result<usize, Status> {
        let mut size: usize = 0;
        let value = if buf.is_empty() {
            ptr::null_mut()
        } else {
            buf.as_mut_ptr() as *mut c_void
        };
        let status = match key.scope() {
            Scope::Platform => unsafe {
                clGetPlatformInfo(handle.0, key.code(), buf.len(), value, &mut size)
            },
            Scope::Device => unsafe {
                clGetDeviceInfo(handle.0, key.code(), buf.len(), value, &mut size)
            },
        };
        if status != CL_SUCCESS {
            log::debug!("{:?} query for {} failed with status {}", key.scope(), key, status);
            return Err(status);
        }
        Ok(size)
    }
}

impl CapabilityProvider for OpenClProvider {
    type Handle = ClHandle;

    fn platforms(&self) -> Result<Vec<ClHandle>, Status> {
        let platforms = get_platforms().map_err(|e| e.0)?;
        Ok(platforms
            .iter()
            .map(|p| ClHandle::from_platform(p.id()))
            .collect())
    }

    fn devices(&self, platform: ClHandle, class: DeviceClass) -> Result<Vec<ClHandle>, Status> {
        match Platform::new(platform.0).get_devices(class.bits()) {
            Ok(ids) => Ok(ids.into_iter().map(ClHandle::from_device).collect()),
            Err(e) if e.0 == CL_DEVICE_NOT_FOUND => Ok(Vec::new()),
            Err(e) => Err(e.0),
        }
    }

    fn query_size(&self, handle: ClHandle, key: PropertyKey) -> Result<usize, Status> {
        self.info(handle, key, &mut [])
    }

    fn query_fill(&self, handle: ClHandle, key: PropertyKey, buf: &mut [u8]) -> Result<(), Status> {
        self.info(handle, key, buf).map(|_| ())
    }
}

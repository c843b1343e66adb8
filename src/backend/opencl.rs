//! OpenCL device directory.
//!
//! Enumerates every platform the ICD loader reports, then every device
//! of every type on each platform. Queries go straight to
//! `clGetDeviceInfo`; a non-success status becomes `Error::QueryFailed`.

use cl3::device::{get_device_ids, get_device_info, CL_DEVICE_TYPE_ALL};
use cl3::platform::get_platform_ids;
use cl3::types::cl_device_id;
use tracing::debug;

use crate::catalog::QueryKey;
use crate::{Error, Result};
use super::{ComputeDevice, DeviceDirectory, DEVICE_NOT_FOUND};

/// Directory over the system OpenCL runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenClDirectory;

impl OpenClDirectory {
    pub fn new() -> Self {
        Self
    }
}

/// One OpenCL device.
///
/// Not `Send`: the raw handle is only used on the enumerating thread.
#[derive(Debug, Clone, Copy)]
pub struct OpenClDevice {
    id: cl_device_id,
    platform: usize,
    index: usize,
}

impl OpenClDevice {
    fn info(&self, key: QueryKey) -> Result<cl3::info_type::InfoType> {
        get_device_info(self.id, key.0).map_err(|code| Error::QueryFailed {
            device: self.label(),
            key,
            code,
        })
    }
}

impl ComputeDevice for OpenClDevice {
    fn label(&self) -> String {
        format!("opencl:{}:{}", self.platform, self.index)
    }

    fn query_bool(&self, key: QueryKey) -> Result<bool> {
        Ok(self.info(key)?.to_uint() != 0)
    }

    fn query_u32(&self, key: QueryKey) -> Result<u32> {
        Ok(self.info(key)?.to_uint())
    }

    fn query_u64(&self, key: QueryKey) -> Result<u64> {
        Ok(self.info(key)?.to_ulong())
    }

    fn query_size(&self, key: QueryKey) -> Result<usize> {
        Ok(self.info(key)?.to_size())
    }

    fn query_size_array(&self, key: QueryKey) -> Result<Vec<usize>> {
        Ok(self.info(key)?.to_vec_size())
    }

    fn query_text(&self, key: QueryKey) -> Result<String> {
        Ok(self.info(key)?.into())
    }

    fn query_class_mask(&self, key: QueryKey) -> Result<u64> {
        Ok(self.info(key)?.to_ulong())
    }
}

impl DeviceDirectory for OpenClDirectory {
    type Device = OpenClDevice;

    fn devices(&self) -> Result<Vec<OpenClDevice>> {
        let platforms = get_platform_ids()
            .map_err(|code| Error::Directory(format!("platform enumeration failed ({code})")))?;

        let mut devices = Vec::new();
        for (platform, &platform_id) in platforms.iter().enumerate() {
            let ids = match get_device_ids(platform_id, CL_DEVICE_TYPE_ALL) {
                Ok(ids) => ids,
                Err(DEVICE_NOT_FOUND) => Vec::new(),
                Err(code) => {
                    return Err(Error::Directory(format!(
                        "device enumeration failed on platform {platform} ({code})"
                    )));
                }
            };
            debug!(platform, devices = ids.len(), "enumerated OpenCL platform");
            devices.extend(
                ids.into_iter()
                    .enumerate()
                    .map(|(index, id)| OpenClDevice { id, platform, index }),
            );
        }
        Ok(devices)
    }
}

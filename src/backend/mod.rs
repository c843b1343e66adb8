//! # Compute Backend Traits
//!
//! The contract between the resolution engine and whatever enumerates
//! and queries real devices. The engine never talks to a driver directly;
//! everything goes through [`DeviceDirectory`] and [`ComputeDevice`].
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryDirectory` | `memory` | Scripted devices for testing/embedding |
//! | `OpenClDirectory` | `opencl` | Real devices via the OpenCL ICD loader |

pub mod memory;
#[cfg(feature = "opencl")]
pub mod opencl;

use crate::catalog::QueryKey;
use crate::Result;

pub use memory::{MemoryDevice, MemoryDirectory, MemoryValue};

/// Status code a backend returns for a query it does not understand
/// (`CL_INVALID_VALUE`).
pub const INVALID_VALUE: i32 = -30;

/// Status code for a platform with no devices (`CL_DEVICE_NOT_FOUND`).
pub const DEVICE_NOT_FOUND: i32 = -1;

// ============================================================================
// ComputeDevice
// ============================================================================

/// One addressable compute device.
///
/// Each method issues exactly one blocking backend query. A rejected
/// query returns `Error::QueryFailed` carrying the backend status code.
/// Handles are only guaranteed valid for a single resolution pass.
pub trait ComputeDevice {
    /// Human-readable identity, for logs and error messages.
    fn label(&self) -> String;

    fn query_bool(&self, key: QueryKey) -> Result<bool>;

    fn query_u32(&self, key: QueryKey) -> Result<u32>;

    fn query_u64(&self, key: QueryKey) -> Result<u64>;

    /// Machine-word quantity (`size_t`).
    fn query_size(&self, key: QueryKey) -> Result<usize>;

    /// Machine-word array; the backend decides the length.
    fn query_size_array(&self, key: QueryKey) -> Result<Vec<usize>>;

    fn query_text(&self, key: QueryKey) -> Result<String>;

    /// Raw device-class bitfield.
    fn query_class_mask(&self, key: QueryKey) -> Result<u64>;
}

// ============================================================================
// DeviceDirectory
// ============================================================================

/// Lists every device currently visible to the backend.
pub trait DeviceDirectory {
    type Device: ComputeDevice;

    /// All devices, grouped by platform, then in platform order.
    fn devices(&self) -> Result<Vec<Self::Device>>;
}

impl<T: DeviceDirectory + ?Sized> DeviceDirectory for &T {
    type Device = T::Device;

    fn devices(&self) -> Result<Vec<Self::Device>> {
        (**self).devices()
    }
}

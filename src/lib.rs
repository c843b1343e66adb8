//! # devinfo: Typed Compute-Device Capability Queries
//!
//! Resolves named device properties (`"CL_DEVICE_NAME"`,
//! `"CL_DEVICE_MAX_WORK_ITEM_SIZES"`, ...) against every device a compute
//! backend exposes, and returns a property × device grid of typed values.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `DeviceDirectory` / `ComputeDevice` are the contract
//!    between the engine and any backend
//! 2. **Data-driven resolution**: one immutable name → descriptor table
//! 3. **Closed result shapes**: `ValueKind` and `ResultCell` are sum types
//!    matched exhaustively
//! 4. **Unknown is not an error**: unrecognized names yield an empty cell
//!
//! ## Quick Start
//!
//! ```rust
//! use devinfo::{DeviceInfo, DeviceClass, MemoryDevice, MemoryDirectory, ResultCell};
//!
//! # fn example() -> devinfo::Result<()> {
//! let directory = MemoryDirectory::new()
//!     .with_platform("mock", [MemoryDevice::typical("MockGPU", DeviceClass::GPU)]);
//! let info = DeviceInfo::with_directory(directory);
//!
//! let grid = info.query(&["CL_DEVICE_NAME", "CL_DEVICE_TYPE"])?;
//! assert_eq!(grid.get(0, 0), Some(&ResultCell::Text("MockGPU".into())));
//! assert_eq!(grid.get(1, 0), Some(&ResultCell::Text("gpu".into())));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (default) | Scripted devices for testing/embedding |
//! | OpenCL | `opencl` | Every device on every installed OpenCL platform |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod catalog;
pub mod backend;
pub mod execution;
pub mod host;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    ValueKind, NativeWidth, ResultCell, ResultGrid,
    DeviceClass, decode_class_mask,
};

pub use catalog::{
    PropertyDescriptor, QueryKey, ApiVersion,
    resolve, resolve_for, descriptors,
};

pub use backend::{
    ComputeDevice, DeviceDirectory,
    MemoryDevice, MemoryDirectory, MemoryValue,
};

#[cfg(feature = "opencl")]
pub use backend::opencl::{OpenClDevice, OpenClDirectory};

pub use execution::FailurePolicy;

pub use host::{HostArray, HostCellArray, InputShapeError};

use serde::{Deserialize, Serialize};

// ============================================================================
// Options
// ============================================================================

/// Per-handle query settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Catalog entries newer than this resolve as unrecognized.
    pub api_version: ApiVersion,
    pub on_query_failure: FailurePolicy,
}

impl QueryOptions {
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_query_failure = policy;
        self
    }
}

// ============================================================================
// Top-level handle
// ============================================================================

/// The primary entry point. Wraps a device directory and runs
/// resolution passes against whatever it currently lists.
pub struct DeviceInfo<D: DeviceDirectory> {
    directory: D,
    options: QueryOptions,
}

impl<D: DeviceDirectory> DeviceInfo<D> {
    pub fn with_directory(directory: D) -> Self {
        Self { directory, options: QueryOptions::default() }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Resolve `requests` on every device; one grid row per request.
    pub fn query<S: AsRef<str>>(&self, requests: &[S]) -> Result<ResultGrid> {
        let devices = self.directory.devices()?;
        execution::assemble(&devices, requests, &self.options)
    }

    /// Validate a raw host argument, then query.
    ///
    /// Shape errors are returned before the directory is consulted.
    pub fn query_host(&self, input: Option<&serde_json::Value>) -> Result<HostCellArray> {
        let requests = host::parse_requests(input)?;
        let grid = self.query(requests.as_slice())?;
        Ok(HostCellArray::from(&grid))
    }

    /// Access the underlying directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }
}

#[cfg(feature = "opencl")]
impl DeviceInfo<OpenClDirectory> {
    /// Every device on every OpenCL platform installed on this host.
    pub fn open_opencl() -> Self {
        Self::with_directory(OpenClDirectory::new())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input ({id}): {0}", id = .0.id())]
    InputShape(#[from] InputShapeError),

    #[error("Query {key} failed on device {device} (status {code})")]
    QueryFailed { device: String, key: QueryKey, code: i32 },

    #[error("Device enumeration failed: {0}")]
    Directory(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

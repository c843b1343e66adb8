//! In-memory device directory.
//!
//! This is the reference implementation of `DeviceDirectory`.
//! Devices are scripted maps from query key to a typed value.
//!
//! ## Behavior
//!
//! - **Strict shapes**: a query must use the accessor that matches the
//!   stored value (`query_u32` on a `U32`, `query_size` on a `Size`, ...).
//!   A missing key or a shape mismatch fails with `INVALID_VALUE`, the
//!   same way a driver rejects an unsupported attribute.
//! - **Query log**: every query a device receives is recorded, in order,
//!   so callers can see exactly which backend calls a resolution pass made.
//! - **Shared handles**: `MemoryDevice` is a cheap `Arc` clone. The
//!   directory hands out clones, so values set after enumeration are
//!   visible to the engine.
//!
//! Use this backend for:
//! - Testing the resolver, executor and grid assembler without drivers
//! - Embedding the engine where device data comes from elsewhere

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::catalog::{self, keys::*, QueryKey};
use crate::model::DeviceClass;
use crate::{Error, Result};
use super::{ComputeDevice, DeviceDirectory, INVALID_VALUE};

// ============================================================================
// MemoryValue
// ============================================================================

/// A scripted raw backend value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryValue {
    Bool(bool),
    U32(u32),
    U64(u64),
    Size(usize),
    SizeArray(Vec<usize>),
    Text(String),
    ClassMask(u64),
}

impl From<bool> for MemoryValue { fn from(v: bool) -> Self { MemoryValue::Bool(v) } }
impl From<u32> for MemoryValue { fn from(v: u32) -> Self { MemoryValue::U32(v) } }
impl From<u64> for MemoryValue { fn from(v: u64) -> Self { MemoryValue::U64(v) } }
impl From<usize> for MemoryValue { fn from(v: usize) -> Self { MemoryValue::Size(v) } }
impl From<Vec<usize>> for MemoryValue { fn from(v: Vec<usize>) -> Self { MemoryValue::SizeArray(v) } }
impl From<String> for MemoryValue { fn from(v: String) -> Self { MemoryValue::Text(v) } }
impl From<&str> for MemoryValue { fn from(v: &str) -> Self { MemoryValue::Text(v.to_owned()) } }
impl From<DeviceClass> for MemoryValue { fn from(v: DeviceClass) -> Self { MemoryValue::ClassMask(v.bits()) } }

// ============================================================================
// MemoryDevice
// ============================================================================

/// A scripted compute device.
#[derive(Clone)]
pub struct MemoryDevice {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    label: String,
    values: RwLock<HashMap<QueryKey, MemoryValue>>,
    /// key → status code returned instead of a value
    failures: RwLock<HashMap<QueryKey, i32>>,
    log: Mutex<Vec<QueryKey>>,
}

impl MemoryDevice {
    /// A device that answers no queries yet.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(DeviceInner {
                label: label.into(),
                values: RwLock::new(HashMap::new()),
                failures: RwLock::new(HashMap::new()),
                log: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A device answering every 1.2 catalog query with plausible values.
    ///
    /// `CL_DEVICE_NAME` is the label, `CL_DEVICE_TYPE` is `class`.
    pub fn typical(label: impl Into<String>, class: DeviceClass) -> Self {
        let label = label.into();
        let is_gpu = class.contains(DeviceClass::GPU);
        let (units, clock, global_mem, work_group) = if is_gpu {
            (28u32, 1_770u32, 8u64 << 30, 1024usize)
        } else {
            (16u32, 3_600u32, 32u64 << 30, 8192usize)
        };
        Self::new(label.clone())
            .with(CL_DEVICE_NAME, label)
            .with(CL_DEVICE_TYPE, class)
            .with(CL_DEVICE_VENDOR, "Mock Vendor")
            .with(CL_DEVICE_VENDOR_ID, 0x1234u32)
            .with(CL_DEVICE_VERSION, "OpenCL 1.2 mock")
            .with(CL_DRIVER_VERSION, "1.0.0")
            .with(CL_DEVICE_PROFILE, "FULL_PROFILE")
            .with(CL_DEVICE_OPENCL_C_VERSION, "OpenCL C 1.2 ")
            .with(CL_DEVICE_EXTENSIONS, "cl_khr_fp64 cl_khr_int64_base_atomics")
            .with(CL_DEVICE_BUILT_IN_KERNELS, "")
            .with(CL_DEVICE_AVAILABLE, true)
            .with(CL_DEVICE_COMPILER_AVAILABLE, true)
            .with(CL_DEVICE_LINKER_AVAILABLE, true)
            .with(CL_DEVICE_ADDRESS_BITS, 64u32)
            .with(CL_DEVICE_MAX_COMPUTE_UNITS, units)
            .with(CL_DEVICE_MAX_CLOCK_FREQUENCY, clock)
            .with(CL_DEVICE_MAX_CONSTANT_ARGS, 8u32)
            .with(CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE, 64u32)
            .with(CL_DEVICE_GLOBAL_MEM_CACHE_SIZE, 4u64 << 20)
            .with(CL_DEVICE_GLOBAL_MEM_SIZE, global_mem)
            .with(CL_DEVICE_LOCAL_MEM_SIZE, 64u64 << 10)
            .with(CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE, 64u64 << 10)
            .with(CL_DEVICE_MAX_MEM_ALLOC_SIZE, global_mem / 4)
            .with(CL_DEVICE_MAX_PARAMETER_SIZE, 4096usize)
            .with(CL_DEVICE_MAX_WORK_GROUP_SIZE, work_group)
            .with(CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS, 3u32)
            .with(CL_DEVICE_MAX_WORK_ITEM_SIZES, vec![work_group, work_group, 64])
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR, 4u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT, 2u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT, 1u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG, 1u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT, 1u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE, 1u32)
            .with(CL_DEVICE_PREFERRED_VECTOR_WIDTH_HALF, 0u32)
            .with(CL_DEVICE_PRINTF_BUFFER_SIZE, 1usize << 20)
            .with(CL_DEVICE_PROFILING_TIMER_RESOLUTION, 1usize)
    }

    /// Answer `key` with `value`.
    pub fn with(self, key: QueryKey, value: impl Into<MemoryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Answer the catalog entry `name` with `value`.
    ///
    /// Names the catalog does not know are ignored.
    pub fn with_property(self, name: &str, value: impl Into<MemoryValue>) -> Self {
        let descriptor = catalog::resolve(name);
        if descriptor.is_recognized() {
            self.set(descriptor.key, value);
        } else {
            warn!(device = %self.inner.label, name, "ignoring unknown property");
        }
        self
    }

    /// Reject `key` with `code` instead of answering it.
    pub fn failing(self, key: QueryKey, code: i32) -> Self {
        self.inner.failures.write().insert(key, code);
        self
    }

    /// Change a value in place; visible through every clone.
    pub fn set(&self, key: QueryKey, value: impl Into<MemoryValue>) {
        self.inner.values.write().insert(key, value.into());
    }

    pub fn remove(&self, key: QueryKey) {
        self.inner.values.write().remove(&key);
    }

    /// Every key queried so far, in order.
    pub fn queries(&self) -> Vec<QueryKey> {
        self.inner.log.lock().clone()
    }

    pub fn query_count(&self) -> usize {
        self.inner.log.lock().len()
    }

    pub fn clear_queries(&self) {
        self.inner.log.lock().clear();
    }

    fn lookup(&self, key: QueryKey) -> Result<MemoryValue> {
        self.inner.log.lock().push(key);
        if let Some(code) = self.inner.failures.read().get(&key) {
            return Err(self.rejected(key, *code));
        }
        self.inner
            .values
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| self.rejected(key, INVALID_VALUE))
    }

    fn rejected(&self, key: QueryKey, code: i32) -> Error {
        Error::QueryFailed { device: self.inner.label.clone(), key, code }
    }
}

impl std::fmt::Debug for MemoryDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDevice")
            .field("label", &self.inner.label)
            .field("values", &self.inner.values.read().len())
            .finish()
    }
}

impl ComputeDevice for MemoryDevice {
    fn label(&self) -> String {
        self.inner.label.clone()
    }

    fn query_bool(&self, key: QueryKey) -> Result<bool> {
        match self.lookup(key)? {
            MemoryValue::Bool(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_u32(&self, key: QueryKey) -> Result<u32> {
        match self.lookup(key)? {
            MemoryValue::U32(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_u64(&self, key: QueryKey) -> Result<u64> {
        match self.lookup(key)? {
            MemoryValue::U64(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_size(&self, key: QueryKey) -> Result<usize> {
        match self.lookup(key)? {
            MemoryValue::Size(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_size_array(&self, key: QueryKey) -> Result<Vec<usize>> {
        match self.lookup(key)? {
            MemoryValue::SizeArray(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_text(&self, key: QueryKey) -> Result<String> {
        match self.lookup(key)? {
            MemoryValue::Text(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }

    fn query_class_mask(&self, key: QueryKey) -> Result<u64> {
        match self.lookup(key)? {
            MemoryValue::ClassMask(v) => Ok(v),
            _ => Err(self.rejected(key, INVALID_VALUE)),
        }
    }
}

// ============================================================================
// MemoryDirectory
// ============================================================================

/// A named group of devices sharing one driver.
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    pub name: String,
    pub devices: Vec<MemoryDevice>,
}

/// Scripted device directory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    platforms: Vec<MemoryPlatform>,
    /// Enumeration fails with this message when set.
    broken: Option<String>,
    enumerations: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a platform; its devices follow every earlier platform's.
    pub fn with_platform(
        mut self,
        name: impl Into<String>,
        devices: impl IntoIterator<Item = MemoryDevice>,
    ) -> Self {
        self.platforms.push(MemoryPlatform {
            name: name.into(),
            devices: devices.into_iter().collect(),
        });
        self
    }

    /// Make every enumeration fail.
    pub fn broken(mut self, message: impl Into<String>) -> Self {
        self.broken = Some(message.into());
        self
    }

    pub fn platforms(&self) -> &[MemoryPlatform] {
        &self.platforms
    }

    /// How many times `devices()` has been called.
    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::Relaxed)
    }
}

impl DeviceDirectory for MemoryDirectory {
    type Device = MemoryDevice;

    fn devices(&self) -> Result<Vec<MemoryDevice>> {
        self.enumerations.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = &self.broken {
            return Err(Error::Directory(message.clone()));
        }
        let devices: Vec<MemoryDevice> = self
            .platforms
            .iter()
            .flat_map(|p| p.devices.iter().cloned())
            .collect();
        debug!(platforms = self.platforms.len(), devices = devices.len(), "enumerated memory devices");
        Ok(devices)
    }
}

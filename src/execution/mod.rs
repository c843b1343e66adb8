//! Query execution and grid assembly.
//!
//! Executes resolved descriptors against a `ComputeDevice` and places the
//! normalized results into a `ResultGrid`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::ComputeDevice;
use crate::catalog::{self, PropertyDescriptor};
use crate::model::{decode_class_mask, NativeWidth, ResultCell, ResultGrid, ValueKind};
use crate::{Error, QueryOptions, Result};

/// What to do when the backend rejects a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Abort the whole pass; no grid is returned.
    #[default]
    Abort,
    /// Store `ResultCell::QueryFailed` and keep going.
    MarkCell,
}

/// Run one typed query and normalize the result.
///
/// `PlatformRef` and `Unrecognized` never reach the backend and yield
/// `ResultCell::Empty`.
pub fn query<D: ComputeDevice + ?Sized>(
    device: &D,
    descriptor: &PropertyDescriptor,
) -> Result<ResultCell> {
    let key = descriptor.key;
    let cell = match descriptor.kind {
        ValueKind::Boolean => ResultCell::Bool(device.query_bool(key)?),
        ValueKind::UnsignedInt32 => ResultCell::UInt32(device.query_u32(key)?),
        ValueKind::UnsignedInt64 => match descriptor.width {
            NativeWidth::Fixed => ResultCell::UInt64(device.query_u64(key)?),
            NativeWidth::Word => ResultCell::UInt64(widen(device.query_size(key)?)),
        },
        ValueKind::UnsignedInt64Array => {
            let sizes = device.query_size_array(key)?;
            ResultCell::UInt64Array(sizes.into_iter().map(widen).collect())
        }
        ValueKind::Text => ResultCell::Text(device.query_text(key)?),
        ValueKind::DeviceClassMask => ResultCell::Text(decode_class_mask(device.query_class_mask(key)?)),
        // TODO: resolve the platform handle to its CL_PLATFORM_NAME once the
        // directory exposes platform queries.
        ValueKind::PlatformRef => ResultCell::Empty,
        ValueKind::Unrecognized => ResultCell::Empty,
    };
    Ok(cell)
}

fn widen(v: usize) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// Build the P×D grid for `requests` over `devices`.
///
/// Devices outer, properties inner; each cell resolves its name afresh.
/// Under `FailurePolicy::Abort` the first backend failure is returned and
/// no partial grid escapes.
pub fn assemble<D, S>(devices: &[D], requests: &[S], options: &QueryOptions) -> Result<ResultGrid>
where
    D: ComputeDevice,
    S: AsRef<str>,
{
    let num_properties = requests.len();
    let mut cells = Vec::with_capacity(num_properties * devices.len());

    for device in devices {
        for request in requests {
            let name = request.as_ref();
            let descriptor = catalog::resolve_for(name, options.api_version);
            debug!(
                device = %device.label(),
                property = name,
                kind = %descriptor.kind,
                "resolving cell"
            );
            let cell = match query(device, descriptor) {
                Ok(cell) => cell,
                Err(Error::QueryFailed { device: label, key, code })
                    if options.on_query_failure == FailurePolicy::MarkCell =>
                {
                    warn!(device = %label, property = name, %key, code, "query failed; marking cell");
                    ResultCell::QueryFailed { code }
                }
                Err(e) => return Err(e),
            };
            cells.push(cell);
        }
    }

    let grid = ResultGrid::from_cells(num_properties, devices.len(), cells)
        .ok_or_else(|| Error::Internal("grid size does not match request × device count".into()))?;
    info!(properties = grid.num_properties(), devices = grid.num_devices(), "assembled result grid");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryDevice;
    use crate::catalog::{keys::*, resolve, ApiVersion};
    use crate::model::DeviceClass;
    use pretty_assertions::assert_eq;

    fn mock_gpu() -> MemoryDevice {
        MemoryDevice::new("MockGPU")
            .with(CL_DEVICE_NAME, "MockGPU")
            .with(CL_DEVICE_AVAILABLE, true)
            .with(CL_DEVICE_ADDRESS_BITS, 64u32)
            .with(CL_DEVICE_GLOBAL_MEM_SIZE, 8u64 << 30)
            .with(CL_DEVICE_MAX_WORK_GROUP_SIZE, 1024usize)
            .with(CL_DEVICE_MAX_WORK_ITEM_SIZES, vec![1024usize, 1024, 64])
            .with(CL_DEVICE_TYPE, DeviceClass::GPU | DeviceClass::DEFAULT)
            .with(CL_DEVICE_PLATFORM, 7u64)
    }

    #[test]
    fn test_query_each_kind() {
        let dev = mock_gpu();
        assert_eq!(query(&dev, resolve("CL_DEVICE_AVAILABLE")).unwrap(), ResultCell::Bool(true));
        assert_eq!(query(&dev, resolve("CL_DEVICE_ADDRESS_BITS")).unwrap(), ResultCell::UInt32(64));
        assert_eq!(query(&dev, resolve("CL_DEVICE_GLOBAL_MEM_SIZE")).unwrap(), ResultCell::UInt64(8 << 30));
        assert_eq!(query(&dev, resolve("CL_DEVICE_MAX_WORK_GROUP_SIZE")).unwrap(), ResultCell::UInt64(1024));
        assert_eq!(
            query(&dev, resolve("CL_DEVICE_MAX_WORK_ITEM_SIZES")).unwrap(),
            ResultCell::UInt64Array(vec![1024, 1024, 64])
        );
        assert_eq!(query(&dev, resolve("CL_DEVICE_NAME")).unwrap(), ResultCell::Text("MockGPU".into()));
        assert_eq!(query(&dev, resolve("CL_DEVICE_TYPE")).unwrap(), ResultCell::Text("gpu | default".into()));
    }

    #[test]
    fn test_inert_kinds_skip_backend() {
        let dev = mock_gpu();
        assert_eq!(query(&dev, resolve("CL_DEVICE_PLATFORM")).unwrap(), ResultCell::Empty);
        assert_eq!(query(&dev, resolve("NOT_A_PROPERTY")).unwrap(), ResultCell::Empty);
        assert_eq!(dev.query_count(), 0);
    }

    #[test]
    fn test_word_sized_query_uses_size_path() {
        // stored as u64 instead of size_t: the size query must reject it
        let dev = MemoryDevice::new("d").with(CL_DEVICE_MAX_WORK_GROUP_SIZE, 1024u64);
        assert!(query(&dev, resolve("CL_DEVICE_MAX_WORK_GROUP_SIZE")).is_err());
    }

    #[test]
    fn test_widen_keeps_full_word() {
        assert_eq!(widen(0), 0);
        assert_eq!(widen(4096), 4096);
        assert_eq!(widen(usize::MAX), u64::try_from(usize::MAX).unwrap_or(u64::MAX));

        let dev = MemoryDevice::new("d").with(CL_DEVICE_PRINTF_BUFFER_SIZE, usize::MAX);
        assert_eq!(
            query(&dev, resolve("CL_DEVICE_PRINTF_BUFFER_SIZE")).unwrap(),
            ResultCell::UInt64(usize::MAX as u64)
        );
    }

    #[test]
    fn test_assemble_layout() {
        let a = mock_gpu();
        let b = MemoryDevice::typical("cpu0", DeviceClass::CPU);
        let grid = assemble(&[a, b], &["CL_DEVICE_NAME", "CL_DEVICE_ADDRESS_BITS"], &QueryOptions::default()).unwrap();

        assert_eq!(grid.dims(), (2, 2));
        assert_eq!(
            grid.cells(),
            &[
                ResultCell::Text("MockGPU".into()),
                ResultCell::UInt32(64),
                ResultCell::Text("cpu0".into()),
                ResultCell::UInt32(64),
            ]
        );
    }

    #[test]
    fn test_assemble_queries_every_cell() {
        let dev = mock_gpu();
        let requests = ["CL_DEVICE_NAME", "CL_DEVICE_NAME", "CL_DEVICE_NAME"];
        let grid = assemble(std::slice::from_ref(&dev), &requests, &QueryOptions::default()).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(dev.queries(), vec![CL_DEVICE_NAME; 3]);
    }

    #[test]
    fn test_assemble_abort_on_failure() {
        let dev = mock_gpu().failing(CL_DEVICE_NAME, -33);
        let err = assemble(&[dev], &["CL_DEVICE_ADDRESS_BITS", "CL_DEVICE_NAME"], &QueryOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::QueryFailed { code: -33, .. }));
    }

    #[test]
    fn test_assemble_mark_cell_on_failure() {
        let dev = mock_gpu().failing(CL_DEVICE_NAME, -33);
        let options = QueryOptions::default().with_failure_policy(FailurePolicy::MarkCell);
        let grid = assemble(&[dev], &["CL_DEVICE_NAME", "CL_DEVICE_ADDRESS_BITS"], &options).unwrap();
        assert_eq!(grid.get(0, 0), Some(&ResultCell::QueryFailed { code: -33 }));
        assert_eq!(grid.get(1, 0), Some(&ResultCell::UInt32(64)));
    }

    #[test]
    fn test_assemble_version_gating() {
        let dev = mock_gpu().with(CL_DEVICE_MAX_ON_DEVICE_QUEUES, 4u32);
        let requests = ["CL_DEVICE_MAX_ON_DEVICE_QUEUES"];

        let grid = assemble(std::slice::from_ref(&dev), &requests, &QueryOptions::default()).unwrap();
        assert_eq!(grid.get(0, 0), Some(&ResultCell::Empty));

        let options = QueryOptions::default().with_api_version(ApiVersion::V2_0);
        let grid = assemble(std::slice::from_ref(&dev), &requests, &options).unwrap();
        assert_eq!(grid.get(0, 0), Some(&ResultCell::UInt32(4)));
    }
}

//! # Property Catalog
//!
//! Static, process-wide table mapping canonical property names to a
//! backend query key and a result shape. Built once, never mutated,
//! safe to read from any number of threads.
//!
//! Lookups are exact: case-sensitive, no trimming, no aliasing. A name
//! that is not in the table resolves to [`UNRECOGNIZED`], which is a
//! normal outcome and not an error.

pub mod keys;

use std::sync::LazyLock;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{NativeWidth, ValueKind};
pub use keys::QueryKey;
use keys::*;

// ============================================================================
// API versions
// ============================================================================

/// Backend API version a query was introduced in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    V1_2,
    V2_0,
    V2_1,
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::V1_2 => write!(f, "1.2"),
            ApiVersion::V2_0 => write!(f, "2.0"),
            ApiVersion::V2_1 => write!(f, "2.1"),
        }
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub key: QueryKey,
    pub kind: ValueKind,
    /// Only meaningful for integer kinds.
    pub width: NativeWidth,
    pub since: ApiVersion,
}

impl PropertyDescriptor {
    const fn fixed(name: &'static str, key: QueryKey, kind: ValueKind) -> Self {
        Self { name, key, kind, width: NativeWidth::Fixed, since: ApiVersion::V1_2 }
    }

    const fn word(name: &'static str, key: QueryKey, kind: ValueKind) -> Self {
        Self { name, key, kind, width: NativeWidth::Word, since: ApiVersion::V1_2 }
    }

    const fn since(mut self, version: ApiVersion) -> Self {
        self.since = version;
        self
    }

    pub fn is_recognized(&self) -> bool {
        self.kind != ValueKind::Unrecognized
    }
}

/// Descriptor returned for any name the catalog does not know.
pub static UNRECOGNIZED: PropertyDescriptor = PropertyDescriptor {
    name: "",
    key: QueryKey(0),
    kind: ValueKind::Unrecognized,
    width: NativeWidth::Fixed,
    since: ApiVersion::V1_2,
};

// ============================================================================
// Table
// ============================================================================

use ValueKind::{
    Boolean, DeviceClassMask, PlatformRef, Text, UnsignedInt32, UnsignedInt64,
    UnsignedInt64Array,
};

type P = PropertyDescriptor;

/// The catalog. `CL_DEVICE_MAX_PARAMETER_SIZE` appears twice; both rows
/// are identical and resolve the same way.
static TABLE: &[PropertyDescriptor] = &[
    P::fixed("CL_DEVICE_ADDRESS_BITS", CL_DEVICE_ADDRESS_BITS, UnsignedInt32),
    P::fixed("CL_DEVICE_AVAILABLE", CL_DEVICE_AVAILABLE, Boolean),
    P::fixed("CL_DEVICE_BUILT_IN_KERNELS", CL_DEVICE_BUILT_IN_KERNELS, Text),
    P::fixed("CL_DEVICE_COMPILER_AVAILABLE", CL_DEVICE_COMPILER_AVAILABLE, Boolean),
    P::fixed("CL_DEVICE_EXTENSIONS", CL_DEVICE_EXTENSIONS, Text),
    P::fixed("CL_DEVICE_GLOBAL_MEM_CACHE_SIZE", CL_DEVICE_GLOBAL_MEM_CACHE_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE", CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE, UnsignedInt32),
    P::fixed("CL_DEVICE_GLOBAL_MEM_SIZE", CL_DEVICE_GLOBAL_MEM_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_LINKER_AVAILABLE", CL_DEVICE_LINKER_AVAILABLE, Boolean),
    P::fixed("CL_DEVICE_LOCAL_MEM_SIZE", CL_DEVICE_LOCAL_MEM_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_MAX_CLOCK_FREQUENCY", CL_DEVICE_MAX_CLOCK_FREQUENCY, UnsignedInt32),
    P::fixed("CL_DEVICE_MAX_COMPUTE_UNITS", CL_DEVICE_MAX_COMPUTE_UNITS, UnsignedInt32),
    P::fixed("CL_DEVICE_MAX_CONSTANT_ARGS", CL_DEVICE_MAX_CONSTANT_ARGS, UnsignedInt32),
    P::fixed("CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE", CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_MAX_MEM_ALLOC_SIZE", CL_DEVICE_MAX_MEM_ALLOC_SIZE, UnsignedInt64),
    P::word("CL_DEVICE_MAX_PARAMETER_SIZE", CL_DEVICE_MAX_PARAMETER_SIZE, UnsignedInt64),
    P::word("CL_DEVICE_MAX_WORK_GROUP_SIZE", CL_DEVICE_MAX_WORK_GROUP_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS", CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS, UnsignedInt32),
    P::word("CL_DEVICE_MAX_WORK_ITEM_SIZES", CL_DEVICE_MAX_WORK_ITEM_SIZES, UnsignedInt64Array),
    P::fixed("CL_DEVICE_OPENCL_C_VERSION", CL_DEVICE_OPENCL_C_VERSION, Text),
    P::word("CL_DEVICE_MAX_PARAMETER_SIZE", CL_DEVICE_MAX_PARAMETER_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_NAME", CL_DEVICE_NAME, Text),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR", CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT", CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT", CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG", CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT", CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE", CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE, UnsignedInt32),
    P::fixed("CL_DEVICE_PREFERRED_VECTOR_WIDTH_HALF", CL_DEVICE_PREFERRED_VECTOR_WIDTH_HALF, UnsignedInt32),
    P::word("CL_DEVICE_PRINTF_BUFFER_SIZE", CL_DEVICE_PRINTF_BUFFER_SIZE, UnsignedInt64),
    P::fixed("CL_DEVICE_PROFILE", CL_DEVICE_PROFILE, Text),
    P::word("CL_DEVICE_PROFILING_TIMER_RESOLUTION", CL_DEVICE_PROFILING_TIMER_RESOLUTION, UnsignedInt64),
    P::fixed("CL_DEVICE_VENDOR", CL_DEVICE_VENDOR, Text),
    P::fixed("CL_DEVICE_VENDOR_ID", CL_DEVICE_VENDOR_ID, UnsignedInt32),
    P::fixed("CL_DEVICE_VERSION", CL_DEVICE_VERSION, Text),
    P::fixed("CL_DRIVER_VERSION", CL_DRIVER_VERSION, Text),
    // Need a further lookup to be meaningful
    P::fixed("CL_DEVICE_PLATFORM", CL_DEVICE_PLATFORM, PlatformRef),
    P::fixed("CL_DEVICE_TYPE", CL_DEVICE_TYPE, DeviceClassMask),
    // Newer than 1.2; gated by QueryOptions::api_version
    P::word("CL_DEVICE_MAX_GLOBAL_VARIABLE_SIZE", CL_DEVICE_MAX_GLOBAL_VARIABLE_SIZE, UnsignedInt64)
        .since(ApiVersion::V2_0),
    P::fixed("CL_DEVICE_MAX_ON_DEVICE_QUEUES", CL_DEVICE_MAX_ON_DEVICE_QUEUES, UnsignedInt32)
        .since(ApiVersion::V2_0),
    P::fixed("CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE", CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE, UnsignedInt32)
        .since(ApiVersion::V2_0),
    P::fixed("CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE", CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE, UnsignedInt32)
        .since(ApiVersion::V2_0),
    P::fixed("CL_DEVICE_MAX_NUM_SUB_GROUPS", CL_DEVICE_MAX_NUM_SUB_GROUPS, UnsignedInt32)
        .since(ApiVersion::V2_1),
];

static INDEX: LazyLock<HashMap<&'static str, &'static PropertyDescriptor>> = LazyLock::new(|| {
    let mut index = HashMap::with_capacity(TABLE.len());
    for descriptor in TABLE {
        index.insert(descriptor.name, descriptor);
    }
    index
});

// ============================================================================
// Lookup
// ============================================================================

/// Every catalog row in table order, duplicates included.
pub fn descriptors() -> &'static [PropertyDescriptor] {
    TABLE
}

/// Resolve a name with no version gating.
///
/// Never fails; unknown names yield [`UNRECOGNIZED`].
pub fn resolve(name: &str) -> &'static PropertyDescriptor {
    INDEX.get(name).copied().unwrap_or(&UNRECOGNIZED)
}

/// Resolve a name as seen by a backend speaking `version`.
///
/// Entries introduced after `version` resolve to [`UNRECOGNIZED`].
pub fn resolve_for(name: &str, version: ApiVersion) -> &'static PropertyDescriptor {
    let descriptor = resolve(name);
    if descriptor.since > version {
        return &UNRECOGNIZED;
    }
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_known() {
        let d = resolve("CL_DEVICE_NAME");
        assert_eq!(d.key, CL_DEVICE_NAME);
        assert_eq!(d.kind, ValueKind::Text);

        let d = resolve("CL_DEVICE_MAX_WORK_ITEM_SIZES");
        assert_eq!(d.kind, ValueKind::UnsignedInt64Array);
        assert_eq!(d.width, NativeWidth::Word);
    }

    #[test]
    fn test_resolve_is_exact() {
        assert!(!resolve("cl_device_name").is_recognized());
        assert!(!resolve(" CL_DEVICE_NAME").is_recognized());
        assert!(!resolve("CL_DEVICE_NAME ").is_recognized());
        assert!(!resolve("").is_recognized());
        assert_eq!(resolve("NOPE"), &UNRECOGNIZED);
    }

    #[test]
    fn test_duplicate_rows_are_identical() {
        let rows: Vec<_> = TABLE
            .iter()
            .filter(|d| d.name == "CL_DEVICE_MAX_PARAMETER_SIZE")
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
        assert_eq!(resolve("CL_DEVICE_MAX_PARAMETER_SIZE"), rows[0]);
    }

    #[test]
    fn test_every_name_resolves_to_its_row() {
        for row in descriptors() {
            assert_eq!(resolve(row.name), row, "{}", row.name);
        }
    }

    #[test]
    fn test_table_shape() {
        let v12 = TABLE.iter().filter(|d| d.since == ApiVersion::V1_2).count();
        assert_eq!(v12, 38);
        assert_eq!(INDEX.len(), TABLE.len() - 1);
    }

    #[test]
    fn test_version_gating() {
        let name = "CL_DEVICE_MAX_NUM_SUB_GROUPS";
        assert!(resolve(name).is_recognized());
        assert!(!resolve_for(name, ApiVersion::V1_2).is_recognized());
        assert!(!resolve_for(name, ApiVersion::V2_0).is_recognized());
        assert!(resolve_for(name, ApiVersion::V2_1).is_recognized());

        let name = "CL_DEVICE_MAX_GLOBAL_VARIABLE_SIZE";
        assert!(!resolve_for(name, ApiVersion::V1_2).is_recognized());
        assert!(resolve_for(name, ApiVersion::V2_0).is_recognized());

        assert!(resolve_for("CL_DEVICE_NAME", ApiVersion::V1_2).is_recognized());
    }
}

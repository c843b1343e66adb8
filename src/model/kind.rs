//! Result shapes a device property can take.

use serde::{Deserialize, Serialize};

/// Closed set of result shapes.
///
/// Every catalog entry carries one of these; the executor matches on it
/// exhaustively to pick the correctly typed backend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Boolean,
    UnsignedInt32,
    /// Also used for machine-word "size" quantities, widened on store.
    UnsignedInt64,
    /// Variable length; the backend decides the length per device.
    UnsignedInt64Array,
    Text,
    /// Back-reference to the owning platform. Not resolved; yields empty.
    PlatformRef,
    /// Device-class bitmask, decoded into a `" | "`-joined label list.
    DeviceClassMask,
    /// Name not in the catalog.
    Unrecognized,
}

/// Native width of an integer query before widening to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeWidth {
    /// Fixed-width backend type (`cl_uint`, `cl_ulong`, ...).
    Fixed,
    /// Host machine word (`size_t`).
    Word,
}

impl ValueKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::UnsignedInt32 => "UINT32",
            ValueKind::UnsignedInt64 => "UINT64",
            ValueKind::UnsignedInt64Array => "UINT64_ARRAY",
            ValueKind::Text => "TEXT",
            ValueKind::PlatformRef => "PLATFORM",
            ValueKind::DeviceClassMask => "DEVICE_CLASS",
            ValueKind::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Kinds that never touch the backend.
    pub fn is_inert(&self) -> bool {
        matches!(self, ValueKind::PlatformRef | ValueKind::Unrecognized)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

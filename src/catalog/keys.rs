//! Backend-native query keys (`cl_device_info` values).

use serde::{Deserialize, Serialize};

/// Opaque backend attribute identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(pub u32);

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

pub const CL_DEVICE_TYPE: QueryKey = QueryKey(0x1000);
pub const CL_DEVICE_VENDOR_ID: QueryKey = QueryKey(0x1001);
pub const CL_DEVICE_MAX_COMPUTE_UNITS: QueryKey = QueryKey(0x1002);
pub const CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS: QueryKey = QueryKey(0x1003);
pub const CL_DEVICE_MAX_WORK_GROUP_SIZE: QueryKey = QueryKey(0x1004);
pub const CL_DEVICE_MAX_WORK_ITEM_SIZES: QueryKey = QueryKey(0x1005);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR: QueryKey = QueryKey(0x1006);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT: QueryKey = QueryKey(0x1007);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT: QueryKey = QueryKey(0x1008);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG: QueryKey = QueryKey(0x1009);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT: QueryKey = QueryKey(0x100A);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE: QueryKey = QueryKey(0x100B);
pub const CL_DEVICE_MAX_CLOCK_FREQUENCY: QueryKey = QueryKey(0x100C);
pub const CL_DEVICE_ADDRESS_BITS: QueryKey = QueryKey(0x100D);
pub const CL_DEVICE_MAX_MEM_ALLOC_SIZE: QueryKey = QueryKey(0x1010);
pub const CL_DEVICE_MAX_PARAMETER_SIZE: QueryKey = QueryKey(0x1017);
pub const CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE: QueryKey = QueryKey(0x101D);
pub const CL_DEVICE_GLOBAL_MEM_CACHE_SIZE: QueryKey = QueryKey(0x101E);
pub const CL_DEVICE_GLOBAL_MEM_SIZE: QueryKey = QueryKey(0x101F);
pub const CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE: QueryKey = QueryKey(0x1020);
pub const CL_DEVICE_MAX_CONSTANT_ARGS: QueryKey = QueryKey(0x1021);
pub const CL_DEVICE_LOCAL_MEM_SIZE: QueryKey = QueryKey(0x1023);
pub const CL_DEVICE_PROFILING_TIMER_RESOLUTION: QueryKey = QueryKey(0x1025);
pub const CL_DEVICE_AVAILABLE: QueryKey = QueryKey(0x1027);
pub const CL_DEVICE_COMPILER_AVAILABLE: QueryKey = QueryKey(0x1028);
pub const CL_DEVICE_NAME: QueryKey = QueryKey(0x102B);
pub const CL_DEVICE_VENDOR: QueryKey = QueryKey(0x102C);
pub const CL_DRIVER_VERSION: QueryKey = QueryKey(0x102D);
pub const CL_DEVICE_PROFILE: QueryKey = QueryKey(0x102E);
pub const CL_DEVICE_VERSION: QueryKey = QueryKey(0x102F);
pub const CL_DEVICE_EXTENSIONS: QueryKey = QueryKey(0x1030);
pub const CL_DEVICE_PLATFORM: QueryKey = QueryKey(0x1031);
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_HALF: QueryKey = QueryKey(0x1034);
pub const CL_DEVICE_OPENCL_C_VERSION: QueryKey = QueryKey(0x103D);
pub const CL_DEVICE_LINKER_AVAILABLE: QueryKey = QueryKey(0x103E);
pub const CL_DEVICE_BUILT_IN_KERNELS: QueryKey = QueryKey(0x103F);
pub const CL_DEVICE_PRINTF_BUFFER_SIZE: QueryKey = QueryKey(0x1049);

// OpenCL 2.0
pub const CL_DEVICE_MAX_GLOBAL_VARIABLE_SIZE: QueryKey = QueryKey(0x104D);
pub const CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE: QueryKey = QueryKey(0x104F);
pub const CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE: QueryKey = QueryKey(0x1050);
pub const CL_DEVICE_MAX_ON_DEVICE_QUEUES: QueryKey = QueryKey(0x1051);

// OpenCL 2.1
pub const CL_DEVICE_MAX_NUM_SUB_GROUPS: QueryKey = QueryKey(0x105C);

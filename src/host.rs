//! Scripting-host surface.
//!
//! The host hands over a dynamic value (modelled as `serde_json::Value`)
//! that should be a list of property names, and gets back a cell array
//! of host-native arrays. Shape validation happens here, before any
//! backend is touched.
//!
//! ```text
//! host value ─→ parse_requests() ─→ Vec<String> ─→ assemble() ─→ ResultGrid
//!                                                                   │
//!                     HostCellArray ←── HostArray::from(&ResultCell) ┘
//! ```

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::model::{ResultCell, ResultGrid};
use crate::{Error, Result};

// ============================================================================
// Inbound
// ============================================================================

/// Input rejected before any device was queried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputShapeError {
    #[error("The input must be an array of property-name strings.")]
    NonCellInput,

    #[error(
        "The array contains a non-string element at index {index}. \
         Convert every property name to a string."
    )]
    NonCharInput { index: usize },
}

impl InputShapeError {
    /// Stable identifier a host can branch on.
    pub fn id(&self) -> &'static str {
        match self {
            InputShapeError::NonCellInput => "devinfo:query:NonCellInput",
            InputShapeError::NonCharInput { .. } => "devinfo:query:NonCharInput",
        }
    }
}

/// Validate the host argument and extract the requested names.
///
/// `None` means the host passed no argument at all.
pub fn parse_requests(input: Option<&JsonValue>) -> Result<Vec<String>> {
    let Some(JsonValue::Array(items)) = input else {
        return Err(Error::InputShape(InputShapeError::NonCellInput));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::String(name) => Ok(name.clone()),
            _ => Err(Error::InputShape(InputShapeError::NonCharInput { index })),
        })
        .collect()
}

// ============================================================================
// Outbound
// ============================================================================

/// One host-native array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HostArray {
    /// 1×1 logical.
    Logical(bool),
    /// 1×1 uint32.
    UInt32(u32),
    /// 1×1 uint64.
    UInt64(u64),
    /// 1×N uint64 row vector.
    UInt64Row(Vec<u64>),
    /// Character row vector.
    Char(String),
    /// 0×0 double.
    Empty,
    /// Backend status code of a failed query.
    Failed(i32),
}

impl HostArray {
    /// `(rows, columns)` as the host sees it.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            HostArray::Logical(_) | HostArray::UInt32(_) | HostArray::UInt64(_) => (1, 1),
            HostArray::Failed(_) => (1, 1),
            HostArray::UInt64Row(v) => (1, v.len()),
            HostArray::Char(s) if s.is_empty() => (0, 0),
            HostArray::Char(s) => (1, s.chars().count()),
            HostArray::Empty => (0, 0),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            HostArray::Logical(b) => json!(b),
            HostArray::UInt32(v) => json!(v),
            HostArray::UInt64(v) => json!(v),
            HostArray::UInt64Row(v) => json!(v),
            HostArray::Char(s) => json!(s),
            HostArray::Empty => json!([]),
            HostArray::Failed(code) => json!({ "error": code }),
        }
    }
}

impl From<&ResultCell> for HostArray {
    fn from(cell: &ResultCell) -> Self {
        match cell {
            ResultCell::Bool(b) => HostArray::Logical(*b),
            ResultCell::UInt32(v) => HostArray::UInt32(*v),
            ResultCell::UInt64(v) => HostArray::UInt64(*v),
            ResultCell::UInt64Array(v) => HostArray::UInt64Row(v.clone()),
            ResultCell::Text(s) => HostArray::Char(s.clone()),
            ResultCell::Empty => HostArray::Empty,
            ResultCell::QueryFailed { code } => HostArray::Failed(*code),
        }
    }
}

/// P×D host cell array, column-major like the grid it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCellArray {
    rows: usize,
    cols: usize,
    data: Vec<HostArray>,
}

impl HostCellArray {
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&HostArray> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row + col * self.rows)
    }

    /// Elements in column-major order.
    pub fn data(&self) -> &[HostArray] {
        &self.data
    }

    /// `{"dims": [P, D], "rows": [[p0d0, p0d1, ...], [p1d0, ...], ...]}`.
    ///
    /// `dims` keeps the device count visible when there are no rows.
    pub fn to_json(&self) -> JsonValue {
        let rows: Vec<JsonValue> = (0..self.rows)
            .map(|r| {
                let row: Vec<JsonValue> = (0..self.cols)
                    .filter_map(|c| self.get(r, c))
                    .map(HostArray::to_json)
                    .collect();
                JsonValue::Array(row)
            })
            .collect();
        json!({ "dims": [self.rows, self.cols], "rows": rows })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }
}

impl From<&ResultGrid> for HostCellArray {
    fn from(grid: &ResultGrid) -> Self {
        let (rows, cols) = grid.dims();
        Self {
            rows,
            cols,
            data: grid.cells().iter().map(HostArray::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_requests() {
        let input = json!(["CL_DEVICE_NAME", "CL_DEVICE_NAME", "bogus"]);
        assert_eq!(
            parse_requests(Some(&input)).unwrap(),
            vec!["CL_DEVICE_NAME", "CL_DEVICE_NAME", "bogus"]
        );
        assert!(parse_requests(Some(&json!([]))).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        for input in [None, Some(json!("CL_DEVICE_NAME")), Some(json!(3)), Some(json!(null))] {
            match parse_requests(input.as_ref()) {
                Err(Error::InputShape(e)) => assert_eq!(e.id(), "devinfo:query:NonCellInput"),
                other => panic!("expected NonCellInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_non_string_element() {
        let input = json!(["CL_DEVICE_NAME", 4, "CL_DEVICE_VENDOR"]);
        match parse_requests(Some(&input)) {
            Err(Error::InputShape(e)) => {
                assert_eq!(e, InputShapeError::NonCharInput { index: 1 });
                assert_eq!(e.id(), "devinfo:query:NonCharInput");
            }
            other => panic!("expected NonCharInput, got {other:?}"),
        }
    }

    #[test]
    fn test_host_array_dims() {
        assert_eq!(HostArray::from(&ResultCell::Bool(true)).dims(), (1, 1));
        assert_eq!(HostArray::from(&ResultCell::UInt64Array(vec![1, 2, 3])).dims(), (1, 3));
        assert_eq!(HostArray::from(&ResultCell::UInt64Array(Vec::new())).dims(), (1, 0));
        assert_eq!(HostArray::from(&ResultCell::Text("gpu".into())).dims(), (1, 3));
        assert_eq!(HostArray::from(&ResultCell::Empty).dims(), (0, 0));
    }

    #[test]
    fn test_empty_is_never_null() {
        assert_eq!(HostArray::Empty.to_json(), json!([]));
    }

    #[test]
    fn test_cell_array_from_grid() {
        let grid = ResultGrid::from_cells(
            2,
            2,
            vec![
                ResultCell::Text("a".into()),
                ResultCell::UInt32(1),
                ResultCell::Text("b".into()),
                ResultCell::Empty,
            ],
        )
        .unwrap();
        let cells = HostCellArray::from(&grid);
        assert_eq!(cells.dims(), (2, 2));
        assert_eq!(cells.get(0, 1), Some(&HostArray::Char("b".into())));
        assert_eq!(cells.get(1, 1), Some(&HostArray::Empty));
        assert_eq!(cells.to_json(), json!({ "dims": [2, 2], "rows": [["a", "b"], [1, []]] }));
        assert_eq!(
            cells.to_json_string().unwrap(),
            r#"{"dims":[2,2],"rows":[["a","b"],[1,[]]]}"#
        );
    }

    #[test]
    fn test_zero_rows_keep_device_count() {
        let grid = ResultGrid::from_cells(0, 3, Vec::new()).unwrap();
        let cells = HostCellArray::from(&grid);
        assert_eq!(cells.to_json(), json!({ "dims": [0, 3], "rows": [] }));

        let none = HostCellArray::from(&ResultGrid::from_cells(0, 0, Vec::new()).unwrap());
        assert_ne!(cells.to_json(), none.to_json());
    }
}

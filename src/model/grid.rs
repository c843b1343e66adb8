//! Property × device result grid.

use serde::{Deserialize, Serialize};

use super::ResultCell;

/// P×D grid of result cells.
///
/// Row = property (request order), column = device (directory order).
/// Storage is property-fastest: cell `(p, d)` lives at `p + d * P`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ResultGrid {
    num_properties: usize,
    num_devices: usize,
    cells: Vec<ResultCell>,
}

/// Wire form of a grid, checked before it becomes a `ResultGrid`.
#[derive(Deserialize)]
struct RawGrid {
    num_properties: usize,
    num_devices: usize,
    cells: Vec<ResultCell>,
}

impl TryFrom<RawGrid> for ResultGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let len = raw.cells.len();
        let (p, d) = (raw.num_properties, raw.num_devices);
        Self::from_cells(p, d, raw.cells)
            .ok_or_else(|| format!("grid of {p}x{d} cannot hold {len} cells"))
    }
}

impl ResultGrid {
    /// Build from cells already in storage order.
    ///
    /// Returns `None` if `cells.len() != num_properties * num_devices`.
    pub fn from_cells(
        num_properties: usize,
        num_devices: usize,
        cells: Vec<ResultCell>,
    ) -> Option<Self> {
        if cells.len() != num_properties * num_devices {
            return None;
        }
        Some(Self { num_properties, num_devices, cells })
    }

    /// Storage index of `(property, device)`.
    pub fn index(&self, property: usize, device: usize) -> usize {
        property + device * self.num_properties
    }

    pub fn num_properties(&self) -> usize { self.num_properties }
    pub fn num_devices(&self) -> usize { self.num_devices }

    /// `(rows, columns)`, i.e. `(P, D)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.num_properties, self.num_devices)
    }

    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn get(&self, property: usize, device: usize) -> Option<&ResultCell> {
        if property >= self.num_properties || device >= self.num_devices {
            return None;
        }
        self.cells.get(self.index(property, device))
    }

    /// All properties for one device; contiguous in storage.
    pub fn column(&self, device: usize) -> Option<&[ResultCell]> {
        if device >= self.num_devices {
            return None;
        }
        let start = device * self.num_properties;
        self.cells.get(start..start + self.num_properties)
    }

    /// One property across every device.
    pub fn row(&self, property: usize) -> impl Iterator<Item = &ResultCell> + '_ {
        let stride = self.num_properties.max(1);
        let devices = if property < self.num_properties { self.num_devices } else { 0 };
        self.cells.iter().skip(property).step_by(stride).take(devices)
    }

    /// Cells in storage order.
    pub fn cells(&self) -> &[ResultCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<ResultCell> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_three() -> ResultGrid {
        // p0d0, p1d0, p0d1, p1d1, p0d2, p1d2
        let cells = (0..6u32).map(ResultCell::UInt32).collect();
        ResultGrid::from_cells(2, 3, cells).unwrap()
    }

    #[test]
    fn test_property_fastest_layout() {
        let grid = two_by_three();
        assert_eq!(grid.dims(), (2, 3));
        assert_eq!(grid.get(0, 0), Some(&ResultCell::UInt32(0)));
        assert_eq!(grid.get(1, 0), Some(&ResultCell::UInt32(1)));
        assert_eq!(grid.get(0, 1), Some(&ResultCell::UInt32(2)));
        assert_eq!(grid.get(1, 2), Some(&ResultCell::UInt32(5)));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_rows_and_columns() {
        let grid = two_by_three();
        let row: Vec<_> = grid.row(1).cloned().collect();
        assert_eq!(row, vec![ResultCell::UInt32(1), ResultCell::UInt32(3), ResultCell::UInt32(5)]);
        assert_eq!(grid.column(1).unwrap(), &[ResultCell::UInt32(2), ResultCell::UInt32(3)]);
        assert!(grid.column(3).is_none());
        assert_eq!(grid.row(9).count(), 0);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(ResultGrid::from_cells(2, 2, vec![ResultCell::Empty]).is_none());
    }

    #[test]
    fn test_deserialize_checks_size() {
        let grid = two_by_three();
        let text = serde_json::to_string(&grid).unwrap();
        let back: ResultGrid = serde_json::from_str(&text).unwrap();
        assert_eq!(back, grid);

        let short = r#"{"num_properties":3,"num_devices":2,"cells":[{"type":"Empty"}]}"#;
        let err = serde_json::from_str::<ResultGrid>(short).unwrap_err();
        assert!(err.to_string().contains("3x2"));
    }

    #[test]
    fn test_zero_devices() {
        let grid = ResultGrid::from_cells(1, 0, Vec::new()).unwrap();
        assert_eq!(grid.dims(), (1, 0));
        assert!(grid.is_empty());
        assert_eq!(grid.row(0).count(), 0);
    }
}

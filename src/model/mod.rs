//! # Result Model
//!
//! Plain data that crosses every boundary: catalog ↔ executor ↔ host.
//!
//! Design rule: no backend handles here. This module is pure data:
//! no I/O, no state.

pub mod kind;
pub mod cell;
pub mod grid;
pub mod device_class;

pub use kind::{ValueKind, NativeWidth};
pub use cell::ResultCell;
pub use grid::ResultGrid;
pub use device_class::{DeviceClass, decode_class_mask, CLASS_SEPARATOR};

//! Adapter implementations for port traits.
//!
//! - `live/` renders symbols with the `qrcode` and `barcoders` crates
//! - `storage/` keeps key-value state in a JSON file or in memory
//! - `surface` tracks the popup and side panel

pub mod live;
pub mod storage;
pub mod surface;

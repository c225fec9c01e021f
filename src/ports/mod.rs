//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod renderer;
pub mod storage;
pub mod surface;

pub use renderer::{RenderedImage, SymbolRenderer};
pub use storage::KeyValueStore;
pub use surface::{SurfaceAck, SurfaceHost, SurfaceRequest};

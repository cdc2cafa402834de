//! Trellis Core
//!
//! Shared primitives for the Trellis native view engine:
//!
//! - **Geometry**: points, sizes, rectangles and offsets in logical pixels
//! - **Colors**: RGBA colors with hex string parsing
//! - **Identifiers**: arena keys for views and windows, plus the explicit
//!   public id allocator owned by the application registry
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Color, IdAllocator, Rect};
//!
//! let mut ids = IdAllocator::new();
//! assert_eq!(ids.allocate(), Some(1));
//! assert_eq!(ids.allocate(), Some(2));
//!
//! let bounds = Rect::new(10.0, 20.0, 300.0, 200.0);
//! assert_eq!(bounds.size.width, 300.0);
//!
//! assert_eq!(Color::parse_hex("#FF0000"), Some(Color::RED));
//! ```

pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{Point, Rect, Size, Vector2};
pub use ids::{IdAllocator, ViewId, WindowId};

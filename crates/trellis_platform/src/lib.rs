//! Trellis Platform Abstraction Layer
//!
//! This crate defines the bridge between the view tree and a native widget
//! toolkit. Each platform extension implements [`NativeToolkit`]:
//!
//! - `trellis_platform_headless` - in-memory toolkit with AppKit and Views flavors
//!
//! Embedded web content is reached through the [`HostedContent`] trait.

pub mod error;
pub mod hosted;
pub mod scroll;
pub mod toolkit;

pub use error::{PlatformError, Result};
pub use hosted::{ContentId, HostedContent};
pub use scroll::{Axis, ScrollFlag, ScrollbarMode};
pub use toolkit::{NativeHandle, NativeToolkit, ToolkitEvent, WidgetKind};

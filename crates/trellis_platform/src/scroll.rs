//! Scroll viewport policy types

/// Scroll axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Abstract scrollbar policy for one axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollbarMode {
    /// No scrollbar and no scrolling along the axis
    Disabled,
    /// Scrolling allowed, scrollbar only shown on demand
    HiddenButEnabled,
    /// Scrollbar always present
    #[default]
    Enabled,
}

impl ScrollbarMode {
    /// Map onto a toolkit that only knows "has scroller".
    ///
    /// Both enabled states become `true`.
    pub fn to_has_scroller(self) -> bool {
        self != ScrollbarMode::Disabled
    }

    /// Read back from a "has scroller" toolkit.
    ///
    /// This is lossy: `Enabled` and `HiddenButEnabled` were stored as the same
    /// `true` and both read back as `HiddenButEnabled`, the automatic policy
    /// such toolkits actually implement. `Disabled` round-trips.
    pub fn from_has_scroller(has_scroller: bool) -> Self {
        if has_scroller {
            ScrollbarMode::HiddenButEnabled
        } else {
            ScrollbarMode::Disabled
        }
    }
}

/// Boolean scroll viewport options that not every platform has
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollFlag {
    KeyboardScrolling,
    OverflowIndicator,
    OverlayScrollbar,
}

impl ScrollFlag {
    pub fn name(&self) -> &'static str {
        match self {
            ScrollFlag::KeyboardScrolling => "keyboard scrolling",
            ScrollFlag::OverflowIndicator => "overflow indicator",
            ScrollFlag::OverlayScrollbar => "overlay scrollbar",
        }
    }
}

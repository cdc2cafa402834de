//! Layout style helpers

use taffy::prelude::*;

/// Global layout behaviour shared by every node of a tree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Use CSS defaults (row direction) instead of the native column default
    pub web_defaults: bool,
    /// Round computed geometry to whole pixels
    pub rounding: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            web_defaults: false,
            rounding: true,
        }
    }
}

/// Helper to create common layout styles
pub struct LayoutStyle;

impl LayoutStyle {
    /// Style every freshly created view node starts with
    pub fn initial(config: &LayoutConfig) -> Style {
        if config.web_defaults {
            Self::flex_row()
        } else {
            Self::flex_column()
        }
    }

    /// Create a flex row style
    pub fn flex_row() -> Style {
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            ..Default::default()
        }
    }

    /// Create a flex column style
    pub fn flex_column() -> Style {
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..Default::default()
        }
    }

    /// Grow to fill the free space of the parent (`flex: 1`)
    pub fn fill(mut style: Style) -> Style {
        style.flex_grow = 1.0;
        style.flex_shrink = 1.0;
        style.flex_basis = Dimension::Percent(0.0);
        style
    }

    /// Create a fixed size style
    pub fn fixed_size(width: f32, height: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_direction_follows_config() {
        let native = LayoutStyle::initial(&LayoutConfig::default());
        assert_eq!(native.flex_direction, FlexDirection::Column);

        let web = LayoutStyle::initial(&LayoutConfig {
            web_defaults: true,
            ..Default::default()
        });
        assert_eq!(web.flex_direction, FlexDirection::Row);
    }

    #[test]
    fn test_fill() {
        let style = LayoutStyle::fill(LayoutStyle::flex_column());
        assert_eq!(style.flex_grow, 1.0);
        assert_eq!(style.flex_basis, Dimension::Percent(0.0));
    }
}

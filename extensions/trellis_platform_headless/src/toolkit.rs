//! In-memory widget toolkit

use slotmap::SlotMap;
use smallvec::SmallVec;
use trellis_core::{Color, Point, Rect, Size};
use trellis_platform::{
    Axis, NativeHandle, NativeToolkit, PlatformError, Result, ScrollFlag, ScrollbarMode,
    ToolkitEvent, WidgetKind,
};

/// Which native toolkit semantics to reproduce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolkitFlavor {
    /// Reference-counted views, boolean "has scroller" per axis, overlay
    /// scrollbars, no height clipping or keyboard scrolling options
    AppKit,
    /// Parent-owned views, three-level scrollbar modes, height clipping,
    /// keyboard scrolling and overflow indicator options
    Views,
}

#[derive(Clone, Copy, Debug)]
enum NativeScrollbar {
    HasScroller(bool),
    Mode(ScrollbarMode),
}

#[derive(Debug)]
struct ScrollState {
    document: Option<NativeHandle>,
    content_size: Size,
    offset: Point,
    horizontal: NativeScrollbar,
    vertical: NativeScrollbar,
    height_clip: (f32, f32),
    keyboard_scrolling: bool,
    overflow_indicator: bool,
    overlay_scrollbar: bool,
}

impl ScrollState {
    fn new(flavor: ToolkitFlavor) -> Self {
        let scrollbar = match flavor {
            ToolkitFlavor::AppKit => NativeScrollbar::HasScroller(true),
            ToolkitFlavor::Views => NativeScrollbar::Mode(ScrollbarMode::Enabled),
        };
        Self {
            document: None,
            content_size: Size::ZERO,
            offset: Point::ZERO,
            horizontal: scrollbar,
            vertical: scrollbar,
            height_clip: (-1.0, -1.0),
            keyboard_scrolling: true,
            overflow_indicator: true,
            overlay_scrollbar: false,
        }
    }
}

#[derive(Debug)]
struct Widget {
    kind: WidgetKind,
    parent: Option<NativeHandle>,
    children: SmallVec<[NativeHandle; 4]>,
    bounds: Rect,
    visible: bool,
    focusable: bool,
    background: Option<Color>,
    scroll: Option<ScrollState>,
}

/// Headless toolkit keeping every widget in an arena
pub struct HeadlessToolkit {
    flavor: ToolkitFlavor,
    widgets: SlotMap<NativeHandle, Widget>,
    focused: Option<NativeHandle>,
    events: Vec<ToolkitEvent>,
}

impl HeadlessToolkit {
    pub fn new(flavor: ToolkitFlavor) -> Self {
        Self {
            flavor,
            widgets: SlotMap::with_key(),
            focused: None,
            events: Vec::new(),
        }
    }

    pub fn appkit() -> Self {
        Self::new(ToolkitFlavor::AppKit)
    }

    pub fn views() -> Self {
        Self::new(ToolkitFlavor::Views)
    }

    pub fn flavor(&self) -> ToolkitFlavor {
        self.flavor
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Native parent of a widget, including a scroll viewport for its document
    pub fn native_parent(&self, widget: NativeHandle) -> Option<NativeHandle> {
        self.widgets.get(widget)?.parent
    }

    pub fn focused(&self) -> Option<NativeHandle> {
        self.focused
    }

    /// Delete a widget the way a platform does behind the view tree's back.
    ///
    /// Raises [`ToolkitEvent::WidgetDestroyed`] for the widget and everything
    /// below it.
    pub fn destroy_from_platform(&mut self, widget: NativeHandle) -> Result<()> {
        if !self.widgets.contains_key(widget) {
            return Err(PlatformError::StaleWidget);
        }
        tracing::debug!("platform deleted widget {widget:?}");
        self.detach_from_parent(widget);
        self.destroy_subtree(widget, true);
        Ok(())
    }

    fn widget(&self, handle: NativeHandle) -> Result<&Widget> {
        self.widgets.get(handle).ok_or(PlatformError::StaleWidget)
    }

    fn widget_mut(&mut self, handle: NativeHandle) -> Result<&mut Widget> {
        self.widgets.get_mut(handle).ok_or(PlatformError::StaleWidget)
    }

    fn scroll(&self, handle: NativeHandle) -> Result<&ScrollState> {
        self.widget(handle)?
            .scroll
            .as_ref()
            .ok_or(PlatformError::WrongKind("scroll"))
    }

    fn scroll_mut(&mut self, handle: NativeHandle) -> Result<&mut ScrollState> {
        self.widget_mut(handle)?
            .scroll
            .as_mut()
            .ok_or(PlatformError::WrongKind("scroll"))
    }

    fn require_views(&self, feature: &'static str) -> Result<()> {
        match self.flavor {
            ToolkitFlavor::Views => Ok(()),
            ToolkitFlavor::AppKit => Err(PlatformError::Unsupported(feature)),
        }
    }

    fn detach_from_parent(&mut self, widget: NativeHandle) {
        let Some(parent) = self.widgets.get(widget).and_then(|w| w.parent) else {
            return;
        };
        if let Some(parent) = self.widgets.get_mut(parent) {
            parent.children.retain(|child| *child != widget);
            if let Some(scroll) = parent.scroll.as_mut() {
                if scroll.document == Some(widget) {
                    scroll.document = None;
                }
            }
        }
        if let Some(w) = self.widgets.get_mut(widget) {
            w.parent = None;
        }
    }

    fn destroy_subtree(&mut self, widget: NativeHandle, notify_root: bool) {
        let Some(removed) = self.widgets.remove(widget) else {
            return;
        };
        if self.focused == Some(widget) {
            self.focused = None;
        }
        let document = removed.scroll.as_ref().and_then(|s| s.document);
        for child in removed.children.iter().copied().chain(document) {
            self.destroy_subtree(child, true);
        }
        if notify_root {
            self.events.push(ToolkitEvent::WidgetDestroyed(widget));
        }
    }

    /// Size of the scrollable document: its widget if any, else the stored size
    fn document_size(&self, scroll: &ScrollState) -> Size {
        scroll
            .document
            .and_then(|doc| self.widgets.get(doc))
            .map_or(scroll.content_size, |doc| doc.bounds.size)
    }

    fn max_offset(&self, handle: NativeHandle) -> Result<Point> {
        let viewport = self.widget(handle)?.bounds.size;
        let document = self.document_size(self.scroll(handle)?);
        Ok(Point::new(
            (document.width - viewport.width).max(0.0),
            (document.height - viewport.height).max(0.0),
        ))
    }
}

impl NativeToolkit for HeadlessToolkit {
    fn name(&self) -> &'static str {
        match self.flavor {
            ToolkitFlavor::AppKit => "headless-appkit",
            ToolkitFlavor::Views => "headless-views",
        }
    }

    fn parent_owns_children(&self) -> bool {
        self.flavor == ToolkitFlavor::Views
    }

    fn create_widget(&mut self, kind: WidgetKind) -> Result<NativeHandle> {
        let scroll = (kind == WidgetKind::Scroll).then(|| ScrollState::new(self.flavor));
        let handle = self.widgets.insert(Widget {
            kind,
            parent: None,
            children: SmallVec::new(),
            bounds: Rect::ZERO,
            visible: true,
            focusable: false,
            background: None,
            scroll,
        });
        tracing::trace!("created {} widget {handle:?}", kind.name());
        Ok(handle)
    }

    fn destroy_widget(&mut self, widget: NativeHandle) -> Result<()> {
        self.widget(widget)?;
        self.detach_from_parent(widget);
        self.destroy_subtree(widget, false);
        tracing::trace!("destroyed widget {widget:?}");
        Ok(())
    }

    fn is_alive(&self, widget: NativeHandle) -> bool {
        self.widgets.contains_key(widget)
    }

    fn kind(&self, widget: NativeHandle) -> Result<WidgetKind> {
        Ok(self.widget(widget)?.kind)
    }

    fn set_bounds(&mut self, widget: NativeHandle, bounds: Rect) -> Result<()> {
        self.widget_mut(widget)?.bounds = bounds;
        Ok(())
    }

    fn bounds(&self, widget: NativeHandle) -> Result<Rect> {
        Ok(self.widget(widget)?.bounds)
    }

    fn set_visible(&mut self, widget: NativeHandle, visible: bool) -> Result<()> {
        self.widget_mut(widget)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, widget: NativeHandle) -> Result<bool> {
        Ok(self.widget(widget)?.visible)
    }

    fn set_focusable(&mut self, widget: NativeHandle, focusable: bool) -> Result<()> {
        self.widget_mut(widget)?.focusable = focusable;
        if !focusable && self.focused == Some(widget) {
            self.focused = None;
        }
        Ok(())
    }

    fn is_focusable(&self, widget: NativeHandle) -> Result<bool> {
        Ok(self.widget(widget)?.focusable)
    }

    fn focus(&mut self, widget: NativeHandle) -> Result<()> {
        if self.widget(widget)?.focusable {
            self.focused = Some(widget);
        }
        Ok(())
    }

    fn has_focus(&self, widget: NativeHandle) -> Result<bool> {
        self.widget(widget)?;
        Ok(self.focused == Some(widget))
    }

    fn set_background(&mut self, widget: NativeHandle, color: Color) -> Result<()> {
        self.widget_mut(widget)?.background = Some(color);
        Ok(())
    }

    fn background(&self, widget: NativeHandle) -> Result<Option<Color>> {
        Ok(self.widget(widget)?.background)
    }

    fn insert_child(
        &mut self,
        parent: NativeHandle,
        child: NativeHandle,
        index: usize,
    ) -> Result<()> {
        if parent == child {
            return Err(PlatformError::InvalidChild("widget cannot contain itself".into()));
        }
        let parent_widget = self.widget(parent)?;
        if parent_widget.kind == WidgetKind::Scroll {
            return Err(PlatformError::InvalidChild(
                "scroll viewports only take a document widget".into(),
            ));
        }
        if index > parent_widget.children.len() {
            return Err(PlatformError::InvalidChild(format!(
                "index {index} out of range for {} children",
                parent_widget.children.len()
            )));
        }
        if self.widget(child)?.parent.is_some() {
            return Err(PlatformError::InvalidChild("widget already has a parent".into()));
        }

        self.widget_mut(parent)?.children.insert(index, child);
        self.widget_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: NativeHandle, child: NativeHandle) -> Result<()> {
        self.widget(child)?;
        let parent_widget = self.widget_mut(parent)?;
        let Some(position) = parent_widget.children.iter().position(|c| *c == child) else {
            return Err(PlatformError::InvalidChild("widget is not a child".into()));
        };
        parent_widget.children.remove(position);
        self.widget_mut(child)?.parent = None;
        Ok(())
    }

    fn reorder_child_to_top(&mut self, parent: NativeHandle, child: NativeHandle) -> Result<()> {
        self.widget(child)?;
        let parent_widget = self.widget_mut(parent)?;
        let Some(position) = parent_widget.children.iter().position(|c| *c == child) else {
            return Err(PlatformError::InvalidChild("widget is not a child".into()));
        };
        let moved = parent_widget.children.remove(position);
        parent_widget.children.push(moved);
        Ok(())
    }

    fn children(&self, parent: NativeHandle) -> Result<Vec<NativeHandle>> {
        Ok(self.widget(parent)?.children.to_vec())
    }

    fn set_document(&mut self, scroll: NativeHandle, document: Option<NativeHandle>) -> Result<()> {
        let previous = self.scroll(scroll)?.document;
        if previous == document {
            return Ok(());
        }
        if let Some(document) = document {
            if self.widget(document)?.parent.is_some() {
                return Err(PlatformError::InvalidChild("widget already has a parent".into()));
            }
        }

        if let Some(previous) = previous {
            if let Some(old) = self.widgets.get_mut(previous) {
                old.parent = None;
            }
        }
        self.scroll_mut(scroll)?.document = document;
        if let Some(document) = document {
            self.widget_mut(document)?.parent = Some(scroll);
        }
        Ok(())
    }

    fn document(&self, scroll: NativeHandle) -> Result<Option<NativeHandle>> {
        Ok(self.scroll(scroll)?.document)
    }

    fn set_scroll_content_size(&mut self, scroll: NativeHandle, size: Size) -> Result<()> {
        let state = self.scroll_mut(scroll)?;
        state.content_size = size;
        let document = state.document;
        // AppKit sizes the document frame along with the content
        if self.flavor == ToolkitFlavor::AppKit {
            if let Some(doc) = document.and_then(|doc| self.widgets.get_mut(doc)) {
                doc.bounds.size = size;
            }
        }
        Ok(())
    }

    fn set_scrollbar_mode(
        &mut self,
        scroll: NativeHandle,
        axis: Axis,
        mode: ScrollbarMode,
    ) -> Result<()> {
        let native = match self.flavor {
            ToolkitFlavor::AppKit => NativeScrollbar::HasScroller(mode.to_has_scroller()),
            ToolkitFlavor::Views => NativeScrollbar::Mode(mode),
        };
        let state = self.scroll_mut(scroll)?;
        match axis {
            Axis::Horizontal => state.horizontal = native,
            Axis::Vertical => state.vertical = native,
        }
        Ok(())
    }

    fn scrollbar_mode(&self, scroll: NativeHandle, axis: Axis) -> Result<ScrollbarMode> {
        let state = self.scroll(scroll)?;
        let native = match axis {
            Axis::Horizontal => state.horizontal,
            Axis::Vertical => state.vertical,
        };
        Ok(match native {
            NativeScrollbar::HasScroller(has) => ScrollbarMode::from_has_scroller(has),
            NativeScrollbar::Mode(mode) => mode,
        })
    }

    fn set_scroll_offset(&mut self, scroll: NativeHandle, offset: Point) -> Result<()> {
        let max = self.max_offset(scroll)?;
        self.scroll_mut(scroll)?.offset = Point::new(
            offset.x.clamp(0.0, max.x),
            offset.y.clamp(0.0, max.y),
        );
        Ok(())
    }

    fn scroll_offset(&self, scroll: NativeHandle) -> Result<Point> {
        Ok(self.scroll(scroll)?.offset)
    }

    fn visible_rect(&self, scroll: NativeHandle) -> Result<Rect> {
        self.require_views("visible rect")?;
        let viewport = self.widget(scroll)?.bounds.size;
        let state = self.scroll(scroll)?;
        let document = self.document_size(state);
        let offset = state.offset;
        Ok(Rect::new(
            offset.x,
            offset.y,
            viewport.width.min(document.width - offset.x).max(0.0),
            viewport.height.min(document.height - offset.y).max(0.0),
        ))
    }

    fn clip_height_to(
        &mut self,
        scroll: NativeHandle,
        min_height: f32,
        max_height: f32,
    ) -> Result<()> {
        self.require_views("height clipping")?;
        self.scroll_mut(scroll)?.height_clip = (min_height, max_height);
        Ok(())
    }

    fn height_clip(&self, scroll: NativeHandle) -> Result<(f32, f32)> {
        self.require_views("height clipping")?;
        Ok(self.scroll(scroll)?.height_clip)
    }

    fn set_scroll_flag(
        &mut self,
        scroll: NativeHandle,
        flag: ScrollFlag,
        enabled: bool,
    ) -> Result<()> {
        let flavor = self.flavor;
        let state = self.scroll_mut(scroll)?;
        let slot = match (flavor, flag) {
            (ToolkitFlavor::Views, ScrollFlag::KeyboardScrolling) => &mut state.keyboard_scrolling,
            (ToolkitFlavor::Views, ScrollFlag::OverflowIndicator) => &mut state.overflow_indicator,
            (ToolkitFlavor::AppKit, ScrollFlag::OverlayScrollbar) => &mut state.overlay_scrollbar,
            _ => return Err(PlatformError::Unsupported(flag.name())),
        };
        *slot = enabled;
        Ok(())
    }

    fn scroll_flag(&self, scroll: NativeHandle, flag: ScrollFlag) -> Result<bool> {
        let state = self.scroll(scroll)?;
        match (self.flavor, flag) {
            (ToolkitFlavor::Views, ScrollFlag::KeyboardScrolling) => Ok(state.keyboard_scrolling),
            (ToolkitFlavor::Views, ScrollFlag::OverflowIndicator) => Ok(state.overflow_indicator),
            (ToolkitFlavor::AppKit, ScrollFlag::OverlayScrollbar) => Ok(state.overlay_scrollbar),
            _ => Err(PlatformError::Unsupported(flag.name())),
        }
    }

    fn take_events(&mut self) -> Vec<ToolkitEvent> {
        std::mem::take(&mut self.events)
    }
}

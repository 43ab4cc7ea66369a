use std::rc::Rc;

use taffy::{AlignItems, JustifyContent};

use crate::{Color, PointerEvent};

pub type PointerHandler = Rc<dyn Fn(PointerEvent)>;

#[derive(Clone, Default)]
pub struct Modifier {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_max_w: bool,
    pub padding: Option<f32>,
    pub background: Option<Color>,
    pub clip_rounded: Option<f32>,
    pub flex_grow: Option<f32>,
    /// Gap between children of a Row/Column.
    pub spacing: Option<f32>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub absolute: bool,
    pub offset_left: Option<f32>,
    pub offset_top: Option<f32>,
    /// Works for hit-testing only, draw order is not changed.
    pub z_index: f32,
    pub on_pointer_down: Option<PointerHandler>,
    pub on_pointer_up: Option<PointerHandler>,
    pub on_pointer_cancel: Option<PointerHandler>,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fill_max_w", &self.fill_max_w)
            .field("padding", &self.padding)
            .field("background", &self.background)
            .field("clip_rounded", &self.clip_rounded)
            .field("flex_grow", &self.flex_grow)
            .field("spacing", &self.spacing)
            .field("justify_content", &self.justify_content)
            .field("align_items", &self.align_items)
            .field("absolute", &self.absolute)
            .field("offset_left", &self.offset_left)
            .field("offset_top", &self.offset_top)
            .field("z_index", &self.z_index)
            .field(
                "on_pointer_down",
                &self.on_pointer_down.as_ref().map(|_| "..."),
            )
            .field("on_pointer_up", &self.on_pointer_up.as_ref().map(|_| "..."))
            .field(
                "on_pointer_cancel",
                &self.on_pointer_cancel.as_ref().map(|_| "..."),
            )
            .finish()
    }
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn fill_max_width(mut self) -> Self {
        self.fill_max_w = true;
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(v);
        self
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    pub fn clip_rounded(mut self, radius: f32) -> Self {
        self.clip_rounded = Some(radius);
        self
    }
    /// Share of the free space along the parent's main axis.
    pub fn weight(mut self, w: f32) -> Self {
        self.flex_grow = Some(w);
        self
    }
    pub fn spacing(mut self, gap: f32) -> Self {
        self.spacing = Some(gap);
        self
    }
    pub fn justify_content(mut self, j: JustifyContent) -> Self {
        self.justify_content = Some(j);
        self
    }
    pub fn align_items(mut self, a: AlignItems) -> Self {
        self.align_items = Some(a);
        self
    }
    /// Position relative to the parent instead of taking part in flow.
    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self
    }
    pub fn offset(mut self, left: f32, top: f32) -> Self {
        self.offset_left = Some(left);
        self.offset_top = Some(top);
        self
    }
    pub fn z_index(mut self, z: f32) -> Self {
        self.z_index = z;
        self
    }
    pub fn on_pointer_down(mut self, f: impl Fn(PointerEvent) + 'static) -> Self {
        self.on_pointer_down = Some(Rc::new(f));
        self
    }
    pub fn on_pointer_up(mut self, f: impl Fn(PointerEvent) + 'static) -> Self {
        self.on_pointer_up = Some(Rc::new(f));
        self
    }
    pub fn on_pointer_cancel(mut self, f: impl Fn(PointerEvent) + 'static) -> Self {
        self.on_pointer_cancel = Some(Rc::new(f));
        self
    }

    /// Whether the node takes part in pointer hit-testing.
    pub fn is_interactive(&self) -> bool {
        self.on_pointer_down.is_some()
            || self.on_pointer_up.is_some()
            || self.on_pointer_cancel.is_some()
    }
}

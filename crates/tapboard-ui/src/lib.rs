#![allow(non_snake_case)]
//! Keys, rows, the keyboard surface and layout.

pub mod config;
pub mod dispatch;
pub mod editing;
pub mod gestures;
pub mod key_button;
pub mod keyboard;
pub mod layout;

use std::collections::HashMap;

use tapboard_core::*;
use taffy::prelude::{AvailableSpace, Display, FlexDirection, Position, Style, auto, length, percent};
use taffy::{NodeId, TaffyTree};
use thiserror::Error;

pub use config::{KeyboardConfig, RepeatPolicy};
pub use dispatch::{DEL, ENTER, KeyAction, SPACE, dispatch_key, dispatch_to};
pub use editing::{EditingConnection, EditingHost, TextBuffer};
pub use gestures::KeyGestures;
pub use key_button::{KeyButton, KeyInteractionState, KeyPressHandler};
pub use keyboard::{KeyRow, KeyboardSurface, create_keyboard_surface};
pub use layout::KeyboardLayout;

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: Color::WHITE,
            font_size: 16.0, // dp
        },
    )
}

pub trait TextStyle {
    fn color(self, c: Color) -> View;
    fn size(self, dp: f32) -> View;
}

impl TextStyle for View {
    fn color(mut self, c: Color) -> View {
        if let ViewKind::Text {
            color: text_color, ..
        } = &mut self.kind
        {
            *text_color = c;
        }
        self
    }
    fn size(mut self, dp: f32) -> View {
        if let ViewKind::Text { font_size, .. } = &mut self.kind {
            *font_size = dp;
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("window has no area ({0}x{1})")]
    EmptyWindow(f32, f32),

    #[error("layout engine: {0}")]
    Engine(#[from] taffy::TaffyError),
}

/// Measure input for text leaves.
#[derive(Clone)]
struct TextMeasure {
    chars: usize,
    font_px: f32,
}

fn style_from_modifier(m: &Modifier, kind: &ViewKind) -> Style {
    let px = dp_to_px;
    let mut s = Style {
        display: Display::Flex,
        ..Style::default()
    };

    let is_row = matches!(kind, ViewKind::Row);
    s.flex_direction = if is_row {
        FlexDirection::Row
    } else {
        FlexDirection::Column
    };
    s.align_items = Some(if matches!(kind, ViewKind::Text { .. } | ViewKind::Box) {
        AlignItems::FlexStart
    } else {
        AlignItems::Stretch
    });
    s.justify_content = Some(JustifyContent::FlexStart);

    if let Some(g) = m.flex_grow {
        s.flex_grow = g;
        // Weighted children share free space from a zero basis.
        s.flex_basis = length(0.0);
        s.min_size.width = length(0.0);
    }
    if let Some(a) = m.align_items {
        s.align_items = Some(a);
    }
    if let Some(j) = m.justify_content {
        s.justify_content = Some(j);
    }

    if m.absolute {
        s.position = Position::Absolute;
        s.inset = taffy::geometry::Rect {
            left: m.offset_left.map(|v| length(px(v))).unwrap_or_else(auto),
            right: auto(),
            top: m.offset_top.map(|v| length(px(v))).unwrap_or_else(auto),
            bottom: auto(),
        };
    }

    if let Some(gap) = m.spacing {
        let g = length(px(gap));
        s.gap = taffy::geometry::Size {
            width: g,
            height: g,
        };
    }

    if let Some(p) = m.padding {
        let v = length(px(p));
        s.padding = taffy::geometry::Rect {
            left: v,
            right: v,
            top: v,
            bottom: v,
        };
    }

    if let Some(w) = m.width {
        s.size.width = length(px(w.max(0.0)));
    } else if m.fill_max_w {
        s.size.width = percent(1.0);
    }
    if let Some(h) = m.height {
        s.size.height = length(px(h.max(0.0)));
    }

    s
}

fn build_node(
    v: &View,
    t: &mut TaffyTree<TextMeasure>,
    nodes: &mut HashMap<ViewId, NodeId>,
) -> Result<NodeId, MeasureError> {
    let style = style_from_modifier(&v.modifier, &v.kind);
    let node = match &v.kind {
        ViewKind::Text {
            text, font_size, ..
        } => t.new_leaf_with_context(
            style,
            TextMeasure {
                chars: text.chars().count(),
                font_px: dp_to_px(*font_size),
            },
        )?,
        _ => {
            let children = v
                .children
                .iter()
                .map(|c| build_node(c, t, nodes))
                .collect::<Result<Vec<_>, _>>()?;
            t.new_with_children(style, &children)?
        }
    };
    nodes.insert(v.id, node);
    Ok(node)
}

/// Assign pre-order ids starting at 1.
fn stamp(mut v: View, id: &mut u64) -> View {
    v.id = *id;
    *id += 1;
    v.children = v.children.into_iter().map(|c| stamp(c, id)).collect();
    v
}

/// Lay `root` out in a window of `size_px` and collect its hit regions.
///
/// Text has no shaping engine behind it; labels are measured with a fixed
/// advance per character, which is enough to centre single key labels.
pub fn layout_keys(root: &View, size_px: (f32, f32)) -> Result<Frame, MeasureError> {
    if !(size_px.0 > 0.0 && size_px.1 > 0.0) {
        return Err(MeasureError::EmptyWindow(size_px.0, size_px.1));
    }

    let mut id = 1u64;
    let root = stamp(root.clone(), &mut id);

    let mut taffy: TaffyTree<TextMeasure> = TaffyTree::new();
    let mut nodes = HashMap::new();
    let root_node = build_node(&root, &mut taffy, &mut nodes)?;

    let mut rs = taffy.style(root_node)?.clone();
    rs.size.width = length(size_px.0);
    rs.size.height = auto();
    taffy.set_style(root_node, rs)?;

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size_px.0),
        height: AvailableSpace::Definite(size_px.1),
    };
    taffy.compute_layout_with_measure(root_node, available, |known, _avail, _node, ctx, _style| {
        match ctx {
            Some(TextMeasure { chars, font_px }) => taffy::geometry::Size {
                width: known.width.unwrap_or(*chars as f32 * *font_px * 0.6),
                height: known.height.unwrap_or(*font_px * 1.3),
            },
            _ => taffy::geometry::Size {
                width: known.width.unwrap_or(0.0),
                height: known.height.unwrap_or(0.0),
            },
        }
    })?;

    fn walk(
        v: &View,
        t: &TaffyTree<TextMeasure>,
        nodes: &HashMap<ViewId, NodeId>,
        parent_offset: (f32, f32),
        hits: &mut Vec<HitRegion>,
    ) -> Result<(), MeasureError> {
        let Some(&node) = nodes.get(&v.id) else {
            return Ok(());
        };
        let l = t.layout(node)?;
        let rect = Rect {
            x: parent_offset.0 + l.location.x,
            y: parent_offset.1 + l.location.y,
            w: l.size.width,
            h: l.size.height,
        };

        let m = &v.modifier;
        if m.is_interactive() {
            hits.push(HitRegion {
                id: v.id,
                tag: v.tag.clone(),
                rect,
                z_index: m.z_index,
                on_pointer_down: m.on_pointer_down.clone(),
                on_pointer_up: m.on_pointer_up.clone(),
                on_pointer_cancel: m.on_pointer_cancel.clone(),
            });
        }

        for c in &v.children {
            walk(c, t, nodes, (rect.x, rect.y), hits)?;
        }
        Ok(())
    }

    let mut hit_regions = Vec::new();
    walk(&root, &taffy, &nodes, (0.0, 0.0), &mut hit_regions)?;
    log::trace!(
        "layout: {} nodes, {} hit regions",
        nodes.len(),
        hit_regions.len()
    );

    Ok(Frame {
        view: root,
        hit_regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap_target(tag: &str, w: f32) -> View {
        Box(Modifier::new()
            .width(w)
            .height(40.0)
            .on_pointer_down(|_| {}))
        .tagged(tag)
    }

    #[test]
    fn row_children_are_laid_side_by_side_with_spacing() {
        let root = Row(Modifier::new().spacing(10.0))
            .with_children(vec![tap_target("a", 50.0), tap_target("b", 50.0)]);
        let frame = layout_keys(&root, (400.0, 200.0)).expect("layout");

        let a = frame.region("a").expect("a").rect;
        let b = frame.region("b").expect("b").rect;
        assert_eq!((a.x, a.w, a.h), (0.0, 50.0, 40.0));
        assert_eq!(b.x, 60.0);
    }

    #[test]
    fn weighted_children_split_the_row_evenly() {
        let key = |tag: &str| {
            Box(Modifier::new()
                .weight(1.0)
                .height(40.0)
                .on_pointer_up(|_| {}))
            .tagged(tag)
        };
        let root = Row(Modifier::new().fill_max_width())
            .with_children(vec![key("l"), key("r")]);
        let frame = layout_keys(&root, (300.0, 100.0)).expect("layout");

        assert_eq!(frame.region("l").expect("l").rect.w, 150.0);
        let r = frame.region("r").expect("r").rect;
        assert_eq!((r.x, r.w), (150.0, 150.0));
    }

    #[test]
    fn nested_offsets_accumulate_and_padding_applies() {
        let root = Column(Modifier::new().padding(8.0)).with_children(vec![
            Box(Modifier::new().height(20.0)),
            Row(Modifier::new()).with_children(vec![tap_target("deep", 30.0)]),
        ]);
        let frame = layout_keys(&root, (200.0, 200.0)).expect("layout");
        let deep = frame.region("deep").expect("deep").rect;
        assert_eq!((deep.x, deep.y), (8.0, 28.0));
    }

    #[test]
    fn ids_are_stamped_in_pre_order() {
        let root = Column(Modifier::new())
            .with_children(vec![Row(Modifier::new()).with_children(vec![Text("x")]), Text("y")]);
        let frame = layout_keys(&root, (100.0, 100.0)).expect("layout");
        let v = &frame.view;
        assert_eq!(v.id, 1);
        assert_eq!(v.children[0].id, 2);
        assert_eq!(v.children[0].children[0].id, 3);
        assert_eq!(v.children[1].id, 4);
    }

    #[test]
    fn higher_z_index_wins_where_regions_overlap() {
        let overlay = Box(Modifier::new()
            .absolute()
            .offset(0.0, 0.0)
            .width(50.0)
            .height(40.0)
            .z_index(1.0)
            .on_pointer_down(|_| {}))
        .tagged("overlay");
        let root = Column(Modifier::new()).with_children(vec![overlay, tap_target("under", 100.0)]);
        let frame = layout_keys(&root, (200.0, 200.0)).expect("layout");

        let hit = frame.hit_test(Vec2 { x: 10.0, y: 10.0 }).expect("hit");
        assert_eq!(hit.tag.as_deref(), Some("overlay"));
        let hit = frame.hit_test(Vec2 { x: 80.0, y: 10.0 }).expect("hit");
        assert_eq!(hit.tag.as_deref(), Some("under"));
    }

    #[test]
    fn non_interactive_nodes_have_no_hit_region() {
        let root = Column(Modifier::new()).with_children(vec![Text("label")]);
        let frame = layout_keys(&root, (100.0, 100.0)).expect("layout");
        assert!(frame.hit_regions.is_empty());
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let root = Column(Modifier::new());
        assert!(matches!(
            layout_keys(&root, (0.0, 100.0)),
            Err(MeasureError::EmptyWindow(..))
        ));
    }
}

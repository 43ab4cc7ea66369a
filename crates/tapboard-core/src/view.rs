use std::fmt::Write as _;

use crate::{Color, Modifier};

pub type ViewId = u64;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Text {
        text: String,
        color: Color,
        font_size: f32,
    },
}

impl ViewKind {
    fn name(&self) -> &'static str {
        match self {
            ViewKind::Surface => "Surface",
            ViewKind::Box => "Box",
            ViewKind::Row => "Row",
            ViewKind::Column => "Column",
            ViewKind::Text { .. } => "Text",
        }
    }
}

/// One node of the composed tree. Ids are stamped in pre-order by layout;
/// builders leave them at 0.
#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    /// Stable name for lookups in tests and tooling.
    pub tag: Option<String>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            tag: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Depth-first search by tag.
    pub fn find(&self, tag: &str) -> Option<&View> {
        if self.tag.as_deref() == Some(tag) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(tag))
    }

    /// Indented one-node-per-line dump of the tree.
    ///
    /// ```text
    /// Column
    ///   Row
    ///     Box [key:Q]
    ///       Text "Q"
    /// ```
    pub fn outline(&self) -> String {
        fn walk(v: &View, depth: usize, out: &mut String) {
            let _ = write!(out, "{:indent$}{}", "", v.kind.name(), indent = depth * 2);
            if let Some(tag) = &v.tag {
                let _ = write!(out, " [{tag}]");
            }
            if let ViewKind::Text { text, .. } = &v.kind {
                let _ = write!(out, " {text:?}");
            }
            out.push('\n');
            for c in &v.children {
                walk(c, depth + 1, out);
            }
        }
        let mut out = String::new();
        walk(self, 0, &mut out);
        out
    }
}

/// Interactive rectangle produced by layout, in window px.
#[derive(Clone)]
pub struct HitRegion {
    pub id: ViewId,
    pub tag: Option<String>,
    pub rect: crate::Rect,
    pub z_index: f32,
    pub on_pointer_down: Option<crate::PointerHandler>,
    pub on_pointer_up: Option<crate::PointerHandler>,
    pub on_pointer_cancel: Option<crate::PointerHandler>,
}

impl std::fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRegion")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("rect", &self.rect)
            .field("z_index", &self.z_index)
            .finish_non_exhaustive()
    }
}

/// Output of one composition: the tree plus its hit regions, in paint order.
#[derive(Clone, Debug)]
pub struct Frame {
    pub view: View,
    pub hit_regions: Vec<HitRegion>,
}

impl Frame {
    /// Top-most region under `pos`.
    pub fn hit_test(&self, pos: crate::Vec2) -> Option<&HitRegion> {
        self.hit_regions
            .iter()
            .enumerate()
            .filter(|(_, h)| h.rect.contains(pos))
            .max_by(|(ia, a), (ib, b)| a.z_index.total_cmp(&b.z_index).then(ia.cmp(ib)))
            .map(|(_, h)| h)
    }

    pub fn region(&self, tag: &str) -> Option<&HitRegion> {
        self.hit_regions
            .iter()
            .find(|h| h.tag.as_deref() == Some(tag))
    }
}

use tapboard_core::*;

/// The key a pointer went down on. Ids are restamped on every
/// recomposition, so tagged regions are found again by tag.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Capture {
    pub pointer: PointerId,
    pub id: ViewId,
    pub tag: Option<String>,
}

impl Capture {
    pub fn new(pointer: PointerId, hit: &HitRegion) -> Self {
        Self {
            pointer,
            id: hit.id,
            tag: hit.tag.clone(),
        }
    }
}

pub(crate) fn captured_region<'a>(frame: &'a Frame, capture: &Capture) -> Option<&'a HitRegion> {
    match &capture.tag {
        Some(tag) => frame.region(tag),
        None => frame.hit_regions.iter().find(|h| h.id == capture.id),
    }
}

/// Hand `event` to the region's handler for its kind. Returns whether a
/// handler ran.
pub(crate) fn deliver(hit: &HitRegion, event: PointerEvent) -> bool {
    let handler = match event.event {
        PointerEventKind::Down => &hit.on_pointer_down,
        PointerEventKind::Up => &hit.on_pointer_up,
        PointerEventKind::Cancel => &hit.on_pointer_cancel,
        PointerEventKind::Move => return false,
    };
    // Clone out so the handler may trigger a recomposition freely.
    match handler.clone() {
        Some(cb) => {
            cb(event);
            true
        }
        None => false,
    }
}

pub(crate) fn as_cancel(event: PointerEvent) -> PointerEvent {
    PointerEvent {
        event: PointerEventKind::Cancel,
        ..event
    }
}

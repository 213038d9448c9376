use super::*;

/// Controller action a listener runs when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    MenuToggle,
    MenuLinkClose,
    SlideNext,
    SlidePrev,
    SliderPause,
    SliderResume,
    ContactSubmit,
    SmoothScroll,
}

impl Handler {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::MenuToggle => "menu_toggle",
            Self::MenuLinkClose => "menu_link_close",
            Self::SlideNext => "slide_next",
            Self::SlidePrev => "slide_prev",
            Self::SliderPause => "slider_pause",
            Self::SliderResume => "slider_resume",
            Self::ContactSubmit => "contact_submit",
            Self::SmoothScroll => "smooth_scroll",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Pointer enter/leave and focus changes fire on the target only.
pub(crate) fn event_bubbles(event_type: &str) -> bool {
    !matches!(event_type, "mouseenter" | "mouseleave" | "focus" | "blur")
}

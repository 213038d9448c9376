use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
}

/// A recorded `scrollIntoView` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target_id: String,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone)]
pub(crate) struct SmoothScroll {
    anchors: usize,
}

impl SmoothScroll {
    pub(crate) fn install(page: &mut Page, config: &ScrollConfig) -> Result<Option<Self>> {
        let anchors = page.dom.query_selector_all(&config.anchors)?;
        for anchor in &anchors {
            page.listeners.add(*anchor, "click", Handler::SmoothScroll);
        }
        page.trace_behavior_line(format!("[install] scroll anchors={}", anchors.len()));
        Ok(Some(Self {
            anchors: anchors.len(),
        }))
    }

    /// Replaces the instant fragment jump with a smooth scroll. A fragment
    /// with no matching element leaves the click as a no-op.
    pub(crate) fn handle_click(&mut self, page: &mut Page, event: &mut EventState) -> Result<()> {
        let href = page.dom.attr(event.current_target, "href").unwrap_or_default();
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(());
        };
        event.prevent_default();

        match page.dom.by_id(fragment) {
            Some(target) => page.scroll_into_view(target, ScrollBehavior::Smooth),
            None => page.trace_behavior_line(format!(
                "[scroll] missing target fragment={fragment} anchors={}",
                self.anchors
            )),
        }
        Ok(())
    }
}

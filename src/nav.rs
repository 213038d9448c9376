use super::*;

/// Collapsible navigation bound to a trigger button.
///
/// The trigger's `aria-expanded` attribute is the source of truth; it is
/// read back on every toggle rather than cached.
#[derive(Debug, Clone)]
pub(crate) struct NavToggle {
    trigger: NodeId,
    container: NodeId,
    open_class: String,
}

impl NavToggle {
    pub(crate) fn install(page: &mut Page, config: &NavConfig) -> Result<Option<Self>> {
        let trigger = page.dom.query_selector(&config.trigger)?;
        let container = page.dom.query_selector(&config.container)?;
        let (Some(trigger), Some(container)) = (trigger, container) else {
            page.trace_behavior_line(format!(
                "[install] nav skipped trigger={} container={}",
                config.trigger, config.container
            ));
            return Ok(None);
        };

        page.listeners.add(trigger, "click", Handler::MenuToggle);
        let links = page.dom.query_selector_all_from(container, &config.links)?;
        for link in &links {
            page.listeners.add(*link, "click", Handler::MenuLinkClose);
        }
        page.trace_behavior_line(format!("[install] nav links={}", links.len()));

        Ok(Some(Self {
            trigger,
            container,
            open_class: config.open_class.clone(),
        }))
    }

    fn expanded(&self, dom: &Dom) -> bool {
        dom.attr(self.trigger, "aria-expanded").as_deref() == Some("true")
    }

    pub(crate) fn toggle(&mut self, page: &mut Page) -> Result<()> {
        let expanded = !self.expanded(&page.dom);
        page.dom.set_attr(
            self.trigger,
            "aria-expanded",
            if expanded { "true" } else { "false" },
        )?;
        let open = page.dom.class_toggle(self.container, &self.open_class)?;
        page.trace_behavior_line(format!("[nav] toggle expanded={expanded} open={open}"));
        Ok(())
    }

    pub(crate) fn close(&mut self, page: &mut Page) -> Result<()> {
        page.dom.class_remove(self.container, &self.open_class)?;
        page.dom.set_attr(self.trigger, "aria-expanded", "false")?;
        page.trace_behavior_line("[nav] close".into());
        Ok(())
    }
}

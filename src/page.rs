use super::*;

/// A parsed page with the enhancement behaviours bound to it.
///
/// Actions such as [`Page::click`] dispatch events synchronously and run
/// every listener to completion before returning. Time only moves when a
/// test calls [`Page::advance_time`] or one of the other timer methods.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) trace_state: TraceState,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) location_fragment: Option<String>,
    pub(crate) scroll_log: Vec<ScrollRequest>,
    pub(crate) submissions: Vec<String>,
    pub(crate) navigations: Vec<String>,
    pub(crate) installed: bool,
    pub(crate) nav: Option<NavToggle>,
    pub(crate) slider: Option<SliderController>,
    pub(crate) contact: Option<ContactValidator>,
    pub(crate) smooth_scroll: Option<SmoothScroll>,
}

fn nav_slot(page: &mut Page) -> &mut Option<NavToggle> {
    &mut page.nav
}

fn slider_slot(page: &mut Page) -> &mut Option<SliderController> {
    &mut page.slider
}

fn contact_slot(page: &mut Page) -> &mut Option<ContactValidator> {
    &mut page.contact
}

fn smooth_scroll_slot(page: &mut Page) -> &mut Option<SmoothScroll> {
    &mut page.smooth_scroll
}

impl Page {
    /// Parses the markup and installs every behaviour with the default config.
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, &EnhanceConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: &EnhanceConfig) -> Result<Self> {
        let mut page = Self::parse(html)?;
        page.install(config)?;
        Ok(page)
    }

    /// Parses the markup without binding any behaviour, so tracing can be
    /// switched on before [`Page::install`] runs.
    pub fn parse(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            trace_state: TraceState::default(),
            active_element: None,
            hovered: None,
            location_fragment: None,
            scroll_log: Vec::new(),
            submissions: Vec::new(),
            navigations: Vec::new(),
            installed: false,
            nav: None,
            slider: None,
            contact: None,
            smooth_scroll: None,
        })
    }

    /// Binds the behaviours to the page, the equivalent of a
    /// `DOMContentLoaded` handler. Each behaviour whose elements are absent
    /// stays uninstalled.
    pub fn install(&mut self, config: &EnhanceConfig) -> Result<()> {
        if self.installed {
            return Err(Error::Runtime("behaviours are already installed".into()));
        }
        config.validate()?;
        self.installed = true;

        if config.nav.enabled {
            self.nav = NavToggle::install(self, &config.nav)?;
        }
        if config.slider.enabled {
            self.slider = SliderController::install(self, &config.slider)?;
        }
        if config.form.enabled {
            self.contact = ContactValidator::install(self, &config.form)?;
        }
        if config.scroll.enabled {
            self.smooth_scroll = SmoothScroll::install(self, &config.scroll)?;
        }

        let summary = format!(
            "[install] nav={} slider={} form={} scroll={}",
            self.nav.is_some(),
            self.slider.is_some(),
            self.contact.is_some(),
            self.smooth_scroll.is_some()
        );
        self.trace_behavior_line(summary);
        Ok(())
    }

    fn with_component<C>(
        &mut self,
        slot: fn(&mut Page) -> &mut Option<C>,
        f: impl FnOnce(&mut C, &mut Page) -> Result<()>,
    ) -> Result<()> {
        let Some(mut component) = slot(self).take() else {
            return Ok(());
        };
        let result = f(&mut component, self);
        *slot(self) = Some(component);
        result
    }

    pub(crate) fn with_slider(
        &mut self,
        f: impl FnOnce(&mut SliderController, &mut Page) -> Result<()>,
    ) -> Result<()> {
        self.with_component(slider_slot, f)
    }

    fn run_handler(&mut self, handler: Handler, event: &mut EventState) -> Result<()> {
        match handler {
            Handler::MenuToggle => self.with_component(nav_slot, |nav, page| nav.toggle(page)),
            Handler::MenuLinkClose => self.with_component(nav_slot, |nav, page| nav.close(page)),
            Handler::SlideNext => self.with_slider(|slider, page| slider.manual_next(page)),
            Handler::SlidePrev => self.with_slider(|slider, page| slider.manual_prev(page)),
            Handler::SliderPause => self.with_slider(|slider, page| {
                slider.stop_autoplay(page);
                Ok(())
            }),
            Handler::SliderResume => self.with_slider(|slider, page| {
                slider.start_autoplay(page);
                Ok(())
            }),
            Handler::ContactSubmit => self.with_component(contact_slot, |contact, page| {
                contact.handle_submit(page, event)
            }),
            Handler::SmoothScroll => self.with_component(smooth_scroll_slot, |scroll, page| {
                scroll.handle_click(page, event)
            }),
        }
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.attr(target, "readonly").is_some() {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        stacker::grow(32 * 1024 * 1024, || {
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, "input")?;
            Ok(())
        })
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || self.click_node(target))
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self.dom.is_tag(target, "form") {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "form")
        };
        let Some(form) = form else {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form descendant".into(),
                actual: self.dom.tag_name(target).unwrap_or_default().to_string(),
            });
        };
        stacker::grow(32 * 1024 * 1024, || self.submit_form(form))
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    /// Moves the pointer onto the element, firing `mouseleave` on regions it
    /// left and `mouseenter` on regions it entered.
    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || self.move_pointer(Some(target)))
    }

    /// Moves the pointer off the page.
    pub fn unhover(&mut self) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || self.move_pointer(None))
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            self.dispatch_event(target, event)?;
            Ok(())
        })
    }

    fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if self.dom.is_tag(node, "a") {
                if let Some(href) = self.dom.attr(node, "href") {
                    self.follow_link(&href);
                    return Ok(());
                }
            }
            if is_submit_control(&self.dom, node) {
                if let Some(form) = self.dom.find_ancestor_by_tag(node, "form") {
                    self.submit_form(form)?;
                }
                return Ok(());
            }
            cursor = self.dom.parent_element(node);
        }
        Ok(())
    }

    fn follow_link(&mut self, href: &str) {
        let Some(fragment) = href.strip_prefix('#') else {
            self.trace_event_line(format!("[event] default navigate href={href}"));
            self.navigations.push(href.to_string());
            return;
        };
        self.location_fragment = Some(fragment.to_string());
        if let Some(target) = self.dom.by_id(fragment) {
            self.scroll_into_view(target, ScrollBehavior::Instant);
        }
        self.trace_event_line(format!("[event] default jump fragment={fragment}"));
    }

    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(form, "submit")?;
        if !outcome.default_prevented {
            let label = self.trace_node_label(form);
            self.trace_event_line(format!("[event] default submit form={label}"));
            self.submissions.push(label);
        }
        Ok(())
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.active_element == Some(node) {
            return Ok(());
        }
        if let Some(current) = self.active_element.take() {
            self.dispatch_event(current, "blur")?;
        }
        self.active_element = Some(node);
        self.dispatch_event(node, "focus")?;
        Ok(())
    }

    fn move_pointer(&mut self, next: Option<NodeId>) -> Result<()> {
        let chain = |dom: &Dom, node: Option<NodeId>| {
            let mut out = Vec::new();
            let mut cursor = node;
            while let Some(current) = cursor {
                out.push(current);
                cursor = dom.parent_element(current);
            }
            out
        };
        let old_chain = chain(&self.dom, self.hovered);
        let new_chain = chain(&self.dom, next);
        self.hovered = next;

        for node in old_chain.iter().filter(|node| !new_chain.contains(node)) {
            self.dispatch_event(*node, "mouseleave")?;
        }
        for node in new_chain.iter().rev().filter(|node| !old_chain.contains(node)) {
            self.dispatch_event(*node, "mouseenter")?;
        }
        Ok(())
    }

    pub(crate) fn scroll_into_view(&mut self, target: NodeId, behavior: ScrollBehavior) {
        let request = ScrollRequest {
            target_id: self.dom.attr(target, "id").unwrap_or_default(),
            behavior,
            block: ScrollBlock::Start,
        };
        self.trace_behavior_line(format!(
            "[scroll] into_view target={} behavior={:?}",
            self.trace_node_label(target),
            behavior
        ));
        self.scroll_log.push(request);
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = vec![target];
        if event_bubbles(event_type) {
            let mut cursor = self.dom.parent(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = self.dom.parent(node);
            }
        }

        for node in path {
            event.current_target = node;
            for handler in self.listeners.get(node, event_type) {
                if self.trace_state.enabled && self.trace_state.events {
                    let target_label = self.trace_node_label(event.target);
                    let current_label = self.trace_node_label(node);
                    self.trace_event_line(format!(
                        "[event] {} target={} current={} handler={} default_prevented={}",
                        event.event_type,
                        target_label,
                        current_label,
                        handler.label(),
                        event.default_prevented
                    ));
                }
                self.run_handler(handler, &mut event)?;
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    /// Inline style property, e.g. `transform` on the slide track.
    pub fn style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style_property(target, property))
    }

    pub fn is_hidden(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.has_attr(target, "hidden")
    }

    pub fn is_focused(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.active_element == Some(target))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_selector(selector)?.is_some())
    }

    pub fn scroll_log(&self) -> &[ScrollRequest] {
        &self.scroll_log
    }

    pub fn location_fragment(&self) -> Option<&str> {
        self.location_fragment.as_deref()
    }

    /// Forms whose submit event was not cancelled, labelled by id or tag.
    pub fn submissions(&self) -> &[String] {
        &self.submissions
    }

    /// Hrefs of non-fragment links followed by default click handling.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Current slide, or `None` when the slider is not installed.
    pub fn slide_index(&self) -> Option<usize> {
        self.slider.as_ref().map(SliderController::index)
    }

    pub fn autoplay_active(&self) -> bool {
        self.slider
            .as_ref()
            .is_some_and(SliderController::autoplay_active)
    }

    pub fn listener_count(&self, selector: &str, event: &str) -> Result<usize> {
        let target = self.select_one(selector)?;
        Ok(self.listeners.count(target, event))
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check(selector, target, expected, actual)
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self
            .dom
            .attr(target, name)
            .unwrap_or_else(|| "<absent>".to_string());
        self.check(selector, target, expected, actual)
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        self.check(
            selector,
            target,
            &format!("{class_name}={expected}"),
            format!("{class_name}={actual}"),
        )
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self
            .dom
            .style_property(target, property)
            .unwrap_or_else(|| "<unset>".to_string());
        self.check(selector, target, expected, actual)
    }

    pub fn assert_hidden(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.has_attr(target, "hidden")?;
        self.check(
            selector,
            target,
            &format!("hidden={expected}"),
            format!("hidden={actual}"),
        )
    }

    pub fn assert_focused(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.active_element == Some(target) {
            return Ok(());
        }
        let actual = self
            .active_element
            .map(|node| self.trace_node_label(node))
            .unwrap_or_else(|| "<none>".to_string());
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: "focused".into(),
            actual: format!("focus on {actual}"),
            dom_snippet: self.node_snippet(target),
        })
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: String) -> Result<()> {
        if actual == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
            dom_snippet: self.node_snippet(target),
        })
    }
}

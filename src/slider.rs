use super::*;

/// Wrapping index over a fixed, non-empty run of slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCursor {
    index: usize,
    len: usize,
}

impl SlideCursor {
    /// Starts at slide 0. Returns `None` for an empty run.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.len
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn retreat(&mut self) -> usize {
        self.index = (self.index + self.len - 1) % self.len;
        self.index
    }

    /// Track transform for the current slide, e.g. `translateX(-200%)`.
    pub fn transform(&self) -> String {
        format!("translateX(-{}%)", self.index * 100)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SliderController {
    track: Option<NodeId>,
    cursor: SlideCursor,
    autoplay_ms: i64,
    autoplay: Option<i64>,
}

impl SliderController {
    pub(crate) fn install(page: &mut Page, config: &SliderConfig) -> Result<Option<Self>> {
        let slides = page.dom.query_selector_all(&config.slides)?;
        let Some(cursor) = SlideCursor::new(slides.len()) else {
            page.trace_behavior_line("[install] slider inert slides=0".into());
            return Ok(None);
        };
        let track = page.dom.query_selector(&config.track)?;

        if let Some(next) = page.dom.query_selector(&config.next_button)? {
            page.listeners.add(next, "click", Handler::SlideNext);
        }
        if let Some(prev) = page.dom.query_selector(&config.prev_button)? {
            page.listeners.add(prev, "click", Handler::SlidePrev);
        }
        if let Some(region) = page.dom.query_selector(&config.hover_region)? {
            page.listeners.add(region, "mouseenter", Handler::SliderPause);
            page.listeners.add(region, "mouseleave", Handler::SliderResume);
        }

        let mut slider = Self {
            track,
            cursor,
            autoplay_ms: config.autoplay_ms,
            autoplay: None,
        };
        page.trace_behavior_line(format!(
            "[install] slider slides={} autoplay_ms={}",
            cursor.slide_count(),
            slider.autoplay_ms
        ));
        slider.render(page)?;
        slider.start_autoplay(page);
        Ok(Some(slider))
    }

    pub(crate) fn index(&self) -> usize {
        self.cursor.index()
    }

    pub(crate) fn autoplay_active(&self) -> bool {
        self.autoplay.is_some()
    }

    fn render(&self, page: &mut Page) -> Result<()> {
        let Some(track) = self.track else {
            return Ok(());
        };
        page.dom
            .set_style_property(track, "transform", &self.cursor.transform())
    }

    /// Replaces any running autoplay timer with a fresh one.
    pub(crate) fn start_autoplay(&mut self, page: &mut Page) {
        self.stop_autoplay(page);
        let id = page.set_interval(TimerCallback::SliderAutoplay, self.autoplay_ms);
        self.autoplay = Some(id);
        page.trace_behavior_line(format!("[slider] autoplay start timer={id}"));
    }

    pub(crate) fn stop_autoplay(&mut self, page: &mut Page) {
        if let Some(id) = self.autoplay.take() {
            page.clear_interval(id);
            page.trace_behavior_line(format!("[slider] autoplay stop timer={id}"));
        }
    }

    pub(crate) fn manual_next(&mut self, page: &mut Page) -> Result<()> {
        self.cursor.advance();
        self.after_move(page, "next")?;
        self.start_autoplay(page);
        Ok(())
    }

    pub(crate) fn manual_prev(&mut self, page: &mut Page) -> Result<()> {
        self.cursor.retreat();
        self.after_move(page, "prev")?;
        self.start_autoplay(page);
        Ok(())
    }

    pub(crate) fn autoplay_tick(&mut self, page: &mut Page) -> Result<()> {
        self.cursor.advance();
        self.after_move(page, "autoplay")
    }

    fn after_move(&self, page: &mut Page, source: &str) -> Result<()> {
        page.trace_behavior_line(format!(
            "[slider] {source} index={} now_ms={}",
            self.cursor.index(),
            page.now_ms()
        ));
        self.render(page)
    }
}

use super::*;

pub(crate) const DEFAULT_AUTOPLAY_MS: i64 = 5000;
// `\s` spelled out with the browser's whitespace set.
pub(crate) const DEFAULT_EMAIL_PATTERN: &str = concat!(
    r"^[^\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}@]+",
    r"@[^\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}@]+",
    r"\.[^\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}@]+$",
);
pub(crate) const DEFAULT_SUCCESS_TEXT: &str =
    "Thanks! Your message passed client-side validation.";

/// Selectors and constants each behaviour binds with at install time.
///
/// `Default` matches the stock markup contract: `#menu-btn`,
/// `#primary-navigation`, `.slides .slide`, `#contact-form` and
/// `a[href^="#"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnhanceConfig {
    pub nav: NavConfig,
    pub slider: SliderConfig,
    pub form: FormConfig,
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    pub enabled: bool,
    pub trigger: String,
    pub container: String,
    pub links: String,
    pub open_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger: "#menu-btn".into(),
            container: "#primary-navigation".into(),
            links: "a".into(),
            open_class: "open".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderConfig {
    pub enabled: bool,
    pub track: String,
    pub slides: String,
    pub next_button: String,
    pub prev_button: String,
    pub hover_region: String,
    pub autoplay_ms: i64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            track: ".slides".into(),
            slides: ".slides .slide".into(),
            next_button: ".slider-btn.next".into(),
            prev_button: ".slider-btn.prev".into(),
            hover_region: ".slider".into(),
            autoplay_ms: DEFAULT_AUTOPLAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub enabled: bool,
    pub form: String,
    pub error_slot: String,
    pub success_slot: String,
    pub success_text: String,
    pub email_pattern: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            form: "#contact-form".into(),
            error_slot: ".error".into(),
            success_slot: "#form-success".into(),
            success_text: DEFAULT_SUCCESS_TEXT.into(),
            email_pattern: DEFAULT_EMAIL_PATTERN.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    pub enabled: bool,
    pub anchors: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchors: "a[href^=\"#\"]".into(),
        }
    }
}

impl EnhanceConfig {
    /// Config with every behaviour switched off; enable sections as needed.
    pub fn none() -> Self {
        let mut config = Self::default();
        config.nav.enabled = false;
        config.slider.enabled = false;
        config.form.enabled = false;
        config.scroll.enabled = false;
        config
    }

    pub fn with_autoplay_ms(mut self, autoplay_ms: i64) -> Self {
        self.slider.autoplay_ms = autoplay_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.nav.enabled {
            require_selector("nav.trigger", &self.nav.trigger)?;
            require_selector("nav.container", &self.nav.container)?;
            require_selector("nav.links", &self.nav.links)?;
            if self.nav.open_class.trim().is_empty()
                || self.nav.open_class.split_whitespace().count() != 1
            {
                return Err(Error::InvalidConfig(format!(
                    "nav.open_class must be a single class token, got {:?}",
                    self.nav.open_class
                )));
            }
        }
        if self.slider.enabled {
            require_selector("slider.track", &self.slider.track)?;
            require_selector("slider.slides", &self.slider.slides)?;
            require_selector("slider.next_button", &self.slider.next_button)?;
            require_selector("slider.prev_button", &self.slider.prev_button)?;
            require_selector("slider.hover_region", &self.slider.hover_region)?;
            if self.slider.autoplay_ms <= 0 {
                return Err(Error::InvalidConfig(format!(
                    "slider.autoplay_ms must be positive, got {}",
                    self.slider.autoplay_ms
                )));
            }
        }
        if self.form.enabled {
            require_selector("form.form", &self.form.form)?;
            require_selector("form.error_slot", &self.form.error_slot)?;
            require_selector("form.success_slot", &self.form.success_slot)?;
            compile_email_pattern(&self.form.email_pattern)?;
        }
        if self.scroll.enabled {
            require_selector("scroll.anchors", &self.scroll.anchors)?;
        }
        Ok(())
    }
}

fn require_selector(field: &str, selector: &str) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(Error::InvalidConfig(format!("{field} selector is empty")));
    }
    parse_selector_groups(selector)
        .map(|_| ())
        .map_err(|err| Error::InvalidConfig(format!("{field}: {err}")))
}

pub(crate) fn compile_email_pattern(pattern: &str) -> Result<fancy_regex::Regex> {
    fancy_regex::Regex::new(pattern)
        .map_err(|err| Error::InvalidConfig(format!("form.email_pattern: {err}")))
}

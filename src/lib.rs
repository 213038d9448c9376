//! Progressive page behaviours (navigation toggle, autoplay slider,
//! contact-form validation and smooth-scroll anchors) bound to a
//! deterministic in-memory page.
//!
//! ```
//! use page_enhance::{Page, Result};
//!
//! fn main() -> Result<()> {
//!     let mut page = Page::from_html(
//!         r#"<button id="menu-btn" aria-expanded="false">Menu</button>
//!            <nav id="primary-navigation"><a href="/about">About</a></nav>"#,
//!     )?;
//!     page.click("#menu-btn")?;
//!     page.assert_attr("#menu-btn", "aria-expanded", "true")?;
//!     page.assert_class("#primary-navigation", "open", true)?;
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod config;
mod dom;
mod events;
mod form;
mod html;
mod nav;
mod page;
mod scheduler;
mod scroll;
mod selector;
mod slider;
mod trace;

#[cfg(test)]
mod tests;

pub use config::{EnhanceConfig, FormConfig, NavConfig, ScrollConfig, SliderConfig};
pub use form::{FieldError, FieldValues, FormField, validate_fields};
pub use page::Page;
pub use scheduler::PendingTimer;
pub use scroll::{ScrollBehavior, ScrollBlock, ScrollRequest};
pub use slider::SlideCursor;

use config::*;
use dom::*;
use events::*;
use form::*;
use html::*;
use nav::*;
use scheduler::*;
use scroll::*;
use selector::*;
use slider::*;
use trace::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    InvalidConfig(String),
    Runtime(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

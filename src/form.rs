use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [Self::Name, Self::Email, Self::Message];

    /// The control's `name` attribute.
    pub fn control_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Name => "Please enter your full name (2+ characters).",
            Self::Email => "Please enter a valid email address.",
            Self::Message => "Message must be at least 10 characters.",
        }
    }
}

/// Raw control values as read at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FieldValues {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: FormField) -> Self {
        Self {
            field,
            message: field.failure_message(),
        }
    }
}

/// Checks all three fields with the stock email pattern. Every failing
/// field is reported, in name, email, message order.
pub fn validate_fields(values: &FieldValues) -> Result<Vec<FieldError>> {
    let email_pattern = compile_email_pattern(DEFAULT_EMAIL_PATTERN)?;
    validate_fields_with(values, &email_pattern)
}

pub(crate) fn validate_fields_with(
    values: &FieldValues,
    email_pattern: &fancy_regex::Regex,
) -> Result<Vec<FieldError>> {
    let mut errors = Vec::new();
    if trimmed_length(&values.name) < 2 {
        errors.push(FieldError::new(FormField::Name));
    }
    let email_ok = email_pattern
        .is_match(&values.email)
        .map_err(|err| Error::Runtime(format!("email pattern failed: {err}")))?;
    if !email_ok {
        errors.push(FieldError::new(FormField::Email));
    }
    if trimmed_length(&values.message) < 10 {
        errors.push(FieldError::new(FormField::Message));
    }
    Ok(errors)
}

// Length in UTF-16 code units after stripping browser whitespace at both ends.
fn trimmed_length(value: &str) -> usize {
    value.trim_matches(is_js_whitespace).encode_utf16().count()
}

/// The browser's whitespace set for `trim()` and regex `\s`. Unlike
/// `char::is_whitespace` it includes U+FEFF and excludes U+0085.
fn is_js_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

#[derive(Debug)]
pub(crate) struct ContactValidator {
    form: NodeId,
    error_slot: String,
    success_slot: String,
    success_text: String,
    email_pattern: fancy_regex::Regex,
}

impl ContactValidator {
    pub(crate) fn install(page: &mut Page, config: &FormConfig) -> Result<Option<Self>> {
        let Some(form) = page.dom.query_selector(&config.form)? else {
            page.trace_behavior_line(format!("[install] form skipped form={}", config.form));
            return Ok(None);
        };
        page.listeners.add(form, "submit", Handler::ContactSubmit);
        page.trace_behavior_line(format!(
            "[install] form target={}",
            page.trace_node_label(form)
        ));

        Ok(Some(Self {
            form,
            error_slot: config.error_slot.clone(),
            success_slot: config.success_slot.clone(),
            success_text: config.success_text.clone(),
            email_pattern: compile_email_pattern(&config.email_pattern)?,
        }))
    }

    pub(crate) fn handle_submit(&mut self, page: &mut Page, event: &mut EventState) -> Result<()> {
        event.prevent_default();

        let slots = page.dom.query_selector_all_from(self.form, &self.error_slot)?;
        for slot in &slots {
            page.dom.set_text_content(*slot, "")?;
        }

        let controls = FormField::ALL.map(|field| self.control(&page.dom, field));
        let read = |index: usize| -> Result<String> {
            controls[index].map_or_else(|| Ok(String::new()), |node| page.dom.value(node))
        };
        let values = FieldValues {
            name: read(0)?,
            email: read(1)?,
            message: read(2)?,
        };

        let errors = validate_fields_with(&values, &self.email_pattern)?;
        if errors.is_empty() {
            return self.succeed(page);
        }

        for error in &errors {
            let control = match error.field {
                FormField::Name => controls[0],
                FormField::Email => controls[1],
                FormField::Message => controls[2],
            };
            if let Some(control) = control {
                self.show_error(page, control, error.message)?;
            }
        }
        let fields = errors
            .iter()
            .map(|error| error.field.control_name())
            .collect::<Vec<_>>()
            .join(",");
        page.trace_behavior_line(format!("[form] rejected fields={fields}"));

        let first_filled = page
            .dom
            .query_selector_all_from(self.form, &self.error_slot)?
            .into_iter()
            .find(|slot| page.dom.has_element_or_text_children(*slot));
        if let Some(input) = first_filled.and_then(|slot| page.dom.previous_element_sibling(slot)) {
            page.focus_node(input)?;
        }
        Ok(())
    }

    // First control in the form carrying the field's name attribute.
    fn control(&self, dom: &Dom, field: FormField) -> Option<NodeId> {
        let mut nodes = Vec::new();
        dom.collect_elements_descendants_dfs(self.form, &mut nodes);
        nodes.into_iter().find(|node| {
            is_form_control(dom, *node)
                && dom.attr(*node, "name").as_deref() == Some(field.control_name())
        })
    }

    fn show_error(&self, page: &mut Page, control: NodeId, message: &str) -> Result<()> {
        let Some(parent) = page.dom.parent_element(control) else {
            return Ok(());
        };
        if let Some(slot) = page.dom.query_selector_from(parent, &self.error_slot)? {
            page.dom.set_text_content(slot, message)?;
        }
        Ok(())
    }

    fn succeed(&self, page: &mut Page) -> Result<()> {
        if let Some(notice) = page.dom.query_selector(&self.success_slot)? {
            page.dom.remove_attr(notice, "hidden")?;
            page.dom.set_text_content(notice, &self.success_text)?;
        }
        self.reset(page)?;
        page.trace_behavior_line("[form] accepted".into());
        Ok(())
    }

    fn reset(&self, page: &mut Page) -> Result<()> {
        let mut nodes = Vec::new();
        page.dom.collect_elements_descendants_dfs(self.form, &mut nodes);
        for node in nodes {
            if is_form_control(&page.dom, node) && !page.dom.is_tag(node, "button") {
                let initial = page.dom.default_value(node);
                page.dom.set_value(node, &initial)?;
            }
        }
        page.dispatch_event(self.form, "reset")?;
        Ok(())
    }
}

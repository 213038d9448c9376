use super::*;

fn fill(page: &mut Page, name: &str, email: &str, message: &str) -> Result<()> {
    page.type_text("#name", name)?;
    page.type_text("#email", email)?;
    page.type_text("#message", message)?;
    Ok(())
}

#[test]
fn invalid_email_and_short_message_are_both_reported() -> Result<()> {
    let mut page = contact_page()?;
    fill(&mut page, "Al", "not-an-email", "short")?;
    page.click("#send")?;

    page.assert_text("#name-error", "")?;
    page.assert_text("#email-error", "Please enter a valid email address.")?;
    page.assert_text("#message-error", "Message must be at least 10 characters.")?;
    page.assert_focused("#email")?;
    page.assert_hidden("#form-success", true)?;
    assert!(page.submissions().is_empty());
    page.assert_value("#email", "not-an-email")?;
    Ok(())
}

#[test]
fn empty_form_reports_every_field_and_focuses_name() -> Result<()> {
    let mut page = contact_page()?;
    page.submit("#contact-form")?;

    page.assert_text("#name-error", "Please enter your full name (2+ characters).")?;
    page.assert_text("#email-error", "Please enter a valid email address.")?;
    page.assert_text("#message-error", "Message must be at least 10 characters.")?;
    page.assert_focused("#name")?;
    Ok(())
}

#[test]
fn valid_submission_shows_success_and_clears_fields() -> Result<()> {
    let mut page = contact_page()?;
    fill(
        &mut page,
        "Jane Doe",
        "jane@example.com",
        "This is a long enough message.",
    )?;
    page.click("#send")?;

    page.assert_hidden("#form-success", false)?;
    page.assert_text(
        "#form-success",
        "Thanks! Your message passed client-side validation.",
    )?;
    page.assert_value("#name", "")?;
    page.assert_value("#email", "")?;
    page.assert_value("#message", "")?;
    for slot in ["#name-error", "#email-error", "#message-error"] {
        page.assert_text(slot, "")?;
    }
    assert!(page.submissions().is_empty());
    Ok(())
}

#[test]
fn resubmitting_clears_stale_errors() -> Result<()> {
    let mut page = contact_page()?;
    page.submit("#contact-form")?;
    page.assert_text("#name-error", "Please enter your full name (2+ characters).")?;

    fill(&mut page, "Jo", "jo@mail.example", "still short")?;
    page.submit("#send")?;
    page.assert_text("#name-error", "")?;
    page.assert_text("#email-error", "")?;
    page.assert_text("#message-error", "")?;
    page.assert_hidden("#form-success", false)?;
    Ok(())
}

#[test]
fn whitespace_is_trimmed_before_length_checks() -> Result<()> {
    let mut page = contact_page()?;
    fill(&mut page, "   A   ", "a@b.co", "          x         ")?;
    page.submit("#contact-form")?;
    page.assert_text("#name-error", "Please enter your full name (2+ characters).")?;
    page.assert_text("#message-error", "Message must be at least 10 characters.")?;
    page.assert_text("#email-error", "")?;
    page.assert_focused("#name")?;
    Ok(())
}

#[test]
fn reset_restores_markup_defaults() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="contact-form">
             <div><input name="name" id="name" value="Guest"><span class="error"></span></div>
             <div><input name="email" id="email"><span class="error"></span></div>
             <div><textarea name="message" id="message">Say hello here</textarea><span class="error"></span></div>
             <div><select name="topic" id="topic"><option>general</option><option selected>sales</option></select></div>
           </form>
           <p id="form-success" hidden>placeholder</p>"#,
    )?;
    page.assert_value("#topic", "sales")?;
    page.type_text("#name", "Jane Doe")?;
    page.type_text("#email", "jane@example.com")?;
    page.type_text("#message", "A message that is long enough.")?;
    page.submit("#contact-form")?;

    page.assert_value("#name", "Guest")?;
    page.assert_value("#email", "")?;
    page.assert_value("#message", "Say hello here")?;
    page.assert_value("#topic", "sales")?;
    page.assert_text(
        "#form-success",
        "Thanks! Your message passed client-side validation.",
    )?;
    Ok(())
}

#[test]
fn missing_message_control_counts_as_empty() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="contact-form">
             <p><input name="name" id="name"><span class="error" id="name-error"></span></p>
             <p><input name="email" id="email"><span class="error" id="email-error"></span></p>
           </form>
           <div id="form-success" hidden></div>"#,
    )?;
    page.type_text("#name", "Jane")?;
    page.type_text("#email", "jane@example.com")?;
    page.submit("#contact-form")?;

    page.assert_hidden("#form-success", true)?;
    page.assert_text("#name-error", "")?;
    page.assert_text("#email-error", "")?;
    assert!(page.submissions().is_empty());
    Ok(())
}

#[test]
fn missing_success_slot_still_resets_the_form() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="contact-form">
             <div><input name="name" id="name"><span class="error"></span></div>
             <div><input name="email" id="email"><span class="error"></span></div>
             <div><textarea name="message" id="message"></textarea><span class="error"></span></div>
           </form>"#,
    )?;
    page.type_text("#name", "Jane")?;
    page.type_text("#email", "jane@example.com")?;
    page.type_text("#message", "Long enough message")?;
    page.submit("#contact-form")?;
    page.assert_value("#name", "")?;
    Ok(())
}

#[test]
fn other_forms_submit_normally() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="search"><input name="q"><button id="go">Go</button></form>"#,
    )?;
    page.click("#go")?;
    assert_eq!(page.submissions(), ["#search".to_string()]);
    Ok(())
}

#[test]
fn type_text_rejects_non_text_controls() -> Result<()> {
    let mut page = contact_page()?;
    match page.type_text("#send", "x") {
        Err(Error::TypeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, "input or textarea");
            assert_eq!(actual, "button");
        }
        other => panic!("unexpected: {other:?}"),
    }
    Ok(())
}

#[test]
fn validate_fields_reports_in_field_order() -> Result<()> {
    let errors = validate_fields(&FieldValues::new("A", "bad", "short"))?;
    let fields = errors.iter().map(|error| error.field).collect::<Vec<_>>();
    assert_eq!(
        fields,
        vec![FormField::Name, FormField::Email, FormField::Message]
    );
    assert_eq!(errors[1].message, "Please enter a valid email address.");

    let clean = validate_fields(&FieldValues::new(
        "Jane Doe",
        "jane@example.com",
        "This is a long enough message.",
    ))?;
    assert!(clean.is_empty());
    Ok(())
}

#[test]
fn email_rule_requires_single_at_and_a_dot_after_it() -> Result<()> {
    for bad in ["", "a@b", "a b@c.d", "a@@b.c", "@b.c", "a@b.", "a@b c.d"] {
        let errors = validate_fields(&FieldValues::new("Jane", bad, "long enough text"))?;
        assert_eq!(errors.len(), 1, "{bad:?} should fail");
        assert_eq!(errors[0].field, FormField::Email);
    }
    for good in ["a@b.c", "first.last@sub.example.org", "x@y.z.w"] {
        let errors = validate_fields(&FieldValues::new("Jane", good, "long enough text"))?;
        assert!(errors.is_empty(), "{good:?} should pass");
    }
    Ok(())
}

#[test]
fn lengths_count_utf16_units() -> Result<()> {
    let errors = validate_fields(&FieldValues::new("\u{1F600}", "a@b.c", "ééééééééé\u{1F600}"))?;
    assert!(errors.is_empty());

    let errors = validate_fields(&FieldValues::new("é", "a@b.c", "ééééééééé"))?;
    let fields = errors.iter().map(|error| error.field).collect::<Vec<_>>();
    assert_eq!(fields, vec![FormField::Name, FormField::Message]);
    Ok(())
}

#[test]
fn next_line_counts_as_text_not_whitespace() -> Result<()> {
    let errors = validate_fields(&FieldValues::new(
        "\u{85}A",
        "a\u{85}b@c.de",
        "\u{85}123456789",
    ))?;
    assert!(errors.is_empty());
    Ok(())
}

#[test]
fn byte_order_mark_counts_as_whitespace() -> Result<()> {
    let errors = validate_fields(&FieldValues::new(
        "\u{feff}A\u{feff}",
        "a\u{feff}b@c.de",
        "\u{feff}123456789",
    ))?;
    let fields = errors.iter().map(|error| error.field).collect::<Vec<_>>();
    assert_eq!(
        fields,
        vec![FormField::Name, FormField::Email, FormField::Message]
    );

    for spaced in ["a\u{a0}b@c.de", "a@b\u{3000}c.de", "a@b.c\u{2028}d"] {
        let errors = validate_fields(&FieldValues::new("Jane", spaced, "long enough text"))?;
        assert_eq!(errors.len(), 1, "{spaced:?} should fail");
    }
    Ok(())
}

use super::*;

fn smooth(target_id: &str) -> ScrollRequest {
    ScrollRequest {
        target_id: target_id.to_string(),
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Start,
    }
}

#[test]
fn fragment_link_scrolls_smoothly_without_touching_location() -> Result<()> {
    let mut page = contact_page()?;
    page.click("#link-contact")?;

    assert_eq!(page.scroll_log(), [smooth("contact")]);
    assert_eq!(page.location_fragment(), None);
    Ok(())
}

#[test]
fn missing_target_is_a_suppressed_no_op() -> Result<()> {
    let mut page = contact_page()?;
    page.click("#to-missing")?;

    assert!(page.scroll_log().is_empty());
    assert_eq!(page.location_fragment(), None);
    assert!(page.navigations().is_empty());
    Ok(())
}

#[test]
fn nav_link_closes_menu_and_scrolls() -> Result<()> {
    let mut page = contact_page()?;
    page.click("#menu-btn")?;
    page.click("#link-work")?;

    page.assert_class("#primary-navigation", "open", false)?;
    page.assert_attr("#menu-btn", "aria-expanded", "false")?;
    assert_eq!(page.scroll_log(), [smooth("work")]);
    Ok(())
}

#[test]
fn nav_handler_runs_before_scroll_handler() -> Result<()> {
    let mut page = Page::parse(CONTACT_PAGE_HTML)?;
    page.set_trace_stderr(false);
    page.enable_trace(true);
    page.install(&EnhanceConfig::default())?;
    page.set_trace_timers(false);
    page.take_trace_logs();

    page.click("#link-about")?;
    let logs = page.take_trace_logs();
    let close = logs.iter().position(|line| line == "[nav] close");
    let scroll = logs
        .iter()
        .position(|line| line.starts_with("[scroll] into_view target=#about"));
    assert!(close.is_some() && scroll.is_some(), "logs: {logs:?}");
    assert!(close < scroll);
    Ok(())
}

#[test]
fn bare_hash_link_is_swallowed() -> Result<()> {
    let mut page = Page::from_html(r##"<a id="top" href="#">Top</a>"##)?;
    page.click("#top")?;
    assert!(page.scroll_log().is_empty());
    assert_eq!(page.location_fragment(), None);
    Ok(())
}

#[test]
fn click_on_child_of_anchor_is_handled_by_the_anchor() -> Result<()> {
    let mut page = Page::from_html(
        r##"<a href="#target"><span id="inner">go</span></a><div id="target"></div>"##,
    )?;
    page.click("#inner")?;
    assert_eq!(page.scroll_log(), [smooth("target")]);
    Ok(())
}

#[test]
fn without_the_behaviour_fragment_links_jump_instantly() -> Result<()> {
    let mut config = EnhanceConfig::default();
    config.scroll.enabled = false;
    let mut page = Page::from_html_with_config(CONTACT_PAGE_HTML, &config)?;

    page.click("#link-about")?;
    assert_eq!(page.location_fragment(), Some("about"));
    assert_eq!(
        page.scroll_log(),
        [ScrollRequest {
            target_id: "about".into(),
            behavior: ScrollBehavior::Instant,
            block: ScrollBlock::Start,
        }]
    );

    page.click("#to-missing")?;
    assert_eq!(page.location_fragment(), Some("missing-id"));
    assert_eq!(page.scroll_log().len(), 1);
    Ok(())
}

#[test]
fn anchors_are_bound_once_at_install() -> Result<()> {
    let page = contact_page()?;
    assert_eq!(page.listener_count("#link-about", "click")?, 2);
    assert_eq!(page.listener_count("#link-blog", "click")?, 1);
    assert_eq!(page.listener_count("#to-missing", "click")?, 1);
    Ok(())
}

#[test]
fn target_replaced_by_the_success_notice_is_gone() -> Result<()> {
    let html = r##"
        <form id="contact-form">
          <div><input id="name" name="name"><span class="error"></span></div>
          <div><input id="email" name="email"><span class="error"></span></div>
          <div><textarea id="message" name="message"></textarea><span class="error"></span></div>
          <button id="send" type="submit">Send</button>
        </form>
        <p id="form-success" hidden><b id="inner">old</b></p>
        <a id="go" href="#inner">Go</a>
    "##;
    let mut page = Page::from_html(html)?;
    page.assert_exists("#inner")?;

    page.type_text("#name", "Jane Doe")?;
    page.type_text("#email", "jane@example.com")?;
    page.type_text("#message", "This is a long enough message.")?;
    page.click("#send")?;
    page.assert_hidden("#form-success", false)?;
    assert!(!page.exists("#inner")?);

    page.click("#go")?;
    assert!(page.scroll_log().is_empty());
    assert_eq!(page.location_fragment(), None);
    Ok(())
}

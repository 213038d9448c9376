use super::*;

#[test]
fn parser_handles_void_tags_comments_and_entities() -> Result<()> {
    let dom = parse_html(
        r#"<!DOCTYPE html>
           <!-- banner -->
           <p id="p">Fish &amp; chips<br>today &lt;3 &#169;</p>
           <input id="in" value="a &quot;b&quot;" disabled>
           <img src="x.png" alt=''>"#,
    )?;
    let p = dom.by_id("p").ok_or_else(|| Error::SelectorNotFound("#p".into()))?;
    assert_eq!(dom.text_content(p), "Fish & chipstoday <3 \u{a9}");

    let input = dom.by_id("in").ok_or_else(|| Error::SelectorNotFound("#in".into()))?;
    assert_eq!(dom.value(input)?, "a \"b\"");
    assert!(dom.disabled(input));
    assert_eq!(dom.query_selector_all("img[alt='']")?.len(), 1);
    Ok(())
}

#[test]
fn textarea_body_is_raw_text_and_becomes_its_value() -> Result<()> {
    let dom = parse_html("<textarea id=\"t\">\n<b>not a tag</b> &amp; more</textarea><p id=\"after\"></p>")?;
    let textarea = dom.by_id("t").ok_or_else(|| Error::SelectorNotFound("#t".into()))?;
    assert_eq!(dom.value(textarea)?, "<b>not a tag</b> & more");
    assert!(dom.query_selector("textarea b")?.is_none());
    assert!(dom.by_id("after").is_some());
    Ok(())
}

#[test]
fn optional_end_tags_close_list_items_and_paragraphs() -> Result<()> {
    let dom = parse_html("<ul id=\"list\"><li>one<li>two</ul><p>first<div id=\"block\"></div>")?;
    assert_eq!(dom.query_selector_all("#list > li")?.len(), 2);
    assert_eq!(dom.query_selector_all("p > #block")?.len(), 0);
    Ok(())
}

#[test]
fn unclosed_comment_is_a_parse_error() {
    assert!(matches!(
        parse_html("<p>ok</p><!-- never closed"),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn selectors_cover_the_binding_vocabulary() -> Result<()> {
    let dom = parse_html(CONTACT_PAGE_HTML)?;

    assert_eq!(dom.query_selector_all("a[href^=\"#\"]")?.len(), 4);
    assert_eq!(dom.query_selector_all(".slides .slide")?.len(), 3);
    assert_eq!(dom.query_selector_all(".slider-btn.next")?.len(), 1);
    assert_eq!(dom.query_selector_all("#primary-navigation a")?.len(), 4);
    assert_eq!(dom.query_selector_all("a[href$=\"blog\"]")?.len(), 1);
    assert_eq!(dom.query_selector_all("input, textarea")?.len(), 3);
    assert_eq!(dom.query_selector_all(".error:empty")?.len(), 3);
    assert_eq!(dom.query_selector_all("label + input")?.len(), 2);
    assert_eq!(dom.query_selector_all("li:first-child > a")?.len(), 1);
    assert_eq!(dom.query_selector_all("li:not(:last-child) a")?.len(), 3);
    Ok(())
}

#[test]
fn scoped_queries_only_see_descendants() -> Result<()> {
    let dom = parse_html(CONTACT_PAGE_HTML)?;
    let form = dom
        .by_id("contact-form")
        .ok_or_else(|| Error::SelectorNotFound("#contact-form".into()))?;
    assert_eq!(dom.query_selector_all_from(form, ".error")?.len(), 3);
    assert!(dom.query_selector_from(form, "#form-success")?.is_none());
    Ok(())
}

#[test]
fn malformed_selectors_are_rejected() {
    for selector in ["", "div >", "a[href", ":hover", "p:not(", "##id"] {
        assert!(
            matches!(
                parse_selector_groups(selector),
                Err(Error::UnsupportedSelector(_))
            ),
            "{selector:?} should be rejected"
        );
    }
}

#[test]
fn class_and_style_helpers_round_out_attributes() -> Result<()> {
    let mut dom = parse_html(r#"<div id="d" class="a  b" style="color: red"></div>"#)?;
    let node = dom.by_id("d").ok_or_else(|| Error::SelectorNotFound("#d".into()))?;

    assert!(dom.class_toggle(node, "c")?);
    assert!(!dom.class_toggle(node, "a")?);
    assert_eq!(dom.attr(node, "class").as_deref(), Some("b c"));

    dom.set_style_property(node, "Transform", "translateX(-100%)")?;
    assert_eq!(
        dom.attr(node, "style").as_deref(),
        Some("color: red; transform: translateX(-100%);")
    );
    assert_eq!(dom.style_property(node, "color").as_deref(), Some("red"));
    Ok(())
}

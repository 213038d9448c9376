use super::*;

#[test]
fn install_renders_first_slide_and_schedules_autoplay() -> Result<()> {
    let page = contact_page()?;
    assert_eq!(page.slide_index(), Some(0));
    page.assert_style(".slides", "transform", "translateX(-0%)")?;
    assert!(page.autoplay_active());

    let timers = page.pending_timers();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].due_at, 5000);
    assert_eq!(timers[0].interval_ms, Some(5000));
    Ok(())
}

#[test]
fn autoplay_advances_every_period_and_wraps() -> Result<()> {
    let mut page = contact_page()?;

    page.advance_time(4999)?;
    assert_eq!(page.slide_index(), Some(0));
    page.advance_time(1)?;
    assert_eq!(page.slide_index(), Some(1));
    page.assert_style(".slides", "transform", "translateX(-100%)")?;

    page.advance_time(5000)?;
    page.assert_style(".slides", "transform", "translateX(-200%)")?;
    page.advance_time(5000)?;
    assert_eq!(page.slide_index(), Some(0));
    page.assert_style(".slides", "transform", "translateX(-0%)")?;
    Ok(())
}

#[test]
fn buttons_move_both_ways_with_wrap() -> Result<()> {
    let mut page = contact_page()?;
    page.click(".slider-btn.prev")?;
    assert_eq!(page.slide_index(), Some(2));
    page.assert_style(".slides", "transform", "translateX(-200%)")?;

    page.click(".slider-btn.next")?;
    assert_eq!(page.slide_index(), Some(0));
    page.click(".slider-btn.next")?;
    assert_eq!(page.slide_index(), Some(1));
    Ok(())
}

#[test]
fn manual_navigation_resets_the_countdown() -> Result<()> {
    let mut page = contact_page()?;
    page.advance_time_to(4000)?;
    page.click(".slider-btn.next")?;
    assert_eq!(page.slide_index(), Some(1));

    page.advance_time_to(8999)?;
    assert_eq!(page.slide_index(), Some(1));
    page.advance_time_to(9000)?;
    assert_eq!(page.slide_index(), Some(2));

    let timers = page.pending_timers();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].due_at, 14_000);
    Ok(())
}

#[test]
fn hover_pauses_and_leaving_restarts_from_a_full_period() -> Result<()> {
    let mut page = contact_page()?;
    page.advance_time(3000)?;
    page.hover(".slides .slide")?;
    assert!(!page.autoplay_active());
    assert!(page.pending_timers().is_empty());

    page.advance_time(20_000)?;
    assert_eq!(page.slide_index(), Some(0));

    page.hover("#about h2")?;
    assert!(page.autoplay_active());
    page.advance_time(4999)?;
    assert_eq!(page.slide_index(), Some(0));
    page.advance_time(1)?;
    assert_eq!(page.slide_index(), Some(1));
    Ok(())
}

#[test]
fn moving_within_the_slider_does_not_restart_autoplay() -> Result<()> {
    let mut page = contact_page()?;
    page.hover(".slider-btn.next")?;
    page.hover(".slides .slide")?;
    assert!(!page.autoplay_active());

    page.unhover()?;
    assert!(page.autoplay_active());
    assert_eq!(page.pending_timers().len(), 1);
    Ok(())
}

#[test]
fn manual_click_while_hovered_restarts_autoplay() -> Result<()> {
    let mut page = contact_page()?;
    page.hover(".slider-btn.next")?;
    assert!(!page.autoplay_active());

    page.click(".slider-btn.next")?;
    assert!(page.autoplay_active());
    page.advance_time(5000)?;
    assert_eq!(page.slide_index(), Some(2));
    Ok(())
}

#[test]
fn zero_slides_leave_the_slider_inert() -> Result<()> {
    let mut page = Page::from_html(
        r#"<div class="slider">
             <div class="slides"></div>
             <button class="slider-btn next">Next</button>
           </div>"#,
    )?;
    assert_eq!(page.slide_index(), None);
    assert!(page.pending_timers().is_empty());
    assert_eq!(page.style(".slides", "transform")?, None);
    assert_eq!(page.listener_count(".slider-btn.next", "click")?, 0);
    assert_eq!(page.listener_count(".slider", "mouseenter")?, 0);

    page.click(".slider-btn.next")?;
    page.advance_time(60_000)?;
    assert_eq!(page.style(".slides", "transform")?, None);
    Ok(())
}

#[test]
fn render_keeps_other_inline_declarations() -> Result<()> {
    let mut page = Page::from_html(
        r#"<div class="slides" style="display: flex; transform: none;">
             <div class="slide">A</div><div class="slide">B</div>
           </div>"#,
    )?;
    page.assert_attr(".slides", "style", "display: flex; transform: translateX(-0%);")?;
    page.advance_time(5000)?;
    page.assert_attr(
        ".slides",
        "style",
        "display: flex; transform: translateX(-100%);",
    )?;
    Ok(())
}

#[test]
fn single_slide_wraps_onto_itself() -> Result<()> {
    let mut page = Page::from_html(r#"<div class="slides"><div class="slide">Only</div></div>"#)?;
    page.advance_time(15_000)?;
    assert_eq!(page.slide_index(), Some(0));
    page.assert_style(".slides", "transform", "translateX(-0%)")?;
    Ok(())
}

#[test]
fn custom_period_is_honoured() -> Result<()> {
    let config = EnhanceConfig::default().with_autoplay_ms(1200);
    let mut page = Page::from_html_with_config(CONTACT_PAGE_HTML, &config)?;
    page.advance_time(3600)?;
    assert_eq!(page.slide_index(), Some(0));
    page.advance_time(1200)?;
    assert_eq!(page.slide_index(), Some(1));
    Ok(())
}

#[test]
fn slide_cursor_wraps_in_both_directions() {
    assert!(SlideCursor::new(0).is_none());

    let Some(mut cursor) = SlideCursor::new(4) else {
        panic!("non-empty cursor");
    };
    assert_eq!(cursor.retreat(), 3);
    assert_eq!(cursor.transform(), "translateX(-300%)");
    assert_eq!(cursor.advance(), 0);
    for _ in 0..4 {
        cursor.advance();
    }
    assert_eq!(cursor.index(), 0);
    assert_eq!(cursor.slide_count(), 4);
}

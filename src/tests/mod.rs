use super::*;

mod contact_form_validation;
mod html_and_selectors;
mod slider_autoplay;
mod smooth_scroll;

const CONTACT_PAGE_HTML: &str = r##"
<header class="site-header">
  <button id="menu-btn" aria-expanded="false" aria-controls="primary-navigation">Menu</button>
  <nav id="primary-navigation">
    <ul>
      <li><a id="link-about" href="#about">About</a></li>
      <li><a id="link-work" href="#work">Work</a></li>
      <li><a id="link-contact" href="#contact">Contact</a></li>
      <li><a id="link-blog" href="/blog">Blog</a></li>
    </ul>
  </nav>
</header>
<main>
  <section id="about"><h2>About</h2><p>Hello.</p></section>
  <section id="work">
    <div class="slider">
      <div class="slides">
        <div class="slide">One</div>
        <div class="slide">Two</div>
        <div class="slide">Three</div>
      </div>
      <button class="slider-btn prev" type="button">Prev</button>
      <button class="slider-btn next" type="button">Next</button>
    </div>
  </section>
  <section id="contact">
    <form id="contact-form" novalidate>
      <div class="field">
        <label for="name">Name</label>
        <input id="name" name="name" type="text">
        <span class="error" id="name-error"></span>
      </div>
      <div class="field">
        <label for="email">Email</label>
        <input id="email" name="email" type="email">
        <span class="error" id="email-error"></span>
      </div>
      <div class="field">
        <label for="message">Message</label>
        <textarea id="message" name="message"></textarea>
        <span class="error" id="message-error"></span>
      </div>
      <button id="send" type="submit">Send</button>
    </form>
    <p id="form-success" hidden></p>
  </section>
  <a id="to-missing" href="#missing-id">Missing</a>
</main>
"##;

fn contact_page() -> Result<Page> {
    Page::from_html(CONTACT_PAGE_HTML)
}

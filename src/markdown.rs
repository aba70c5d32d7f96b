use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};

/// Renders post and comment markdown to HTML that is safe to inline into a page.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(source, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let mut sanitizer = Builder::default();
    sanitizer
        .add_tag_attributes("code", &["class"])
        .set_tag_attribute_value("a", "target", "_blank")
        .link_rel(Some("noopener noreferrer nofollow"));
    sanitizer.clean(&html_output).to_string()
}

/// Escapes text for element content and double-quoted attribute values.
pub fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}

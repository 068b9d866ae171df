//! Presentation of the uploaded source and the generated document.
//!
//! Purely presentational: content is escaped or converted for display,
//! never edited. The web page gets HTML fragments; the CLI gets plain text
//! under headings.

use pulldown_cmark::{html, Event, Options, Parser};

/// Language tag used for the source block.
pub const SOURCE_LANGUAGE: &str = "python";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The uploaded source as a code block tagged for client-side highlighting.
pub fn source_html(source: &str, language: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        escape_html(language),
        escape_html(source)
    )
}

/// The generated Markdown as HTML. Raw HTML in the model output is shown
/// as text rather than interpreted.
pub fn markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Terminal rendering used by the CLI.
pub fn terminal_view(source: &str, markdown: &str) -> String {
    let mut out = String::with_capacity(source.len() + markdown.len() + 128);
    out.push_str("── Uploaded Python Code ──\n");
    out.push_str(source);
    if !source.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("\n── Generated Document ──\n");
    out.push_str(markdown);
    if !markdown.ends_with('\n') {
        out.push('\n');
    }
    out
}

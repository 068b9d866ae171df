//! The single HTML page: form, notices, and generated result.

use crate::pipeline::export::PDF_MIME;
use crate::pipeline::input::ACCEPTED_EXTENSION;
use crate::pipeline::render::escape_html;
use crate::prompts::DEFAULT_INSTRUCTION;

/// Banner shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// A successful generation, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Pre-rendered HTML of the uploaded code.
    pub source_html: String,
    /// Pre-rendered HTML of the generated document.
    pub document_html: String,
    /// Download filename.
    pub filename: String,
    /// Base64 PDF for the download link.
    pub pdf_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Instruction shown in the textarea.
    pub instruction: String,
    pub notice: Option<Notice>,
    pub result: Option<ResultView>,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            notice: None,
            result: None,
        }
    }
}

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Code Overview Generator</title>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css">
<style>
body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }
textarea { width: 100%; min-height: 5rem; font: inherit; }
pre { background: #f6f8fa; padding: 1rem; overflow-x: auto; }
.notice { padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }
.info { background: #e7f1ff; color: #0b3d91; }
.error { background: #fde8e8; color: #8a1c1c; white-space: pre-wrap; }
.download { display: inline-block; margin: 1rem 0; padding: .5rem 1rem; background: #ff4b4b; color: #fff; border-radius: .4rem; text-decoration: none; }
</style>
</head>
<body>
<h1>📝 Code Overview Generator</h1>
<p>Welcome to <strong>CodeDoc Generator</strong>! Upload a Python file and provide a prompt to generate a detailed document
describing the code's inputs, outputs, and design. Powered by a local LLM via Ollama.</p>
"#;

const TAIL: &str = r#"<script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js"></script>
<script>if (window.hljs) { hljs.highlightAll(); }</script>
</body>
</html>
"#;

/// Render the full page.
pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(HEAD);

    html.push_str(&format!(
        r#"<form method="post" action="/generate" enctype="multipart/form-data">
<p><label>Upload a Python file<br><input type="file" name="file" accept=".{ext}"></label></p>
<p><label>Enter your prompt (e.g., 'Generate a detailed document describing the inputs, outputs, and design of this code.')<br>
<textarea name="prompt">{instruction}</textarea></label></p>
<p><button type="submit">Generate</button></p>
</form>
"#,
        ext = ACCEPTED_EXTENSION,
        instruction = escape_html(&view.instruction),
    ));

    match &view.notice {
        Some(Notice::Info(msg)) => html.push_str(&format!(
            "<div class=\"notice info\">{}</div>\n",
            escape_html(msg)
        )),
        Some(Notice::Error(msg)) => html.push_str(&format!(
            "<div class=\"notice error\" role=\"alert\">{}</div>\n",
            escape_html(msg)
        )),
        None => {}
    }

    if let Some(result) = &view.result {
        html.push_str("<h2>Uploaded Python Code</h2>\n");
        html.push_str(&result.source_html);
        html.push_str("\n<h2>Generated Document</h2>\n<div class=\"document\">\n");
        html.push_str(&result.document_html);
        html.push_str("</div>\n");
        html.push_str(&format!(
            "<a class=\"download\" download=\"{name}\" href=\"data:{mime};base64,{data}\">Download as PDF</a>\n",
            mime = PDF_MIME,
            name = escape_html(&result.filename),
            data = result.pdf_base64,
        ));
    }

    html.push_str(TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_form_with_default_instruction() {
        let html = render_page(&PageView::default());
        assert!(html.contains(r#"accept=".py""#));
        assert!(html.contains(DEFAULT_INSTRUCTION));
        assert!(!html.contains("Download as PDF"));
    }

    #[test]
    fn instruction_is_escaped() {
        let view = PageView {
            instruction: "</textarea><script>".into(),
            ..PageView::default()
        };
        let html = render_page(&view);
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
    }

    #[test]
    fn result_shows_download_link() {
        let view = PageView {
            result: Some(ResultView {
                source_html: "<pre><code>x</code></pre>".into(),
                document_html: "<h1>Doc</h1>".into(),
                filename: "code_document_20240101_120000.pdf".into(),
                pdf_base64: "JVBERi0=".into(),
            }),
            ..PageView::default()
        };
        let html = render_page(&view);
        assert!(html.contains(r#"download="code_document_20240101_120000.pdf""#));
        assert!(html.contains("data:application/pdf;base64,JVBERi0="));
        assert!(html.find("Uploaded Python Code").unwrap() < html.find("Generated Document").unwrap());
    }

    #[test]
    fn notices_render_with_class() {
        let info = render_page(&PageView {
            notice: Some(Notice::Info("Please upload".into())),
            ..PageView::default()
        });
        assert!(info.contains(r#"class="notice info""#));

        let error = render_page(&PageView {
            notice: Some(Notice::Error("boom <b>".into())),
            ..PageView::default()
        });
        assert!(error.contains("boom &lt;b&gt;"));
    }
}

//! The single HTML page: input form, working message, and output region.

use html_escape::encode_text;

use crate::forger::Forged;
use crate::markdown::render_markdown;

pub const PAGE_TITLE: &str = "✨ GSF: Study Vibes Only";
pub const TAGLINE: &str = "Input your brain dump, get instant, aesthetic notes.";
pub const INPUT_LABEL: &str = "Paste the Tea ☕ (Lecture, Article, Transcript)";
pub const INPUT_PLACEHOLDER: &str = "Drop the raw info here... the longer the better, tbh.";
pub const FORGE_BUTTON: &str = "🚀 FORGE THE NOTES";
pub const WORKING_MESSAGE: &str = "🪡 Forging the notes... hold tight.";
pub const TOO_SHORT_WARNING: &str = "🤏 Need more content than that, bestie (min 50 chars).";
pub const RESULT_HEADING: &str = "🎉 Your Notes Just Dropped";
pub const CAPTION: &str = "Powered by Google's Gemini. Built with 💖 for maximum productivity.";

const STYLE: &str = r#"
body { background-color: #121212; color: #F0F0F0; font-family: system-ui, sans-serif; margin: 0; }
main { max-width: 46rem; margin: 0 auto; padding: 2rem 1rem; }
h1 { color: #8C9EFF; text-align: center; font-weight: 800; }
h2, h3 { color: #4BC0C8; border-bottom: 2px solid #4BC0C8; padding-bottom: 5px; margin-top: 20px; }
label { display: block; margin-bottom: 0.5rem; }
textarea { width: 100%; box-sizing: border-box; height: 300px; border-radius: 10px; border: 1px solid #444444; background-color: #1E1E1E; color: inherit; padding: 0.75rem; }
button { width: 100%; margin-top: 1rem; background-color: #FF5E5E; color: white; font-weight: bold; border: none; border-radius: 12px; padding: 10px 20px; transition: all 0.2s; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.3); cursor: pointer; }
button:hover { background-color: #FF8F8F; transform: translateY(-2px); }
table { border-collapse: collapse; }
th, td { border: 1px solid #444444; padding: 4px 8px; }
.warning { background-color: #3a3000; color: #FFD54F; border-radius: 8px; padding: 0.75rem 1rem; }
.notes.failed { border-left: 4px solid #FF5E5E; padding-left: 1rem; }
.caption { color: #9E9E9E; font-size: 0.85rem; }
"#;

const SUBMIT_SCRIPT: &str = "document.getElementById('forge-form').addEventListener('submit', function () { document.getElementById('working').hidden = false; });";

/// What the output region shows
#[derive(Debug, Clone, Copy)]
pub enum OutputRegion<'a> {
    Empty,
    TooShort,
    Forged(&'a Forged),
}

/// Render the whole page with `input` echoed back into the text area
pub fn render_page(input: &str, output: OutputRegion<'_>) -> String {
    let mut page = String::with_capacity(4096);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!("<title>{}</title>\n", PAGE_TITLE));
    page.push_str(&format!("<style>{}</style>\n", STYLE));
    page.push_str("</head>\n<body>\n<main>\n");

    page.push_str(&format!("<h1>{}</h1>\n", PAGE_TITLE));
    page.push_str(&format!(
        "<h3><strong>{}</strong> No cap. 👇</h3>\n",
        TAGLINE
    ));

    page.push_str("<form id=\"forge-form\" method=\"post\" action=\"/forge\">\n");
    page.push_str(&format!("<label for=\"content\">{}</label>\n", INPUT_LABEL));
    page.push_str(&format!(
        // Browsers drop one newline directly after the opening tag.
        "<textarea id=\"content\" name=\"content\" placeholder=\"{}\">\n{}</textarea>\n",
        INPUT_PLACEHOLDER,
        encode_text(input)
    ));
    page.push_str(&format!("<button type=\"submit\">{}</button>\n", FORGE_BUTTON));
    page.push_str(&format!(
        "<p id=\"working\" class=\"working\" hidden>{}</p>\n",
        WORKING_MESSAGE
    ));
    page.push_str("</form>\n");

    match output {
        OutputRegion::Empty => {}
        OutputRegion::TooShort => {
            page.push_str(&format!(
                "<div class=\"warning\" role=\"alert\">{}</div>\n",
                TOO_SHORT_WARNING
            ));
        }
        OutputRegion::Forged(outcome) => {
            let class = if outcome.is_failure() {
                "notes failed"
            } else {
                "notes"
            };
            page.push_str(&format!("<h2>{}</h2>\n", RESULT_HEADING));
            page.push_str(&format!(
                "<section id=\"notes\" class=\"{}\">\n{}</section>\n",
                class,
                render_markdown(&outcome.display_text())
            ));
        }
    }

    page.push_str(&format!("<hr>\n<p class=\"caption\">{}</p>\n", CAPTION));
    page.push_str("</main>\n");
    page.push_str(&format!("<script>{}</script>\n", SUBMIT_SCRIPT));
    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forger::ERROR_PREFIX;

    #[test]
    fn test_empty_page_has_form_and_no_output() {
        let page = render_page("", OutputRegion::Empty);

        assert!(page.contains(PAGE_TITLE));
        assert!(page.contains(INPUT_PLACEHOLDER));
        assert!(page.contains(FORGE_BUTTON));
        assert!(page.contains(CAPTION));
        assert!(!page.contains("id=\"notes\""));
        assert!(!page.contains(TOO_SHORT_WARNING));
    }

    #[test]
    fn test_too_short_shows_warning_only() {
        let page = render_page("tiny", OutputRegion::TooShort);

        assert!(page.contains(TOO_SHORT_WARNING));
        assert!(!page.contains("id=\"notes\""));
        assert!(page.contains(">\ntiny</textarea>"));
    }

    #[test]
    fn test_notes_render_as_markdown() {
        let outcome = Forged::Notes("**Big idea.**\n\n### Part one".to_string());
        let page = render_page("input", OutputRegion::Forged(&outcome));

        assert!(page.contains(RESULT_HEADING));
        assert!(page.contains("<section id=\"notes\" class=\"notes\">"));
        assert!(page.contains("<strong>Big idea.</strong>"));
        assert!(page.contains("<h3>Part one</h3>"));
    }

    #[test]
    fn test_failure_renders_prefixed_text() {
        let outcome = Forged::Failed("HTTP Error: 500 - boom".to_string());
        let page = render_page("input", OutputRegion::Forged(&outcome));

        assert!(page.contains("class=\"notes failed\""));
        assert!(page.contains(&format!("<p>{} HTTP Error: 500 - boom</p>", ERROR_PREFIX)));
    }

    #[test]
    fn test_leading_newline_survives_echo() {
        let page = render_page("\nindented first line", OutputRegion::TooShort);

        let expected = format!("{}\">\n\nindented first line</textarea>", INPUT_PLACEHOLDER);
        assert!(page.contains(&expected));
    }

    #[test]
    fn test_input_is_escaped() {
        let page = render_page("</textarea><script>x()</script>", OutputRegion::Empty);

        assert!(!page.contains("<script>x()"));
        assert!(page.contains("&lt;/textarea&gt;"));
    }
}

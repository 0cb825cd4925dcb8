//! HTML rendering for the consultation form
//!
//! Server-side rendered, one page. Every user-supplied or model-supplied
//! string goes through `html_escape` before it lands in the markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::persona::{PersonaRegistry, PersonaType};

pub const PAGE_TITLE: &str = "専門家チャット";
pub const HEADING: &str = "💬 専門家チャットBot";
pub const INTRO: &str =
    "以下のフォームに質問や相談を入力し、相談したい専門家の種類を選んでください。選ばれた専門家の立場でAIが回答します。";
pub const QUESTION_LABEL: &str = "ご相談内容を入力してください:";
pub const PERSONA_LABEL: &str = "専門家の種類を選択してください:";
pub const SUBMIT_LABEL: &str = "相談する";
pub const BUSY_TEXT: &str = "専門家に相談中...";
pub const ANSWER_LABEL: &str = "回答:";

/// Message shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input was blank; nothing was sent
    Warning(String),
    /// Text returned by the dispatcher
    Answer(String),
    /// Request could not be dispatched at all
    Error(String),
}

/// Everything needed to render the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Text to put back into the textarea
    pub question: String,
    /// Persona id to keep selected
    pub persona: String,
    pub notice: Option<Notice>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            question: String::new(),
            persona: PersonaType::default().slug().to_string(),
            notice: None,
        }
    }
}

impl PageState {
    pub fn with_notice(question: &str, persona: &str, notice: Notice) -> Self {
        Self {
            question: question.to_string(),
            persona: persona.to_string(),
            notice: Some(notice),
        }
    }
}

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
h1 { font-size: 2rem; }
label.field { display: block; font-weight: 600; margin: 1.2rem 0 .4rem; }
textarea { width: 100%; min-height: 8rem; font-size: 1rem; padding: .5rem; box-sizing: border-box; }
.radio { display: block; margin: .2rem 0; }
button { margin-top: 1rem; padding: .5rem 1.2rem; font-size: 1rem; }
#busy { display: none; margin-top: 1rem; color: #555; }
.notice { margin-top: 1.5rem; padding: 1rem; border-radius: .4rem; white-space: pre-wrap; }
.warning { background: #fffce7; border: 1px solid #f5d76e; }
.success { background: #e8f9ee; border: 1px solid #7fd19b; }
.error { background: #ffecec; border: 1px solid #ff8c8c; }
"#;

const SCRIPT: &str = r#"
document.getElementById('consult').addEventListener('submit', function () {
  document.getElementById('busy').style.display = 'block';
  document.getElementById('submit').disabled = true;
});
"#;

/// Render the full page
pub fn render(state: &PageState) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", PAGE_TITLE));
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str(&format!("<h1>{}</h1>\n<p>{}</p>\n", HEADING, INTRO));

    html.push_str("<form id=\"consult\" method=\"post\" action=\"/\">\n");
    html.push_str(&format!(
        "<label class=\"field\" for=\"question\">{}</label>\n",
        QUESTION_LABEL
    ));
    html.push_str(&format!(
        // HTML parsers drop one newline right after <textarea>
        "<textarea id=\"question\" name=\"question\">\n{}</textarea>\n",
        encode_text(&state.question)
    ));

    html.push_str(&format!(
        "<fieldset>\n<legend class=\"field\">{}</legend>\n",
        PERSONA_LABEL
    ));
    html.push_str(&persona_radios(&state.persona));
    html.push_str("</fieldset>\n");

    html.push_str(&format!(
        "<button id=\"submit\" type=\"submit\">{}</button>\n",
        SUBMIT_LABEL
    ));
    html.push_str(&format!("<div id=\"busy\">{}</div>\n</form>\n", BUSY_TEXT));

    if let Some(ref notice) = state.notice {
        html.push_str(&render_notice(notice));
    }

    html.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", SCRIPT));
    html
}

fn persona_radios(selected: &str) -> String {
    let registry = PersonaRegistry::new();
    // Unknown ids fall back to the first persona being checked
    let selected = registry
        .lookup(selected)
        .map(|p| p.id)
        .unwrap_or_default();

    PersonaType::all()
        .iter()
        .map(|pt| {
            let p = registry.definition(*pt);
            let checked = if p.id == selected { " checked" } else { "" };
            format!(
                "<label class=\"radio\"><input type=\"radio\" name=\"persona\" value=\"{}\"{}> {}</label>\n",
                encode_double_quoted_attribute(p.id.slug()),
                checked,
                encode_text(p.display_label)
            )
        })
        .collect()
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Warning(text) => format!(
            "<div class=\"notice warning\" role=\"alert\">{}</div>\n",
            encode_text(text)
        ),
        Notice::Answer(text) => format!(
            "<div class=\"notice success\"><strong>{}</strong>\n<div class=\"answer\">{}</div></div>\n",
            ANSWER_LABEL,
            encode_text(text)
        ),
        Notice::Error(text) => format!(
            "<div class=\"notice error\" role=\"alert\">{}</div>\n",
            encode_text(text)
        ),
    }
}

//! Markdown rendering with syntax highlighting

use anyhow::{anyhow, Result};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{
    Color, FontStyle, HighlightIterator, HighlightState, Highlighter, Style, Theme, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::ContentError;

pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Stylesheet that flips highlighted code blocks to their dark palette
///
/// Code blocks carry the light colours inline and the dark ones in
/// `--folio-dark*` custom properties, so switching is pure CSS.
pub const DARK_MODE_CSS: &str = r#"@media (prefers-color-scheme: dark) {
  pre.folio-code {
    background-color: var(--folio-dark-bg) !important;
  }
  pre.folio-code span {
    color: var(--folio-dark) !important;
    font-style: var(--folio-dark-font-style, inherit) !important;
  }
}
"#;

/// Markdown renderer with dual-theme syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    light: Theme,
    dark: Theme,
}

impl MarkdownRenderer {
    /// Create a renderer with the default light and dark themes
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        // Both names ship with syntect's bundled themes
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            light: themes.remove(DEFAULT_LIGHT_THEME).unwrap_or_default(),
            dark: themes.remove(DEFAULT_DARK_THEME).unwrap_or_default(),
        }
    }

    /// Create with named themes from syntect's bundled theme set
    pub fn with_themes(light: &str, dark: &str) -> Result<Self> {
        let themes = ThemeSet::load_defaults().themes;
        let lookup = |name: &str| {
            themes.get(name).cloned().ok_or_else(|| {
                let available: Vec<&str> = themes.keys().map(String::as_str).collect();
                anyhow!(
                    "Unknown highlight theme '{}'. Available: {}",
                    name,
                    available.join(", ")
                )
            })
        };

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            light: lookup(light)?,
            dark: lookup(dark)?,
        })
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String, ContentError> {
        // Front-matter is split off before we get here, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) of the code block being read
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some((_, code)) => code.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block once, embedding both themes' colours
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String, ContentError> {
        let syntax = lang
            .and_then(|l| {
                self.syntax_set
                    .find_syntax_by_token(l)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(l))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let lang = lang.unwrap_or("text");

        let light = Highlighter::new(&self.light);
        let dark = Highlighter::new(&self.dark);
        let mut parse_state = ParseState::new(syntax);
        let mut light_state = HighlightState::new(&light, ScopeStack::new());
        let mut dark_state = HighlightState::new(&dark, ScopeStack::new());

        let mut out = format!(
            r#"<pre class="folio-code" style="background-color:{};--folio-dark-bg:{}"><code class="language-{}">"#,
            hex(self.light.settings.background.unwrap_or(Color::WHITE)),
            hex(self.dark.settings.background.unwrap_or(Color::BLACK)),
            html_escape(lang),
        );

        for line in LinesWithEndings::from(code) {
            let ops = parse_state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| ContentError::Render(format!("{} ({} block)", e, lang)))?;

            // Both iterators split the line at the same scope operations
            let light_spans = HighlightIterator::new(&mut light_state, &ops, line, &light);
            let dark_spans = HighlightIterator::new(&mut dark_state, &ops, line, &dark);
            for ((light_style, text), (dark_style, _)) in light_spans.zip(dark_spans) {
                push_span(&mut out, light_style, dark_style, text);
            }
        }

        out.push_str("</code></pre>\n");
        Ok(out)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn push_span(out: &mut String, light: Style, dark: Style, text: &str) {
    out.push_str(r#"<span style="color:"#);
    out.push_str(&hex(light.foreground));
    if light.font_style.contains(FontStyle::ITALIC) {
        out.push_str(";font-style:italic");
    }
    out.push_str(";--folio-dark:");
    out.push_str(&hex(dark.foreground));
    if dark.font_style.contains(FontStyle::ITALIC) {
        out.push_str(";--folio-dark-font-style:italic");
    }
    out.push_str(r#"">"#);
    out.push_str(&html_escape(text));
    out.push_str("</span>");
}

fn hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

//! Document compiler: MDX-flavored markdown to HTML
//!
//! Compilation happens once per document per load pass; request handlers
//! only ever reuse the produced HTML. The step is idempotent: the same body
//! always compiles to the same fragment.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::path::Path;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::PipelineError;

/// Markdown renderer with syntect syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Compile a document body to an HTML fragment.
    ///
    /// `source_path` is only used to name the file in compile errors.
    pub fn render(&self, body: &str, source_path: &Path) -> Result<String, PipelineError> {
        let markdown = strip_mdx_preamble(body);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self.highlight_code(
                        &code_block_content,
                        code_block_lang.as_deref(),
                        source_path,
                    )?;
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                other if !in_code_block => events.push(other),
                _ => {}
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a fenced code block. An unknown language falls back to
    /// plain text; a highlighter failure is a compile error.
    fn highlight_code(
        &self,
        code: &str,
        lang: Option<&str>,
        source_path: &Path,
    ) -> Result<String, PipelineError> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .ok_or_else(|| PipelineError::Compile {
                path: source_path.to_path_buf(),
                message: "no syntect themes available".to_string(),
            })?;

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
            .map_err(|e| PipelineError::Compile {
                path: source_path.to_path_buf(),
                message: format!("highlighting {lang:?} block failed: {e}"),
            })?;

        Ok(format!(
            r#"<div class="highlight language-{lang}">{highlighted}</div>"#
        ))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop leading top-level `import`/`export` statements from an MDX body.
///
/// The original content files are MDX; component imports at the top of a
/// document are meaningless here and would otherwise render as paragraphs.
/// Only the preamble is touched, the rest of the body passes through
/// untouched (an `import` inside a code block is preserved).
fn strip_mdx_preamble(body: &str) -> &str {
    let mut rest = body;
    loop {
        let trimmed = rest.trim_start_matches(['\r', '\n']);
        let line_end = trimmed.find('\n').unwrap_or(trimmed.len());
        let line = &trimmed[..line_end];
        if line.starts_with("import ") || line.starts_with("export ") {
            rest = &trimmed[line_end..];
        } else {
            return trimmed;
        }
    }
}

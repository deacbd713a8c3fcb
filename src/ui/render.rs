use crossterm::style::Stylize;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::models::{ArticleRequest, ArticleResult, Outcome};

/// Renders Markdown for a terminal: styled headings and emphasis, wrapped
/// paragraphs, bulleted and numbered lists, indented code blocks.
pub struct MarkdownRenderer {
    width: usize,
    styled: bool,
}

#[derive(Default)]
struct State {
    out: String,
    block: String,
    heading: Option<HeadingLevel>,
    lists: Vec<Option<u64>>,
    item_prefix: Option<String>,
    in_code_block: bool,
    emphasis: usize,
    strong: usize,
}

impl MarkdownRenderer {
    pub fn new(width: usize, styled: bool) -> Self {
        Self {
            width: width.max(20),
            styled,
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut state = State::default();

        for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    self.flush(&mut state);
                    state.heading = Some(level);
                }
                Event::End(TagEnd::Heading(_)) => {
                    let text = std::mem::take(&mut state.block);
                    let level = state.heading.take().unwrap_or(HeadingLevel::H1);
                    state.out.push_str(&self.heading(text.trim(), level));
                    state.out.push_str("\n\n");
                }
                Event::End(TagEnd::Paragraph) => self.flush(&mut state),
                Event::Start(Tag::List(start)) => {
                    self.flush(&mut state);
                    state.lists.push(start);
                }
                Event::End(TagEnd::List(_)) => {
                    self.flush(&mut state);
                    state.lists.pop();
                    if state.lists.is_empty() {
                        state.out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    self.flush(&mut state);
                    let marker = match state.lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{}. ", n);
                            *n += 1;
                            marker
                        }
                        _ => "• ".to_string(),
                    };
                    state.item_prefix = Some(format!("{}{}", self.list_indent(&state), marker));
                }
                Event::End(TagEnd::Item) => self.flush(&mut state),
                Event::Start(Tag::CodeBlock(_)) => {
                    self.flush(&mut state);
                    state.in_code_block = true;
                }
                Event::End(TagEnd::CodeBlock) => {
                    let code = std::mem::take(&mut state.block);
                    for line in code.trim_end_matches('\n').lines() {
                        let line = format!("    {}", line);
                        if self.styled {
                            state.out.push_str(&format!("{}", line.as_str().dark_grey()));
                        } else {
                            state.out.push_str(&line);
                        }
                        state.out.push('\n');
                    }
                    state.out.push('\n');
                    state.in_code_block = false;
                }
                Event::Start(Tag::Emphasis) => state.emphasis += 1,
                Event::End(TagEnd::Emphasis) => state.emphasis = state.emphasis.saturating_sub(1),
                Event::Start(Tag::Strong) => state.strong += 1,
                Event::End(TagEnd::Strong) => state.strong = state.strong.saturating_sub(1),
                Event::Text(text) => {
                    if state.in_code_block || state.heading.is_some() {
                        state.block.push_str(&text);
                    } else {
                        let styled = self.inline(&text, state.emphasis > 0, state.strong > 0);
                        state.block.push_str(&styled);
                    }
                }
                Event::Code(code) => {
                    if self.styled {
                        state.block.push_str(&format!("{}", (&*code).yellow()));
                    } else {
                        state.block.push_str(&format!("`{}`", code));
                    }
                }
                Event::SoftBreak => state.block.push(' '),
                Event::HardBreak => state.block.push('\n'),
                Event::Rule => {
                    self.flush(&mut state);
                    state.out.push_str(&"─".repeat(self.width.min(40)));
                    state.out.push_str("\n\n");
                }
                _ => {}
            }
        }

        self.flush(&mut state);
        state.out.trim_end().to_string()
    }

    fn list_indent(&self, state: &State) -> String {
        "  ".repeat(state.lists.len().saturating_sub(1))
    }

    /// Writes the pending inline text as a wrapped block.
    fn flush(&self, state: &mut State) {
        if state.block.trim().is_empty() {
            state.block.clear();
            return;
        }
        let text = std::mem::take(&mut state.block);

        let (first, rest) = match state.item_prefix.take() {
            Some(prefix) => {
                let hanging = " ".repeat(prefix.chars().count());
                (prefix, hanging)
            }
            None if !state.lists.is_empty() => {
                // Continuation paragraph inside a loose list item.
                let indent = format!("{}  ", self.list_indent(state));
                (indent.clone(), indent)
            }
            None => (String::new(), String::new()),
        };

        let options = textwrap::Options::new(self.width)
            .initial_indent(&first)
            .subsequent_indent(&rest);
        state.out.push_str(&textwrap::fill(text.trim(), options));
        state.out.push('\n');
        if state.lists.is_empty() {
            state.out.push('\n');
        }
    }

    fn heading(&self, text: &str, level: HeadingLevel) -> String {
        if !self.styled {
            return match level {
                HeadingLevel::H1 => format!("{}\n{}", text, "=".repeat(text.chars().count())),
                HeadingLevel::H2 => format!("{}\n{}", text, "-".repeat(text.chars().count())),
                _ => text.to_string(),
            };
        }
        match level {
            HeadingLevel::H1 => format!("{}", text.bold().underlined().cyan()),
            HeadingLevel::H2 => format!("{}", text.bold().cyan()),
            _ => format!("{}", text.bold()),
        }
    }

    fn inline(&self, text: &str, emphasis: bool, strong: bool) -> String {
        if !self.styled {
            return text.to_string();
        }
        match (emphasis, strong) {
            (true, true) => format!("{}", text.bold().italic()),
            (false, true) => format!("{}", text.bold()),
            (true, false) => format!("{}", text.italic()),
            (false, false) => text.to_string(),
        }
    }
}

/// One-line report of how the run ended.
pub fn outcome_summary(request: &ArticleRequest, result: &ArticleResult) -> String {
    match &result.outcome {
        Outcome::Complete => format!(
            "Article generation complete: {} words after {} attempt(s) (target {}).",
            result.word_count, result.attempts_used, request.min_word_count()
        ),
        Outcome::BudgetExhausted => format!(
            "Warning: could not reach the target of {} words after {} attempts. Final length: {} words.",
            request.min_word_count(), result.attempts_used, result.word_count
        ),
        Outcome::Failed { message, .. } => format!(
            "Generation failed on attempt {}/{}: {}",
            result.attempts_used, request.max_attempts(), message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureKind;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn plain(markdown: &str) -> String {
        MarkdownRenderer::new(40, false).render(markdown)
    }

    #[test]
    fn renders_headings_and_paragraphs() {
        let out = plain("# Tides\n\nThe sea *rises* and\nfalls.\n\n## Causes\n\nThe moon.");
        assert_eq!(
            out,
            "Tides\n=====\n\nThe sea rises and falls.\n\nCauses\n------\n\nThe moon."
        );
    }

    #[test]
    fn wraps_long_paragraphs() {
        let out = plain(&"word ".repeat(30));
        assert!(out.lines().count() > 1);
        assert!(out.lines().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn renders_lists() {
        let out = plain("- one\n- two\n\n1. first\n2. second\n");
        assert_eq!(out, "• one\n• two\n\n1. first\n2. second");
    }

    #[test]
    fn styled_output_keeps_text() {
        let out = MarkdownRenderer::new(80, true).render("# Title\n\nSome **bold** text.");
        assert!(out.contains("Title"));
        assert!(out.contains("bold"));
        assert!(out.contains('\u{1b}'));
    }

    #[test]
    fn summary_distinguishes_outcomes() {
        let request = ArticleRequest::builder("Tides").build().unwrap();
        let mut result = ArticleResult {
            text: "x".into(),
            word_count: 900,
            met_minimum: false,
            attempts_used: 3,
            outcome: Outcome::BudgetExhausted,
            generated_at: Utc::now(),
        };
        assert!(outcome_summary(&request, &result).starts_with("Warning"));

        result.outcome = Outcome::Failed {
            kind: FailureKind::ProviderCallFailure,
            message: "HTTP 500: boom".into(),
        };
        result.attempts_used = 2;
        assert_eq!(
            outcome_summary(&request, &result),
            "Generation failed on attempt 2/3: HTTP 500: boom"
        );
    }
}

use nu_ansi_term::{Color, Style};
use reedline::{
    Highlighter, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    StyledText,
};
use std::borrow::Cow;

use crate::{
    builtins::Builtin,
    runtime::parse_integer,
    tokenizer::{DEFINE, END_DEFINE},
};

/// Prompt that shows how many cells are on the data stack, in the same
/// `<n>` form `.s` prints.
#[derive(Clone)]
pub struct REPLPrompt {
    depth: usize,
}

impl REPLPrompt {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }
}

impl Prompt for REPLPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("dictforth")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        if self.depth == 0 {
            Cow::Borrowed("")
        } else {
            Cow::Owned(format!("<{}>", self.depth))
        }
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("❯ ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("  ... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

pub static KEYWORD_COLOR: Color = Color::LightBlue;
pub static LITERAL_COLOR: Color = Color::Yellow;
pub static DEFAULT_COLOR: Color = Color::White;
pub static OPERATOR_COLOR: Color = Color::DarkGray;

fn color_of(word: &str) -> Color {
    if Builtin::lookup(word).is_some() {
        KEYWORD_COLOR
    } else if word == DEFINE || word == END_DEFINE {
        OPERATOR_COLOR
    } else if parse_integer(word).is_some() {
        LITERAL_COLOR
    } else {
        DEFAULT_COLOR
    }
}

/// Splits `line` into alternating whitespace and word runs, keeping every
/// byte so the highlighted text lines up with the buffer.
fn runs(line: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, c) in line.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(previous) if previous != space => {
                runs.push((previous, &line[start..i]));
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }

    if let Some(space) = in_space {
        runs.push((space, &line[start..]));
    }

    runs
}

pub struct SyntaxHighlighter;

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();

        for (space, text) in runs(line) {
            let color = if space { DEFAULT_COLOR } else { color_of(text) };
            styled_text.push((Style::new().fg(color), text.to_string()));
        }

        styled_text
    }
}

use super::input::AppTextArea;

/// A request from the ref chooser to ask the user for a target.
#[derive(Debug, Clone, PartialEq)]
pub struct RefPrompt {
    pub prompt: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefPromptState<'a> {
    pub prompt: String,
    pub candidates: Vec<String>,
    pub filter: AppTextArea<'a>,
    pub selected: usize,
}

impl RefPromptState<'_> {
    pub fn new(prompt: RefPrompt) -> Self {
        Self {
            prompt: prompt.prompt,
            candidates: prompt.candidates,
            filter: AppTextArea::single_line(),
            selected: 0,
        }
    }

    pub fn query(&self) -> String {
        self.filter.text().trim().to_string()
    }

    /// Candidates containing the typed text, case-insensitively.
    pub fn matches(&self) -> Vec<&str> {
        let query = self.query().to_lowercase();
        self.candidates
            .iter()
            .map(String::as_str)
            .filter(|c| query.is_empty() || c.to_lowercase().contains(&query))
            .collect()
    }

    pub fn select_next(&mut self) {
        let len = self.matches().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.matches().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn clamp_selection(&mut self) {
        let len = self.matches().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// The highlighted match, or the typed text when nothing matches
    /// (so `HEAD~3` and raw commit ids still work).
    pub fn choice(&self) -> Option<String> {
        let matches = self.matches();
        if let Some(choice) = matches.get(self.selected.min(matches.len().saturating_sub(1))) {
            return Some((*choice).to_string());
        }
        let query = self.query();
        (!query.is_empty()).then_some(query)
    }
}

//! Suggestion dropdown for the city field.
//!
//! Every keystroke bumps a generation number; a response is applied only if
//! it carries the latest one, so slow responses for older input never
//! overwrite newer suggestions.

use std::time::Duration;

use crate::{config::AutocompleteConfig, model::SearchResult};

/// A search the caller should run for the given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub generation: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Autocomplete {
    min_chars: usize,
    max_suggestions: usize,
    blur_grace: Duration,
    generation: u64,
    blur_token: u64,
    suggestions: Vec<SearchResult>,
    highlighted: Option<usize>,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(&AutocompleteConfig::default())
    }
}

impl Autocomplete {
    pub fn new(config: &AutocompleteConfig) -> Self {
        Self {
            min_chars: config.min_chars,
            max_suggestions: config.max_suggestions,
            blur_grace: Duration::from_millis(config.blur_grace_ms),
            generation: 0,
            blur_token: 0,
            suggestions: Vec::new(),
            highlighted: None,
        }
    }

    pub fn suggestions(&self) -> &[SearchResult] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn blur_grace(&self) -> Duration {
        self.blur_grace
    }

    /// React to new field contents. Returns the query to run, or `None` when
    /// the input is too short (the list is hidden).
    pub fn input_changed(&mut self, input: &str) -> Option<SuggestionQuery> {
        self.generation += 1;
        self.blur_token += 1;

        let text = input.trim();
        if text.chars().count() < self.min_chars {
            self.hide();
            return None;
        }
        Some(SuggestionQuery {
            generation: self.generation,
            text: text.to_string(),
        })
    }

    /// Apply a response. Returns `false` if it was stale and ignored.
    pub fn results_arrived<E: std::fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<Vec<SearchResult>, E>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale suggestions (generation {}, latest {})",
                generation,
                self.generation
            );
            return false;
        }
        match result {
            Ok(mut results) => {
                results.truncate(self.max_suggestions);
                self.suggestions = results;
                self.highlighted = None;
            }
            Err(e) => {
                tracing::warn!("Suggestion lookup failed: {}", e);
                self.hide();
            }
        }
        true
    }

    /// Down arrow: first item when nothing is highlighted, wraps after the last.
    pub fn highlight_next(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    /// Up arrow: last item when nothing is highlighted, wraps before the first.
    pub fn highlight_previous(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Enter: take the highlighted suggestion, if any, and close the list.
    pub fn confirm(&mut self) -> Option<SearchResult> {
        let chosen = self
            .highlighted
            .and_then(|i| self.suggestions.get(i))
            .cloned()?;
        self.dismiss();
        Some(chosen)
    }

    /// Pointer pick of a specific suggestion.
    pub fn pick(&mut self, index: usize) -> Option<SearchResult> {
        let chosen = self.suggestions.get(index).cloned()?;
        self.dismiss();
        Some(chosen)
    }

    /// Escape, or the modal closing. Also invalidates in-flight queries.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.hide();
    }

    /// Focus left the field. Returns a token to hand back to
    /// [`Autocomplete::blur_elapsed`] once the grace delay has passed.
    pub fn blur(&mut self) -> u64 {
        self.blur_token += 1;
        self.blur_token
    }

    /// Hide the list unless the field was edited again since the blur.
    pub fn blur_elapsed(&mut self, token: u64) {
        if token == self.blur_token {
            self.hide();
        }
    }

    fn hide(&mut self) {
        self.suggestions.clear();
        self.highlighted = None;
    }
}

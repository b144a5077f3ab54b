//! Beauty-option selection state and prompt payload construction.
//!
//! The remote job API receives the prompt as a JSON-encoded map from
//! category key to the selected prompt strings, plus an `other_prompt`
//! entry carrying the free-text instruction.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::beauty::find_option;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of the free-text prompt, in characters.
pub const MAX_PROMPT_LENGTH: usize = 2_000;

/// Payload key holding the free-text prompt.
pub const OTHER_PROMPT_KEY: &str = "other_prompt";

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Selected prompts per category.
///
/// Categories keep the order in which they were first toggled; prompts
/// within a category keep selection order. Re-toggling a selected prompt
/// removes it, and selecting it again appends it at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeautySelection {
    groups: IndexMap<String, IndexSet<String>>,
}

impl BeautySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `prompt` to `category`, or remove it if already selected.
    ///
    /// Returns `true` when the prompt is selected afterwards.
    pub fn toggle(&mut self, category: &str, prompt: &str) -> bool {
        let set = self.groups.entry(category.to_string()).or_default();
        if set.shift_remove(prompt) {
            false
        } else {
            set.insert(prompt.to_string());
            true
        }
    }

    /// Toggle a catalog option by id.
    pub fn toggle_option(&mut self, category: &str, id: &str) -> Result<bool, CoreError> {
        let option = find_option(category, id)?;
        Ok(self.toggle(category, option.prompt))
    }

    /// Select a catalog option by id; already-selected options stay put.
    pub fn select_option(&mut self, category: &str, id: &str) -> Result<(), CoreError> {
        let option = find_option(category, id)?;
        self.groups
            .entry(category.to_string())
            .or_default()
            .insert(option.prompt.to_string());
        Ok(())
    }

    pub fn is_selected(&self, category: &str, prompt: &str) -> bool {
        self.groups
            .get(category)
            .is_some_and(|set| set.contains(prompt))
    }

    /// `true` when any category has at least one prompt selected.
    pub fn has_selection(&self) -> bool {
        self.groups.values().any(|set| !set.is_empty())
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Non-empty categories and their prompts, in order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.groups
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(key, set)| (key.as_str(), set))
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Structured prompt sent to the job API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PromptPayload(IndexMap<String, Vec<String>>);

impl PromptPayload {
    /// Build from the current selection and the free-text prompt.
    ///
    /// Only non-empty categories are included. The free text is trimmed
    /// and added under [`OTHER_PROMPT_KEY`] when non-empty.
    pub fn build(selection: &BeautySelection, other_prompt: &str) -> Self {
        let mut map: IndexMap<String, Vec<String>> = selection
            .groups()
            .map(|(key, prompts)| (key.to_string(), prompts.iter().cloned().collect()))
            .collect();

        let trimmed = other_prompt.trim();
        if !trimmed.is_empty() {
            map.insert(OTHER_PROMPT_KEY.to_string(), vec![trimmed.to_string()]);
        }

        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// JSON encoding used as the request's `prompt` field.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(&self.0)
            .map_err(|e| CoreError::Internal(format!("Failed to encode prompt payload: {e}")))
    }
}

/// Truncate free text to [`MAX_PROMPT_LENGTH`] characters.
pub fn truncate_prompt(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_LENGTH) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beauty::{HAIR, SKIN};

    // -- toggle --

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = BeautySelection::new();
        assert!(selection.toggle(SKIN, "a"));
        assert!(selection.is_selected(SKIN, "a"));
        assert!(!selection.toggle(SKIN, "a"));
        assert!(!selection.is_selected(SKIN, "a"));
        assert!(!selection.has_selection());
    }

    #[test]
    fn retoggled_prompt_moves_to_end() {
        let mut selection = BeautySelection::new();
        selection.toggle(SKIN, "a");
        selection.toggle(SKIN, "b");
        selection.toggle(SKIN, "a");
        selection.toggle(SKIN, "a");

        let payload = PromptPayload::build(&selection, "");
        assert_eq!(payload.get(SKIN).unwrap(), ["b", "a"]);
    }

    #[test]
    fn toggle_option_uses_catalog_prompt() {
        let mut selection = BeautySelection::new();
        assert!(selection.toggle_option(HAIR, "soft_hair").unwrap());
        assert!(selection.has_selection());
        assert!(selection.toggle_option(HAIR, "missing").is_err());
    }

    #[test]
    fn select_option_is_idempotent() {
        let mut selection = BeautySelection::new();
        selection.select_option(HAIR, "soft_hair").unwrap();
        selection.select_option(HAIR, "soft_hair").unwrap();
        let payload = PromptPayload::build(&selection, "");
        assert_eq!(payload.get(HAIR).unwrap().len(), 1);
    }

    // -- PromptPayload::build --

    #[test]
    fn categories_keep_first_toggle_order() {
        let mut selection = BeautySelection::new();
        selection.toggle(HAIR, "h1");
        selection.toggle(SKIN, "s1");
        selection.toggle(HAIR, "h2");

        let payload = PromptPayload::build(&selection, "  add freckles  ");
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, [HAIR, SKIN, OTHER_PROMPT_KEY]);
        assert_eq!(payload.get(OTHER_PROMPT_KEY).unwrap(), ["add freckles"]);
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"hair":["h1","h2"],"skin":["s1"],"other_prompt":["add freckles"]}"#
        );
    }

    #[test]
    fn emptied_categories_are_omitted() {
        let mut selection = BeautySelection::new();
        selection.toggle(SKIN, "s1");
        selection.toggle(SKIN, "s1");
        selection.toggle(HAIR, "h1");

        let payload = PromptPayload::build(&selection, "   ");
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, [HAIR]);
    }

    #[test]
    fn empty_selection_and_blank_prompt_is_empty() {
        let payload = PromptPayload::build(&BeautySelection::new(), "\n\t ");
        assert!(payload.is_empty());
        assert_eq!(payload.to_json().unwrap(), "{}");
    }

    // -- truncate_prompt --

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(MAX_PROMPT_LENGTH + 10);
        assert_eq!(truncate_prompt(&long).chars().count(), MAX_PROMPT_LENGTH);
        assert_eq!(truncate_prompt("short"), "short");
    }
}

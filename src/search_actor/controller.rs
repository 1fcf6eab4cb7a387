//! Filtering and keyboard selection over the repository's user list.
//!
//! `selected_index` is `None` when nothing is highlighted (the `-1` of a
//! DOM listbox). It is reset whenever the filtered list changes, because an
//! index into the old list means nothing in the new one.

use std::sync::Arc;

use crate::domain::{color_from_string, initials, ColorMode, HslColor, UserRecord};

/// Keys the list reacts to. Everything else passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
    Other,
}

impl NavKey {
    /// Map a DOM-style `KeyboardEvent.key` name.
    pub fn from_key_name(key: &str) -> Self {
        match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }
}

/// What the presentation layer should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Suppress the platform default (page scroll, form submit).
    pub default_prevented: bool,
    /// Bring this item into view (nearest edge, smooth).
    pub scroll_to: Option<usize>,
    /// The key committed the highlighted user as the selection.
    pub committed: bool,
}

/// One row of the rendered list, as data.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub index: usize,
    pub id: u64,
    pub element_id: String,
    pub label: String,
    pub initials: String,
    pub avatar_color: HslColor,
    pub selected: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    user: UserRecord,
    label: String,
    label_lower: String,
}

pub struct SearchController {
    list_id: String,
    entries: Vec<Entry>,
    query: String,
    filtered: Vec<usize>,
    visible_ids: Vec<u64>,
    selected_index: Option<usize>,
    selected_user: Option<UserRecord>,
}

impl SearchController {
    pub fn new(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            entries: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
            visible_ids: Vec::new(),
            selected_index: None,
            selected_user: None,
        }
    }

    /// Replace the candidate users (already in display order).
    pub fn set_users(&mut self, users: &Arc<Vec<UserRecord>>) {
        self.entries = users
            .iter()
            .map(|user| {
                let label = user.display_name();
                Entry {
                    label_lower: label.to_lowercase(),
                    label,
                    user: user.clone(),
                }
            })
            .collect();
        self.refilter();
    }

    /// Apply a new debounced query.
    pub fn set_query(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_owned();
        self.refilter();
    }

    /// Case-insensitive substring match on the formatted display name only.
    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        let filtered: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.label_lower.contains(&needle))
            .map(|(index, _)| index)
            .collect();

        let visible_ids: Vec<u64> = filtered.iter().map(|&i| self.entries[i].user.id).collect();

        if visible_ids != self.visible_ids {
            self.selected_index = None;
        }
        self.filtered = filtered;
        self.visible_ids = visible_ids;
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn user_at(&self, index: usize) -> Option<&UserRecord> {
        self.filtered.get(index).map(|&i| &self.entries[i].user)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// The committed selection. Survives later query changes.
    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.selected_user.as_ref()
    }

    /// Commit the user at `index` (click or Enter).
    pub fn commit(&mut self, index: usize) -> Option<&UserRecord> {
        let user = self.user_at(index)?.clone();
        self.selected_index = Some(index);
        self.selected_user = Some(user);
        self.selected_user.as_ref()
    }

    /// Apply one key press. `on_item_select` receives every new index.
    pub fn handle_key(&mut self, key: NavKey, mut on_item_select: impl FnMut(usize)) -> KeyOutcome {
        let len = self.len();
        let current = self.selected_index;
        let mut outcome = KeyOutcome::default();

        let target = match key {
            NavKey::ArrowDown => {
                outcome.default_prevented = true;
                match current {
                    None if len > 0 => Some(0),
                    Some(index) if index + 1 < len => Some(index + 1),
                    _ => None,
                }
            }
            NavKey::ArrowUp => {
                outcome.default_prevented = true;
                match current {
                    Some(index) if index > 0 => Some(index - 1),
                    _ => None,
                }
            }
            NavKey::Home => {
                outcome.default_prevented = true;
                (len > 0).then_some(0)
            }
            NavKey::End => {
                outcome.default_prevented = true;
                len.checked_sub(1)
            }
            NavKey::Enter | NavKey::Space => {
                if let Some(index) = current {
                    outcome.default_prevented = true;
                    on_item_select(index);
                    outcome.committed = self.commit(index).is_some();
                }
                return outcome;
            }
            NavKey::Other => None,
        };

        if let Some(index) = target {
            on_item_select(index);
            self.selected_index = Some(index);
            outcome.scroll_to = Some(index);
        }
        outcome
    }

    /// The filtered list as renderable rows.
    pub fn items(&self, mode: ColorMode) -> Vec<ListItem> {
        self.filtered
            .iter()
            .enumerate()
            .map(|(index, &entry_index)| {
                let entry = &self.entries[entry_index];
                ListItem {
                    index,
                    id: entry.user.id,
                    element_id: format!("{}-item-{index}", self.list_id),
                    label: entry.label.clone(),
                    initials: initials(&entry.user.name),
                    avatar_color: color_from_string(&entry.user.name, mode),
                    selected: self.selected_index == Some(index),
                }
            })
            .collect()
    }
}

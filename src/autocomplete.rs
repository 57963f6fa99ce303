//! Search box interaction state machine.
//!
//! [`Autocomplete`] owns the query, the ranked suggestions and the dropdown
//! state. Every input is handled synchronously: the ranking is recomputed in
//! the same call that changed the query, so the rendered list is always the
//! ranking of the current query.

use tracing::debug;

use crate::model::Item;
use crate::search::{Candidate, Needle, rank};

/// Navigation request issued when an item suggestion is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub search: String,
    pub highlight: String,
}

/// A candidate that can be committed from the dropdown.
pub trait Selectable: Candidate {
    /// What the owner receives when this candidate is committed.
    type Selection;

    /// Whether the input keeps focus after a commit.
    const REFOCUS_ON_COMMIT: bool;

    fn select(&self) -> Self::Selection;
}

impl Selectable for String {
    type Selection = Self;

    const REFOCUS_ON_COMMIT: bool = true;

    fn select(&self) -> Self::Selection {
        self.clone()
    }
}

impl Selectable for Item {
    type Selection = Navigation;

    const REFOCUS_ON_COMMIT: bool = false;

    fn select(&self) -> Self::Selection {
        Navigation {
            search: self.title.clone(),
            highlight: self.id().to_string(),
        }
    }
}

/// Dropdown visibility and highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Closed,
    Open { highlighted: Option<usize> },
}

/// Gestures forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    QueryChanged(String),
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Click(usize),
    Hover(usize),
    ClickOutside,
    FocusIn,
    Clear,
}

/// Result of an input that the owner must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S> {
    /// A suggestion was committed.
    Committed(S),
    /// Enter was pressed with nothing highlighted; carries the raw query.
    Search(String),
}

pub struct Autocomplete<C: Selectable> {
    query: String,
    candidates: Vec<C>,
    results: Vec<C>,
    panel: Panel,
    focused: bool,
}

impl<C: Selectable> Default for Autocomplete<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<C: Selectable> Autocomplete<C> {
    pub const fn new(candidates: Vec<C>) -> Self {
        Self {
            query: String::new(),
            candidates,
            results: Vec::new(),
            panel: Panel::Closed,
            focused: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[C] {
        &self.results
    }

    pub const fn panel(&self) -> Panel {
        self.panel
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.panel, Panel::Open { .. })
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn highlighted(&self) -> Option<usize> {
        match self.panel {
            Panel::Open { highlighted } => highlighted,
            Panel::Closed => None,
        }
    }

    /// Whether the current query is long enough to produce suggestions.
    pub fn is_eligible(&self) -> bool {
        Needle::new(&self.query, C::MODE).is_some()
    }

    /// Replace the candidate set, re-ranking the current query.
    ///
    /// An open dropdown stays open if anything still matches; a highlight that
    /// fell off the end of the new result is dropped.
    pub fn set_candidates(&mut self, candidates: Vec<C>) {
        self.candidates = candidates;
        self.rerank();

        if let Panel::Open { highlighted } = self.panel {
            self.panel = if self.results.is_empty() {
                Panel::Closed
            } else {
                Panel::Open {
                    highlighted: highlighted.filter(|&i| i < self.results.len()),
                }
            };
        }
    }

    /// Set the query without opening the dropdown (e.g. when prefilled by navigation).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.rerank();
        self.panel = Panel::Closed;
    }

    pub const fn blur(&mut self) {
        self.focused = false;
        self.panel = Panel::Closed;
    }

    pub fn handle(&mut self, input: Input) -> Option<Outcome<C::Selection>> {
        match input {
            Input::QueryChanged(query) => {
                self.query = query;
                self.focused = true;
                self.rerank();
                self.panel = if self.results.is_empty() {
                    Panel::Closed
                } else {
                    Panel::Open { highlighted: None }
                };
                None
            }
            Input::ArrowDown => {
                self.panel = match self.panel {
                    Panel::Closed if !self.results.is_empty() => {
                        Panel::Open { highlighted: Some(0) }
                    }
                    Panel::Closed => Panel::Closed,
                    Panel::Open { highlighted } => {
                        let last = self.results.len().saturating_sub(1);
                        Panel::Open {
                            highlighted: Some(highlighted.map_or(0, |i| (i + 1).min(last))),
                        }
                    }
                };
                None
            }
            Input::ArrowUp => {
                if let Panel::Open {
                    highlighted: Some(i),
                } = self.panel
                {
                    self.panel = Panel::Open {
                        highlighted: Some(i.saturating_sub(1)),
                    };
                }
                None
            }
            Input::Enter => match self.highlighted() {
                Some(index) => self.commit(index),
                None => self.search(),
            },
            Input::Click(index) => self.commit(index),
            Input::Hover(index) => {
                if self.is_open() && index < self.results.len() {
                    self.panel = Panel::Open {
                        highlighted: Some(index),
                    };
                }
                None
            }
            Input::Escape => {
                self.blur();
                None
            }
            Input::Tab | Input::ClickOutside => {
                self.panel = Panel::Closed;
                None
            }
            Input::FocusIn => {
                self.focused = true;
                if self.is_eligible() && !self.results.is_empty() {
                    self.panel = Panel::Open { highlighted: None };
                }
                None
            }
            Input::Clear => {
                self.query.clear();
                self.results.clear();
                self.panel = Panel::Closed;
                self.focused = true;
                None
            }
        }
    }

    fn commit(&mut self, index: usize) -> Option<Outcome<C::Selection>> {
        let candidate = self.results.get(index)?.clone();
        debug!(index, text = candidate.primary_text(), "Committing suggestion");

        self.query = candidate.primary_text().to_string();
        self.rerank();
        self.panel = Panel::Closed;
        self.focused = C::REFOCUS_ON_COMMIT;
        Some(Outcome::Committed(candidate.select()))
    }

    fn search(&mut self) -> Option<Outcome<C::Selection>> {
        debug!(query = %self.query, "Search triggered");
        self.panel = Panel::Closed;
        Some(Outcome::Search(self.query.clone()))
    }

    fn rerank(&mut self) {
        self.results = rank(&self.query, &self.candidates);
    }
}

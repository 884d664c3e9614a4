// SPDX-License-Identifier: GPL-3.0-or-later

//! Search mode selection.
//!
//! The search endpoint can constrain a query to one field (object type,
//! material, maker, title) instead of searching everything. Which field is
//! chosen by a [`ModeSelector`]: either a fixed [`SearchMode`] supplied by the
//! caller, or a [`PromptModeSelector`] that asks on a terminal.

use crate::error::{Result, VandaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

const PROMPT: &str = "What kind of search were you looking to do?\n\
Type 1 to search generally\n\
Type 2 to search for a certain type of object (i.e book, painting)\n\
Type 3 to search for a certain material or technique \
(i.e silver as a material or etching as a technique)\n\
Type 4 to search for certain people, a person, or an organisation\n\
Type 5 to search for a certain title of the object (i.e the name of a painting)\n";

/// Field the free-text query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    General,
    ObjectType,
    MaterialTechnique,
    Actor,
    Title,
}

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::General,
        SearchMode::ObjectType,
        SearchMode::MaterialTechnique,
        SearchMode::Actor,
        SearchMode::Title,
    ];

    /// Name of the query-string parameter carrying the search text.
    pub fn query_param(self) -> &'static str {
        match self {
            SearchMode::General => "q",
            SearchMode::ObjectType => "q_object_type",
            SearchMode::MaterialTechnique => "q_material_technique",
            SearchMode::Actor => "q_actor",
            SearchMode::Title => "q_object_title",
        }
    }

    /// Whether `page` and `page_size` are sent with the query.
    ///
    /// Actor searches go out without them and get the service's defaults.
    pub fn is_paginated(self) -> bool {
        !matches!(self, SearchMode::Actor)
    }

    /// Numeric menu token for this mode.
    pub fn token(self) -> &'static str {
        match self {
            SearchMode::General => "1",
            SearchMode::ObjectType => "2",
            SearchMode::MaterialTechnique => "3",
            SearchMode::Actor => "4",
            SearchMode::Title => "5",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::General => "general",
            SearchMode::ObjectType => "object type",
            SearchMode::MaterialTechnique => "material/technique",
            SearchMode::Actor => "actor",
            SearchMode::Title => "title",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchMode {
    type Err = VandaError;

    /// Accepts `1`..`5` or `one`..`five`, case-insensitively.
    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "1" | "one" => Ok(SearchMode::General),
            "2" | "two" => Ok(SearchMode::ObjectType),
            "3" | "three" => Ok(SearchMode::MaterialTechnique),
            "4" | "four" => Ok(SearchMode::Actor),
            "5" | "five" => Ok(SearchMode::Title),
            _ => Err(VandaError::InvalidInput(token.trim().to_string())),
        }
    }
}

/// Source of the search mode for a single search.
pub trait ModeSelector {
    fn select_mode(&mut self) -> Result<SearchMode>;
}

impl ModeSelector for SearchMode {
    fn select_mode(&mut self) -> Result<SearchMode> {
        Ok(*self)
    }
}

impl<T: ModeSelector + ?Sized> ModeSelector for &mut T {
    fn select_mode(&mut self) -> Result<SearchMode> {
        (**self).select_mode()
    }
}

/// Parses a raw token each time a mode is needed.
impl ModeSelector for &str {
    fn select_mode(&mut self) -> Result<SearchMode> {
        self.parse()
    }
}

/// Writes the mode menu to `output` and reads one line of `input`.
#[derive(Debug)]
pub struct PromptModeSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptModeSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ModeSelector for PromptModeSelector<R, W> {
    fn select_mode(&mut self) -> Result<SearchMode> {
        self.output.write_all(PROMPT.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        line.parse()
    }
}

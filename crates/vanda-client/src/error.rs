// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VandaError>;

#[derive(Debug, Error)]
pub enum VandaError {
    #[error("The query must be in string form, got {0}")]
    TypeMismatch(String),

    #[error("Input is invalid. Only 1, 2, 3, 4 and 5 are accepted, got {0:?}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Invalid response from V&A API: {0}")]
    InvalidResponse(String),

    #[error("A query must be supplied for cluster summaries")]
    MissingQuery,

    #[error("Facet {0} has no terms")]
    IndexOutOfRange(String),

    #[error("Failed to read search mode: {0}")]
    Prompt(#[from] std::io::Error),
}

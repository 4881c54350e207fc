// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

/// A document as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    File(PathBuf),
    /// Raw bytes with the name they arrived under (stdin, tests).
    Bytes { name: String, data: Vec<u8> },
    Text(String),
    Url(String),
}

impl DocumentInput {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
            Self::Text(text) => format!("pasted text ({} chars)", text.chars().count()),
            Self::Url(url) => url.clone(),
        }
    }
}

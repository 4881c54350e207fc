// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Languages an explanation can be produced in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Or,
    Mr,
    Gu,
}

impl Language {
    pub const ALL: &'static [Language] = &[
        Self::En,
        Self::Hi,
        Self::Ta,
        Self::Or,
        Self::Mr,
        Self::Gu,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Or => "or",
            Self::Mr => "mr",
            Self::Gu => "gu",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|lang| lang.code() == code)
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
            Self::Ta => "Tamil",
            Self::Or => "Odia",
            Self::Mr => "Marathi",
            Self::Gu => "Gujarati",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिंदी",
            Self::Ta => "தமிழ்",
            Self::Or => "ଓଡ଼ିଆ",
            Self::Mr => "मराठी",
            Self::Gu => "ગુજરાતી",
        }
    }

    /// Label for selection lists, e.g. `Hindi (हिंदी)`.
    pub fn label(&self) -> String {
        if self.english_name() == self.native_name() {
            self.english_name().to_string()
        } else {
            format!("{} ({})", self.english_name(), self.native_name())
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

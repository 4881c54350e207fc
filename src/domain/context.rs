// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use super::Language;

/// Occupations offered by the interactive form. Free text is accepted too.
pub const OCCUPATIONS: &[(&str, &str)] = &[
    ("student", "Student"),
    ("farmer", "Farmer"),
    ("business", "Business / Self-Employed"),
    ("salaried", "Salaried Employee"),
    ("retired", "Retired / Senior Citizen"),
    ("homemaker", "Homemaker"),
    ("unemployed", "Unemployed"),
];

/// Who the explanation is for. Lives for one analysis and is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl UserContext {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Builder-style setters drop blank values so prompts show `N/A` instead.
    pub fn with_age(mut self, age: Option<String>) -> Self {
        self.age = non_blank(age);
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    pub fn with_occupation(mut self, occupation: Option<String>) -> Self {
        self.occupation = non_blank(occupation);
        self
    }

    pub fn age_or_na(&self) -> &str {
        self.age.as_deref().unwrap_or("N/A")
    }

    pub fn location_or_na(&self) -> &str {
        self.location.as_deref().unwrap_or("N/A")
    }

    pub fn occupation_or_na(&self) -> &str {
        self.occupation.as_deref().unwrap_or("N/A")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

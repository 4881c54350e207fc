// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use serde::Serialize;

use crate::config::ScreeningSettings;

/// Phrases that mark a personal identity credential.
pub const IDENTITY_KEYWORDS: &[&str] = &[
    "aadhaar",
    "aadhar",
    "uidai",
    "pan card",
    "pan number",
    "permanent account number",
    "voter id",
    "elector photo identity card",
    "epic no",
];

/// Phrases common in fraudulent solicitations.
pub const SCAM_KEYWORDS: &[&str] = &[
    "urgent action",
    "share otp",
    "send money",
    "lottery winner",
    "click immediately",
    "click here immediately",
    "your account will be blocked",
    "congratulations you won",
    "limited time offer",
    "verify your account",
    "prize money",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningVerdict {
    Clear,
    IdentityDocument,
    LikelyScam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningReport {
    pub identity_matches: Vec<String>,
    pub scam_matches: Vec<String>,
    pub verdict: ScreeningVerdict,
}

impl ScreeningReport {
    pub fn is_clear(&self) -> bool {
        self.verdict == ScreeningVerdict::Clear
    }
}

/// Keyword screening run before anything leaves the machine.
pub struct Screener {
    identity: Vec<String>,
    scam: Vec<String>,
    scam_threshold: usize,
}

impl Default for Screener {
    fn default() -> Self {
        Self::new(&ScreeningSettings::default())
    }
}

impl Screener {
    pub fn new(settings: &ScreeningSettings) -> Self {
        Self {
            identity: merge_keywords(IDENTITY_KEYWORDS, &settings.extra_identity_keywords),
            scam: merge_keywords(SCAM_KEYWORDS, &settings.extra_scam_keywords),
            scam_threshold: settings.scam_threshold.max(1),
        }
    }

    pub fn scan(&self, text: &str) -> ScreeningReport {
        let lower = text.to_lowercase();

        let identity_matches = matches_in(&lower, &self.identity);
        let scam_matches = matches_in(&lower, &self.scam);

        // Identity wins: a scam mentioning Aadhaar is still a private document.
        let verdict = if !identity_matches.is_empty() {
            ScreeningVerdict::IdentityDocument
        } else if scam_matches.len() >= self.scam_threshold {
            ScreeningVerdict::LikelyScam
        } else {
            ScreeningVerdict::Clear
        };

        ScreeningReport {
            identity_matches,
            scam_matches,
            verdict,
        }
    }
}

fn merge_keywords(builtin: &[&str], extra: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = builtin.iter().map(|k| k.to_string()).collect();
    for k in extra {
        let k = k.trim().to_lowercase();
        if !k.is_empty() && !keywords.contains(&k) {
            keywords.push(k);
        }
    }
    keywords
}

fn matches_in(lower: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| lower.contains(k.as_str()))
        .cloned()
        .collect()
}

// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::AnalysisResult;
use crate::error::{Error, Result};

/// Stage of an analysis. Linear, with `Complete` and `Error` as the only
/// terminal states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Scanning,
    Classifying,
    Simplifying,
    Translating,
    Complete,
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Classifying => "classifying",
            Self::Simplifying => "simplifying",
            Self::Translating => "translating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Progress shown on entering the stage. `None` for `Error`, which keeps
    /// whatever progress was reached.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::Scanning => Some(5),
            Self::Classifying => Some(30),
            Self::Simplifying => Some(70),
            Self::Translating => Some(90),
            Self::Complete => Some(100),
            Self::Error => None,
        }
    }

    /// The stage that follows in the linear order.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Scanning),
            Self::Scanning => Some(Self::Classifying),
            Self::Classifying => Some(Self::Simplifying),
            Self::Simplifying => Some(Self::Translating),
            Self::Translating => Some(Self::Complete),
            Self::Complete | Self::Error => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    pub fn is_running(&self) -> bool {
        !self.is_terminal() && *self != Self::Idle
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: AnalysisStatus,
    pub progress: u8,
}

/// State of one analysis as seen by the user: stage, progress and the
/// result once there is one.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    status: AnalysisStatus,
    progress: u8,
    result: Option<AnalysisResult>,
    observer: Option<mpsc::UnboundedSender<StatusUpdate>>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that reports every transition on `observer`.
    pub fn observed(observer: mpsc::UnboundedSender<StatusUpdate>) -> Self {
        Self {
            observer: Some(observer),
            ..Self::default()
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<AnalysisResult> {
        self.result.take()
    }

    /// Start a new analysis from any state, dropping the previous result.
    pub fn begin(&mut self) {
        self.result = None;
        self.enter(AnalysisStatus::Scanning);
    }

    /// Move to `next`, which must directly follow the current stage and must
    /// not be terminal.
    pub fn advance(&mut self, next: AnalysisStatus) -> Result<()> {
        if next.is_terminal()
            || self.status == AnalysisStatus::Idle
            || self.status.next() != Some(next)
        {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.enter(next);
        Ok(())
    }

    pub fn complete(&mut self, result: AnalysisResult) -> Result<()> {
        if self.status != AnalysisStatus::Translating {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: AnalysisStatus::Complete,
            });
        }
        self.result = Some(result);
        self.enter(AnalysisStatus::Complete);
        Ok(())
    }

    pub fn fail(&mut self, result: AnalysisResult) -> Result<()> {
        if !self.status.is_running() {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: AnalysisStatus::Error,
            });
        }
        self.result = Some(result);
        self.enter(AnalysisStatus::Error);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.result = None;
        self.enter(AnalysisStatus::Idle);
    }

    fn enter(&mut self, status: AnalysisStatus) {
        self.status = status;
        if let Some(progress) = status.progress() {
            self.progress = progress;
        }
        if let Some(ref observer) = self.observer {
            // A closed receiver only means nobody is watching any more.
            let _ = observer.send(StatusUpdate {
                status,
                progress: self.progress,
            });
        }
    }
}

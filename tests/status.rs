// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::mpsc;

use civic_translator::domain::{AnalysisResult, AnalysisSession, AnalysisStatus};
use civic_translator::error::Error;

fn session_at(stage: AnalysisStatus) -> AnalysisSession {
    let mut session = AnalysisSession::new();
    session.begin();
    let mut current = AnalysisStatus::Scanning;
    while current != stage {
        let Some(next) = current.next() else {
            panic!("{stage} is not reachable by advancing");
        };
        session.advance(next).unwrap();
        current = next;
    }
    session
}

// ─── Stage order ──────────────────────────────────────────────────────────────

#[test]
fn new_session_is_idle() {
    let session = AnalysisSession::new();
    assert_eq!(session.status(), AnalysisStatus::Idle);
    assert_eq!(session.progress(), 0);
    assert!(session.result().is_none());
}

#[test]
fn progress_follows_stages() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = AnalysisSession::observed(tx);

    session.begin();
    session.advance(AnalysisStatus::Classifying).unwrap();
    session.advance(AnalysisStatus::Simplifying).unwrap();
    session.advance(AnalysisStatus::Translating).unwrap();
    session.complete(AnalysisResult::unreadable()).unwrap();

    let mut progress = Vec::new();
    while let Ok(update) = rx.try_recv() {
        progress.push(update.progress);
    }
    assert_eq!(progress, vec![5, 30, 70, 90, 100]);
    assert!(session.result().is_some());
}

#[test]
fn skipping_a_stage_is_rejected() {
    let mut session = session_at(AnalysisStatus::Scanning);
    let err = session.advance(AnalysisStatus::Simplifying).unwrap_err();

    match err {
        Error::InvalidTransition { from, to } => {
            assert_eq!(from, AnalysisStatus::Scanning);
            assert_eq!(to, AnalysisStatus::Simplifying);
        }
        other => panic!("expected InvalidTransition, got: {other:?}"),
    }
    assert_eq!(session.status(), AnalysisStatus::Scanning);
}

#[test]
fn advance_cannot_reach_terminal_states() {
    let mut session = session_at(AnalysisStatus::Translating);
    assert!(session.advance(AnalysisStatus::Complete).is_err());
    assert!(session.advance(AnalysisStatus::Error).is_err());
}

#[test]
fn idle_session_cannot_advance() {
    let mut session = AnalysisSession::new();
    assert!(session.advance(AnalysisStatus::Scanning).is_err());
}

#[test]
fn complete_only_from_translating() {
    let mut session = session_at(AnalysisStatus::Simplifying);
    assert!(session.complete(AnalysisResult::unreadable()).is_err());
    assert!(session.result().is_none());
}

// ─── Failure and restart ──────────────────────────────────────────────────────

#[test]
fn fail_keeps_progress_reached() {
    let mut session = session_at(AnalysisStatus::Classifying);
    session.fail(AnalysisResult::identity_block()).unwrap();

    assert_eq!(session.status(), AnalysisStatus::Error);
    assert_eq!(session.progress(), 30);
    assert_eq!(session.result().unwrap().title, "Identity Document Detected");
}

#[test]
fn fail_requires_running_analysis() {
    let mut idle = AnalysisSession::new();
    assert!(idle.fail(AnalysisResult::unreadable()).is_err());

    let mut failed = session_at(AnalysisStatus::Scanning);
    failed.fail(AnalysisResult::unreadable()).unwrap();
    assert!(failed.fail(AnalysisResult::unreadable()).is_err());
}

#[test]
fn begin_restarts_and_clears_result() {
    let mut session = session_at(AnalysisStatus::Translating);
    session.complete(AnalysisResult::unreadable()).unwrap();

    session.begin();
    assert_eq!(session.status(), AnalysisStatus::Scanning);
    assert_eq!(session.progress(), 5);
    assert!(session.result().is_none());
}

#[test]
fn reset_returns_to_idle() {
    let mut session = session_at(AnalysisStatus::Classifying);
    session.fail(AnalysisResult::scam_warning()).unwrap();
    assert!(session.take_result().is_some());

    session.reset();
    assert_eq!(session.status(), AnalysisStatus::Idle);
    assert_eq!(session.progress(), 0);
}

#[test]
fn dropped_observer_does_not_break_session() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut session = AnalysisSession::observed(tx);
    session.begin();
    session.advance(AnalysisStatus::Classifying).unwrap();
    assert_eq!(session.status(), AnalysisStatus::Classifying);
}

// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Write;

use console::style;

use crate::domain::{AnalysisResult, AnalysisStatus, Verdict};
use crate::services::screening::{ScreeningReport, ScreeningVerdict};

pub const DISCLAIMER: &str = "This explanation is based solely on the document you provided. For official guidance, please contact the relevant government office.";

/// Heading shown while a stage runs.
pub fn status_label(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Idle => "Waiting for a document",
        AnalysisStatus::Scanning => "Scanning document",
        AnalysisStatus::Classifying => "Analyzing document structure",
        AnalysisStatus::Simplifying => "Simplifying complex terms",
        AnalysisStatus::Translating => "Generating final explanation",
        AnalysisStatus::Complete => "Analysis ready",
        AnalysisStatus::Error => "Analysis stopped",
    }
}

/// Render a result for the terminal. Warning verdicts get a compact card.
pub fn render(result: &AnalysisResult, verdict: Verdict) -> String {
    if verdict.is_warning() {
        render_warning(result, verdict)
    } else {
        render_explanation(result)
    }
}

pub fn render_explanation(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(&result.title).bold());
    let _ = writeln!(
        out,
        "{}",
        style(format!("Document type: {}", result.document_type)).dim()
    );
    out.push('\n');

    section(&mut out, 1, "What is this document about?");
    paragraph(&mut out, &result.summary);

    section(&mut out, 2, "Who should pay attention?");
    paragraph(&mut out, &result.target_audience);

    section(&mut out, 3, "What does this mean for you?");
    paragraph(&mut out, &result.personal_impact);

    section(&mut out, 4, "What action should you take?");
    bullets(&mut out, &result.action_items);

    if !result.benefits.is_empty() {
        section(&mut out, 5, "Benefits or consequences");
        bullets(&mut out, &result.benefits);
    }

    if !result.deadlines.is_empty() {
        section(&mut out, 6, "Important dates & deadlines");
        bullets(&mut out, &result.deadlines);
    }

    section(&mut out, 7, "Source & trust note");
    paragraph(&mut out, &result.trust_note);
    let _ = writeln!(out, "  {}", style(DISCLAIMER).dim());

    out
}

fn render_warning(result: &AnalysisResult, verdict: Verdict) -> String {
    let mut out = String::new();

    let marker = match verdict {
        Verdict::IdentityBlocked => style("🔒").cyan(),
        Verdict::ScamWarning => style("⚠").yellow(),
        _ => style("✗").red(),
    };
    let _ = writeln!(out, "{} {}", marker, style(&result.title).bold());
    out.push('\n');
    paragraph(&mut out, &result.summary);
    paragraph(&mut out, &result.personal_impact);
    if !result.action_items.is_empty() {
        bullets(&mut out, &result.action_items);
    }
    let _ = writeln!(out, "  {}", style(&result.trust_note).dim());

    out
}

/// Human-readable screening report for the `screen` command.
pub fn render_screening(report: &ScreeningReport) -> String {
    let mut out = String::new();

    let verdict = match report.verdict {
        ScreeningVerdict::Clear => style("clear").green().bold(),
        ScreeningVerdict::IdentityDocument => style("identity document").cyan().bold(),
        ScreeningVerdict::LikelyScam => style("likely scam").yellow().bold(),
    };
    let _ = writeln!(out, "Verdict: {verdict}");

    let list = |matches: &[String]| {
        if matches.is_empty() {
            "none".to_string()
        } else {
            matches.join(", ")
        }
    };
    let _ = writeln!(out, "Identity keywords: {}", list(&report.identity_matches));
    let _ = writeln!(out, "Scam phrases: {}", list(&report.scam_matches));

    out
}

fn section(out: &mut String, number: u8, heading: &str) {
    let _ = writeln!(out, "{}", style(format!("{number}. {heading}")).cyan().bold());
}

fn paragraph(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "  {line}");
    }
    out.push('\n');
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
    out.push('\n');
}

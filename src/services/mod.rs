// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod reply;
pub mod screening;
pub mod speech;
pub mod web;

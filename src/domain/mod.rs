// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod context;
mod input;
mod language;
mod result;
mod status;

pub use context::*;
pub use input::*;
pub use language::*;
pub use result::*;
pub use status::*;

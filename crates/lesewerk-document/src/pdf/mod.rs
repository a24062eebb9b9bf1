// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — text-layer access backed by `lopdf`.

pub mod reader;

pub use reader::{LopdfBackend, PdfReader};

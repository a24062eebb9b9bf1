// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lesewerk — capability bridge.
//
// Defines the traits through which the extraction pipeline reaches the
// engines it does not implement itself (text recognition, image labeling,
// PDF text, filesystem stat), plus stock implementations: stubs for hosts
// without an engine, fixed-response engines, and a local filesystem stat.

pub mod fs;
pub mod stub;
pub mod traits;

pub use fs::LocalFileStat;
pub use stub::{FixedLabeler, FixedRecognizer, NoopLabeler, StubLabeler, StubRecognizer};
pub use traits::{FileStat, ImageLabeler, PdfBackend, PdfPages, TextRecognizer};

//! typeinfer
//!
//! Hindley-Milner type inference over an externally parsed syntax tree:
//! a write-once type store with unification, let-polymorphism through
//! `fresh`, nominal type definitions, an inert type-class registry, and an
//! inference pass that annotates every visited node.
//!
//! # Example
//!
//! ```
//! use typeinfer::frontend::core::ast::{AstBuilder, Declaration, ElementaryTypeName, SourceUnit};
//! use typeinfer::frontend::infer_source_unit;
//! use typeinfer::util::config::Config;
//! use typeinfer::util::diagnostic::DiagnosticCollector;
//!
//! let mut b = AstBuilder::new();
//! let integer = b.elementary(ElementaryTypeName::Integer);
//! let x = b.variable("x", Some(integer));
//! let value = b.identifier("x");
//! let ret = b.return_statement(Some(value));
//! let body = b.block(vec![ret]);
//! let f = b.function("f", vec![x], None, Some(body));
//! let f_id = f.id;
//!
//! let unit = SourceUnit { declarations: vec![Declaration::Function(f)] };
//! let mut collector = DiagnosticCollector::new();
//! let output = infer_source_unit(&unit, &Config::default(), &mut collector).unwrap();
//! assert_eq!(output.type_string(f_id).unwrap().as_deref(), Some("Integer -> Integer"));
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod frontend;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

use crate::frontend::core::ast::{NodeId, SourceUnit};
use crate::frontend::{infer_source_unit, InferenceOutput};
use crate::util::config::Config;
use crate::util::diagnostic::{render, Diagnostic, DiagnosticCollector};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "typeinfer";

/// Outcome of checking one source unit
#[derive(Debug)]
pub struct CheckReport {
    /// Name used in rendered diagnostics
    pub source_name: String,
    pub output: InferenceOutput,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics dropped because of the configured limit
    pub suppressed: usize,
}

#[derive(Serialize)]
struct JsonAnnotation {
    node: NodeId,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    annotations: Vec<JsonAnnotation>,
    diagnostics: &'a [Diagnostic],
    suppressed: usize,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.suppressed > 0 || self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Printed annotation of every annotated node, ordered by node id
    pub fn annotation_lines(&self) -> Result<Vec<(NodeId, String)>> {
        self.output
            .annotations
            .sorted()
            .into_iter()
            .map(|(node, ty)| {
                let printed = self
                    .output
                    .type_system
                    .type_to_string(ty)
                    .with_context(|| format!("Failed to print annotation of node {}", node))?;
                Ok((node, printed))
            })
            .collect()
    }

    /// All diagnostics rendered as text
    pub fn render_diagnostics(&self) -> String {
        let mut output: String = self
            .diagnostics
            .iter()
            .map(|d| render(d, &self.source_name))
            .collect();
        if self.suppressed > 0 {
            output.push_str(&format!("... and {} more\n", self.suppressed));
        }
        output
    }

    /// Machine-readable report
    pub fn to_json(&self) -> Result<String> {
        let annotations = self
            .annotation_lines()?
            .into_iter()
            .map(|(node, ty)| JsonAnnotation { node, ty })
            .collect();
        let report = JsonReport {
            source: &self.source_name,
            annotations,
            diagnostics: &self.diagnostics,
            suppressed: self.suppressed,
        };
        serde_json::to_string_pretty(&report).context("Failed to serialize report")
    }
}

/// Parse a JSON encoded source unit
pub fn parse_source_unit(json: &str) -> Result<SourceUnit> {
    serde_json::from_str(json).context("Failed to parse syntax tree")
}

/// Check a JSON encoded source unit
pub fn check_source(
    json: &str,
    source_name: &str,
    config: &Config,
) -> Result<CheckReport> {
    let unit = parse_source_unit(json)?;
    debug!(
        "Checking {} ({} declarations)",
        source_name,
        unit.declarations.len()
    );
    let mut collector = DiagnosticCollector::with_limit(config.diagnostics.limit);
    let output = infer_source_unit(&unit, config, &mut collector)
        .with_context(|| format!("Type inference aborted for {}", source_name))?;
    info!(
        "{}: {} diagnostics ({} suppressed)",
        source_name,
        collector.diagnostics().len(),
        collector.suppressed()
    );
    let suppressed = collector.suppressed();
    Ok(CheckReport {
        source_name: source_name.to_string(),
        output,
        diagnostics: collector.into_diagnostics(),
        suppressed,
    })
}

/// Check a JSON syntax tree file
pub fn check_file(
    path: &Path,
    config: &Config,
) -> Result<CheckReport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    check_source(&source, &path.display().to_string(), config)
}

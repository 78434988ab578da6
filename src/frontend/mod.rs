//! Frontend type inference pipeline
//!
//! This module contains the syntax tree handed over by the parser, the type
//! store, and the inference pass that annotates the tree.

use crate::frontend::core::ast::{NodeId, SourceUnit};
use crate::frontend::core::type_system::{InternalError, InternalResult, Type, TypeSystem};
use crate::frontend::typecheck::{Annotations, TypeInference};
use crate::util::config::Config;
use crate::util::diagnostic::ErrorReporter;
use tracing::debug;

pub mod core;
pub mod typecheck;

/// Result of one inference run
#[derive(Debug)]
pub struct InferenceOutput {
    /// The store every annotation refers to
    pub type_system: TypeSystem,
    /// Per-node annotations
    pub annotations: Annotations,
}

impl InferenceOutput {
    /// Fully resolved type of a node, if it was annotated
    pub fn type_of(
        &self,
        node: NodeId,
    ) -> InternalResult<Option<Type>> {
        self.annotations
            .type_of(node)
            .map(|ty| self.type_system.resolve_fully(ty))
            .transpose()
    }

    /// Printed type of a node, if it was annotated
    pub fn type_string(
        &self,
        node: NodeId,
    ) -> InternalResult<Option<String>> {
        self.annotations
            .type_of(node)
            .map(|ty| self.type_system.type_to_string(ty))
            .transpose()
    }
}

/// Infer types for a whole source unit
///
/// Type errors go to `reporter`; an `Err` means the engine itself hit an
/// inconsistency and the run was aborted.
pub fn infer_source_unit(
    unit: &SourceUnit,
    config: &Config,
    reporter: &mut dyn ErrorReporter,
) -> Result<InferenceOutput, InternalError> {
    let mut inference = TypeInference::new(config.inference.clone(), reporter)?;
    inference.infer(unit)?;
    debug!("Reported {} type errors", inference.error_count());
    let (type_system, annotations) = inference.into_parts();
    Ok(InferenceOutput {
        type_system,
        annotations,
    })
}

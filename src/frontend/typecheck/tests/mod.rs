//! 类型推断测试模块

mod annotations;
mod errors;

use crate::frontend::core::ast::{Declaration, NodeId, SourceUnit};
use crate::frontend::{infer_source_unit, InferenceOutput};
use crate::util::config::{Config, InferenceSettings};
use crate::util::diagnostic::{Diagnostic, DiagnosticCollector};

/// 一次推断的结果与诊断
struct Outcome {
    output: InferenceOutput,
    diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    fn type_string(
        &self,
        node: NodeId,
    ) -> String {
        self.output
            .type_string(node)
            .unwrap()
            .unwrap_or_else(|| panic!("node {} was not annotated", node))
    }

    fn codes(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

fn infer(declarations: Vec<Declaration>) -> Outcome {
    infer_with(declarations, InferenceSettings::default())
}

fn infer_with(
    declarations: Vec<Declaration>,
    settings: InferenceSettings,
) -> Outcome {
    let unit = SourceUnit { declarations };
    let config = Config {
        inference: settings,
        ..Config::default()
    };
    let mut collector = DiagnosticCollector::new();
    let output = infer_source_unit(&unit, &config, &mut collector).unwrap();
    Outcome {
        output,
        diagnostics: collector.into_diagnostics(),
    }
}

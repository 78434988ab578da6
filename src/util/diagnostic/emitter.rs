//! 诊断文本渲染

use super::error::Diagnostic;

/// 渲染单条诊断
///
/// ```text
/// error[E2001]: type mismatch: `Integer` is not compatible with `Bool`
///   --> main.json:3:9
/// ```
pub fn render(
    diagnostic: &Diagnostic,
    source_name: &str,
) -> String {
    let mut output = format!("{}\n", diagnostic);
    match diagnostic.span {
        Some(span) if !span.is_dummy() => {
            output.push_str(&format!("  --> {}:{}\n", source_name, span.start));
        }
        _ => {
            output.push_str(&format!("  --> {}\n", source_name));
        }
    }
    output
}

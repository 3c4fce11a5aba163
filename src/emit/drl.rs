//! Emits the flat rule-text (DRL) artifact for the single-rule path.

use std::fmt::Write as _;

use tracing::debug;

use crate::types::{SchemaError, SimpleRuleIr, Value};

/// Compile a flat rule IR into DRL text.
///
/// # Errors
///
/// Returns [`SchemaError`] if the rule name is missing or there are no
/// conditions; nothing is emitted on failure.
pub fn emit(ir: &SimpleRuleIr) -> Result<String, SchemaError> {
    if ir.rule_name.trim().is_empty() {
        return Err(SchemaError::MissingRuleName);
    }
    if ir.conditions.is_empty() {
        return Err(SchemaError::NoConditions {
            name: ir.rule_name.clone(),
        });
    }
    debug!(rule = %ir.rule_name, "emitting rule text");

    let mut out = String::new();
    let _ = writeln!(out, "package {};", ir.package_name);
    out.push('\n');
    for import in &ir.imports {
        let _ = writeln!(out, "import {import};");
    }
    for global in &ir.globals {
        let _ = writeln!(out, "global {global};");
    }
    out.push_str("dialect \"mvel\";\n\n");
    let _ = writeln!(out, "rule \"{}\"", ir.rule_name);
    let _ = writeln!(out, "    salience {}", ir.salience);
    for (name, value) in &ir.attributes {
        if let Some(value) = value {
            let _ = writeln!(out, "    {name} {}", attribute_text(value));
        }
    }
    out.push_str("    when\n");
    for condition in &ir.conditions {
        let _ = writeln!(out, "        {condition}");
    }
    out.push_str("    then\n");
    for action in &ir.actions {
        let _ = writeln!(out, "        {action}");
    }
    out.push_str("end\n");
    Ok(out)
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Str(s) => s.clone(),
    }
}

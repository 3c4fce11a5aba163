//! Emits the guided decision-table (GDST) XML document.
//!
//! The emitter walks the IR in the importer's fixed child order and derives
//! a [`ColumnRegistry`] for the table. Data rows are emitted by iterating
//! the registry, not the row's supplied keys, so every `<list>` carries
//! exactly one `<value>` per registry slot regardless of which cells the
//! row actually provides.

use std::collections::HashMap;

use tracing::debug;

use crate::parse;
use crate::types::{
    ActionColumn, ActionInsertFact, ActionSetField, Attribute, BrlAction, BrlCondition,
    ColumnRegistry, ColumnRole, DataRow, FieldCondition, PatternCondition, SchemaError, TableIr,
    TypedValue,
};

use super::xml::{render, Element};

const BRL_CONDITION_COLUMN: &str =
    "org.drools.workbench.models.guided.dtable.shared.model.BRLConditionColumn";
const BRL_CONDITION_VARIABLE_COLUMN: &str =
    "org.drools.workbench.models.guided.dtable.shared.model.BRLConditionVariableColumn";
const BRL_ACTION_COLUMN: &str =
    "org.drools.workbench.models.guided.dtable.shared.model.BRLActionColumn";
const BRL_ACTION_VARIABLE_COLUMN: &str =
    "org.drools.workbench.models.guided.dtable.shared.model.BRLActionVariableColumn";
const FREE_FORM_LINE: &str = "org.drools.workbench.models.datamodel.rule.FreeFormLine";
const IMPORT_TYPE: &str = "org.kie.soup.project.datamodel.imports.Import";
const AUDIT_FILTER_CLASS: &str =
    "org.drools.guvnor.client.modeldriven.dt52.auditlog.DecisionTableAuditLogFilter";
const AUDIT_EVENT_TYPES: [&str; 5] = [
    "INSERT_ROW",
    "INSERT_COLUMN",
    "DELETE_ROW",
    "DELETE_COLUMN",
    "UPDATE_COLUMN",
];

/// Compile a table IR into the decision-table XML text.
///
/// # Errors
///
/// Returns [`SchemaError`] if the document fails structural validation; no
/// partial output is ever produced.
pub fn emit(ir: &TableIr) -> Result<String, SchemaError> {
    validate(ir)?;
    let registry = ColumnRegistry::from_table(ir);
    debug!(
        table = %ir.table_name,
        columns = registry.len(),
        rows = ir.data_rows.len(),
        "emitting decision table"
    );

    let mut root = Element::node("decision-table52");
    root.push(Element::leaf("tableName", &ir.table_name));
    root.push(static_column("rowNumberCol", false, 50));
    root.push(static_column("descriptionCol", false, 150));
    root.push(static_column("ruleNameColumn", true, 150));
    root.push(Element::node("metadataCols"));
    root.push(attribute_cols(ir));
    root.push(condition_patterns(ir));
    root.push(action_cols(ir));
    root.push(audit_log());
    root.push(imports(ir));
    root.push(Element::leaf("packageName", &ir.package_name));
    root.push(Element::leaf("version", ir.version.to_string()));
    root.push(Element::leaf("tableFormat", &ir.table_format));
    root.push(Element::leaf("hitPolicy", &ir.hit_policy));
    root.push(data(ir, &registry));

    Ok(render(&root))
}

fn validate(ir: &TableIr) -> Result<(), SchemaError> {
    if ir.table_name.trim().is_empty() {
        return Err(SchemaError::MissingTableName);
    }
    if ir.brl_conditions.is_empty() && ir.condition_patterns.is_empty() {
        return Err(SchemaError::NoConditions {
            name: ir.table_name.clone(),
        });
    }
    for brl in &ir.brl_conditions {
        validate_condition(brl)?;
    }
    for action in &ir.action_columns {
        if let ActionColumn::Brl(brl) = action {
            validate_action(brl)?;
        }
    }
    let mut seen = std::collections::HashSet::new();
    for row in &ir.data_rows {
        if row.row_number == 0 {
            return Err(SchemaError::NonPositiveRowNumber {
                row: row.row_number,
            });
        }
        if !seen.insert(row.row_number) {
            return Err(SchemaError::DuplicateRowNumber {
                row: row.row_number,
            });
        }
    }
    Ok(())
}

/// An `eval(...)` that uses a placeholder must reference exactly the
/// declared variable name.
fn validate_condition(brl: &BrlCondition) -> Result<(), SchemaError> {
    if !brl.is_eval() {
        return Ok(());
    }
    if let Some(token) = parse::first_placeholder(&brl.definition_text) {
        if token != brl.variable.var_name {
            return Err(SchemaError::ConditionPlaceholderMismatch {
                header: brl.header.clone(),
                expected: brl.variable.var_name.clone(),
                found: token.to_owned(),
            });
        }
    }
    Ok(())
}

fn validate_action(action: &BrlAction) -> Result<(), SchemaError> {
    let text = action.definition_text.trim();
    if text.starts_with("if") || text.contains("if (") || text.contains("if(") {
        return Err(SchemaError::ActionNotInvocation {
            header: action.header.clone(),
        });
    }
    if !text.contains('(') || !text.contains(')') {
        return Err(SchemaError::ActionNotInvocation {
            header: action.header.clone(),
        });
    }
    let tokens = parse::placeholders(&action.definition_text);
    match tokens.as_slice() {
        [] | [_] => {}
        many => {
            return Err(SchemaError::MultiplePlaceholders {
                header: action.header.clone(),
                count: many.len(),
            })
        }
    }
    if let [token] = tokens.as_slice() {
        let declared = &action.variable.var_name;
        if !declared.is_empty() && declared != token {
            return Err(SchemaError::ActionPlaceholderMismatch {
                header: action.header.clone(),
                expected: declared.clone(),
                found: (*token).to_owned(),
            });
        }
    }
    Ok(())
}

fn static_column(name: &'static str, hidden: bool, width: i32) -> Element {
    Element::node(name)
        .with(Element::leaf("hideColumn", bool_text(hidden)))
        .with(Element::leaf("width", width.to_string()))
}

fn attribute_cols(ir: &TableIr) -> Element {
    let mut cols = Element::node("attributeCols");
    for attr in &ir.attributes {
        cols.push(attribute_col(attr));
    }
    cols
}

fn attribute_col(attr: &Attribute) -> Element {
    let mut col = Element::node("attribute-column52")
        .with(typed_value_element("typedDefaultValue", &attr.value))
        .with(Element::leaf("hideColumn", bool_text(attr.hide_column)))
        .with(Element::leaf("width", "130"))
        .with(Element::leaf("attribute", &attr.name));
    if attr.is_salience() {
        col.push(Element::leaf("reverseOrder", "false"));
        col.push(Element::leaf("useRowNumber", "false"));
    }
    col
}

fn condition_patterns(ir: &TableIr) -> Element {
    let mut patterns = Element::node("conditionPatterns");
    for brl in &ir.brl_conditions {
        patterns.push(brl_condition_column(brl));
    }
    for pattern in &ir.condition_patterns {
        patterns.push(pattern52(pattern));
    }
    patterns
}

fn brl_condition_column(brl: &BrlCondition) -> Element {
    let variable = Element::node(BRL_CONDITION_VARIABLE_COLUMN)
        .with(typed_value_element(
            "typedDefaultValue",
            &brl.variable.typed_default(),
        ))
        .with(Element::leaf("hideColumn", bool_text(brl.hide_column)))
        .with(Element::leaf("width", "100"))
        .with(Element::leaf("header", &brl.header))
        .with(Element::leaf("constraintValueType", "1"))
        .with(Element::leaf("fieldType", &brl.variable.field_type))
        .with(Element::node("parameters"))
        .with(Element::leaf("varName", &brl.variable.var_name));

    Element::node(BRL_CONDITION_COLUMN)
        .with(Element::leaf("hideColumn", bool_text(brl.hide_column)))
        .with(Element::leaf("width", "-1"))
        .with(Element::leaf("header", &brl.header))
        .with(Element::leaf("constraintValueType", "1"))
        .with(Element::node("parameters"))
        .with(definition(&brl.definition_text))
        .with(Element::node("childColumns").with(variable))
}

fn pattern52(pattern: &PatternCondition) -> Element {
    let mut conditions = Element::node("conditions");
    for condition in &pattern.conditions {
        conditions.push(condition_column(condition));
    }
    Element::node("Pattern52")
        .with(Element::leaf("factType", &pattern.fact_type))
        .with(Element::leaf("boundName", &pattern.bound_name))
        .with(Element::leaf("isNegated", bool_text(pattern.is_negated)))
        .with(conditions)
        .with(Element::node("window").with(Element::node("parameters")))
        .with(Element::leaf("entryPointName", ""))
}

fn condition_column(condition: &FieldCondition) -> Element {
    Element::node("condition-column52")
        .with(typed_value_element(
            "typedDefaultValue",
            &condition.typed_default(),
        ))
        .with(Element::leaf("hideColumn", bool_text(condition.hide_column)))
        .with(Element::leaf("width", condition.width.to_string()))
        .with(Element::leaf("header", &condition.header))
        .with(Element::leaf("constraintValueType", "1"))
        .with(Element::leaf("factField", &condition.fact_field))
        .with(Element::leaf("fieldType", &condition.field_type))
        .with(Element::leaf("operator", condition.operator.symbol()))
        .with(Element::node("parameters"))
        .with(Element::leaf("binding", &condition.binding))
}

fn action_cols(ir: &TableIr) -> Element {
    let mut cols = Element::node("actionCols");
    for action in &ir.action_columns {
        cols.push(match action {
            ActionColumn::Brl(brl) => brl_action_column(brl),
            ActionColumn::SetField(set) => set_field_column(set),
            ActionColumn::InsertFact(insert) => insert_fact_column(insert),
        });
    }
    cols
}

fn brl_action_column(action: &BrlAction) -> Element {
    let variable = Element::node(BRL_ACTION_VARIABLE_COLUMN)
        .with(typed_value_element(
            "typedDefaultValue",
            &action.variable.typed_default(),
        ))
        .with(Element::leaf("hideColumn", bool_text(action.hide_column)))
        .with(Element::leaf("width", "300"))
        .with(Element::leaf("header", &action.header))
        .with(Element::leaf("varName", action.var_name()))
        .with(Element::leaf("fieldType", &action.variable.field_type));

    Element::node(BRL_ACTION_COLUMN)
        .with(Element::leaf("hideColumn", bool_text(action.hide_column)))
        .with(Element::leaf("width", "-1"))
        .with(Element::leaf("header", &action.header))
        .with(definition(&action.definition_text))
        .with(Element::node("childColumns").with(variable))
}

fn set_field_column(action: &ActionSetField) -> Element {
    Element::node("ActionSetField")
        .with(Element::leaf("boundName", &action.bound_name))
        .with(Element::leaf("factField", &action.fact_field))
        .with(Element::leaf("type", &action.field_type))
        .with(Element::leaf("valueList", ""))
        .with(Element::leaf("update", "false"))
        .with(Element::leaf("header", &action.header))
        .with(Element::leaf("hideColumn", bool_text(action.hide_column)))
        .with(Element::leaf("defaultValue", ""))
        .with(Element::leaf("width", "100"))
}

fn insert_fact_column(action: &ActionInsertFact) -> Element {
    Element::node("ActionInsertFact")
        .with(Element::leaf("factType", &action.fact_type))
        .with(Element::leaf("boundName", &action.bound_name))
        .with(Element::leaf("factField", &action.fact_field))
        .with(Element::leaf("type", &action.field_type))
        .with(Element::leaf("valueList", ""))
        .with(Element::leaf("isInsertLogical", "false"))
        .with(Element::leaf("header", &action.header))
        .with(Element::leaf("hideColumn", bool_text(action.hide_column)))
        .with(Element::leaf("defaultValue", ""))
        .with(Element::leaf("width", "100"))
}

/// One `FreeFormLine` per line of definition text.
fn definition(text: &str) -> Element {
    let mut def = Element::node("definition");
    for line in text.lines() {
        def.push(Element::node(FREE_FORM_LINE).with(Element::leaf("text", line)));
    }
    def
}

fn audit_log() -> Element {
    let mut accepted = Element::node("acceptedTypes");
    for event_type in AUDIT_EVENT_TYPES {
        accepted.push(
            Element::node("entry")
                .with(Element::leaf("string", event_type))
                .with(Element::leaf("boolean", "false")),
        );
    }
    Element::node("auditLog")
        .with(
            Element::node("filter")
                .attr("class", AUDIT_FILTER_CLASS)
                .with(accepted),
        )
        .with(Element::node("entries"))
}

fn imports(ir: &TableIr) -> Element {
    let mut list = Element::node("imports");
    for import in &ir.imports {
        list.push(Element::node(IMPORT_TYPE).with(Element::leaf("type", import)));
    }
    Element::node("imports").with(list)
}

fn data(ir: &TableIr, registry: &ColumnRegistry) -> Element {
    let mut data = Element::node("data");
    for row in &ir.data_rows {
        data.push(data_row(row, registry));
    }
    data
}

/// Emit one `<list>` with exactly one `<value>` per registry slot.
///
/// Cells are looked up by column name with an occurrence cursor: the k-th
/// registry slot named N takes the k-th row value named N, so colliding
/// headers stay positionally aligned. Missing cells fall back to the
/// column's type default.
fn data_row(row: &DataRow, registry: &ColumnRegistry) -> Element {
    let mut cursors: HashMap<&str, usize> = HashMap::new();
    let mut list = Element::node("list");
    for column in registry.columns() {
        let cell = match column.role {
            ColumnRole::RowNumber => TypedValue::int(i64::from(row.row_number)),
            ColumnRole::Description => TypedValue::string(row.description.clone()),
            _ => {
                let cursor = cursors.entry(column.name.as_str()).or_insert(0);
                let occurrence = *cursor;
                *cursor += 1;
                row.values
                    .iter()
                    .filter(|v| v.column_name == column.name)
                    .nth(occurrence)
                    .map(|v| v.value.clone())
                    .unwrap_or_else(|| TypedValue::absent(column.data_type))
            }
        };
        list.push(typed_value_element("value", &cell));
    }
    list
}

/// The type-tagged value scheme shared by cells and column defaults.
fn typed_value_element(name: &'static str, value: &TypedValue) -> Element {
    let cell = value.cell();
    let mut el = Element::node(name);
    if let Some((class, text)) = cell.numeric {
        el.push(Element::leaf("valueNumeric", text).attr("class", class));
    }
    if let Some(text) = cell.boolean {
        el.push(Element::leaf("valueBoolean", text));
    }
    el.push(Element::leaf("valueString", cell.string));
    el.push(Element::leaf("dataType", cell.data_type.tag()));
    el.push(Element::leaf("isOtherwise", "false"));
    el
}

fn bool_text(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

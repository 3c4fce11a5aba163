use super::ir::TableIr;
use super::value::DataType;

/// What a registry slot represents, in the fixed table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    RowNumber,
    Description,
    RuleName,
    Attribute,
    BrlConditionBinding,
    PatternCondition,
    BrlConditionEval,
    Action,
}

/// One positional column slot: name, declared type, and role.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub role: ColumnRole,
}

/// The ordered, append-only list of column descriptors for one compilation.
///
/// Built once per table by walking the IR in the fixed order: row number,
/// description, rule name, attributes, BRL fact bindings, pattern field
/// columns, BRL evals, action variables. This sequence is the single
/// authority for how many `<value>` elements each data row emits and in
/// what order. Column names are not unique; alignment is positional.
///
/// A registry belongs to exactly one compilation and is never reused.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    /// Derive the registry for a table document.
    #[must_use]
    pub fn from_table(ir: &TableIr) -> Self {
        let mut columns = Vec::with_capacity(3 + ir.attributes.len());

        let mut push = |name: &str, data_type: DataType, role: ColumnRole| {
            columns.push(Column {
                name: name.to_owned(),
                data_type,
                role,
            });
        };

        push("Row Number", DataType::NumericInteger, ColumnRole::RowNumber);
        push("Description", DataType::String, ColumnRole::Description);
        push("Rule Name", DataType::String, ColumnRole::RuleName);

        for attr in &ir.attributes {
            push(&attr.name, attr.value.data_type, ColumnRole::Attribute);
        }

        for brl in ir.brl_conditions.iter().filter(|c| !c.is_eval()) {
            push(
                &brl.header,
                brl.variable.data_type,
                ColumnRole::BrlConditionBinding,
            );
        }

        for pattern in &ir.condition_patterns {
            for condition in &pattern.conditions {
                push(
                    &condition.header,
                    condition.data_type,
                    ColumnRole::PatternCondition,
                );
            }
        }

        for brl in ir.brl_conditions.iter().filter(|c| c.is_eval()) {
            push(
                &brl.header,
                brl.variable.data_type,
                ColumnRole::BrlConditionEval,
            );
        }

        for action in &ir.action_columns {
            push(action.column_name(), action.data_type(), ColumnRole::Action);
        }

        Self { columns }
    }

    /// Total number of column slots; every `<list>` row must emit exactly
    /// this many `<value>` elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The ordered column descriptors.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// How many slots share `name`. Headers may legitimately collide (e.g.
    /// a repeated "Max Sales" across pattern blocks), so lookups must go
    /// through position, never first-name-match.
    #[must_use]
    pub fn occurrences(&self, name: &str) -> usize {
        self.columns.iter().filter(|c| c.name == name).count()
    }
}

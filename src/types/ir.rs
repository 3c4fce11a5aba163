use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::{DataType, TypedValue, Value};
use crate::parse;

fn default_package() -> String {
    "com.myspace.rules".to_owned()
}

fn default_version() -> u32 {
    739
}

fn default_table_format() -> String {
    "EXTENDED_ENTRY".to_owned()
}

fn default_hit_policy() -> String {
    "NONE".to_owned()
}

fn default_salience() -> i64 {
    10
}

fn default_width() -> i32 {
    100
}

fn default_numeric_double() -> DataType {
    DataType::NumericDouble
}

/// A rule document as produced by the extraction stage: either a full
/// decision-table IR or the flat single-rule variant.
///
/// Table documents are keyed by `tableName`, simple documents by
/// `ruleName`; the variants are tried in that order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleDoc {
    Table(TableIr),
    Simple(SimpleRuleIr),
}

impl RuleDoc {
    /// The rule or table name, used for artifact file naming.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            RuleDoc::Table(ir) => &ir.table_name,
            RuleDoc::Simple(ir) => &ir.rule_name,
        }
    }
}

/// The flat IR variant for the simple rule-text (DRL) path.
///
/// Conditions and actions are pre-collapsed expression strings; there are
/// no columns or data rows to align.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRuleIr {
    pub rule_name: String,
    #[serde(default = "default_package")]
    pub package_name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub globals: Vec<String>,
    #[serde(default = "default_salience")]
    pub salience: i64,
    /// Extra rule attributes (`no-loop`, `agenda-group`, ...), emitted in
    /// sorted key order after the salience line. Null values are skipped.
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<Value>>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// The decision-table IR: the root document for the GDST path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableIr {
    pub table_name: String,
    #[serde(default = "default_package")]
    pub package_name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_table_format")]
    pub table_format: String,
    #[serde(default = "default_hit_policy")]
    pub hit_policy: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default, rename = "conditionsBRL")]
    pub brl_conditions: Vec<BrlCondition>,
    #[serde(default)]
    pub condition_patterns: Vec<PatternCondition>,
    #[serde(default)]
    pub action_columns: Vec<ActionColumn>,
    #[serde(default, rename = "data")]
    pub data_rows: Vec<DataRow>,
}

/// A rule attribute column (e.g. `salience`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub value: TypedValue,
    #[serde(default, rename = "hideColumn")]
    pub hide_column: bool,
}

impl Attribute {
    /// Salience columns additionally carry the `reverseOrder` and
    /// `useRowNumber` flags (always false in this domain).
    #[must_use]
    pub fn is_salience(&self) -> bool {
        self.name == "salience"
    }
}

/// A free-form ("BRL") condition column: a fact instantiation such as
/// `$r : RestaurantData()` or a boolean `eval(...)` expression, with one
/// bound variable column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrlCondition {
    pub header: String,
    pub definition_text: String,
    #[serde(default)]
    pub variable: BrlConditionVariable,
    #[serde(default)]
    pub hide_column: bool,
}

impl BrlCondition {
    /// Eval conditions occupy registry slots after the pattern field
    /// columns; fact bindings come before them.
    #[must_use]
    pub fn is_eval(&self) -> bool {
        self.definition_text.trim_start().starts_with("eval(")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrlConditionVariable {
    #[serde(default)]
    pub var_name: String,
    #[serde(default = "BrlConditionVariable::default_field_type")]
    pub field_type: String,
    #[serde(default = "BrlConditionVariable::default_data_type")]
    pub data_type: DataType,
    #[serde(default = "BrlConditionVariable::default_default_value")]
    pub default_value: Option<Value>,
}

impl BrlConditionVariable {
    fn default_field_type() -> String {
        "Boolean".to_owned()
    }

    fn default_data_type() -> DataType {
        DataType::Boolean
    }

    fn default_default_value() -> Option<Value> {
        Some(Value::Bool(true))
    }

    /// The variable column's default cell.
    #[must_use]
    pub fn typed_default(&self) -> TypedValue {
        TypedValue {
            value: self.default_value.clone(),
            data_type: self.data_type,
        }
    }
}

impl Default for BrlConditionVariable {
    fn default() -> Self {
        Self {
            var_name: String::new(),
            field_type: Self::default_field_type(),
            data_type: Self::default_data_type(),
            default_value: Self::default_default_value(),
        }
    }
}

/// A `Pattern52` block: all field conditions constraining one bound fact.
///
/// A numeric range on a field is two [`FieldCondition`]s (`>=` lower,
/// `<` upper) inside one pattern, never two patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCondition {
    pub fact_type: String,
    pub bound_name: String,
    #[serde(default)]
    pub is_negated: bool,
    #[serde(default)]
    pub conditions: Vec<FieldCondition>,
}

/// Comparison operators allowed in field conditions.
///
/// Stored as the literal symbol; XML entity escaping happens only at the
/// final serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl Operator {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `condition-column52`: a single field comparison inside a pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCondition {
    pub header: String,
    pub fact_field: String,
    pub operator: Operator,
    pub field_type: String,
    #[serde(default = "default_numeric_double")]
    pub data_type: DataType,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default)]
    pub binding: String,
    #[serde(default)]
    pub hide_column: bool,
}

impl FieldCondition {
    #[must_use]
    pub fn typed_default(&self) -> TypedValue {
        TypedValue {
            value: self.default_value.clone(),
            data_type: self.data_type,
        }
    }
}

/// An action column. The wire shape picks the variant: free-form
/// definitions are BRL actions, `factType` marks a fact insertion, and a
/// bare `boundName`/`factField` pair sets a field on a bound fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionColumn {
    Brl(BrlAction),
    InsertFact(ActionInsertFact),
    SetField(ActionSetField),
}

impl ActionColumn {
    /// The registry column name for this action's value slot.
    #[must_use]
    pub fn column_name(&self) -> &str {
        match self {
            ActionColumn::Brl(a) => a.var_name(),
            ActionColumn::InsertFact(a) => &a.header,
            ActionColumn::SetField(a) => &a.header,
        }
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            ActionColumn::Brl(a) => a.variable.data_type,
            ActionColumn::InsertFact(a) => a.data_type,
            ActionColumn::SetField(a) => a.data_type,
        }
    }
}

/// A free-form action column with one `@{...}` bound variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrlAction {
    pub header: String,
    pub definition_text: String,
    #[serde(default)]
    pub variable: BrlActionVariable,
    #[serde(default)]
    pub hide_column: bool,
}

impl BrlAction {
    /// The variable column name: the `@{...}` token from the definition,
    /// the declared variable name, or (fabricated) the action header, in
    /// that order of preference. One column per action, always.
    #[must_use]
    pub fn var_name(&self) -> &str {
        if let Some(token) = parse::first_placeholder(&self.definition_text) {
            return token;
        }
        if !self.variable.var_name.is_empty() {
            return &self.variable.var_name;
        }
        &self.header
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrlActionVariable {
    #[serde(default)]
    pub var_name: String,
    #[serde(default = "BrlActionVariable::default_field_type")]
    pub field_type: String,
    #[serde(default = "BrlActionVariable::default_data_type")]
    pub data_type: DataType,
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl BrlActionVariable {
    fn default_field_type() -> String {
        "Object".to_owned()
    }

    fn default_data_type() -> DataType {
        DataType::String
    }

    #[must_use]
    pub fn typed_default(&self) -> TypedValue {
        TypedValue {
            value: self.default_value.clone(),
            data_type: self.data_type,
        }
    }
}

impl Default for BrlActionVariable {
    fn default() -> Self {
        Self {
            var_name: String::new(),
            field_type: Self::default_field_type(),
            data_type: Self::default_data_type(),
            default_value: None,
        }
    }
}

fn default_string_field_type() -> String {
    "String".to_owned()
}

fn default_string_data_type() -> DataType {
    DataType::String
}

/// A column that sets one field on an already-bound fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSetField {
    pub bound_name: String,
    pub fact_field: String,
    #[serde(default = "default_string_field_type")]
    pub field_type: String,
    #[serde(default = "default_string_data_type")]
    pub data_type: DataType,
    pub header: String,
    #[serde(default)]
    pub hide_column: bool,
}

/// A column that inserts a new fact and sets one field on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInsertFact {
    pub fact_type: String,
    pub bound_name: String,
    pub fact_field: String,
    #[serde(default = "default_string_field_type")]
    pub field_type: String,
    #[serde(default = "default_string_data_type")]
    pub data_type: DataType,
    pub header: String,
    #[serde(default)]
    pub hide_column: bool,
}

/// One decision-table row. `values` covers zero or more declared columns;
/// omitted columns fall back to the column's type default at emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    pub row_number: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<RowValue>,
}

/// A row cell keyed by column name. Repeated names are matched to
/// repeated registry slots in order of appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowValue {
    #[serde(rename = "columnName")]
    pub column_name: String,
    #[serde(flatten)]
    pub value: TypedValue,
}

//! Compiles structured rule descriptions (a JSON intermediate
//! representation) into Drools artifacts: flat rule text (DRL) or guided
//! decision-table XML (GDST).

mod compile;
mod emit;
mod error;
mod parse;
mod types;

pub use compile::{artifact_file_name, compile, select_kind, ArtifactKind};
pub use emit::{emit_drl, emit_gdst};
pub use error::RulesmithError;
pub use types::{
    ActionColumn, ActionInsertFact, ActionSetField, Attribute, BrlAction, BrlActionVariable,
    BrlCondition, BrlConditionVariable, Cell, Column, ColumnRegistry, ColumnRole, DataRow,
    DataType, FieldCondition, Operator, PatternCondition, RowValue, RuleDoc, SchemaError,
    SimpleRuleIr, TableIr, TypedValue, UnknownDataTypeError, Value,
};

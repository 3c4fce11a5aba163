mod column;
mod error;
mod ir;
mod value;

pub use column::{Column, ColumnRegistry, ColumnRole};
pub use error::{SchemaError, UnknownDataTypeError};
pub use ir::{
    ActionColumn, ActionInsertFact, ActionSetField, Attribute, BrlAction, BrlActionVariable,
    BrlCondition, BrlConditionVariable, DataRow, FieldCondition, Operator, PatternCondition,
    RowValue, RuleDoc, SimpleRuleIr, TableIr,
};
pub use value::{Cell, DataType, TypedValue, Value};

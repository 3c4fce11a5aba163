use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rulesmith::{
    emit_gdst, ActionColumn, Attribute, BrlAction, BrlActionVariable, DataRow, DataType,
    FieldCondition, Operator, PatternCondition, RowValue, TableIr, TypedValue,
};

/// Build a table with `n_fields` pattern field columns and `n_rows` fully
/// populated data rows.
fn build_table(n_fields: usize, n_rows: usize) -> TableIr {
    let conditions = (0..n_fields)
        .map(|i| FieldCondition {
            header: format!("F{i}"),
            fact_field: format!("field{i}"),
            operator: Operator::Gte,
            field_type: "Double".into(),
            data_type: DataType::NumericDouble,
            default_value: None,
            width: 100,
            binding: String::new(),
            hide_column: false,
        })
        .collect();

    let data_rows = (1..=n_rows)
        .map(|row| {
            let mut values: Vec<RowValue> = (0..n_fields)
                .map(|i| RowValue {
                    column_name: format!("F{i}"),
                    value: TypedValue::double((row * (i + 1)) as f64),
                })
                .collect();
            values.push(RowValue {
                column_name: "Employees".into(),
                value: TypedValue::string(row.to_string()),
            });
            DataRow {
                row_number: u32::try_from(row).unwrap(),
                description: format!("band {row}"),
                values,
            }
        })
        .collect();

    TableIr {
        table_name: "bench-table".into(),
        package_name: "com.myspace.rules".into(),
        imports: vec!["com.myspace.restopsrecomms.RestaurantData".into()],
        version: 739,
        table_format: "EXTENDED_ENTRY".into(),
        hit_policy: "NONE".into(),
        attributes: vec![Attribute {
            name: "salience".into(),
            value: TypedValue::int(10),
            hide_column: false,
        }],
        brl_conditions: vec![],
        condition_patterns: vec![PatternCondition {
            fact_type: "RestaurantData".into(),
            bound_name: "$r".into(),
            is_negated: false,
            conditions,
        }],
        action_columns: vec![ActionColumn::Brl(BrlAction {
            header: "Employees".into(),
            definition_text: "$rec.setEmployees(@{Employees})".into(),
            variable: BrlActionVariable::default(),
            hide_column: false,
        })],
        data_rows,
    }
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("gdst_emit");

    for &(n_fields, n_rows) in &[(2, 10), (4, 50), (8, 200)] {
        let ir = build_table(n_fields, n_rows);
        group.bench_function(format!("{n_fields}_fields_{n_rows}_rows"), |b| {
            b.iter(|| emit_gdst(black_box(&ir)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_emit);
criterion_main!(benches);

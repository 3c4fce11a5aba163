use quick_xml::events::Event;
use quick_xml::Reader;
use rulesmith::{compile, emit_gdst, ArtifactKind, RuleDoc, TableIr};

/// The staffing table the extraction stage produces for a sales-banded
/// rule: one pattern with a >= / < range pair, a salience attribute, and
/// one action variable column.
const STAFFING_JSON: &str = r#"{
  "tableName": "restaurant-staffing-by-sales",
  "packageName": "com.myspace.restopsrecomms",
  "imports": [
    "com.myspace.restopsrecomms.RestaurantData",
    "com.myspace.restopsrecomms.EmployeeRecommendation"
  ],
  "attributes": [
    {"name": "salience", "value": 10, "dataType": "NUMERIC_INTEGER"}
  ],
  "conditionPatterns": [
    {
      "factType": "RestaurantData",
      "boundName": "$restaurant",
      "conditions": [
        {"header": "Min Sales", "factField": "totalExpectedSales", "operator": ">=",
         "fieldType": "Double", "dataType": "NUMERIC_DOUBLE"},
        {"header": "Max Sales", "factField": "totalExpectedSales", "operator": "<",
         "fieldType": "Double", "dataType": "NUMERIC_DOUBLE"}
      ]
    }
  ],
  "actionColumns": [
    {
      "header": "Employees",
      "definitionText": "$recommendation.setEmployees(@{Employees})",
      "variable": {"varName": "Employees", "fieldType": "Object", "dataType": "STRING"}
    }
  ],
  "data": [
    {
      "rowNumber": 1,
      "description": "0-100 sales",
      "values": [
        {"columnName": "salience", "value": 10, "dataType": "NUMERIC_INTEGER"},
        {"columnName": "Min Sales", "value": 0.0, "dataType": "NUMERIC_DOUBLE"},
        {"columnName": "Max Sales", "value": 100.0, "dataType": "NUMERIC_DOUBLE"},
        {"columnName": "Employees", "value": "2", "dataType": "STRING"}
      ]
    },
    {
      "rowNumber": 2,
      "description": "100-200 sales",
      "values": [
        {"columnName": "Min Sales", "value": 100.0, "dataType": "NUMERIC_DOUBLE"},
        {"columnName": "Employees", "value": "3", "dataType": "STRING"}
      ]
    }
  ]
}"#;

fn staffing_table() -> TableIr {
    serde_json::from_str(STAFFING_JSON).unwrap()
}

/// Number of `<value>` children of each `<list>` under `<data>`.
fn row_value_counts(xml: &str) -> Vec<usize> {
    let mut reader = Reader::from_str(xml);
    let mut counts = Vec::new();
    let mut current: Option<usize> = None;
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(e) => match e.name().as_ref() {
                b"list" => current = Some(0),
                b"value" => {
                    if let Some(count) = current.as_mut() {
                        *count += 1;
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"list" => {
                counts.push(current.take().expect("list end without start"));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    counts
}

#[test]
fn root_children_in_importer_order() {
    let out = emit_gdst(&staffing_table()).unwrap();
    let sequence = [
        "<tableName>",
        "<rowNumberCol>",
        "<descriptionCol>",
        "<ruleNameColumn>",
        "<metadataCols/>",
        "<attributeCols>",
        "<conditionPatterns>",
        "<actionCols>",
        "<auditLog>",
        "<imports>",
        "<packageName>",
        "<version>",
        "<tableFormat>",
        "<hitPolicy>",
        "<data>",
    ];
    let mut last = 0;
    for tag in sequence {
        let at = out[last..]
            .find(tag)
            .unwrap_or_else(|| panic!("{tag} missing or out of order"));
        last += at + tag.len();
    }
}

#[test]
fn every_row_has_one_value_per_column() {
    let out = emit_gdst(&staffing_table()).unwrap();
    // 3 static + salience + 2 pattern fields + 1 action = 7
    assert_eq!(row_value_counts(&out), vec![7, 7]);
}

#[test]
fn omitted_cells_fall_back_to_type_defaults() {
    let out = emit_gdst(&staffing_table()).unwrap();
    let row2 = out.split("<list>").nth(2).unwrap();
    // salience omitted -> "0", Max Sales omitted -> "0.0"
    assert!(row2.contains("<valueNumeric class=\"int\">0</valueNumeric>"));
    assert!(row2.contains("<valueNumeric class=\"double\">0.0</valueNumeric>"));
    assert!(row2.contains("<valueNumeric class=\"double\">100.0</valueNumeric>"));
}

#[test]
fn compiling_twice_is_byte_identical() {
    let ir = staffing_table();
    assert_eq!(emit_gdst(&ir).unwrap(), emit_gdst(&ir).unwrap());
}

#[test]
fn salience_attribute_carries_order_flags() {
    let out = emit_gdst(&staffing_table()).unwrap();
    assert!(out.contains("<attribute>salience</attribute>"));
    assert!(out.contains("<reverseOrder>false</reverseOrder>"));
    assert!(out.contains("<useRowNumber>false</useRowNumber>"));
}

#[test]
fn operators_escaped_at_serialization_only() {
    let ir = staffing_table();
    // the structured field holds the literal symbol
    assert_eq!(
        ir.condition_patterns[0].conditions[0].operator.symbol(),
        ">="
    );
    let out = emit_gdst(&ir).unwrap();
    assert!(out.contains("<operator>&gt;=</operator>"));
    assert!(out.contains("<operator>&lt;</operator>"));
}

#[test]
fn eval_text_entity_escaped() {
    let mut ir = staffing_table();
    ir.brl_conditions = serde_json::from_str(
        r#"[{
            "header": "busy",
            "definitionText": "eval($restaurant.getOrders() > @{min})",
            "variable": {"varName": "min", "fieldType": "Integer", "dataType": "NUMERIC_INTEGER"}
        }]"#,
    )
    .unwrap();
    let out = emit_gdst(&ir).unwrap();
    assert!(out.contains("<text>eval($restaurant.getOrders() &gt; @{min})</text>"));
}

#[test]
fn range_stays_inside_one_pattern() {
    let out = emit_gdst(&staffing_table()).unwrap();
    assert_eq!(out.matches("<Pattern52>").count(), 1);
    assert_eq!(out.matches("<condition-column52>").count(), 2);
}

#[test]
fn colliding_headers_resolved_by_position() {
    let mut ir = staffing_table();
    let second: rulesmith::PatternCondition = serde_json::from_str(
        r#"{
            "factType": "BranchData",
            "boundName": "$branch",
            "conditions": [
                {"header": "Max Sales", "factField": "branchSales", "operator": "<",
                 "fieldType": "Double", "dataType": "NUMERIC_DOUBLE"}
            ]
        }"#,
    )
    .unwrap();
    ir.condition_patterns.push(second);
    ir.data_rows[0].values.push(rulesmith::RowValue {
        column_name: "Max Sales".into(),
        value: rulesmith::TypedValue::double(400.0),
    });
    let out = emit_gdst(&ir).unwrap();
    assert_eq!(row_value_counts(&out), vec![8, 8]);
    let row1: &str = out.split("<list>").nth(1).unwrap();
    let first_at = row1.find("100.0").unwrap();
    let second_at = row1.find("400.0").unwrap();
    assert!(first_at < second_at, "second occurrence must fill the second slot");
}

#[test]
fn set_field_and_insert_fact_actions_from_json() {
    let mut ir = staffing_table();
    let extra: Vec<rulesmith::ActionColumn> = serde_json::from_str(
        r#"[
            {"boundName": "$restaurant", "factField": "reviewed",
             "fieldType": "Boolean", "dataType": "BOOLEAN", "header": "Reviewed"},
            {"factType": "EmployeeRecommendation", "boundName": "$rec",
             "factField": "priority", "fieldType": "Integer",
             "dataType": "NUMERIC_INTEGER", "header": "Priority"}
        ]"#,
    )
    .unwrap();
    ir.action_columns.extend(extra);
    let out = emit_gdst(&ir).unwrap();
    assert!(out.contains("<ActionSetField>"));
    assert!(out.contains("<ActionInsertFact>"));
    // 7 original columns + the two new action slots
    assert_eq!(row_value_counts(&out), vec![9, 9]);
}

#[test]
fn version_defaults_when_absent() {
    let ir: TableIr = serde_json::from_str(
        r#"{
            "tableName": "t",
            "conditionPatterns": [
                {"factType": "F", "boundName": "$f", "conditions": [
                    {"header": "h", "factField": "x", "operator": "==", "fieldType": "Integer",
                     "dataType": "NUMERIC_INTEGER"}
                ]}
            ]
        }"#,
    )
    .unwrap();
    let out = emit_gdst(&ir).unwrap();
    assert!(out.contains("<version>739</version>"));
    assert!(out.contains("<tableFormat>EXTENDED_ENTRY</tableFormat>"));
    assert!(out.contains("<hitPolicy>NONE</hitPolicy>"));
}

#[test]
fn imports_nested_with_type_entries() {
    let out = emit_gdst(&staffing_table()).unwrap();
    assert!(out.contains(
        "<org.kie.soup.project.datamodel.imports.Import>\n        <type>com.myspace.restopsrecomms.RestaurantData</type>\n      </org.kie.soup.project.datamodel.imports.Import>"
    ));
}

#[test]
fn audit_log_disabled() {
    let out = emit_gdst(&staffing_table()).unwrap();
    assert!(out.contains("DecisionTableAuditLogFilter"));
    assert_eq!(out.matches("<boolean>false</boolean>").count(), 5);
    assert!(out.contains("<entries/>"));
}

#[test]
fn rule_name_column_hidden() {
    let out = emit_gdst(&staffing_table()).unwrap();
    let block = out
        .split("<ruleNameColumn>")
        .nth(1)
        .unwrap()
        .split("</ruleNameColumn>")
        .next()
        .unwrap();
    assert!(block.contains("<hideColumn>true</hideColumn>"));
    assert!(block.contains("<width>150</width>"));
}

#[test]
fn unknown_data_type_rejected_at_parse() {
    let bad = STAFFING_JSON.replace("NUMERIC_DOUBLE", "NUMERIC_DECIMAL");
    let result: Result<TableIr, _> = serde_json::from_str(&bad);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("unknown data type tag 'NUMERIC_DECIMAL'"), "{err}");
}

#[test]
fn compile_selects_gdst_for_table_documents() {
    let doc: RuleDoc = serde_json::from_str(STAFFING_JSON).unwrap();
    let (kind, artifact) = compile(&doc, None).unwrap();
    assert_eq!(kind, ArtifactKind::Gdst);
    assert!(artifact.starts_with("<decision-table52>"));
    assert!(artifact.ends_with("</decision-table52>\n"));
}

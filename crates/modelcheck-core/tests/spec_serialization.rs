use modelcheck_core::{EnumSpec, FieldSpec, FieldType, RecordSpec, Value};
use serde_json::json;

#[test]
fn serializes_spec_deterministically() {
    let spec = RecordSpec::builder("order_item")
        .field(FieldSpec::new("quantity", FieldType::Int).gt(0).le(100))
        .field(FieldSpec::optional("notes", FieldType::Text).max_length(500))
        .build()
        .expect("valid spec");

    let json = serde_json::to_value(&spec).expect("serialize spec");
    let expected = json!({
        "name": "order_item",
        "fields": [
            {
                "name": "quantity",
                "type": {"kind": "int"},
                "presence": "required",
                "constraints": [
                    {"rule": "gt", "value": "0"},
                    {"rule": "le", "value": "100"}
                ]
            },
            {
                "name": "notes",
                "type": {"kind": "optional", "of": {"kind": "text"}},
                "presence": "default",
                "default": {"fixed": null},
                "constraints": [
                    {"rule": "max_length", "value": 500}
                ]
            }
        ]
    });
    assert_eq!(json, expected);
}

#[test]
fn serializes_nested_records_and_enums() {
    let address = RecordSpec::builder("address")
        .field(
            FieldSpec::new("postal_code", FieldType::Text)
                .pattern(r"^\d{6}$")
                .expect("valid pattern"),
        )
        .build()
        .expect("valid address spec");
    let status = EnumSpec::new("customer_status", ["active", "inactive"]);
    let spec = RecordSpec::builder("customer")
        .describe("Customer with a postal address")
        .field(FieldSpec::new("address", FieldType::record(address)))
        .field(
            FieldSpec::new("status", FieldType::Enum(status))
                .default(Value::Enum("active".to_string())),
        )
        .build()
        .expect("valid customer spec");

    let json = serde_json::to_value(&spec).expect("serialize spec");
    assert_eq!(json["description"], "Customer with a postal address");
    assert_eq!(json["fields"][0]["type"]["kind"], "record");
    assert_eq!(
        json["fields"][0]["type"]["of"]["fields"][0]["constraints"][0],
        json!({"rule": "pattern", "value": r"^\d{6}$"})
    );
    assert_eq!(
        json["fields"][1]["type"]["of"],
        json!({"name": "customer_status", "labels": ["active", "inactive"]})
    );
    assert_eq!(json["fields"][1]["default"], json!({"fixed": "active"}));
}

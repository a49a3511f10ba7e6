//! Column inference tests

use serde_json::{Value, json};
use table_script_sdk::inference::{ColumnInferrer, InferenceConfig, add_columns_from_records};
use table_script_sdk::models::{Column, ValueType};

fn names(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.name.as_str()).collect()
}

fn infer(records: &[Value]) -> Vec<Column> {
    let mut columns = Vec::new();
    ColumnInferrer::new().infer(records, &mut columns).unwrap();
    columns
}

mod schema_tests {
    use super::*;

    #[test]
    fn test_mixed_scalars() {
        let columns = infer(&[json!({"a": 1, "b": "x"}), json!({"a": 2, "b": null})]);

        assert_eq!(
            columns,
            vec![
                Column::new("a", ValueType::Integer),
                Column::new("b", ValueType::Text).with_nulls(true),
            ]
        );
    }

    #[test]
    fn test_attribute_group_after_ordinary() {
        for records in [
            vec![json!({"attr_score": 1.0, "name": "n"})],
            vec![json!({"name": "n"}), json!({"attr_score": 1.0})],
            vec![json!({"attr_score": 1.0}), json!({"name": "n"})],
        ] {
            assert_eq!(names(&infer(&records)), vec!["name", "attr_score"]);
        }
    }

    #[test]
    fn test_every_non_null_field_appears_once() {
        let records = vec![
            json!({"id": 1, "tag": "x", "gone": null}),
            json!({"id": 2, "extra": 3.5, "tag": "y"}),
            json!({"tag": null, "attr_k": "v", "id": 3}),
        ];
        let columns = infer(&records);

        assert_eq!(names(&columns), vec!["extra", "id", "tag", "attr_k"]);
        assert!(!columns.iter().any(|c| c.name == "gone"));
    }

    #[test]
    fn test_order_independent_of_record_and_field_order() {
        let forward = vec![
            json!({"zeta": 1, "alpha": "a", "attr_b": 2}),
            json!({"mid": 0.5, "attr_a": null}),
            json!({"attr_a": "x", "alpha": null}),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        let reordered: Vec<Value> = forward
            .iter()
            .map(|record| {
                let mut fields: Vec<_> = record.as_object().unwrap().clone().into_iter().collect();
                fields.reverse();
                Value::Object(fields.into_iter().collect())
            })
            .collect();

        let expected = infer(&forward);
        assert_eq!(infer(&reversed), expected);
        assert_eq!(infer(&reordered), expected);
        assert_eq!(names(&expected), vec!["alpha", "mid", "zeta", "attr_a", "attr_b"]);
    }

    #[test]
    fn test_second_pass_with_existing_schema_is_stable() {
        let records = vec![
            json!({"b": 1, "attr_x": "q"}),
            json!({"a": "s", "b": null}),
        ];
        let first = infer(&records);

        let mut second = first.clone();
        let stats = ColumnInferrer::new().infer(&records, &mut second).unwrap();

        assert_eq!(second, first);
        assert_eq!(stats.columns_added, 0);
    }

    #[test]
    fn test_new_fields_appended_after_existing() {
        let mut columns = infer(&[json!({"b": 1, "attr_z": 1})]);
        ColumnInferrer::new()
            .infer(&[json!({"a": 1, "b": 2, "attr_y": 3, "attr_z": 4})], &mut columns)
            .unwrap();

        assert_eq!(names(&columns), vec!["b", "attr_z", "a", "attr_y"]);
        assert!(!columns[2].has_nulls);
    }
}

mod policy_tests {
    use super::*;

    #[test]
    fn test_first_type_wins() {
        let mut columns = Vec::new();
        let stats = ColumnInferrer::new()
            .infer(&[json!({"v": "text"}), json!({"v": 12})], &mut columns)
            .unwrap();

        assert_eq!(columns[0].value_type, ValueType::Text);
        assert_eq!(stats.type_mismatches, 1);
    }

    #[test]
    fn test_existing_type_not_overridden() {
        let mut columns = vec![Column::new("v", ValueType::Real)];
        let stats = ColumnInferrer::new()
            .infer(&[json!({"v": 3})], &mut columns)
            .unwrap();

        assert_eq!(columns, vec![Column::new("v", ValueType::Real)]);
        assert_eq!(stats.mismatched_columns.get("v"), Some(&1));
    }

    #[test]
    fn test_null_only_fields_opt_in() {
        let records = vec![json!({"a": 1, "n": null})];

        assert_eq!(names(&infer(&records)), vec!["a"]);

        let config = InferenceConfig::builder()
            .include_null_only_fields(true)
            .build();
        let mut columns = Vec::new();
        add_columns_from_records(&records, &mut columns, &config).unwrap();
        assert_eq!(
            columns,
            vec![
                Column::new("a", ValueType::Integer),
                Column::new("n", ValueType::Text).with_nulls(true),
            ]
        );
    }

    #[test]
    fn test_custom_attribute_prefix() {
        let config = InferenceConfig::builder().attribute_prefix("meta_").build();
        let mut columns = Vec::new();
        add_columns_from_records(
            &[json!({"meta_a": 1, "attr_b": 1, "c": 1})],
            &mut columns,
            &config,
        )
        .unwrap();

        assert_eq!(names(&columns), vec!["attr_b", "c", "meta_a"]);
    }

    #[test]
    fn test_filters_combine() {
        let config = InferenceConfig::builder()
            .ignore_patterns(["tmp_.*"])
            .only_names(["keep", "tmp_keep"])
            .build();
        let mut columns = Vec::new();
        add_columns_from_records(
            &[json!({"keep": 1, "tmp_keep": 2, "other": 3})],
            &mut columns,
            &config,
        )
        .unwrap();

        assert_eq!(names(&columns), vec!["keep"]);
    }
}

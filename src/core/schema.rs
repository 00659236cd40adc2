//! 文件形狀驗證。
//!
//! 先完整走訪 JSON 值並收集所有不符合的欄位，全部通過後才反序列化成強型別文件。

use crate::domain::model::{ElectricalProfileLevelOrder, ElectricalProfilesList};
use crate::utils::error::{FieldError, ProfileError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A document shape that can be checked against an untyped JSON value.
pub trait Schema: DeserializeOwned {
    const NAME: &'static str;

    fn check(value: &Value, path: &str, errors: &mut Vec<FieldError>);
}

/// 驗證 `value` 並回傳強型別文件；失敗時列出每一個出錯的欄位。
pub fn validate<T: Schema>(value: &Value) -> Result<T> {
    let mut errors = Vec::new();
    T::check(value, "$", &mut errors);

    if !errors.is_empty() {
        tracing::debug!("{} rejected with {} error(s)", T::NAME, errors.len());
        return Err(ProfileError::validation(T::NAME, errors));
    }

    Ok(serde_json::from_value(value.clone())?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn field_path(parent: &str, field: &str) -> String {
    format!("{}.{}", parent, field)
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn key_path(parent: &str, key: &str) -> String {
    format!("{}[{:?}]", parent, key)
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => {
            errors.push(FieldError::wrong_type(path, "object", type_name(other)));
            None
        }
    }
}

fn expect_array<'a>(
    value: &'a Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        other => {
            errors.push(FieldError::wrong_type(path, "array", type_name(other)));
            None
        }
    }
}

fn required<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    parent: &str,
    errors: &mut Vec<FieldError>,
) -> Option<(&'a Value, String)> {
    let path = field_path(parent, field);
    match map.get(field) {
        Some(value) => Some((value, path)),
        None => {
            errors.push(FieldError::missing(path));
            None
        }
    }
}

fn required_string<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    parent: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    let (value, path) = required(map, field, parent, errors)?;
    match value {
        Value::String(s) => Some(s),
        other => {
            errors.push(FieldError::wrong_type(path, "string", type_name(other)));
            None
        }
    }
}

fn required_position(
    map: &Map<String, Value>,
    field: &str,
    parent: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let (value, path) = required(map, field, parent, errors)?;
    let Some(position) = value.as_f64() else {
        errors.push(FieldError::wrong_type(path, "number", type_name(value)));
        return None;
    };

    if !position.is_finite() || position < 0.0 {
        errors.push(FieldError::invalid(
            path,
            "must be a finite number greater than or equal to 0",
        ));
        return None;
    }
    Some(position)
}

fn check_track_range(value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    let Some(map) = expect_object(value, path, errors) else {
        return;
    };

    if let Some(track) = required_string(map, "track", path, errors) {
        if track.trim().is_empty() {
            errors.push(FieldError::invalid(
                field_path(path, "track"),
                "track reference cannot be empty",
            ));
        }
    }

    let begin = required_position(map, "begin", path, errors);
    let end = required_position(map, "end", path, errors);
    if let (Some(begin), Some(end)) = (begin, end) {
        if begin > end {
            errors.push(FieldError::invalid(
                field_path(path, "end"),
                format!("end ({}) must not be lower than begin ({})", end, begin),
            ));
        }
    }
}

fn check_profile(value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    let Some(map) = expect_object(value, path, errors) else {
        return;
    };

    required_string(map, "value", path, errors);
    required_string(map, "power_class", path, errors);

    if let Some((ranges, ranges_path)) = required(map, "track_ranges", path, errors) {
        if let Some(items) = expect_array(ranges, &ranges_path, errors) {
            for (index, item) in items.iter().enumerate() {
                check_track_range(item, &index_path(&ranges_path, index), errors);
            }
        }
    }
}

impl Schema for ElectricalProfilesList {
    const NAME: &'static str = "ElectricalProfilesList";

    fn check(value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        if let Some(items) = expect_array(value, path, errors) {
            for (index, item) in items.iter().enumerate() {
                check_profile(item, &index_path(path, index), errors);
            }
        }
    }
}

impl Schema for ElectricalProfileLevelOrder {
    const NAME: &'static str = "ElectricalProfileLevelOrder";

    fn check(value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        let Some(map) = expect_object(value, path, errors) else {
            return;
        };

        for (power_class, levels) in map {
            let levels_path = key_path(path, power_class);
            if let Some(items) = expect_array(levels, &levels_path, errors) {
                for (index, level) in items.iter().enumerate() {
                    if !level.is_string() {
                        errors.push(FieldError::wrong_type(
                            index_path(&levels_path, index),
                            "string",
                            type_name(level),
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FieldErrorKind;
    use serde_json::json;

    fn errors_of<T: Schema + std::fmt::Debug>(value: Value) -> Vec<FieldError> {
        match validate::<T>(&value) {
            Err(ProfileError::ValidationError { errors, .. }) => errors,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_valid_profiles() {
        let data = json!([
            {"value": "25000", "power_class": "1", "track_ranges": [
                {"track": "TA0", "begin": 0.0, "end": 10.0},
                {"track": "TA0", "begin": 90, "end": 100}
            ]},
            {"value": "A", "power_class": "1500V", "track_ranges": []}
        ]);

        let profiles: ElectricalProfilesList = validate(&data).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles.profiles()[0].track_ranges[1].end, 100.0);
    }

    #[test]
    fn test_missing_required_fields_are_named() {
        for field in ["value", "power_class", "track_ranges"] {
            let mut profile = json!({"value": "A", "power_class": "1500V", "track_ranges": []});
            profile.as_object_mut().unwrap().remove(field);

            let errors = errors_of::<ElectricalProfilesList>(json!([profile]));
            assert_eq!(errors, vec![FieldError::missing(format!("$[0].{}", field))]);
        }
    }

    #[test]
    fn test_reports_every_failure() {
        let data = json!([
            {"value": 3, "power_class": "1"},
            "not a profile",
            {"value": "B", "power_class": "1", "track_ranges": [
                {"track": "", "begin": -1, "end": 2},
                {"track": "T", "begin": 5, "end": 2},
                {"begin": "0", "end": 1}
            ]}
        ]);

        let errors = errors_of::<ElectricalProfilesList>(data);
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "$[0].value",
                "$[0].track_ranges",
                "$[1]",
                "$[2].track_ranges[0].track",
                "$[2].track_ranges[0].begin",
                "$[2].track_ranges[1].end",
                "$[2].track_ranges[2].track",
                "$[2].track_ranges[2].begin",
            ]
        );
        assert!(matches!(errors[0].kind, FieldErrorKind::WrongType { .. }));
        assert_eq!(errors[1].kind, FieldErrorKind::Missing);
    }

    #[test]
    fn test_top_level_must_be_a_list() {
        let errors = errors_of::<ElectricalProfilesList>(json!({"value": "A"}));
        assert_eq!(errors, vec![FieldError::wrong_type("$", "array", "object")]);
    }

    #[test]
    fn test_level_order() {
        let order: ElectricalProfileLevelOrder =
            validate(&json!({"1": ["O", "A", "B"], "2": []})).unwrap();
        assert_eq!(order.levels("1").unwrap(), ["O", "A", "B"]);

        let empty: ElectricalProfileLevelOrder = validate(&json!({})).unwrap();
        assert!(empty.is_empty());

        let errors = errors_of::<ElectricalProfileLevelOrder>(json!({"1": ["A", 2], "2": "B"}));
        assert_eq!(
            errors,
            vec![
                FieldError::wrong_type("$[\"1\"][1]", "string", "number"),
                FieldError::wrong_type("$[\"2\"]", "array", "string"),
            ]
        );

        let errors = errors_of::<ElectricalProfileLevelOrder>(json!([]));
        assert_eq!(errors.len(), 1);
    }
}

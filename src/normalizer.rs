// 🔄 Normalizer - provider payload → SpeciesRecord
// Pure projection, no I/O. Missing fields degrade to absent values.

use serde_json::Value;

use crate::error::{CoachError, Result};
use crate::record::SpeciesRecord;

/// Normalize a raw provider payload into a SpeciesRecord
///
/// # Returns
/// * `Ok(SpeciesRecord)` - for any JSON object, however sparse
/// * `Err(CoachError::MalformedPayload)` - if the payload is not an object
pub fn normalize(raw: &Value) -> Result<SpeciesRecord> {
    let fields = raw.as_object().ok_or_else(|| {
        CoachError::MalformedPayload(format!("expected a JSON object, got {}", kind_of(raw)))
    })?;

    Ok(SpeciesRecord {
        name: fields.get("name").and_then(Value::as_str).map(str::to_string),
        height: fields.get("height").and_then(as_measure),
        weight: fields.get("weight").and_then(as_measure),
        types: project_names(fields.get("types"), "type"),
        abilities: project_names(fields.get("abilities"), "ability"),
    })
}

/// Project `[{wrapper: {name}}]` into the ordered list of names
///
/// Entries without a string name are skipped.
fn project_names(list: Option<&Value>, wrapper: &str) -> Vec<String> {
    let Some(entries) = list.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get(wrapper)?.get("name")?.as_str())
        .map(str::to_string)
        .collect()
}

// Non-negative integers only
fn as_measure(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_pikachu() {
        let raw = json!({
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{"type": {"name": "electric"}}],
            "abilities": [{"ability": {"name": "static"}}]
        });

        let record = normalize(&raw).unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "pikachu",
                "height": 4,
                "weight": 60,
                "types": "electric",
                "abilities": "static"
            })
        );
    }

    #[test]
    fn test_normalize_preserves_provider_order() {
        let raw = json!({
            "name": "bulbasaur",
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}},
                {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}}
            ],
            "abilities": [
                {"ability": {"name": "overgrow"}, "is_hidden": false},
                {"ability": {"name": "chlorophyll"}, "is_hidden": true}
            ]
        });

        let record = normalize(&raw).unwrap();

        assert_eq!(record.types, vec!["grass", "poison"]);
        assert_eq!(record.types_joined(), "grass, poison");
        assert_eq!(record.abilities_joined(), "overgrow, chlorophyll");
    }

    #[test]
    fn test_normalize_missing_fields_does_not_fail() {
        let record = normalize(&json!({})).unwrap();

        assert_eq!(record, SpeciesRecord::default());
        assert_eq!(record.types_joined(), "");
        assert_eq!(record.abilities_joined(), "");
    }

    #[test]
    fn test_normalize_skips_entries_without_name() {
        let raw = json!({
            "name": "eevee",
            "types": [{"type": {"name": "normal"}}, {"type": {}}, {"slot": 3}],
            "abilities": "not-a-list"
        });

        let record = normalize(&raw).unwrap();

        assert_eq!(record.types, vec!["normal"]);
        assert!(record.abilities.is_empty());
    }

    #[test]
    fn test_normalize_rejects_negative_and_fractional_measures() {
        let record = normalize(&json!({"name": "x", "height": -3, "weight": 6.5})).unwrap();

        assert_eq!(record.height, None);
        assert_eq!(record.weight, None);
    }

    #[test]
    fn test_normalize_non_object_is_malformed() {
        for raw in [json!([1, 2, 3]), json!("pikachu"), json!(null)] {
            assert!(matches!(
                normalize(&raw),
                Err(CoachError::MalformedPayload(_))
            ));
        }
    }
}

// Output variable injection
//
// The `ExtractOutputVariables` action is an `UpdateContactAttributes` block
// shipped with an empty attribute set:
//
//   {
//     "Parameters": { "Attributes": {}, "TargetContact": "Current" },
//     "Identifier": "ExtractOutputVariables",
//     "Type": "UpdateContactAttributes",
//     ...
//   }
//
// Each configured output variable becomes an attribute whose value is the
// JSONPath of that variable in the external response.

use serde_json::Value;
use tracing::debug;

use crate::document::{actions_mut, child_path, object_field_mut, OrderedDocument};
use crate::field_names::{
    ACTIONS, ATTRIBUTES, EXTERNAL_OUTPUT_VARIABLES_PREFIX, EXTRACT_OUTPUT_VARIABLES, IDENTIFIER,
    PARAMETERS,
};
use crate::error::Result;
use crate::tables::AttributeMapping;

/// Set one contact attribute per configured output variable on the first
/// `ExtractOutputVariables` action.
///
/// Returns the number of attributes written. A template without `Actions`,
/// or without the action, is a legitimate variant and yields `Ok(0)`.
pub fn inject_output_variable_attributes(
    doc: &mut OrderedDocument,
    output_variable_to_attribute: &AttributeMapping,
) -> Result<usize> {
    let Some(actions) = actions_mut(doc)? else {
        debug!("Template has no Actions; skipping output variable injection");
        return Ok(0);
    };

    let actions_path = child_path("", ACTIONS);
    let found = actions.iter_mut().enumerate().find_map(|(index, action)| match action {
        Value::Object(map)
            if map.get(IDENTIFIER).and_then(Value::as_str) == Some(EXTRACT_OUTPUT_VARIABLES) =>
        {
            Some((index, map))
        }
        _ => None,
    });

    let Some((index, action)) = found else {
        debug!(
            identifier = EXTRACT_OUTPUT_VARIABLES,
            "Action not present; skipping output variable injection"
        );
        return Ok(0);
    };

    let action_path = child_path(&actions_path, &index.to_string());
    let parameters = object_field_mut(action, PARAMETERS, &action_path)?;
    let attributes = object_field_mut(
        parameters,
        ATTRIBUTES,
        &child_path(&action_path, PARAMETERS),
    )?;

    for (output_variable, attribute) in output_variable_to_attribute {
        attributes.insert(
            attribute.clone(),
            Value::String(format!("{}{}", EXTERNAL_OUTPUT_VARIABLES_PREFIX, output_variable)),
        );
    }

    Ok(output_variable_to_attribute.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> OrderedDocument {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    fn mapping(entries: &[(&str, &str)]) -> AttributeMapping {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_injects_sentiment_attribute() {
        let mut document = doc(json!({
            "Actions": [{"Identifier": "ExtractOutputVariables", "Parameters": {"Attributes": {}}}]
        }));
        let written = inject_output_variable_attributes(
            &mut document,
            &mapping(&[("sentiment", "CustomerSentiment")]),
        )
        .unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            document["Actions"][0]["Parameters"]["Attributes"],
            json!({"CustomerSentiment": "$.External.outputVariables.sentiment"})
        );
    }

    #[test]
    fn test_no_actions_is_noop() {
        let original = json!({"Version": "2019-10-30", "Settings": {}});
        let mut document = doc(original.clone());
        let written =
            inject_output_variable_attributes(&mut document, &mapping(&[("a", "b")])).unwrap();

        assert_eq!(written, 0);
        assert_eq!(Value::Object(document), original);
    }

    #[test]
    fn test_missing_action_is_noop() {
        let original = json!({"Actions": [{"Identifier": "Other", "Parameters": {}}, "stray"]});
        let mut document = doc(original.clone());
        inject_output_variable_attributes(&mut document, &mapping(&[("a", "b")])).unwrap();
        assert_eq!(Value::Object(document), original);
    }

    #[test]
    fn test_empty_mapping_leaves_attributes_unchanged() {
        let original = json!({
            "Actions": [{
                "Identifier": "ExtractOutputVariables",
                "Parameters": {"Attributes": {"Existing": "x"}, "TargetContact": "Current"}
            }]
        });
        let mut document = doc(original.clone());
        let written =
            inject_output_variable_attributes(&mut document, &AttributeMapping::new()).unwrap();

        assert_eq!(written, 0);
        assert_eq!(Value::Object(document), original);
    }

    #[test]
    fn test_only_first_match_is_updated() {
        let mut document = doc(json!({
            "Actions": [
                {"Identifier": "ExtractOutputVariables", "Parameters": {"Attributes": {}}},
                {"Identifier": "ExtractOutputVariables", "Parameters": {"Attributes": {}}}
            ]
        }));
        inject_output_variable_attributes(&mut document, &mapping(&[("intent", "Intent")]))
            .unwrap();

        assert_eq!(
            document["Actions"][0]["Parameters"]["Attributes"]["Intent"],
            "$.External.outputVariables.intent"
        );
        assert_eq!(document["Actions"][1]["Parameters"]["Attributes"], json!({}));
    }

    #[test]
    fn test_new_attributes_are_appended_after_existing_keys() {
        let mut document = doc(json!({
            "Actions": [{
                "Identifier": "ExtractOutputVariables",
                "Parameters": {"Attributes": {"Existing": "x"}, "TargetContact": "Current"}
            }]
        }));
        inject_output_variable_attributes(
            &mut document,
            &mapping(&[("a", "First"), ("b", "Second")]),
        )
        .unwrap();

        let attributes = document["Actions"][0]["Parameters"]["Attributes"]
            .as_object()
            .unwrap();
        let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Existing", "First", "Second"]);
    }

    #[test]
    fn test_structural_errors() {
        let mut document = doc(json!({"Actions": {"not": "an array"}}));
        let err = inject_output_variable_attributes(&mut document, &mapping(&[])).unwrap_err();
        assert_eq!(err.code(), "F003");

        let mut document = doc(json!({
            "Actions": [{"Identifier": "ExtractOutputVariables", "Parameters": {}}]
        }));
        let err = inject_output_variable_attributes(&mut document, &mapping(&[])).unwrap_err();
        assert_eq!(err.code(), "F002");
        assert!(err.to_string().contains("/Actions/0/Parameters"));
    }
}

// SSML conversion of speak-response actions
//
// When SSML rules are configured, every action matched by the
// `SpeakActionConvention` has its spoken-text parameter renamed to the SSML
// parameter (same key position), which switches the Connect block to SSML.
// Literal text is run through the rules and wrapped in <speak>; runtime
// references ("$.External.text") are converted by the Lambda at call time and
// only change parameter name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::mem;
use tracing::debug;

use crate::document::{actions_mut, child_path, object_field_mut, type_name, OrderedDocument};
use crate::error::{Result, TransformError};
use crate::field_names::{ACTIONS, IDENTIFIER, PARAMETERS, RUNTIME_REFERENCE_PREFIX, TYPE};
use crate::tables::SsmlConversionRule;

const SPEAK_OPEN: &str = "<speak>";
const SPEAK_CLOSE: &str = "</speak>";

/// How speak-response actions are recognised and which parameters they use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeakActionConvention {
    /// `Identifier` values of speak-response actions
    pub identifiers: Vec<String>,
    /// Optional action `Type` that also marks an action as a speak response
    pub action_type: Option<String>,
    pub text_parameter: String,
    pub ssml_parameter: String,
}

impl Default for SpeakActionConvention {
    fn default() -> Self {
        Self {
            identifiers: vec!["SpeakResponse".to_string()],
            action_type: None,
            text_parameter: "Text".to_string(),
            ssml_parameter: "SSML".to_string(),
        }
    }
}

impl SpeakActionConvention {
    pub fn matches(&self, action: &OrderedDocument) -> bool {
        let identifier_match = action
            .get(IDENTIFIER)
            .and_then(Value::as_str)
            .is_some_and(|id| self.identifiers.iter().any(|candidate| candidate == id));

        let type_match = match &self.action_type {
            Some(expected) => action.get(TYPE).and_then(Value::as_str) == Some(expected.as_str()),
            None => false,
        };

        identifier_match || type_match
    }
}

/// Apply `rules` in order to literal `text` and wrap it in `<speak>`
pub fn apply_ssml_rules(text: &str, rules: &[SsmlConversionRule]) -> String {
    let converted = rules.iter().fold(text.to_string(), |acc, rule| {
        if rule.search_for.is_empty() {
            acc
        } else {
            acc.replace(&rule.search_for, &rule.replace_with)
        }
    });

    if converted.starts_with(SPEAK_OPEN) && converted.ends_with(SPEAK_CLOSE) {
        converted
    } else {
        format!("{}{}{}", SPEAK_OPEN, converted, SPEAK_CLOSE)
    }
}

/// Convert every matched speak-response action to SSML.
///
/// Returns the number of actions converted. Actions already carrying the SSML
/// parameter are skipped.
pub fn inject_ssml_conversions(
    doc: &mut OrderedDocument,
    rules: &[SsmlConversionRule],
    convention: &SpeakActionConvention,
) -> Result<usize> {
    let Some(actions) = actions_mut(doc)? else {
        debug!("Template has no Actions; skipping SSML conversion");
        return Ok(0);
    };

    let actions_path = child_path("", ACTIONS);
    let mut converted = 0;

    for (index, action) in actions.iter_mut().enumerate() {
        let Value::Object(action) = action else {
            continue;
        };
        if !convention.matches(action) {
            continue;
        }

        let action_path = child_path(&actions_path, &index.to_string());
        let parameters = object_field_mut(action, PARAMETERS, &action_path)?;
        let parameters_path = child_path(&action_path, PARAMETERS);

        if convert_parameters(parameters, &parameters_path, rules, convention)? {
            debug!(path = %action_path, "Converted speak response to SSML");
            converted += 1;
        }
    }

    Ok(converted)
}

fn convert_parameters(
    parameters: &mut OrderedDocument,
    path: &str,
    rules: &[SsmlConversionRule],
    convention: &SpeakActionConvention,
) -> Result<bool> {
    let text = match parameters.get(&convention.text_parameter) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            return Err(TransformError::unexpected_type(
                path,
                convention.text_parameter.as_str(),
                "a string",
                type_name(other),
            ))
        }
        None if parameters.contains_key(&convention.ssml_parameter) => return Ok(false),
        None => {
            return Err(TransformError::missing_field(
                path,
                convention.text_parameter.as_str(),
            ))
        }
    };

    let ssml = if text.starts_with(RUNTIME_REFERENCE_PREFIX) {
        text
    } else {
        apply_ssml_rules(&text, rules)
    };

    // Rebuild so the SSML parameter takes the text parameter's slot
    let original = mem::take(parameters);
    for (key, value) in original {
        if key == convention.text_parameter {
            parameters.insert(convention.ssml_parameter.clone(), Value::String(ssml.clone()));
        } else if key != convention.ssml_parameter {
            parameters.insert(key, value);
        }
    }

    Ok(true)
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

    fn rules() -> Vec<SsmlConversionRule> {
        vec![
            SsmlConversionRule::new(
                "ASAPP",
                r#"<phoneme alphabet="ipa" ph="eɪˈsæp">ASAPP</phoneme>"#,
            ),
            SsmlConversionRule::new("&", "and"),
        ]
    }

    #[test]
    fn test_apply_rules_in_order_and_wrap() {
        assert_eq!(
            apply_ssml_rules("Welcome to ASAPP & friends", &rules()),
            r#"<speak>Welcome to <phoneme alphabet="ipa" ph="eɪˈsæp">ASAPP</phoneme> and friends</speak>"#
        );
        assert_eq!(apply_ssml_rules("<speak>hi</speak>", &[]), "<speak>hi</speak>");
    }

    #[test]
    fn test_later_rules_see_earlier_output() {
        let rules = vec![
            SsmlConversionRule::new("a", "b"),
            SsmlConversionRule::new("b", "c"),
        ];
        assert_eq!(apply_ssml_rules("a", &rules), "<speak>c</speak>");
    }

    #[test]
    fn test_literal_text_is_converted_in_place() {
        let mut document = doc(json!({
            "Actions": [{
                "Identifier": "SpeakResponse",
                "Type": "MessageParticipant",
                "Parameters": {"Text": "Thanks for calling ASAPP", "Other": 1}
            }]
        }));
        let converted =
            inject_ssml_conversions(&mut document, &rules(), &SpeakActionConvention::default())
                .unwrap();

        assert_eq!(converted, 1);
        let parameters = document["Actions"][0]["Parameters"].as_object().unwrap();
        let keys: Vec<&str> = parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, ["SSML", "Other"]);
        assert!(parameters["SSML"]
            .as_str()
            .unwrap()
            .starts_with("<speak>Thanks for calling <phoneme"));
    }

    #[test]
    fn test_runtime_reference_only_switches_parameter() {
        let mut document = doc(json!({
            "Actions": [{
                "Identifier": "SpeakResponse",
                "Parameters": {"Text": "$.External.text"}
            }]
        }));
        inject_ssml_conversions(&mut document, &rules(), &SpeakActionConvention::default())
            .unwrap();
        assert_eq!(
            document["Actions"][0]["Parameters"],
            json!({"SSML": "$.External.text"})
        );
    }

    #[test]
    fn test_convention_by_type() {
        let convention = SpeakActionConvention {
            identifiers: vec![],
            action_type: Some("MessageParticipant".to_string()),
            ..SpeakActionConvention::default()
        };
        let mut document = doc(json!({
            "Actions": [
                {"Identifier": "a", "Type": "MessageParticipant", "Parameters": {"Text": "$.External.text"}},
                {"Identifier": "b", "Type": "InvokeLambdaFunction", "Parameters": {"Text": "keep"}}
            ]
        }));
        let converted = inject_ssml_conversions(&mut document, &rules(), &convention).unwrap();

        assert_eq!(converted, 1);
        assert_eq!(document["Actions"][1]["Parameters"]["Text"], "keep");
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut document = doc(json!({
            "Actions": [{"Identifier": "SpeakResponse", "Parameters": {"Text": "ASAPP"}}]
        }));
        let convention = SpeakActionConvention::default();
        inject_ssml_conversions(&mut document, &rules(), &convention).unwrap();
        let once = document.clone();

        let converted = inject_ssml_conversions(&mut document, &rules(), &convention).unwrap();
        assert_eq!(converted, 0);
        assert_eq!(document, once);
    }

    #[test]
    fn test_structural_errors() {
        let convention = SpeakActionConvention::default();

        let mut document = doc(json!({"Actions": [{"Identifier": "SpeakResponse"}]}));
        let err = inject_ssml_conversions(&mut document, &rules(), &convention).unwrap_err();
        assert_eq!(err.code(), "F002");

        let mut document = doc(json!({
            "Actions": [{"Identifier": "SpeakResponse", "Parameters": {"Text": 5}}]
        }));
        let err = inject_ssml_conversions(&mut document, &rules(), &convention).unwrap_err();
        assert_eq!(err.code(), "F003");

        let mut document = doc(json!({
            "Actions": [{"Identifier": "SpeakResponse", "Parameters": {}}]
        }));
        let err = inject_ssml_conversions(&mut document, &rules(), &convention).unwrap_err();
        assert!(err.to_string().contains("'Text'"));
    }

    #[test]
    fn test_convention_deserialises_with_defaults() {
        let convention: SpeakActionConvention =
            serde_json::from_str(r#"{"actionType": "MessageParticipant"}"#).unwrap();
        assert_eq!(convention.identifiers, vec!["SpeakResponse".to_string()]);
        assert_eq!(convention.action_type.as_deref(), Some("MessageParticipant"));
        assert_eq!(convention.text_parameter, "Text");
        assert_eq!(convention.ssml_parameter, "SSML");
    }
}

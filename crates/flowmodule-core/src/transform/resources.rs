// Resource reference rewriting
//
// Walks every object of the document in key order:
// - `Identifier` values bound in the prompt/Lambda tables set the matching
//   ARN on the sibling `Parameters` object
// - ARN-shaped strings are moved into the target region/account
// - objects and objects inside arrays are visited recursively

use serde_json::Value;
use tracing::debug;

use crate::arn::{looks_like_arn, Arn};
use crate::document::{child_path, object_field_mut, OrderedDocument};
use crate::error::{Result, TransformError};
use crate::field_names::{IDENTIFIER, PARAMETERS};
use crate::tables::{BindingKind, ResourceTables};

/// Counters reported by [`rewrite_resource_references`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceRewriteReport {
    pub prompts_bound: usize,
    pub lambdas_bound: usize,
    pub arns_rewritten: usize,
}

struct RewriteContext<'a> {
    region: &'a str,
    account_id: &'a str,
    tables: &'a ResourceTables,
    report: ResourceRewriteReport,
}

/// Rewrite embedded ARNs to `region`/`account_id` and bind symbolic
/// identifiers to the ARNs in `tables`.
///
/// The first malformed ARN or missing `Parameters` sibling aborts the pass;
/// the document may then be partially rewritten and should be discarded.
pub fn rewrite_resource_references(
    doc: &mut OrderedDocument,
    region: &str,
    account_id: &str,
    tables: &ResourceTables,
) -> Result<ResourceRewriteReport> {
    let mut ctx = RewriteContext {
        region,
        account_id,
        tables,
        report: ResourceRewriteReport::default(),
    };
    rewrite_object(doc, "", &mut ctx)?;
    Ok(ctx.report)
}

fn rewrite_object(
    map: &mut OrderedDocument,
    path: &str,
    ctx: &mut RewriteContext<'_>,
) -> Result<()> {
    let keys: Vec<String> = map.keys().cloned().collect();

    for key in keys {
        if key == IDENTIFIER {
            if let Some(Value::String(identifier)) = map.get(IDENTIFIER) {
                if let Some((kind, arn)) = ctx.tables.resolve(identifier) {
                    let identifier = identifier.clone();
                    bind_identifier(map, path, &identifier, kind, arn)?;
                    match kind {
                        BindingKind::Prompt => ctx.report.prompts_bound += 1,
                        BindingKind::Lambda => ctx.report.lambdas_bound += 1,
                    }
                    continue;
                }
            }
        }

        let value_path = child_path(path, &key);
        match map.get_mut(&key) {
            Some(Value::String(value)) => {
                if looks_like_arn(value) {
                    let arn = Arn::parse(value).map_err(|e| {
                        TransformError::malformed_arn(&value_path, value.as_str(), e)
                    })?;
                    *value = arn.relocated(ctx.region, ctx.account_id).to_string();
                    ctx.report.arns_rewritten += 1;
                }
            }
            Some(Value::Object(nested)) => rewrite_object(nested, &value_path, ctx)?,
            Some(Value::Array(items)) => {
                for (index, item) in items.iter_mut().enumerate() {
                    if let Value::Object(nested) = item {
                        rewrite_object(nested, &child_path(&value_path, &index.to_string()), ctx)?;
                    }
                }
            }
            Some(Value::Null | Value::Bool(_) | Value::Number(_)) | None => {}
        }
    }

    Ok(())
}

fn bind_identifier(
    map: &mut OrderedDocument,
    path: &str,
    identifier: &str,
    kind: BindingKind,
    arn: &str,
) -> Result<()> {
    let parameters = object_field_mut(map, PARAMETERS, path)?;
    parameters.insert(kind.parameter().to_string(), Value::String(arn.to_string()));
    debug!(
        identifier,
        parameter = kind.parameter(),
        arn,
        path = %path,
        "Bound identifier to provisioned resource"
    );
    Ok(())
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

    fn tables() -> ResourceTables {
        let mut tables = ResourceTables::default();
        tables.prompts.insert(
            "Wait1sPrompt".to_string(),
            "arn:aws:connect:us-east-1:123:instance/i/prompt/p1".to_string(),
        );
        tables.lambdas.insert(
            "Engage".to_string(),
            "arn:aws:lambda:us-east-1:123:function:engage".to_string(),
        );
        tables
    }

    #[test]
    fn test_prompt_identifier_sets_prompt_id() {
        let mut document = doc(json!({"Identifier": "Wait1sPrompt", "Parameters": {}}));
        let report =
            rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap();

        assert_eq!(
            Value::Object(document),
            json!({
                "Identifier": "Wait1sPrompt",
                "Parameters": {"PromptId": "arn:aws:connect:us-east-1:123:instance/i/prompt/p1"}
            })
        );
        assert_eq!(report.prompts_bound, 1);
        assert_eq!(report.lambdas_bound, 0);
    }

    #[test]
    fn test_lambda_identifier_overwrites_existing_arn_in_place() {
        let mut document = doc(json!({
            "Parameters": {
                "LambdaFunctionARN": "arn:aws:lambda:eu-west-2:555:function:old",
                "InvocationTimeLimitSeconds": "8"
            },
            "Identifier": "Engage",
            "Type": "InvokeLambdaFunction"
        }));
        rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap();

        let parameters = document["Parameters"].as_object().unwrap();
        let keys: Vec<&str> = parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, ["LambdaFunctionARN", "InvocationTimeLimitSeconds"]);
        assert_eq!(
            parameters["LambdaFunctionARN"],
            "arn:aws:lambda:us-east-1:123:function:engage"
        );
    }

    #[test]
    fn test_arn_strings_are_relocated() {
        let mut document = doc(json!({
            "Arn": "arn:aws:lambda:us-west-2:999:function:f",
            "Nested": {"Queue": "arn:aws:connect:us-west-2:999:instance/i/queue/q"},
            "List": ["arn:aws:lambda:us-west-2:999:function:untouched", {"Arn": "arn:aws:s3:::bucket"}],
            "Text": "not an arn",
            "Count": 3
        }));
        let report = rewrite_resource_references(
            &mut document,
            "eu-west-1",
            "111",
            &ResourceTables::default(),
        )
        .unwrap();

        assert_eq!(document["Arn"], "arn:aws:lambda:eu-west-1:111:function:f");
        assert_eq!(
            document["Nested"]["Queue"],
            "arn:aws:connect:eu-west-1:111:instance/i/queue/q"
        );
        // Plain strings inside arrays are not rewrite candidates
        assert_eq!(document["List"][0], "arn:aws:lambda:us-west-2:999:function:untouched");
        assert_eq!(document["List"][1]["Arn"], "arn:aws:s3:eu-west-1:111:bucket");
        assert_eq!(document["Text"], "not an arn");
        assert_eq!(document["Count"], 3);
        assert_eq!(report.arns_rewritten, 3);
    }

    #[test]
    fn test_malformed_arn_aborts_with_path() {
        let mut document = doc(json!({"Actions": [{"Parameters": {"Arn": "arn::lambda:r:a:f"}}]}));
        let err = rewrite_resource_references(
            &mut document,
            "eu-west-1",
            "111",
            &ResourceTables::default(),
        )
        .unwrap_err();

        assert_eq!(err.code(), "F001");
        assert!(err.to_string().contains("/Actions/0/Parameters/Arn"));
    }

    #[test]
    fn test_missing_parameters_is_structural_error() {
        let mut document = doc(json!({"Actions": [{"Identifier": "Wait1sPrompt"}]}));
        let err =
            rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap_err();
        assert_eq!(err.code(), "F002");
        assert!(err.to_string().contains("/Actions/0"));

        let mut document = doc(json!({"Identifier": "Engage", "Parameters": []}));
        let err =
            rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap_err();
        assert_eq!(err.code(), "F003");
    }

    #[test]
    fn test_unbound_identifier_is_left_alone() {
        let original = json!({"Identifier": "SomethingElse", "Type": "MessageParticipant"});
        let mut document = doc(original.clone());
        rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap();
        assert_eq!(Value::Object(document), original);
    }

    #[test]
    fn test_second_pass_reapplies_substitution() {
        let mut document = doc(json!({
            "Identifier": "Engage",
            "Parameters": {},
            "Arn": "arn:aws:lambda:us-west-2:999:function:f"
        }));
        let first =
            rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap();
        let after_first = document.clone();
        let second =
            rewrite_resource_references(&mut document, "us-east-1", "123", &tables()).unwrap();

        assert_eq!(document, after_first);
        assert_eq!(first.lambdas_bound, 1);
        assert_eq!(second.lambdas_bound, 1);
    }
}

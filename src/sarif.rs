//! SARIF 2.1.0 output for CI upload. Every registered rule descriptor is
//! listed under the tool driver; results reference rules by index and carry
//! a blake3 partial fingerprint for stable result matching across runs.

use crate::diagnostics::{self, Diagnostic};
use anyhow::Result;
use serde_json::{Value, json};

const SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

pub fn report(diagnostics: &[Diagnostic]) -> Value {
    let rules: Vec<Value> = diagnostics::DESCRIPTORS
        .iter()
        .map(|descriptor| {
            json!({
                "id": descriptor.id,
                "shortDescription": { "text": descriptor.title },
                "defaultConfiguration": {
                    "level": descriptor.severity.sarif_level(),
                    "enabled": descriptor.enabled_by_default,
                },
            })
        })
        .collect();

    let results: Vec<Value> = diagnostics.iter().map(result).collect();

    json!({
        "$schema": SCHEMA,
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules,
                }
            },
            "results": results,
        }]
    })
}

fn result(diag: &Diagnostic) -> Value {
    let rule_index = diagnostics::DESCRIPTORS
        .iter()
        .position(|d| d.id == diag.rule_id);
    let mut region = json!({
        "startLine": diag.line,
        "startColumn": diag.column,
        "endLine": diag.end_line,
        "endColumn": diag.end_column,
        "byteOffset": diag.start_byte,
        "byteLength": diag.end_byte - diag.start_byte,
    });
    if let Some(snippet) = &diag.snippet {
        region["snippet"] = json!({ "text": snippet });
    }
    let mut value = json!({
        "ruleId": diag.rule_id,
        "level": diag.severity.sarif_level(),
        "message": { "text": diag.message },
        "locations": [{
            "physicalLocation": {
                "artifactLocation": { "uri": diag.path },
                "region": region,
            }
        }],
        "partialFingerprints": {
            "primaryLocationLineHash": diag.fingerprint(),
        },
    });
    if let Some(index) = rule_index {
        value["ruleIndex"] = json!(index);
    }
    value
}

pub fn to_string_pretty(diagnostics: &[Diagnostic]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report(diagnostics))?)
}

#[cfg(test)]
mod tests {
    use super::report;
    use crate::diagnostics::{ASP007, Diagnostic};

    #[test]
    fn report_shape() {
        let source = "[Route(\"api/Orders\")]";
        let diag = Diagnostic::new(
            &ASP007,
            "Controllers/OrdersController.cs",
            source,
            (8, 18),
            "use lowercase urls: 'Orders'".to_string(),
        );
        let value = report(&[diag]);
        assert_eq!(value["version"], "2.1.0");
        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 11);
        let result = &run["results"][0];
        assert_eq!(result["ruleId"], "ASP007");
        assert_eq!(result["level"], "warning");
        assert_eq!(
            result["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "Controllers/OrdersController.cs"
        );
        assert!(
            result["partialFingerprints"]["primaryLocationLineHash"]
                .as_str()
                .unwrap()
                .len()
                > 0
        );
    }
}

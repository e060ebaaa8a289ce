//! Resource-name generation and the merge pass that writes generated
//! schedule-rule entries back into the descriptor.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Value};
use tracing::trace;

use crate::descriptor::{ResourcesSection, ServerlessDescriptor, Service};
use crate::extract::{extract_inputs, ExtractedInput};

static BOUNDARY_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z]").expect("Invalid regex pattern"));

/// Uppercase each lowercase ASCII letter that opens a word. Deliberately not
/// a full PascalCase conversion: underscores, digits and interior capitals
/// pass through unchanged (`function_1` -> `Function_1`, `my_function` ->
/// `My_Function`, `9lives` -> `9lives`).
pub fn pascal_case_boundaries(name: &str) -> String {
    BOUNDARY_LOWER
        .replace_all(name, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Resource key for one extracted input. Distinct function names can
/// normalize to the same key; the collision is resolved last-write-wins in
/// [`merge_resources`] without a diagnostic.
pub fn generated_resource_name(input: &ExtractedInput) -> String {
    format!(
        "{}EventsRuleSchedule{}",
        pascal_case_boundaries(&input.function_name),
        input.ordinal
    )
}

// Wire shape consumed by downstream provisioning tooling.
fn resource_entry(field: &str) -> Value {
    json!({
        "Properties": {
            "Targets": [
                { "Input": field }
            ]
        }
    })
}

/// Write one generated resource entry per extracted input into the service's
/// `Resources` map, creating the resources section if the descriptor has
/// none. Pre-existing entries under other keys are left untouched; an entry
/// under the same key is overwritten.
pub fn merge_resources(service: &mut Service, inputs: &[ExtractedInput]) {
    let section = service.resources.get_or_insert_with(ResourcesSection::default);

    for input in inputs {
        let name = generated_resource_name(input);
        trace!("writing resource entry {name}");
        section.resources.insert(name, resource_entry(&input.field));
    }
}

/// Entry point for the whole transform: extract constant inputs from the
/// functions map and merge the generated resources back into the same tree.
/// Without a service section or a functions map this is a no-op and no
/// resources section is created.
pub fn apply_constant_inputs(descriptor: &mut ServerlessDescriptor) {
    let Some(service) = descriptor.service.as_mut() else {
        return;
    };
    let Some(functions) = service.functions.as_ref() else {
        return;
    };

    let inputs = extract_inputs(functions);
    merge_resources(service, &inputs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptor_from_yaml(yaml: &str) -> ServerlessDescriptor {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn input(function_name: &str, ordinal: u32, field: &str) -> ExtractedInput {
        ExtractedInput {
            function_name: function_name.to_string(),
            ordinal,
            field: field.to_string(),
        }
    }

    #[test]
    fn pascal_casing_touches_only_boundary_lowercase() {
        assert_eq!(pascal_case_boundaries("function_1"), "Function_1");
        assert_eq!(pascal_case_boundaries("my_function"), "My_Function");
        assert_eq!(pascal_case_boundaries("helloWorld"), "HelloWorld");
        assert_eq!(pascal_case_boundaries("foo-bar baz"), "Foo-Bar Baz");
        assert_eq!(pascal_case_boundaries("Already"), "Already");
        assert_eq!(pascal_case_boundaries("9lives"), "9lives");
        assert_eq!(pascal_case_boundaries(""), "");
    }

    #[test]
    fn resource_name_appends_suffix_and_ordinal() {
        assert_eq!(
            generated_resource_name(&input("function_1", 3, "{}")),
            "Function_1EventsRuleSchedule3"
        );
    }

    #[test]
    fn resource_entry_matches_the_wire_shape() {
        assert_eq!(
            resource_entry(r#"{"test_one": "two"}"#),
            json!({
                "Properties": {
                    "Targets": [
                        { "Input": "{\"test_one\": \"two\"}" }
                    ]
                }
            })
        );
    }

    #[test]
    fn merge_creates_an_empty_resources_map_for_no_inputs() {
        let mut service = Service::default();
        merge_resources(&mut service, &[]);

        let section = service.resources.unwrap();
        assert!(section.resources.is_empty());
    }

    #[test]
    fn merge_preserves_pre_existing_entries() {
        let mut descriptor = descriptor_from_yaml(
            r#"
service:
  resources:
    Resources:
      ExistingBucket:
        Type: AWS::S3::Bucket
"#,
        );
        let service = descriptor.service.as_mut().unwrap();

        merge_resources(service, &[input("function_1", 1, "payload")]);

        let section = service.resources.as_ref().unwrap();
        assert_eq!(section.resources.len(), 2);
        assert_eq!(
            section.resources["ExistingBucket"],
            json!({"Type": "AWS::S3::Bucket"})
        );
        assert_eq!(
            section.resources["Function_1EventsRuleSchedule1"],
            json!({"Properties": {"Targets": [{"Input": "payload"}]}})
        );
    }

    #[test]
    fn merge_overwrites_colliding_keys_last_write_wins() {
        let mut service = Service::default();

        merge_resources(
            &mut service,
            &[input("function_1", 1, "first"), input("Function_1", 1, "second")],
        );

        let section = service.resources.unwrap();
        assert_eq!(section.resources.len(), 1);
        assert_eq!(
            section.resources["Function_1EventsRuleSchedule1"]["Properties"]["Targets"][0]["Input"],
            json!("second")
        );
    }

    #[test]
    fn apply_is_a_noop_without_a_functions_map() {
        let mut descriptor = descriptor_from_yaml(
            r#"
service:
  provider:
    name: aws
"#,
        );

        apply_constant_inputs(&mut descriptor);

        assert!(descriptor.service.unwrap().resources.is_none());
    }

    #[test]
    fn apply_is_a_noop_without_a_service_section() {
        let mut descriptor = ServerlessDescriptor::default();
        apply_constant_inputs(&mut descriptor);
        assert!(descriptor.service.is_none());
    }

    #[test]
    fn apply_creates_resources_even_when_nothing_is_extracted() {
        let mut descriptor = descriptor_from_yaml(
            r#"
service:
  functions:
    function_1:
      events: []
"#,
        );

        apply_constant_inputs(&mut descriptor);

        let section = descriptor.service.unwrap().resources.unwrap();
        assert!(section.resources.is_empty());
    }

    #[test]
    fn apply_writes_entries_under_generated_names() {
        let mut descriptor = descriptor_from_yaml(
            r#"
service:
  functions:
    function_1:
      events:
        - schedule:
            rate: cron(0 1 * * ? *)
            input: '{"test_one": "two"}'
        - schedule:
            rate: cron(0 2 * * ? *)
        - schedule:
            rate: cron(0 3 * * ? *)
            input: '{"test_three": "four"}'
"#,
        );

        apply_constant_inputs(&mut descriptor);

        let section = descriptor.service.unwrap().resources.unwrap();
        assert_eq!(section.resources.len(), 2);
        assert_eq!(
            section.resources["Function_1EventsRuleSchedule1"]["Properties"]["Targets"][0]["Input"],
            json!(r#"{"test_one": "two"}"#)
        );
        assert_eq!(
            section.resources["Function_1EventsRuleSchedule3"]["Properties"]["Targets"][0]["Input"],
            json!(r#"{"test_three": "four"}"#)
        );
        assert!(!section.resources.contains_key("Function_1EventsRuleSchedule2"));
    }
}

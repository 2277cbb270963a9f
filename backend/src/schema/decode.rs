//! Lifts a raw JSON object into a [`SubmissionCandidate`] one field at a time.
//!
//! Serde stops at the first mismatch. Here each field is decoded on its own,
//! so a wrongly typed value becomes a [`FieldError`](super::FieldError) at its
//! own path and every other field still reaches the rules. `null` reads as
//! "not given".

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Field, ValidationErrors};
use crate::models::submission::{
    ExternalDetails, InternalDetails, SocialEngineeringDetails, SubmissionCandidate,
};

const STRING: &str = "Expected a string";
const BOOLEAN: &str = "Expected true or false";
const WHOLE_NUMBER: &str = "Expected a whole number";
const LIST: &str = "Expected a list";
const OBJECT: &str = "Expected an object";

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// `None` for a missing or null key, otherwise the decoded value. A type
/// mismatch is recorded and also yields `None`.
fn optional<T: DeserializeOwned>(
    object: &Map<String, Value>,
    prefix: &str,
    key: &str,
    expected: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push(join(prefix, key), expected);
                None
            }
        },
    }
}

fn text(object: &Map<String, Value>, key: &str, errors: &mut ValidationErrors) -> String {
    optional(object, "", key, STRING, errors).unwrap_or_default()
}

/// A list of strings. Non-string items are recorded at their index and kept
/// as blank placeholders so later indices still line up with the body.
fn string_list(
    object: &Map<String, Value>,
    prefix: &str,
    key: &str,
    errors: &mut ValidationErrors,
) -> Vec<String> {
    let path = join(prefix, key);
    match object.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => s.clone(),
                _ => {
                    errors.push(format!("{path}.{i}"), STRING);
                    String::new()
                }
            })
            .collect(),
        Some(_) => {
            errors.push(path, LIST);
            Vec::new()
        }
    }
}

fn section<T>(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
    lift: impl FnOnce(&Map<String, Value>, &str, &mut ValidationErrors) -> T,
) -> Option<T> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Object(inner)) => Some(lift(inner, key, errors)),
        Some(_) => {
            errors.push(key, OBJECT);
            None
        }
    }
}

fn external(o: &Map<String, Value>, p: &str, errors: &mut ValidationErrors) -> ExternalDetails {
    ExternalDetails {
        hosting_provider: optional(o, p, "hostingProvider", STRING, errors),
        cloud_infrastructure: optional(o, p, "cloudInfrastructure", STRING, errors),
        web_app_count: optional(o, p, "webAppCount", WHOLE_NUMBER, errors),
        mobile_app_count: optional(o, p, "mobileAppCount", WHOLE_NUMBER, errors),
    }
}

fn internal(o: &Map<String, Value>, p: &str, errors: &mut ValidationErrors) -> InternalDetails {
    InternalDetails {
        internal_ip_count: optional(o, p, "internalIpCount", WHOLE_NUMBER, errors),
        desktop_app_count: optional(o, p, "desktopAppCount", WHOLE_NUMBER, errors),
        internal_web_app_count: optional(o, p, "internalWebAppCount", WHOLE_NUMBER, errors),
        wireless_network_count: optional(o, p, "wirelessNetworkCount", WHOLE_NUMBER, errors),
        wireless_box_type: optional(o, p, "wirelessBoxType", STRING, errors),
    }
}

fn social(
    o: &Map<String, Value>,
    p: &str,
    errors: &mut ValidationErrors,
) -> SocialEngineeringDetails {
    SocialEngineeringDetails {
        employee_count: optional(o, p, "employeeCount", WHOLE_NUMBER, errors),
        campaign_types: string_list(o, p, "campaignTypes", errors),
    }
}

/// Candidate plus the type mismatches found while lifting it. Unknown keys,
/// `id` and `submittedAt` included, are ignored.
pub fn decode(object: &Map<String, Value>) -> (SubmissionCandidate, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let e = &mut errors;
    let candidate = SubmissionCandidate {
        business_requirement: text(object, Field::BusinessRequirement.path(), e),
        test_types: string_list(object, "", Field::TestTypes.path(), e),
        scope_description: text(object, Field::ScopeDescription.path(), e),
        owner_awareness: text(object, Field::OwnerAwareness.path(), e),
        in_scope_assets: text(object, Field::InScopeAssets.path(), e),
        target_type: text(object, Field::TargetType.path(), e),
        target_other: optional(object, "", Field::TargetOther.path(), STRING, e),
        is_production: optional(object, "", Field::IsProduction.path(), BOOLEAN, e),
        external_details: section(object, Field::ExternalDetails.path(), e, external),
        internal_details: section(object, Field::InternalDetails.path(), e, internal),
        social_engineering_details: section(
            object,
            Field::SocialEngineeringDetails.path(),
            e,
            social,
        ),
        scheduling_preferences: text(object, Field::SchedulingPreferences.path(), e),
        scheduling_other: optional(object, "", Field::SchedulingOther.path(), STRING, e),
        contact_name: text(object, Field::ContactName.path(), e),
        contact_email: text(object, Field::ContactEmail.path(), e),
    };
    (candidate, errors)
}

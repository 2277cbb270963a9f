//! Statically declared validation rules for submissions.
//!
//! The same rules gate the wizard's steps and the HTTP create handler, so a
//! record the wizard accepts is exactly a record the server accepts.
//! Validation never short-circuits: every violated rule contributes one
//! [`FieldError`] keyed by its field path.

mod decode;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use crate::models::submission::{
    BusinessRequirement, ExternalDetails, InternalDetails, NewSubmission, OwnerAwareness,
    SchedulingPreference, SocialEngineeringDetails, SubmissionCandidate, TargetType, TestType,
};

const MIN_SCOPE_DESCRIPTION_CHARS: usize = 10;

/// Top-level fields of a submission candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BusinessRequirement,
    TestTypes,
    ScopeDescription,
    OwnerAwareness,
    InScopeAssets,
    TargetType,
    TargetOther,
    IsProduction,
    ExternalDetails,
    InternalDetails,
    SocialEngineeringDetails,
    SchedulingPreferences,
    SchedulingOther,
    ContactName,
    ContactEmail,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::BusinessRequirement,
        Field::TestTypes,
        Field::ScopeDescription,
        Field::OwnerAwareness,
        Field::InScopeAssets,
        Field::TargetType,
        Field::TargetOther,
        Field::IsProduction,
        Field::ExternalDetails,
        Field::InternalDetails,
        Field::SocialEngineeringDetails,
        Field::SchedulingPreferences,
        Field::SchedulingOther,
        Field::ContactName,
        Field::ContactEmail,
    ];

    /// Wire name of the field, used as the error path root.
    pub fn path(self) -> &'static str {
        match self {
            Field::BusinessRequirement => "businessRequirement",
            Field::TestTypes => "testTypes",
            Field::ScopeDescription => "scopeDescription",
            Field::OwnerAwareness => "ownerAwareness",
            Field::InScopeAssets => "inScopeAssets",
            Field::TargetType => "targetType",
            Field::TargetOther => "targetOther",
            Field::IsProduction => "isProduction",
            Field::ExternalDetails => "externalDetails",
            Field::InternalDetails => "internalDetails",
            Field::SocialEngineeringDetails => "socialEngineeringDetails",
            Field::SchedulingPreferences => "schedulingPreferences",
            Field::SchedulingOther => "schedulingOther",
            Field::ContactName => "contactName",
            Field::ContactEmail => "contactEmail",
        }
    }
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every rule violation found in a candidate, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(path, message);
        errors
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error recorded for exactly `path`.
    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.path == path)
    }

    /// Whether any error sits at `path` or below it (`externalDetails` matches
    /// `externalDetails.webAppCount`).
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|e| {
            e.path == path
                || e.path
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Whether an error sits at `path`, below it, or on one of its parents.
    pub fn overlaps(&self, path: &str) -> bool {
        self.touches(path)
            || self.0.iter().any(|e| {
                path.strip_prefix(e.path.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
            })
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate every rule and build the typed record.
pub fn validate(candidate: &SubmissionCandidate) -> Result<NewSubmission, ValidationErrors> {
    validate_fields(candidate, &Field::ALL)?;
    into_record(candidate)
}

/// Validate a raw JSON request body.
///
/// Wrongly typed fields are reported at their own path together with every
/// rule violation elsewhere. A rule error is not repeated on a path that
/// already carries a type error.
pub fn validate_json(body: &Value) -> Result<NewSubmission, ValidationErrors> {
    let Some(object) = body.as_object() else {
        return Err(ValidationErrors::single("body", "Expected a JSON object"));
    };

    let (candidate, mut errors) = decode::decode(object);
    if errors.is_empty() {
        return validate(&candidate);
    }
    if let Err(rule_errors) = validate_fields(&candidate, &Field::ALL) {
        for e in rule_errors.into_vec() {
            if !errors.overlaps(&e.path) {
                errors.push(e.path, e.message);
            }
        }
    }
    Err(errors)
}

/// Validate only the rules owned by `fields`.
///
/// Conditional rules (`targetOther`, `schedulingOther`) only fire when their
/// controlling field selects `other`, so listing them unconditionally is safe.
pub fn validate_fields(
    candidate: &SubmissionCandidate,
    fields: &[Field],
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in fields {
        check_field(candidate, *field, &mut errors);
    }
    errors.into_result()
}

fn check_field(c: &SubmissionCandidate, field: Field, errors: &mut ValidationErrors) {
    let path = field.path();
    match field {
        Field::BusinessRequirement => {
            if c.business_requirement.parse::<BusinessRequirement>().is_err() {
                errors.push(path, "Please select a business requirement");
            }
        }
        Field::TestTypes => {
            if c.test_types.is_empty() {
                errors.push(path, "Please select at least one testing methodology");
            }
            for (i, raw) in c.test_types.iter().enumerate() {
                if raw.parse::<TestType>().is_err() {
                    errors.push(
                        format!("{path}.{i}"),
                        format!("Unknown testing methodology '{raw}'"),
                    );
                }
            }
        }
        Field::ScopeDescription => {
            if c.scope_description.chars().count() < MIN_SCOPE_DESCRIPTION_CHARS {
                errors.push(path, "Please provide a more detailed scope description");
            }
        }
        Field::OwnerAwareness => {
            if c.owner_awareness.parse::<OwnerAwareness>().is_err() {
                errors.push(path, "Please confirm owner awareness");
            }
        }
        Field::InScopeAssets => {
            if is_blank(&c.in_scope_assets) {
                errors.push(path, "Please list in-scope assets");
            }
        }
        Field::TargetType => {
            if is_blank(&c.target_type) {
                errors.push(path, "Please select a target type");
            } else if c.target_type.parse::<TargetType>().is_err() {
                errors.push(path, format!("Unknown target type '{}'", c.target_type));
            }
        }
        Field::TargetOther => {
            if c.target_type == TargetType::Other.as_str() && blank_option(&c.target_other) {
                errors.push(path, "Please specify the target");
            }
        }
        Field::IsProduction => {
            if c.is_production.is_none() {
                errors.push(path, "Please indicate whether the target is in production");
            }
        }
        Field::ExternalDetails => {
            if let Some(details) = &c.external_details {
                check_external(details, errors);
            }
        }
        Field::InternalDetails => {
            if let Some(details) = &c.internal_details {
                check_internal(details, errors);
            }
        }
        Field::SocialEngineeringDetails => {
            if let Some(details) = &c.social_engineering_details {
                check_social(details, errors);
            }
        }
        Field::SchedulingPreferences => {
            if is_blank(&c.scheduling_preferences) {
                errors.push(path, "Please select a scheduling preference");
            } else if c.scheduling_preferences.parse::<SchedulingPreference>().is_err() {
                errors.push(
                    path,
                    format!("Unknown scheduling preference '{}'", c.scheduling_preferences),
                );
            }
        }
        Field::SchedulingOther => {
            if c.scheduling_preferences == SchedulingPreference::Other.as_str()
                && blank_option(&c.scheduling_other)
            {
                errors.push(path, "Please describe your scheduling needs");
            }
        }
        Field::ContactName => {
            if is_blank(&c.contact_name) {
                errors.push(path, "Full name is required");
            }
        }
        Field::ContactEmail => {
            if !c.contact_email.validate_email() {
                errors.push(path, "Please enter a valid email address");
            }
        }
    }
}

fn check_external(d: &ExternalDetails, errors: &mut ValidationErrors) {
    let root = Field::ExternalDetails.path();
    check_count(root, "webAppCount", d.web_app_count, 0, errors);
    check_count(root, "mobileAppCount", d.mobile_app_count, 0, errors);
}

fn check_internal(d: &InternalDetails, errors: &mut ValidationErrors) {
    let root = Field::InternalDetails.path();
    check_count(root, "internalIpCount", d.internal_ip_count, 0, errors);
    check_count(root, "desktopAppCount", d.desktop_app_count, 0, errors);
    check_count(root, "internalWebAppCount", d.internal_web_app_count, 0, errors);
    check_count(root, "wirelessNetworkCount", d.wireless_network_count, 0, errors);
}

fn check_social(d: &SocialEngineeringDetails, errors: &mut ValidationErrors) {
    let root = Field::SocialEngineeringDetails.path();
    check_count(root, "employeeCount", d.employee_count, 1, errors);
    for (i, campaign) in d.campaign_types.iter().enumerate() {
        if is_blank(campaign) {
            errors.push(
                format!("{root}.campaignTypes.{i}"),
                "Campaign type cannot be blank",
            );
        }
    }
}

fn check_count(
    root: &str,
    name: &str,
    value: Option<i64>,
    min: i64,
    errors: &mut ValidationErrors,
) {
    if let Some(v) = value {
        if v < min {
            errors.push(format!("{root}.{name}"), format!("Must be at least {min}"));
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn blank_option(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, is_blank)
}

/// Drop blank optional text so storage never holds `""` for "not given".
fn non_blank(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|v| !is_blank(v)).cloned()
}

fn parse_field<T: FromStr>(field: Field, raw: &str) -> Result<T, ValidationErrors> {
    raw.parse::<T>().map_err(|_| {
        ValidationErrors::single(field.path(), format!("Invalid value '{raw}'"))
    })
}

fn into_record(c: &SubmissionCandidate) -> Result<NewSubmission, ValidationErrors> {
    let mut test_types: Vec<TestType> = Vec::with_capacity(c.test_types.len());
    for raw in &c.test_types {
        let t = parse_field::<TestType>(Field::TestTypes, raw)?;
        if !test_types.contains(&t) {
            test_types.push(t);
        }
    }

    let is_production = c.is_production.ok_or_else(|| {
        ValidationErrors::single(Field::IsProduction.path(), "Value is required")
    })?;

    Ok(NewSubmission {
        business_requirement: parse_field(Field::BusinessRequirement, &c.business_requirement)?,
        test_types,
        scope_description: c.scope_description.clone(),
        owner_awareness: parse_field(Field::OwnerAwareness, &c.owner_awareness)?,
        in_scope_assets: c.in_scope_assets.clone(),
        target_type: parse_field(Field::TargetType, &c.target_type)?,
        target_other: non_blank(&c.target_other),
        is_production,
        external_details: c.external_details.clone(),
        internal_details: c.internal_details.clone(),
        social_engineering_details: c.social_engineering_details.clone(),
        scheduling_preferences: parse_field(
            Field::SchedulingPreferences,
            &c.scheduling_preferences,
        )?,
        scheduling_other: non_blank(&c.scheduling_other),
        contact_name: c.contact_name.clone(),
        contact_email: c.contact_email.clone(),
    })
}

//! Penetration-test request record: client candidate, validated record, stored row.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw value did not match any entry of a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Driver behind the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessRequirement {
    Regulatory,
    Proactive,
    Incident,
}

impl BusinessRequirement {
    pub const ALL: [Self; 3] = [Self::Regulatory, Self::Proactive, Self::Incident];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulatory => "regulatory",
            Self::Proactive => "proactive",
            Self::Incident => "incident",
        }
    }
}

/// Testing methodology tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    BlackBox,
    GrayBox,
    WhiteBox,
    SocialEng,
    Wireless,
}

impl TestType {
    pub const ALL: [Self; 5] = [
        Self::BlackBox,
        Self::GrayBox,
        Self::WhiteBox,
        Self::SocialEng,
        Self::Wireless,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlackBox => "black_box",
            Self::GrayBox => "gray_box",
            Self::WhiteBox => "white_box",
            Self::SocialEng => "social_eng",
            Self::Wireless => "wireless",
        }
    }
}

/// Category of the system under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Website,
    Network,
    InternalNetwork,
    Mobile,
    People,
    Other,
}

impl TargetType {
    pub const ALL: [Self; 6] = [
        Self::Website,
        Self::Network,
        Self::InternalNetwork,
        Self::Mobile,
        Self::People,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Network => "network",
            Self::InternalNetwork => "internal_network",
            Self::Mobile => "mobile",
            Self::People => "people",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPreference {
    BusinessHours,
    AfterHours,
    Weekend,
    Other,
}

impl SchedulingPreference {
    pub const ALL: [Self; 4] = [
        Self::BusinessHours,
        Self::AfterHours,
        Self::Weekend,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessHours => "business_hours",
            Self::AfterHours => "after_hours",
            Self::Weekend => "weekend",
            Self::Other => "other",
        }
    }
}

/// Answer to "is the system owner aware of this test?".
///
/// Travels as the strings `"true"` / `"false"` because that is what the
/// radio group posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerAwareness {
    #[serde(rename = "true")]
    Aware,
    #[serde(rename = "false")]
    NotAware,
}

impl OwnerAwareness {
    pub const ALL: [Self; 2] = [Self::Aware, Self::NotAware];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aware => "true",
            Self::NotAware => "false",
        }
    }
}

macro_rules! vocabulary_parsing {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownValue;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::ALL
                        .iter()
                        .copied()
                        .find(|v| v.as_str() == s)
                        .ok_or_else(|| UnknownValue {
                            kind: $kind,
                            value: s.to_string(),
                        })
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

vocabulary_parsing! {
    BusinessRequirement => "business requirement",
    TestType => "test type",
    TargetType => "target type",
    SchedulingPreference => "scheduling preference",
    OwnerAwareness => "owner awareness",
}

/// External surface sizing, shown for black/gray box or web/network targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalDetails {
    pub hosting_provider: Option<String>,
    pub cloud_infrastructure: Option<String>,
    pub web_app_count: Option<i64>,
    pub mobile_app_count: Option<i64>,
}

/// Internal network sizing, shown for white box or internal network targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InternalDetails {
    pub internal_ip_count: Option<i64>,
    pub desktop_app_count: Option<i64>,
    pub internal_web_app_count: Option<i64>,
    pub wireless_network_count: Option<i64>,
    pub wireless_box_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialEngineeringDetails {
    pub employee_count: Option<i64>,
    pub campaign_types: Vec<String>,
}

/// Unvalidated request body as posted by the wizard.
///
/// Every field defaults when absent so that missing input surfaces as a
/// field-level validation error rather than a decode failure. `id` and
/// `submittedAt` are not part of this shape; if a client sends them they
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionCandidate {
    pub business_requirement: String,
    pub test_types: Vec<String>,
    pub scope_description: String,
    pub owner_awareness: String,
    pub in_scope_assets: String,
    pub target_type: String,
    pub target_other: Option<String>,
    pub is_production: Option<bool>,
    pub external_details: Option<ExternalDetails>,
    pub internal_details: Option<InternalDetails>,
    pub social_engineering_details: Option<SocialEngineeringDetails>,
    pub scheduling_preferences: String,
    pub scheduling_other: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
}

/// A request that passed [`crate::schema::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub business_requirement: BusinessRequirement,
    pub test_types: Vec<TestType>,
    pub scope_description: String,
    pub owner_awareness: OwnerAwareness,
    pub in_scope_assets: String,
    pub target_type: TargetType,
    pub target_other: Option<String>,
    pub is_production: bool,
    pub external_details: Option<ExternalDetails>,
    pub internal_details: Option<InternalDetails>,
    pub social_engineering_details: Option<SocialEngineeringDetails>,
    pub scheduling_preferences: SchedulingPreference,
    pub scheduling_other: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
}

impl NewSubmission {
    /// Non-empty lines of the in-scope asset list.
    pub fn asset_lines(&self) -> impl Iterator<Item = &str> {
        self.in_scope_assets
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

impl From<&NewSubmission> for SubmissionCandidate {
    fn from(s: &NewSubmission) -> Self {
        Self {
            business_requirement: s.business_requirement.as_str().to_string(),
            test_types: s.test_types.iter().map(|t| t.as_str().to_string()).collect(),
            scope_description: s.scope_description.clone(),
            owner_awareness: s.owner_awareness.as_str().to_string(),
            in_scope_assets: s.in_scope_assets.clone(),
            target_type: s.target_type.as_str().to_string(),
            target_other: s.target_other.clone(),
            is_production: Some(s.is_production),
            external_details: s.external_details.clone(),
            internal_details: s.internal_details.clone(),
            social_engineering_details: s.social_engineering_details.clone(),
            scheduling_preferences: s.scheduling_preferences.as_str().to_string(),
            scheduling_other: s.scheduling_other.clone(),
            contact_name: s.contact_name.clone(),
            contact_email: s.contact_email.clone(),
        }
    }
}

/// Persisted submission. `id` and `submitted_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    #[serde(flatten)]
    pub request: NewSubmission,
    pub submitted_at: DateTime<Utc>,
}

//! Immutable form snapshot and the discrete updates that produce new ones.

use crate::models::submission::{
    ExternalDetails, InternalDetails, SocialEngineeringDetails, SubmissionCandidate,
};

/// One user edit. Applying it to a [`FormState`] yields the next snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    BusinessRequirement(String),
    TestTypes(Vec<String>),
    /// Check the methodology if absent, uncheck it if present.
    ToggleTestType(String),
    ScopeDescription(String),
    OwnerAwareness(String),
    InScopeAssets(String),
    TargetType(String),
    TargetOther(String),
    IsProduction(bool),
    ExternalDetails(ExternalDetails),
    InternalDetails(InternalDetails),
    SocialEngineeringDetails(SocialEngineeringDetails),
    SchedulingPreferences(String),
    SchedulingOther(String),
    ContactName(String),
    ContactEmail(String),
}

/// Current values of every wizard field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: SubmissionCandidate,
}

impl Default for FormState {
    /// Blank form as first rendered: owner awareness unanswered-as-"false",
    /// not production, every detail section pre-filled with zero counts.
    fn default() -> Self {
        Self {
            values: SubmissionCandidate {
                owner_awareness: "false".to_string(),
                target_other: Some(String::new()),
                is_production: Some(false),
                external_details: Some(ExternalDetails {
                    hosting_provider: Some(String::new()),
                    cloud_infrastructure: Some(String::new()),
                    web_app_count: Some(0),
                    mobile_app_count: Some(0),
                }),
                internal_details: Some(InternalDetails {
                    internal_ip_count: Some(0),
                    desktop_app_count: Some(0),
                    internal_web_app_count: Some(0),
                    wireless_network_count: Some(0),
                    wireless_box_type: Some(String::new()),
                }),
                social_engineering_details: Some(SocialEngineeringDetails {
                    employee_count: Some(1),
                    campaign_types: Vec::new(),
                }),
                scheduling_other: Some(String::new()),
                ..Default::default()
            },
        }
    }
}

impl FormState {
    pub fn values(&self) -> &SubmissionCandidate {
        &self.values
    }

    /// Snapshot with `update` applied; `self` is left untouched.
    pub fn with(&self, update: FieldUpdate) -> Self {
        let mut values = self.values.clone();
        match update {
            FieldUpdate::BusinessRequirement(v) => values.business_requirement = v,
            FieldUpdate::TestTypes(v) => values.test_types = v,
            FieldUpdate::ToggleTestType(v) => {
                if let Some(pos) = values.test_types.iter().position(|t| *t == v) {
                    values.test_types.remove(pos);
                } else {
                    values.test_types.push(v);
                }
            }
            FieldUpdate::ScopeDescription(v) => values.scope_description = v,
            FieldUpdate::OwnerAwareness(v) => values.owner_awareness = v,
            FieldUpdate::InScopeAssets(v) => values.in_scope_assets = v,
            FieldUpdate::TargetType(v) => values.target_type = v,
            FieldUpdate::TargetOther(v) => values.target_other = Some(v),
            FieldUpdate::IsProduction(v) => values.is_production = Some(v),
            FieldUpdate::ExternalDetails(v) => values.external_details = Some(v),
            FieldUpdate::InternalDetails(v) => values.internal_details = Some(v),
            FieldUpdate::SocialEngineeringDetails(v) => {
                values.social_engineering_details = Some(v)
            }
            FieldUpdate::SchedulingPreferences(v) => values.scheduling_preferences = v,
            FieldUpdate::SchedulingOther(v) => values.scheduling_other = Some(v),
            FieldUpdate::ContactName(v) => values.contact_name = v,
            FieldUpdate::ContactEmail(v) => values.contact_email = v,
        }
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_returns_new_snapshot() {
        let before = FormState::default();
        let after = before.with(FieldUpdate::ContactName("Jane Doe".into()));
        assert_eq!(before.values().contact_name, "");
        assert_eq!(after.values().contact_name, "Jane Doe");
    }

    #[test]
    fn toggle_test_type_adds_then_removes() {
        let form = FormState::default()
            .with(FieldUpdate::ToggleTestType("black_box".into()))
            .with(FieldUpdate::ToggleTestType("white_box".into()));
        assert_eq!(form.values().test_types, vec!["black_box", "white_box"]);

        let form = form.with(FieldUpdate::ToggleTestType("black_box".into()));
        assert_eq!(form.values().test_types, vec!["white_box"]);
    }

    #[test]
    fn defaults_match_first_render() {
        let values = FormState::default().values().clone();
        assert_eq!(values.owner_awareness, "false");
        assert_eq!(values.is_production, Some(false));
        assert_eq!(
            values.social_engineering_details.unwrap().employee_count,
            Some(1)
        );
        assert_eq!(values.external_details.unwrap().web_app_count, Some(0));
    }
}

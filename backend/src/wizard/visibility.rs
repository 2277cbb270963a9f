//! Which optional detail sections apply to the current answers.

use serde::Serialize;

use crate::models::submission::{SubmissionCandidate, TargetType, TestType};
use crate::schema::Field;

fn has(test_types: &[String], wanted: TestType) -> bool {
    test_types.iter().any(|t| t == wanted.as_str())
}

/// Black/gray box methodology, or a public website/network target.
pub fn is_external(test_types: &[String], target_type: &str) -> bool {
    has(test_types, TestType::BlackBox)
        || has(test_types, TestType::GrayBox)
        || target_type == TargetType::Website.as_str()
        || target_type == TargetType::Network.as_str()
}

/// White box methodology, or an internal network target.
pub fn is_internal(test_types: &[String], target_type: &str) -> bool {
    has(test_types, TestType::WhiteBox) || target_type == TargetType::InternalNetwork.as_str()
}

/// Social engineering methodology, or people as the target.
pub fn is_social(test_types: &[String], target_type: &str) -> bool {
    has(test_types, TestType::SocialEng) || target_type == TargetType::People.as_str()
}

/// Snapshot of the three visibility predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionVisibility {
    pub external: bool,
    pub internal: bool,
    pub social: bool,
}

impl SectionVisibility {
    pub fn of(values: &SubmissionCandidate) -> Self {
        let (types, target) = (&values.test_types, values.target_type.as_str());
        Self {
            external: is_external(types, target),
            internal: is_internal(types, target),
            social: is_social(types, target),
        }
    }

    pub fn any(&self) -> bool {
        self.external || self.internal || self.social
    }

    /// Detail sections the details step must validate.
    pub fn detail_fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if self.external {
            fields.push(Field::ExternalDetails);
        }
        if self.internal {
            fields.push(Field::InternalDetails);
        }
        if self.social {
            fields.push(Field::SocialEngineeringDetails);
        }
        fields
    }
}

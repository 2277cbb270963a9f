//! Six-step intake wizard state machine.
//!
//! Steps advance strictly one at a time. `next` is gated on the fields the
//! current step owns; `back` never validates. The final step only allows
//! `submit`, which re-validates the whole record with the same schema the
//! server enforces.

pub mod form;
pub mod visibility;

use serde::Serialize;

use crate::models::submission::{
    NewSubmission, OwnerAwareness, SchedulingPreference, SubmissionCandidate, TargetType,
};
use crate::schema::{self, Field, ValidationErrors};

pub use form::{FieldUpdate, FormState};
pub use visibility::SectionVisibility;

/// Wizard pages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WizardStep {
    IntroAndType,
    Scope,
    Target,
    Details,
    Schedule,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::IntroAndType,
        WizardStep::Scope,
        WizardStep::Target,
        WizardStep::Details,
        WizardStep::Schedule,
        WizardStep::Review,
    ];

    /// 1-based position.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::IntroAndType => "Intro & Type",
            WizardStep::Scope => "Scope",
            WizardStep::Target => "Target",
            WizardStep::Details => "Details",
            WizardStep::Schedule => "Schedule",
            WizardStep::Review => "Review",
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self as usize + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Review
    }

    /// Share of the progress bar filled while this step is active.
    pub fn progress_percent(self) -> u8 {
        let last = Self::ALL.len() - 1;
        ((self as usize * 100) / last) as u8
    }

    /// Fields whose rules gate leaving this step, given the current answers.
    ///
    /// The review step owns every field; see [`Wizard::next`].
    pub fn owned_fields(self, values: &SubmissionCandidate) -> Vec<Field> {
        match self {
            WizardStep::IntroAndType => vec![Field::BusinessRequirement, Field::TestTypes],
            WizardStep::Scope => vec![
                Field::ScopeDescription,
                Field::OwnerAwareness,
                Field::InScopeAssets,
            ],
            WizardStep::Target => {
                let mut fields = vec![Field::TargetType, Field::IsProduction];
                if values.target_type == TargetType::Other.as_str() {
                    fields.push(Field::TargetOther);
                }
                fields
            }
            WizardStep::Details => SectionVisibility::of(values).detail_fields(),
            WizardStep::Schedule => {
                let mut fields = vec![
                    Field::SchedulingPreferences,
                    Field::ContactName,
                    Field::ContactEmail,
                ];
                if values.scheduling_preferences == SchedulingPreference::Other.as_str() {
                    fields.push(Field::SchedulingOther);
                }
                fields
            }
            WizardStep::Review => Field::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Rendered as a blocking alert, though it does not gate navigation.
    Critical,
    Caution,
}

/// Advisory shown next to a field. Warnings never prevent `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormWarning {
    OwnerNotAware,
    ProductionTarget,
}

impl FormWarning {
    pub fn message(self) -> &'static str {
        match self {
            FormWarning::OwnerNotAware => {
                "We cannot proceed without authorization from the system owner."
            }
            FormWarning::ProductionTarget => {
                "Warning: We will require a specific maintenance window for high-risk tests in production."
            }
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            FormWarning::OwnerNotAware => Severity::Critical,
            FormWarning::ProductionTarget => Severity::Caution,
        }
    }

    /// Step that displays the warning.
    pub fn step(self) -> WizardStep {
        match self {
            FormWarning::OwnerNotAware => WizardStep::Scope,
            FormWarning::ProductionTarget => WizardStep::Target,
        }
    }
}

/// One line of the review page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("form is invalid: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("submit is only available from the review step (currently on {0:?})")]
    NotAtReview(WizardStep),
}

/// Current step plus the latest form snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: WizardStep,
    form: FormState,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::with_form(FormState::default())
    }

    /// Start on the first step with pre-filled values.
    pub fn with_form(form: FormState) -> Self {
        Self {
            step: WizardStep::IntroAndType,
            form,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn progress_percent(&self) -> u8 {
        self.step.progress_percent()
    }

    /// Replace the snapshot with one that has `update` applied.
    pub fn apply(&mut self, update: FieldUpdate) {
        self.form = self.form.with(update);
    }

    pub fn visibility(&self) -> SectionVisibility {
        SectionVisibility::of(self.form.values())
    }

    /// Advance one step if the current step's fields are valid.
    ///
    /// On failure the step is unchanged. On the review step a successful
    /// call validates the full record and stays put; use [`Wizard::submit`].
    pub fn next(&mut self) -> Result<WizardStep, ValidationErrors> {
        if self.step.is_terminal() {
            schema::validate(&self.outgoing())?;
            return Ok(self.step);
        }

        let fields = self.step.owned_fields(self.form.values());
        if let Err(errors) = schema::validate_fields(self.form.values(), &fields) {
            tracing::debug!(step = ?self.step, errors = errors.len(), "Wizard step blocked");
            return Err(errors);
        }

        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step. Never validates; a no-op on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Build the record to send. Only available from the review step.
    ///
    /// Detail sections that are not currently visible are dropped, so stale
    /// answers from a branch the user backed out of are never submitted.
    pub fn submit(&self) -> Result<NewSubmission, WizardError> {
        if !self.step.is_terminal() {
            return Err(WizardError::NotAtReview(self.step));
        }
        Ok(schema::validate(&self.outgoing())?)
    }

    /// Advisories for the current answers.
    pub fn warnings(&self) -> Vec<FormWarning> {
        let values = self.form.values();
        let mut warnings = Vec::new();
        if values.owner_awareness == OwnerAwareness::NotAware.as_str() {
            warnings.push(FormWarning::OwnerNotAware);
        }
        if values.is_production == Some(true) {
            warnings.push(FormWarning::ProductionTarget);
        }
        warnings
    }

    /// Summary rows shown on the review step.
    pub fn review(&self) -> Vec<ReviewRow> {
        let v = self.form.values();
        let row = |label, value: String| ReviewRow { label, value };
        vec![
            row("Contact", format!("{} ({})", v.contact_name, v.contact_email)),
            row("Business Goal", v.business_requirement.clone()),
            row("Test Types", v.test_types.join(", ")),
            row("Target", v.target_type.clone()),
            row(
                "Production?",
                if v.is_production == Some(true) { "YES" } else { "No" }.to_string(),
            ),
            row("Scope", v.scope_description.clone()),
            row("Schedule", v.scheduling_preferences.clone()),
        ]
    }

    /// Candidate as it would be posted: hidden detail sections removed.
    fn outgoing(&self) -> SubmissionCandidate {
        let mut values = self.form.values().clone();
        let visible = SectionVisibility::of(&values);
        if !visible.external {
            values.external_details = None;
        }
        if !visible.internal {
            values.internal_details = None;
        }
        if !visible.social {
            values.social_engineering_details = None;
        }
        values
    }
}

//! Drives the wizard end to end and hands its record to the service.

use std::sync::Arc;

use pentest_intake::models::submission::{
    ExternalDetails, InternalDetails, SocialEngineeringDetails, TargetType, TestType,
};
use pentest_intake::notify::Notifier;
use pentest_intake::services::submission;
use pentest_intake::store::{MemorySubmissionStore, SubmissionStore};
use pentest_intake::wizard::{FieldUpdate, FormWarning, Wizard, WizardError, WizardStep};

fn fill_jane_doe(wizard: &mut Wizard) {
    for update in [
        FieldUpdate::BusinessRequirement("proactive".to_string()),
        FieldUpdate::ToggleTestType("black_box".to_string()),
        FieldUpdate::ScopeDescription("Test our external perimeter".to_string()),
        FieldUpdate::OwnerAwareness("true".to_string()),
        FieldUpdate::InScopeAssets("example.com".to_string()),
        FieldUpdate::TargetType("website".to_string()),
        FieldUpdate::IsProduction(false),
        FieldUpdate::SchedulingPreferences("business_hours".to_string()),
        FieldUpdate::ContactName("Jane Doe".to_string()),
        FieldUpdate::ContactEmail("jane@example.com".to_string()),
    ] {
        wizard.apply(update);
    }
}

#[tokio::test]
async fn external_website_request_is_stored() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);

    let visible = wizard.visibility();
    assert!(visible.external);
    assert!(!visible.internal);
    assert!(!visible.social);

    let mut steps = vec![wizard.step()];
    while !wizard.step().is_terminal() {
        steps.push(wizard.next().unwrap());
    }
    assert_eq!(steps, WizardStep::ALL.to_vec());
    assert_eq!(wizard.progress_percent(), 100);
    assert!(wizard.warnings().is_empty());

    let record = wizard.submit().unwrap();
    assert_eq!(record.test_types, vec![TestType::BlackBox]);
    assert_eq!(record.target_type, TargetType::Website);
    assert!(record.internal_details.is_none());
    assert!(record.social_engineering_details.is_none());

    let store = Arc::new(MemorySubmissionStore::new());
    let (notifier, _failures) = Notifier::new(Vec::new());
    let stored = submission::create(store.as_ref(), &notifier, &record)
        .await
        .unwrap();
    assert_eq!(stored.request, record);
    assert_eq!(store.list_all().await.unwrap(), vec![stored]);
}

#[test]
fn other_target_without_description_blocks_target_step() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.apply(FieldUpdate::TargetType("other".to_string()));

    wizard.next().unwrap();
    wizard.next().unwrap();
    assert_eq!(wizard.step(), WizardStep::Target);

    let errors = wizard.next().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.get("targetOther").is_some());
    assert_eq!(wizard.step(), WizardStep::Target);

    wizard.apply(FieldUpdate::TargetOther("Badge readers".to_string()));
    assert_eq!(wizard.next().unwrap(), WizardStep::Details);
}

#[test]
fn invalid_visible_section_blocks_details_step() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.apply(FieldUpdate::ToggleTestType("social_eng".to_string()));
    wizard.apply(FieldUpdate::SocialEngineeringDetails(SocialEngineeringDetails {
        employee_count: Some(0),
        campaign_types: vec!["phishing".to_string()],
    }));

    while wizard.step() != WizardStep::Details {
        wizard.next().unwrap();
    }
    assert!(wizard.visibility().social);

    let errors = wizard.next().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("socialEngineeringDetails.employeeCount").unwrap().message,
        "Must be at least 1"
    );
    assert_eq!(wizard.step(), WizardStep::Details);

    wizard.apply(FieldUpdate::SocialEngineeringDetails(SocialEngineeringDetails {
        employee_count: Some(25),
        campaign_types: vec!["phishing".to_string()],
    }));
    assert_eq!(wizard.next().unwrap(), WizardStep::Schedule);
}

#[test]
fn other_schedule_without_description_blocks_schedule_step() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.apply(FieldUpdate::SchedulingPreferences("other".to_string()));

    while wizard.step() != WizardStep::Schedule {
        wizard.next().unwrap();
    }

    let errors = wizard.next().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.get("schedulingOther").is_some());
    assert_eq!(wizard.step(), WizardStep::Schedule);

    wizard.apply(FieldUpdate::SchedulingOther("Only during the freeze window".to_string()));
    assert_eq!(wizard.next().unwrap(), WizardStep::Review);
}

#[test]
fn backing_out_of_a_branch_drops_its_details() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.apply(FieldUpdate::ToggleTestType("white_box".to_string()));
    wizard.apply(FieldUpdate::InternalDetails(InternalDetails {
        internal_ip_count: Some(64),
        ..Default::default()
    }));
    wizard.apply(FieldUpdate::ExternalDetails(ExternalDetails {
        web_app_count: Some(1),
        ..Default::default()
    }));

    while wizard.step() != WizardStep::Details {
        wizard.next().unwrap();
    }
    assert!(wizard.visibility().internal);

    // Back to step one and uncheck white box.
    while wizard.step() != WizardStep::IntroAndType {
        wizard.back();
    }
    wizard.apply(FieldUpdate::ToggleTestType("white_box".to_string()));
    while !wizard.step().is_terminal() {
        wizard.next().unwrap();
    }

    let record = wizard.submit().unwrap();
    assert!(record.internal_details.is_none());
    assert_eq!(
        record.external_details.and_then(|d| d.web_app_count),
        Some(1)
    );
}

#[test]
fn submit_before_review_is_refused() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.next().unwrap();

    match wizard.submit() {
        Err(WizardError::NotAtReview(step)) => assert_eq!(step, WizardStep::Scope),
        other => panic!("expected NotAtReview, got {other:?}"),
    }
}

#[test]
fn unaware_owner_and_production_are_flagged_not_blocked() {
    let mut wizard = Wizard::new();
    fill_jane_doe(&mut wizard);
    wizard.apply(FieldUpdate::OwnerAwareness("false".to_string()));
    wizard.apply(FieldUpdate::IsProduction(true));

    assert_eq!(
        wizard.warnings(),
        vec![FormWarning::OwnerNotAware, FormWarning::ProductionTarget]
    );
    while !wizard.step().is_terminal() {
        wizard.next().unwrap();
    }
    assert!(wizard.submit().unwrap().is_production);
}

//! Seed script for development: populates the submissions table with
//! sample requests, each driven through the intake wizard.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Does nothing if submissions exist.

use anyhow::Context;
use pentest_intake::models::submission::{
    ExternalDetails, InternalDetails, SocialEngineeringDetails,
};
use pentest_intake::store::{PgSubmissionStore, SubmissionStore};
use pentest_intake::wizard::{FieldUpdate, Wizard};
use pentest_intake::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::create_pool(&db_url, 5).await?;
    db::migrate(&pool).await?;

    println!("=== Pentest Intake Seed Script ===");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        println!("[skip] {count} submissions already present");
        return Ok(());
    }

    let store = PgSubmissionStore::new(pool);
    for (label, updates) in samples() {
        let mut wizard = Wizard::new();
        for update in updates {
            wizard.apply(update);
        }
        while !wizard.step().is_terminal() {
            wizard
                .next()
                .map_err(|e| anyhow::anyhow!("{label}: {e}"))?;
        }
        let record = wizard
            .submit()
            .map_err(|e| anyhow::anyhow!("{label}: {e}"))?;
        let stored = store.insert(&record).await?;
        let warnings = wizard.warnings().len();
        println!("[done] #{} {label} ({warnings} warning(s))", stored.id);
    }

    println!("\n=== Seed complete! ===");
    Ok(())
}

fn contact(name: &str, email: &str) -> [FieldUpdate; 2] {
    [
        FieldUpdate::ContactName(name.to_string()),
        FieldUpdate::ContactEmail(email.to_string()),
    ]
}

fn samples() -> Vec<(&'static str, Vec<FieldUpdate>)> {
    let mut website = vec![
        FieldUpdate::BusinessRequirement("proactive".to_string()),
        FieldUpdate::ToggleTestType("black_box".to_string()),
        FieldUpdate::ScopeDescription("Annual external assessment of the marketing site".to_string()),
        FieldUpdate::OwnerAwareness("true".to_string()),
        FieldUpdate::InScopeAssets("www.example.com\napi.example.com".to_string()),
        FieldUpdate::TargetType("website".to_string()),
        FieldUpdate::ExternalDetails(ExternalDetails {
            hosting_provider: Some("AWS".to_string()),
            cloud_infrastructure: Some("CloudFront, ALB".to_string()),
            web_app_count: Some(2),
            mobile_app_count: Some(0),
        }),
        FieldUpdate::SchedulingPreferences("business_hours".to_string()),
    ];
    website.extend(contact("Jane Doe", "jane@example.com"));

    let mut network = vec![
        FieldUpdate::BusinessRequirement("regulatory".to_string()),
        FieldUpdate::ToggleTestType("gray_box".to_string()),
        FieldUpdate::ToggleTestType("wireless".to_string()),
        FieldUpdate::ScopeDescription("PCI segmentation test of the office network".to_string()),
        FieldUpdate::OwnerAwareness("true".to_string()),
        FieldUpdate::InScopeAssets("10.0.0.0/24\n10.0.1.0/24".to_string()),
        FieldUpdate::TargetType("internal_network".to_string()),
        FieldUpdate::IsProduction(true),
        FieldUpdate::InternalDetails(InternalDetails {
            internal_ip_count: Some(512),
            desktop_app_count: Some(3),
            internal_web_app_count: Some(5),
            wireless_network_count: Some(2),
            wireless_box_type: Some("ship".to_string()),
        }),
        FieldUpdate::SchedulingPreferences("after_hours".to_string()),
    ];
    network.extend(contact("Sam Patel", "sam.patel@example.com"));

    let mut phishing = vec![
        FieldUpdate::BusinessRequirement("incident".to_string()),
        FieldUpdate::ToggleTestType("social_eng".to_string()),
        FieldUpdate::ScopeDescription("Follow-up phishing campaign after credential leak".to_string()),
        FieldUpdate::OwnerAwareness("false".to_string()),
        FieldUpdate::InScopeAssets("Finance department staff".to_string()),
        FieldUpdate::TargetType("people".to_string()),
        FieldUpdate::SocialEngineeringDetails(SocialEngineeringDetails {
            employee_count: Some(40),
            campaign_types: vec!["phishing".to_string(), "vishing".to_string()],
        }),
        FieldUpdate::SchedulingPreferences("other".to_string()),
        FieldUpdate::SchedulingOther("Avoid the last week of the quarter".to_string()),
    ];
    phishing.extend(contact("Alex Kim", "alex.kim@example.com"));

    vec![
        ("external website review", website),
        ("internal network segmentation", network),
        ("phishing campaign", phishing),
    ]
}

use crate::models::submission::Submission;

pub const SUMMARY_TITLE: &str = "New Penetration Test Request";

/// Human-readable digest of a stored submission, shared by every sink.
pub fn format_summary(submission: &Submission) -> String {
    let r = &submission.request;
    let test_types: Vec<&str> = r.test_types.iter().map(|t| t.as_str()).collect();
    let target = match &r.target_other {
        Some(other) => format!("{} ({other})", r.target_type),
        None => r.target_type.to_string(),
    };
    let assets: Vec<&str> = r.asset_lines().collect();

    format!(
        "{SUMMARY_TITLE}\n\
         \n\
         Contact: {} ({})\n\
         Business Req: {}\n\
         Test Types: {}\n\
         Target Type: {target}\n\
         Production: {}\n\
         \n\
         Scope:\n\
         {}\n\
         \n\
         Assets:\n\
         {}",
        r.contact_name,
        r.contact_email,
        r.business_requirement,
        test_types.join(", "),
        if r.is_production { "YES" } else { "No" },
        r.scope_description.trim(),
        assets.join("\n"),
    )
}

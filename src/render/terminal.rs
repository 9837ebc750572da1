use colored::Colorize;

use super::wrap_text;
use crate::expert::Finding;

const RULE_WIDTH: usize = 40;
const SUMMARY_WIDTH: usize = 60;

pub fn format_query(query: &str) -> String {
    format!("\nQuery: {query}\n\n")
}

pub fn format_findings(findings: &[Finding]) -> String {
    findings.iter().map(format_finding).collect()
}

/// One expert as a block framed by horizontal rules. Absent fields are left out.
pub fn format_finding(finding: &Finding) -> String {
    let profile = &finding.profile;
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\n");

    if let Some(name) = &profile.name {
        out.push_str(&format!("Name: {}\n", name.as_str().bold()));
    }
    if let Some(affiliation) = &profile.affiliation {
        out.push_str(&format!("Affiliation: {affiliation}\n"));
    }
    if let Some(location) = &profile.location {
        out.push_str(&format!("Location: {location}\n"));
    }
    out.push_str(&format!("URL: {}\n", finding.url));

    if let Some(summary) = profile.summary.as_deref().filter(|s| !s.is_empty()) {
        out.push_str("\nSummary:\n");
        out.push_str(&wrap_text(summary, SUMMARY_WIDTH).join("\n"));
        out.push_str("\n\n");
    }

    let socials = profile
        .socials
        .as_ref()
        .map(|s| s.present())
        .unwrap_or_default();
    if !socials.is_empty() {
        out.push_str(&format!("{}\n", "Socials:".underline()));
        for (platform, value) in socials {
            out.push_str(&format!("{platform}: {value}\n"));
        }
    }

    out.push_str(&rule);
    out.push_str("\n\n");
    out
}

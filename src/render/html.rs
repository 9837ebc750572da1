use super::escape_html;
use crate::expert::{ExpertSearch, Finding};

pub const MIN_EXPERTS: u32 = 1;
pub const MAX_EXPERTS: u32 = 10;
pub const DEFAULT_EXPERTS: u32 = 5;

/// Current values of the search form, echoed back into the page.
#[derive(Debug, Clone, Copy)]
pub struct FormValues<'a> {
    pub question: &'a str,
    pub num_experts: u32,
}

impl Default for FormValues<'_> {
    fn default() -> Self {
        Self {
            question: "",
            num_experts: DEFAULT_EXPERTS,
        }
    }
}

pub fn render_form(form: &FormValues) -> String {
    build_page(&render_search_form(form))
}

pub fn render_results(form: &FormValues, search: &ExpertSearch) -> String {
    let mut content = render_search_form(form);
    content.push_str(&format!(
        "<p>Generated Search Query: <b>{}</b></p>\n",
        escape_html(&search.query)
    ));
    if search.findings.is_empty() {
        content.push_str("<p class=\"empty\">No experts found.</p>\n");
    }
    for finding in &search.findings {
        content.push_str(&render_finding(finding));
    }
    build_page(&content)
}

pub fn render_error(form: &FormValues, message: &str) -> String {
    let mut content = render_search_form(form);
    content.push_str(&format!(
        "<p class=\"error\">Search failed: {}</p>\n",
        escape_html(message)
    ));
    build_page(&content)
}

fn render_search_form(form: &FormValues) -> String {
    format!(
        r#"<form method="post" action="/search">
<label for="question">Enter your query (e.g., 'Find me Reinforcement Learning experts in Amsterdam'):</label>
<input type="text" id="question" name="question" value="{question}">
<label for="num_experts">Number of experts: <output id="num_experts_value">{num}</output></label>
<input type="range" id="num_experts" name="num_experts" min="{MIN_EXPERTS}" max="{MAX_EXPERTS}" value="{num}" oninput="num_experts_value.value = this.value">
<button type="submit">Search</button>
</form>
"#,
        question = escape_html(form.question),
        num = form.num_experts,
    )
}

/// One expert as a titled section followed by a horizontal rule.
fn render_finding(finding: &Finding) -> String {
    let profile = &finding.profile;
    let url = escape_html(&finding.url);
    let title = profile
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| url.clone());

    let mut out = format!("<section class=\"expert\">\n<h3>{title}</h3>\n");
    for (label, value) in [
        ("Name", &profile.name),
        ("Affiliation", &profile.affiliation),
        ("Location", &profile.location),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(
                "<p><strong>{label}:</strong> {}</p>\n",
                escape_html(value)
            ));
        }
    }
    out.push_str(&format!(
        "<p><strong>URL:</strong> <a href=\"{url}\">{url}</a></p>\n"
    ));
    if let Some(summary) = profile.summary.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!(
            "<p><strong>Summary:</strong> {}</p>\n",
            escape_html(summary)
        ));
    }

    let socials = profile
        .socials
        .as_ref()
        .map(|s| s.present())
        .unwrap_or_default();
    if !socials.is_empty() {
        out.push_str("<p>Socials:</p>\n<ul class=\"socials\">\n");
        for (platform, value) in socials {
            out.push_str(&format!(
                "<li><strong>{platform}:</strong> {}</li>\n",
                escape_html(value)
            ));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</section>\n<hr>\n");
    out
}

fn build_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Expert Finder</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;max-width:760px;margin:0 auto;padding:24px;}}
form{{display:flex;flex-direction:column;gap:8px;margin-bottom:24px;}}
input[type=text]{{padding:8px;font-size:15px;}}
button{{align-self:flex-start;padding:8px 20px;}}
.expert h3{{margin-bottom:4px;}}
.error{{color:#c62828;}}
.empty{{color:#888;}}
</style>
</head>
<body>
<h1>Expert Finder</h1>
{content}</body>
</html>
"#
    )
}

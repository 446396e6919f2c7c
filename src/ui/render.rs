//! HTML rendering shared by both front-ends

use crate::types::feature::{Feature, FormSection};
use crate::types::patient::MAX_AGE;
use crate::types::prediction::RiskAssessment;
use crate::ui::form::{FormState, FORM_MIN_AGE};
use crate::ui::UiError;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 760px; margin: 0 auto; padding: 24px; color: #222; }
.main_header { font-size: 40px; font-weight: bold; color: #e63946; text-align: center; margin-bottom: 20px; }
.caption { text-align: center; color: #666; font-size: 14px; }
.columns { display: flex; gap: 32px; }
.columns > div { flex: 1; }
label.check { display: block; margin: 6px 0; }
input[type=number] { width: 100%; padding: 6px; font-size: 16px; }
button { width: 100%; padding: 12px; font-size: 18px; margin-top: 12px; cursor: pointer; }
button:disabled { cursor: not-allowed; }
.result-box-safe { background-color: #d4edda; color: #155724; padding: 20px; border-radius: 10px; text-align: center; margin-top: 20px; font-size: 24px; font-weight: bold; }
.result-box-risk { background-color: #f8d7da; color: #721c24; padding: 20px; border-radius: 10px; text-align: center; margin-top: 20px; font-size: 24px; font-weight: bold; }
.note { padding: 12px 16px; border-radius: 6px; margin-top: 16px; }
.note-warning { background: #fff3cd; color: #856404; }
.note-success { background: #d4edda; color: #155724; }
.note-error { background: #f8d7da; color: #721c24; }
.note-info { background: #d1ecf1; color: #0c5460; }
"#;

/// Inputs for one full page render.
pub struct Page<'a> {
    /// Caption under the header naming the backend
    pub caption: &'a str,
    /// Persistent error shown above the form (e.g. artifacts failed to load)
    pub banner: Option<&'a str>,
    pub form: &'a FormState,
    pub prediction_enabled: bool,
    /// Result of the submission being answered, if any
    pub outcome: Option<&'a Result<RiskAssessment, UiError>>,
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Result box and follow-up advice for a successful assessment.
pub fn render_result(assessment: &RiskAssessment) -> String {
    let probability = format!("{:.1}%", assessment.percentage());
    if assessment.is_at_risk() {
        format!(
            "<div class='result-box-risk'>Result: High Risk ⚠️<br>\
             <span style='font-size:18px'>Probability: {probability}</span></div>\n\
             <div class='note note-warning'>Your inputs suggest patterns often found in \
             high-risk patients. Please consult a medical professional immediately.</div>"
        )
    } else {
        format!(
            "<div class='result-box-safe'>Result: Low Risk ✅<br>\
             <span style='font-size:18px'>Probability: {probability}</span></div>\n\
             <div class='note note-success'>Your inputs align with lower risk profiles. \
             Maintain a healthy lifestyle!</div>"
        )
    }
}

/// Message box for a failed submission.
pub fn render_error(error: &UiError) -> String {
    let class = match error {
        UiError::Unreachable { .. } | UiError::Timeout { .. } => "note-info",
        _ => "note-error",
    };
    format!(
        "<div class='note {class}'>{}</div>",
        escape_html(&error.to_string())
    )
}

fn render_checkbox(out: &mut String, form: &FormState, feature: Feature) {
    let checked = if form.is_checked(feature) { " checked" } else { "" };
    let _ = writeln!(
        out,
        "<label class='check' title='{help}'><input type='checkbox' name='{name}' value='on'{checked}> {label}</label>",
        help = escape_html(feature.help()),
        name = feature.api_name(),
        label = escape_html(feature.label()),
    );
}

fn render_section(out: &mut String, form: &FormState, section: FormSection) {
    let _ = writeln!(out, "<p><strong>{}</strong></p>", section.title());
    for feature in Feature::indicators().filter(|f| f.section() == section) {
        render_checkbox(out, form, feature);
    }
}

/// Full HTML page: header, form (pre-filled from `form`) and outcome.
pub fn render_page(page: &Page<'_>) -> String {
    let mut body = String::new();

    let _ = writeln!(body, "<p class='main_header'>Heart &amp; Stroke Health Check</p>");
    let _ = writeln!(body, "<p class='caption'>{}</p>", escape_html(page.caption));
    let _ = writeln!(
        body,
        "<p>Please answer the following questions to assess your potential risk factor.</p>"
    );
    if let Some(banner) = page.banner {
        let _ = writeln!(body, "<div class='note note-error'>{}</div>", escape_html(banner));
    }

    let _ = writeln!(body, "<form method='post' action='/'>");
    let _ = writeln!(
        body,
        "<h3>👤 {}</h3>\n<label title='{}'>{}<input type='number' name='{}' min='{}' max='{}' step='1' value='{}' required></label>\n<hr>",
        FormSection::Demographics.title(),
        escape_html(Feature::Age.help()),
        Feature::Age.label(),
        Feature::Age.api_name(),
        FORM_MIN_AGE,
        MAX_AGE,
        escape_html(&page.form.age),
    );

    let _ = writeln!(body, "<h3>🏥 Symptoms &amp; History</h3>\n<div class='columns'>");
    let (left, right) = FormSection::SYMPTOM_SECTIONS.split_at(2);
    for column in [left, right] {
        let _ = writeln!(body, "<div>");
        for &section in column {
            render_section(&mut body, page.form, section);
        }
        let _ = writeln!(body, "</div>");
    }
    let _ = writeln!(body, "</div>\n<hr>");

    let disabled = if page.prediction_enabled { "" } else { " disabled" };
    let _ = writeln!(body, "<button type='submit'{disabled}>Analyze Risk</button>\n</form>");

    match page.outcome {
        Some(Ok(assessment)) => body.push_str(&render_result(assessment)),
        Some(Err(error)) => body.push_str(&render_error(error)),
        None => {}
    }

    format!(
        "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n\
         <title>Stroke Risk Predictor</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n"
    )
}

//! Preview markup: the resume as the editor's preview panel shows it.

use std::fmt::Write;

use crate::models::resume::ResumeContent;
use crate::models::template::TemplateDescriptor;
use crate::render::Markup;

const LIST_ITEM_CLASS: &str = "text-gray-700";
const SKILL_CHIP_CLASS: &str = "px-3 py-1 bg-gray-100 rounded-full text-sm text-gray-700";

/// Builds the preview fragment. All user text is escaped; no other transformation is applied.
pub fn render_markup(content: &ResumeContent, template: &TemplateDescriptor) -> Markup {
    let mut out = String::with_capacity(2048);

    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        r#"<div class="{} shadow-lg rounded-lg p-8 max-w-[800px] mx-auto">"#,
        escape_html(template.style().class())
    );
    let _ = write!(
        out,
        r#"<h1 class="text-3xl font-bold mb-2">{}</h1>"#,
        escape_html(&content.name)
    );
    let _ = write!(
        out,
        r#"<p class="text-xl text-gray-600 mb-4">{}</p>"#,
        escape_html(&content.title)
    );
    let _ = write!(
        out,
        r#"<div class="flex gap-4 text-sm text-gray-600 mb-6"><span>{}</span><span>{}</span></div>"#,
        escape_html(&content.email),
        escape_html(&content.phone)
    );

    out.push_str(r#"<div class="mb-6">"#);
    push_heading(&mut out, "Summary");
    let _ = write!(
        out,
        r#"<p class="text-gray-700">{}</p>"#,
        escape_html(&content.summary)
    );
    out.push_str("</div>");

    push_list_section(&mut out, "Experience", &content.experience);
    push_list_section(&mut out, "Education", &content.education);

    out.push_str("<div>");
    push_heading(&mut out, "Skills");
    out.push_str(r#"<div class="flex flex-wrap gap-2">"#);
    for skill in &content.skills {
        let _ = write!(
            out,
            r#"<span class="{SKILL_CHIP_CLASS}">{}</span>"#,
            escape_html(skill)
        );
    }
    out.push_str("</div></div>");

    out.push_str("</div>");
    Markup::new(out)
}

fn push_heading(out: &mut String, heading: &str) {
    let _ = write!(
        out,
        r#"<h2 class="text-xl font-semibold mb-2">{heading}</h2>"#
    );
}

fn push_list_section(out: &mut String, heading: &str, entries: &[String]) {
    out.push_str(r#"<div class="mb-6">"#);
    push_heading(out, heading);
    out.push_str(r#"<ul class="list-disc list-inside space-y-2">"#);
    for entry in entries {
        let _ = write!(
            out,
            r#"<li class="{LIST_ITEM_CLASS}">{}</li>"#,
            escape_html(entry)
        );
    }
    out.push_str("</ul></div>");
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

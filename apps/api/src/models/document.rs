//! The Resume Document consumed by the layout engine.
//!
//! Stored resumes come from a form builder and are loosely typed: any text
//! field may hold a number, a list or nothing at all. Text fields are kept as
//! raw JSON (`TextField`) and converted by the sanitizer at render time, so a
//! bad field degrades to blank text instead of rejecting the whole document.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::layout::sanitize::{sanitize_text, sanitize_value, warn_non_string};

// ────────────────────────────────────────────────────────────────────────────
// Lenient text
// ────────────────────────────────────────────────────────────────────────────

/// A text field that accepts any JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextField(pub Value);

impl TextField {
    /// Sanitized text; non-string values yield `""`.
    pub fn text(&self) -> String {
        sanitize_value(&self.0)
    }

    /// Raw string content before sanitization, for the bullet formatter.
    /// Non-string values degrade to `""` the same way `text` does.
    pub fn raw(&self) -> &str {
        match &self.0 {
            Value::String(s) => s,
            other => {
                warn_non_string(other);
                ""
            }
        }
    }

    /// Items of a list-valued field. A JSON array yields its non-blank string
    /// elements; a string is split on commas.
    pub fn items(&self) -> Vec<String> {
        match &self.0 {
            Value::Array(values) => values
                .iter()
                .map(sanitize_value)
                .filter(|s| !s.is_empty())
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(sanitize_text)
                .filter(|s| !s.is_empty())
                .collect(),
            other => {
                warn_non_string(other);
                Vec::new()
            }
        }
    }

    /// A list or a string, normalized to one `", "`-joined string.
    pub fn joined(&self) -> String {
        match &self.0 {
            Value::Array(_) => self.items().join(", "),
            _ => self.text(),
        }
    }
}

impl From<&str> for TextField {
    fn from(s: &str) -> Self {
        TextField(Value::String(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Section kinds that have a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    pub const DEFAULT_ORDER: [SectionKind; 6] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "summary" => Some(SectionKind::Summary),
            "experience" => Some(SectionKind::Experience),
            "education" => Some(SectionKind::Education),
            "skills" => Some(SectionKind::Skills),
            "projects" => Some(SectionKind::Projects),
            "certifications" => Some(SectionKind::Certifications),
            _ => None,
        }
    }

    /// Heading drawn above the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(alias = "fullName")]
    pub full_name: TextField,
    pub email: TextField,
    pub phone: TextField,
    pub location: TextField,
    pub linkedin: TextField,
    pub website: TextField,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: TextField,
    pub company: TextField,
    pub duration: TextField,
    #[serde(alias = "startDate")]
    pub start_date: TextField,
    #[serde(alias = "endDate")]
    pub end_date: TextField,
    #[serde(deserialize_with = "lenient_bool")]
    pub current: bool,
    pub description: TextField,
}

impl ExperienceEntry {
    /// The stored duration, or one derived from the start/end dates.
    pub fn duration_text(&self) -> String {
        let duration = self.duration.text();
        if !duration.is_empty() {
            return duration;
        }
        let start = format_date(&self.start_date.text());
        if start.is_empty() {
            return String::new();
        }
        let end = format_date(&self.end_date.text());
        if self.current || end.is_empty() {
            format!("{start} - Present")
        } else {
            format!("{start} - {end}")
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: TextField,
    pub school: TextField,
    pub year: TextField,
    #[serde(alias = "graduationDate")]
    pub graduation_date: TextField,
}

impl EducationEntry {
    pub fn year_text(&self) -> String {
        let year = self.year.text();
        if year.is_empty() {
            format_date(&self.graduation_date.text())
        } else {
            year
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: TextField,
    pub description: TextField,
    pub technologies: TextField,
    pub url: TextField,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: TextField,
    pub issuer: TextField,
    pub date: TextField,
    pub url: TextField,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    #[serde(alias = "personalInfo")]
    pub personal_info: Option<PersonalInfo>,
    pub summary: TextField,
    #[serde(deserialize_with = "null_as_empty")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub certifications: Vec<CertificationEntry>,
    pub skills: TextField,
    #[serde(deserialize_with = "section_ids")]
    pub sections: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Resume is missing required field '{0}'")]
    MissingField(&'static str),
}

impl ResumeDocument {
    /// Checks the fields layout cannot proceed without.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.personal_info.is_none() {
            return Err(DocumentError::MissingField("personal_info"));
        }
        Ok(())
    }

    /// Sections to render, in order. Unknown identifiers are skipped and
    /// repeats collapse to their first occurrence. An empty list means the default order.
    pub fn section_order(&self) -> Vec<SectionKind> {
        if self.sections.is_empty() {
            return SectionKind::DEFAULT_ORDER.to_vec();
        }
        let mut order = Vec::with_capacity(self.sections.len());
        for id in &self.sections {
            match SectionKind::from_id(id) {
                Some(kind) if !order.contains(&kind) => order.push(kind),
                Some(_) => {}
                None => debug!(section = %id, "Skipping section without a renderer"),
            }
        }
        order
    }
}

/// Formats `YYYY-MM-DD` and `YYYY-MM` as `Mon YYYY`; other text passes through.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `true`, or the string `"true"` in any case. Anything else, including
/// `null`, reads as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Section identifiers; entries that are not strings are dropped.
fn section_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!(value = %other, "Ignoring non-list sections field");
            return Ok(Vec::new());
        }
    };
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(id) => Some(id),
            other => {
                debug!(section = %other, "Skipping non-string section id");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_camel_case_builder_json_deserializes() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Ada Lovelace", "email": "ada@example.com" },
            "experience": [{ "title": "Engineer", "startDate": "2021-03", "current": true }],
            "education": [{ "degree": "BSc", "graduationDate": "2019-06-15" }],
            "sections": ["experience", "education"]
        }))
        .unwrap();

        let info = doc.personal_info.as_ref().unwrap();
        assert_eq!(info.full_name.text(), "Ada Lovelace");
        assert_eq!(doc.experience[0].duration_text(), "Mar 2021 - Present");
        assert_eq!(doc.education[0].year_text(), "Jun 2019");
    }

    #[test]
    fn test_non_string_fields_degrade_to_blank() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personal_info": { "full_name": 42, "phone": null },
            "summary": { "nested": true },
        }))
        .unwrap();
        let info = doc.personal_info.unwrap();
        assert_eq!(info.full_name.text(), "");
        assert_eq!(info.phone.text(), "");
        assert_eq!(doc.summary.text(), "");
    }

    #[test]
    fn test_null_collections_are_empty() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personal_info": {},
            "experience": null,
            "sections": null
        }))
        .unwrap();
        assert!(doc.experience.is_empty());
        assert_eq!(doc.section_order(), SectionKind::DEFAULT_ORDER.to_vec());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Number of degrade warnings emitted while `f` runs.
    fn degrade_warnings(f: impl FnOnce()) -> usize {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        output.matches("Non-string value in text field").count()
    }

    #[test]
    fn test_degrade_warning_skips_null_fields() {
        assert_eq!(degrade_warnings(|| assert_eq!(TextField(Value::Null).raw(), "")), 0);
        assert_eq!(
            degrade_warnings(|| assert!(TextField(Value::Null).items().is_empty())),
            0
        );
        assert_eq!(degrade_warnings(|| assert_eq!(TextField(json!(42)).raw(), "")), 1);
        assert_eq!(
            degrade_warnings(|| assert!(TextField(json!({ "a": 1 })).items().is_empty())),
            1
        );
    }

    #[test]
    fn test_current_flag_is_lenient() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personal_info": { "full_name": "Ada" },
            "experience": [
                { "title": "A", "start_date": "2020-01", "end_date": "2021-01", "current": null },
                { "title": "B", "start_date": "2021-02", "end_date": "2022-01", "current": "true" },
                { "title": "C", "current": 1 },
                { "title": "D" }
            ]
        }))
        .unwrap();
        let flags: Vec<bool> = doc.experience.iter().map(|e| e.current).collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert_eq!(doc.experience[0].duration_text(), "Jan 2020 - Jan 2021");
        assert_eq!(doc.experience[1].duration_text(), "Feb 2021 - Present");
    }

    #[test]
    fn test_non_string_section_ids_are_skipped() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personal_info": { "full_name": "Ada" },
            "sections": ["summary", 3, null, "skills"]
        }))
        .unwrap();
        assert_eq!(
            doc.section_order(),
            vec![SectionKind::Summary, SectionKind::Skills]
        );

        let doc: ResumeDocument = serde_json::from_value(json!({
            "personal_info": { "full_name": "Ada" },
            "sections": "summary"
        }))
        .unwrap();
        assert_eq!(doc.section_order(), SectionKind::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_validate_requires_personal_info() {
        let doc = ResumeDocument::default();
        assert_eq!(
            doc.validate(),
            Err(DocumentError::MissingField("personal_info"))
        );
    }

    #[test]
    fn test_section_order_skips_unknown_and_repeats() {
        let doc = ResumeDocument {
            sections: vec![
                "skills".into(),
                "hobbies".into(),
                "Summary".into(),
                "skills".into(),
            ],
            ..Default::default()
        };
        assert_eq!(
            doc.section_order(),
            vec![SectionKind::Skills, SectionKind::Summary]
        );
    }

    #[test]
    fn test_duration_prefers_stored_value() {
        let entry = ExperienceEntry {
            duration: "2 years".into(),
            start_date: "2020-01".into(),
            ..Default::default()
        };
        assert_eq!(entry.duration_text(), "2 years");

        let entry = ExperienceEntry {
            start_date: "2018-02".into(),
            end_date: "2020-11-30".into(),
            ..Default::default()
        };
        assert_eq!(entry.duration_text(), "Feb 2018 - Nov 2020");
        assert_eq!(ExperienceEntry::default().duration_text(), "");
    }

    #[test]
    fn test_technologies_list_or_string() {
        let list = TextField(json!(["Rust", 7, "Tokio", ""]));
        assert_eq!(list.joined(), "Rust, Tokio");
        let text = TextField::from("Rust, Tokio");
        assert_eq!(text.joined(), "Rust, Tokio");
    }

    #[test]
    fn test_skills_items_from_string_or_list() {
        assert_eq!(TextField::from("Go, Rust ,").items(), vec!["Go", "Rust"]);
        assert_eq!(TextField(json!(["Go"])).items(), vec!["Go"]);
        assert!(TextField(json!(3)).items().is_empty());
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("Summer 2019"), "Summer 2019");
        assert_eq!(format_date(""), "");
    }
}

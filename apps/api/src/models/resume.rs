#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used both to split the skills input and to re-join it for display.
pub const SKILL_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' expects {expected}")]
    FieldKind {
        field: ResumeField,
        expected: &'static str,
    },

    #[error("Index {index} is out of range for {section} (length {len})")]
    IndexOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Resume content
// ────────────────────────────────────────────────────────────────────────────

/// The editable resume held by one editor session.
///
/// Every mutation replaces a whole field. Sequence fields keep insertion order,
/// which is also display order in every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
}

impl Default for ResumeContent {
    /// Sample content shown when the editor opens, so the preview always has something to render.
    fn default() -> Self {
        ResumeContent {
            name: "John Doe".to_string(),
            title: "Software Engineer".to_string(),
            email: "john@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            summary:
                "Experienced software engineer with a passion for building scalable applications."
                    .to_string(),
            experience: vec![
                "Senior Software Engineer at Tech Corp (2020-Present)".to_string(),
                "Software Developer at StartUp Inc (2018-2020)".to_string(),
            ],
            education: vec![
                "MS in Computer Science, State University (2018)".to_string(),
                "BS in Computer Science, Tech Institute (2016)".to_string(),
            ],
            skills: ["JavaScript", "React", "Node.js", "Python", "AWS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ResumeContent {
    /// An empty form: every scalar blank, one empty row per list section.
    pub fn blank() -> Self {
        ResumeContent {
            name: String::new(),
            title: String::new(),
            email: String::new(),
            phone: String::new(),
            summary: String::new(),
            experience: vec![String::new()],
            education: vec![String::new()],
            skills: Vec::new(),
        }
    }

    /// Replaces one field wholesale.
    pub fn set_field(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.name = v,
            FieldUpdate::Title(v) => self.title = v,
            FieldUpdate::Email(v) => self.email = v,
            FieldUpdate::Phone(v) => self.phone = v,
            FieldUpdate::Summary(v) => self.summary = v,
            FieldUpdate::Experience(v) => self.experience = v,
            FieldUpdate::Education(v) => self.education = v,
            FieldUpdate::Skills(v) => self.skills = v,
        }
    }

    /// Reads a field back in the same shape `set_field` accepts.
    pub fn field(&self, field: ResumeField) -> FieldValue {
        match field {
            ResumeField::Name => FieldValue::Text(self.name.clone()),
            ResumeField::Title => FieldValue::Text(self.title.clone()),
            ResumeField::Email => FieldValue::Text(self.email.clone()),
            ResumeField::Phone => FieldValue::Text(self.phone.clone()),
            ResumeField::Summary => FieldValue::Text(self.summary.clone()),
            ResumeField::Experience => FieldValue::List(self.experience.clone()),
            ResumeField::Education => FieldValue::List(self.education.clone()),
            ResumeField::Skills => FieldValue::List(self.skills.clone()),
        }
    }

    pub fn entries(&self, section: Section) -> &[String] {
        match section {
            Section::Experience => &self.experience,
            Section::Education => &self.education,
        }
    }

    /// Replaces the entry at `index` by rebuilding the section and applying it as a
    /// whole-field update. Out-of-range indices are rejected and leave the content untouched.
    pub fn set_entry_at(
        &mut self,
        section: Section,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let mut entries = self.entries(section).to_vec();
        let len = entries.len();
        let slot = entries.get_mut(index).ok_or(ModelError::IndexOutOfRange {
            section,
            index,
            len,
        })?;
        *slot = value.into();
        self.set_field(section.replace_with(entries));
        Ok(())
    }

    /// Appends an empty entry to the section.
    pub fn append_entry(&mut self, section: Section) {
        let mut entries = self.entries(section).to_vec();
        entries.push(String::new());
        self.set_field(section.replace_with(entries));
    }

    pub fn set_experience_at(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.set_entry_at(Section::Experience, index, value)
    }

    pub fn set_education_at(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.set_entry_at(Section::Education, index, value)
    }

    pub fn append_experience(&mut self) {
        self.append_entry(Section::Experience);
    }

    pub fn append_education(&mut self) {
        self.append_entry(Section::Education);
    }

    /// Splits on the exact `", "` separator with no trimming, so `"A,B"` stays one skill
    /// and an empty input yields a single empty skill.
    pub fn set_skills_from_text(&mut self, text: &str) {
        let skills = text.split(SKILL_SEPARATOR).map(str::to_string).collect();
        self.set_field(FieldUpdate::Skills(skills));
    }

    /// The skills as they appear in the editor's single text input.
    pub fn skills_text(&self) -> String {
        self.skills.join(SKILL_SEPARATOR)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field addressing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeField {
    Name,
    Title,
    Email,
    Phone,
    Summary,
    Experience,
    Education,
    Skills,
}

impl ResumeField {
    pub const ALL: [ResumeField; 8] = [
        ResumeField::Name,
        ResumeField::Title,
        ResumeField::Email,
        ResumeField::Phone,
        ResumeField::Summary,
        ResumeField::Experience,
        ResumeField::Education,
        ResumeField::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeField::Name => "name",
            ResumeField::Title => "title",
            ResumeField::Email => "email",
            ResumeField::Phone => "phone",
            ResumeField::Summary => "summary",
            ResumeField::Experience => "experience",
            ResumeField::Education => "education",
            ResumeField::Skills => "skills",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ResumeField::Experience | ResumeField::Education | ResumeField::Skills
        )
    }
}

impl fmt::Display for ResumeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResumeField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// The two list sections edited row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
}

impl Section {
    fn replace_with(self, entries: Vec<String>) -> FieldUpdate {
        match self {
            Section::Experience => FieldUpdate::Experience(entries),
            Section::Education => FieldUpdate::Education(entries),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Experience => f.write_str("experience"),
            Section::Education => f.write_str("education"),
        }
    }
}

impl FromStr for Section {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experience" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            other => Err(ModelError::UnknownField(other.to_string())),
        }
    }
}

/// A field value as it crosses the editor boundary: a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// A whole-field replacement. Constructing one is the only fallible step; applying it is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Title(String),
    Email(String),
    Phone(String),
    Summary(String),
    Experience(Vec<String>),
    Education(Vec<String>),
    Skills(Vec<String>),
}

impl FieldUpdate {
    pub fn from_value(field: ResumeField, value: FieldValue) -> Result<Self, ModelError> {
        let update = match (field, value) {
            (ResumeField::Name, FieldValue::Text(v)) => FieldUpdate::Name(v),
            (ResumeField::Title, FieldValue::Text(v)) => FieldUpdate::Title(v),
            (ResumeField::Email, FieldValue::Text(v)) => FieldUpdate::Email(v),
            (ResumeField::Phone, FieldValue::Text(v)) => FieldUpdate::Phone(v),
            (ResumeField::Summary, FieldValue::Text(v)) => FieldUpdate::Summary(v),
            (ResumeField::Experience, FieldValue::List(v)) => FieldUpdate::Experience(v),
            (ResumeField::Education, FieldValue::List(v)) => FieldUpdate::Education(v),
            (ResumeField::Skills, FieldValue::List(v)) => FieldUpdate::Skills(v),
            (field, _) => {
                return Err(ModelError::FieldKind {
                    field,
                    expected: if field.is_list() {
                        "a list of strings"
                    } else {
                        "a string"
                    },
                })
            }
        };
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_field_round_trips_every_field() {
        for field in ResumeField::ALL {
            let value = if field.is_list() {
                FieldValue::List(list(&["first", "", "third"]))
            } else {
                FieldValue::Text("  multi\nline value ".to_string())
            };
            let mut content = ResumeContent::default();
            let update = FieldUpdate::from_value(field, value.clone()).unwrap();
            content.set_field(update);
            assert_eq!(content.field(field), value, "field {field}");
        }
    }

    #[test]
    fn test_set_field_leaves_other_fields_alone() {
        let mut content = ResumeContent::default();
        content.set_field(FieldUpdate::Title("Staff Engineer".to_string()));
        let seed = ResumeContent::default();
        assert_eq!(content.title, "Staff Engineer");
        assert_eq!(content.name, seed.name);
        assert_eq!(content.experience, seed.experience);
        assert_eq!(content.skills, seed.skills);
    }

    #[test]
    fn test_from_value_rejects_wrong_kind() {
        let err = FieldUpdate::from_value(ResumeField::Name, FieldValue::List(vec![])).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FieldKind {
                field: ResumeField::Name,
                ..
            }
        ));
        assert!(FieldUpdate::from_value(ResumeField::Skills, FieldValue::Text("A".into())).is_err());
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("summary".parse::<ResumeField>().unwrap(), ResumeField::Summary);
        assert_eq!(
            "address".parse::<ResumeField>().unwrap_err(),
            ModelError::UnknownField("address".to_string())
        );
        assert_eq!("education".parse::<Section>().unwrap(), Section::Education);
        assert!("skills".parse::<Section>().is_err());
    }

    // ── skills ──────────────────────────────────────────────────────────────

    #[test]
    fn test_skills_split_on_comma_space() {
        let mut content = ResumeContent::default();
        content.set_skills_from_text("A, B, C");
        assert_eq!(content.skills, list(&["A", "B", "C"]));
    }

    #[test]
    fn test_skills_without_space_stay_one_entry() {
        let mut content = ResumeContent::default();
        content.set_skills_from_text("A,B");
        assert_eq!(content.skills, list(&["A,B"]));
    }

    #[test]
    fn test_skills_split_keeps_artifacts() {
        let mut content = ResumeContent::default();
        content.set_skills_from_text("Rust, , Go, ");
        assert_eq!(content.skills, list(&["Rust", "", "Go", ""]));

        content.set_skills_from_text("");
        assert_eq!(content.skills, list(&[""]));

        content.set_skills_from_text("A ,B");
        assert_eq!(content.skills, list(&["A ,B"]));
    }

    #[test]
    fn test_skills_text_joins_seed() {
        assert_eq!(
            ResumeContent::default().skills_text(),
            "JavaScript, React, Node.js, Python, AWS"
        );
    }

    // ── indexed sections ────────────────────────────────────────────────────

    #[test]
    fn test_append_experience_adds_one_empty_entry() {
        let mut content = ResumeContent::default();
        let before = content.experience.clone();
        content.append_experience();
        assert_eq!(content.experience.len(), before.len() + 1);
        assert_eq!(content.experience.last().map(String::as_str), Some(""));
        assert_eq!(&content.experience[..before.len()], before.as_slice());
    }

    #[test]
    fn test_append_education_leaves_experience() {
        let mut content = ResumeContent::default();
        content.append_education();
        assert_eq!(content.education.len(), 3);
        assert_eq!(content.experience.len(), 2);
    }

    #[test]
    fn test_set_experience_at_changes_only_target() {
        let mut content = ResumeContent::default();
        let first = content.experience[0].clone();
        content.set_experience_at(1, "X").unwrap();
        assert_eq!(content.experience, vec![first, "X".to_string()]);
    }

    #[test]
    fn test_set_education_at_out_of_range_is_rejected() {
        let mut content = ResumeContent::default();
        let before = content.clone();
        let err = content.set_education_at(2, "PhD").unwrap_err();
        assert_eq!(
            err,
            ModelError::IndexOutOfRange {
                section: Section::Education,
                index: 2,
                len: 2
            }
        );
        assert_eq!(content, before);
    }

    #[test]
    fn test_blank_has_one_row_per_section() {
        let blank = ResumeContent::blank();
        assert_eq!(blank.experience, list(&[""]));
        assert_eq!(blank.education, list(&[""]));
        assert!(blank.skills.is_empty());
        assert!(blank.name.is_empty());
    }
}

//! The composite record behind the profile wizard.

use serde_json::Value;

use crate::section::{Section, SectionParseError};
use crate::value::{FieldValue, SectionFields, fields};

/// Field names used across sections.
pub mod field {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const LOCATION: &str = "location";
    pub const PROFILE_PHOTO: &str = "profilePhoto";
    pub const COVER_PHOTO: &str = "coverPhoto";

    pub const PROFESSIONAL_TITLE: &str = "professionalTitle";
    pub const BIO: &str = "bio";
    pub const HOURLY_RATE: &str = "hourlyRate";
    pub const EXPERIENCE_LEVEL: &str = "experienceLevel";
    pub const AVAILABILITY: &str = "availability";

    pub const SKILLS: &str = "skills";
    pub const LANGUAGES: &str = "languages";

    pub const PROJECTS: &str = "projects";

    pub const WORK_HISTORY: &str = "workHistory";
    pub const EDUCATION: &str = "education";

    pub const SERVICES: &str = "services";
}

/// Six sections, always present. Only their inner fields change.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    sections: [SectionFields; Section::COUNT],
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            sections: Section::all().map(default_fields),
        }
    }
}

fn default_fields(section: Section) -> SectionFields {
    let empty = || FieldValue::text("");
    match section {
        Section::BasicInfo => fields([
            (field::FULL_NAME, empty()),
            (field::EMAIL, empty()),
            (field::PHONE, empty()),
            (field::LOCATION, empty()),
            (field::PROFILE_PHOTO, FieldValue::Null),
            (field::COVER_PHOTO, FieldValue::Null),
        ]),
        Section::Professional => fields([
            (field::PROFESSIONAL_TITLE, empty()),
            (field::BIO, empty()),
            (field::HOURLY_RATE, empty()),
            (field::EXPERIENCE_LEVEL, empty()),
            (field::AVAILABILITY, empty()),
        ]),
        Section::Skills => fields([
            (field::SKILLS, FieldValue::empty_list()),
            (field::LANGUAGES, FieldValue::empty_list()),
        ]),
        Section::Portfolio => fields([(field::PROJECTS, FieldValue::empty_list())]),
        Section::Experience => fields([
            (field::WORK_HISTORY, FieldValue::empty_list()),
            (field::EDUCATION, FieldValue::empty_list()),
        ]),
        Section::Services => fields([(field::SERVICES, FieldValue::empty_list())]),
    }
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, section: Section) -> &SectionFields {
        &self.sections[section.index()]
    }

    pub fn field(&self, section: Section, name: &str) -> Option<&FieldValue> {
        self.section(section).get(name)
    }

    /// Text view of a field; absent fields read as `""`.
    pub fn text(&self, section: Section, name: &str) -> String {
        self.field(section, name)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// Shallow merge: keys in `partial` overwrite, other keys are kept.
    pub fn merge_section(&mut self, section: Section, partial: SectionFields) {
        self.sections[section.index()].extend(partial);
    }

    /// String-keyed merge for callers holding a wire name.
    pub fn merge_section_named(
        &mut self,
        name: &str,
        partial: SectionFields,
    ) -> Result<(), SectionParseError> {
        let section = name.parse::<Section>().inspect_err(|err| {
            tracing::warn!(%err, "rejected merge into unknown section");
        })?;
        self.merge_section(section, partial);
        Ok(())
    }

    /// Merge a JSON object. Non-object values are ignored.
    pub fn merge_section_json(&mut self, section: Section, partial: Value) {
        match partial {
            Value::Object(map) => {
                let partial = map
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect();
                self.merge_section(section, partial);
            }
            other => {
                tracing::warn!(%section, kind = json_kind(&other), "ignored non-object section update");
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_cover_every_section() {
        let record = FormRecord::new();
        for section in Section::all() {
            assert!(!record.section(section).is_empty(), "{section} has no defaults");
        }
        assert_eq!(record.text(Section::BasicInfo, field::FULL_NAME), "");
        assert_eq!(
            record.field(Section::Skills, field::SKILLS),
            Some(&FieldValue::empty_list())
        );
    }

    #[test]
    fn successive_merges_accumulate() {
        let mut record = FormRecord::new();
        record.merge_section(Section::Professional, fields([("bio", "x")]));
        record.merge_section(Section::Professional, fields([("title", "y")]));

        let professional = record.section(Section::Professional);
        assert_eq!(professional.get("bio"), Some(&FieldValue::text("x")));
        assert_eq!(professional.get("title"), Some(&FieldValue::text("y")));
    }

    #[test]
    fn merge_only_touches_the_named_section() {
        let mut record = FormRecord::new();
        let before = record.section(Section::BasicInfo).clone();
        record.merge_section(Section::Professional, fields([(field::BIO, "hello")]));
        assert_eq!(record.section(Section::BasicInfo), &before);
    }

    #[test]
    fn unknown_section_name_is_rejected_without_mutation() {
        let mut record = FormRecord::new();
        let before = record.clone();
        let result = record.merge_section_named("billing", fields([("iban", "x")]));
        assert_eq!(result, Err(SectionParseError("billing".to_string())));
        assert_eq!(record, before);
    }

    #[test]
    fn json_merge_converts_values() {
        let mut record = FormRecord::new();
        record.merge_section_json(
            Section::Professional,
            json!({ "hourlyRate": 45, "bio": "Builds things" }),
        );
        record.merge_section_json(Section::Professional, json!("not an object"));

        assert_eq!(record.text(Section::Professional, field::HOURLY_RATE), "45");
        assert_eq!(record.text(Section::Professional, field::BIO), "Builds things");
    }
}

//! Backend-shaped profile payload and the mapping to and from `FormRecord`.
//!
//! ```text
//! basicInfo.fullName                 -> profile.name
//! basicInfo.email / phone / location -> profile.email / phone / location
//! basicInfo.profilePhoto             -> profile.avatar        (media)
//! basicInfo.coverPhoto               -> profile.coverImage    (media)
//! professional.professionalTitle     -> profile.title
//! professional.bio / hourlyRate      -> profile.bio / hourlyRate
//! professional.experienceLevel       -> profile.experienceLevel
//! professional.availability          -> profile.availability
//! skills.skills / languages          -> skills / languages
//! portfolio.projects[i]              -> portfolio[i]          (image is media)
//! experience.workHistory / education -> experience / education
//! services.services                  -> services
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{FormRecord, field};
use crate::section::Section;
use crate::value::{FieldValue, FileAttachment, fields};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePayload {
    pub profile: ProfileSummary,
    pub skills: Vec<String>,
    pub languages: Vec<Language>,
    pub portfolio: Vec<PortfolioEntry>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub services: Vec<ServiceOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSummary {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub hourly_rate: f64,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub cover_image: String,
    pub experience_level: String,
    pub availability: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub name: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioEntry {
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOffer {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub delivery_days: u32,
    pub category: String,
}

// ── Media slots ──────────────────────────────────────────────────────────

/// Payload position of a media value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSlot {
    Avatar,
    Cover,
    Portfolio(usize),
}

/// What the form held for a media slot.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaInput {
    /// Already a URL or data URL; passes through unchanged.
    Url(String),
    File(FileAttachment),
}

impl MediaInput {
    fn from_field(value: Option<&FieldValue>) -> Option<Self> {
        match value? {
            FieldValue::File(file) => Some(Self::File(file.clone())),
            FieldValue::Text(url) if !url.trim().is_empty() => Some(Self::Url(url.clone())),
            _ => None,
        }
    }
}

/// A payload whose media slots still need resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadDraft {
    pub payload: ProfilePayload,
    pub media: Vec<(MediaSlot, MediaInput)>,
}

impl PayloadDraft {
    /// Write a resolved media string into its slot.
    pub fn fill(&mut self, slot: MediaSlot, resolved: String) {
        match slot {
            MediaSlot::Avatar => self.payload.profile.avatar = resolved,
            MediaSlot::Cover => self.payload.profile.cover_image = resolved,
            MediaSlot::Portfolio(i) => {
                if let Some(entry) = self.payload.portfolio.get_mut(i) {
                    entry.image = resolved;
                }
            }
        }
    }
}

// ── Forward transform ────────────────────────────────────────────────────

/// Map the form record onto the payload shape. Media slots are left
/// empty and listed in `media`.
pub fn transform(record: &FormRecord) -> PayloadDraft {
    let basic = |name| record.field(Section::BasicInfo, name);
    let text = |section, name| record.text(section, name).trim().to_string();
    let list = |section, name| {
        record
            .field(section, name)
            .map(FieldValue::as_list)
            .unwrap_or_default()
    };

    let mut media = Vec::new();
    if let Some(input) = MediaInput::from_field(basic(field::PROFILE_PHOTO)) {
        media.push((MediaSlot::Avatar, input));
    }
    if let Some(input) = MediaInput::from_field(basic(field::COVER_PHOTO)) {
        media.push((MediaSlot::Cover, input));
    }

    let profile = ProfileSummary {
        name: text(Section::BasicInfo, field::FULL_NAME),
        title: text(Section::Professional, field::PROFESSIONAL_TITLE),
        bio: text(Section::Professional, field::BIO),
        location: text(Section::BasicInfo, field::LOCATION),
        hourly_rate: record
            .field(Section::Professional, field::HOURLY_RATE)
            .map(FieldValue::as_number)
            .unwrap_or_default()
            .max(0.0),
        email: text(Section::BasicInfo, field::EMAIL),
        phone: text(Section::BasicInfo, field::PHONE),
        avatar: String::new(),
        cover_image: String::new(),
        experience_level: text(Section::Professional, field::EXPERIENCE_LEVEL),
        availability: text(Section::Professional, field::AVAILABILITY),
    };

    let skills = record
        .field(Section::Skills, field::SKILLS)
        .map(FieldValue::as_string_list)
        .unwrap_or_default();

    let languages = list(Section::Skills, field::LANGUAGES)
        .iter()
        .filter_map(|item| match item {
            FieldValue::Text(name) if !name.trim().is_empty() => Some(Language {
                name: name.trim().to_string(),
                proficiency: String::new(),
            }),
            FieldValue::Object(_) => Some(Language {
                name: item_text(item, "name"),
                proficiency: item_text(item, "proficiency"),
            })
            .filter(|lang| !lang.name.is_empty()),
            _ => None,
        })
        .collect();

    let mut portfolio = Vec::new();
    for item in list(Section::Portfolio, field::PROJECTS) {
        if item.is_blank() {
            continue;
        }
        if let Some(input) = MediaInput::from_field(item.get("image")) {
            media.push((MediaSlot::Portfolio(portfolio.len()), input));
        }
        portfolio.push(PortfolioEntry {
            title: item_text(item, "title"),
            description: item_text(item, "description"),
            image: String::new(),
            link: item_text(item, "link"),
            category: item_text(item, "category"),
        });
    }

    let experience = list(Section::Experience, field::WORK_HISTORY)
        .iter()
        .filter(|item| !item.is_blank())
        .map(|item| WorkExperience {
            title: item_text(item, "title"),
            company: item_text(item, "company"),
            start_date: item_text(item, "startDate"),
            end_date: item_text(item, "endDate"),
            current: item.get("current").is_some_and(FieldValue::as_bool),
            description: item_text(item, "description"),
        })
        .collect();

    let education = list(Section::Experience, field::EDUCATION)
        .iter()
        .filter(|item| !item.is_blank())
        .map(|item| Education {
            degree: item_text(item, "degree"),
            institution: item_text(item, "institution"),
            year: item_text(item, "year"),
        })
        .collect();

    let services = list(Section::Services, field::SERVICES)
        .iter()
        .filter(|item| !item.is_blank())
        .map(|item| ServiceOffer {
            title: item_text(item, "title"),
            description: item_text(item, "description"),
            price: item.get("price").map_or(0.0, FieldValue::as_number).max(0.0),
            delivery_days: item
                .get("deliveryDays")
                .map_or(0.0, FieldValue::as_number)
                .clamp(0.0, f64::from(u32::MAX)) as u32,
            category: item_text(item, "category"),
        })
        .collect();

    PayloadDraft {
        payload: ProfilePayload {
            profile,
            skills,
            languages,
            portfolio,
            experience,
            education,
            services,
        },
        media,
    }
}

fn item_text(item: &FieldValue, key: &str) -> String {
    item.get(key)
        .map(FieldValue::as_text)
        .unwrap_or_default()
        .trim()
        .to_string()
}

// ── Inverse transform ────────────────────────────────────────────────────

/// Rebuild a form record from a stored payload.
///
/// Accepts the current nested shape and the legacy flat shape (`name`,
/// `title`, `bio` at the top level). Missing paths become empty strings or
/// empty lists; this never fails.
pub fn load_existing(stored: &Value) -> FormRecord {
    let mut record = FormRecord::new();

    let s = |paths: &[&str]| FieldValue::Text(pick_str(stored, paths));

    record.merge_section(
        Section::BasicInfo,
        fields([
            (field::FULL_NAME, s(&["/profile/name", "/name", "/fullName"])),
            (field::EMAIL, s(&["/profile/email", "/email"])),
            (field::PHONE, s(&["/profile/phone", "/phone"])),
            (field::LOCATION, s(&["/profile/location", "/location"])),
            (
                field::PROFILE_PHOTO,
                s(&["/profile/avatar", "/avatar", "/profileImage"]),
            ),
            (
                field::COVER_PHOTO,
                s(&["/profile/coverImage", "/coverImage", "/coverPhoto"]),
            ),
        ]),
    );

    let hourly_rate = pick(stored, &["/profile/hourlyRate", "/hourlyRate"])
        .map_or_else(|| FieldValue::text(""), |v| FieldValue::from(v.clone()));
    record.merge_section(
        Section::Professional,
        fields([
            (
                field::PROFESSIONAL_TITLE,
                s(&["/profile/title", "/title", "/professionalTitle"]),
            ),
            (field::BIO, s(&["/profile/bio", "/bio"])),
            (field::HOURLY_RATE, hourly_rate),
            (
                field::EXPERIENCE_LEVEL,
                s(&["/profile/experienceLevel", "/experienceLevel"]),
            ),
            (field::AVAILABILITY, s(&["/profile/availability", "/availability"])),
        ]),
    );

    record.merge_section(
        Section::Skills,
        fields([
            (field::SKILLS, list_at(stored, "/skills")),
            (field::LANGUAGES, list_at(stored, "/languages")),
        ]),
    );

    let projects = array_at(stored, "/portfolio")
        .iter()
        .map(|item| {
            let image = pick_str(item, &["/image", "/imageUrl", "/images/0"]);
            object([
                ("title", pick_str(item, &["/title"])),
                ("description", pick_str(item, &["/description"])),
                ("image", image),
                ("link", pick_str(item, &["/link", "/url", "/projectUrl"])),
                ("category", pick_str(item, &["/category"])),
            ])
        })
        .collect();
    record.merge_section(
        Section::Portfolio,
        fields([(field::PROJECTS, FieldValue::List(projects))]),
    );

    record.merge_section(
        Section::Experience,
        fields([
            (field::WORK_HISTORY, list_at(stored, "/experience")),
            (field::EDUCATION, list_at(stored, "/education")),
        ]),
    );
    record.merge_section(
        Section::Services,
        fields([(field::SERVICES, list_at(stored, "/services"))]),
    );

    record
}

fn pick<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .find(|v| !v.is_null())
}

fn pick_str(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn array_at<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    value
        .pointer(path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Array at `path` as a list. Legacy comma-separated text is kept as text.
fn list_at(value: &Value, path: &str) -> FieldValue {
    match value.pointer(path) {
        Some(text @ Value::String(_)) => FieldValue::from(text.clone()),
        _ => FieldValue::List(
            array_at(value, path)
                .iter()
                .cloned()
                .map(FieldValue::from)
                .collect(),
        ),
    }
}

fn object<const N: usize>(pairs: [(&str, String); N]) -> FieldValue {
    FieldValue::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), FieldValue::Text(v)))
            .collect::<BTreeMap<_, _>>(),
    )
}

//! Read-side views: the public profile card and form completeness.

use serde::Serialize;
use serde_json::Value;

use crate::media::{DEFAULT_AVATAR, DEFAULT_COVER};
use crate::payload::{ProfilePayload, load_existing, transform};
use crate::record::{FormRecord, field};
use crate::section::Section;

/// Display model for a freelancer's public profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub display_name: String,
    pub initials: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub rate_label: String,
    pub avatar: String,
    pub cover_image: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub portfolio_count: usize,
    pub service_count: usize,
    pub starting_price: Option<f64>,
}

impl PublicProfile {
    /// Build from a stored payload. Shapes that do not deserialize fall
    /// back to the form-record mapping, which tolerates legacy layouts.
    pub fn from_payload(stored: &Value) -> Self {
        let payload = serde_json::from_value::<ProfilePayload>(stored.clone())
            .ok()
            .filter(|p| !p.profile.name.is_empty())
            .unwrap_or_else(|| transform(&load_existing(stored)).payload);
        Self::from(&payload)
    }
}

impl From<&ProfilePayload> for PublicProfile {
    fn from(payload: &ProfilePayload) -> Self {
        let p = &payload.profile;
        let display_name = if p.name.trim().is_empty() {
            "Freelancer".to_string()
        } else {
            p.name.trim().to_string()
        };
        let rate_label = if p.hourly_rate > 0.0 {
            format!("${}/hr", trim_amount(p.hourly_rate))
        } else {
            "Rate on request".to_string()
        };
        let starting_price = payload
            .services
            .iter()
            .map(|s| s.price)
            .filter(|price| *price > 0.0)
            .reduce(f64::min);

        Self {
            initials: initials(&display_name),
            display_name,
            title: p.title.clone(),
            bio: p.bio.clone(),
            location: p.location.clone(),
            rate_label,
            avatar: or_default(&p.avatar, DEFAULT_AVATAR),
            cover_image: or_default(&p.cover_image, DEFAULT_COVER),
            skills: payload.skills.clone(),
            languages: payload.languages.iter().map(|l| l.name.clone()).collect(),
            portfolio_count: payload.portfolio.len(),
            service_count: payload.services.len(),
            starting_price,
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn trim_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

/// Up to two leading letters, upper-cased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Percentage (0–100) of profile fields that are filled in.
pub fn completeness(record: &FormRecord) -> u8 {
    const CHECKS: [(Section, &str); 11] = [
        (Section::BasicInfo, field::FULL_NAME),
        (Section::BasicInfo, field::EMAIL),
        (Section::BasicInfo, field::LOCATION),
        (Section::BasicInfo, field::PROFILE_PHOTO),
        (Section::Professional, field::PROFESSIONAL_TITLE),
        (Section::Professional, field::BIO),
        (Section::Professional, field::HOURLY_RATE),
        (Section::Skills, field::SKILLS),
        (Section::Portfolio, field::PROJECTS),
        (Section::Experience, field::WORK_HISTORY),
        (Section::Services, field::SERVICES),
    ];

    let filled = CHECKS
        .iter()
        .filter(|(section, name)| {
            record
                .field(*section, name)
                .is_some_and(|value| !value.is_blank())
        })
        .count();

    let pct = (filled as f64 * 100.0 / CHECKS.len() as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

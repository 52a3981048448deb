//! Named partitions of the profile wizard record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One section of the composite form record. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    BasicInfo,
    Professional,
    Skills,
    Portfolio,
    Experience,
    Services,
}

/// Returned when a section name is not one of the six known sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile section: {0:?}")]
pub struct SectionParseError(pub String);

impl Section {
    pub const COUNT: usize = 6;

    /// All sections in wizard order.
    pub fn all() -> [Self; Self::COUNT] {
        [
            Self::BasicInfo,
            Self::Professional,
            Self::Skills,
            Self::Portfolio,
            Self::Experience,
            Self::Services,
        ]
    }

    /// Wire name used by the web client.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicInfo => "basicInfo",
            Self::Professional => "professional",
            Self::Skills => "skills",
            Self::Portfolio => "portfolio",
            Self::Experience => "experience",
            Self::Services => "services",
        }
    }

    /// Step title shown by the wizard.
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::Professional => "Professional Details",
            Self::Skills => "Skills & Languages",
            Self::Portfolio => "Portfolio",
            Self::Experience => "Experience & Education",
            Self::Services => "Services",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Professional => 1,
            Self::Skills => 2,
            Self::Portfolio => 3,
            Self::Experience => 4,
            Self::Services => 5,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = SectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| SectionParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_wire_names() {
        for section in Section::all() {
            assert_eq!(section.as_str().parse::<Section>(), Ok(section));
        }
    }

    #[test]
    fn rejects_unknown_and_differently_cased_names() {
        assert_eq!(
            "billing".parse::<Section>(),
            Err(SectionParseError("billing".to_string()))
        );
        assert!("BasicInfo".parse::<Section>().is_err());
    }

    #[test]
    fn index_matches_wizard_order() {
        for (i, section) in Section::all().into_iter().enumerate() {
            assert_eq!(section.index(), i);
        }
    }
}

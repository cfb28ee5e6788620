//! Whole-day classifications that replace itemized time entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Special day categories.
///
/// A day is either a list of time entries or exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecialDayType {
    Vacation,
    Sick,
    Holiday,
    CareLeave,
    WorksCouncil,
    Training,
    SpecialLeave,
    VocationalSchool,
    Wedding,
    Bereavement,
}

/// Keywords recognized as whole-day text, lower-case.
///
/// `Holiday` has no keyword: it comes from the holiday lookup.
const SPECIAL_DAY_KEYWORDS: &[(&str, SpecialDayType)] = &[
    ("urlaub", SpecialDayType::Vacation),
    ("krank", SpecialDayType::Sick),
    ("krankenstand", SpecialDayType::Sick),
    ("pflegeurlaub", SpecialDayType::CareLeave),
    ("betriebsrat", SpecialDayType::WorksCouncil),
    ("schulung", SpecialDayType::Training),
    ("weiterbildung", SpecialDayType::Training),
    ("sonderurlaub", SpecialDayType::SpecialLeave),
    ("berufsschule", SpecialDayType::VocationalSchool),
    ("hochzeit", SpecialDayType::Wedding),
    ("todesfall", SpecialDayType::Bereavement),
];

impl SpecialDayType {
    pub const ALL: [Self; 10] = [
        Self::Vacation,
        Self::Sick,
        Self::Holiday,
        Self::CareLeave,
        Self::WorksCouncil,
        Self::Training,
        Self::SpecialLeave,
        Self::VocationalSchool,
        Self::Wedding,
        Self::Bereavement,
    ];

    /// Identifier used in serialized output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Sick => "sick",
            Self::Holiday => "holiday",
            Self::CareLeave => "care_leave",
            Self::WorksCouncil => "works_council",
            Self::Training => "training",
            Self::SpecialLeave => "special_leave",
            Self::VocationalSchool => "vocational_school",
            Self::Wedding => "wedding",
            Self::Bereavement => "bereavement",
        }
    }

    /// German display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Vacation => "Urlaub",
            Self::Sick => "Krankenstand",
            Self::Holiday => "Feiertag",
            Self::CareLeave => "Pflegeurlaub",
            Self::WorksCouncil => "Betriebsrat",
            Self::Training => "Schulung",
            Self::SpecialLeave => "Sonderurlaub",
            Self::VocationalSchool => "Berufsschule",
            Self::Wedding => "Hochzeit",
            Self::Bereavement => "Todesfall",
        }
    }

    /// Vacation and sick days are left out of the average day.
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(self, Self::Vacation | Self::Sick)
    }
}

/// Matches a whole trimmed text against the keyword table, ignoring case.
pub fn classify_keyword(text: &str) -> Option<SpecialDayType> {
    let normalized = text.trim().to_lowercase();
    SPECIAL_DAY_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == normalized)
        .map(|(_, day_type)| *day_type)
}

/// Classifies a day's whole text.
///
/// An empty day on a public holiday is a holiday; otherwise only an exact
/// keyword match makes the day special. Everything else is left to the
/// line parser.
pub fn classify_day(text: &str, is_holiday: bool) -> Option<SpecialDayType> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return is_holiday.then_some(SpecialDayType::Holiday);
    }
    classify_keyword(trimmed)
}

impl fmt::Display for SpecialDayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpecialDayType {
    type Err = UnknownSpecialDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day_type| day_type.as_str() == s)
            .ok_or_else(|| UnknownSpecialDay(s.to_string()))
    }
}

impl Serialize for SpecialDayType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SpecialDayType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown special day identifiers.
#[derive(Debug, Clone)]
pub struct UnknownSpecialDay(String);

impl fmt::Display for UnknownSpecialDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown special day type: {}", self.0)
    }
}

impl std::error::Error for UnknownSpecialDay {}

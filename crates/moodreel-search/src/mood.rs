//! Mood tags a search can be narrowed with.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A mood tag. At most one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    /// Gentle, warm, low-stakes.
    CalmAndCozy,
    /// Uplifting and funny.
    FeelGood,
    /// Classics and comfort rewatches.
    Nostalgic,
    /// Thrillers and tension.
    EdgeOfYourSeat,
    /// Puzzles and twists.
    MindBending,
    /// Emotional and moving.
    Heartfelt,
    /// Quests and big journeys.
    Adventurous,
    /// Brooding and atmospheric.
    DarkAndMoody,
}

impl Mood {
    /// All moods in display order.
    pub const ALL: [Self; 8] = [
        Self::CalmAndCozy,
        Self::FeelGood,
        Self::Nostalgic,
        Self::EdgeOfYourSeat,
        Self::MindBending,
        Self::Heartfelt,
        Self::Adventurous,
        Self::DarkAndMoody,
    ];

    /// Display label, also used in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CalmAndCozy => "Calm & Cozy",
            Self::FeelGood => "Feel-Good",
            Self::Nostalgic => "Nostalgic",
            Self::EdgeOfYourSeat => "Edge of Your Seat",
            Self::MindBending => "Mind-Bending",
            Self::Heartfelt => "Heartfelt",
            Self::Adventurous => "Adventurous",
            Self::DarkAndMoody => "Dark & Moody",
        }
    }

    /// Kebab-case identifier for command lines.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CalmAndCozy => "calm-and-cozy",
            Self::FeelGood => "feel-good",
            Self::Nostalgic => "nostalgic",
            Self::EdgeOfYourSeat => "edge-of-your-seat",
            Self::MindBending => "mind-bending",
            Self::Heartfelt => "heartfelt",
            Self::Adventurous => "adventurous",
            Self::DarkAndMoody => "dark-and-moody",
        }
    }

    /// One-line description shown next to the label.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::CalmAndCozy => "Soft lighting, warm blankets, nothing too intense",
            Self::FeelGood => "Guaranteed to leave you smiling",
            Self::Nostalgic => "Comfort classics that feel like home",
            Self::EdgeOfYourSeat => "Tension, twists, and racing pulses",
            Self::MindBending => "Stories that keep you thinking afterwards",
            Self::Heartfelt => "Bring tissues, leave uplifted",
            Self::Adventurous => "Big journeys and faraway places",
            Self::DarkAndMoody => "Shadows, rain, and moral grey areas",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Error for a string that names no mood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood '{0}' (run `moodreel moods` to list them)")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    /// Accepts the label or the slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|mood| {
                mood.label().eq_ignore_ascii_case(needle) || mood.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownMood(String::from(s)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_parse_label_and_slug() {
        // Arrange & Act & Assert
        assert_eq!("Calm & Cozy".parse::<Mood>().unwrap(), Mood::CalmAndCozy);
        assert_eq!("calm-and-cozy".parse::<Mood>().unwrap(), Mood::CalmAndCozy);
        assert_eq!(" nostalgic ".parse::<Mood>().unwrap(), Mood::Nostalgic);
        assert_eq!("EDGE OF YOUR SEAT".parse::<Mood>().unwrap(), Mood::EdgeOfYourSeat);
    }

    #[test]
    fn test_parse_unknown() {
        // Arrange & Act
        let result = "grumpy".parse::<Mood>();

        // Assert
        assert_eq!(result, Err(UnknownMood(String::from("grumpy"))));
    }

    #[test]
    fn test_every_mood_round_trips_through_slug() {
        for mood in Mood::ALL {
            assert_eq!(mood.slug().parse::<Mood>().unwrap(), mood);
            assert_eq!(mood.to_string(), mood.label());
        }
    }

    #[test]
    fn test_labels_and_slugs_are_unique() {
        // Arrange & Act
        let labels: HashSet<&str> = Mood::ALL.iter().map(|m| m.label()).collect();
        let slugs: HashSet<&str> = Mood::ALL.iter().map(|m| m.slug()).collect();

        // Assert
        assert_eq!(labels.len(), Mood::ALL.len());
        assert_eq!(slugs.len(), Mood::ALL.len());
    }
}

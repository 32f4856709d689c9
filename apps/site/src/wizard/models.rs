//! Wizard data model: the raw draft the client sends, the validated request,
//! and the two generated email records handed to the preview screen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stylistic tone of the generated emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Friendly,
    Confident,
    Enthusiastic,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Confident,
        Tone::Enthusiastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Confident => "confident",
            Tone::Enthusiastic => "enthusiastic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Confident => "Confident",
            Tone::Enthusiastic => "Enthusiastic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tone::Professional => "Formal and business-appropriate",
            Tone::Friendly => "Warm and approachable",
            Tone::Confident => "Bold and assertive",
            Tone::Enthusiastic => "Energetic and passionate",
        }
    }
}

impl FromStr for Tone {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Seniority of the applicant. Only `Entry` vs everything else affects the
/// generated templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level (0-2 years)",
            ExperienceLevel::Mid => "Mid Level (2-5 years)",
            ExperienceLevel::Senior => "Senior Level (5+ years)",
            ExperienceLevel::Executive => "Executive Level",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, ExperienceLevel::Entry)
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

/// Handle for the selected resume. File contents are never read; only the
/// name's extension is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeFile {
    pub file_name: String,
}

/// The candidate form as the client currently holds it. Any field may be
/// missing or hold a value outside its enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDraft {
    pub job_url: String,
    pub resume_file: Option<ResumeFile>,
    pub bio: String,
    pub tone: Option<String>,
    pub experience: Option<String>,
}

/// A draft that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub job_url: String,
    pub resume_file: ResumeFile,
    pub bio: String,
    pub tone: Tone,
    pub experience: ExperienceLevel,
}

/// One fixed-template output shown on the preview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub id: u32,
    pub subject: String,
    pub body: String,
}

/// Length figures displayed under the selected email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmailStats {
    pub subject_length: usize,
    pub word_count: usize,
}

impl GeneratedEmail {
    pub fn download_file_name(&self) -> String {
        format!("cold-email-{}.txt", self.id)
    }

    /// Plain-text rendering used by the download action.
    pub fn to_text_file(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject, self.body)
    }

    /// Words are counted by splitting on single spaces, so line breaks do not
    /// separate words.
    pub fn stats(&self) -> EmailStats {
        EmailStats {
            subject_length: self.subject.chars().count(),
            word_count: self.body.split(' ').count(),
        }
    }
}

/// The one-shot navigation payload handed from the submission controller to
/// the preview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPayload {
    pub request: ApplicationRequest,
    pub emails: Vec<GeneratedEmail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parses_only_known_values() {
        assert_eq!("confident".parse::<Tone>(), Ok(Tone::Confident));
        assert!("Confident".parse::<Tone>().is_err());
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_experience_parses_only_known_values() {
        assert_eq!("entry".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Entry));
        assert_eq!(
            "executive".parse::<ExperienceLevel>(),
            Ok(ExperienceLevel::Executive)
        );
        assert!("".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_only_entry_level_is_entry() {
        let entries: Vec<_> = ExperienceLevel::ALL
            .into_iter()
            .filter(ExperienceLevel::is_entry)
            .collect();
        assert_eq!(entries, vec![ExperienceLevel::Entry]);
    }

    #[test]
    fn test_download_rendering() {
        let email = GeneratedEmail {
            id: 2,
            subject: "Hello".to_string(),
            body: "Body text".to_string(),
        };
        assert_eq!(email.download_file_name(), "cold-email-2.txt");
        assert_eq!(email.to_text_file(), "Subject: Hello\n\nBody text");
    }

    #[test]
    fn test_stats_split_on_single_spaces() {
        let email = GeneratedEmail {
            id: 1,
            subject: "Re: hi".to_string(),
            body: "Hello,\n\nthere you go".to_string(),
        };
        let stats = email.stats();
        assert_eq!(stats.subject_length, 6);
        assert_eq!(stats.word_count, 3);
    }

    #[test]
    fn test_draft_deserializes_with_missing_fields() {
        let draft: ApplicationDraft =
            serde_json::from_str(r#"{"job_url": "https://linkedin.com/jobs/1"}"#).unwrap();
        assert_eq!(draft.job_url, "https://linkedin.com/jobs/1");
        assert!(draft.resume_file.is_none());
        assert!(draft.bio.is_empty());
        assert!(draft.tone.is_none());
    }
}

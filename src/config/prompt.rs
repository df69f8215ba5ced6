use std::fmt;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;
use log::info;
use thiserror::Error;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are "Mang Juan", an AI assistant specializing in disaster preparedness, response, and recovery for the Philippines. Your role is to:

1. Help people prepare for natural disasters (typhoons, floods, earthquakes, etc.)
2. Provide accurate emergency response guidance
3. Offer recovery and relief information
4. Share safety protocols and evacuation procedures

CRITICAL GUIDELINES:
- Only provide information from official sources like:
  * NDRRMC (National Disaster Risk Reduction and Management Council)
  * PAGASA (Philippine Atmospheric, Geophysical and Astronomical Services Administration)
  * Philippine Red Cross
  * Local Government Units (LGUs)
  * WHO and CDC for health-related disasters
  * PHIVOLCS for earthquakes and volcanic activity

- Always cite your sources when providing specific statistics, warnings, or protocols
- If you don't have verified information, clearly state that and recommend contacting official authorities
- Prioritize life-saving information and immediate safety
- Use simple, clear Filipino-English (Taglish) when appropriate for better understanding
- Never provide unverified rumors or speculation
- In emergencies, always remind users to call official hotlines: 911 (NDRRMC), 143 (Red Cross)

Respond in a helpful, calm, and authoritative manner. Keep responses concise but complete."#;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read prompt file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Prompt file '{0}' is empty")]
    Empty(String),
    #[error("Invalid difficulty level: '{0}'")]
    InvalidDifficulty(String),
}

/// Reads a system prompt override. Surrounding whitespace is dropped.
pub fn load_system_prompt(path: &str) -> Result<Arc<str>, PromptError> {
    let content = fs::read_to_string(path).map_err(|source| PromptError::Io {
        path: path.to_string(),
        source,
    })?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(PromptError::Empty(path.to_string()));
    }
    info!("Loaded system prompt override from '{}' ({} bytes)", path, trimmed.len());
    Ok(Arc::from(trimmed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn descriptor(self) -> &'static str {
        match self {
            Difficulty::Easy =>
                "primary school level: simple vocabulary, basic facts and everyday safety knowledge",
            Difficulty::Medium =>
                "high school level: requires understanding of causes, procedures and official warning systems",
            Difficulty::Hard =>
                "college level: detailed, technical questions that require analysis and deeper domain knowledge",
        }
    }
}

impl FromStr for Difficulty {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(PromptError::InvalidDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

pub fn build_quiz_prompt(topic: &str, difficulty: Difficulty, count: u32) -> String {
    format!(
        "Generate exactly {count} distinct multiple-choice quiz questions about \"{topic}\".\n\
         The questions must be written at a {level}.\n\
         \n\
         Each question must be a JSON object with these keys:\n\
         - \"question\": the question text\n\
         - \"options\": an array of exactly 4 distinct answer strings\n\
         - \"correct_index\": the index (0-3) of the correct option\n\
         \n\
         Respond with ONLY a JSON array of these objects. Do not add explanations, markdown or any other text.",
        count = count,
        topic = topic,
        level = difficulty.descriptor()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn difficulty_is_case_insensitive() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("".parse::<Difficulty>().is_err());
    }

    #[test]
    fn quiz_prompt_carries_request_parameters() {
        let prompt = build_quiz_prompt("typhoon safety", Difficulty::Medium, 7);
        assert!(prompt.contains("exactly 7"));
        assert!(prompt.contains("\"typhoon safety\""));
        assert!(prompt.contains("high school level"));
        assert!(prompt.contains("correct_index"));
        assert!(prompt.contains("ONLY a JSON array"));
    }

    #[test]
    fn each_difficulty_has_its_own_level() {
        assert!(Difficulty::Easy.descriptor().starts_with("primary school level"));
        assert!(Difficulty::Medium.descriptor().starts_with("high school level"));
        assert!(Difficulty::Hard.descriptor().starts_with("college level"));
    }

    #[test]
    fn system_prompt_override_is_trimmed() {
        let path = std::env::temp_dir().join(format!("mang-juan-prompt-{}.txt", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "\n  You are a test assistant.  \n").unwrap();

        let prompt = load_system_prompt(path.to_str().unwrap()).unwrap();
        assert_eq!(&*prompt, "You are a test assistant.");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_prompt_file_is_an_error() {
        let err = load_system_prompt("/nonexistent/mang-juan/prompt.txt").unwrap_err();
        assert!(matches!(err, PromptError::Io { .. }));
    }
}

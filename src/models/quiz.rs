use serde::{ Deserialize, Serialize };
use serde_json::Value;

use super::ValidationError;
use crate::config::prompt::Difficulty;

pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: u32,
}

impl QuizRequest {
    /// `max_count` is an optional operator-configured ceiling on `count`.
    pub fn from_value(body: &Value, max_count: Option<u32>) -> Result<Self, ValidationError> {
        let topic = body
            .get("topic")
            .and_then(Value::as_str)
            .ok_or(ValidationError::TopicRequired)?
            .to_string();

        let difficulty = body
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(|d| d.parse::<Difficulty>().ok())
            .ok_or(ValidationError::InvalidDifficulty)?;

        let count = body
            .get("count")
            .and_then(Value::as_u64)
            .filter(|c| *c > 0)
            .and_then(|c| u32::try_from(c).ok())
            .ok_or(ValidationError::InvalidCount)?;
        if let Some(max) = max_count {
            if count > max {
                return Err(ValidationError::CountTooLarge(max));
            }
        }

        Ok(Self { topic, difficulty, count })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: u8,
}

impl QuizItem {
    /// Accepts an item only if it has a question, four distinct string options
    /// and a correct index pointing at one of them.
    pub fn from_value(value: &Value) -> Option<Self> {
        let question = value.get("question")?.as_str()?.to_string();

        let options = value
            .get("options")?
            .as_array()?
            .iter()
            .map(|o| o.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;
        if options.len() != OPTION_COUNT {
            return None;
        }
        let distinct = options
            .iter()
            .enumerate()
            .all(|(i, o)| !options[i + 1..].contains(o));
        if !distinct {
            return None;
        }

        let correct_index = value.get("correct_index")?.as_u64()?;
        if correct_index >= OPTION_COUNT as u64 {
            return None;
        }

        Some(Self { question, options, correct_index: correct_index as u8 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_request_parses() {
        let req = QuizRequest::from_value(
            &json!({"topic": "Earthquakes", "difficulty": "HARD", "count": 5}),
            None
        ).unwrap();
        assert_eq!(req.topic, "Earthquakes");
        assert_eq!(req.difficulty, Difficulty::Hard);
        assert_eq!(req.count, 5);
    }

    #[test]
    fn request_validation_errors() {
        let cases = [
            (json!({"difficulty": "easy", "count": 3}), ValidationError::TopicRequired),
            (json!({"topic": 7, "difficulty": "easy", "count": 3}), ValidationError::TopicRequired),
            (json!({"topic": "Floods", "difficulty": "expert", "count": 3}), ValidationError::InvalidDifficulty),
            (json!({"topic": "Floods", "count": 3}), ValidationError::InvalidDifficulty),
            (json!({"topic": "Floods", "difficulty": "easy", "count": 0}), ValidationError::InvalidCount),
            (json!({"topic": "Floods", "difficulty": "easy", "count": -2}), ValidationError::InvalidCount),
            (json!({"topic": "Floods", "difficulty": "easy", "count": 2.5}), ValidationError::InvalidCount),
            (json!({"topic": "Floods", "difficulty": "easy", "count": "3"}), ValidationError::InvalidCount),
        ];
        for (body, expected) in cases {
            assert_eq!(QuizRequest::from_value(&body, None), Err(expected), "body: {}", body);
        }
    }

    #[test]
    fn any_string_topic_is_kept_verbatim() {
        for topic in ["", "   ", "  Storm surge  "] {
            let req = QuizRequest::from_value(
                &json!({"topic": topic, "difficulty": "easy", "count": 1}),
                None
            ).unwrap();
            assert_eq!(req.topic, topic);
        }
    }

    #[test]
    fn count_is_uncapped_unless_configured() {
        let body = json!({"topic": "Floods", "difficulty": "easy", "count": 500});
        assert_eq!(QuizRequest::from_value(&body, None).unwrap().count, 500);
        assert_eq!(QuizRequest::from_value(&body, Some(50)), Err(ValidationError::CountTooLarge(50)));
        assert_eq!(QuizRequest::from_value(&body, Some(500)).unwrap().count, 500);
    }

    #[test]
    fn well_formed_item_is_accepted() {
        let item = QuizItem::from_value(
            &json!({"question": "Q1", "options": ["A", "B", "C", "D"], "correct_index": 3, "extra": true})
        ).unwrap();
        assert_eq!(item.options, vec!["A", "B", "C", "D"]);
        assert_eq!(item.correct_index, 3);
    }

    #[test]
    fn malformed_items_are_rejected() {
        let bad = [
            json!({"options": ["A", "B", "C", "D"], "correct_index": 0}),
            json!({"question": "Q", "correct_index": 0}),
            json!({"question": "Q", "options": ["A", "B", "C"], "correct_index": 0}),
            json!({"question": "Q", "options": ["A", "B", "C", "D", "E"], "correct_index": 0}),
            json!({"question": "Q", "options": ["A", "B", "B", "D"], "correct_index": 0}),
            json!({"question": "Q", "options": ["A", "B", 3, "D"], "correct_index": 0}),
            json!({"question": "Q", "options": ["A", "B", "C", "D"], "correct_index": 4}),
            json!({"question": "Q", "options": ["A", "B", "C", "D"], "correct_index": -1}),
            json!({"question": "Q", "options": ["A", "B", "C", "D"]}),
            json!("just a string"),
        ];
        for value in bad {
            assert_eq!(QuizItem::from_value(&value), None, "item: {}", value);
        }
    }
}

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::models::quiz::QuizItem;

#[derive(Debug, Error)]
pub enum QuizParseError {
    #[error("No JSON array found in model output")]
    NoArray,
    #[error("Model output is not a valid JSON array: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Slice from the first `[` to the last `]`, inclusive.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parses the array embedded in the model's reply and keeps the well-formed items.
pub fn parse_quiz_items(text: &str) -> Result<Vec<QuizItem>, QuizParseError> {
    let slice = extract_json_array(text).ok_or(QuizParseError::NoArray)?;
    let values: Vec<Value> = serde_json::from_str(slice)?;
    let total = values.len();

    let items: Vec<QuizItem> = values.iter().filter_map(QuizItem::from_value).collect();
    if items.len() < total {
        debug!("Dropped {} malformed quiz item(s) out of {}", total - items.len(), total);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_is_found_inside_prose() {
        let text = r#"Sure! [{"question":"Q1","options":["A","B","C","D"],"correct_index":1}] Hope that helps!"#;
        let items = parse_quiz_items(text).unwrap();
        assert_eq!(
            items,
            vec![QuizItem {
                question: "Q1".to_string(),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_index: 1,
            }]
        );
    }

    #[test]
    fn extraction_spans_first_open_to_last_close() {
        assert_eq!(extract_json_array("x [1, [2]] y ]"), Some("[1, [2]] y ]"));
        assert_eq!(extract_json_array("no brackets"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
        assert_eq!(extract_json_array("only [ open"), None);
    }

    #[test]
    fn missing_array_is_an_error() {
        assert!(matches!(parse_quiz_items("I cannot help with that."), Err(QuizParseError::NoArray)));
    }

    #[test]
    fn unparseable_slice_is_an_error() {
        assert!(matches!(
            parse_quiz_items("[{\"question\": \"Q\",] and more]"),
            Err(QuizParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn malformed_items_are_dropped_silently() {
        let text = r#"```json
[
  {"question":"Q1","options":["A","B","C","D"],"correct_index":0},
  {"question":"Q2","options":["A","B","C"],"correct_index":0},
  {"question":"Q3","correct_index":2},
  {"question":"Q4","options":["W","X","Y","Z"],"correct_index":2}
]
```"#;
        let items = parse_quiz_items(text).unwrap();
        let questions: Vec<&str> = items.iter().map(|i| i.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q4"]);
    }

    #[test]
    fn empty_array_is_not_an_error() {
        assert!(parse_quiz_items("[]").unwrap().is_empty());
    }
}

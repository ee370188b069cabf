use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

#[derive(Debug, Clone)]
pub struct RecipientName(String);

impl RecipientName {
    pub fn parse(s: String) -> Result<RecipientName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > MAX_GRAPHEMES;
        // Names reach the templates verbatim, so only control characters are refused.
        let contains_control_characters = s.chars().any(char::is_control);

        if is_empty_or_whitespace || is_too_long || contains_control_characters {
            Err(format!("{} is not a valid recipient name.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for RecipientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

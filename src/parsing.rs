use crate::prompts::RESPONSE_MARKER;

/// Extract the model's answer from the full generated text (prompt + continuation).
///
/// Returns everything after the last `### Response:\n` marker. This is a plain
/// substring split: if the model repeats the marker inside its own answer only
/// the part after the final repetition survives, and if the marker is missing
/// altogether the whole text is returned unchanged (prompt echo included).
pub fn extract_response(generated_text: &str) -> &str {
    match generated_text.rfind(RESPONSE_MARKER) {
        Some(pos) => &generated_text[pos + RESPONSE_MARKER.len()..],
        None => generated_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::instruction_prompt;

    #[test]
    fn test_extract_after_marker() {
        let text = "Below is an instruction.\n\n### Response:\nHELLO";
        assert_eq!(extract_response(text), "HELLO");
    }

    #[test]
    fn test_extract_without_marker_returns_input() {
        let text = "The model never wrote the marker.";
        assert_eq!(extract_response(text), text);
    }

    #[test]
    fn test_marker_without_newline_is_not_a_match() {
        let text = "### Instruction:\nHi\n\n### Response: inline";
        assert_eq!(extract_response(text), text);
    }

    #[test]
    fn test_extract_uses_last_marker() {
        let text = "### Response:\nfirst\n### Response:\nsecond";
        assert_eq!(extract_response(text), "second");
    }

    #[test]
    fn test_extract_marker_at_end() {
        assert_eq!(extract_response("prompt\n### Response:\n"), "");
    }

    #[test]
    fn test_extract_empty_text() {
        assert_eq!(extract_response(""), "");
    }

    #[test]
    fn test_extract_from_echoed_prompt() {
        let prompt = instruction_prompt("Name a color", Some("warm colors"));
        let generated = format!("{prompt}\nRed\n\nOrange");
        assert_eq!(extract_response(&generated), "Red\n\nOrange");
    }
}

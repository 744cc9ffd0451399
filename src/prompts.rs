/// Opening sentence shared by both prompt variants
pub const PREAMBLE: &str = "Below is an instruction that describes a task, paired with an input that provides further context. Write a response that appropriately completes the request.";

/// Marker that precedes the model's continuation in the generated text
pub const RESPONSE_MARKER: &str = "### Response:\n";

/// What the user asked for, with or without auxiliary input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Instruction(String),
    WithContext { instruction: String, context: String },
}

impl PromptInput {
    /// Pick the variant from raw form values.
    ///
    /// Any non-empty context counts as present, whitespace included.
    pub fn new(instruction: impl Into<String>, context: Option<&str>) -> Self {
        let instruction = instruction.into();
        match context {
            Some(context) if !context.is_empty() => PromptInput::WithContext {
                instruction,
                context: context.to_string(),
            },
            _ => PromptInput::Instruction(instruction),
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            PromptInput::Instruction(instruction) => instruction,
            PromptInput::WithContext { instruction, .. } => instruction,
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            PromptInput::Instruction(_) => None,
            PromptInput::WithContext { context, .. } => Some(context),
        }
    }
}

/// Build the instruction-tuning prompt.
///
/// Sections are emitted verbatim; only the assembled string is trimmed, so
/// whitespace inside the instruction or input reaches the model untouched.
pub fn build_prompt(input: &PromptInput) -> String {
    let mut prompt = format!("{PREAMBLE}\n\n### Instruction:\n{}\n\n", input.instruction());

    if let Some(context) = input.context() {
        prompt.push_str("### Input:\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str(RESPONSE_MARKER);
    prompt.trim().to_string()
}

/// Build the prompt straight from raw form values
pub fn instruction_prompt(instruction: &str, context: Option<&str>) -> String {
    build_prompt(&PromptInput::new(instruction, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let prompt = instruction_prompt("Summarize", None);
        assert!(prompt.starts_with(PREAMBLE));
        assert!(prompt.ends_with("### Response:"));
        assert!(!prompt.contains("### Input:"));
        assert!(prompt.contains("### Instruction:\nSummarize\n\n### Response:"));
    }

    #[test]
    fn test_empty_context_uses_instruction_only_template() {
        assert_eq!(
            instruction_prompt("Summarize", Some("")),
            instruction_prompt("Summarize", None)
        );
        assert_eq!(
            PromptInput::new("Summarize", Some("")),
            PromptInput::Instruction("Summarize".to_string())
        );
    }

    #[test]
    fn test_prompt_with_context_orders_sections() {
        let prompt = instruction_prompt("Translate to French", Some("Good morning"));

        let instruction = prompt.find("### Instruction:\nTranslate to French").unwrap();
        let input = prompt.find("### Input:\nGood morning").unwrap();
        let response = prompt.rfind("### Response:").unwrap();

        assert!(instruction < input);
        assert!(input < response);
        assert!(prompt.ends_with("### Response:"));
    }

    #[test]
    fn test_exact_prompt_with_context() {
        let expected = format!(
            "{PREAMBLE}\n\n### Instruction:\nAdd the numbers\n\n### Input:\n2 3\n\n### Response:"
        );
        assert_eq!(instruction_prompt("Add the numbers", Some("2 3")), expected);
    }

    #[test]
    fn test_whitespace_context_is_present() {
        let prompt = instruction_prompt("Describe", Some("  "));
        assert!(prompt.contains("### Input:\n  \n\n### Response:"));
    }

    #[test]
    fn test_prompt_has_no_outer_whitespace() {
        for input in [
            PromptInput::new("  padded  ", None),
            PromptInput::new("\nnewlines\n", Some("\ncontext\n")),
            PromptInput::new("", None),
        ] {
            let prompt = build_prompt(&input);
            assert_eq!(prompt, prompt.trim());
        }
    }

    #[test]
    fn test_section_whitespace_is_preserved() {
        let prompt = instruction_prompt("  indented", Some("line one\n\n  line two  "));
        assert!(prompt.contains("### Instruction:\n  indented\n"));
        assert!(prompt.contains("### Input:\nline one\n\n  line two  \n"));
    }

    #[test]
    fn test_empty_instruction_is_accepted() {
        let prompt = instruction_prompt("", None);
        assert!(prompt.contains("### Instruction:\n\n\n### Response:"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let input = PromptInput::new("Write a haiku", Some("autumn"));
        assert_eq!(build_prompt(&input), build_prompt(&input));
    }

    #[test]
    fn test_special_characters_pass_through() {
        let prompt = instruction_prompt("<b>{x}</b> ### Response:", None);
        assert!(prompt.contains("### Instruction:\n<b>{x}</b> ### Response:\n"));
    }
}

//! The prompt template sent to the completion service.
//!
//! Keeping the template here lets unit tests inspect exactly what the model
//! receives without a running server.

/// Instruction pre-filled in the CLI and the web form.
pub const DEFAULT_INSTRUCTION: &str =
    "Generate a detailed document describing the inputs, outputs, and design of the provided Python code.";

/// Placeholder replaced by the user instruction.
pub const INSTRUCTION_PLACEHOLDER: &str = "{prompt}";

/// Placeholder replaced by the uploaded source text.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Fixed template with one [`INSTRUCTION_PLACEHOLDER`] followed by one
/// [`CODE_PLACEHOLDER`].
pub const CODE_DOC_TEMPLATE: &str = r#"
You are an expert code analyst. Below is a Python code snippet and a user prompt. Follow the prompt to generate a detailed response in Markdown format.

**User Prompt**: {prompt}

**Python Code**:
```python
{code}
```

Ensure the response is well-structured, clear, and in Markdown format. Focus on describing the inputs, outputs, and design of the code as requested.
"#;

/// Substitute `instruction` and `code` into [`CODE_DOC_TEMPLATE`].
///
/// Both values are inserted verbatim. The template is split around its two
/// placeholders once, so placeholder text that appears inside `instruction`
/// or `code` is left alone.
pub fn fill_prompt(instruction: &str, code: &str) -> String {
    let (head, rest) = CODE_DOC_TEMPLATE
        .split_once(INSTRUCTION_PLACEHOLDER)
        .unwrap_or((CODE_DOC_TEMPLATE, ""));
    let (middle, tail) = rest.split_once(CODE_PLACEHOLDER).unwrap_or((rest, ""));

    let mut out =
        String::with_capacity(head.len() + instruction.len() + middle.len() + code.len() + tail.len());
    out.push_str(head);
    out.push_str(instruction);
    out.push_str(middle);
    out.push_str(code);
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_has_each_placeholder_once_in_order() {
        assert_eq!(CODE_DOC_TEMPLATE.matches(INSTRUCTION_PLACEHOLDER).count(), 1);
        assert_eq!(CODE_DOC_TEMPLATE.matches(CODE_PLACEHOLDER).count(), 1);
        let p = CODE_DOC_TEMPLATE.find(INSTRUCTION_PLACEHOLDER).unwrap();
        let c = CODE_DOC_TEMPLATE.find(CODE_PLACEHOLDER).unwrap();
        assert!(p < c);
    }

    #[test]
    fn fill_inserts_both_values_at_placeholders() {
        let filled = fill_prompt("Explain it.", "print(\"hi\")");
        assert!(filled.contains("**User Prompt**: Explain it.\n"));
        assert!(filled.contains("```python\nprint(\"hi\")\n```"));
        assert!(!filled.contains(INSTRUCTION_PLACEHOLDER));
        assert!(!filled.contains(CODE_PLACEHOLDER));
    }

    #[test]
    fn fill_leaves_rest_of_template_untouched() {
        let instruction = "I";
        let code = "C";
        let filled = fill_prompt(instruction, code);
        let expected = CODE_DOC_TEMPLATE
            .replacen(INSTRUCTION_PLACEHOLDER, instruction, 1)
            .replacen(CODE_PLACEHOLDER, code, 1);
        assert_eq!(filled, expected);
    }

    #[test]
    fn placeholders_inside_values_are_not_expanded() {
        let filled = fill_prompt("show {code} here", "x = '{prompt}'");
        assert!(filled.contains("**User Prompt**: show {code} here"));
        assert!(filled.contains("x = '{prompt}'"));
        // The instruction's literal {code} did not swallow the source.
        assert_eq!(filled.matches("x = '{prompt}'").count(), 1);
    }

    #[test]
    fn empty_and_multiline_values_are_accepted() {
        let code = "def f(a):\n    return a\n";
        let filled = fill_prompt("", code);
        assert!(filled.contains("**User Prompt**: \n"));
        assert!(filled.contains(code));
    }
}

//! Instruction templates
//!
//! The fixed strings wrapped around every query, kept as versioned constants
//! so their structure can be asserted independent of wording. Assembly order
//! is always preamble, context, question, suffix.

pub const TEMPLATE_VERSION: &str = "v1";

/// Persona, formatting, and behavioral directives. Sent before the context.
pub const PROMPT_PREFIX: &str = "\
You are the Askdata analyst, answering questions about data the user has just uploaded.
- Answer as a knowledgeable human analyst; never describe yourself as a program.
- Keep answers to simple questions brief and to the point, without narrating your working.
- Present tabular results as Markdown tables.
- Format numbers of four or more digits with thousands separators.
- Respond in clean Markdown and never emit raw HTML tags.";

/// Methodology, self-check, and citation directives. Sent after the question.
pub const PROMPT_SUFFIX: &str = "\
Before giving the final answer, work the question a second way and compare the results.
- If the two methods disagree, reflect and try again until two methods agree.
- If you still cannot reach a consistent result, say that you are not sure of the answer.
- Use only the provided context and your own calculations on it; never fill in figures from prior knowledge.
- As part of the final answer, add a section starting with \"Explanation:\" describing how you reached it, naming any column names you used.";

/// Concatenate the full prompt. `context` is absent for direct search
/// questions, which get the same instruction envelope with no context block.
pub fn assemble(context: Option<&str>, question: &str) -> String {
    match context {
        Some(context) => format!(
            "{}\nContext:\n{}\nQuestion: {}\n{}",
            PROMPT_PREFIX, context, question, PROMPT_SUFFIX
        ),
        None => format!("{}\nQuestion: {}\n{}", PROMPT_PREFIX, question, PROMPT_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_order_is_fixed() {
        let prompt = assemble(Some("Total Rows: 2"), "What is the total of val?");

        let prefix = prompt.find(PROMPT_PREFIX).unwrap();
        let context = prompt.find("Context:\nTotal Rows: 2").unwrap();
        let question = prompt.find("Question: What is the total of val?").unwrap();
        let suffix = prompt.find(PROMPT_SUFFIX).unwrap();

        assert!(prefix < context);
        assert!(context < question);
        assert!(question < suffix);
    }

    #[test]
    fn test_direct_search_has_no_context_block() {
        let prompt = assemble(None, "hello there");
        assert!(!prompt.contains("Context:"));
        assert!(prompt.contains("Question: hello there"));
        assert!(prompt.starts_with(PROMPT_PREFIX));
        assert!(prompt.ends_with(PROMPT_SUFFIX));
    }

    #[test]
    fn test_template_structure_is_stable() {
        assert_eq!(TEMPLATE_VERSION, "v1");
        // the self-check and citation directives the suffix must carry
        assert!(PROMPT_SUFFIX.contains("Explanation:"));
        assert!(PROMPT_SUFFIX.contains("column names"));
        // the persona directive the preamble must carry
        assert!(PROMPT_PREFIX.contains("Askdata analyst"));
    }
}

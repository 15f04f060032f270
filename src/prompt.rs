//! Per-language prompt templates

use log::trace;

const PYTHON_TEMPLATE: &str = "\
Write Python code for the following task.
Requirements:
- Use Pythonic conventions
- Format Markdown
- Include comments for complex logic
- Handle edge cases and include error handling
- Use type hints where appropriate

Task description:
{prompt}

Please provide only the code without explanation:";

const JAVASCRIPT_TEMPLATE: &str = "\
Write JavaScript code for the following task.
Requirements:
- Use modern ES6+ syntax
- Format Markdown
- Follow JavaScript best practices
- Include error handling
- Add JSDoc comments for functions

Task description:
{prompt}

Please provide only the code without explanation:";

const CPP_TEMPLATE: &str = "\
Write C++ code for the following task.
Requirements:
- Follow modern C++ conventions
- Format Markdown
- Include proper error handling
- Use appropriate STL containers
- Add comments for complex logic

Task description:
{prompt}

Please provide only the code without explanation:";

/// Used for any language without a template of its own
pub const GENERIC_TEMPLATE: &str
  = "Write code in {language} for the following task:\n{prompt}";

/// Renders a task description into a model-ready prompt
pub struct PromptFormatter;

impl PromptFormatter
{   /// Languages with a dedicated template
    pub const LANGUAGES: [&'static str; 3]
      = ["python", "javascript", "cpp"];

    pub fn template(language: &str) -> Option<&'static str>
    {   match language
        {   "python" => Some(PYTHON_TEMPLATE)
          , "javascript" => Some(JAVASCRIPT_TEMPLATE)
          , "cpp" => Some(CPP_TEMPLATE)
          , _ => None
        }
    }

    /// Format `task` for `language`, falling back to the generic
    /// template. The task text is substituted last so braces
    /// inside it are left alone.
    pub fn format(task: &str, language: &str) -> String
    {   let template = Self::template(language)
          .unwrap_or(GENERIC_TEMPLATE);
        let formatted = template
          .replace("{language}", language)
          .replace("{prompt}", task);
        trace!("Formatted prompt for {}:\n{}", language, formatted);
        formatted
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    const TASK: &str = "Implement bubble sort";

    #[test]
    fn known_languages_embed_task()
    {   for language in PromptFormatter::LANGUAGES
        {   let prompt = PromptFormatter::format(TASK, language);
            assert!(prompt.contains(TASK), "{}", language);
            assert!(!prompt.contains("{prompt}"), "{}", language);
            assert!(prompt.ends_with("Please provide only the code without explanation:"));
        }
    }

    #[test]
    fn templates_ask_for_error_handling_and_comments()
    {   for language in PromptFormatter::LANGUAGES
        {   let template = PromptFormatter::template(language).unwrap();
            assert!(template.contains("error handling"), "{}", language);
            assert!(template.to_lowercase().contains("comments"), "{}", language);
        }
    }

    #[test]
    fn unknown_language_uses_generic_template()
    {   let prompt = PromptFormatter::format(TASK, "haskell");
        assert_eq!(
          prompt,
          "Write code in haskell for the following task:\nImplement bubble sort"
        );
    }

    #[test]
    fn braces_in_task_survive()
    {   let task = "Return {language} and {prompt} verbatim";
        let prompt = PromptFormatter::format(task, "rust");
        assert!(prompt.starts_with("Write code in rust"));
        assert!(prompt.ends_with(task));
    }

    #[test]
    fn language_names_are_case_sensitive()
    {   let prompt = PromptFormatter::format(TASK, "Python");
        assert!(prompt.starts_with("Write code in Python"));
    }
}

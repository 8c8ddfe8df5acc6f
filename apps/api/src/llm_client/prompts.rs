// Prompt constants for article generation.

/// Topics rotated through when a request names none.
pub const DEFAULT_TOPICS: [&str; 3] = ["Technology", "Environment", "Economy"];

pub const ARTICLE_SYSTEM: &str = "\
You are a professional English-education content writer who creates reading \
material suited to English learners.";

pub const ARTICLE_PROMPT_TEMPLATE: &str = "\
Write a short English article of about 500 words on the topic \"{topic}\", suitable \
for high-school students with a vocabulary of around 2500 words.\n\
\n\
REQUIREMENTS:\n\
1. Use Markdown.\n\
2. The article must have one clear main title (format: # Title).\n\
3. The article must have 2-3 sub-headings (format: ## Sub-heading).\n\
4. Keep new words (beyond a 2500-word high-school vocabulary) between 5% and 10% of \
the text, roughly 25-50 words.\n\
5. Make the content interesting and practical.\n\
6. Do NOT append a vocabulary list or glossary at the end.";

/// Fills the article prompt for one topic.
pub fn article_prompt(topic: &str) -> String {
    ARTICLE_PROMPT_TEMPLATE.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_prompt_inserts_topic() {
        let prompt = article_prompt("Economy");
        assert!(prompt.contains("on the topic \"Economy\""));
        assert!(!prompt.contains("{topic}"));
    }
}

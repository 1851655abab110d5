//! Keyword classifier that picks a fallback reply category.
//!
//! Input is trimmed and lower-cased, then checked for substring matches
//! against an ordered list of keyword rules. The first rule with a match
//! wins; anything unmatched (including empty input) is `Default`.

use super::phrases::{FallbackCategory, FallbackTable};

/// One category and the keywords that select it.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub category: FallbackCategory,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    /// Keywords are stored lower-cased so matching is case-insensitive.
    pub fn new(category: FallbackCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && normalized.contains(k.as_str()))
    }
}

/// Ordered keyword classifier.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<KeywordRule>,
}

impl PatternMatcher {
    /// Build a matcher from rules in priority order.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Built-in Thai and English keyword table.
    pub fn builtin() -> Self {
        Self::new(vec![
            KeywordRule::new(
                FallbackCategory::Greeting,
                &["สวัสดี", "หวัดดี", "ดีจ้า", "สบายดีไหม", "hello", "good morning", "good evening"],
            ),
            KeywordRule::new(
                FallbackCategory::Help,
                &["ช่วย", "วิธีใช้", "ทำอะไรได้", "help", "how to", "what can you do"],
            ),
            KeywordRule::new(
                FallbackCategory::Blog,
                &[
                    "บทความ", "โพสต์", "บล็อก", "ติดตาม", "กดถูกใจ", "คอมเมนต์", "post", "blog",
                    "article", "follow", "comment",
                ],
            ),
            KeywordRule::new(
                FallbackCategory::Coding,
                &[
                    "โค้ด", "เขียนโปรแกรม", "บั๊ก", "code", "coding", "bug", "error", "rust",
                    "javascript", "react", "python",
                ],
            ),
            KeywordRule::new(
                FallbackCategory::Thanks,
                &["ขอบคุณ", "ขอบใจ", "thank", "thx"],
            ),
            KeywordRule::new(
                FallbackCategory::Goodbye,
                &["ลาก่อน", "บาย", "ไปก่อนนะ", "bye", "see you"],
            ),
        ])
    }

    /// Pick the reply category for a piece of user input.
    pub fn classify(&self, input: &str) -> FallbackCategory {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return FallbackCategory::Default;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.category)
            .unwrap_or(FallbackCategory::Default)
    }

    /// Classify the input and take the next phrase for its category.
    pub fn respond(&self, input: &str, table: &FallbackTable) -> (FallbackCategory, String) {
        let category = self.classify(input);
        (category, table.pick(category).to_string())
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

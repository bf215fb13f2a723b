//! Keyword-based domain guessing for free-text target content.
//!
//! # Responsibility
//! - Hold the ordered `(domain, keywords)` rule table as plain data.
//! - Suggest a domain while a target's content is being typed.
//!
//! # Invariants
//! - Rules are evaluated in table order; the first rule with any keyword
//!   contained in the lower-cased text wins. Match counts are ignored.
//! - Matching is substring-based, not whole-word (`đi` matches `điệu`).
//! - Classification never mutates the table and never fails.

use crate::model::target::Domain;
use once_cell::sync::Lazy;

static DEFAULT_RULES: Lazy<KeywordRules> = Lazy::new(|| {
    KeywordRules::new(vec![
        DomainRule::new(
            Domain::Physical,
            [
                "thể chất", "vận động", "đi", "chạy", "nhảy", "bò", "trèo", "ném", "bắt", "tung",
                "leo", "bật", "physical", "move",
            ],
        ),
        DomainRule::new(
            Domain::Cognitive,
            [
                "nhận thức", "số", "hình", "toán", "khoa học", "khám phá", "tìm hiểu", "đếm",
                "màu", "to", "nhỏ", "cognitive",
            ],
        ),
        DomainRule::new(
            Domain::Language,
            [
                "ngôn ngữ", "nói", "nghe", "truyện", "thơ", "chữ", "đọc", "kể", "phát âm", "từ",
                "câu", "language",
            ],
        ),
        DomainRule::new(
            Domain::SocialEmotional,
            [
                "tình cảm", "kỹ năng", "xã hội", "ứng xử", "tự lập", "quy tắc", "cảm xúc",
                "vệ sinh", "chào", "social", "emotional",
            ],
        ),
        DomainRule::new(
            Domain::Aesthetic,
            [
                "thẩm mỹ", "vẽ", "nặn", "xé", "dán", "hát", "múa", "âm nhạc", "nghệ thuật",
                "tô màu", "aesthetic",
            ],
        ),
    ])
});

/// One classifier rule: a domain and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRule {
    pub domain: Domain,
    /// Stored lower-cased.
    pub keywords: Vec<String>,
}

impl DomainRule {
    pub fn new<I, S>(domain: Domain, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domain,
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

/// Ordered, precedence-based rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRules {
    rules: Vec<DomainRule>,
}

impl KeywordRules {
    pub fn new(rules: Vec<DomainRule>) -> Self {
        Self { rules }
    }

    /// The built-in table: Physical, Cognitive, Language, Social-Emotional,
    /// Aesthetic.
    pub fn builtin() -> &'static KeywordRules {
        &DEFAULT_RULES
    }

    pub fn rules(&self) -> &[DomainRule] {
        &self.rules
    }

    /// Returns the domain of the first rule matching `text`, or `None`.
    pub fn classify(&self, text: &str) -> Option<Domain> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.domain)
    }
}

/// Classifies `text` with the built-in rule table.
pub fn classify_domain(text: &str) -> Option<Domain> {
    KeywordRules::builtin().classify(text)
}

/// Returns the classified domain, or keeps `current` when nothing matches.
pub fn suggest_domain(text: &str, current: Domain) -> Domain {
    classify_domain(text).unwrap_or(current)
}

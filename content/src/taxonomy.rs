//! The closed tag vocabulary and hint categories.
//!
//! Item tags are restricted to a fixed taxonomy in five groups. The groups
//! are part of the content contract with client apps and authoring tools;
//! a tag outside them is a validation error, never silently accepted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Grammar-structure tags.
pub const GRAMMAR_STRUCTURE_TAGS: [&str; 18] = [
    "subjunctive",
    "conditional",
    "cleft",
    "inversion",
    "emphasis",
    "comparative",
    "superlative",
    "passive",
    "modal",
    "infinitive",
    "gerund",
    "participle",
    "relative-clause",
    "noun-clause",
    "adverb-clause",
    "as-clause",
    "complex-sentence",
    "grammar",
];

/// Specific-structure tags (fixed multi-word patterns).
pub const SPECIFIC_STRUCTURE_TAGS: [&str; 15] = [
    "as-adjective-as",
    "as-soon-as",
    "as-long-as",
    "as-far-as",
    "the-more-the-more",
    "would-rather",
    "had-better",
    "used-to",
    "be-used-to",
    "too-to",
    "so-that",
    "such-that",
    "not-only-but-also",
    "either-or",
    "neither-nor",
];

/// Communicative-function tags.
pub const FUNCTION_TAGS: [&str; 19] = [
    "advice",
    "warning",
    "request",
    "permission",
    "prohibition",
    "suggestion",
    "offer",
    "invitation",
    "complaint",
    "apology",
    "opinion",
    "preference",
    "regret",
    "possibility",
    "necessity",
    "ability",
    "purpose",
    "result",
    "cause",
];

/// Semantic-theme tags.
pub const THEME_TAGS: [&str; 18] = [
    "family",
    "education",
    "career",
    "health",
    "money",
    "relationship",
    "travel",
    "food",
    "sports",
    "entertainment",
    "technology",
    "environment",
    "culture",
    "business",
    "academic",
    "personal",
    "social",
    "daily-life",
];

/// Tense tags.
pub const TENSE_TAGS: [&str; 8] = [
    "present-simple",
    "present-continuous",
    "present-perfect",
    "past-simple",
    "past-continuous",
    "past-perfect",
    "future-simple",
    "future-perfect",
];

/// The group a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    GrammarStructure,
    SpecificStructure,
    Function,
    Theme,
    Tense,
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagCategory::GrammarStructure => write!(f, "grammar-structure"),
            TagCategory::SpecificStructure => write!(f, "specific-structure"),
            TagCategory::Function => write!(f, "function"),
            TagCategory::Theme => write!(f, "theme"),
            TagCategory::Tense => write!(f, "tense"),
        }
    }
}

static TAG_INDEX: LazyLock<HashMap<&'static str, TagCategory>> = LazyLock::new(|| {
    let groups: [(&[&'static str], TagCategory); 5] = [
        (&GRAMMAR_STRUCTURE_TAGS, TagCategory::GrammarStructure),
        (&SPECIFIC_STRUCTURE_TAGS, TagCategory::SpecificStructure),
        (&FUNCTION_TAGS, TagCategory::Function),
        (&THEME_TAGS, TagCategory::Theme),
        (&TENSE_TAGS, TagCategory::Tense),
    ];
    let mut index = HashMap::new();
    for (tags, category) in groups {
        for tag in tags {
            index.insert(*tag, category);
        }
    }
    index
});

/// Check whether a tag belongs to the taxonomy.
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_INDEX.contains_key(tag)
}

/// Look up the group of a tag, if it is in the taxonomy.
pub fn category_of(tag: &str) -> Option<TagCategory> {
    TAG_INDEX.get(tag).copied()
}

/// Total number of permitted tags.
pub fn tag_count() -> usize {
    TAG_INDEX.len()
}

/// Category of a hint attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintCategory {
    Morphological,
    Syntactic,
    Lexical,
    Phonological,
    Pragmatic,
}

impl HintCategory {
    /// Parse a hint category from its wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "morphological" => Some(HintCategory::Morphological),
            "syntactic" => Some(HintCategory::Syntactic),
            "lexical" => Some(HintCategory::Lexical),
            "phonological" => Some(HintCategory::Phonological),
            "pragmatic" => Some(HintCategory::Pragmatic),
            _ => None,
        }
    }
}

impl std::fmt::Display for HintCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HintCategory::Morphological => write!(f, "morphological"),
            HintCategory::Syntactic => write!(f, "syntactic"),
            HintCategory::Lexical => write!(f, "lexical"),
            HintCategory::Phonological => write!(f, "phonological"),
            HintCategory::Pragmatic => write!(f, "pragmatic"),
        }
    }
}

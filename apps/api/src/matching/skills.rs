//! Skill & keyword extraction. Advisory only: nothing here feeds the similarity score.

use std::collections::BTreeSet;

use regex::Regex;

pub const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "c++",
    "html",
    "css",
    "sql",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "spring",
    "mysql",
    "postgresql",
    "mongodb",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "jenkins",
    "linux",
    "windows",
    "machine learning",
    "data science",
    "artificial intelligence",
    "deep learning",
];

pub const SOFT_SKILLS: &[&str] = &[
    "project management",
    "agile",
    "scrum",
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "creative",
    "detail oriented",
];

/// Characters that continue a skill token: a match must not be flanked by them, so
/// "java" does not fire inside "javascript" and "c++" still matches before a space.
const TOKEN_CHARS: &str = r"\w+#";

#[derive(Debug, Clone)]
struct SkillPattern {
    name: String,
    regex: Regex,
}

/// Compiled technical + soft skill vocabularies, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    patterns: Vec<SkillPattern>,
}

impl SkillVocabulary {
    pub fn new<I, S>(technical: I, soft: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for skill in technical.into_iter().chain(soft) {
            let name = skill.as_ref().trim().to_lowercase();
            if name.is_empty() || patterns.iter().any(|p: &SkillPattern| p.name == name) {
                continue;
            }
            let regex = compile_skill(&name)?;
            patterns.push(SkillPattern { name, regex });
        }
        Ok(Self { patterns })
    }

    pub fn builtin() -> Result<Self, regex::Error> {
        Self::new(
            TECHNICAL_SKILLS.iter().copied(),
            SOFT_SKILLS.iter().copied(),
        )
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Case-insensitive skill matches in `text`, deduplicated.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.name.clone())
            .collect()
    }
}

/// Multi-word skills tolerate any run of whitespace or hyphens between words.
fn compile_skill(name: &str) -> Result<Regex, regex::Error> {
    let body = name
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\s\-]+");
    Regex::new(&format!(
        r"(?i)(?:^|[^{TOKEN_CHARS}]){body}(?:$|[^{TOKEN_CHARS}])"
    ))
}

/// Tokens present in both normalized token lists with at least `min_len` chars,
/// sorted alphabetically and capped at `limit`.
pub fn matching_keywords(
    resume_tokens: &[String],
    jd_tokens: &[String],
    limit: usize,
    min_len: usize,
) -> Vec<String> {
    let resume: BTreeSet<&str> = resume_tokens.iter().map(String::as_str).collect();
    let jd: BTreeSet<&str> = jd_tokens.iter().map(String::as_str).collect();

    resume
        .intersection(&jd)
        .filter(|token| token.chars().count() >= min_len)
        .take(limit)
        .map(|token| token.to_string())
        .collect()
}

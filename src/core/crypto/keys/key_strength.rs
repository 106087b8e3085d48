use crate::shared::constants::ENCRYPTION_KEY_MIN_LENGTH;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered strength bands, weakest first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
    VeryStrong,
}

/// Heuristic key-strength assessment
///
/// Derived purely from the key string and recomputed on demand, never cached.
/// The entropy term is the Shannon entropy of the key's own character
/// frequency distribution, an intra-string diversity heuristic rather than a
/// measure of the randomness that generated the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyStrength {
    pub score: u8,
    pub level: StrengthLevel,
    pub entropy: f64,
    pub feedback: Vec<String>,
}

/// Shannon entropy of the character distribution, rounded to two decimals
pub fn calculate_entropy(value: &str) -> f64 {
    let total = value.chars().count();
    if total == 0 {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in value.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    let total = total as f64;
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    (entropy * 100.0).round() / 100.0
}

/// Analyze the strength of a key string
///
/// Weighted contributions from length (capped), presence of each of four
/// character classes, and the character-diversity entropy term.
pub fn analyze_key_strength(key: &str) -> KeyStrength {
    let entropy = calculate_entropy(key);
    let length = key.chars().count();
    let mut feedback = Vec::new();

    let mut score = (length * 4).min(40) as f64;
    score += entropy * 0.5;

    let has_uppercase = key.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = key.chars().any(|c| c.is_ascii_lowercase());
    let has_numbers = key.chars().any(|c| c.is_ascii_digit());
    let has_special = key.chars().any(|c| !c.is_alphanumeric());

    if has_uppercase {
        score += 10.0;
    } else {
        feedback.push("Include uppercase letters".to_string());
    }
    if has_lowercase {
        score += 10.0;
    } else {
        feedback.push("Include lowercase letters".to_string());
    }
    if has_numbers {
        score += 10.0;
    } else {
        feedback.push("Include numbers".to_string());
    }
    if has_special {
        score += 10.0;
    } else {
        feedback.push("Include special characters".to_string());
    }

    if length < ENCRYPTION_KEY_MIN_LENGTH {
        feedback.push(format!(
            "Key should be at least {} characters",
            ENCRYPTION_KEY_MIN_LENGTH
        ));
    }

    let score = score.min(100.0).round() as u8;
    let level = if score < 30 {
        StrengthLevel::VeryWeak
    } else if score < 50 {
        StrengthLevel::Weak
    } else if score < 60 {
        StrengthLevel::Fair
    } else if score < 70 {
        StrengthLevel::Good
    } else if score < 90 {
        StrengthLevel::Strong
    } else {
        StrengthLevel::VeryStrong
    };

    KeyStrength {
        score,
        level,
        entropy,
        feedback,
    }
}

/// Validate the strength of a key string
pub fn validate_key_strength(key: &str) -> KeyStrength {
    analyze_key_strength(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::keys::KeyGenerator;

    #[test]
    fn test_entropy_of_degenerate_strings() {
        assert_eq!(calculate_entropy(""), 0.0);
        assert_eq!(calculate_entropy("aaaa"), 0.0);
        assert_eq!(calculate_entropy("ab"), 1.0);
    }

    #[test]
    fn test_entropy_grows_with_diversity() {
        let uniform = calculate_entropy("abcdefgh");
        let repeated = calculate_entropy("aaaabbbb");
        assert!(uniform > repeated);
    }

    #[test]
    fn test_short_single_class_key_is_very_weak() {
        let strength = analyze_key_strength("abc");
        assert_eq!(strength.level, StrengthLevel::VeryWeak);
        assert!(strength.feedback.iter().any(|f| f.contains("uppercase")));
        assert!(strength.feedback.iter().any(|f| f.contains("numbers")));
        assert!(strength.feedback.iter().any(|f| f.contains("special")));
        assert!(strength.feedback.iter().any(|f| f.contains("at least 16")));
    }

    #[test]
    fn test_mixed_long_key_is_strong() {
        let strength = analyze_key_strength("Tr0ub4dor&3-Extended!Key");
        assert!(strength.score >= 70);
        assert!(strength.level >= StrengthLevel::Strong);
        assert!(strength.feedback.is_empty());
    }

    #[test]
    fn test_score_is_bounded() {
        for key in ["", "a", "Aa1!", &"Aa1!".repeat(100)] {
            let strength = analyze_key_strength(key);
            assert!(strength.score <= 100);
        }
    }

    #[test]
    fn test_generated_keys_score_well() {
        let generator = KeyGenerator::new();
        let key = generator.generate_random_string(64);
        let strength = analyze_key_strength(&key);
        assert!(strength.score >= 70, "generated key scored {}", strength.score);
    }

    #[test]
    fn test_validate_matches_analyze() {
        let key = "SomeKey123!WithLength";
        assert_eq!(validate_key_strength(key), analyze_key_strength(key));
    }

    #[test]
    fn test_level_serde_kebab_case() {
        let json = serde_json::to_string(&StrengthLevel::VeryStrong).unwrap();
        assert_eq!(json, "\"very-strong\"");
    }
}

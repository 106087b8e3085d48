use crate::shared::constants::{
    ENCRYPTION_KEY_MAX_LENGTH, ENCRYPTION_KEY_MIN_LENGTH, MAX_FILENAME_LENGTH, MAX_JSON_DEPTH,
    MAX_REPEATED_CHAR_RUN, MAX_SEQUENTIAL_RUN, MAX_TEXT_INPUT_LENGTH, PASSWORD_MAX_LENGTH,
    PASSWORD_MIN_LENGTH, PASSWORD_REQUIRE_LOWERCASE, PASSWORD_REQUIRE_NUMBERS,
    PASSWORD_REQUIRE_SPECIAL, PASSWORD_REQUIRE_UPPERCASE,
};
use lazy_static::lazy_static;
use regex::Regex;
use super::ValidationResult;

lazy_static! {
    static ref XSS_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap(),
        Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe>").unwrap(),
        Regex::new(r"(?is)<object\b[^>]*>.*?</object>").unwrap(),
        Regex::new(r"(?is)<embed\b[^>]*>").unwrap(),
        Regex::new(r"(?i)javascript:").unwrap(),
        Regex::new(r"(?i)\bon\w+\s*=").unwrap(),
    ];

    static ref SQL_INJECTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(union|select|insert|update|delete|drop|create|alter|exec|execute)\b").unwrap(),
        Regex::new(r"--|/\*|\*/|;").unwrap(),
        Regex::new(r"(?i)\b(and|or)\b\s+\d+\s*=\s*\d+").unwrap(),
    ];

    static ref FILENAME_UNSAFE_CHARS: Regex = Regex::new(r#"[<>:"|?*]"#).unwrap();
    static ref EVENT_HANDLER: Regex = Regex::new(r"(?i)\bon\w+\s*=").unwrap();
    static ref JS_SCHEME: Regex = Regex::new(r"(?i)javascript:").unwrap();
}

/// Passwords rejected outright regardless of composition
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
];

/// Executable-like extensions never accepted in filenames
const DANGEROUS_EXTENSIONS: &[&str] = &[
    ".exe", ".bat", ".cmd", ".com", ".pif", ".scr", ".vbs", ".js",
];

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_text_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_text_length: MAX_TEXT_INPUT_LENGTH,
        }
    }
}

/// Pattern-based threat detection and field-specific structural validation
///
/// Every validator is a pure function over its input: a validity verdict plus
/// a best-effort cleaned value.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    config: ValidationConfig,
}

impl InputValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a password against the toolkit password policy
    pub fn validate_password(&self, password: &str) -> ValidationResult {
        let mut errors = Vec::new();
        let mut sanitized = password.to_string();
        let length = password.chars().count();

        if length < PASSWORD_MIN_LENGTH {
            errors.push(format!(
                "Password must be at least {} characters long",
                PASSWORD_MIN_LENGTH
            ));
        }
        if length > PASSWORD_MAX_LENGTH {
            errors.push(format!(
                "Password must be less than {} characters",
                PASSWORD_MAX_LENGTH
            ));
            sanitized = password.chars().take(PASSWORD_MAX_LENGTH).collect();
        }

        if PASSWORD_REQUIRE_UPPERCASE && !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if PASSWORD_REQUIRE_LOWERCASE && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if PASSWORD_REQUIRE_NUMBERS && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one number".to_string());
        }
        if PASSWORD_REQUIRE_SPECIAL && !password.chars().any(|c| !c.is_alphanumeric()) {
            errors.push("Password must contain at least one special character".to_string());
        }

        if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
            errors.push("Password is too common, please choose a stronger password".to_string());
        }
        if has_repeated_char_run(password, MAX_REPEATED_CHAR_RUN + 1) {
            errors.push("Password contains too many repeated characters".to_string());
        }
        if has_sequential_run(password, MAX_SEQUENTIAL_RUN + 1) {
            errors.push("Password contains sequential characters".to_string());
        }

        ValidationResult::from_errors(errors, sanitized)
    }

    /// Validate an encryption key string
    pub fn validate_encryption_key(&self, key: &str) -> ValidationResult {
        let mut errors = Vec::new();
        let mut sanitized = key.to_string();
        let length = key.chars().count();

        if length < ENCRYPTION_KEY_MIN_LENGTH {
            errors.push(format!(
                "Encryption key must be at least {} characters long",
                ENCRYPTION_KEY_MIN_LENGTH
            ));
        }
        if length > ENCRYPTION_KEY_MAX_LENGTH {
            errors.push(format!(
                "Encryption key must be less than {} characters",
                ENCRYPTION_KEY_MAX_LENGTH
            ));
            sanitized = key.chars().take(ENCRYPTION_KEY_MAX_LENGTH).collect();
        }

        if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push("Encryption key should contain mixed character types".to_string());
        }
        if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
            errors.push("Encryption key should not be only numbers".to_string());
        }
        if has_repeated_pattern(key) {
            errors.push("Encryption key contains repeated patterns".to_string());
        }

        ValidationResult::from_errors(errors, sanitized)
    }

    /// Validate free text against XSS and SQL injection patterns
    ///
    /// Sanitization strips the matched dangerous fragments only, preserving
    /// surrounding text; null bytes are always stripped and over-long text is
    /// truncated.
    pub fn validate_text_input(&self, text: &str) -> ValidationResult {
        let mut errors = Vec::new();
        let mut sanitized = text.to_string();

        if XSS_PATTERNS.iter().any(|pattern| pattern.is_match(text)) {
            errors.push("Input contains potentially dangerous content".to_string());
            sanitized = strip_xss(&sanitized);
        }
        if SQL_INJECTION_PATTERNS.iter().any(|pattern| pattern.is_match(text)) {
            errors.push("Input contains potentially dangerous patterns".to_string());
        }

        if text.contains('\0') {
            errors.push("Input contains null bytes".to_string());
        }
        sanitized = sanitized.replace('\0', "");

        if text.chars().count() > self.config.max_text_length {
            errors.push(format!(
                "Input must be less than {} characters",
                self.config.max_text_length
            ));
            sanitized = sanitized.chars().take(self.config.max_text_length).collect();
        }

        ValidationResult::from_errors(errors, sanitized)
    }

    /// Validate a filename
    pub fn validate_file_name(&self, filename: &str) -> ValidationResult {
        let mut errors = Vec::new();
        let mut sanitized = filename.to_string();
        let lower = filename.to_lowercase();

        if let Some(index) = lower.rfind('.') {
            let extension = &lower[index..];
            if DANGEROUS_EXTENSIONS.contains(&extension) {
                errors.push("File type not allowed".to_string());
            }
        }

        if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
            errors.push("Invalid filename".to_string());
        }

        if filename.chars().count() > MAX_FILENAME_LENGTH {
            errors.push("Filename too long".to_string());
            sanitized = sanitized.chars().take(MAX_FILENAME_LENGTH).collect();
        }

        sanitized = FILENAME_UNSAFE_CHARS.replace_all(&sanitized, "").to_string();

        ValidationResult::from_errors(errors, sanitized)
    }

    /// Validate a URL
    ///
    /// Only http/https schemes are accepted; loopback and private hosts are
    /// rejected by textual prefix checks. The sanitized value is the
    /// re-serialized parse with lowercased scheme and host.
    pub fn validate_url(&self, url: &str) -> ValidationResult {
        let mut errors = Vec::new();

        let Some((scheme, rest)) = url.split_once("://") else {
            errors.push("Invalid URL format".to_string());
            return ValidationResult::from_errors(errors, url.to_string());
        };

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            errors.push("Only HTTP and HTTPS protocols are allowed".to_string());
        }

        let split_at = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, remainder) = rest.split_at(split_at);
        let host_port = authority.rsplit_once('@').map(|(_, host)| host).unwrap_or(authority);
        let host = host_port.split(':').next().unwrap_or("").to_ascii_lowercase();

        if host.is_empty() {
            errors.push("Invalid URL format".to_string());
        } else if host == "localhost"
            || host.starts_with("127.")
            || host.starts_with("192.168.")
            || host.starts_with("10.")
            || host.starts_with("172.")
        {
            errors.push("Local or private network URLs are not allowed".to_string());
        }

        let sanitized = format!("{}://{}{}", scheme, authority.to_ascii_lowercase(), remainder);
        ValidationResult::from_errors(errors, sanitized)
    }

    /// Validate a JSON document
    ///
    /// The parsed value graph is walked with a nesting-depth guard; the
    /// sanitized value is the compact re-serialization.
    pub fn validate_json(&self, json_str: &str) -> ValidationResult {
        match serde_json::from_str::<serde_json::Value>(json_str) {
            Ok(value) => {
                let mut errors = Vec::new();
                if json_depth(&value) > MAX_JSON_DEPTH {
                    errors.push(format!(
                        "JSON nesting exceeds maximum depth of {}",
                        MAX_JSON_DEPTH
                    ));
                }
                let sanitized =
                    serde_json::to_string(&value).unwrap_or_else(|_| json_str.to_string());
                ValidationResult::from_errors(errors, sanitized)
            }
            Err(_) => ValidationResult::from_errors(
                vec!["Invalid JSON format".to_string()],
                json_str.to_string(),
            ),
        }
    }

    /// General-purpose scrubber for untrusted display text
    pub fn sanitize_input(&self, input: &str) -> String {
        let without_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
        let without_scheme = JS_SCHEME.replace_all(&without_brackets, "");
        let without_handlers = EVENT_HANDLER.replace_all(&without_scheme, "");
        without_handlers.trim().to_string()
    }
}

/// Strip matched XSS fragments, preserving surrounding text
fn strip_xss(text: &str) -> String {
    let mut sanitized = text.to_string();
    for pattern in XSS_PATTERNS.iter() {
        sanitized = pattern.replace_all(&sanitized, "").to_string();
    }
    sanitized
}

/// True if the string contains a run of `run` identical characters
fn has_repeated_char_run(value: &str, run: usize) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let mut count = 1;
    for pair in chars.windows(2) {
        if pair[0] == pair[1] {
            count += 1;
            if count >= run {
                return true;
            }
        } else {
            count = 1;
        }
    }
    false
}

/// True if the string contains `run` ascending sequential alphabetic or
/// numeric characters (case-insensitive), e.g. "abc" or "789"
fn has_sequential_run(value: &str, run: usize) -> bool {
    let chars: Vec<char> = value.to_lowercase().chars().collect();
    let mut count = 1;
    for pair in chars.windows(2) {
        let same_class = (pair[0].is_ascii_lowercase() && pair[1].is_ascii_lowercase())
            || (pair[0].is_ascii_digit() && pair[1].is_ascii_digit());
        if same_class && pair[1] as u32 == pair[0] as u32 + 1 {
            count += 1;
            if count >= run {
                return true;
            }
        } else {
            count = 1;
        }
    }
    false
}

/// True if any substring group of length >= 2 repeats >= 3 times contiguously
fn has_repeated_pattern(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let n = chars.len();
    for len in 2..=n / 3 {
        for start in 0..=n - len * 3 {
            let group = &chars[start..start + len];
            if group == &chars[start + len..start + 2 * len]
                && group == &chars[start + 2 * len..start + 3 * len]
            {
                return true;
            }
        }
    }
    false
}

/// Depth of a parsed JSON value graph
fn json_depth(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => 1 + map.values().map(json_depth).max().unwrap_or(0),
        serde_json::Value::Array(items) => 1 + items.iter().map(json_depth).max().unwrap_or(0),
        _ => 1,
    }
}

use crate::core::crypto::encryption::{DecryptionParams, EncryptionManager, EncryptionProfile};
use crate::core::error_handler::ErrorHandler;
use crate::core::rate_limit::RateLimiter;
use crate::core::validation::InputValidator;
use crate::shared::constants::{
    APPROVED_ALGORITHMS, KEY_SIZE, MAX_LOCKOUT_ATTEMPTS, MAX_SESSION_TIMEOUT_SECS,
    MIN_SECURITY_SCORE, PASSWORD_MIN_LENGTH, PBKDF2_ITERATIONS,
    RECOMMENDED_PASSWORD_MIN_LENGTH, SESSION_TIMEOUT_SECS, WEAK_ALGORITHMS,
};
use crate::shared::types::Severity;
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Audit check categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Authentication,
    Encryption,
    InputValidation,
    SessionManagement,
    Configuration,
}

impl IssueCategory {
    /// Score penalty applied per issue in the category
    pub fn penalty_weight(&self) -> u32 {
        match self {
            IssueCategory::Encryption => 5,
            IssueCategory::Authentication => 10,
            IssueCategory::InputValidation => 8,
            IssueCategory::SessionManagement => 7,
            IssueCategory::Configuration => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Authentication => "authentication",
            IssueCategory::Encryption => "encryption",
            IssueCategory::InputValidation => "input_validation",
            IssueCategory::SessionManagement => "session_management",
            IssueCategory::Configuration => "configuration",
        }
    }
}

/// A single finding produced by an audit check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub id: String,
    pub severity: Severity,
    pub category: IssueCategory,
    pub description: String,
    pub remediation: String,
    /// CWE identifier when one applies
    pub reference_id: Option<String>,
}

impl SecurityIssue {
    fn new(
        id: &str,
        severity: Severity,
        category: IssueCategory,
        description: impl Into<String>,
        remediation: impl Into<String>,
        reference_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            category,
            description: description.into(),
            remediation: remediation.into(),
            reference_id: reference_id.map(str::to_string),
        }
    }
}

/// Result of a full audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAuditResult {
    pub timestamp: DateTime<Utc>,
    pub score: u8,
    pub issues: Vec<SecurityIssue>,
    pub recommendations: Vec<String>,
    pub passed: bool,
}

/// Clamp-scored penalty aggregation over a set of issues
pub fn score_issues(issues: &[SecurityIssue]) -> u8 {
    let penalty: u32 = issues.iter().map(|issue| issue.category.penalty_weight()).sum();
    100u32.saturating_sub(penalty).min(100) as u8
}

/// Security auditor composing posture checks over the toolkit modules
///
/// Reads, never mutates, the state of the rate limiter and error handler it
/// was constructed with; the validator and crypto paths are exercised with
/// live canary probes.
pub struct SecurityAuditor {
    validator: InputValidator,
    rate_limiter: Arc<RateLimiter>,
    error_handler: Arc<ErrorHandler>,
}

impl SecurityAuditor {
    pub fn new(rate_limiter: Arc<RateLimiter>, error_handler: Arc<ErrorHandler>) -> Self {
        Self {
            validator: InputValidator::default(),
            rate_limiter,
            error_handler,
        }
    }

    /// Run every check and aggregate the findings into one report
    pub async fn run_full_audit(&self) -> SecurityAuditResult {
        let mut issues = Vec::new();

        issues.extend(self.audit_encryption());
        issues.extend(self.audit_authentication());
        issues.extend(self.audit_input_validation());
        issues.extend(self.audit_session_management());
        issues.extend(self.audit_configuration().await);

        let score = score_issues(&issues);
        let recommendations = generate_recommendations(&issues);

        SecurityAuditResult {
            timestamp: Utc::now(),
            score,
            issues,
            recommendations,
            passed: score >= MIN_SECURITY_SCORE,
        }
    }

    /// Encryption-algorithm posture
    fn audit_encryption(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        for algorithm in APPROVED_ALGORITHMS {
            if WEAK_ALGORITHMS.iter().any(|weak| algorithm.contains(weak)) {
                issues.push(SecurityIssue::new(
                    "CRYPTO_WEAK_ALGORITHM",
                    Severity::Critical,
                    IssueCategory::Encryption,
                    format!("Weak encryption algorithm in use: {}", algorithm),
                    "Replace with AES-256-GCM and SHA-2 family digests",
                    Some("CWE-327"),
                ));
            }
        }

        if KEY_SIZE * 8 < 256 {
            issues.push(SecurityIssue::new(
                "CRYPTO_SHORT_KEY",
                Severity::High,
                IssueCategory::Encryption,
                format!("Encryption key length {} bits is below 256 bits", KEY_SIZE * 8),
                "Use keys with minimum 256-bit length",
                Some("CWE-326"),
            ));
        }

        if PBKDF2_ITERATIONS < 100_000 {
            issues.push(SecurityIssue::new(
                "CRYPTO_WEAK_KDF",
                Severity::High,
                IssueCategory::Encryption,
                format!(
                    "PBKDF2 iteration count {} is below the recommended 100000",
                    PBKDF2_ITERATIONS
                ),
                "Raise the key-derivation work factor to at least 100000 iterations",
                Some("CWE-916"),
            ));
        }

        issues
    }

    /// Authentication-policy posture
    fn audit_authentication(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        if PASSWORD_MIN_LENGTH < RECOMMENDED_PASSWORD_MIN_LENGTH {
            issues.push(SecurityIssue::new(
                "AUTH_WEAK_PASSWORD_POLICY",
                Severity::Medium,
                IssueCategory::Authentication,
                format!(
                    "Password minimum length {} is below the recommended {}",
                    PASSWORD_MIN_LENGTH, RECOMMENDED_PASSWORD_MIN_LENGTH
                ),
                format!(
                    "Increase minimum password length to {} characters",
                    RECOMMENDED_PASSWORD_MIN_LENGTH
                ),
                Some("CWE-521"),
            ));
        }

        // MFA is outside this toolkit's scope and cannot be attested here
        issues.push(SecurityIssue::new(
            "AUTH_NO_MFA",
            Severity::Medium,
            IssueCategory::Authentication,
            "Multi-factor authentication is not enabled",
            "Enable MFA for all user accounts",
            Some("CWE-308"),
        ));

        if self.rate_limiter.config().max_attempts > MAX_LOCKOUT_ATTEMPTS {
            issues.push(SecurityIssue::new(
                "AUTH_WEAK_LOCKOUT",
                Severity::Medium,
                IssueCategory::Authentication,
                format!(
                    "Lockout threshold {} exceeds the recommended maximum of {}",
                    self.rate_limiter.config().max_attempts,
                    MAX_LOCKOUT_ATTEMPTS
                ),
                format!("Lower the lockout threshold to at most {} attempts", MAX_LOCKOUT_ATTEMPTS),
                Some("CWE-307"),
            ));
        }

        issues
    }

    /// Input-validation coverage, probed with live canary payloads
    fn audit_input_validation(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        if self.validator.validate_text_input("<script>alert(1)</script>").is_valid {
            issues.push(SecurityIssue::new(
                "INPUT_XSS_VULNERABILITY",
                Severity::High,
                IssueCategory::InputValidation,
                "Cross-site scripting canary was not flagged by text validation",
                "Implement XSS detection and output encoding",
                Some("CWE-79"),
            ));
        }

        if self.validator.validate_text_input("' OR 1=1 --").is_valid {
            issues.push(SecurityIssue::new(
                "INPUT_SQLI_VULNERABILITY",
                Severity::High,
                IssueCategory::InputValidation,
                "SQL injection canary was not flagged by text validation",
                "Implement SQL injection pattern detection",
                Some("CWE-89"),
            ));
        }

        if self.validator.validate_file_name("../../etc/passwd").is_valid {
            issues.push(SecurityIssue::new(
                "INPUT_PATH_TRAVERSAL",
                Severity::High,
                IssueCategory::InputValidation,
                "Path traversal canary was not flagged by filename validation",
                "Reject filenames containing path separators or parent references",
                Some("CWE-22"),
            ));
        }

        issues
    }

    /// Session-management posture
    fn audit_session_management(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        if SESSION_TIMEOUT_SECS > MAX_SESSION_TIMEOUT_SECS {
            issues.push(SecurityIssue::new(
                "SESSION_LONG_TIMEOUT",
                Severity::Medium,
                IssueCategory::SessionManagement,
                "Session timeout is too long",
                "Reduce session timeout to maximum 1 hour",
                Some("CWE-384"),
            ));
        }

        issues
    }

    /// Configuration hygiene, including the recorded-error posture
    async fn audit_configuration(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        if cfg!(debug_assertions) {
            issues.push(SecurityIssue::new(
                "CONFIG_DEBUG_MODE",
                Severity::Low,
                IssueCategory::Configuration,
                "Debug build is in use",
                "Ship release builds in production",
                Some("CWE-215"),
            ));
        }

        let stats = self.error_handler.get_error_stats().await;
        if stats.by_severity.get(&Severity::Critical).copied().unwrap_or(0) > 0 {
            issues.push(SecurityIssue::new(
                "CONFIG_UNRESOLVED_CRITICAL_ERRORS",
                Severity::High,
                IssueCategory::Configuration,
                format!(
                    "{} critical security error(s) are currently recorded",
                    stats.by_severity[&Severity::Critical]
                ),
                "Investigate and resolve recorded critical security errors",
                None,
            ));
        }

        issues
    }

    /// Dependency posture check suitable for CI gating
    pub fn check_dependencies(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        for algorithm in APPROVED_ALGORITHMS {
            if WEAK_ALGORITHMS.iter().any(|weak| algorithm.contains(weak)) {
                issues.push(SecurityIssue::new(
                    "DEPS_WEAK_PRIMITIVE",
                    Severity::High,
                    IssueCategory::Configuration,
                    format!("Approved algorithm list contains weak primitive: {}", algorithm),
                    "Remove weak primitives from the approved list",
                    Some("CWE-1104"),
                ));
            }
        }

        if PBKDF2_ITERATIONS < 100_000 {
            issues.push(SecurityIssue::new(
                "DEPS_WEAK_KDF_DEFAULT",
                Severity::High,
                IssueCategory::Configuration,
                "Default key-derivation work factor is below 100000 iterations",
                "Raise the PBKDF2 iteration default",
                Some("CWE-916"),
            ));
        }

        issues
    }

    /// Crypto implementation probe suitable for CI gating
    ///
    /// Verifies the secure-random primitive and an AEAD round trip actually
    /// work in the running environment.
    pub fn check_crypto_implementation(&self) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();

        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        let mut rng = OsRng;
        rng.fill_bytes(&mut first);
        rng.fill_bytes(&mut second);
        if first == second || first == [0u8; 32] {
            issues.push(SecurityIssue::new(
                "CRYPTO_NO_SECURE_RANDOM",
                Severity::Critical,
                IssueCategory::Encryption,
                "Secure random number generation is not producing distinct output",
                "Ensure the OS CSPRNG is available and used",
                Some("CWE-338"),
            ));
        }

        let manager = EncryptionManager::new();
        let round_trip = manager
            .encrypt("aead-probe", "audit-probe-password", EncryptionProfile::Standard)
            .and_then(|encrypted| {
                manager.decrypt(&DecryptionParams::from_result(&encrypted, "audit-probe-password"))
            });
        if !matches!(round_trip.as_deref(), Ok("aead-probe")) {
            issues.push(SecurityIssue::new(
                "CRYPTO_AEAD_FAILURE",
                Severity::Critical,
                IssueCategory::Encryption,
                "Authenticated encryption round trip failed",
                "Verify the AES-GCM implementation and key derivation path",
                Some("CWE-327"),
            ));
        }

        issues
    }

    /// Render the audit result as a fixed-section textual report
    ///
    /// Sections are populated from the live audit run.
    pub async fn generate_security_report(&self) -> String {
        let result = self.run_full_audit().await;

        let mut report = String::new();
        report.push_str("# Security Audit Report\n\n");

        report.push_str("## Executive Summary\n");
        report.push_str(&format!(
            "Security audit {} with a score of {}/100; {} issue(s) identified.\n\n",
            if result.passed { "PASSED" } else { "FAILED" },
            result.score,
            result.issues.len()
        ));

        report.push_str("## Key Findings\n");
        if result.issues.is_empty() {
            report.push_str("- No outstanding issues detected\n");
        } else {
            for issue in &result.issues {
                report.push_str(&format!(
                    "- [{}] {} ({}): {}\n",
                    issue.severity,
                    issue.id,
                    issue.category.as_str(),
                    issue.description
                ));
            }
        }
        report.push('\n');

        report.push_str("## Recommendations\n");
        for (index, recommendation) in result.recommendations.iter().enumerate() {
            report.push_str(&format!("{}. {}\n", index + 1, recommendation));
        }
        report.push('\n');

        report.push_str("## Compliance\n");
        report.push_str("- Encryption at rest: AES-256-GCM with PBKDF2-HMAC-SHA256 key derivation\n");
        report.push_str("- Input handling: validation and sanitization on all supported input classes\n");
        report.push_str("- Abuse protection: sliding-window rate limiting with escalating lockout\n\n");

        report.push_str(&format!("Generated: {}\n", result.timestamp.to_rfc3339()));
        report
    }
}

/// Derive recommendations by category presence, deduplicated
fn generate_recommendations(issues: &[SecurityIssue]) -> Vec<String> {
    fn push_unique(recommendation: &str, recommendations: &mut Vec<String>) {
        if !recommendations.iter().any(|existing| existing == recommendation) {
            recommendations.push(recommendation.to_string());
        }
    }

    let mut recommendations: Vec<String> = Vec::new();

    if issues.iter().any(|issue| issue.severity == Severity::Critical) {
        push_unique("Address all critical security issues immediately", &mut recommendations);
    }
    if issues.iter().any(|issue| issue.severity == Severity::High) {
        push_unique("Prioritize fixing high severity vulnerabilities", &mut recommendations);
    }

    let by_category: &[(IssueCategory, &str)] = &[
        (
            IssueCategory::Encryption,
            "Review and update encryption algorithms to use industry standards",
        ),
        (
            IssueCategory::Authentication,
            "Implement strong authentication mechanisms including MFA",
        ),
        (
            IssueCategory::InputValidation,
            "Implement comprehensive input validation and output encoding",
        ),
        (
            IssueCategory::SessionManagement,
            "Review session management and implement secure session handling",
        ),
        (
            IssueCategory::Configuration,
            "Review security configuration and disable debug features in production",
        ),
    ];
    for (category, recommendation) in by_category {
        if issues.iter().any(|issue| issue.category == *category) {
            push_unique(recommendation, &mut recommendations);
        }
    }

    push_unique("Conduct regular security audits and penetration testing", &mut recommendations);
    push_unique("Keep all dependencies updated to latest secure versions", &mut recommendations);
    push_unique("Implement security monitoring and alerting", &mut recommendations);

    recommendations
}

//! Validation report types for structured error reporting.
//!
//! Reports can be printed for a person or serialized to JSON for tooling.

use std::fmt;

use serde::Serialize;

/// The result of auditing a session.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found, in the order they were detected.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no errors or warnings.
    pub fn is_ok_strict(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Session check passed: no issues found");
        }

        writeln!(
            f,
            "Session check found {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single error or warning.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The session exports, but the result may surprise the user.
    Warning,
    /// The session cannot export what the user drew.
    Error,
}

/// A stable code identifying the type of issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Session issues
    /// No image has been loaded.
    NoImageLoaded,
    /// The registry is empty.
    NoCategories,
    /// The store is empty.
    NoBoxes,

    // Box issues
    /// A box references a category that is not in the registry.
    BoxMissingCategory,
    /// A box has NaN or infinite geometry.
    BoxNotFinite,
    /// A box is smaller than the minimum box size.
    BoxDegenerate,
    /// A box does not overlap the image at all.
    BoxOutsideImage,
    /// A box extends past the image edge and will be clipped on export.
    BoxTruncated,

    // Category issues
    /// A category has no boxes but still takes an export index.
    UnusedCategory,
}

/// Where an issue was found.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    Session,
    Box { id: u64 },
    Category { name: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Session => write!(f, "session"),
            IssueContext::Box { id } => write!(f, "box #{}", id),
            IssueContext::Category { name } => write!(f, "category '{}'", name),
        }
    }
}

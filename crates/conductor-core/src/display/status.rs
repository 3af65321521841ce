//! Confirmation messages for operations that change run state.

use std::fmt;

/// Outcome line printed after a mutating command, optionally followed by a
/// bullet list of the affected items.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
    pub details: Vec<String>,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
            details: Vec::new(),
        }
    }

    /// Create a new failure status.
    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
            details: Vec::new(),
        }
    }

    /// Attaches the items the operation touched.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)?;
        if !self.details.is_empty() {
            writeln!(f)?;
            for detail in &self.details {
                writeln!(f, "- {detail}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Run completed".to_string());
        assert_eq!(format!("{success}"), "Success: Run completed\n");

        let failure = OperationStatus::failure("Step not found".to_string());
        assert!(format!("{failure}").starts_with("Error:"));
    }

    #[test]
    fn test_operation_status_details() {
        let status = OperationStatus::success("Completed 2 manual steps".to_string())
            .with_details(vec!["verify".to_string(), "announce".to_string()]);
        let output = status.to_string();
        assert!(output.contains("\n\n- verify\n- announce\n"));
    }
}

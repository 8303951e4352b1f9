use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Status of one processing step.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// One entry of a job's step history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub step_name: String,
    #[serde(default)]
    pub status: StepStatus,
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Point-in-time report of an asynchronous generation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub project_id: Option<String>,
    pub overall_progress: i32,
    #[serde(default)]
    pub current_step: String,
    #[serde(default)]
    pub steps: Vec<ProcessingStep>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl ProgressSnapshot {
    /// Percentage to display, clamped to 0..=100.
    pub fn percent(&self) -> u8 {
        self.overall_progress.clamp(0, 100) as u8
    }

    /// The job is done once the backend reports exactly 100.
    pub fn is_complete(&self) -> bool {
        self.overall_progress == 100
    }

    /// Whether the backend labelled the current step as a failure.
    ///
    /// The tracker only surfaces this; it does not stop polling on it.
    pub fn reports_failure(&self) -> bool {
        let failed = |label: &str| label.trim().eq_ignore_ascii_case("failed");
        failed(&self.current_step) || self.steps.last().is_some_and(|s| failed(&s.step_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(progress: i32) -> ProgressSnapshot {
        ProgressSnapshot {
            project_id: Some("p-1".to_string()),
            overall_progress: progress,
            current_step: "Generating content".to_string(),
            steps: Vec::new(),
            estimated_completion: None,
        }
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(snapshot(-5).percent(), 0);
        assert_eq!(snapshot(42).percent(), 42);
        assert_eq!(snapshot(140).percent(), 100);
    }

    #[test]
    fn test_only_exactly_one_hundred_completes() {
        assert!(snapshot(100).is_complete());
        assert!(!snapshot(99).is_complete());
        assert!(!snapshot(140).is_complete());
    }

    #[test]
    fn test_deserializes_backend_snapshot() {
        let json = r#"{
            "project_id": "p-1",
            "overall_progress": 50,
            "current_step": "Content generated",
            "steps": [
                {"step_name": "Generating content", "status": "in_progress", "progress": 10,
                 "message": "Starting AI content generation", "timestamp": "2024-05-01T10:00:00.5"},
                {"step_name": "Content generated", "status": "in_progress", "progress": 50,
                 "message": "Book content generated successfully", "timestamp": "2024-05-01T10:01:00"}
            ],
            "estimated_completion": null
        }"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.steps.len(), 2);
        assert_eq!(snapshot.steps[0].status, StepStatus::InProgress);
        assert!(snapshot.steps[1].timestamp.is_some());
        assert!(!snapshot.reports_failure());
    }

    #[test]
    fn test_reports_failure_from_step_label() {
        let mut failed = snapshot(0);
        failed.current_step = "Failed".to_string();
        assert!(failed.reports_failure());
    }
}

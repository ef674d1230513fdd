//! Model evaluation results: the summary file and its confusion matrix.

use super::CustomLabelsApi;
use crate::error::{CloudAiError, Result};
use crate::s3::{ObjectStore, S3Uri};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{error, info};

/// Where the evaluation summary of a trained model is stored.
pub async fn get_model_summary_location(
    client: &dyn CustomLabelsApi,
    project_name: &str,
    version_name: &str,
) -> Result<S3Uri> {
    info!(project_name, version_name, "getting summary file location");
    summary_location(client, project_name, version_name)
        .await
        .inspect_err(|err| error!(project_name, version_name, "couldn't get summary file location: {err}"))
}

async fn summary_location(client: &dyn CustomLabelsApi, project_name: &str, version_name: &str) -> Result<S3Uri> {
    let project = client
        .describe_projects(Some(vec![project_name.to_string()]))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CloudAiError::NotFound(format!("Project {project_name} not found.")))?;
    let model = client
        .describe_project_versions(&project.project_arn, Some(vec![version_name.to_string()]))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CloudAiError::NotFound(format!("Model {version_name} not found.")))?;
    model
        .evaluation
        .and_then(|evaluation| evaluation.summary)
        .ok_or_else(|| CloudAiError::NotFound(format!("Model {version_name} has no evaluation summary.")))
}

/// Reads the summary file.
pub async fn get_summary(store: &dyn ObjectStore, location: &S3Uri) -> Result<Vec<u8>> {
    let body = store
        .get_object(&location.bucket, &location.key)
        .await
        .inspect_err(|err| error!(%location, "couldn't get summary file: {err}"))?;
    info!(key = %location.key, bucket = %location.bucket, "got summary file");
    Ok(body)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Summary {
    aggregated_evaluation_results: AggregatedResults,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AggregatedResults {
    #[serde(default)]
    confusion_matrix: Vec<Cell>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Cell {
    ground_truth_label: String,
    predicted_label: String,
    value: f64,
}

/// Predicted label by ground-truth label, as fractions of the ground truth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfusionMatrix {
    predicted: Vec<String>,
    ground_truth: Vec<String>,
    cells: BTreeMap<(String, String), f64>,
}

impl ConfusionMatrix {
    /// Pivots the summary's confusion matrix entries.
    ///
    /// Labels are sorted. Repeated cells are averaged and missing cells are 0.
    pub fn from_summary(summary: &[u8]) -> Result<Self> {
        let summary: Summary = serde_json::from_slice(summary)?;
        let entries = summary.aggregated_evaluation_results.confusion_matrix;

        let mut predicted = BTreeSet::new();
        let mut ground_truth = BTreeSet::new();
        let mut sums: BTreeMap<(String, String), (f64, u32)> = BTreeMap::new();
        for cell in entries {
            predicted.insert(cell.predicted_label.clone());
            ground_truth.insert(cell.ground_truth_label.clone());
            let sum = sums
                .entry((cell.predicted_label, cell.ground_truth_label))
                .or_default();
            sum.0 += cell.value;
            sum.1 += 1;
        }

        Ok(Self {
            predicted: predicted.into_iter().collect(),
            ground_truth: ground_truth.into_iter().collect(),
            cells: sums
                .into_iter()
                .map(|(labels, (total, count))| (labels, total / f64::from(count)))
                .collect(),
        })
    }

    pub fn predicted_labels(&self) -> &[String] {
        &self.predicted
    }

    pub fn ground_truth_labels(&self) -> &[String] {
        &self.ground_truth
    }

    pub fn value(&self, predicted: &str, ground_truth: &str) -> f64 {
        self.cells
            .get(&(predicted.to_string(), ground_truth.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

const ROW_HEADER: &str = "PredictedLabel";

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self
            .predicted
            .iter()
            .map(String::len)
            .chain([ROW_HEADER.len()])
            .max()
            .unwrap_or_default();
        let widths: Vec<usize> = self.ground_truth.iter().map(|label| label.len().max(4)).collect();

        write!(f, "{ROW_HEADER:<first$}")?;
        for (label, width) in self.ground_truth.iter().zip(&widths) {
            write!(f, "  {label:>width$}")?;
        }
        writeln!(f)?;

        for row in &self.predicted {
            write!(f, "{row:<first$}")?;
            for (column, width) in self.ground_truth.iter().zip(&widths) {
                let percent = format!("{:.0}%", self.value(row, column) * 100.0);
                write!(f, "  {percent:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = r#"{
        "AggregatedEvaluationResults": {
            "F1Score": 0.9,
            "ConfusionMatrix": [
                {"GroundTruthLabel": "cat", "PredictedLabel": "cat", "Value": 0.9},
                {"GroundTruthLabel": "cat", "PredictedLabel": "dog", "Value": 0.1},
                {"GroundTruthLabel": "dog", "PredictedLabel": "dog", "Value": 1.0}
            ]
        }
    }"#;

    #[test]
    fn pivots_predicted_by_ground_truth() {
        let matrix = ConfusionMatrix::from_summary(SUMMARY.as_bytes()).unwrap();

        assert_eq!(matrix.predicted_labels(), ["cat", "dog"]);
        assert_eq!(matrix.ground_truth_labels(), ["cat", "dog"]);
        assert_eq!(matrix.value("cat", "cat"), 0.9);
        assert_eq!(matrix.value("dog", "cat"), 0.1);
        assert_eq!(matrix.value("cat", "dog"), 0.0);
    }

    #[test]
    fn renders_percentages() {
        let matrix = ConfusionMatrix::from_summary(SUMMARY.as_bytes()).unwrap();

        let expected = "\
PredictedLabel   cat   dog
cat              90%    0%
dog              10%  100%
";
        assert_eq!(matrix.to_string(), expected);
    }

    #[test]
    fn repeated_cells_are_averaged() {
        let summary = r#"{"AggregatedEvaluationResults": {"ConfusionMatrix": [
            {"GroundTruthLabel": "a", "PredictedLabel": "a", "Value": 0.5},
            {"GroundTruthLabel": "a", "PredictedLabel": "a", "Value": 1.0}
        ]}}"#;
        let matrix = ConfusionMatrix::from_summary(summary.as_bytes()).unwrap();
        assert_eq!(matrix.value("a", "a"), 0.75);
    }

    #[test]
    fn rejects_summary_without_results() {
        assert!(matches!(
            ConfusionMatrix::from_summary(b"{}"),
            Err(CloudAiError::Json(_))
        ));
    }
}

//! Names embedded in custom-labels ARNs.
//!
//! A model ARN looks like
//! `arn:aws:rekognition:<region>:<account>:project/<project>/version/<version>/<timestamp>`.

use crate::error::{CloudAiError, Result};

/// The project name: the text between the first and second `/`.
pub fn project_name_from_arn(arn: &str) -> Result<&str> {
    arn.split('/')
        .nth(1)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CloudAiError::InvalidArgument(format!("{arn} has no project name")))
}

/// The model version name: the text after `version/` up to the last `/`.
pub fn version_name_from_arn(arn: &str) -> Result<&str> {
    arn.split_once("version/")
        .and_then(|(_, rest)| rest.rsplit_once('/'))
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CloudAiError::InvalidArgument(format!("{arn} is not a model version ARN")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL_ARN: &str = "arn:aws:rekognition:us-east-1:123456789012:project/test-project/version/test-model.2024-01-01T00.00.00/1234567890123";

    #[test]
    fn extracts_project_and_version_names() {
        assert_eq!(project_name_from_arn(MODEL_ARN).unwrap(), "test-project");
        assert_eq!(
            version_name_from_arn(MODEL_ARN).unwrap(),
            "test-model.2024-01-01T00.00.00"
        );
        assert_eq!(
            project_name_from_arn("arn:aws:rekognition:us-east-1:123456789012:project/pets/1690000000000").unwrap(),
            "pets"
        );
    }

    #[test]
    fn rejects_arns_without_names() {
        assert!(matches!(
            project_name_from_arn("arn:aws:rekognition:us-east-1:123456789012:project"),
            Err(CloudAiError::InvalidArgument(_))
        ));
        assert!(matches!(
            version_name_from_arn("arn:aws:rekognition:us-east-1:123456789012:project/pets/1690000000000"),
            Err(CloudAiError::InvalidArgument(_))
        ));
    }
}

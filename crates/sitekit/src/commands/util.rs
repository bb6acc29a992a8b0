//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::cli::PayloadArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the prompt becomes an error.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Decode a create/update payload from `--data` or `--from-file`.
pub fn parse_payload<P: DeserializeOwned>(args: &PayloadArgs) -> Result<P, CliError> {
    let (field, value) = match (&args.data, &args.from_file) {
        (Some(inline), _) => (
            "data",
            serde_json::from_str(inline).map_err(|e| CliError::Validation {
                field: "data".into(),
                reason: format!("invalid JSON: {e}"),
            })?,
        ),
        (None, Some(path)) => ("from-file", read_json_file(path)?),
        (None, None) => {
            return Err(CliError::Validation {
                field: "payload".into(),
                reason: "pass --data or --from-file".into(),
            });
        }
    };
    serde_json::from_value(value).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sitekit_core::{CreateBlogRequest, PublishStatus, UpdateBlogRequest};

    fn inline(json: &str) -> PayloadArgs {
        PayloadArgs {
            data: Some(json.into()),
            from_file: None,
        }
    }

    #[test]
    fn inline_payload_decodes_into_request() {
        let req: CreateBlogRequest =
            parse_payload(&inline(r#"{"title":"Hi","content":"Body","status":"published"}"#))
                .unwrap();
        assert_eq!(req.title, "Hi");
        assert_eq!(req.status, PublishStatus::Published);
    }

    #[test]
    fn missing_required_field_is_a_validation_error() {
        let err = parse_payload::<CreateBlogRequest>(&inline(r#"{"title":"Hi"}"#)).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "data"));
    }

    #[test]
    fn unrecognized_status_is_rejected_before_sending() {
        let err = parse_payload::<UpdateBlogRequest>(&inline(r#"{"status":"scheduled"}"#))
            .unwrap_err();
        assert!(
            matches!(err, CliError::Validation { ref reason, .. } if reason.contains("scheduled"))
        );
    }

    #[test]
    fn payload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patch.json");
        std::fs::write(&path, r#"{"featured":true}"#).unwrap();
        let args = PayloadArgs {
            data: None,
            from_file: Some(path),
        };
        let patch: UpdateBlogRequest = parse_payload(&args).unwrap();
        assert_eq!(patch.featured, Some(true));
        assert!(patch.title.is_none());
    }
}

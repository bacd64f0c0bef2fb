//! Remote name validation and remote path building.

use crate::error::{TransferError, TransferErrorKind};

fn rejected(message: String) -> TransferError {
    TransferError::new(TransferErrorKind::Filesystem, message)
}

/// Check that a remote node name can be used as a single local path component.
///
/// Names are used verbatim; anything that could escape the target directory
/// is rejected instead of being rewritten.
pub fn validate_node_name(name: &str) -> Result<&str, TransferError> {
    if name.is_empty() || name.trim().is_empty() {
        return Err(rejected(
            "Remote name cannot be empty or whitespace-only".to_string(),
        ));
    }

    if name == "." || name == ".." {
        return Err(rejected(format!(
            "Path traversal detected in remote name: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(rejected(format!(
            "Path separators not allowed in remote name: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(rejected(format!(
            "Null bytes not allowed in remote name: '{}'",
            name
        )));
    }

    Ok(name)
}

/// Remote path of a child: `parent + "/" + name`.
pub fn join_remote_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent, name)
}

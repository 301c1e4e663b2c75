//! Structural validation for region spec trees

use std::collections::HashSet;

use crate::error::MergeError;
use crate::models::RegionSpec;

/// Validate a forest of sibling region specs before merging
///
/// Checks, recursively: names are non-empty and free of characters that
/// would corrupt a marker line, sibling names are unique, and a child's
/// `indentation_level` is at least its parent's.
pub fn validate_specs(specs: &[RegionSpec]) -> Result<(), MergeError> {
    validate_level(specs, 0)
}

fn validate_level(specs: &[RegionSpec], parent_indent: usize) -> Result<(), MergeError> {
    let mut seen = HashSet::new();
    for spec in specs {
        validate_name(&spec.name)?;
        if !seen.insert(spec.name.as_str()) {
            return Err(MergeError::DuplicateRegionName {
                name: spec.name.clone(),
            });
        }
        if spec.indentation_level < parent_indent {
            return Err(MergeError::InvalidSpec(format!(
                "region '{}' is indented less than its parent ({} < {})",
                spec.name, spec.indentation_level, parent_indent
            )));
        }
        validate_level(&spec.children, spec.indentation_level)?;
    }
    Ok(())
}

// A name containing ']' or a newline would produce a start marker the
// parser cannot read back.
fn validate_name(name: &str) -> Result<(), MergeError> {
    if name.is_empty() {
        return Err(MergeError::InvalidSpec(
            "region name must not be empty".to_string(),
        ));
    }
    if name.contains(']') || name.contains('\n') {
        return Err(MergeError::InvalidSpec(format!(
            "region name '{}' contains a character not allowed in markers",
            name.escape_default()
        )));
    }
    Ok(())
}

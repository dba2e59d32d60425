//! CP-002: Workbook parsing and validation.
//!
//! Reads YAML workbooks (or JSON bulk documents, by extension) and checks
//! structural constraints:
//! - Version must be "1.0"
//! - Pack, item and job ids must be unique and names non-empty
//! - Items and jobs must belong to a known pack
//! - Quantities must be positive
//!
//! Dangling input references and self-referencing items are reported as
//! warnings only; the expansion engine tolerates both.

use super::types::*;
use rustc_hash::FxHashSet;
use std::path::Path;

/// A workbook problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub severity: Severity,
    pub message: String,
}

impl ValidationError {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Document encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse a workbook file from disk.
pub fn parse_workbook_file(path: &Path) -> Result<Workbook, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_workbook(&content, Format::from_path(path))
}

/// Parse a workbook from a string.
pub fn parse_workbook(content: &str, format: Format) -> Result<Workbook, String> {
    match format {
        Format::Yaml => {
            serde_yaml_ng::from_str(content).map_err(|e| format!("YAML parse error: {}", e))
        }
        Format::Json => {
            serde_json::from_str(content).map_err(|e| format!("invalid document: {}", e))
        }
    }
}

/// Validate a parsed workbook. Returns every problem found (empty = valid).
pub fn validate_workbook(workbook: &Workbook) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if workbook.version != "1.0" {
        errors.push(ValidationError::error(format!(
            "version must be \"1.0\", got \"{}\"",
            workbook.version
        )));
    }

    let mut pack_ids = FxHashSet::default();
    for pack in &workbook.packs {
        if !pack_ids.insert(pack.id.as_str()) {
            errors.push(ValidationError::error(format!("duplicate pack id '{}'", pack.id)));
        }
        if pack.name.trim().is_empty() {
            errors.push(ValidationError::error(format!("pack '{}' has no name", pack.id)));
        }
    }

    let mut item_ids = FxHashSet::default();
    for item in &workbook.items {
        if !item_ids.insert(item.id.as_str()) {
            errors.push(ValidationError::error(format!("duplicate item id '{}'", item.id)));
        }
    }

    for item in &workbook.items {
        validate_item(item, &pack_ids, workbook, &mut errors);
    }

    let mut job_ids = FxHashSet::default();
    for job in &workbook.jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::error(format!("duplicate job id '{}'", job.id)));
        }
        validate_job(job, &pack_ids, workbook, &mut errors);
    }

    errors
}

fn validate_item(
    item: &Item,
    pack_ids: &FxHashSet<&str>,
    workbook: &Workbook,
    errors: &mut Vec<ValidationError>,
) {
    if item.name.trim().is_empty() {
        errors.push(ValidationError::error(format!("item '{}' has no name", item.id)));
    }
    if !pack_ids.contains(item.pack_id.as_str()) {
        errors.push(ValidationError::error(format!(
            "item '{}' references unknown pack '{}'",
            item.id, item.pack_id
        )));
    }
    if !is_positive(item.output_qty) {
        errors.push(ValidationError::error(format!(
            "item '{}' has non-positive outputQty {}",
            item.id, item.output_qty
        )));
    }
    if item.time < 0.0 {
        errors.push(ValidationError::error(format!(
            "item '{}' has negative time {}",
            item.id, item.time
        )));
    }

    for input in &item.inputs {
        if !is_positive(input.qty) {
            errors.push(ValidationError::error(format!(
                "item '{}' input '{}' has non-positive qty {}",
                item.id, input.item_id, input.qty
            )));
        }
        if input.item_id == item.id {
            errors.push(ValidationError::warning(format!(
                "item '{}' lists itself as an input",
                item.id
            )));
            continue;
        }
        if !resolves_in_pack(workbook, &item.pack_id, &input.item_id) {
            errors.push(ValidationError::warning(format!(
                "item '{}' input '{}' is not in pack '{}'",
                item.id, input.item_id, item.pack_id
            )));
        }
    }
}

fn validate_job(
    job: &Job,
    pack_ids: &FxHashSet<&str>,
    workbook: &Workbook,
    errors: &mut Vec<ValidationError>,
) {
    if job.name.trim().is_empty() {
        errors.push(ValidationError::error(format!("job '{}' has no name", job.id)));
    }
    if !pack_ids.contains(job.pack_id.as_str()) {
        errors.push(ValidationError::error(format!(
            "job '{}' references unknown pack '{}'",
            job.id, job.pack_id
        )));
    }
    if job.lines.is_empty() {
        errors.push(ValidationError::error(format!("job '{}' has no lines", job.id)));
    }
    for line in &job.lines {
        if !is_positive(line.qty) {
            errors.push(ValidationError::error(format!(
                "job '{}' line '{}' has non-positive qty {}",
                job.id, line.item_id, line.qty
            )));
        }
        if !resolves_in_pack(workbook, &job.pack_id, &line.item_id) {
            errors.push(ValidationError::warning(format!(
                "job '{}' line '{}' is not in pack '{}'",
                job.id, line.item_id, job.pack_id
            )));
        }
    }
}

fn is_positive(qty: f64) -> bool {
    qty > 0.0
}

fn resolves_in_pack(workbook: &Workbook, pack_id: &str, item_id: &str) -> bool {
    workbook.items_in_pack(pack_id).any(|i| i.id == item_id)
}

/// Only the errors, warnings dropped.
pub fn errors_only(problems: &[ValidationError]) -> Vec<&ValidationError> {
    problems.iter().filter(|p| p.is_error()).collect()
}

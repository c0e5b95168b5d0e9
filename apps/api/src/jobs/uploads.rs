use std::path::Path;

/// Limits applied to every uploaded file before an extraction job is created.
#[derive(Debug, Clone)]
pub struct UploadRules {
    /// Lower-case extensions including the leading dot, e.g. ".pdf".
    pub allowed_extensions: Vec<String>,
    pub max_file_size: usize,
}

pub const MAX_BULK_FILES: usize = 50;

impl UploadRules {
    /// Returns every problem found with the file; an empty filename short-circuits.
    pub fn check(&self, filename: Option<&str>, size: usize) -> Result<(), Vec<String>> {
        let filename = match filename.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(vec!["Filename is required".to_string()]),
        };

        let mut issues = Vec::new();

        let extension = file_extension(filename);
        if !self.allowed_extensions.iter().any(|ext| *ext == extension) {
            issues.push(format!(
                "File extension {} not allowed. Allowed: {}",
                if extension.is_empty() { "(none)" } else { &extension },
                self.allowed_extensions.join(", ")
            ));
        }

        if size == 0 {
            issues.push("File is empty".to_string());
        } else if size > self.max_file_size {
            issues.push(format!(
                "File size {size} exceeds maximum allowed size {}",
                self.max_file_size
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Same checks as [`check`](Self::check), folded into the message returned to clients.
    pub fn validate(&self, filename: Option<&str>, size: usize) -> Result<(), String> {
        self.check(filename, size)
            .map_err(|issues| format!("File validation failed: {}", issues.join("; ")))
    }
}

/// Lower-cased extension with its leading dot, or an empty string.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub fn mime_type_for(filename: &str) -> &'static str {
    match file_extension(filename).as_str() {
        ".pdf" => "application/pdf",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".doc" => "application/msword",
        ".txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

use std::collections::HashMap;

/// An agent description document split into metadata fields and body text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// `key: value` fields from the metadata header.
    pub fields: HashMap<String, String>,
    /// Free-text body subject to keyword inference.
    pub body: String,
}

impl Document {
    /// Returns a trimmed field value, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Splits document content into a metadata header and a body.
///
/// The header is bounded by the first two lines that contain exactly `---`
/// after trimming. Inside, each `key: value` line sets a string field;
/// lines without a colon (or starting with one) are ignored. If fewer than
/// two delimiter lines exist, the entire document is treated as body with
/// no declared metadata.
#[must_use]
pub fn parse(content: &str) -> Document {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut start = None;
    let mut end = None;

    for (index, line) in lines.iter().enumerate() {
        if line.trim() == "---" {
            if start.is_none() {
                start = Some(index);
            } else {
                end = Some(index);
                break;
            }
        }
    }

    let (Some(start), Some(end)) = (start, end) else {
        return Document {
            fields: HashMap::new(),
            body: content.to_owned(),
        };
    };

    let mut fields = HashMap::new();
    for line in lines.get(start + 1..end).unwrap_or_default() {
        if let Some((key, value)) = line.split_once(':') {
            if !key.is_empty() {
                fields.insert(key.trim().to_owned(), value.trim().to_owned());
            }
        }
    }

    let body = lines.get(end + 1..).unwrap_or_default().join("\n");
    Document { fields, body }
}

use crate::error::{AcvpError, AcvpResult};

/// Fields printed by the implementation, in output order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedFields {
    entries: Vec<(String, String)>,
}

impl ObservedFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ObservedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse implementation output into fields.
///
/// Every line must be `key=value` with exactly one `=` and a non-empty key.
/// The value is kept verbatim (it may be empty).
///
/// # Errors
///
/// The first offending line, numbered from 1, as a malformed-output error.
pub fn parse_output(stdout: &str) -> AcvpResult<ObservedFields> {
    let mut entries = Vec::new();
    for (index, line) in stdout.lines().enumerate() {
        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.contains('=') => {
                entries.push((key.to_string(), value.to_string()));
            }
            _ => return Err(AcvpError::malformed_output(index + 1, line)),
        }
    }
    Ok(ObservedFields { entries })
}

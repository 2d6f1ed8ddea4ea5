use crate::error::PipelineError;
use serde::Deserialize;

/// Upstream ceilings, enforced before any item is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchLimits {
    pub max_files: usize,
    pub max_file_bytes: u64,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_file_bytes: 50 * 1024 * 1024,
        }
    }
}

impl BatchLimits {
    /// Rejects an empty batch, a batch with too many items, or the first item
    /// over the size ceiling. Takes `(name, size)` pairs in submission order.
    pub fn check<'a, I>(&self, items: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let items: Vec<_> = items.into_iter().collect();
        if items.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        if items.len() > self.max_files {
            return Err(PipelineError::TooManyFiles {
                count: items.len(),
                max: self.max_files,
            });
        }
        if let Some((name, size)) = items.into_iter().find(|(_, size)| *size > self.max_file_bytes) {
            return Err(PipelineError::FileTooLarge {
                name: name.to_string(),
                size,
                max: self.max_file_bytes,
            });
        }
        Ok(())
    }
}

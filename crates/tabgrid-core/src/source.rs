use crate::data::Row;

/// An exact-match field filter passed to [`RowSource::fetch_all`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFilter {
    pub field: String,
    pub value: String,
}

impl RowFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// The surrounding persistence layer, as the grid sees it: single-shot,
/// non-streaming calls. The grid never talks to storage itself; hosts fetch
/// through this trait and push the result into the adapter.
pub trait RowSource {
    type Error: std::error::Error;

    fn fetch_all(&mut self, filters: &[RowFilter]) -> Result<Vec<Row>, Self::Error>;
    fn insert(&mut self, row: Row) -> Result<String, Self::Error>;
    fn update(&mut self, key: &str, patch: Row) -> Result<(), Self::Error>;
    fn delete(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// Errors from [`MemorySource`].
#[derive(Debug, thiserror::Error)]
pub enum MemorySourceError {
    #[error("no row with key {0}")]
    UnknownKey(String),
    #[error("duplicate key {0}")]
    DuplicateKey(String),
}

/// In-memory [`RowSource`], for demos and hosts without a real backend.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    rows: Vec<Row>,
    next_id: u64,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        let next_id = rows.len() as u64 + 1;
        Self { rows, next_id }
    }

    fn matches(row: &Row, filters: &[RowFilter]) -> bool {
        filters.iter().all(|f| {
            row.get(&f.field)
                .is_some_and(|v| v.display() == f.value)
        })
    }
}

impl RowSource for MemorySource {
    type Error = MemorySourceError;

    fn fetch_all(&mut self, filters: &[RowFilter]) -> Result<Vec<Row>, Self::Error> {
        Ok(self
            .rows
            .iter()
            .filter(|r| Self::matches(r, filters))
            .cloned()
            .collect())
    }

    fn insert(&mut self, mut row: Row) -> Result<String, Self::Error> {
        if row.key().is_empty() {
            row.assign_key(self.next_id.to_string());
            self.next_id += 1;
        } else if self.rows.iter().any(|r| r.key() == row.key()) {
            return Err(MemorySourceError::DuplicateKey(row.key().to_string()));
        }
        let key = row.key().to_string();
        self.rows.push(row);
        Ok(key)
    }

    fn update(&mut self, key: &str, patch: Row) -> Result<(), Self::Error> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.key() == key)
            .ok_or_else(|| MemorySourceError::UnknownKey(key.to_string()))?;
        for (field, value) in patch.fields() {
            row.set(field.clone(), value.clone());
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        let len = self.rows.len();
        self.rows.retain(|r| r.key() != key);
        if self.rows.len() == len {
            return Err(MemorySourceError::UnknownKey(key.to_string()));
        }
        Ok(())
    }
}

use crate::Row;

/// A shard of a dataframe, processed by a single task.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    id: usize,
    rows: Vec<Row>,
}

impl Partition {
    pub fn new(id: usize, rows: Vec<Row>) -> Self {
        Self { id, rows }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

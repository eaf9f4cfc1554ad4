use crate::error::QueryError;
use std::fmt;

/// Half-open `[start, end)` window over a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: i64,
    end: i64,
}

impl Range {
    /// Bounds match the `BIGINT` parameters of `LIMIT` and `OFFSET`
    pub fn new(start: i64, end: i64) -> Result<Self, QueryError> {
        if start < 0 {
            return Err(QueryError::InvalidRange(format!(
                "start {} is negative",
                start
            )));
        }
        if start > end {
            return Err(QueryError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Range { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn offset(&self) -> i64 {
        self.start
    }

    pub fn limit(&self) -> i64 {
        self.end - self.start
    }
}

/// Value of the `Content-Range` response header, `{unit} {start}-{end}/{total}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRange {
    unit: &'static str,
    start: i64,
    end: i64,
    total: i64,
}

impl ContentRange {
    /// Without a requested range the whole result set is reported
    pub fn new(unit: &'static str, range: Option<Range>, total: i64) -> Self {
        let (start, end) = match range {
            Some(range) => (range.start(), range.end()),
            None => (0, total),
        };
        ContentRange {
            unit,
            start,
            end,
            total,
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}-{}/{}", self.unit, self.start, self.end, self.total)
    }
}

use chrono::{DateTime, Utc};

/// Raw `filter`, `sort` and `range` parameters, each a JSON string
#[derive(serde::Serialize, serde::Deserialize, Default)]
pub struct ListQuery {
    filter: Option<String>,
    sort: Option<String>,
    range: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct DateQuery {
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl DateQuery {
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    pub fn is_valid(&self) -> bool {
        match (self.from, self.until) {
            (Some(from), Some(until)) => from < until,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct ExportQuery {
    format: Option<String>,
}

impl ExportQuery {
    pub fn format(&self) -> Option<ExportFormat> {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("json") => Some(ExportFormat::Json),
            Some("csv") => Some(ExportFormat::Csv),
            Some(_) => None,
        }
    }
}

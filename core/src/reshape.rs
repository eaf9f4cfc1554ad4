use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

pub const TIME_HEADER: &str = "Time/s";
pub const SUMMARY_HEADER: &str = "measurement";
/// Placeholder of summary cells without an integration result
pub const MISSING: &str = "nan";

const SUMMARY_KEYS: [&str; 3] = ["start", "end", "area"];

pub type Series = Vec<Option<f64>>;

/// One integration result of a channel, as stored by the analysis UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegralResult(Map<String, Value>);

impl IntegralResult {
    pub fn new(values: Map<String, Value>) -> Self {
        IntegralResult(values)
    }

    fn cell(&self, key: &str) -> Value {
        match self.0.get(key) {
            Some(Value::Null) | None => Value::String(MISSING.to_owned()),
            Some(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub name: String,
    pub time_values: Series,
    pub raw_values: Series,
    pub baseline_values: Series,
    pub integral_results: Vec<IntegralResult>,
}

impl Channel {
    /// Builds a channel from its stored JSON columns, tolerating absent
    /// columns and non-numeric entries
    pub fn from_json(
        name: String,
        time_values: Option<&Value>,
        raw_values: Option<&Value>,
        baseline_values: Option<&Value>,
        integral_results: Option<&Value>,
    ) -> Self {
        let integral_results = match integral_results {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(IntegralResult::new))
                .collect(),
            _ => Vec::new(),
        };
        Channel {
            name,
            time_values: series_from_json(time_values),
            raw_values: series_from_json(raw_values),
            baseline_values: series_from_json(baseline_values),
            integral_results,
        }
    }
}

fn series_from_json(value: Option<&Value>) -> Series {
    match value {
        Some(Value::Array(items)) => items.iter().map(Value::as_f64).collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesKind {
    Raw,
    Baseline,
}

impl SeriesKind {
    fn select(self, channel: &Channel) -> &[Option<f64>] {
        match self {
            SeriesKind::Raw => &channel.raw_values,
            SeriesKind::Baseline => &channel.baseline_values,
        }
    }
}

/// Row-major table, serialized as a list of rows with the header first
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn to_csv(&self) -> std::io::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in self.rows.iter() {
            writer.write_record(row.iter().map(csv_cell))?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len() + 1))?;
        seq.serialize_element(&self.header)?;
        for row in self.rows.iter() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

fn sorted_by_name(channels: &[Channel]) -> Vec<&Channel> {
    let mut sorted: Vec<&Channel> = channels.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

fn number_cell(value: Option<&Option<f64>>) -> Value {
    value
        .copied()
        .flatten()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Transposes one series of every channel into `Time/s, <channel>...` rows.
///
/// The time column comes from the first channel by name. The row count is
/// the longest of that time array and the selected series, shorter arrays
/// leave `null` cells.
pub fn series_table(channels: &[Channel], kind: SeriesKind) -> Table {
    let channels = sorted_by_name(channels);
    let mut header = Vec::with_capacity(channels.len() + 1);
    header.push(TIME_HEADER.to_owned());
    header.extend(channels.iter().map(|c| c.name.clone()));

    let time_values: &[Option<f64>] = channels
        .first()
        .map(|c| c.time_values.as_slice())
        .unwrap_or(&[]);
    let row_count = channels
        .iter()
        .map(|c| kind.select(c).len())
        .fold(time_values.len(), usize::max);

    let rows = (0..row_count)
        .map(|i| {
            let mut row = Vec::with_capacity(channels.len() + 1);
            row.push(number_cell(time_values.get(i)));
            row.extend(channels.iter().map(|c| number_cell(kind.select(c).get(i))));
            row
        })
        .collect();

    Table { header, rows }
}

/// One row per channel with `start`, `end` and `area` of every integration
/// result, padded with `"nan"` up to the channel with the most results
pub fn summary_table(channels: &[Channel]) -> Table {
    let channels = sorted_by_name(channels);
    let max_samples = channels
        .iter()
        .map(|c| c.integral_results.len())
        .max()
        .unwrap_or(0);

    let mut header = vec![SUMMARY_HEADER.to_owned()];
    for i in 1..=max_samples {
        header.extend(SUMMARY_KEYS.iter().map(|key| format!("sample{}_{}", i, key)));
    }

    let rows = channels
        .iter()
        .map(|channel| {
            let mut row = Vec::with_capacity(header.len());
            row.push(Value::String(channel.name.clone()));
            for result in channel.integral_results.iter() {
                row.extend(SUMMARY_KEYS.iter().map(|key| result.cell(key)));
            }
            let missing = (max_samples - channel.integral_results.len()) * SUMMARY_KEYS.len();
            row.extend(std::iter::repeat(Value::String(MISSING.to_owned())).take(missing));
            row
        })
        .collect();

    Table { header, rows }
}

#[cfg(test)]
mod test;

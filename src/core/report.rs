use crate::domain::model::ResultRow;
use std::collections::HashMap;
use std::fmt;

pub const TOP_VALUES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub total: usize,
    pub line_count: usize,
    pub location_count: usize,
    pub noise_type_count: usize,
    pub vibration_type_count: usize,
    pub line_distribution: Vec<ValueCount>,
    pub noise_type_distribution: Vec<ValueCount>,
}

pub fn summarize(rows: &[ResultRow]) -> SummaryStats {
    SummaryStats {
        total: rows.len(),
        line_count: rows.iter().filter(|r| r.line.is_some()).count(),
        location_count: rows.iter().filter(|r| r.location.is_some()).count(),
        noise_type_count: rows.iter().filter(|r| r.noise_type.is_some()).count(),
        vibration_type_count: rows.iter().filter(|r| r.vibration_type.is_some()).count(),
        line_distribution: top_values(rows.iter().map(|r| r.line.as_deref()), TOP_VALUES),
        noise_type_distribution: top_values(rows.iter().map(|r| r.noise_type.as_deref()), TOP_VALUES),
    }
}

/// Counts distinct present values, most frequent first. Ties keep the order in
/// which values were first seen.
pub fn top_values<'a, I>(values: I, limit: usize) -> Vec<ValueCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: Vec<ValueCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for value in values.into_iter().flatten() {
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by 為穩定排序，同數量保留首次出現順序
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing summary ===")?;
        writeln!(f, "Total records: {}", self.total)?;
        writeln!(f, "Records with line (线路): {}", self.line_count)?;
        writeln!(f, "Records with location (小区/位置): {}", self.location_count)?;
        writeln!(f, "Records with noise type (噪音类型): {}", self.noise_type_count)?;
        writeln!(f, "Records with vibration type (振动类型): {}", self.vibration_type_count)?;

        if !self.line_distribution.is_empty() {
            writeln!(f)?;
            writeln!(f, "Line distribution:")?;
            for entry in &self.line_distribution {
                writeln!(f, "  {}: {}", entry.value, entry.count)?;
            }
        }

        if !self.noise_type_distribution.is_empty() {
            writeln!(f)?;
            writeln!(f, "Noise type distribution:")?;
            for entry in &self.noise_type_distribution {
                writeln!(f, "  {}: {}", entry.value, entry.count)?;
            }
        }

        Ok(())
    }
}

use crate::domain::model::{
    ComplaintRecord, ResultRow, CONTENT_COLUMN, LINE_COLUMN, LOCATION_COLUMN, NOISE_TYPE_COLUMN,
    PHONE_COLUMN, VIBRATION_TYPE_COLUMN,
};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Delimited table layout, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn from_path(path: &str) -> Self {
        match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") => TableFormat::Tsv,
            _ => TableFormat::Csv,
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }
}

pub fn read_records(data: &[u8], format: TableFormat) -> Result<Vec<ComplaintRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let content_idx = column_index(&headers, CONTENT_COLUMN)?;
    let phone_idx = column_index(&headers, PHONE_COLUMN)?;

    // 短列缺少的儲存格視為空值，不中斷整批
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let content = row
            .get(content_idx)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let phone = row.get(phone_idx).unwrap_or_default().to_string();
        records.push(ComplaintRecord { content, phone });
    }

    tracing::debug!("Decoded {} complaint records", records.len());
    Ok(records)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| EtlError::MissingColumnError {
            column: column.to_string(),
        })
}

pub fn write_rows(rows: &[ResultRow], format: TableFormat) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(false)
        .from_writer(Vec::new());

    // 明確寫出表頭，空表也保有欄位
    writer.write_record([
        CONTENT_COLUMN,
        PHONE_COLUMN,
        LINE_COLUMN,
        LOCATION_COLUMN,
        NOISE_TYPE_COLUMN,
        VIBRATION_TYPE_COLUMN,
    ])?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

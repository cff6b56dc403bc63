use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use csv::{Writer, WriterBuilder};

use crate::{errors::HarvestError, year_table_scraper::HolidayRecord};

pub const HOLIDAY_HEADERS: [&str; 4] = ["date", "country", "holiday_name", "holiday_type"];

/// Streams holiday rows to a CSV file, flushing after every batch so a run
/// that aborts halfway keeps what it already wrote.
pub struct HolidayCsvWriter {
    path: PathBuf,
    writer: Writer<File>,
    rows_written: usize,
}

impl HolidayCsvWriter {
    /// Creates (or truncates) `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self, HarvestError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(HOLIDAY_HEADERS)?;
        writer.flush()?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows_written: 0,
        })
    }

    pub fn write_batch(&mut self, records: &[HolidayRecord]) -> Result<(), HarvestError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        self.rows_written += records.len();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn header_is_written_even_without_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidays_2020_2020.csv");
        let writer = HolidayCsvWriter::create(&path).unwrap();
        assert_eq!(writer.rows_written(), 0);
        drop(writer);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "date,country,holiday_name,holiday_type\n"
        );
    }

    #[test]
    fn batches_are_visible_on_disk_after_each_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut writer = HolidayCsvWriter::create(&path).unwrap();
        writer
            .write_batch(&[HolidayRecord {
                date: "2021 Jan 1".to_string(),
                country: "us".to_string(),
                holiday_name: "New Year's Day, observed".to_string(),
                holiday_type: "Federal Holiday".to_string(),
            }])
            .unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(
            contents,
            "date,country,holiday_name,holiday_type\n\
             2021 Jan 1,us,\"New Year's Day, observed\",Federal Holiday\n"
        );
        assert_eq!(writer.rows_written(), 1);
    }
}

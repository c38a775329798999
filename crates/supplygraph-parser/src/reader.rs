use std::io::Read;

use csv::StringRecord;

use crate::errors::ParserError;
use crate::model::{RawRow, TableHeader};
use crate::normalize::normalize_record;

pub fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter);
    builder
}

/// Streams normalized rows out of a delimited table. Blank records are skipped and counted;
/// fields past the end of the header are ignored.
pub struct RowReader<R: Read> {
    reader: csv::Reader<R>,
    header: TableHeader,
    record: StringRecord,
    blank_rows: usize,
}

impl<R: Read> RowReader<R> {
    pub fn new(source: R) -> Result<Self, ParserError> {
        Self::with_builder(&reader_builder(b','), source)
    }

    pub fn with_builder(builder: &csv::ReaderBuilder, source: R) -> Result<Self, ParserError> {
        let mut reader = builder.from_reader(source);
        let header = reader
            .headers()
            .map_err(|err| ParserError::csv(1, err))?
            .clone();
        let header = TableHeader::new(header.iter())?;

        Ok(Self {
            reader,
            header,
            record: StringRecord::new(),
            blank_rows: 0,
        })
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    pub fn next_row(&mut self) -> Result<Option<RawRow>, ParserError> {
        loop {
            let line_index = self.reader.position().line() as usize;
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|err| {
                    let line = err.position().map_or(line_index, |pos| pos.line() as usize);
                    ParserError::csv(line, err)
                })?;
            if !more {
                return Ok(None);
            }

            let line_index = self
                .record
                .position()
                .map_or(line_index, |pos| pos.line() as usize);
            let width = self.record.len().min(self.header.len());
            let fields: Vec<&str> = self.record.iter().take(width).collect();

            match normalize_record(&fields) {
                Some(values) => return Ok(Some(RawRow::new(line_index, values))),
                None => self.blank_rows += 1,
            }
        }
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawRow, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

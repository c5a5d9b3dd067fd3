//! CSV codec for city records
//!
//! Column order: id, name, region, district, population, foundation.

use std::io::{Read, Write};
use types::{City, StorageError};

/// Number of fixed columns in a city row
pub const CSV_COLUMNS: usize = 6;

/// Read all city rows from a header-less CSV source
///
/// Numeric fields that fail to parse become zero. A row with fewer than
/// [`CSV_COLUMNS`] fields is rejected; extra trailing fields are ignored.
pub fn read_cities<R: Read>(reader: R) -> Result<Vec<City>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut cities = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < CSV_COLUMNS {
            return Err(StorageError::MalformedRecord {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: CSV_COLUMNS,
                found: record.len(),
            });
        }

        cities.push(City {
            id: parse_number(&record[0]),
            name: record[1].to_string(),
            region: record[2].to_string(),
            district: record[3].to_string(),
            population: parse_number(&record[4]),
            foundation: parse_number(&record[5]),
        });
    }

    Ok(cities)
}

/// Write city rows to a CSV sink in the fixed column order
pub fn write_cities<W: Write>(writer: W, cities: &[City]) -> Result<(), StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for city in cities {
        writer.write_record([
            city.id.to_string().as_str(),
            city.name.as_str(),
            city.region.as_str(),
            city.district.as_str(),
            city.population.to_string().as_str(),
            city.foundation.to_string().as_str(),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn parse_number(field: &str) -> i64 {
    field.trim().parse().unwrap_or(0)
}

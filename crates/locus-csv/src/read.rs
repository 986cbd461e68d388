use std::{fs::File, io::Read, path::Path};

use locus_core::{import::ImportRow, location::LocationType};

use crate::{Error, Result};

const NAME: &str = "name";
const CODE: &str = "code";
const PARENT_CODE: &str = "parent_code";

/// Header positions of the columns we read.
#[derive(Debug, Clone, Copy)]
struct Columns {
  name:        usize,
  code:        usize,
  parent_code: Option<usize>,
}

impl Columns {
  fn locate(headers: &csv::StringRecord, kind: LocationType) -> Result<Self> {
    let find = |column: &'static str| {
      headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
    };

    let name = find(NAME).ok_or(Error::MissingColumn(NAME))?;
    let code = find(CODE).ok_or(Error::MissingColumn(CODE))?;
    let parent_code = if kind == LocationType::Region {
      None
    } else {
      Some(find(PARENT_CODE).ok_or(Error::MissingColumn(PARENT_CODE))?)
    };

    Ok(Self { name, code, parent_code })
  }
}

/// Iterator over the data rows of a location CSV.
///
/// Yields one [`ImportRow`] per record. A record that cannot be decoded
/// yields an error; the caller decides whether to stop.
pub struct LocationRows<R> {
  records: csv::StringRecordsIntoIter<R>,
  columns: Columns,
  line:    usize,
}

impl<R: Read> Iterator for LocationRows<R> {
  type Item = Result<ImportRow>;

  fn next(&mut self) -> Option<Self::Item> {
    let record = self.records.next()?;
    self.line += 1;
    Some(record.map_err(Error::from).and_then(|r| self.decode(&r)))
  }
}

impl<R> LocationRows<R> {
  fn decode(&self, record: &csv::StringRecord) -> Result<ImportRow> {
    let line = self.line;
    let field = |idx: usize, column: &'static str| {
      record
        .get(idx)
        .map(str::trim)
        .ok_or(Error::MissingField { line, column })
    };

    let name = field(self.columns.name, NAME)?.to_owned();
    let code = field(self.columns.code, CODE)?.to_owned();
    let parent_code = match self.columns.parent_code {
      Some(idx) => {
        let value = field(idx, PARENT_CODE)?;
        (!value.is_empty()).then(|| value.to_owned())
      }
      None => None,
    };

    Ok(ImportRow { line, name, code, parent_code })
  }
}

/// Read location rows of type `kind` from `reader`.
///
/// Fails immediately if the header row is missing a required column.
pub fn read_rows<R: Read>(reader: R, kind: LocationType) -> Result<LocationRows<R>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .delimiter(b',')
    .trim(csv::Trim::All)
    .from_reader(reader);

  let columns = Columns::locate(reader.headers()?, kind)?;

  Ok(LocationRows {
    records: reader.into_records(),
    columns,
    line: 0,
  })
}

/// Open the CSV at `path` and read location rows of type `kind`.
pub fn open(path: impl AsRef<Path>, kind: LocationType) -> Result<LocationRows<File>> {
  let path = path.as_ref();
  if !path.is_file() {
    return Err(Error::NotAFile(path.to_path_buf()));
  }
  read_rows(File::open(path)?, kind)
}

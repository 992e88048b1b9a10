//! Flat key/value JSON resource files (`*.i18n.json`).
//!
//! Each file is one object whose members are the localized strings of one
//! source file. A generator header may sit under the empty key.

use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser, types::ResourceEntry};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonResource {
    pub entry: ResourceEntry,
}

impl Parser for JsonResource {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let entry = serde_json::from_reader(reader).map_err(Error::Json)?;
        Ok(JsonResource { entry })
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, &self.entry).map_err(Error::Json)
    }
}

impl From<ResourceEntry> for JsonResource {
    fn from(entry: ResourceEntry) -> Self {
        JsonResource { entry }
    }
}

#![cfg(feature = "serde")]

use serde::ser::*;

use crate::format::PgmFormat;
use crate::image::PgmImage;

impl Serialize for PgmFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        // formats serialize as their magic number
        serializer.serialize_str(self.magic())
    }
}

/// Only metadata is serialized, samples are left out
impl Serialize for PgmImage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("PgmImage", 4)?;
        state.serialize_field("format", &self.format())?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.serialize_field("max_value", &self.max_value())?;
        state.end()
    }
}

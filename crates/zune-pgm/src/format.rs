/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::PgmErrors;

/// The two grayscale encodings a PGM file can carry
///
/// The variant is identified by the magic number at the start
/// of the file.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PgmFormat {
    /// `P5`, samples stored as raw bytes
    #[default]
    Binary,
    /// `P2`, samples stored as whitespace delimited decimal text
    Ascii
}

impl PgmFormat {
    /// Parse a magic number, accepting exactly `P2` or `P5`
    pub fn from_magic(magic: &str) -> Result<PgmFormat, PgmErrors> {
        match magic {
            "P5" => Ok(PgmFormat::Binary),
            "P2" => Ok(PgmFormat::Ascii),
            _ => Err(PgmErrors::InvalidArgument(format!(
                "magic number must be P2 or P5 (got `{magic}`)"
            )))
        }
    }

    /// The magic number written at the start of the file
    pub const fn magic(self) -> &'static str {
        match self {
            PgmFormat::Binary => "P5",
            PgmFormat::Ascii => "P2"
        }
    }
}

impl Display for PgmFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.magic())
    }
}

impl FromStr for PgmFormat {
    type Err = PgmErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PgmFormat::from_magic(s)
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when decoding, encoding or manipulating PGM images
use std::fmt::{Debug, Display, Formatter};
use std::io;

/// Possible errors that may occur when working with a [`PgmImage`](crate::PgmImage)
pub enum PgmErrors {
    /// A pixel coordinate or sample value was outside what the
    /// image allows
    OutOfRange(String),
    /// An argument was rejected, e.g an unknown magic number
    /// or a zero dimension passed to resize
    InvalidArgument(String),
    /// The header could not be resolved into a magic number,
    /// width, height and max value
    MalformedHeader(String),
    /// The payload ended before all samples were read
    ///
    /// # Arguments
    /// - 1st argument is the number of samples we expected
    /// - 2nd argument is the number of samples actually found
    TruncatedPayload(usize, usize),
    /// A textual sample could not be parsed as a 16 bit integer
    InvalidSample(String),
    /// The underlying reader or writer failed
    IoErrors(io::Error)
}

impl Debug for PgmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PgmErrors::OutOfRange(msg) => {
                writeln!(f, "Out of range: {msg}")
            }
            PgmErrors::InvalidArgument(msg) => {
                writeln!(f, "Invalid argument: {msg}")
            }
            PgmErrors::MalformedHeader(msg) => {
                writeln!(f, "Malformed header, reason: {msg}")
            }
            PgmErrors::TruncatedPayload(expected, found) => {
                writeln!(
                    f,
                    "Truncated payload, expected {expected} samples but found {found}"
                )
            }
            PgmErrors::InvalidSample(msg) => {
                writeln!(f, "Invalid sample: {msg}")
            }
            PgmErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err}")
            }
        }
    }
}

impl Display for PgmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PgmErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgmErrors::IoErrors(err) => Some(err),
            _ => None
        }
    }
}

impl From<io::Error> for PgmErrors {
    fn from(err: io::Error) -> Self {
        PgmErrors::IoErrors(err)
    }
}

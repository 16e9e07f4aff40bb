/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! PGM specific options
//!
//! Size limits and strictness come from [`DecoderOptions`] shared by all
//! zune decoders, the settings here only make sense for netpbm
//! graymaps.
//!
//! ```
//! use zune_pgm::{PgmOptions, SampleOrder};
//!
//! let options = PgmOptions::default()
//!     .set_max_header_lines(16)
//!     .set_sample_order(SampleOrder::LegacyAnd);
//!
//! assert_eq!(options.max_header_lines(), 16);
//! ```
use zune_core::options::DecoderOptions;

/// How two bytes of a 16 bit binary sample are combined into one value
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SampleOrder {
    /// `(high << 8) | low`
    ///
    /// This is what netpbm writes and what the encoder emits,
    /// so round trips only hold with this variant.
    #[default]
    BigEndian,
    /// `(high << 8) & low`
    ///
    /// Reproduces older decoders that mask instead of merging
    /// the bytes. Every sample decodes to `0`
    LegacyAnd
}

impl SampleOrder {
    #[inline(always)]
    pub(crate) const fn combine(self, high: u8, low: u8) -> u16 {
        let high = (high as u16) << 8;
        match self {
            SampleOrder::BigEndian => high | low as u16,
            SampleOrder::LegacyAnd => high & low as u16
        }
    }
}

/// Decoder options used when none are given
///
/// Same as `DecoderOptions::default()` with strict mode off, so
/// samples not below the max value are kept with a warning.
pub fn default_decoder_options() -> DecoderOptions {
    DecoderOptions::default().set_strict_mode(false)
}

/// Options only respected by the PGM decoder and encoder
#[derive(Copy, Clone, Debug)]
pub struct PgmOptions {
    /// Maximum number of lines, comments included, that may be
    /// read before all header fields are found
    ///
    /// - Default value: 1024
    /// - Respected by: decoder
    max_header_lines: usize,
    /// Byte combination for 16 bit binary samples
    ///
    /// - Default value: `SampleOrder::BigEndian`
    /// - Respected by: decoder
    sample_order:     SampleOrder,
    /// Column budget used to soft wrap `P2` rows
    ///
    /// - Default value: 70
    /// - Respected by: encoder
    text_line_width:  usize
}

impl Default for PgmOptions {
    fn default() -> Self {
        Self {
            max_header_lines: 1024,
            sample_order:     SampleOrder::BigEndian,
            text_line_width:  70
        }
    }
}

impl PgmOptions {
    /// Maximum lines read while looking for header fields
    pub const fn max_header_lines(&self) -> usize {
        self.max_header_lines
    }
    #[must_use]
    pub fn set_max_header_lines(mut self, lines: usize) -> Self {
        self.max_header_lines = lines;
        self
    }
    /// Byte combination used for 16 bit binary samples
    pub const fn sample_order(&self) -> SampleOrder {
        self.sample_order
    }
    #[must_use]
    pub fn set_sample_order(mut self, order: SampleOrder) -> Self {
        self.sample_order = order;
        self
    }
    pub const fn text_line_width(&self) -> usize {
        self.text_line_width
    }
    /// Set the column budget for `P2` rows
    ///
    /// A value of zero is treated as one column.
    #[must_use]
    pub fn set_text_line_width(mut self, width: usize) -> Self {
        self.text_line_width = width;
        self
    }
}

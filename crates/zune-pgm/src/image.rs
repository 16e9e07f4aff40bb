/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The in-memory grayscale image
//!
//! Pixels are stored row-major, the sample at `(x, y)` lives at
//! index `y * width + x` and every buffer holds exactly
//! `width * height` samples.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use zune_core::log::trace;
use zune_core::options::DecoderOptions;

use crate::decoder::PgmDecoder;
use crate::encoder::PgmEncoder;
use crate::errors::PgmErrors;
use crate::format::PgmFormat;
use crate::options::{default_decoder_options, PgmOptions};

/// A grayscale raster image together with its PGM metadata
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PgmImage {
    pub(crate) width:     u16,
    pub(crate) height:    u16,
    pub(crate) max_value: u16,
    pub(crate) format:    PgmFormat,
    pub(crate) pixels:    Vec<u16>
}

impl Default for PgmImage {
    fn default() -> Self {
        PgmImage::with_dimensions(0, 0, 255)
    }
}

impl PgmImage {
    /// Create an empty image
    ///
    /// The image has no pixels, uses the binary format and
    /// a max value of 255.
    pub fn new() -> PgmImage {
        PgmImage::default()
    }

    /// Create a `width` by `height` image filled with zeroes
    ///
    /// The format is always [`PgmFormat::Binary`], use
    /// [`set_format`](Self::set_format) to change it.
    pub fn with_dimensions(width: u16, height: u16, max_value: u16) -> PgmImage {
        PgmImage {
            width,
            height,
            max_value,
            format: PgmFormat::Binary,
            pixels: vec![0; usize::from(width) * usize::from(height)]
        }
    }

    /// Decode the PGM file at `path` with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PgmImage, PgmErrors> {
        PgmImage::open_with_options(path, default_decoder_options(), PgmOptions::default())
    }

    /// Decode the PGM file at `path`
    ///
    /// See [`PgmDecoder::new_with_options`] for how `options` are used.
    pub fn open_with_options<P: AsRef<Path>>(
        path: P, options: DecoderOptions, pgm_options: PgmOptions
    ) -> Result<PgmImage, PgmErrors> {
        let file = File::open(path)?;

        PgmDecoder::new_with_options(BufReader::new(file), options, pgm_options).decode()
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Return `(width, height)`
    pub const fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// The magic number, either `P2` or `P5`
    pub const fn magic_number(&self) -> &'static str {
        self.format.magic()
    }

    pub const fn format(&self) -> PgmFormat {
        self.format
    }

    /// Exclusive upper bound for samples accepted by [`set_pixel`](Self::set_pixel)
    pub const fn max_value(&self) -> u16 {
        self.max_value
    }

    /// All samples in row-major order
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Return the sample at `(x, y)` or `None` if the coordinate
    /// is outside the image
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Overwrite the sample at `(x, y)`
    ///
    /// # Errors
    /// [`PgmErrors::OutOfRange`] if `x >= width`, `y >= height`
    /// or `value >= max_value`
    pub fn set_pixel(&mut self, x: u16, y: u16, value: u16) -> Result<(), PgmErrors> {
        if x >= self.width {
            return Err(PgmErrors::OutOfRange(format!(
                "x ({x}) must be less than the image width ({})",
                self.width
            )));
        }
        if y >= self.height {
            return Err(PgmErrors::OutOfRange(format!(
                "y ({y}) must be less than the image height ({})",
                self.height
            )));
        }
        if value >= self.max_value {
            return Err(PgmErrors::OutOfRange(format!(
                "value ({value}) must be less than the image max value ({})",
                self.max_value
            )));
        }
        let index = self.index(x, y);
        self.pixels[index] = value;

        Ok(())
    }

    /// Change the magic number, accepting exactly `P2` or `P5`
    ///
    /// Samples are left untouched.
    pub fn set_magic_number(&mut self, magic: &str) -> Result<(), PgmErrors> {
        self.format = PgmFormat::from_magic(magic)?;
        Ok(())
    }

    pub fn set_format(&mut self, format: PgmFormat) {
        self.format = format;
    }

    /// Replace the max value
    ///
    /// Existing samples are neither validated nor clamped against
    /// the new bound.
    pub fn set_max_value(&mut self, max_value: u16) {
        self.max_value = max_value;
    }

    /// Resize the canvas to `width` by `height`
    ///
    /// Samples inside the overlap of the old and new grids keep their
    /// position, new cells are zero and cells outside the new grid
    /// are dropped. This does not scale the content.
    ///
    /// # Errors
    /// [`PgmErrors::InvalidArgument`] if either dimension is zero, the
    /// image is left unchanged in that case.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), PgmErrors> {
        if width == 0 || height == 0 {
            return Err(PgmErrors::InvalidArgument(format!(
                "cannot resize to {width}x{height}, dimensions must be non-zero"
            )));
        }
        trace!(
            "Resizing from {}x{} to {width}x{height}",
            self.width,
            self.height
        );
        let new_width = usize::from(width);
        let copy_width = usize::from(self.width.min(width));
        let copy_height = self.height.min(height);

        let mut pixels = vec![0; new_width * usize::from(height)];

        for (y, out_row) in (0..copy_height).zip(pixels.chunks_exact_mut(new_width)) {
            out_row[..copy_width].copy_from_slice(&self.row(y)[..copy_width]);
        }
        self.pixels = pixels;
        self.width = width;
        self.height = height;

        Ok(())
    }

    /// Encode to the file at `path` using default options
    ///
    /// The file is created or truncated, on failure it may be left
    /// partially written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PgmErrors> {
        self.save_with_options(path, PgmOptions::default())
    }

    pub fn save_with_options<P: AsRef<Path>>(
        &self, path: P, options: PgmOptions
    ) -> Result<(), PgmErrors> {
        let mut writer = BufWriter::new(File::create(path)?);

        PgmEncoder::new_with_options(self, options).encode(&mut writer)?;
        writer.flush()?;

        Ok(())
    }

    /// Encode into `writer` returning the number of bytes written
    pub fn encode_to<W: Write>(&self, writer: W) -> Result<usize, PgmErrors> {
        PgmEncoder::new(self).encode(writer)
    }

    /// Row `y` of the image
    ///
    /// Fast path for the codec and resizing, callers must
    /// guarantee `y < height`, otherwise this panics.
    #[inline(always)]
    pub(crate) fn row(&self, y: u16) -> &[u16] {
        let width = usize::from(self.width);
        let start = usize::from(y) * width;

        &self.pixels[start..start + width]
    }

    #[inline(always)]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

#[cfg(test)]
mod tests {
    use crate::{PgmErrors, PgmFormat, PgmImage};

    /// A 5x5 image where `(x, y)` holds `y * 5 + x`
    fn counting_image() -> PgmImage {
        let mut image = PgmImage::with_dimensions(5, 5, 255);
        for y in 0..5 {
            for x in 0..5 {
                image.set_pixel(x, y, y * 5 + x).unwrap();
            }
        }
        image
    }

    #[test]
    fn default_image() {
        let image = PgmImage::new();

        assert_eq!(image.dimensions(), (0, 0));
        assert!(image.pixels().is_empty());
        assert_eq!(image.magic_number(), "P5");
        assert_eq!(image.max_value(), 255);
        assert_eq!(image.get_pixel(0, 0), None);
    }

    #[test]
    fn sized_image_is_zeroed() {
        let image = PgmImage::with_dimensions(13, 7, 100);

        assert_eq!(image.dimensions(), (13, 7));
        assert_eq!(image.pixels().len(), 13 * 7);
        for y in 0..7 {
            for x in 0..13 {
                assert_eq!(image.get_pixel(x, y), Some(0));
            }
        }
        assert_eq!(image.magic_number(), "P5");
        assert_eq!(image.max_value(), 100);
    }

    #[test]
    fn set_then_get() {
        let mut image = PgmImage::with_dimensions(4, 3, 300);

        image.set_pixel(3, 2, 299).unwrap();
        image.set_pixel(0, 1, 7).unwrap();

        assert_eq!(image.get_pixel(3, 2), Some(299));
        assert_eq!(image.get_pixel(0, 1), Some(7));
        assert_eq!(image.pixels()[2 * 4 + 3], 299);
    }

    #[test]
    fn set_pixel_bounds() {
        let mut image = PgmImage::with_dimensions(4, 3, 10);

        assert!(matches!(image.set_pixel(4, 0, 1), Err(PgmErrors::OutOfRange(_))));
        assert!(matches!(image.set_pixel(0, 3, 1), Err(PgmErrors::OutOfRange(_))));
        // max value itself is not a valid sample
        assert!(matches!(image.set_pixel(0, 0, 10), Err(PgmErrors::OutOfRange(_))));
        assert!(image.set_pixel(0, 0, 9).is_ok());
        assert_eq!(image.get_pixel(4, 0), None);
        assert_eq!(image.get_pixel(0, 3), None);
    }

    #[test]
    fn magic_number_changes_keep_pixels() {
        let mut image = counting_image();
        let before = image.pixels().to_vec();

        image.set_magic_number("P2").unwrap();
        assert_eq!(image.format(), PgmFormat::Ascii);
        assert_eq!(image.pixels(), &before[..]);

        for bad in ["P1", "P3", "P4", "P6", "PGM"] {
            assert!(matches!(
                image.set_magic_number(bad),
                Err(PgmErrors::InvalidArgument(_))
            ));
        }
        assert_eq!(image.magic_number(), "P2");
    }

    #[test]
    fn set_max_value_does_not_clamp() {
        let mut image = counting_image();

        image.set_max_value(3);
        assert_eq!(image.max_value(), 3);
        assert_eq!(image.get_pixel(4, 4), Some(24));
    }

    #[test]
    fn grow_keeps_content() {
        let mut image = counting_image();
        image.resize(7, 7).unwrap();

        assert_eq!(image.dimensions(), (7, 7));
        assert_eq!(image.pixels().len(), 49);
        for y in 0..7 {
            for x in 0..7 {
                let expected = if x < 5 && y < 5 { y * 5 + x } else { 0 };
                assert_eq!(image.get_pixel(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn shrink_keeps_top_left() {
        let mut image = counting_image();
        image.resize(3, 3).unwrap();

        assert_eq!(image.pixels(), &[0, 1, 2, 5, 6, 7, 10, 11, 12]);
    }

    #[test]
    fn mixed_resize() {
        let mut image = counting_image();
        image.resize(2, 8).unwrap();

        assert_eq!(image.dimensions(), (2, 8));
        assert_eq!(image.get_pixel(1, 4), Some(21));
        assert_eq!(image.get_pixel(1, 5), Some(0));
    }

    #[test]
    fn resize_empty_image() {
        let mut image = PgmImage::new();
        image.resize(2, 2).unwrap();

        assert_eq!(image.pixels(), &[0; 4]);
    }

    #[test]
    fn zero_resize_is_rejected() {
        let mut image = counting_image();
        let before = image.clone();

        assert!(matches!(image.resize(0, 4), Err(PgmErrors::InvalidArgument(_))));
        assert!(matches!(image.resize(4, 0), Err(PgmErrors::InvalidArgument(_))));
        assert!(matches!(image.resize(0, 0), Err(PgmErrors::InvalidArgument(_))));
        assert_eq!(image, before);
    }
}

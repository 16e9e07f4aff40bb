/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoding support for `P2` and `P5` files
use std::io::Write;

use zune_core::log::trace;

use crate::errors::PgmErrors;
use crate::format::PgmFormat;
use crate::image::PgmImage;
use crate::options::PgmOptions;

/// Size of the scratch buffer binary payloads are written through
const STAGING_SIZE: usize = 512;

/// A PGM encoder
///
/// The payload encoding is taken from the image's format, samples
/// take one byte when the max value is below 256 and two big-endian
/// bytes otherwise.
///
/// # Example
/// ```
/// use zune_pgm::{PgmEncoder, PgmImage};
///
/// let mut image = PgmImage::with_dimensions(2, 1, 255);
/// image.set_pixel(1, 0, 7).unwrap();
///
/// let mut out = vec![];
/// PgmEncoder::new(&image).encode(&mut out).unwrap();
///
/// assert_eq!(out, b"P5\n2 1\n255\n\x00\x07");
/// ```
pub struct PgmEncoder<'a> {
    image:   &'a PgmImage,
    options: PgmOptions
}

impl<'a> PgmEncoder<'a> {
    /// Create a new encoder for `image` with default options
    pub fn new(image: &'a PgmImage) -> PgmEncoder<'a> {
        PgmEncoder::new_with_options(image, PgmOptions::default())
    }

    /// Create an encoder, only `text_line_width` of `options` is used
    pub fn new_with_options(image: &'a PgmImage, options: PgmOptions) -> PgmEncoder<'a> {
        PgmEncoder { image, options }
    }

    /// Write the header followed by the payload into `writer`
    ///
    /// Returns the number of bytes written.
    pub fn encode<W: Write>(&self, mut writer: W) -> Result<usize, PgmErrors> {
        let header = format!(
            "{}\n{} {}\n{}\n",
            self.image.format(),
            self.image.width(),
            self.image.height(),
            self.image.max_value()
        );
        writer.write_all(header.as_bytes())?;

        let payload = match self.image.format() {
            PgmFormat::Binary => self.encode_binary(&mut writer)?,
            PgmFormat::Ascii => self.encode_ascii(&mut writer)?
        };
        trace!("Wrote {} payload bytes", payload);

        Ok(header.len() + payload)
    }

    fn encode_binary<W: Write>(&self, writer: &mut W) -> Result<usize, PgmErrors> {
        let wide = self.image.max_value() >= 256;

        let mut staging = [0_u8; STAGING_SIZE];
        let mut position = 0;
        let mut written = 0;

        for sample in self.image.pixels() {
            let bytes = sample.to_be_bytes();
            let bytes = if wide { &bytes[..] } else { &bytes[1..] };

            if position + bytes.len() > STAGING_SIZE {
                writer.write_all(&staging[..position])?;
                written += position;
                position = 0;
            }
            staging[position..position + bytes.len()].copy_from_slice(bytes);
            position += bytes.len();
        }
        writer.write_all(&staging[..position])?;
        written += position;

        Ok(written)
    }

    fn encode_ascii<W: Write>(&self, writer: &mut W) -> Result<usize, PgmErrors> {
        let wrap = text_wrap_limit(self.image.max_value(), self.options.text_line_width());

        let mut text = String::new();
        let mut written = 0;

        for y in 0..self.image.height() {
            let row = self.image.row(y);
            let mut count = 0;

            for (x, sample) in row.iter().enumerate() {
                if count > 0 {
                    text.push(' ');
                }
                text.push_str(&sample.to_string());
                count += 1;

                if count == wrap && x + 1 != row.len() {
                    text.push('\n');
                    count = 0;
                }
            }
            if !row.is_empty() {
                text.push('\n');
            }
            writer.write_all(text.as_bytes())?;
            written += text.len();
            text.clear();
        }
        Ok(written)
    }
}

/// Samples per text line so that a line of the widest samples
/// stays within `line_width` columns
fn text_wrap_limit(max_value: u16, line_width: usize) -> usize {
    let digits = max_value.to_string().len();

    line_width.max(1).div_ceil(digits + 1)
}

#[cfg(test)]
mod tests {
    use super::{text_wrap_limit, PgmEncoder};
    use crate::{PgmFormat, PgmImage, PgmOptions};

    fn ascii_image(width: u16, height: u16, max_value: u16) -> PgmImage {
        let mut image = PgmImage::with_dimensions(width, height, max_value);
        image.set_format(PgmFormat::Ascii);

        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, (y * width + x) % max_value).unwrap();
            }
        }
        image
    }

    #[test]
    fn wrap_limits() {
        assert_eq!(text_wrap_limit(255, 70), 18);
        assert_eq!(text_wrap_limit(245, 70), 18);
        assert_eq!(text_wrap_limit(9, 70), 35);
        assert_eq!(text_wrap_limit(0, 70), 35);
        assert_eq!(text_wrap_limit(1000, 70), 14);
        assert_eq!(text_wrap_limit(65535, 70), 12);
        assert_eq!(text_wrap_limit(255, 0), 1);
    }

    #[test]
    fn binary_8_bit_truncates_to_low_byte() {
        let mut image = PgmImage::with_dimensions(2, 1, 255);
        image.set_max_value(1000);
        image.set_pixel(0, 0, 0x0123).unwrap();
        image.set_max_value(255);

        let mut out = vec![];
        PgmEncoder::new(&image).encode(&mut out).unwrap();

        assert_eq!(out, b"P5\n2 1\n255\n\x23\x00");
    }

    #[test]
    fn binary_16_bit_is_big_endian() {
        let mut image = PgmImage::with_dimensions(2, 1, 1024);
        image.set_pixel(0, 0, 0x0102).unwrap();
        image.set_pixel(1, 0, 0x03FF).unwrap();

        let mut out = vec![];
        let written = PgmEncoder::new(&image).encode(&mut out).unwrap();

        assert_eq!(out, b"P5\n2 1\n1024\n\x01\x02\x03\xFF");
        assert_eq!(written, out.len());
    }

    #[test]
    fn binary_payload_larger_than_staging() {
        let image = PgmImage::with_dimensions(700, 3, 60000);

        let mut out = vec![];
        PgmEncoder::new(&image).encode(&mut out).unwrap();

        assert_eq!(out.len(), "P5\n700 3\n60000\n".len() + 700 * 3 * 2);
    }

    #[test]
    fn ascii_rows_end_in_newlines() {
        let image = ascii_image(3, 2, 100);

        let mut out = vec![];
        PgmEncoder::new(&image).encode(&mut out).unwrap();

        assert_eq!(out, b"P2\n3 2\n100\n0 1 2\n3 4 5\n");
    }

    #[test]
    fn ascii_soft_wrap() {
        // max value 9 gives one digit, so 35 samples per line
        let image = ascii_image(40, 2, 9);

        let mut out = vec![];
        PgmEncoder::new(&image).encode(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().skip(3).collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split(' ').count(), 35);
        assert_eq!(lines[1].split(' ').count(), 5);
        // the counter restarts at every row
        assert_eq!(lines[2].split(' ').count(), 35);
        assert_eq!(lines[3].split(' ').count(), 5);
        assert!(lines.iter().all(|l| l.len() <= 70));
    }

    #[test]
    fn ascii_exact_wrap_has_no_blank_line() {
        let image = ascii_image(35, 1, 9);

        let mut out = vec![];
        PgmEncoder::new(&image).encode(&mut out).unwrap();

        assert!(!String::from_utf8(out).unwrap().contains("\n\n"));
    }

    #[test]
    fn custom_line_width() {
        let image = ascii_image(4, 1, 100);
        let options = PgmOptions::default().set_text_line_width(8);

        let mut out = vec![];
        PgmEncoder::new_with_options(&image, options)
            .encode(&mut out)
            .unwrap();

        assert_eq!(out, b"P2\n4 1\n100\n0 1\n2 3\n");
    }

    #[test]
    fn empty_image_is_header_only() {
        let mut out = vec![];
        PgmImage::new().encode_to(&mut out).unwrap();

        assert_eq!(out, b"P5\n0 0\n255\n");
    }
}

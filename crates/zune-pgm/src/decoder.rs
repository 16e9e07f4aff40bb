/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding of `P2` and `P5` files
//!
//! The header is a stream of whitespace separated tokens: magic
//! number, width, height and max value. Fields may be spread over any
//! number of lines and a token starting with `#` comments out the rest
//! of its line.
//!
//! A binary payload starts right after the line holding the max value,
//! a text payload may start on that same line.
//!
//! Tokens are pulled straight out of the reader's buffer, so neither
//! long comments nor lines without a newline are ever held in memory.
use std::io::{BufRead, ErrorKind};

use zune_core::log::{info, trace, warn};
use zune_core::options::DecoderOptions;

use crate::errors::PgmErrors;
use crate::format::PgmFormat;
use crate::image::PgmImage;
use crate::options::{default_decoder_options, PgmOptions, SampleOrder};

/// Size of the scratch buffer binary payloads are read through
const STAGING_SIZE: usize = 512;

/// Longest token kept, anything longer cannot be a valid field or sample
const MAX_TOKEN_LENGTH: usize = 16;

#[derive(Copy, Clone, Debug)]
struct PgmHeader {
    format:    PgmFormat,
    width:     u16,
    height:    u16,
    max_value: u16
}

/// A PGM decoder
///
/// Reads from anything implementing [`BufRead`], for files wrap them
/// in a [`BufReader`](std::io::BufReader) or use [`PgmImage::open`].
///
/// # Example
/// ```
/// use zune_pgm::PgmDecoder;
///
/// let data = b"P2\n# tiny\n3 1\n10\n1 2 3\n";
/// let image = PgmDecoder::new(&data[..]).decode().unwrap();
///
/// assert_eq!(image.pixels(), &[1, 2, 3]);
/// ```
pub struct PgmDecoder<R: BufRead> {
    reader:      R,
    options:     DecoderOptions,
    pgm_options: PgmOptions,
    header:      Option<PgmHeader>
}

impl<R: BufRead> PgmDecoder<R> {
    /// Create a new decoder with default options
    ///
    /// Strict mode is off, see [`default_decoder_options`].
    pub fn new(reader: R) -> PgmDecoder<R> {
        PgmDecoder::new_with_options(reader, default_decoder_options(), PgmOptions::default())
    }

    /// Create a new decoder with the specified options
    ///
    /// Respects `max_width`, `max_height` and `strict_mode` of
    /// `options`. Note that `DecoderOptions::default()` is strict, so
    /// samples that are not below the max value are rejected.
    pub fn new_with_options(
        reader: R, options: DecoderOptions, pgm_options: PgmOptions
    ) -> PgmDecoder<R> {
        PgmDecoder {
            reader,
            options,
            pgm_options,
            header: None
        }
    }

    /// Read the header and store it in internal state
    ///
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), PgmErrors> {
        if self.header.is_some() {
            return Ok(());
        }
        let mut tokens = Tokenizer::header(self.pgm_options.max_header_lines());

        let token = header_field(&mut tokens, &mut self.reader, "magic number")?;
        let format = parse_magic(token)?;

        let token = header_field(&mut tokens, &mut self.reader, "width")?;
        let width = parse_header_integer(token, "width")?;

        let token = header_field(&mut tokens, &mut self.reader, "height")?;
        let height = parse_header_integer(token, "height")?;

        let token = header_field(&mut tokens, &mut self.reader, "max value")?;
        let max_value = parse_header_integer(token, "max value")?;

        if max_value == 0 {
            return Err(PgmErrors::MalformedHeader(
                "max value must be greater than zero".to_string()
            ));
        }
        if usize::from(width) > self.options.get_max_width() {
            return Err(PgmErrors::MalformedHeader(format!(
                "width {width} greater than max width {}",
                self.options.get_max_width()
            )));
        }
        if usize::from(height) > self.options.get_max_height() {
            return Err(PgmErrors::MalformedHeader(format!(
                "height {height} greater than max height {}",
                self.options.get_max_height()
            )));
        }
        if format == PgmFormat::Binary {
            // raw samples begin on the next line
            skip_line(&mut self.reader)?;
        }
        info!("Format: {format}");
        info!("Width: {width}, height: {height}");
        info!("Max value: {max_value}");

        self.header = Some(PgmHeader {
            format,
            width,
            height,
            max_value
        });

        Ok(())
    }

    /// Return image dimensions or none if headers aren't decoded
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        self.header.map(|h| (h.width, h.height))
    }

    /// Return the max value or none if headers aren't decoded
    pub fn max_value(&self) -> Option<u16> {
        self.header.map(|h| h.max_value)
    }

    /// Return the payload encoding or none if headers aren't decoded
    pub fn format(&self) -> Option<PgmFormat> {
        self.header.map(|h| h.format)
    }

    /// Decode the header if needed and then the payload
    pub fn decode(&mut self) -> Result<PgmImage, PgmErrors> {
        self.decode_headers()?;

        let Some(header) = self.header else {
            return Err(PgmErrors::MalformedHeader(
                "headers not decoded".to_string()
            ));
        };

        let mut image = PgmImage::with_dimensions(header.width, header.height, header.max_value);
        image.set_format(header.format);

        match header.format {
            PgmFormat::Binary => {
                trace!("Decoding binary payload");
                read_binary(
                    &mut self.reader,
                    &mut image.pixels,
                    header.max_value,
                    self.pgm_options.sample_order()
                )?;
            }
            PgmFormat::Ascii => {
                trace!("Decoding text payload");
                read_ascii(&mut self.reader, &mut image.pixels)?;
            }
        }
        self.check_samples(&image)?;

        Ok(image)
    }

    fn check_samples(&self, image: &PgmImage) -> Result<(), PgmErrors> {
        let max_value = image.max_value();
        let outliers = image.pixels().iter().filter(|s| **s >= max_value).count();

        if outliers == 0 {
            return Ok(());
        }
        if self.options.get_strict_mode() {
            return Err(PgmErrors::OutOfRange(format!(
                "{outliers} samples are not below the max value {max_value}"
            )));
        }
        warn!("{outliers} samples are not below the max value {max_value}, keeping them");

        Ok(())
    }
}

/// Pulls whitespace separated tokens out of a reader
struct Tokenizer {
    token:        Vec<u8>,
    newlines:     usize,
    /// Set while reading a header: `#` starts a comment and reading
    /// stops once this many lines went by
    header_lines: Option<usize>
}

impl Tokenizer {
    fn header(max_lines: usize) -> Tokenizer {
        Tokenizer {
            token:        Vec::with_capacity(MAX_TOKEN_LENGTH),
            newlines:     0,
            header_lines: Some(max_lines)
        }
    }

    fn payload() -> Tokenizer {
        Tokenizer {
            token:        Vec::with_capacity(MAX_TOKEN_LENGTH),
            newlines:     0,
            header_lines: None
        }
    }

    /// Return the next token or `None` at end of input
    ///
    /// The whitespace byte ending a token is left in the reader.
    fn next_token<R: BufRead>(&mut self, reader: &mut R) -> Result<Option<&[u8]>, PgmErrors> {
        self.token.clear();
        let mut length = 0;
        let mut in_comment = false;

        loop {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into())
            };
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            let mut complete = false;

            for &byte in buf {
                if length > 0 && byte.is_ascii_whitespace() {
                    complete = true;
                    break;
                }
                used += 1;

                if byte == b'\n' {
                    in_comment = false;
                    self.newlines += 1;

                    if let Some(max_lines) = self.header_lines {
                        if self.newlines >= max_lines {
                            return Err(PgmErrors::MalformedHeader(format!(
                                "header incomplete after {} lines",
                                self.newlines
                            )));
                        }
                    }
                } else if in_comment || byte.is_ascii_whitespace() {
                    continue;
                } else if byte == b'#' && length == 0 && self.header_lines.is_some() {
                    in_comment = true;
                } else {
                    if length < MAX_TOKEN_LENGTH {
                        self.token.push(byte);
                    }
                    length += 1;
                }
            }
            reader.consume(used);

            if complete {
                break;
            }
        }
        if length == 0 {
            return Ok(None);
        }
        if length > MAX_TOKEN_LENGTH {
            let message = format!(
                "token `{}...` is {length} bytes long",
                String::from_utf8_lossy(&self.token)
            );
            return Err(match self.header_lines {
                Some(_) => PgmErrors::MalformedHeader(message),
                None => PgmErrors::InvalidSample(message)
            });
        }
        Ok(Some(self.token.as_slice()))
    }
}

fn header_field<'t, R: BufRead>(
    tokens: &'t mut Tokenizer, reader: &mut R, field: &str
) -> Result<&'t [u8], PgmErrors> {
    tokens.next_token(reader)?.ok_or_else(|| {
        PgmErrors::MalformedHeader(format!("end of file before the {field} was found"))
    })
}

/// Drop everything up to and including the next newline
fn skip_line<R: BufRead>(reader: &mut R) -> Result<(), PgmErrors> {
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into())
        };
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|b| *b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let length = buf.len();
                reader.consume(length);
            }
        }
    }
}

/// Fill `pixels` from raw bytes, one byte per sample below 256 and
/// two otherwise
fn read_binary<R: BufRead>(
    reader: &mut R, pixels: &mut [u16], max_value: u16, order: SampleOrder
) -> Result<(), PgmErrors> {
    let bytes_per_sample = if max_value < 256 { 1 } else { 2 };
    let expected = pixels.len();

    let mut staging = [0_u8; STAGING_SIZE];
    let mut filled = 0;
    // high byte of a sample split across two reads
    let mut high = None;

    while filled < expected {
        let needed = (expected - filled) * bytes_per_sample - usize::from(high.is_some());
        let wanted = needed.min(STAGING_SIZE);

        let read = match reader.read(&mut staging[..wanted]) {
            Ok(0) => return Err(PgmErrors::TruncatedPayload(expected, filled)),
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into())
        };

        for byte in &staging[..read] {
            if bytes_per_sample == 1 {
                pixels[filled] = u16::from(*byte);
                filled += 1;
            } else if let Some(first) = high.take() {
                pixels[filled] = order.combine(first, *byte);
                filled += 1;
            } else {
                high = Some(*byte);
            }
        }
    }
    Ok(())
}

/// Fill `pixels` from decimal tokens
fn read_ascii<R: BufRead>(reader: &mut R, pixels: &mut [u16]) -> Result<(), PgmErrors> {
    let expected = pixels.len();
    let mut tokens = Tokenizer::payload();

    for (filled, sample) in pixels.iter_mut().enumerate() {
        match tokens.next_token(reader)? {
            Some(token) => *sample = parse_sample(token)?,
            None => return Err(PgmErrors::TruncatedPayload(expected, filled))
        }
    }
    Ok(())
}

fn parse_magic(token: &[u8]) -> Result<PgmFormat, PgmErrors> {
    match token {
        b"P5" => Ok(PgmFormat::Binary),
        b"P2" => Ok(PgmFormat::Ascii),
        _ => Err(PgmErrors::MalformedHeader(format!(
            "unsupported magic number `{}`, supported versions are P2 and P5",
            String::from_utf8_lossy(token)
        )))
    }
}

fn parse_header_integer(token: &[u8], field: &str) -> Result<u16, PgmErrors> {
    parse_u16(token).ok_or_else(|| {
        PgmErrors::MalformedHeader(format!(
            "{field} `{}` is not an integer in 0..=65535",
            String::from_utf8_lossy(token)
        ))
    })
}

fn parse_sample(token: &[u8]) -> Result<u16, PgmErrors> {
    parse_u16(token).ok_or_else(|| {
        PgmErrors::InvalidSample(format!(
            "`{}` is not an integer in 0..=65535",
            String::from_utf8_lossy(token)
        ))
    })
}

fn parse_u16(token: &[u8]) -> Option<u16> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    core::str::from_utf8(token).ok()?.parse().ok()
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding of Portable Graymap images
//!
//! This crate handles the two grayscale netpbm encodings
//!
//! - `P5`: binary samples, one byte each when the max value is below 256,
//!   otherwise two big-endian bytes
//! - `P2`: samples as whitespace separated decimal text
//!
//! Images are held in a [`PgmImage`], a row-major grid of `u16` samples
//! with checked pixel access and canvas resizing.
//!
//! # Example
//! ```no_run
//! use zune_pgm::{PgmErrors, PgmImage};
//!
//! fn main() -> Result<(), PgmErrors> {
//!     let mut image = PgmImage::open("input.pgm")?;
//!
//!     image.resize(64, 64)?;
//!     image.set_magic_number("P2")?;
//!     image.save("output.pgm")
//! }
//! ```
//!
//! # Features
//! - `log`: Logs header fields and warnings through the `log` crate,
//!   enabled by default
//! - `std`: Forwards `std` to `zune-core`, enabled by default
//! - `serde`: Implements `Serialize` for [`PgmFormat`] and the
//!   metadata of [`PgmImage`], its tests need `cargo test --features serde`
pub use decoder::PgmDecoder;
pub use encoder::PgmEncoder;
pub use errors::PgmErrors;
pub use format::PgmFormat;
pub use image::PgmImage;
pub use options::{default_decoder_options, PgmOptions, SampleOrder};
pub use zune_core;

mod decoder;
mod encoder;
mod errors;
mod format;
mod image;
mod options;
mod serde;

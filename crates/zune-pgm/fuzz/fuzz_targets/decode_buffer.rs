#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = zune_pgm::PgmDecoder::new(data);

    if let Ok(image) = decoder.decode() {
        // whatever decodes must encode again
        let mut sink = vec![];
        let _ = image.encode_to(&mut sink);
    }
});

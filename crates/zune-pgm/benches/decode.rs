use std::fs::read;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use zune_pgm::{PgmDecoder, PgmImage};

fn decode_zune_pgm(data: &[u8]) -> PgmImage {
    PgmDecoder::new(data).decode().unwrap()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pgm: Simple decode");

    for name in ["gradient_p5.pgm", "gradient_p2.pgm"] {
        let path = env!("CARGO_MANIFEST_DIR").to_string() + "/test-images/" + name;
        let data = read(path).unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| black_box(decode_zune_pgm(data.as_slice())))
        });
    }
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_decode);

criterion_main!(benches);

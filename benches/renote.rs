//! Benchmark for renoting a generated chart.

use std::{collections::BTreeMap, num::NonZeroU64};

use bms_renote::renote::prelude::*;
use criterion::{Criterion, Throughput};

/// Builds a chart of `measures` measures with 16th notes on two autoplay lines, and a request
/// moving every other note into the keys.
fn generate(measures: u16) -> (Vec<u8>, RenoteRequest) {
    let mut source = b"#PLAYER 1\r\n#TITLE bench\r\n".to_vec();
    let mut request = RenoteRequest::default();
    for measure in 0..measures {
        if measure % 8 == 7 {
            source.extend_from_slice(format!("#{measure:03}02:0.75\r\n").as_bytes());
        }
        let line: String = (0..16).map(|i| format!("{:02X}", i + 1)).collect();
        source.extend_from_slice(format!("#{measure:03}01:{line}\r\n").as_bytes());
        source.extend_from_slice(format!("#{measure:03}11:{line}\r\n").as_bytes());

        let size = if measure % 8 == 7 { 720 } else { 960 };
        for slot in (0..16).step_by(2) {
            let key = TargetKey::ALL[slot / 2];
            let tick = slot_tick(slot, 16, size);
            let value = format!("{:02X}", slot + 1).parse().expect("valid token");
            let note = if slot % 4 == 0 {
                NoteOverride::long(value, NonZeroU64::new(240).expect("non-zero"))
            } else {
                NoteOverride::new(value)
            };
            request.add_note(
                TimeKey {
                    measure: Measure(measure),
                    tick,
                },
                key,
                note,
            );
        }
    }
    (source, request)
}

fn bench_renote(c: &mut Criterion) {
    let mut group = c.benchmark_group("renote");
    for measures in [16, 256, 999] {
        let (source, request) = generate(measures);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(format!("{measures}_measures"), |b| {
            b.iter(|| renote(std::hint::black_box(&source), std::hint::black_box(&request)));
        });
    }
    group.finish();
}

fn bench_lex(c: &mut Criterion) {
    let (source, _) = generate(999);
    let replace = BTreeMap::new();
    c.bench_function("lex_lines_999_measures", |b| {
        b.iter(|| lex_lines(std::hint::black_box(&source), &replace));
    });
}

fn main() {
    let mut criterion = Criterion::default();
    bench_renote(&mut criterion);
    bench_lex(&mut criterion);
}

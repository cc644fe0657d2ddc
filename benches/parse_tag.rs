use criterion::{black_box, criterion_group, criterion_main, Criterion};
use id3edit::id3::{parser, synch};

/// Build a synthetic v2.3 file: a handful of text frames, one large
/// opaque frame, padding, and a dummy audio payload.
fn sample_file() -> Vec<u8> {
    let frames: &[(&str, Vec<u8>)] = &[
        ("TIT2", b"\x00Some Title".to_vec()),
        ("TPE1", b"\x00Some Artist".to_vec()),
        ("TALB", b"\x00Some Album".to_vec()),
        ("TRCK", b"\x007/12".to_vec()),
        ("TCON", b"\x00Rock".to_vec()),
        ("APIC", {
            let mut payload = b"\x00image/jpeg\x00\x03\x00".to_vec();
            payload.extend(std::iter::repeat(0x42u8).take(64 * 1024));
            payload
        }),
    ];

    let mut body = Vec::new();
    for (id, payload) in frames {
        body.extend_from_slice(id.as_bytes());
        body.extend_from_slice(&synch::encode_plain32(payload.len() as u32));
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(payload);
    }
    body.resize(body.len() + 1024, 0);

    let mut data = b"ID3\x03\x00\x00".to_vec();
    data.extend_from_slice(&synch::encode_synchsafe(body.len() as u32).unwrap());
    data.extend_from_slice(&body);
    data.extend(std::iter::repeat(0xFBu8).take(256 * 1024));
    data
}

fn bench_parse(c: &mut Criterion) {
    let file = sample_file();
    c.bench_function("parse_v23_tag", |b| {
        b.iter(|| parser::parse(black_box(&file)))
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let file = sample_file();
    c.bench_function("parse_and_rebuild", |b| {
        b.iter(|| {
            let tag = parser::parse(black_box(&file));
            id3edit::id3::writer::rebuild_file(&file, &tag).unwrap()
        })
    });
}

criterion_group!(benches, bench_parse, bench_round_trip);
criterion_main!(benches);

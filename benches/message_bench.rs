use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use quic_wire::core::codec::HandshakeCodec;
use quic_wire::protocol::message::HandshakeMessage;
use quic_wire::protocol::server_config::ServerConfig;
use quic_wire::protocol::tag::Tag;
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

fn client_hello(entries: usize) -> HandshakeMessage {
    let mut msg = HandshakeMessage::new(Tag::CHLO);
    for i in 0..entries {
        msg.insert(Tag::from_u32(0x1000 + i as u32), vec![i as u8; 64]);
    }
    msg
}

fn server_config() -> HandshakeMessage {
    let mut scfg = HandshakeMessage::new(Tag::SCFG);
    scfg.insert(Tag::SCID, vec![0xb2; 16]);
    scfg.insert(Tag::KEXS, b"P256C255".to_vec());
    scfg.insert(Tag::AEAD, b"S20PAESG".to_vec());
    scfg.insert(Tag::PUBS, vec![0x20; 35]);
    scfg.insert(Tag::OBIT, vec![0; 8]);
    scfg.insert(Tag::EXPY, 1_494_125_020u64.to_le_bytes().to_vec());
    scfg
}

#[allow(clippy::unwrap_used)]
fn bench_message_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("handshake_message");

    for entries in [4usize, 32, 128] {
        let msg = client_hello(entries);
        let bytes = msg.to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{entries}_entries"), |b| {
            b.iter_batched(
                || (msg.clone(), BytesMut::with_capacity(bytes.len())),
                |(msg, mut buf)| {
                    HandshakeCodec::default().encode(msg, &mut buf).unwrap();
                    buf
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("decode_{entries}_entries"), |b| {
            b.iter_batched(
                || BytesMut::from(&bytes[..]),
                |mut buf| HandshakeCodec::default().decode(&mut buf).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_server_config(c: &mut Criterion) {
    let bytes = server_config().to_bytes().unwrap();
    c.bench_function("server_config_parse", |b| {
        b.iter(|| ServerConfig::parse(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_message_codec, bench_server_config);
criterion_main!(benches);

//! Benchmarks for request building
//!
//! This benchmark measures:
//! - Id-only operations (path interpolation, query parameters)
//! - Flat JSON bodies with defaults applied
//! - Multi-scene createVideo bodies
//! - Binary upload from base64 item payloads

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use heygen_lib_rust::{build_request, BinaryData, Item, OperationKey, ParameterBag};
use serde_json::json;

fn item(value: serde_json::Value) -> Item {
    Item::new(ParameterBag::from_value(value).unwrap())
}

fn create_video_item(scenes: usize) -> Item {
    let scenes: Vec<_> = (0..scenes)
        .map(|i| {
            json!({
                "characterType": if i % 2 == 0 { "avatar" } else { "talking_photo" },
                "avatarId": format!("avatar-{}", i),
                "talkingPhotoId": format!("photo-{}", i),
                "voiceType": "text",
                "voiceId": "1bd001e7e50f421d891986aad5158bc8",
                "inputText": format!("Scene number {} of the benchmark video.", i),
                "backgroundType": "color",
                "backgroundColor": "#ffffff"
            })
        })
        .collect();
    item(json!({
        "title": "bench",
        "caption": true,
        "dimension": { "dimensionValues": { "width": 1920, "height": 1080 } },
        "videoInput": { "videoInputValues": scenes }
    }))
}

fn bench_simple_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_building");

    let status = item(json!({ "videoId": "v-123" }));
    let details = item(json!({ "avatarId": "a-123" }));
    let photo = item(json!({ "name": "Ada" }));
    let looks = item(json!({ "groupId": "g-1", "imageKeys": "k1, k2, k3, k4, k5" }));

    group.bench_function("get_video_status", |b| {
        b.iter(|| build_request(OperationKey::GetVideoStatus, black_box(&status)).unwrap())
    });
    group.bench_function("get_avatar_details", |b| {
        b.iter(|| build_request(OperationKey::GetAvatarDetails, black_box(&details)).unwrap())
    });
    group.bench_function("generate_photo_defaults", |b| {
        b.iter(|| build_request(OperationKey::GeneratePhoto, black_box(&photo)).unwrap())
    });
    group.bench_function("add_looks", |b| {
        b.iter(|| build_request(OperationKey::AddLooks, black_box(&looks)).unwrap())
    });

    group.finish();
}

fn bench_create_video(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_video");

    for scenes in [1usize, 10, 50] {
        let input = create_video_item(scenes);
        group.throughput(Throughput::Elements(scenes as u64));
        group.bench_with_input(BenchmarkId::new("scenes", scenes), &input, |b, input| {
            b.iter(|| build_request(OperationKey::CreateVideo, black_box(input)).unwrap())
        });
    }

    group.finish();
}

fn bench_binary_upload(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_upload");

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let bytes = vec![0x5au8; size];
        let input = item(json!({ "binaryData": true }))
            .with_binary("data", BinaryData::new(&bytes, "image/png"));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("bytes", size), &input, |b, input| {
            b.iter(|| build_request(OperationKey::DocumentUpload, black_box(input)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_operations,
    bench_create_video,
    bench_binary_upload
);
criterion_main!(benches);

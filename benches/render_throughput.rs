use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eeprobe::render::{Registry, RenderContext, DEFAULT_MAX_DEPTH};
use eeprobe::{DispatchEngine, InMemorySource, JobHandle, ProbeTarget, TypeTag};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn image_description(bands: usize, properties: usize) -> serde_json::Value {
    let band_list: Vec<serde_json::Value> = (0..bands)
        .map(|i| {
            json!({
                "id": format!("B{i}"),
                "data_type": {"precision": "int", "min": 0, "max": 65535},
                "crs": "EPSG:32610",
            })
        })
        .collect();
    let props: serde_json::Map<String, serde_json::Value> = (0..properties)
        .map(|i| (format!("prop_{i:04}"), json!(i)))
        .collect();
    json!({
        "type": "Image",
        "id": "synthetic/benchmark/scene",
        "bands": band_list,
        "properties": props,
    })
}

fn bench_render_tree(c: &mut Criterion) {
    let registry = Registry::with_defaults();
    let mut group = c.benchmark_group("render_tree");

    for &size in &[4usize, 64, 512] {
        let description = image_description(size, size);

        group.bench_with_input(
            BenchmarkId::new("image", size),
            &description,
            |b, description| {
                b.iter(|| {
                    let ctx = RenderContext::new(&registry, DEFAULT_MAX_DEPTH);
                    let tree = ctx.render(&TypeTag::Image, description).unwrap();
                    black_box(tree);
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("dispatch_batch");
    group.sample_size(10);
    group.measurement_time(std::time::Duration::from_secs(5));

    for &count in &[1usize, 16, 64] {
        let engine = DispatchEngine::new(Arc::new(InMemorySource::from_objects(
            (0..count).map(|i| (format!("obj_{i:03}"), image_description(8, 16))),
        )));

        group.bench_with_input(BenchmarkId::new("images", count), &engine, |b, engine| {
            b.iter(|| {
                rt.block_on(async {
                    let mut handles = engine
                        .dispatch_all(
                            (0..count)
                                .map(|i| ProbeTarget::remote(format!("obj_{i:03}"), "Image")),
                        )
                        .await;
                    futures::future::join_all(handles.iter_mut().map(JobHandle::wait)).await;
                    black_box(handles.len());
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_tree, bench_dispatch_batch);
criterion_main!(benches);

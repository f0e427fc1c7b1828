//! Batch import benchmarks

use brushbatch_lib::assets::AssetSession;
use brushbatch_lib::config::ImportSettings;
use brushbatch_lib::import::{allocate, BatchImportJob, JobRequest, NullProgress, TickKind};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{ImageBuffer, Rgb};
use std::collections::HashSet;
use std::path::PathBuf;

fn reserved_with_collisions(count: usize) -> HashSet<String> {
    let mut reserved: HashSet<String> = (1..count).map(|i| format!("tip_Brush_{}", i)).collect();
    reserved.insert("tip_Brush".to_string());
    reserved
}

fn prepare_folder(count: usize) -> (PathBuf, PathBuf) {
    let root = std::env::temp_dir().join(format!("brushbatch_bench_{}", count));
    let images = root.join("images");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&images).unwrap_or_default();

    for i in 0..count {
        let img = ImageBuffer::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, i as u8]));
        let _ = img.save(images.join(format!("tip_{:03}.png", i)));
    }
    (images, root.join("bench.brushlib"))
}

fn benchmark_name_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Name Allocation");

    for count in [0, 10, 100, 1000].iter() {
        let reserved = reserved_with_collisions(*count);
        group.bench_with_input(BenchmarkId::new("allocate", count), &reserved, |b, reserved| {
            b.iter(|| allocate("tip_Brush", reserved))
        });
    }

    group.finish();
}

fn benchmark_job_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Import");
    group.sample_size(10);

    for count in [8, 32].iter() {
        let (images, output) = prepare_folder(*count);
        let settings = ImportSettings::default();

        group.bench_with_input(BenchmarkId::new("run_to_save", count), &images, |b, images| {
            b.iter(|| {
                let mut session = AssetSession::new();
                let mut job = BatchImportJob::submit(
                    JobRequest::new(images, &output),
                    &mut session,
                    NullProgress,
                    settings.clone(),
                );
                while let Some(timer) = job.timer() {
                    job.handle_tick(TickKind::Timer(timer));
                }
                job.report()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_name_allocation, benchmark_job_ticks);
criterion_main!(benches);

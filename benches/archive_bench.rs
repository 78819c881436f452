use criterion::{Criterion, criterion_group, criterion_main};
use packstudio::models::{FileSet, GeneratedTexture, PackConfig, ProjectFile};
use packstudio::services::{SequentialTokenSource, assemble_pack, generate_manifest, parse_pack};
use std::hint::black_box;

fn sample_files(count: usize) -> FileSet {
    (0..count)
        .map(|i| {
            if i % 4 == 0 {
                ProjectFile::binary(format!("textures/blocks/block_{}.png", i), vec![(i % 251) as u8; 4096])
            } else {
                ProjectFile::text(
                    format!("scripts/module_{}.js", i),
                    format!("export const value{} = {};\n", i, i).repeat(64),
                )
            }
        })
        .collect()
}

fn bench_assemble(c: &mut Criterion) {
    let manifest = generate_manifest(&PackConfig::default(), &mut SequentialTokenSource::new());
    let files = sample_files(200);
    let textures = vec![GeneratedTexture::pack_icon(vec![7; 16 * 1024])];

    c.bench_function("assemble_pack_200_files", |b| {
        b.iter(|| assemble_pack(black_box(&manifest), black_box(&files), black_box(&textures)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let manifest = generate_manifest(&PackConfig::default(), &mut SequentialTokenSource::new());
    let archive = assemble_pack(&manifest, &sample_files(200), &[]).expect("benchmark archive");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    c.bench_function("parse_pack_200_files", |b| {
        b.iter(|| {
            runtime.block_on(parse_pack(
                black_box(archive.bytes.clone()),
                black_box(&archive.file_name),
            ))
        })
    });
}

criterion_group!(benches, bench_assemble, bench_parse);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use framedef_core::section::{ConfigBatch, SectionData};
use framedef_core::{Engine, EngineConfig, FlagSet};

fn engine_with_args() -> (Engine, usize) {
    let mut batch = ConfigBatch::new();
    batch.thingtypes.push(SectionData::new("DoomImp").with("dehackednum", 31));
    batch.frames.push(SectionData::new("S_NULL").with("dehackednum", 0));
    batch.frames.push(
        SectionData::new("S_BENCH")
            .with("action", "A_Look")
            .with("args", ["0x40", "DoomImp", "S_NULL", "SOLID+SHOOTABLE+COUNTKILL", "12.5"]),
    );

    let mut engine = Engine::new(EngineConfig::default()).expect("engine");
    engine.load(&batch).expect("load");
    let index = engine.lookup_by_name("S_BENCH").expect("state");
    (engine, index)
}

fn read_all(engine: &Engine, index: usize) -> i64 {
    let int = engine.arg_as_int(index, 0, 0);
    let thing = engine.arg_as_thing(index, 1, 0);
    let state = engine.arg_as_state(index, 2, 0);
    let flags = engine.arg_as_flags(index, 3, FlagSet::EMPTY);
    let fixed = engine.arg_as_fixed(index, 4, framedef_core::Fixed::ZERO);
    i64::from(int) + thing as i64 + state as i64 + i64::from(flags.0[0]) + i64::from(fixed.raw())
}

fn bench_cached_reads(c: &mut Criterion) {
    let (engine, index) = engine_with_args();
    read_all(&engine, index);

    c.bench_function("arg_reads_cached", |b| {
        b.iter(|| black_box(read_all(&engine, black_box(index))))
    });
}

fn bench_uncached_reads(c: &mut Criterion) {
    // Caches are dropped before every pass, so each read parses
    let (engine, index) = engine_with_args();

    c.bench_function("arg_reads_uncached", |b| {
        b.iter(|| {
            engine.reset_all_argument_caches();
            black_box(read_all(&engine, black_box(index)))
        })
    });
}

fn bench_load(c: &mut Criterion) {
    let mut batch = ConfigBatch::new();
    batch.frames.push(SectionData::new("S_NULL"));
    for i in 0..500 {
        batch.frames.push(
            SectionData::new(format!("S_GEN{i}"))
                .with("cmp", format!("TROO|{}|*|4|A_Chase({i}, S_NULL)|@next", (b'A' + (i % 26) as u8) as char)),
        );
    }
    batch.frames.push(SectionData::new("S_END").with("nextframe", "@this"));

    c.bench_function("load_500_frames", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::default()).expect("engine");
            engine.load(black_box(&batch)).expect("load");
            black_box(engine.state_count())
        })
    });
}

criterion_group!(benches, bench_cached_reads, bench_uncached_reads, bench_load);
criterion_main!(benches);

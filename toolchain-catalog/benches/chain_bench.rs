//! Benchmarks for chain registration and reverse lookup.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use toolchain_catalog::prelude::*;

fn chain_benchmark(c: &mut Criterion) {
    c.bench_function("register_chain_8_steps", |b| {
        let mut catalog = Catalog::new();
        let id = catalog
            .register_tool("cc", Tool::local_with_args("/usr/bin/cc", ["-o", "-c"]))
            .unwrap();
        let step = ToolChainEntry::new(id).with_arg("-o", "out").with_arg("-c", "in.c");
        let chain = (0..8).fold(ToolChain::new("build"), |chain, _| chain.with_entry(step.clone()));

        b.iter(|| black_box(catalog.register_chain(&chain).unwrap()));
    });

    c.bench_function("find_key_64_tools", |b| {
        let mut tools = ToolRegistry::new();
        for i in 0..64 {
            tools.insert(format!("tool{i}"), Tool::local(format!("/bin/tool{i}"))).unwrap();
        }
        let last = tools.get_tool("tool63").unwrap();

        b.iter(|| black_box(tools.find_key(last).unwrap()));
    });
}

criterion_group!(benches, chain_benchmark);
criterion_main!(benches);

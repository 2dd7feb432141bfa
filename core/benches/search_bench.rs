use criterion::{criterion_group, criterion_main, Criterion};
use docsearch_core::{IndexBuilder, QueryProcessor, StandardTokenizer};

fn corpus() -> String {
    let words = ["asio", "beast", "filesystem", "regex", "thread", "socket", "timer", "buffer"];
    let mut out = String::new();
    for i in 0..2_000 {
        let title = format!("{} {}", words[i % words.len()], words[(i / 3) % words.len()]);
        let body: Vec<&str> = (0..40).map(|j| words[(i * 7 + j) % words.len()]).collect();
        out.push_str(&format!("{title}\x03{}\x03https://example.com/{i}\n", body.join(" ")));
    }
    out
}

fn bench_search(c: &mut Criterion) {
    let tok = StandardTokenizer::new();
    let text = corpus();
    c.bench_function("build_2000_docs", |b| {
        b.iter(|| IndexBuilder::new(&tok).build_from_reader(text.as_bytes()).unwrap())
    });
    let store = IndexBuilder::new(&tok).build_from_reader(text.as_bytes()).unwrap().store;
    let qp = QueryProcessor::new(&store, &tok);
    c.bench_function("search_two_terms", |b| b.iter(|| qp.search("asio socket")));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);

use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use richrun_core::AttachmentMap;
use richrun_core::AttributeKey;
use richrun_core::AttributeSet;
use richrun_core::Font;
use richrun_core::theme::Theme;
use richrun_markdown::CompileOptions;
use richrun_markdown::ParseOptions;
use richrun_markdown::Tree;
use richrun_markdown::compile_document_with;

fn sample_markdown(paragraphs: usize) -> String {
    let mut s = String::new();
    s.push_str("# Performance\n\n");
    for i in 0..paragraphs {
        s.push_str(&format!("## Section {i}\n\n"));
        s.push_str("A *quick* brown fox __jumps__ over the `lazy` dog. ");
        s.push_str("See [the docs](https://example.com/docs \"Docs\") for more.\n\n");
        s.push_str("> Quoted text with <key name/> markup.\n\n");
        s.push_str("- one\n- two\n  - nested\n    1. first\n    2. second\n\n");
    }
    s.push_str("```rs\nfn main() {}\n```\n");
    s
}

fn base() -> AttributeSet {
    AttributeSet::new().with(AttributeKey::Font, Font::new("Helvetica", 14.0))
}

fn bench_parse(c: &mut Criterion) {
    let md = sample_markdown(100);
    c.bench_function("markdown/parse", |b| {
        b.iter(|| {
            let tree = Tree::parse(black_box(&md), &ParseOptions::default());
            black_box(tree.len());
        })
    });
}

fn bench_compile(c: &mut Criterion) {
    let md = sample_markdown(100);
    let tree = Tree::parse(&md, &ParseOptions::default());
    let base = base();
    let attachments = AttachmentMap::new();
    let options = CompileOptions::default();
    c.bench_function("markdown/compile", |b| {
        b.iter(|| {
            let text = compile_document_with(black_box(&tree), &base, &attachments, &options);
            black_box(text.map(|t| t.runs().len()).unwrap_or_default());
        })
    });
}

fn bench_compile_and_render(c: &mut Criterion) {
    let theme = Theme::default();
    let md = sample_markdown(100);
    let base = base();
    let attachments = AttachmentMap::new();
    let options = CompileOptions::default();
    c.bench_function("markdown/parse+compile+render", |b| {
        b.iter(|| {
            let tree = Tree::parse(black_box(&md), &ParseOptions::default());
            if let Ok(text) = compile_document_with(&tree, &base, &attachments, &options) {
                black_box(text.render(&theme).content_height());
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_compile, bench_compile_and_render);
criterion_main!(benches);

//! Performance benchmarks for mdtree
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mdtree::{Options, parse, parse_with_options, to_pseudo_xml};

/// Sample documents of various sizes
mod samples {
    pub const TINY: &str = "Hello, **world**!";

    pub const SMALL: &str = r#"# Heading

This is a paragraph with *emphasis* and **strong** text.

- Item 1
- Item 2
- Item 3

`inline code` and [a link](https://example.com).
"#;

    pub const MEDIUM: &str = r#"# Project README

This is a sample README file that demonstrates the supported markup.

## Features

- Line-oriented block parsing
- Nested sections, quotes and lists
- Inline spans with &copy; entities

### Code Example

```rust
fn main() {
    println!("Hello, world!");
}
```

## Details

The parser builds a **document tree** for every input.

> This is a blockquote with some *emphasized* text.

### Links

1. [GitHub](https://github.com "Code hosting")
2. ![logo](logo.png)

## Conclusion

Thank you for reading!
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph contains various inline elements like *emphasis*, **strong**,
`code`, and [links](https://example.com).

- First bullet point with **bold** text
- Second bullet point with *italic* text
- Third point with `code`

> A blockquote that spans
> multiple lines.

```rust
fn example() {
    let x = 42;
    println!("{}", x);
}
```

Another paragraph to add some content. This helps test the parser's ability
to handle longer documents efficiently.

"#;
        section.repeat(50)
    }

    /// Many potential opener/closer pairs on one line
    pub fn pathological_emphasis() -> String {
        "*a ".repeat(1000) + &"b* ".repeat(1000)
    }

    /// Nesting just inside the default limit
    pub fn pathological_nested() -> String {
        "> ".repeat(24) + "deep\n"
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let large = samples::large();
    for (name, input) in [
        ("tiny", samples::TINY),
        ("small", samples::SMALL),
        ("medium", samples::MEDIUM),
        ("large", large.as_str()),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| parse(black_box(input)))
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    let input = samples::large();
    group.throughput(Throughput::Bytes(input.len() as u64));

    let blocks_only = Options {
        inline: false,
        ..Options::default()
    };
    group.bench_function("blocks_only", |b| {
        b.iter(|| parse_with_options(black_box(&input), &blocks_only))
    });

    group.bench_function("blocks_and_inline", |b| {
        b.iter(|| parse(black_box(&input)))
    });

    let document = parse(&input).expect("sample parses");
    group.bench_function("pseudo_xml", |b| {
        b.iter(|| to_pseudo_xml(black_box(&document)))
    });

    group.finish();
}

fn bench_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("escaping");

    let plain = "Hello, this is plain text without any special characters. ".repeat(100);
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(plain.len());
            mdtree::escape::escape_text_into(&mut out, black_box(plain.as_bytes()));
            out
        })
    });

    let markup_heavy = "<script>alert('xss')</script> & more <tags> here! ".repeat(100);
    group.throughput(Throughput::Bytes(markup_heavy.len() as u64));
    group.bench_function("markup_heavy", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(markup_heavy.len() * 2);
            mdtree::escape::escape_text_into(&mut out, black_box(markup_heavy.as_bytes()));
            out
        })
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20); // Fewer samples for slow cases

    let emphasis = samples::pathological_emphasis();
    group.throughput(Throughput::Bytes(emphasis.len() as u64));
    group.bench_function("emphasis_explosion", |b| {
        b.iter(|| parse(black_box(&emphasis)))
    });

    let nested = samples::pathological_nested();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_nesting", |b| {
        b.iter(|| parse(black_box(&nested)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_stages,
    bench_escaping,
    bench_pathological
);
criterion_main!(benches);

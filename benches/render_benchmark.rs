use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hn_browse::internal::models::{Comment, CommentNode};
use hn_browse::internal::render::{CommentView, RenderOptions, render_comments};

fn tree(next_id: &mut u32, depth: usize, fanout: usize) -> CommentNode {
    *next_id += 1;
    let id = *next_id;
    let children = if depth == 0 {
        Vec::new()
    } else {
        (0..fanout).map(|_| tree(next_id, depth - 1, fanout)).collect()
    };
    CommentNode {
        comment: Comment {
            id,
            by: Some(format!("user{}", id)),
            time: 1_600_000_000,
            text: Some("<p>Some <i>reasonably</i> long comment body that needs wrapping &amp; entity decoding.</p>".to_string()),
            ..Default::default()
        },
        children,
    }
}

fn benchmark_render_comments(c: &mut Criterion) {
    let mut next_id = 0;
    let roots: Vec<CommentNode> = (0..5).map(|_| tree(&mut next_id, 3, 3)).collect();
    let opts = RenderOptions::default();

    let collapsed = CommentView::new();
    c.bench_function("render_comments collapsed", |b| {
        b.iter(|| render_comments(black_box(&roots), &collapsed, &opts))
    });

    let mut expanded = CommentView::new();
    expanded.expand_all(&roots);
    c.bench_function("render_comments expanded", |b| {
        b.iter(|| render_comments(black_box(&roots), &expanded, &opts))
    });
}

criterion_group!(benches, benchmark_render_comments);
criterion_main!(benches);

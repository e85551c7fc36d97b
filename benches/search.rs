use criterion::{criterion_group, criterion_main, Criterion};
use code_launcher::hierarchy::{CategoryPath, CategoryRecord, Hierarchy, HierarchyDoc, Leaf, LeafKind};
use code_launcher::favorites::Favorites;
use code_launcher::ranking::order;
use code_launcher::search::{scan, SearchOptions};

fn build(categories: usize, leaves_per_category: usize) -> Hierarchy {
    let mut doc = HierarchyDoc::default();
    for i in 0..categories {
        let path = CategoryPath::new([format!("Group {}", i % 20), format!("Category {i}")]);
        if i < 20 {
            doc.categories.push(CategoryRecord {
                path: CategoryPath::new([format!("Group {i}")]),
                icon: "folder".into(),
                description: String::new(),
            });
        }
        doc.categories.push(CategoryRecord {
            path: path.clone(),
            icon: "folder".into(),
            description: String::new(),
        });
        for j in 0..leaves_per_category {
            doc.leaves.push(Leaf {
                name: format!("project-{i}_{j}"),
                path: format!("/src/{i}/{j}").into(),
                category: path.clone(),
                kind: if j % 3 == 0 { LeafKind::File } else { LeafKind::Project },
                last_opened: None,
            });
        }
    }
    Hierarchy::from_doc(doc)
}

fn bench_search(c: &mut Criterion) {
    let hierarchy = build(1_000, 10);
    let favorites = Favorites::default();
    let options = SearchOptions::default();
    c.bench_function("search_10k", |b| {
        b.iter(|| order(scan(&hierarchy, "project 999_9", options), &favorites))
    });
    c.bench_function("search_10k_broad", |b| {
        b.iter(|| order(scan(&hierarchy, "project", options), &favorites))
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);

// Criterion benchmarks for Friend Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use friend_match::core::{find_all_potential_matches, find_potential_matches, FriendDirectory, MatchDecisionProcessor, MatchRecord};
use friend_match::models::{Decision, UserFriends};

/// Ring of `users` where each user is friends with the next `degree` users
fn create_directory(users: usize, degree: usize) -> FriendDirectory {
    FriendDirectory::from_users((0..users).map(|i| {
        let friends = (1..=degree).flat_map(move |d| {
            [
                format!("user{}", (i + d) % users),
                format!("user{}", (i + users - d) % users),
            ]
        });
        UserFriends::new(format!("user{}", i), friends)
    }))
}

fn bench_find_for(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_potential_matches");

    for degree in [5, 20, 50].iter() {
        let directory = create_directory(10_000, *degree);

        group.bench_with_input(BenchmarkId::new("degree", degree), degree, |b, _| {
            b.iter(|| find_potential_matches(black_box("user42"), black_box(&directory)));
        });
    }

    group.finish();
}

fn bench_find_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_all_potential_matches");

    for user_count in [100, 1_000, 5_000].iter() {
        let directory = create_directory(*user_count, 10);

        group.bench_with_input(
            BenchmarkId::new("users", user_count),
            user_count,
            |b, _| {
                b.iter(|| find_all_potential_matches(black_box(&directory)));
            },
        );
    }

    group.finish();
}

fn bench_decisions(c: &mut Criterion) {
    let processor = MatchDecisionProcessor::new();
    let candidates: Vec<String> = (0..500).map(|i| format!("user{}", i)).collect();

    c.bench_function("decide_500_candidates", |b| {
        b.iter(|| {
            let mut record = MatchRecord::seeded(candidates.iter().cloned());
            for (i, candidate) in candidates.iter().enumerate() {
                let decision = if i % 3 == 0 { Decision::Friended } else { Decision::Passed };
                let _ = processor.record_decision(&mut record, "owner", candidate, decision);
            }
            black_box(record)
        });
    });
}

criterion_group!(
    benches,
    bench_find_for,
    bench_find_all,
    bench_decisions
);

criterion_main!(benches);

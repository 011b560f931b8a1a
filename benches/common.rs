// Shared benchmark helpers
#![allow(dead_code)]

use whotouched::repository::MemoryRepository;

const AUTHORS: [&str; 4] = [
    "alice@example.com",
    "bob@example.com",
    "carol@example.com",
    "dave@example.com",
];

/// Trunk of `trunk_len` commits plus `branches` topic branches of
/// `branch_len` commits each, forking at evenly spaced trunk points
pub fn generate_history(trunk_len: usize, branches: usize, branch_len: usize) -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    let mut trunk = Vec::with_capacity(trunk_len);

    for i in 0..trunk_len {
        let id = format!("t{:06}", i);
        let parents: Vec<&str> = trunk.last().map(String::as_str).into_iter().collect();
        let file = format!("src/mod_{}/file_{}.rs", i % 25, i % 400);
        repo.commit(&id, AUTHORS[i % AUTHORS.len()], i as i64 * 60, &parents, &[file.as_str(), "CHANGELOG.md"]);
        trunk.push(id);
    }
    repo.remote_branch("origin", "main", &trunk[trunk_len - 1]);

    for b in 0..branches {
        let fork = (b * trunk_len / branches.max(1)).min(trunk_len - 1);
        let mut tip = trunk[fork].clone();
        for j in 0..branch_len {
            let id = format!("b{:03}_{:04}", b, j);
            let file = format!("feature_{}/part_{}.py", b, j % 10);
            let secs = (fork as i64 * 60) + (j as i64 + 1) * 7;
            repo.commit(&id, AUTHORS[(b + j) % AUTHORS.len()], secs, &[tip.as_str()], &[file.as_str()]);
            tip = id;
        }
        repo.remote_branch("origin", &format!("topic/{}", b), &tip);
    }

    repo
}

use std::fs;
use std::path::{Path, PathBuf};

const UPDATE_VAR: &str = "INDEL_VCF_UPDATE_SNAPSHOTS";

fn snapshot_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

/// Compare a rendered VCF with its stored snapshot, or rewrite the snapshot
/// when `INDEL_VCF_UPDATE_SNAPSHOTS` is set.
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_path(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("snapshot {} missing; set {UPDATE_VAR}=1", path.display()));
    let expected = expected.replace("\r\n", "\n");
    if expected == actual {
        return;
    }

    let mismatch = expected
        .lines()
        .zip(actual.lines())
        .position(|(want, got)| want != got)
        .unwrap_or_else(|| expected.lines().count().min(actual.lines().count()));
    panic!(
        "VCF differs from {} at line {}\n  expected: {:?}\n  actual:   {:?}\nSet {UPDATE_VAR}=1 to regenerate.",
        path.display(),
        mismatch + 1,
        expected.lines().nth(mismatch),
        actual.lines().nth(mismatch),
    );
}

use nodekit_hash::{ContentHasher, hash_file_sha256};
use starbase_sandbox::create_empty_sandbox;

#[test]
fn generates_stable_hashes() {
    let mut a = ContentHasher::new("a");
    a.hash_content(vec!["package.json"]).unwrap();

    let mut b = ContentHasher::new("b");
    b.hash_content(vec!["package.json"]).unwrap();

    assert_eq!(a.generate_hash().unwrap(), b.generate_hash().unwrap());
}

#[test]
fn hash_changes_with_content() {
    let mut hasher = ContentHasher::new("test");
    hasher.hash_content("one").unwrap();

    let first = hasher.generate_hash().unwrap();

    hasher.hash_content("two").unwrap();

    assert_ne!(first, hasher.generate_hash().unwrap());
}

#[test]
fn separates_values() {
    let mut joined = ContentHasher::new("joined");
    joined.hash_content("ab").unwrap();

    let mut split = ContentHasher::new("split");
    split.hash_content("a").unwrap();
    split.hash_content("b").unwrap();

    assert_ne!(joined.generate_hash().unwrap(), split.generate_hash().unwrap());
}

#[test]
fn hashes_files() {
    let sandbox = create_empty_sandbox();
    sandbox.create_file("file.txt", "hello");

    assert_eq!(
        hash_file_sha256(sandbox.path().join("file.txt")).unwrap(),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn errors_for_missing_files() {
    let sandbox = create_empty_sandbox();

    assert!(hash_file_sha256(sandbox.path().join("missing.txt")).is_err());
}

use proptest::prelude::*;
use trinity::RepoKey;

fn repo_url() -> impl Strategy<Value = (String, String)> {
    ("[a-z]{1,8}", "[A-Za-z0-9][A-Za-z0-9._-]{0,20}")
        .prop_map(|(org, name)| (format!("https://github.com/{org}/{name}"), name))
}

proptest! {
    /// Property: deriving from a derived key changes nothing
    #[test]
    fn prop_derive_is_idempotent((url, _name) in repo_url()) {
        let once = RepoKey::derive(&url);
        prop_assert_eq!(RepoKey::derive(once.as_str()), once);
    }

    /// Property: keys never contain hyphens, separators or whitespace
    #[test]
    fn prop_keys_are_path_safe((url, _name) in repo_url()) {
        let key = RepoKey::derive(&url);
        prop_assert!(!key.is_empty());
        prop_assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.'));
    }

    /// Property: `.git`, trailing slashes and surrounding whitespace do not matter
    #[test]
    fn prop_suffixes_do_not_change_key(
        (url, _name) in repo_url(),
        suffix in prop::sample::select(vec![".git", "/", ".git/", "//", " ", "\t.git/ "]),
    ) {
        let decorated = format!("  {url}{suffix}");
        prop_assert_eq!(RepoKey::derive(&decorated), RepoKey::derive(&url));
    }

    /// Property: hyphen and underscore spellings give the same key
    #[test]
    fn prop_hyphen_spelling_is_irrelevant((url, _name) in repo_url()) {
        let hyphenated = url.replace('_', "-");
        let underscored = url.replace('-', "_");
        prop_assert_eq!(RepoKey::derive(&hyphenated), RepoKey::derive(&underscored));
    }

    /// Property: the bundle filename is always `<key>_tests.zip`
    #[test]
    fn prop_bundle_filename((url, _name) in repo_url()) {
        let key = RepoKey::derive(&url);
        prop_assert_eq!(key.bundle_filename(), format!("{}_tests.zip", key.as_str()));
    }
}

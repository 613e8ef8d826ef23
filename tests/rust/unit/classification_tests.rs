use sqlgate::gateway::{classify, Category};
use test_case::test_case;

#[test_case("select"; "select")]
#[test_case("SELECT"; "upper")]
#[test_case("Select"; "title")]
fn test_read_keyword(keyword: &str) {
    assert_eq!(classify(&format!("{} * FROM t", keyword)), Category::Read);
}

#[test]
fn test_every_write_keyword() {
    for keyword in [
        "insert", "update", "delete", "create", "drop", "alter", "truncate", "replace", "begin",
        "commit", "rollback",
    ] {
        assert_eq!(classify(keyword), Category::Write, "{}", keyword);
        assert_eq!(
            classify(&format!("{} something", keyword.to_uppercase())),
            Category::Write,
            "{}",
            keyword
        );
    }
}

// Known limitations of first-token classification, pinned so changes are deliberate.
#[test_case("with t as (select 1) select * from t"; "cte")]
#[test_case("/* hint */ select 1"; "block comment")]
#[test_case("explain select 1"; "explain")]
#[test_case("vacuum"; "vacuum")]
#[test_case(""; "empty")]
fn test_rejected(sql: &str) {
    assert_eq!(classify(sql), Category::Rejected);
}

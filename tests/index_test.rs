use tabrs::error::Result;
use tabrs::Index;

#[test]
fn test_add_and_lookup() -> Result<()> {
    let mut index = Index::new();
    assert_eq!(index.add("a")?, 0);
    assert_eq!(index.add("b")?, 1);

    assert_eq!(index.position("a")?, 0);
    assert_eq!(index.position("b")?, 1);
    assert_eq!(index.label(1)?, "b");
    assert!(index.contains("a"));
    assert!(!index.contains("c"));
    Ok(())
}

#[test]
fn test_duplicate_label_is_an_error() -> Result<()> {
    let mut index = Index::new();
    index.add("a")?;
    assert!(index.add("a").is_err());
    assert_eq!(index.len(), 1);
    Ok(())
}

#[test]
fn test_remove_renumbers_later_labels() -> Result<()> {
    let mut index = Index::from_labels(["a", "b", "c"])?;
    assert_eq!(index.remove("b")?, 1);
    assert_eq!(index.position("a")?, 0);
    assert_eq!(index.position("c")?, 1);
    assert!(index.position("b").is_err());
    Ok(())
}

#[test]
fn test_rename() -> Result<()> {
    let mut index = Index::from_labels(["a", "b"])?;
    index.rename("a", "x")?;
    assert_eq!(index.position("x")?, 0);
    assert!(!index.contains("a"));

    // renaming onto an existing label fails, self-rename does not
    assert!(index.rename("x", "b").is_err());
    index.rename("x", "x")?;
    Ok(())
}

#[test]
fn test_synthesized_labels_skip_taken_ordinals() -> Result<()> {
    let mut index = Index::from_labels(["0", "2"])?;
    assert_eq!(index.add_synthesized(), "1");
    assert_eq!(index.add_synthesized(), "3");
    Ok(())
}

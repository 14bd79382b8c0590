use tabrs::error::Result;
use tabrs::SparseBitSet;

#[test]
fn test_set_and_probe() -> Result<()> {
    let mut bits = SparseBitSet::new();
    bits.set(3)?;
    bits.set(7)?;

    assert!(bits.get(3)?);
    assert!(bits.get(7)?);
    assert!(!bits.get(4)?);
    assert_eq!(bits.cardinality(), 2);

    assert_eq!(bits.next_set_bit(0), Some(3));
    assert_eq!(bits.next_set_bit(4), Some(7));
    assert_eq!(bits.next_set_bit(8), None);
    Ok(())
}

#[test]
fn test_negative_index_is_an_error() {
    let mut bits = SparseBitSet::new();
    assert!(bits.set(-1).is_err());
    assert!(bits.get(-5).is_err());
    assert!(bits.flip(-1).is_err());
}

#[test]
fn test_clear_and_flip() -> Result<()> {
    let mut bits = SparseBitSet::new();
    bits.set(10)?;
    bits.clear(10)?;
    assert!(!bits.get(10)?);
    assert_eq!(bits.cardinality(), 0);

    // clearing a bit in untouched space is a no-op
    bits.clear(1_000_000)?;
    assert_eq!(bits.cardinality(), 0);

    bits.flip(10)?;
    assert!(bits.get(10)?);
    bits.flip(10)?;
    assert!(!bits.get(10)?);
    Ok(())
}

#[test]
fn test_range_operations() -> Result<()> {
    let mut bits = SparseBitSet::new();
    bits.set_range(100, 200)?;
    assert_eq!(bits.cardinality(), 100);
    assert!(bits.get(100)?);
    assert!(bits.get(199)?);
    assert!(!bits.get(200)?);

    bits.clear_range(150, 160)?;
    assert_eq!(bits.cardinality(), 90);
    assert!(!bits.get(155)?);

    bits.flip_range(150, 160)?;
    assert_eq!(bits.cardinality(), 100);

    // empty range is valid, inverted range is not
    bits.set_range(5, 5)?;
    assert!(!bits.get(5)?);
    assert!(bits.set_range(10, 5).is_err());
    Ok(())
}

#[test]
fn test_sparse_blocks_far_apart() -> Result<()> {
    let mut bits = SparseBitSet::new();
    bits.set(0)?;
    bits.set(1_000_000_000)?;
    assert_eq!(bits.cardinality(), 2);
    assert_eq!(bits.next_set_bit(1), Some(1_000_000_000));

    let collected: Vec<u64> = bits.iter().collect();
    assert_eq!(collected, vec![0, 1_000_000_000]);
    Ok(())
}

#[test]
fn test_display_coalesces_runs() -> Result<()> {
    let mut bits = SparseBitSet::new();
    bits.set(3)?;
    bits.set_range(8, 12)?;
    assert_eq!(format!("{}", bits), "{3, 8..12}");
    Ok(())
}

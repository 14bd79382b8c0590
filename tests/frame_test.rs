use tabrs::error::Result;
use tabrs::{Frame, Value};

fn sample() -> Result<Frame> {
    Frame::from_parts(
        vec!["r0", "r1", "r2"],
        vec!["a", "b"],
        vec![
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
            vec![
                Value::Str("x".to_string()),
                Value::Null,
                Value::Str("z".to_string()),
            ],
        ],
    )
}

#[test]
fn test_construction_and_shape() -> Result<()> {
    let frame = sample()?;
    assert_eq!(frame.length(), 3);
    assert_eq!(frame.size(), 2);
    assert_eq!(frame.row_labels(), ["r0", "r1", "r2"]);
    assert_eq!(frame.column_labels(), ["a", "b"]);
    Ok(())
}

#[test]
fn test_get_and_set_by_position_and_label() -> Result<()> {
    let mut frame = sample()?;
    assert_eq!(frame.get(0, 0)?, Value::Int64(1));
    assert_eq!(frame.get_loc("r1", "b")?, Value::Null);

    frame.set(1, 1, Value::Str("y".to_string()))?;
    assert_eq!(frame.get_loc("r1", "b")?, Value::Str("y".to_string()));

    frame.set_loc("r2", "a", Value::Int64(30))?;
    assert_eq!(frame.get(2, 0)?, Value::Int64(30));

    assert!(frame.get(3, 0).is_err());
    assert!(frame.get_loc("missing", "a").is_err());
    Ok(())
}

#[test]
fn test_append_synthesizes_and_rejects_duplicates() -> Result<()> {
    let mut frame = Frame::with_columns(["a", "b"])?;
    let first = frame.append(None, vec![Value::Int64(1), Value::Int64(2)])?;
    assert_eq!(first, "0");

    frame.append(
        Some("named".to_string()),
        vec![Value::Int64(3), Value::Int64(4)],
    )?;
    assert!(frame
        .append(
            Some("named".to_string()),
            vec![Value::Int64(5), Value::Int64(6)]
        )
        .is_err());

    // width mismatch leaves the frame untouched
    assert!(frame.append(None, vec![Value::Int64(7)]).is_err());
    assert_eq!(frame.length(), 2);
    Ok(())
}

#[test]
fn test_batch_append_is_all_or_nothing() -> Result<()> {
    let mut frame = Frame::with_columns(["a"])?;
    let result = frame.append_rows(vec![
        (Some("x".to_string()), vec![Value::Int64(1)]),
        (Some("x".to_string()), vec![Value::Int64(2)]),
    ]);
    assert!(result.is_err());
    assert_eq!(frame.length(), 0);
    Ok(())
}

#[test]
fn test_selection_mask_and_filter() -> Result<()> {
    let frame = sample()?;
    let mask = frame.matches(|row| matches!(row[0], Value::Int64(n) if n >= 2));
    assert_eq!(mask.cardinality(), 2);

    let picked = frame.select_rows(&mask)?;
    assert_eq!(picked.length(), 2);
    assert_eq!(picked.row_labels(), ["r1", "r2"]);

    let filtered = frame.filter(|row| row[1].is_null())?;
    assert_eq!(filtered.row_labels(), ["r1"]);
    Ok(())
}

#[test]
fn test_head_tail_and_drop_nulls() -> Result<()> {
    let frame = sample()?;
    assert_eq!(frame.head(2)?.row_labels(), ["r0", "r1"]);
    assert_eq!(frame.tail(2)?.row_labels(), ["r1", "r2"]);
    assert_eq!(frame.head(10)?.length(), 3);

    let dense = frame.drop_nulls()?;
    assert_eq!(dense.row_labels(), ["r0", "r2"]);

    let nulls = frame.null_mask("b")?;
    assert_eq!(nulls.next_set_bit(0), Some(1));
    Ok(())
}

#[test]
fn test_slice_half_open() -> Result<()> {
    let frame = sample()?;
    let window = frame.slice(1, 3, 0, 1)?;
    assert_eq!(window.row_labels(), ["r1", "r2"]);
    assert_eq!(window.column_labels(), ["a"]);
    assert_eq!(window.get(0, 0)?, Value::Int64(2));

    assert!(frame.slice(2, 1, 0, 1).is_err());
    assert!(frame.slice(0, 4, 0, 1).is_err());
    Ok(())
}

#[test]
fn test_transpose() -> Result<()> {
    let frame = sample()?;
    let flipped = frame.transpose()?;
    assert_eq!(flipped.row_labels(), ["a", "b"]);
    assert_eq!(flipped.column_labels(), ["r0", "r1", "r2"]);
    assert_eq!(flipped.get(0, 2)?, Value::Int64(3));
    Ok(())
}

#[test]
fn test_concatenate_rows_truncates_to_shared_width() -> Result<()> {
    let top = Frame::from_parts(
        vec!["r0"],
        vec!["a", "b"],
        vec![vec![Value::Int64(1)], vec![Value::Int64(2)]],
    )?;
    let bottom = Frame::from_parts(vec!["r1"], vec!["a"], vec![vec![Value::Int64(3)]])?;

    let stacked = top.concatenate(&bottom, 0)?;
    assert_eq!(stacked.length(), 2);
    assert_eq!(stacked.size(), 1);
    assert_eq!(stacked.get(1, 0)?, Value::Int64(3));
    Ok(())
}

#[test]
fn test_concatenate_columns_truncates_to_shared_length() -> Result<()> {
    let left = Frame::from_parts(
        vec!["r0", "r1"],
        vec!["a"],
        vec![vec![Value::Int64(1), Value::Int64(2)]],
    )?;
    let right = Frame::from_parts(
        vec!["s0", "s1", "s2"],
        vec!["b", "a"],
        vec![
            vec![Value::Int64(10), Value::Int64(20), Value::Int64(30)],
            vec![Value::Int64(5), Value::Int64(6), Value::Int64(7)],
        ],
    )?;

    let wide = left.concatenate(&right, 1)?;
    assert_eq!(wide.length(), 2);
    assert_eq!(wide.size(), 3);
    assert_eq!(wide.row_labels(), ["r0", "r1"]);
    // the colliding "a" from the right comes in under a synthesized label
    assert_eq!(wide.column_labels(), ["a", "b", "0"]);
    assert_eq!(wide.get(1, 1)?, Value::Int64(20));
    assert_eq!(wide.get(1, 2)?, Value::Int64(6));

    assert!(left.concatenate(&right, 2).is_err());
    Ok(())
}

#[test]
fn test_update_overlays_non_null_cells() -> Result<()> {
    let mut frame = sample()?;
    let overlay = Frame::from_parts(
        vec!["o0", "o1", "o2"],
        vec!["a", "b"],
        vec![
            vec![Value::Int64(100), Value::Null, Value::Int64(300)],
            vec![Value::Null, Value::Str("filled".to_string()), Value::Null],
        ],
    )?;
    frame.update(&[&overlay])?;

    // non-null overlay cells win, even over non-null receiver cells
    assert_eq!(frame.get(0, 0)?, Value::Int64(100));
    assert_eq!(frame.get(2, 0)?, Value::Int64(300));
    assert_eq!(frame.get(1, 1)?, Value::Str("filled".to_string()));
    // null overlay cells change nothing
    assert_eq!(frame.get(1, 0)?, Value::Int64(2));
    assert_eq!(frame.get(0, 1)?, Value::Str("x".to_string()));
    Ok(())
}

#[test]
fn test_transform_expands_rows_with_fresh_labels() -> Result<()> {
    let frame = sample()?;
    // each row becomes two, except nulls in b which vanish
    let expanded = frame.transform(|row| {
        if row[1].is_null() {
            vec![]
        } else {
            vec![row.to_vec(), row.to_vec()]
        }
    })?;
    assert_eq!(expanded.length(), 4);
    assert_eq!(expanded.row_labels(), ["0", "1", "2", "3"]);
    assert_eq!(expanded.get(0, 0)?, Value::Int64(1));
    assert_eq!(expanded.get(2, 0)?, Value::Int64(3));

    // a produced row with the wrong width fails
    assert!(frame.transform(|_| vec![vec![Value::Null]]).is_err());
    Ok(())
}

#[test]
fn test_apply_preserves_shape() -> Result<()> {
    let frame = sample()?;
    let doubled = frame.apply(|v| match v {
        Value::Int64(n) => Value::Int64(n * 2),
        other => other.clone(),
    })?;
    assert_eq!(doubled.get(2, 0)?, Value::Int64(6));
    assert_eq!(doubled.get(1, 1)?, Value::Null);
    assert_eq!(doubled.row_labels(), frame.row_labels());
    Ok(())
}

#[test]
fn test_coalesce_fills_nulls_only() -> Result<()> {
    let mut frame = sample()?;
    let donor = Frame::from_parts(
        vec!["d0", "d1", "d2"],
        vec!["a", "b"],
        vec![
            vec![Value::Int64(9), Value::Int64(9), Value::Int64(9)],
            vec![
                Value::Str("p".to_string()),
                Value::Str("q".to_string()),
                Value::Str("r".to_string()),
            ],
        ],
    )?;
    frame.coalesce(&[&donor])?;
    assert_eq!(frame.get(0, 0)?, Value::Int64(1));
    assert_eq!(frame.get(1, 1)?, Value::Str("q".to_string()));
    Ok(())
}

#[test]
fn test_iter_rows() -> Result<()> {
    let frame = sample()?;
    let rows: Vec<Vec<Value>> = frame.iter_rows().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], Value::Int64(1));
    Ok(())
}

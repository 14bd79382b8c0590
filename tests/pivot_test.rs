use tabrs::error::Result;
use tabrs::{Frame, Value, MELT_VALUE_COLUMN, MELT_VARIABLE_COLUMN};

fn long() -> Result<Frame> {
    Frame::from_parts(
        vec!["0", "1", "2", "3"],
        vec!["row", "col", "v"],
        vec![
            vec![
                Value::Str("r1".to_string()),
                Value::Str("r1".to_string()),
                Value::Str("r2".to_string()),
                Value::Str("r2".to_string()),
            ],
            vec![
                Value::Str("c1".to_string()),
                Value::Str("c2".to_string()),
                Value::Str("c1".to_string()),
                Value::Str("c2".to_string()),
            ],
            vec![
                Value::Int64(1),
                Value::Int64(2),
                Value::Int64(3),
                Value::Int64(4),
            ],
        ],
    )
}

#[test]
fn test_pivot_long_to_wide() -> Result<()> {
    let wide = long()?.pivot("row", "col", &["v"])?;
    assert_eq!(wide.row_labels(), ["r1", "r2"]);
    assert_eq!(wide.column_labels(), ["c1", "c2"]);
    assert_eq!(wide.get_loc("r1", "c2")?, Value::Int64(2));
    assert_eq!(wide.get_loc("r2", "c1")?, Value::Int64(3));
    Ok(())
}

#[test]
fn test_pivot_missing_cells_are_null() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["0", "1", "2"],
        vec!["row", "col", "v"],
        vec![
            vec![
                Value::Str("r1".to_string()),
                Value::Str("r1".to_string()),
                Value::Str("r2".to_string()),
            ],
            vec![
                Value::Str("c1".to_string()),
                Value::Str("c2".to_string()),
                Value::Str("c1".to_string()),
            ],
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
        ],
    )?;
    let wide = frame.pivot("row", "col", &["v"])?;
    assert_eq!(wide.get_loc("r2", "c2")?, Value::Null);
    Ok(())
}

#[test]
fn test_pivot_duplicate_cell_last_write_wins() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["0", "1"],
        vec!["row", "col", "v"],
        vec![
            vec![Value::Str("r1".to_string()), Value::Str("r1".to_string())],
            vec![Value::Str("c1".to_string()), Value::Str("c1".to_string())],
            vec![Value::Int64(1), Value::Int64(2)],
        ],
    )?;
    let wide = frame.pivot("row", "col", &["v"])?;
    assert_eq!(wide.length(), 1);
    assert_eq!(wide.get_loc("r1", "c1")?, Value::Int64(2));
    Ok(())
}

#[test]
fn test_pivot_multiple_value_columns_compound_labels() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["0", "1"],
        vec!["row", "col", "x", "y"],
        vec![
            vec![Value::Str("r1".to_string()), Value::Str("r1".to_string())],
            vec![Value::Str("c1".to_string()), Value::Str("c2".to_string())],
            vec![Value::Int64(1), Value::Int64(2)],
            vec![Value::Int64(10), Value::Int64(20)],
        ],
    )?;
    let wide = frame.pivot("row", "col", &["x", "y"])?;
    assert_eq!(
        wide.column_labels(),
        ["(x, c1)", "(y, c1)", "(x, c2)", "(y, c2)"]
    );
    assert_eq!(wide.get_loc("r1", "(y, c2)")?, Value::Int64(20));
    Ok(())
}

#[test]
fn test_melt_wide_to_long() -> Result<()> {
    let wide = Frame::from_parts(
        vec!["0", "1"],
        vec!["id", "c1", "c2"],
        vec![
            vec![Value::Str("a".to_string()), Value::Str("b".to_string())],
            vec![Value::Int64(1), Value::Int64(3)],
            vec![Value::Int64(2), Value::Int64(4)],
        ],
    )?;
    let melted = wide.melt(&["id"])?;
    assert_eq!(melted.length(), 4);
    assert_eq!(
        melted.column_labels(),
        ["id", MELT_VARIABLE_COLUMN, MELT_VALUE_COLUMN]
    );
    assert_eq!(melted.get(0, 0)?, Value::Str("a".to_string()));
    assert_eq!(melted.get(0, 1)?, Value::Str("c1".to_string()));
    assert_eq!(melted.get(0, 2)?, Value::Int64(1));
    assert_eq!(melted.get(3, 1)?, Value::Str("c2".to_string()));
    assert_eq!(melted.get(3, 2)?, Value::Int64(4));
    Ok(())
}

#[test]
fn test_pivot_then_melt_round_trip_shape() -> Result<()> {
    let wide = long()?.pivot("row", "col", &["v"])?;
    let back = wide.melt(&[])?;
    assert_eq!(back.length(), 4);
    assert_eq!(back.column_labels(), [MELT_VARIABLE_COLUMN, MELT_VALUE_COLUMN]);
    Ok(())
}

#[test]
fn test_reshape_grow_and_shrink() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["r0", "r1"],
        vec!["a", "b"],
        vec![
            vec![Value::Int64(1), Value::Int64(2)],
            vec![Value::Int64(3), Value::Int64(4)],
        ],
    )?;

    let grown = frame.reshape(3, 3)?;
    assert_eq!(grown.length(), 3);
    assert_eq!(grown.size(), 3);
    assert_eq!(grown.get(0, 0)?, Value::Int64(1));
    assert_eq!(grown.get(2, 0)?, Value::Null);
    assert_eq!(grown.get(0, 2)?, Value::Null);

    let shrunk = frame.reshape(1, 1)?;
    assert_eq!(shrunk.row_labels(), ["r0"]);
    assert_eq!(shrunk.column_labels(), ["a"]);
    Ok(())
}

#[test]
fn test_reshape_by_labels() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["r0", "r1"],
        vec!["a", "b"],
        vec![
            vec![Value::Int64(1), Value::Int64(2)],
            vec![Value::Int64(3), Value::Int64(4)],
        ],
    )?;
    let picked = frame.reshape_by(&["r1", "new"], &["b", "missing"])?;
    assert_eq!(picked.get_loc("r1", "b")?, Value::Int64(4));
    assert_eq!(picked.get_loc("new", "b")?, Value::Null);
    assert_eq!(picked.get_loc("r1", "missing")?, Value::Null);
    Ok(())
}

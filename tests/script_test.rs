use tabrs::error::Result;
use tabrs::{dispatch, ColumnType, Frame, Op, Value};

fn sample() -> Result<Frame> {
    Frame::from_parts(
        vec!["r0", "r1", "r2"],
        vec!["a", "b"],
        vec![
            vec![
                Value::Str("3".to_string()),
                Value::Str("1".to_string()),
                Value::Str("2".to_string()),
            ],
            vec![
                Value::Str("x".to_string()),
                Value::Str("y".to_string()),
                Value::Str("z".to_string()),
            ],
        ],
    )
}

#[test]
fn test_head_and_tail() -> Result<()> {
    let frame = sample()?;
    let top = dispatch(&frame, Op::Head, &[Value::Int64(2)])?;
    assert_eq!(top.row_labels(), ["r0", "r1"]);

    let bottom = dispatch(&frame, Op::Tail, &[Value::Int64(1)])?;
    assert_eq!(bottom.row_labels(), ["r2"]);
    Ok(())
}

#[test]
fn test_arity_is_checked_before_dispatch() -> Result<()> {
    let frame = sample()?;
    assert!(dispatch(&frame, Op::Head, &[]).is_err());
    assert!(dispatch(&frame, Op::Head, &[Value::Int64(1), Value::Int64(2)]).is_err());
    assert!(dispatch(&frame, Op::Transpose, &[Value::Int64(1)]).is_err());
    Ok(())
}

#[test]
fn test_argument_types_are_checked() -> Result<()> {
    let frame = sample()?;
    assert!(dispatch(&frame, Op::Head, &[Value::Str("2".to_string())]).is_err());
    assert!(dispatch(&frame, Op::Head, &[Value::Int64(-1)]).is_err());
    assert!(dispatch(&frame, Op::DropColumn, &[Value::Int64(0)]).is_err());
    Ok(())
}

#[test]
fn test_sort_and_slice() -> Result<()> {
    let frame = sample()?;
    let sorted = dispatch(&frame, Op::SortBy, &[Value::Str("a".to_string())])?;
    assert_eq!(sorted.row_labels(), ["r1", "r2", "r0"]);

    let window = dispatch(
        &frame,
        Op::Slice,
        &[
            Value::Int64(0),
            Value::Int64(2),
            Value::Int64(0),
            Value::Int64(1),
        ],
    )?;
    assert_eq!(window.length(), 2);
    assert_eq!(window.size(), 1);
    Ok(())
}

#[test]
fn test_column_ops_leave_the_source_frame_alone() -> Result<()> {
    let frame = sample()?;
    let dropped = dispatch(&frame, Op::DropColumn, &[Value::Str("b".to_string())])?;
    assert_eq!(dropped.column_labels(), ["a"]);
    assert_eq!(frame.column_labels(), ["a", "b"]);

    let renamed = dispatch(
        &frame,
        Op::RenameColumn,
        &[Value::Str("a".to_string()), Value::Str("n".to_string())],
    )?;
    assert_eq!(renamed.column_labels(), ["n", "b"]);
    Ok(())
}

#[test]
fn test_cast_and_convert() -> Result<()> {
    let frame = sample()?;
    let cast = dispatch(
        &frame,
        Op::Cast,
        &[Value::Str("a".to_string()), Value::Str("int64".to_string())],
    )?;
    assert_eq!(cast.column_type("a")?, ColumnType::Int64);
    assert!(dispatch(
        &frame,
        Op::Cast,
        &[Value::Str("a".to_string()), Value::Str("nonsense".to_string())]
    )
    .is_err());

    let converted = dispatch(&frame, Op::Convert, &[])?;
    assert_eq!(converted.column_type("a")?, ColumnType::Int64);
    Ok(())
}

#[test]
fn test_group_agg_through_dispatch() -> Result<()> {
    let frame = Frame::from_parts(
        vec!["0", "1", "2"],
        vec!["k", "v"],
        vec![
            vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string()),
                Value::Str("a".to_string()),
            ],
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
        ],
    )?;
    let sums = dispatch(
        &frame,
        Op::GroupAgg,
        &[Value::Str("sum".to_string()), Value::Str("k".to_string())],
    )?;
    assert_eq!(sums.length(), 2);
    assert_eq!(sums.get_loc("a", "v")?, Value::Float64(4.0));
    assert_eq!(sums.get_loc("b", "v")?, Value::Float64(2.0));

    // aggregate name and arity are validated
    assert!(dispatch(
        &frame,
        Op::GroupAgg,
        &[Value::Str("nonsense".to_string()), Value::Str("k".to_string())]
    )
    .is_err());
    assert!(dispatch(&frame, Op::GroupAgg, &[Value::Str("sum".to_string())]).is_err());
    Ok(())
}

#[test]
fn test_melt_through_dispatch() -> Result<()> {
    let frame = sample()?;
    let melted = dispatch(&frame, Op::Melt, &[Value::Str("a".to_string())])?;
    assert_eq!(melted.length(), 3);
    assert_eq!(melted.column_labels(), ["a", "variable", "value"]);
    Ok(())
}

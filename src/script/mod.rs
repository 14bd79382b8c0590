//! A small fixed-arity operation table, for driving frames from
//! scripted or serialized pipelines without closures.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame::{Aggregate, Frame};
use crate::value::{ColumnType, Value};

/// Frame operations addressable by name. Each takes a fixed positional
/// argument list; `dispatch` checks arity and argument types before
/// touching the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// `(n)` — first n rows.
    Head,
    /// `(n)` — last n rows.
    Tail,
    /// `(row0, row1, col0, col1)` — half-open window.
    Slice,
    /// `(column, ...)` — stable multi-key sort, `-` prefix descending.
    SortBy,
    /// `(direction)` — sort by row label, negative reverses.
    SortIndex,
    /// `(column)` — remove one column.
    DropColumn,
    /// `(old, new)` — relabel one column.
    RenameColumn,
    /// `(column, type)` — cast one column to a named type.
    Cast,
    /// `()` — infer and apply the best type per column.
    Convert,
    /// `()` — swap rows and columns.
    Transpose,
    /// `()` — drop rows holding any null.
    DropNulls,
    /// `()` — frame-wide summary statistics.
    Describe,
    /// `(row_key, col_key, value_col)` — long to wide.
    Pivot,
    /// `(id_column, ...)` — wide to long.
    Melt,
    /// `(aggregate, key_column, ...)` — group by the key columns and
    /// apply the named built-in aggregate, one row per group.
    GroupAgg,
}

/// Apply `op` to `frame` with positional `args`. The frame itself is
/// never mutated; every op returns a new frame.
pub fn dispatch(frame: &Frame, op: Op, args: &[Value]) -> Result<Frame> {
    match op {
        Op::Head => {
            require(op, args, 1)?;
            frame.head(arg_count(op, args, 0)?)
        }
        Op::Tail => {
            require(op, args, 1)?;
            frame.tail(arg_count(op, args, 0)?)
        }
        Op::Slice => {
            require(op, args, 4)?;
            frame.slice(
                arg_count(op, args, 0)?,
                arg_count(op, args, 1)?,
                arg_count(op, args, 2)?,
                arg_count(op, args, 3)?,
            )
        }
        Op::SortBy => {
            require_at_least(op, args, 1)?;
            let columns = arg_strs(op, args, 0)?;
            frame.sort_by(&columns.iter().map(String::as_str).collect::<Vec<_>>())
        }
        Op::SortIndex => {
            require(op, args, 1)?;
            let direction = match &args[0] {
                Value::Int64(n) => *n as i32,
                other => return Err(bad_arg(op, 0, "an integer direction", other)),
            };
            frame.sort_index(direction)
        }
        Op::DropColumn => {
            require(op, args, 1)?;
            let mut out = frame.clone();
            out.drop_column(&arg_str(op, args, 0)?)?;
            Ok(out)
        }
        Op::RenameColumn => {
            require(op, args, 2)?;
            let mut out = frame.clone();
            out.rename_column(&arg_str(op, args, 0)?, arg_str(op, args, 1)?)?;
            Ok(out)
        }
        Op::Cast => {
            require(op, args, 2)?;
            let mut out = frame.clone();
            out.cast_column(&arg_str(op, args, 0)?, arg_type(op, args, 1)?)?;
            Ok(out)
        }
        Op::Convert => {
            require(op, args, 0)?;
            let mut out = frame.clone();
            out.convert()?;
            Ok(out)
        }
        Op::Transpose => {
            require(op, args, 0)?;
            frame.transpose()
        }
        Op::DropNulls => {
            require(op, args, 0)?;
            frame.drop_nulls()
        }
        Op::Describe => {
            require(op, args, 0)?;
            frame.describe()
        }
        Op::Pivot => {
            require(op, args, 3)?;
            frame.pivot(
                &arg_str(op, args, 0)?,
                &arg_str(op, args, 1)?,
                &[&arg_str(op, args, 2)?],
            )
        }
        Op::Melt => {
            let ids = arg_strs(op, args, 0)?;
            frame.melt(&ids.iter().map(String::as_str).collect::<Vec<_>>())
        }
        Op::GroupAgg => {
            require_at_least(op, args, 2)?;
            let agg = arg_aggregate(op, args, 0)?;
            let keys = arg_strs(op, args, 1)?;
            frame
                .group_by(&keys.iter().map(String::as_str).collect::<Vec<_>>())?
                .agg(agg)
        }
    }
}

fn require(op: Op, args: &[Value], arity: usize) -> Result<()> {
    if args.len() != arity {
        return Err(Error::InvalidInput(format!(
            "{:?} takes {} argument(s), got {}",
            op,
            arity,
            args.len()
        )));
    }
    Ok(())
}

fn require_at_least(op: Op, args: &[Value], arity: usize) -> Result<()> {
    if args.len() < arity {
        return Err(Error::InvalidInput(format!(
            "{:?} takes at least {} argument(s), got {}",
            op,
            arity,
            args.len()
        )));
    }
    Ok(())
}

fn bad_arg(op: Op, index: usize, wanted: &str, got: &Value) -> Error {
    Error::InvalidInput(format!(
        "{:?} argument {} must be {}, got {:?}",
        op, index, wanted, got
    ))
}

fn arg_str(op: Op, args: &[Value], index: usize) -> Result<String> {
    match &args[index] {
        Value::Str(s) => Ok(s.clone()),
        other => Err(bad_arg(op, index, "a string", other)),
    }
}

/// Every argument from `index` on, all strings.
fn arg_strs(op: Op, args: &[Value], index: usize) -> Result<Vec<String>> {
    (index..args.len()).map(|i| arg_str(op, args, i)).collect()
}

fn arg_count(op: Op, args: &[Value], index: usize) -> Result<usize> {
    match &args[index] {
        Value::Int64(n) if *n >= 0 => Ok(*n as usize),
        other => Err(bad_arg(op, index, "a non-negative integer", other)),
    }
}

fn arg_aggregate(op: Op, args: &[Value], index: usize) -> Result<Aggregate> {
    let name = arg_str(op, args, index)?;
    match name.as_str() {
        "count" => Ok(Aggregate::Count),
        "sum" => Ok(Aggregate::Sum),
        "mean" => Ok(Aggregate::Mean),
        "min" => Ok(Aggregate::Min),
        "max" => Ok(Aggregate::Max),
        "median" => Ok(Aggregate::Median),
        "var" => Ok(Aggregate::Variance),
        "std" => Ok(Aggregate::StdDev),
        "skew" => Ok(Aggregate::Skewness),
        "kurt" => Ok(Aggregate::Kurtosis),
        _ => Err(Error::InvalidInput(format!(
            "unknown aggregate name {:?}",
            name
        ))),
    }
}

fn arg_type(op: Op, args: &[Value], index: usize) -> Result<ColumnType> {
    let name = arg_str(op, args, index)?;
    match name.as_str() {
        "int64" => Ok(ColumnType::Int64),
        "float64" => Ok(ColumnType::Float64),
        "bool" => Ok(ColumnType::Bool),
        "str" => Ok(ColumnType::Str),
        "date" => Ok(ColumnType::Date),
        "untyped" => Ok(ColumnType::Untyped),
        _ => Err(Error::InvalidInput(format!("unknown type name {:?}", name))),
    }
}

//! Utility functions

use crate::error::{MimicError, Result};
use ndarray::SliceInfoElem;

/// Selection covering every element of an array with `ndim` axes
pub fn full_selection(ndim: usize) -> Vec<SliceInfoElem> {
    vec![SliceInfoElem::from(..); ndim]
}

/// Resolve a user selection against a concrete shape.
///
/// Missing trailing axes are filled with full slices. Negative positions count
/// from the end of the axis; slice bounds are clamped to the axis, while a
/// plain index outside the axis is an error. The result only holds
/// non-negative bounds, so it can be handed to `ndarray` without panicking.
pub fn normalize_selection(selection: &[SliceInfoElem], shape: &[usize]) -> Result<Vec<SliceInfoElem>> {
    let consumed = selection
        .iter()
        .filter(|elem| !matches!(elem, SliceInfoElem::NewAxis))
        .count();
    if consumed > shape.len() {
        return Err(MimicError::Selection(format!(
            "{} indices given for an array with {} dimensions",
            consumed,
            shape.len()
        )));
    }

    let mut axes = shape.iter();
    let mut resolved = Vec::with_capacity(selection.len() + shape.len() - consumed);

    for elem in selection {
        match *elem {
            SliceInfoElem::NewAxis => resolved.push(SliceInfoElem::NewAxis),
            SliceInfoElem::Index(index) => {
                let len = next_axis(&mut axes)? as isize;
                let abs = if index < 0 { index + len } else { index };
                if abs < 0 || abs >= len {
                    return Err(MimicError::Selection(format!(
                        "index {} out of range for axis of length {}",
                        index, len
                    )));
                }
                resolved.push(SliceInfoElem::Index(abs));
            }
            SliceInfoElem::Slice { start, end, step } => {
                let len = next_axis(&mut axes)? as isize;
                if step == 0 {
                    return Err(MimicError::Selection("slice step cannot be zero".to_string()));
                }
                let start = clamp_position(start, len);
                let end = clamp_position(end.unwrap_or(len), len).max(start);
                resolved.push(SliceInfoElem::Slice {
                    start,
                    end: Some(end),
                    step,
                });
            }
        }
    }

    resolved.extend(axes.map(|_| SliceInfoElem::from(..)));
    Ok(resolved)
}

fn next_axis<'a>(axes: &mut impl Iterator<Item = &'a usize>) -> Result<usize> {
    axes.next()
        .copied()
        .ok_or_else(|| MimicError::Selection("too many indices".to_string()))
}

fn clamp_position(position: isize, len: isize) -> isize {
    let abs = if position < 0 { position + len } else { position };
    abs.clamp(0, len)
}

/// Format a shape as `(3, 4)` the way array libraries print it
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        _ => {
            let parts: Vec<String> = shape.iter().map(|s| s.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

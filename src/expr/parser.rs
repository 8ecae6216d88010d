//! Index-expression parser.
//!
//! Parses compact einsum-style strings (`"ijk->jk"`, `"ij,jk->ik"`) into the
//! plan types in [`super::plan`]. No whitespace is tolerated; indices are
//! single ASCII letters. Parsing happens once per expression — callers are
//! expected to parse at startup and hold onto the resulting plan rather
//! than re-parsing on every call.

use smallvec::SmallVec;

use crate::error::{ExprError, ExprResult};

use super::plan::{ContractionPlan, InnerProductPlan, OperandSide, PASS};

/// Splits `"<lhs>-><rhs>"` into its two sides, requiring exactly one `->`.
fn split_arrow(expr: &str) -> ExprResult<(&str, &str)> {
    let mut parts = expr.split("->");
    let lhs = parts.next().ok_or_else(|| ExprError::ParseError {
        message: "empty expression".into(),
    })?;
    let rhs = parts.next().ok_or_else(|| ExprError::ParseError {
        message: "missing '->' separator".into(),
    })?;
    if parts.next().is_some() {
        return Err(ExprError::ParseError {
            message: "more than one '->' separator".into(),
        });
    }
    Ok((lhs, rhs))
}

/// Parses a side of an expression into its index characters, rejecting
/// whitespace and any character outside `[A-Za-z]`.
fn parse_index_chars(side: &str) -> ExprResult<SmallVec<[char; 8]>> {
    let mut chars = SmallVec::new();
    for (position, c) in side.chars().enumerate() {
        if !c.is_ascii_alphabetic() {
            return Err(ExprError::InvalidIndexChar {
                found: c,
                position,
            });
        }
        chars.push(c);
    }
    Ok(chars)
}

/// Compiles a single-operand contraction expression, e.g. `"ijk->jk"`.
///
/// `XR` and `YR` are the ranks of the input operand and the result,
/// declared by the caller (they match the rank of the `Tensor` types being
/// contracted, known at the call site). Requires `XR >= YR`: the engine
/// only contracts from a larger rank to a smaller or equal one.
pub fn contraction_parse<const XR: usize, const YR: usize>(
    expr: &str,
) -> ExprResult<ContractionPlan<XR, YR>> {
    let (lhs_str, rhs_str) = split_arrow(expr)?;
    let lhs_chars = parse_index_chars(lhs_str)?;
    let rhs_chars = parse_index_chars(rhs_str)?;

    if lhs_chars.len() != XR {
        return Err(ExprError::RankMismatch {
            side: "lhs".into(),
            expected: XR,
            found: lhs_chars.len(),
        });
    }
    if rhs_chars.len() != YR {
        return Err(ExprError::RankMismatch {
            side: "rhs".into(),
            expected: YR,
            found: rhs_chars.len(),
        });
    }
    if XR < YR {
        return Err(ExprError::ContractionRankOrder {
            lhs_rank: XR,
            rhs_rank: YR,
        });
    }

    let mut rhs_used = [false; YR];
    let mut plan_lhs = [0u32; XR];
    let mut plan_rhs = [0u32; YR];
    let mut remainder: SmallVec<[u32; 8]> = SmallVec::new();
    let mut matched = 0usize;

    for (i, &c) in lhs_chars.iter().enumerate() {
        let found = rhs_chars
            .iter()
            .enumerate()
            .find(|&(j, &rc)| rc == c && !rhs_used[j])
            .map(|(j, _)| j);
        match found {
            Some(j) => {
                rhs_used[j] = true;
                plan_lhs[matched] = i as u32;
                plan_rhs[matched] = j as u32;
                matched += 1;
            }
            None => remainder.push(i as u32),
        }
    }

    if matched != YR {
        let unmatched = rhs_used
            .iter()
            .position(|&used| !used)
            .expect("matched < YR implies some rhs position unused");
        return Err(ExprError::UnmatchedResultIndex {
            index: rhs_chars[unmatched],
        });
    }

    for (k, &axis) in remainder.iter().enumerate() {
        plan_lhs[YR + k] = axis;
    }

    Ok(ContractionPlan {
        lhs: plan_lhs,
        rhs: plan_rhs,
    })
}

/// Returns the rank of the result side of a contraction expression, without
/// fully compiling it — used to type the factory's output tensor.
pub fn contracted_rank(expr: &str) -> ExprResult<usize> {
    let (_, rhs_str) = split_arrow(expr)?;
    Ok(parse_index_chars(rhs_str)?.len())
}

/// Compiles a single-operand permutation expression, e.g. `"ij->ji"`.
///
/// Requires `rhs` to be a permutation of `lhs` (every character on each side
/// matched exactly once, tracked via per-position `used` flags rather than a
/// bitmask — rank is bounded by 63, so a linear scan is cheap and avoids an
/// extra integer type).
pub fn permutate_parse<const R: usize>(expr: &str) -> ExprResult<[u32; R]> {
    let (lhs_str, rhs_str) = split_arrow(expr)?;
    let lhs_chars = parse_index_chars(lhs_str)?;
    let rhs_chars = parse_index_chars(rhs_str)?;

    if lhs_chars.len() != R {
        return Err(ExprError::RankMismatch {
            side: "lhs".into(),
            expected: R,
            found: lhs_chars.len(),
        });
    }
    if rhs_chars.len() != R {
        return Err(ExprError::RankMismatch {
            side: "rhs".into(),
            expected: R,
            found: rhs_chars.len(),
        });
    }

    let mut lhs_used = [false; R];
    let mut p = [0u32; R];

    for i in 0..R {
        let c = rhs_chars[i];
        let found = (0..R).find(|&j| !lhs_used[j] && lhs_chars[j] == c);
        match found {
            Some(j) => {
                lhs_used[j] = true;
                p[i] = j as u32;
            }
            None => {
                return Err(ExprError::InvalidPermutation {
                    lhs: lhs_str.into(),
                    rhs: rhs_str.into(),
                });
            }
        }
    }

    if !lhs_used.iter().all(|&used| used) {
        return Err(ExprError::InvalidPermutation {
            lhs: lhs_str.into(),
            rhs: rhs_str.into(),
        });
    }

    Ok(p)
}

/// Compiles a two-operand inner-/outer-product expression, e.g.
/// `"ij,jk->ik"`. `x_rank`/`y_rank`/`z_rank` are the ranks of the two input
/// operands and the result.
pub fn inner_product_parse(
    x_rank: usize,
    y_rank: usize,
    z_rank: usize,
    expr: &str,
) -> ExprResult<InnerProductPlan> {
    let (operands_str, z_str) = split_arrow(expr)?;
    let mut operands = operands_str.split(',');
    let x_str = operands.next().ok_or_else(|| ExprError::ParseError {
        message: "missing left operand".into(),
    })?;
    let y_str = operands.next().ok_or_else(|| ExprError::ParseError {
        message: "missing right operand".into(),
    })?;
    if operands.next().is_some() {
        return Err(ExprError::ParseError {
            message: "more than two operands".into(),
        });
    }

    let x_chars = parse_index_chars(x_str)?;
    let y_chars = parse_index_chars(y_str)?;
    let z_chars = parse_index_chars(z_str)?;

    if x_chars.len() != x_rank {
        return Err(ExprError::RankMismatch {
            side: "x".into(),
            expected: x_rank,
            found: x_chars.len(),
        });
    }
    if y_chars.len() != y_rank {
        return Err(ExprError::RankMismatch {
            side: "y".into(),
            expected: y_rank,
            found: y_chars.len(),
        });
    }
    if z_chars.len() != z_rank {
        return Err(ExprError::RankMismatch {
            side: "z".into(),
            expected: z_rank,
            found: z_chars.len(),
        });
    }

    let mut order: SmallVec<[char; 8]> = SmallVec::new();
    for &c in x_chars.iter().chain(y_chars.iter()).chain(z_chars.iter()) {
        if !order.contains(&c) {
            order.push(c);
        }
    }

    for &c in &z_chars {
        if !x_chars.contains(&c) && !y_chars.contains(&c) {
            return Err(ExprError::OutputIndexNotBound { index: c });
        }
    }

    let mut x_perm = SmallVec::with_capacity(order.len());
    let mut y_perm = SmallVec::with_capacity(order.len());
    let mut z_perm = SmallVec::with_capacity(order.len());
    let mut s_ctrl = SmallVec::with_capacity(order.len());

    for &c in &order {
        let x_pos = x_chars.iter().position(|&x| x == c);
        let y_pos = y_chars.iter().position(|&y| y == c);
        let z_pos = z_chars.iter().position(|&z| z == c);
        x_perm.push(x_pos.map(|p| p as u32).unwrap_or(PASS));
        y_perm.push(y_pos.map(|p| p as u32).unwrap_or(PASS));
        z_perm.push(z_pos.map(|p| p as u32).unwrap_or(PASS));
        s_ctrl.push(if x_pos.is_some() {
            OperandSide::X
        } else {
            OperandSide::Y
        });
    }

    let total = order.len();
    Ok(InnerProductPlan {
        x_perm,
        y_perm,
        z_perm,
        s_ctrl,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contraction_parse_full_transpose() {
        let plan = contraction_parse::<3, 2>("ijk->ji").unwrap();
        assert_eq!(plan.lhs, [1, 0, 2]);
        assert_eq!(plan.rhs, [0, 1]);
    }

    #[test]
    fn contraction_parse_row_sum() {
        // ij->i : sum over the second axis.
        let plan = contraction_parse::<2, 1>("ij->i").unwrap();
        assert_eq!(plan.result_axes(), &[0]);
        assert_eq!(plan.summed_axes(), &[1]);
    }

    #[test]
    fn contraction_parse_trace_to_scalar() {
        let plan = contraction_parse::<2, 0>("ii->").unwrap();
        assert_eq!(plan.lhs, [0, 1]);
        assert_eq!(plan.rhs, [] as [u32; 0]);
    }

    #[test]
    fn contraction_parse_rejects_rank_order_violation() {
        let err = contraction_parse::<1, 2>("i->ij");
        assert!(matches!(err, Err(ExprError::ContractionRankOrder { .. })));
    }

    #[test]
    fn contraction_parse_rejects_unmatched_result_index() {
        let err = contraction_parse::<2, 2>("ij->ik");
        assert!(matches!(err, Err(ExprError::UnmatchedResultIndex { index: 'k' })));
    }

    #[test]
    fn permutate_parse_self_inverse() {
        let p = permutate_parse::<2>("ij->ji").unwrap();
        assert_eq!(p, [1, 0]);
    }

    #[test]
    fn permutate_parse_rejects_non_permutation() {
        let err = permutate_parse::<2>("ij->ii");
        assert!(matches!(err, Err(ExprError::InvalidPermutation { .. })));
    }

    #[test]
    fn parse_rejects_whitespace() {
        let err = permutate_parse::<2>("ij -> ji");
        assert!(matches!(err, Err(ExprError::InvalidIndexChar { .. })));
    }

    #[test]
    fn inner_product_parse_matmul() {
        let plan = inner_product_parse(2, 2, 2, "ij,jk->ik").unwrap();
        assert_eq!(plan.total, 3);
        assert!(!plan.is_outer_product());
    }

    #[test]
    fn inner_product_parse_outer_product() {
        let plan = inner_product_parse(1, 1, 2, "i,j->ij").unwrap();
        assert_eq!(plan.total, 2);
        assert!(plan.is_outer_product());
    }

    #[test]
    fn inner_product_parse_rejects_unbound_output_index() {
        let err = inner_product_parse(1, 1, 2, "i,j->ik");
        assert!(matches!(err, Err(ExprError::OutputIndexNotBound { index: 'k' })));
    }
}

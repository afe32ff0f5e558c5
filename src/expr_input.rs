use crate::notation::ParseValueError;

/// Evaluates an arithmetic expression such as `1e3 / 3` or `2 * 470` to a value.
///
/// Supports everything [meval](https://docs.rs/meval/#supported-expressions) does, which is
/// handy for targets that are themselves the result of a calculation.
pub(crate) fn eval(expr: &str) -> Result<f64, ParseValueError> {
    meval::eval_str(expr).map_err(|e| ParseValueError::Expression {
        expr: expr.trim().to_string(),
        reason: e.to_string(),
    })
}

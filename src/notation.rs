//! Engineering notation for resistor values.
//!
//! Values are written the way they are printed on schematics and parts lists: the unit letter
//! (`R`, `K` or `M`) stands in for the decimal point, so `4K7` is 4.7kΩ, `100R` is 100Ω and
//! `1M` is 1MΩ. Plain floats such as `4700` or `4.7e3` are accepted as well.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseValueError {
    #[error("empty resistor value")]
    Empty,

    #[error("invalid resistor value '{0}'")]
    Invalid(String),

    #[cfg(feature = "expr_input")]
    #[error("invalid value expression '{expr}': {reason}")]
    Expression { expr: String, reason: String },
}

fn multiplier(unit: char) -> Option<f64> {
    match unit {
        'R' | 'r' => Some(1.0),
        'K' | 'k' => Some(1e3),
        'M' => Some(1e6),
        _ => None,
    }
}

fn format_with_unit(r: f64, unit: &str) -> String {
    let mut val = format!("{}", r);
    if val.contains('.') {
        val.replace('.', unit)
    } else {
        val.push_str(unit);
        val
    }
}

/// Formats an ohm value in engineering notation.
///
/// ```
/// use resistor_combo::notation::format_value;
///
/// assert_eq!(format_value(4700.0), "4K7");
/// assert_eq!(format_value(100.0), "100R");
/// assert_eq!(format_value(1_000_000.0), "1M");
/// ```
pub fn format_value(r: f64) -> String {
    if r < 1000.0 {
        format_with_unit(r, "R")
    } else if r < 1_000_000.0 {
        format_with_unit(r / 1000.0, "K")
    } else {
        format_with_unit(r / 1_000_000.0, "M")
    }
}

/// Parses a value written in engineering notation or as a plain float.
///
/// # Errors
///
/// Returns [`ParseValueError`] if the string is empty or is not a valid value.
pub fn parse_notation(s: &str) -> Result<f64, ParseValueError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseValueError::Empty);
    }
    let invalid = || ParseValueError::Invalid(s.to_string());

    let Some((pos, mult)) = s
        .char_indices()
        .find_map(|(pos, c)| multiplier(c).map(|m| (pos, m)))
    else {
        return s.parse::<f64>().map_err(|_| invalid());
    };

    let (head, tail) = (&s[..pos], &s[pos + 1..]);
    let value = if tail.is_empty() {
        // `4.7K`, `10K`
        head.parse::<f64>().map_err(|_| invalid())?
    } else {
        // `4K7`, `R47`
        if head.contains('.') || !tail.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let head = if head.is_empty() { "0" } else { head };
        format!("{}.{}", head, tail)
            .parse::<f64>()
            .map_err(|_| invalid())?
    };
    Ok(value * mult)
}

/// Parses a resistor value or target.
///
/// Engineering notation is tried first. With the `expr_input` feature enabled anything that is
/// not valid notation is evaluated as an arithmetic expression, so `1e3/3` or `2 * 470` are
/// accepted.
///
/// # Errors
///
/// Returns [`ParseValueError`] if the string is neither notation nor (when enabled) a valid
/// expression.
pub fn parse_value(s: &str) -> Result<f64, ParseValueError> {
    match parse_notation(s) {
        Ok(v) => Ok(v),
        #[cfg(feature = "expr_input")]
        Err(ParseValueError::Invalid(_)) => crate::expr_input::eval(s),
        Err(e) => Err(e),
    }
}

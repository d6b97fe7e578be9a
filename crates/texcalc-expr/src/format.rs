//! Numeric and unit formatting for math-mode output.
//!
//! Every renderable value carries a [`NumberFormat`] and an exponent for
//! scientific presentation. The default [`NumberFormat::Auto`] prints integral
//! values without a decimal part and rounds everything else to four
//! significant digits, never rounding away digits left of the decimal point:
//! `3.987654321` prints as `3.988` while `123456789.123` prints as
//! `123456789`.

use serde::{Deserialize, Serialize};

/// How a numeric value is printed inside math mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberFormat {
    /// Integral values print exactly; other values keep four significant
    /// digits, but never fewer than their integer digits.
    #[default]
    Auto,
    /// Fixed number of decimal places.
    Fixed(usize),
    /// Fixed number of significant digits.
    Significant(usize),
}

impl NumberFormat {
    /// Formats a value according to the receiver.
    pub fn format(self, value: f64) -> String {
        if value.is_nan() {
            return r"\mathrm{NaN}".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 {
                r"\infty".to_string()
            } else {
                r"-\infty".to_string()
            };
        }
        match self {
            NumberFormat::Auto => format_auto(value),
            NumberFormat::Fixed(places) => format!("{value:.places$}"),
            NumberFormat::Significant(digits) => format_significant(value, digits),
        }
    }
}

fn format_auto(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = if magnitude >= 3 {
        0
    } else {
        (3 - magnitude) as usize
    };
    trim_fraction(format!("{value:.decimals$}"))
}

fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = digits - 1 - magnitude;
    if decimals <= 0 {
        let scale = 10f64.powi(-decimals);
        let rounded = (value / scale).round() * scale;
        format!("{rounded:.0}")
    } else {
        trim_fraction(format!("{value:.prec$}", prec = decimals as usize))
    }
}

fn trim_fraction(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// How a physical unit is wrapped in math mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitFormat {
    /// Upright unit via `\mathrm{...}` (the usual convention).
    #[default]
    Mathrm,
    /// The unit string is emitted verbatim.
    Plain,
}

impl UnitFormat {
    pub fn wrap(self, unit: &str) -> String {
        match self {
            UnitFormat::Mathrm => format!(r"\mathrm{{{unit}}}"),
            UnitFormat::Plain => unit.to_string(),
        }
    }
}

/// Renders a numeric value with format and scientific exponent applied.
///
/// With a nonzero exponent the printed mantissa is `value * 10^-exponent` and
/// the group is braced so it can be embedded in larger formulas. Negative
/// values are parenthesized so they survive adjacent operators.
pub(crate) fn latex_number(value: f64, format: NumberFormat, exponent: i32) -> String {
    if exponent == 0 {
        let body = format.format(value);
        if value < 0.0 {
            format!(r"\left( {body} \right)")
        } else {
            body
        }
    } else {
        let body = format.format(value * 10f64.powi(-exponent));
        if value < 0.0 {
            format!(r"\left( {body} \cdot 10^{{{exponent}}} \right)")
        } else {
            format!(r"{{ {body} \cdot 10^{{{exponent}}} }}")
        }
    }
}

/// Appends a wrapped unit to a rendered result, unless the unit is empty.
pub(crate) fn with_unit(body: String, unit: &str, unit_format: UnitFormat) -> String {
    if unit.is_empty() {
        body
    } else {
        format!(r"{body} \ {}", unit_format.wrap(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_keeps_integers_exact() {
        assert_eq!(NumberFormat::Auto.format(0.0), "0");
        assert_eq!(NumberFormat::Auto.format(-0.0), "0");
        assert_eq!(NumberFormat::Auto.format(1e9), "1000000000");
        assert_eq!(NumberFormat::Auto.format(12.0), "12");
    }

    #[test]
    fn auto_rounds_to_four_significant_digits() {
        assert_eq!(NumberFormat::Auto.format(3.9), "3.9");
        assert_eq!(NumberFormat::Auto.format(3.987654321), "3.988");
        assert_eq!(NumberFormat::Auto.format(123456789.123456), "123456789");
        assert_eq!(NumberFormat::Auto.format(0.000123456), "0.0001235");
        assert_eq!(NumberFormat::Auto.format(-6.543), "-6.543");
    }

    #[test]
    fn fixed_and_significant() {
        assert_eq!(NumberFormat::Fixed(2).format(12.0), "12.00");
        assert_eq!(NumberFormat::Fixed(0).format(3.6), "4");
        assert_eq!(NumberFormat::Significant(3).format(1234.5), "1230");
        assert_eq!(NumberFormat::Significant(3).format(0.0012345), "0.00123");
        assert_eq!(NumberFormat::Significant(4).format(2.5), "2.5");
    }

    #[test]
    fn scientific_exponent_rendering() {
        assert_eq!(
            latex_number(43400.0, NumberFormat::Auto, 2),
            r"{ 434 \cdot 10^{2} }"
        );
        assert_eq!(
            latex_number(-43400.0, NumberFormat::Auto, 2),
            r"\left( -434 \cdot 10^{2} \right)"
        );
        assert_eq!(
            latex_number(-6.543, NumberFormat::Auto, 0),
            r"\left( -6.543 \right)"
        );
    }

    #[test]
    fn units_skip_when_empty() {
        assert_eq!(
            with_unit("3.9".to_string(), "kN", UnitFormat::Mathrm),
            r"3.9 \ \mathrm{kN}"
        );
        assert_eq!(with_unit("3.9".to_string(), "", UnitFormat::Mathrm), "3.9");
        assert_eq!(
            with_unit("3.9".to_string(), "kN", UnitFormat::Plain),
            r"3.9 \ kN"
        );
    }
}

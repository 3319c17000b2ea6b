//! # Operation Semantics
//!
//! The operation each non-source, non-sink node performs, and the fallbacks
//! used for missing inputs. The CSS text for each operation lives in
//! `codegen::node_handlers`; the concrete arithmetic lives in `interpreter`.
//! Both dispatch on [`Operation`]. Arithmetic fallbacks differ between the
//! two: the CSS text always starts from `0`, the preview uses identities.

use crate::graph::{Direction, NodeKind};

/// A resolved operation, with mode flags already applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Lighten,
    Darken,
    Saturate,
    Desaturate,
    Rotate,
    Mix,
    Invert,
    Complementary,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// The operation a node performs, `None` for sources and outputs
    pub fn of(kind: &NodeKind) -> Option<Self> {
        let op = match *kind {
            NodeKind::InputColor { .. } | NodeKind::InputNumber { .. } | NodeKind::Output { .. } => {
                return None
            }
            NodeKind::Lighten(Direction::Up) => Operation::Lighten,
            NodeKind::Lighten(Direction::Down) => Operation::Darken,
            NodeKind::Saturate(Direction::Up) => Operation::Saturate,
            NodeKind::Saturate(Direction::Down) => Operation::Desaturate,
            NodeKind::Rotate => Operation::Rotate,
            NodeKind::Mix => Operation::Mix,
            NodeKind::Invert => Operation::Invert,
            NodeKind::Complementary => Operation::Complementary,
            NodeKind::Add(Direction::Up) => Operation::Add,
            NodeKind::Add(Direction::Down) => Operation::Subtract,
            NodeKind::Multiply(Direction::Up) => Operation::Multiply,
            NodeKind::Multiply(Direction::Down) => Operation::Divide,
        };
        Some(op)
    }

    /// Amount used when the second slot of a color adjustment is empty
    pub fn default_amount(self) -> Option<f64> {
        match self {
            Operation::Rotate => Some(30.0),
            Operation::Lighten | Operation::Darken | Operation::Saturate | Operation::Desaturate => {
                Some(0.1)
            }
            _ => None,
        }
    }

    /// Fallback operands `(first, second)` for previewed arithmetic
    pub fn default_operands(self) -> Option<(f64, f64)> {
        match self {
            Operation::Add | Operation::Subtract => Some((0.0, 0.0)),
            Operation::Multiply => Some((1.0, 1.0)),
            Operation::Divide => Some((0.0, 1.0)),
            _ => None,
        }
    }

    /// Fallback literals `(first, second)` for arithmetic CSS text
    pub fn css_operands(self) -> Option<(&'static str, &'static str)> {
        match self {
            Operation::Add | Operation::Subtract => Some(("0", "0")),
            Operation::Multiply | Operation::Divide => Some(("0", "1")),
            _ => None,
        }
    }

    /// Takes a color plus an amount
    pub fn is_adjustment(self) -> bool {
        self.default_amount().is_some()
    }

    pub fn is_arithmetic(self) -> bool {
        self.default_operands().is_some()
    }
}

/// Parse the leading decimal number of `text`, ignoring trailing garbage
///
/// `"0.5rem"` reads as `0.5`; text that doesn't start with a number yields
/// `None`.
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let after_dot = end + 1;
        let mut frac_end = after_dot;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if mantissa_digits > 0 || frac_end > after_dot {
            mantissa_digits += frac_end - after_dot;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

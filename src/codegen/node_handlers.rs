//! # Node-Specific Handlers
//!
//! CSS text for each operation kind. Inputs arrive in slot order; an empty or
//! missing input falls back to the operation's default literal.

use crate::graph::DEFAULT_COLOR;
use crate::ops::Operation;

/// Build the CSS expression for `op` over already-synthesized inputs
pub fn operation_expression(op: Operation, inputs: &[Option<String>]) -> String {
    let a = slot(inputs, 0);
    let b = slot(inputs, 1);

    if let Some(amount) = op.default_amount() {
        let color = a.unwrap_or(DEFAULT_COLOR);
        let amount = b.map_or_else(|| amount.to_string(), str::to_string);
        return match op {
            Operation::Lighten => format!("oklch(from {color} calc(l + {amount}) c h)"),
            Operation::Darken => format!("oklch(from {color} calc(l - {amount}) c h)"),
            Operation::Saturate => format!("oklch(from {color} l calc(c + {amount}) h)"),
            Operation::Desaturate => format!("oklch(from {color} l calc(c - {amount}) h)"),
            _ => format!("oklch(from {color} l c calc(h + {amount}))"),
        };
    }

    if let Some((first, second)) = op.css_operands() {
        let x = a.unwrap_or(first);
        let y = b.unwrap_or(second);
        let operator = match op {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            _ => "/",
        };
        return format!("calc({x} {operator} {y})");
    }

    match op {
        Operation::Mix => match (a, b) {
            (Some(a), Some(b)) => format!("color-mix(in oklch, {a}, {b})"),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => DEFAULT_COLOR.to_string(),
        },
        Operation::Invert => {
            format!("oklch(from {} calc(1 - l) c h)", a.unwrap_or(DEFAULT_COLOR))
        }
        _ => format!("oklch(from {} l c calc(h + 180))", a.unwrap_or(DEFAULT_COLOR)),
    }
}

fn slot(inputs: &[Option<String>], position: usize) -> Option<&str> {
    inputs
        .get(position)
        .and_then(|input| input.as_deref())
        .filter(|text| !text.is_empty())
}

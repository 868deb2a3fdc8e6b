//! Assembly emission.
//!
//! A purely syntax-directed rewrite of IR *text*: every line is re-split and
//! mapped onto one fixed template. Arithmetic and comparisons go through the
//! `eax` accumulator; there is no register allocation and no look across
//! lines.

use std::fmt::{self, Write};

use tracing::{debug, trace};

use crate::error::IrParseError;
use crate::ir::{BinOp, Literal, Quad};

const ACC: &str = "eax";
const ACC_LOW: &str = "al";
const REMAINDER: &str = "edx";

/// One line of pseudo-assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asm {
    Label(String),
    Mov { dst: String, src: String },
    Cmp { lhs: String, rhs: String },
    Je(String),
    Jmp(String),
    Add(String),
    Sub(String),
    Imul(String),
    Idiv(String),
    /// `set<cc> al`
    Set(&'static str),
    /// `movzx eax, al`
    Movzx,
    Print(String),
}

impl fmt::Display for Asm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asm::Label(label) => write!(f, "{label}:"),
            Asm::Mov { dst, src } => write!(f, "mov {dst}, {src}"),
            Asm::Cmp { lhs, rhs } => write!(f, "cmp {lhs}, {rhs}"),
            Asm::Je(label) => write!(f, "je {label}"),
            Asm::Jmp(label) => write!(f, "jmp {label}"),
            Asm::Add(src) => write!(f, "add {ACC}, {src}"),
            Asm::Sub(src) => write!(f, "sub {ACC}, {src}"),
            Asm::Imul(src) => write!(f, "imul {ACC}, {src}"),
            Asm::Idiv(src) => write!(f, "idiv {src}"),
            Asm::Set(cc) => write!(f, "set{cc} {ACC_LOW}"),
            Asm::Movzx => write!(f, "movzx {ACC}, {ACC_LOW}"),
            Asm::Print(value) => write!(f, "print {value}"),
        }
    }
}

/// Rewrites IR text into assembly text, one line at a time.
///
/// The output depends on nothing but the input text, so assembling the same
/// IR twice yields identical output.
pub fn assemble(ir: &str) -> Result<String, IrParseError> {
    let mut out = String::new();
    let mut count = 0usize;

    for (idx, line) in ir.lines().enumerate() {
        let Some(quad) = Quad::parse_line(idx + 1, line)? else {
            continue;
        };
        for asm in lower(&quad) {
            trace!(%quad, %asm, "lower");
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{asm}");
            count += 1;
        }
    }

    debug!(lines = count, "assembled");
    Ok(out)
}

/// The fixed template for one quadruple.
pub fn lower(quad: &Quad) -> Vec<Asm> {
    match quad {
        Quad::Label(label) => vec![Asm::Label(label.clone())],
        Quad::IfFalse { cond, target } => vec![
            Asm::Cmp {
                lhs: cond.clone(),
                rhs: "0".to_owned(),
            },
            Asm::Je(target.clone()),
        ],
        Quad::Goto(target) => vec![Asm::Jmp(target.clone())],
        Quad::Print(value) => vec![Asm::Print(print_operand(value))],
        Quad::Assign { dst, src } => vec![Asm::Mov {
            dst: dst.clone(),
            src: mov_operand(src),
        }],
        Quad::Binary { dst, lhs, op, rhs } => {
            let mut asm = vec![Asm::Mov {
                dst: ACC.to_owned(),
                src: lhs.clone(),
            }];
            match op {
                BinOp::Add => asm.push(Asm::Add(rhs.clone())),
                BinOp::Sub => asm.push(Asm::Sub(rhs.clone())),
                BinOp::Mul => asm.push(Asm::Imul(rhs.clone())),
                BinOp::Div => asm.extend([
                    Asm::Mov {
                        dst: REMAINDER.to_owned(),
                        src: "0".to_owned(),
                    },
                    Asm::Idiv(rhs.clone()),
                ]),
                cmp => asm.extend([
                    Asm::Cmp {
                        lhs: lhs.clone(),
                        rhs: rhs.clone(),
                    },
                    Asm::Set(condition_code(*cmp)),
                    Asm::Movzx,
                ]),
            }
            asm.push(Asm::Mov {
                dst: dst.clone(),
                src: ACC.to_owned(),
            });
            asm
        }
    }
}

fn condition_code(op: BinOp) -> &'static str {
    match op {
        BinOp::Lt => "l",
        BinOp::Gt => "g",
        BinOp::Le => "le",
        BinOp::Ge => "ge",
        BinOp::Eq => "e",
        BinOp::Ne => "ne",
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
            unreachable!("arithmetic operator `{op}` has no condition code")
        }
    }
}

/// Quoted literals and numbers print as-is; a bare name is quoted.
fn print_operand(value: &Literal) -> String {
    if value.quoted || value.text.starts_with(|c: char| c.is_ascii_digit()) {
        value.to_string()
    } else {
        format!("\"{}\"", value.text)
    }
}

/// Quoted literals are string constants as written. Bare numbers and the
/// boolean names stay bare; any other bare word is quoted.
fn mov_operand(value: &Literal) -> String {
    if value.quoted {
        value.to_string()
    } else if value.text.starts_with(|c: char| c.is_ascii_digit())
        || matches!(value.text.as_str(), "true" | "false")
    {
        value.text.clone()
    } else {
        format!("\"{}\"", value.text)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn literal_assignment() {
        assert_eq!(assemble("x = 5\n").unwrap(), "mov x, 5\n");
        assert_eq!(assemble("d = 2.5\n").unwrap(), "mov d, 2.5\n");
        assert_eq!(assemble("s = hi\n").unwrap(), "mov s, \"hi\"\n");
        assert_eq!(assemble("b = true\n").unwrap(), "mov b, true\n");
        assert_eq!(
            assemble("s = \"hello world\"\n").unwrap(),
            "mov s, \"hello world\"\n"
        );
    }

    #[test]
    fn quoted_strings_stay_strings() {
        assert_eq!(
            assemble("s = \"3 apples\"\n").unwrap(),
            "mov s, \"3 apples\"\n"
        );
        assert_eq!(assemble("s = \"true\"\n").unwrap(), "mov s, \"true\"\n");
        assert_eq!(
            assemble("print \"3 apples\"\n").unwrap(),
            "print \"3 apples\"\n"
        );
    }

    #[test]
    fn escaped_line_breaks_stay_on_one_line() {
        let asm = assemble("s = \"a\\nb\"\nprint \"c\\\"d\"\n").unwrap();
        assert_eq!(asm, "mov s, \"a\\nb\"\nprint \"c\\\"d\"\n");
        assert_eq!(asm.lines().count(), 2);
    }

    #[test]
    fn jumps_and_labels() {
        let ir = "L0:\nifFalse t0 goto L1\ngoto L0\nL1:\n";
        assert_eq!(
            assemble(ir).unwrap(),
            "L0:\ncmp t0, 0\nje L1\njmp L0\nL1:\n"
        );
    }

    #[test]
    fn print_quotes_names() {
        assert_eq!(assemble("print yes\n").unwrap(), "print \"yes\"\n");
        assert_eq!(assemble("print 42\n").unwrap(), "print 42\n");
        assert_eq!(
            assemble("print \"two words\"\n").unwrap(),
            "print \"two words\"\n"
        );
    }

    #[test]
    fn comparison_template() {
        assert_eq!(
            assemble("t0 = x < 10\n").unwrap(),
            "mov eax, x\ncmp x, 10\nsetl al\nmovzx eax, al\nmov t0, eax\n"
        );
        assert_eq!(
            assemble("t3 = a != b\n").unwrap(),
            "mov eax, a\ncmp a, b\nsetne al\nmovzx eax, al\nmov t3, eax\n"
        );
    }

    #[test]
    fn arithmetic_templates() {
        assert_eq!(
            assemble("t1 = a + b\n").unwrap(),
            "mov eax, a\nadd eax, b\nmov t1, eax\n"
        );
        assert_eq!(
            assemble("t1 = a * 3\n").unwrap(),
            "mov eax, a\nimul eax, 3\nmov t1, eax\n"
        );
        assert_eq!(
            assemble("t2 = a / b\n").unwrap(),
            "mov eax, a\nmov edx, 0\nidiv b\nmov t2, eax\n"
        );
    }

    #[test]
    fn malformed_ir_is_an_error() {
        let err = assemble("x = 5\n\nx = = 5\n").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn assembling_twice_is_identical() {
        let ir = "x = 5\nt0 = x < 10\nifFalse t0 goto L1\ngoto L0\nL0:\nprint yes\nL1:\n";
        assert_eq!(assemble(ir).unwrap(), assemble(ir).unwrap());
    }

    quickcheck! {
        fn assemble_is_deterministic(lines: Vec<(u8, u8)>) -> bool {
            let ir: String = lines
                .iter()
                .map(|(shape, n)| match shape % 5 {
                    0 => format!("L{n}:\n"),
                    1 => format!("goto L{n}\n"),
                    2 => format!("ifFalse t{n} goto L{n}\n"),
                    3 => format!("v{n} = {n}\n"),
                    _ => format!("t{n} = v{n} {} {n}\n", BinOp::ALL[*n as usize % 10]),
                })
                .collect();
            assemble(&ir).ok() == assemble(&ir).ok()
        }
    }
}

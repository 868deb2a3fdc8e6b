//! Quadruple intermediate representation.
//!
//! A program is an ordered list of [`Quad`]s. Order is the only control flow:
//! jumps name their target label as text, and the label's defining
//! instruction may appear later in the list.
//!
//! The text form is line oriented, one instruction per line:
//!
//! ```text
//! L0:
//! ifFalse t0 goto L1
//! goto L0
//! x = 5
//! t0 = x < 10
//! print yes
//! ```

use std::fmt::{self, Write};
use std::str::FromStr;

use itertools::Itertools;

use crate::error::IrParseError;

/// Binary operators a quadruple can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl BinOp {
    pub const ALL: [BinOp; 10] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Lt,
        BinOp::Gt,
        BinOp::Le,
        BinOp::Ge,
        BinOp::Eq,
        BinOp::Ne,
    ];

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }

}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One three-address instruction.
///
/// Each variant is one shape of the `(result, arg1, op, arg2)` quadruple:
/// a label marker has only a result, a jump has only a target, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quad {
    /// `L0:`
    Label(String),
    /// `goto L0`
    Goto(String),
    /// `ifFalse t0 goto L1`
    IfFalse { cond: String, target: String },
    /// `x = 5`
    Assign { dst: String, src: Literal },
    /// `t0 = x < 10`
    Binary {
        dst: String,
        lhs: String,
        op: BinOp,
        rhs: String,
    },
    /// `print yes`
    Print(Literal),
}

/// A literal operand of an assignment or `print`.
///
/// Quoted literals are written between double quotes with `\\`, `\"`, `\n`
/// and `\r` escaped, so one always stays on one line as one operand. Bare
/// literals are written as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: String,
    pub quoted: bool,
}

impl Literal {
    /// Quotes the text when the bare form would not survive whitespace
    /// splitting or could be mistaken for a quoted one.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let quoted =
            text.is_empty() || text.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\');
        Literal { text, quoted }
    }

    fn parse(text: &str) -> Result<Self, &'static str> {
        let text = text.trim_end();
        let Some(body) = text.strip_prefix('"') else {
            return Ok(Literal {
                text: text.to_owned(),
                quoted: false,
            });
        };

        let mut unescaped = String::with_capacity(body.len());
        let mut chars = body.chars();
        loop {
            match chars.next() {
                None => return Err("unterminated quoted value"),
                Some('"') => break,
                Some('\\') => unescaped.push(match chars.next() {
                    Some('\\') => '\\',
                    Some('"') => '"',
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some(_) => return Err("unknown escape in quoted value"),
                    None => return Err("unterminated quoted value"),
                }),
                Some(c) => unescaped.push(c),
            }
        }
        if !chars.as_str().is_empty() {
            return Err("unexpected text after quoted value");
        }

        Ok(Literal {
            text: unescaped,
            quoted: true,
        })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.quoted {
            return f.write_str(&self.text);
        }
        f.write_char('"')?;
        for c in self.text.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '"' => f.write_str("\\\"")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

impl Quad {
    /// Parses one line of IR text. Blank lines yield `None`.
    ///
    /// `line` is the 1-based line number used in the error.
    pub fn parse_line(line: usize, text: &str) -> Result<Option<Self>, IrParseError> {
        let err = |reason| IrParseError::new(line, text, reason);

        let Some((head, rest)) = next_word(text) else {
            return Ok(None);
        };

        if let Some(label) = head.strip_suffix(':') {
            if label.is_empty() {
                return Err(err("empty label name"));
            }
            if !rest.is_empty() {
                return Err(err("unexpected text after label"));
            }
            return Ok(Some(Quad::Label(label.to_owned())));
        }

        let quad = match head {
            "ifFalse" => {
                let (cond, kw, target) = rest
                    .split_whitespace()
                    .collect_tuple()
                    .ok_or_else(|| err("expected `ifFalse <cond> goto <label>`"))?;
                if kw != "goto" {
                    return Err(err("expected `goto` in conditional jump"));
                }
                Quad::IfFalse {
                    cond: cond.to_owned(),
                    target: target.to_owned(),
                }
            }
            "goto" => {
                let (target,) = rest
                    .split_whitespace()
                    .collect_tuple()
                    .ok_or_else(|| err("expected `goto <label>`"))?;
                Quad::Goto(target.to_owned())
            }
            "print" => {
                if rest.is_empty() {
                    return Err(err("missing print operand"));
                }
                Quad::Print(Literal::parse(rest).map_err(err)?)
            }
            dst => {
                let Some(("=", rhs)) = next_word(rest) else {
                    return Err(err("expected `<name> = <value>`"));
                };
                if rhs.is_empty() {
                    return Err(err("missing assigned value"));
                }
                if rhs.starts_with('"') {
                    Quad::Assign {
                        dst: dst.to_owned(),
                        src: Literal::parse(rhs).map_err(err)?,
                    }
                } else {
                    let words = rhs.split_whitespace().collect_vec();
                    match words.as_slice() {
                        [src] => Quad::Assign {
                            dst: dst.to_owned(),
                            src: Literal {
                                text: (*src).to_owned(),
                                quoted: false,
                            },
                        },
                        [lhs, op, rhs] => Quad::Binary {
                            dst: dst.to_owned(),
                            lhs: (*lhs).to_owned(),
                            op: BinOp::from_symbol(op).ok_or_else(|| err("unknown operator"))?,
                            rhs: (*rhs).to_owned(),
                        },
                        _ => return Err(err("expected `<arg1>` or `<arg1> <op> <arg2>`")),
                    }
                }
            }
        };

        Ok(Some(quad))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quad::Label(label) => write!(f, "{label}:"),
            Quad::Goto(target) => write!(f, "goto {target}"),
            Quad::IfFalse { cond, target } => write!(f, "ifFalse {cond} goto {target}"),
            Quad::Assign { dst, src } => write!(f, "{dst} = {src}"),
            Quad::Binary { dst, lhs, op, rhs } => write!(f, "{dst} = {lhs} {op} {rhs}"),
            Quad::Print(value) => write!(f, "print {value}"),
        }
    }
}

/// An ordered quadruple sequence, the unit handed from the parser to the
/// assembly stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrProgram {
    quads: Vec<Quad>,
}

impl IrProgram {
    pub fn new(quads: Vec<Quad>) -> Self {
        Self { quads }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl fmt::Display for IrProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for quad in &self.quads {
            writeln!(f, "{quad}")?;
        }
        Ok(())
    }
}

impl FromStr for IrProgram {
    type Err = IrParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let quads = text
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| Quad::parse_line(idx + 1, line).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { quads })
    }
}

/// Splits off the first whitespace-delimited word, returning it with the
/// remainder (leading whitespace trimmed).
fn next_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some((&text[..end], text[end..].trim_start()))
}

//! Intermediate code emission.
//!
//! [`IrEmitter`] owns the quadruple sequence under construction together with
//! the temporary and label counters. Names are `t<n>` and `L<n>`, strictly
//! increasing and never reused by one emitter.

use tracing::trace;

use crate::error::ConditionError;
use crate::ir::{BinOp, IrProgram, Literal, Quad};

#[derive(Debug, Default)]
pub struct IrEmitter {
    code: Vec<Quad>,
    temp_count: usize,
    label_count: usize,
}

impl IrEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_count);
        self.temp_count += 1;
        temp
    }

    pub fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }

    pub fn emit(&mut self, quad: Quad) {
        trace!(%quad, "emit");
        self.code.push(quad);
    }

    pub fn emit_label(&mut self, label: &str) {
        self.emit(Quad::Label(label.to_owned()));
    }

    pub fn emit_goto(&mut self, target: &str) {
        self.emit(Quad::Goto(target.to_owned()));
    }

    pub fn emit_if_false(&mut self, cond: &str, target: &str) {
        self.emit(Quad::IfFalse {
            cond: cond.to_owned(),
            target: target.to_owned(),
        });
    }

    pub fn emit_assign(&mut self, dst: &str, src: &str) {
        self.emit(Quad::Assign {
            dst: dst.to_owned(),
            src: Literal::new(src),
        });
    }

    pub fn emit_print(&mut self, value: &str) {
        self.emit(Quad::Print(Literal::new(value)));
    }

    /// Emits `t<n> = lhs op rhs` for a textual `lhs op rhs` condition and
    /// returns the temporary holding its result.
    pub fn condition(&mut self, text: &str) -> Result<String, ConditionError> {
        let temp = self.new_temp();

        let mut fields = text.split_whitespace();
        let (Some(lhs), Some(op), Some(rhs)) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ConditionError::MissingField(text.to_owned()));
        };
        if fields.next().is_some() {
            return Err(ConditionError::TrailingField(text.to_owned()));
        }
        let op = BinOp::from_symbol(op).ok_or_else(|| ConditionError::UnknownOperator {
            condition: text.to_owned(),
            op: op.to_owned(),
        })?;

        self.emit(Quad::Binary {
            dst: temp.clone(),
            lhs: lhs.to_owned(),
            op,
            rhs: rhs.to_owned(),
        });
        Ok(temp)
    }

    /// Condition check for an `if`: falls to `false_label` when the condition
    /// does not hold, otherwise jumps to `true_label`.
    pub fn if_else(
        &mut self,
        cond: &str,
        true_label: &str,
        false_label: &str,
    ) -> Result<(), ConditionError> {
        let temp = self.condition(cond)?;
        self.emit_if_false(&temp, false_label);
        self.emit_goto(true_label);
        Ok(())
    }

    /// Loop head check: leaves the loop through `end_label` when the condition
    /// does not hold.
    pub fn loop_condition(&mut self, cond: &str, end_label: &str) -> Result<(), ConditionError> {
        let temp = self.condition(cond)?;
        self.emit_if_false(&temp, end_label);
        Ok(())
    }

    pub fn code(&self) -> &[Quad] {
        &self.code
    }

    pub fn finish(self) -> IrProgram {
        IrProgram::new(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_fresh_and_increasing() {
        let mut emitter = IrEmitter::new();
        assert_eq!(emitter.new_temp(), "t0");
        assert_eq!(emitter.new_temp(), "t1");
        assert_eq!(emitter.new_label(), "L0");
        assert_eq!(emitter.new_temp(), "t2");
        assert_eq!(emitter.new_label(), "L1");
    }

    #[test]
    fn condition_emits_comparison() {
        let mut emitter = IrEmitter::new();
        let temp = emitter.condition("  x   <=  10 ").unwrap();
        assert_eq!(temp, "t0");
        assert_eq!(
            emitter.code(),
            &[Quad::Binary {
                dst: "t0".into(),
                lhs: "x".into(),
                op: BinOp::Le,
                rhs: "10".into(),
            }]
        );
    }

    #[test]
    fn short_conditions_are_rejected() {
        let mut emitter = IrEmitter::new();
        assert_eq!(
            emitter.condition("x <"),
            Err(ConditionError::MissingField("x <".into()))
        );
        assert!(matches!(
            emitter.condition(""),
            Err(ConditionError::MissingField(_))
        ));
        assert!(matches!(
            emitter.condition("x < 1 && y"),
            Err(ConditionError::TrailingField(_))
        ));
        assert!(matches!(
            emitter.condition("x => 1"),
            Err(ConditionError::UnknownOperator { .. })
        ));
        assert!(emitter.code().is_empty());
    }

    #[test]
    fn if_else_jumps() {
        let mut emitter = IrEmitter::new();
        let true_label = emitter.new_label();
        let false_label = emitter.new_label();
        emitter.if_else("a != b", &true_label, &false_label).unwrap();

        assert_eq!(
            emitter.finish().to_string(),
            "t0 = a != b\nifFalse t0 goto L1\ngoto L0\n"
        );
    }

    #[test]
    fn loop_condition_exits_to_end() {
        let mut emitter = IrEmitter::new();
        emitter.loop_condition("i < n", "L7").unwrap();
        assert_eq!(emitter.finish().to_string(), "t0 = i < n\nifFalse t0 goto L7\n");
    }
}

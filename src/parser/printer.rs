//! AST printers
//!
//! [`Printer`] renders a program back to canonical loopc source: one
//! statement per line, block bodies indented by four spaces, and only the
//! parentheses the precedence rules require. Parsing the printed text yields
//! the same tree.
//!
//! [`to_sexpr`] renders any node as a compact s-expression, which is how the
//! tests compare tree shapes.

use crate::parser::ast::*;
use crate::parser::visitor::{walk_program, Accept, Visitor};
use std::fmt;

const INDENT: &str = "    ";

/// Pretty-printer producing canonical source text
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `program` as canonical source text.
    pub fn print(program: &Program) -> String {
        let mut printer = Printer::new();
        program.accept(&mut printer);
        printer.out
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line_start(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    /// Write `operand` of an operator with precedence `parent`. Operators
    /// associate to the left, so a right operand at the same level needs
    /// parentheses too.
    fn operand(&mut self, operand: &Expr, parent: Precedence, right: bool) {
        let needs_parens = match operand.precedence() {
            Some(inner) if right => inner <= parent,
            Some(inner) => inner < parent,
            None => false,
        };
        if needs_parens {
            self.out.push('(');
            operand.accept(self);
            self.out.push(')');
        } else {
            operand.accept(self);
        }
    }

    fn block(&mut self, header: &str, body: &[Equation]) {
        self.line_start();
        self.out.push_str(header);
        self.out.push_str(" : begin\n");
        self.indent += 1;
        for equation in body {
            equation.accept(self);
        }
        self.indent -= 1;
        self.line_start();
        self.out.push_str("end\n");
    }

    fn conditions_text(&self, conditions: &Conditions) -> String {
        let mut printer = Printer::new();
        conditions.accept(&mut printer);
        printer.finish()
    }
}

impl Visitor for Printer {
    type Output = ();

    fn visit_program(&mut self, node: &Program) {
        walk_program(self, node);
    }

    fn visit_declaration(&mut self, node: &Declaration) {
        self.line_start();
        self.out.push_str("int ");
        self.out.push_str(&node.names.join(", "));
        if let Some(init) = &node.init {
            self.out.push_str(" = ");
            init.accept(self);
        }
        self.out.push_str(";\n");
    }

    fn visit_equation(&mut self, node: &Equation) {
        self.line_start();
        self.out.push_str(&node.target);
        self.out.push(' ');
        self.out.push_str(node.op.symbol());
        self.out.push(' ');
        node.value.accept(self);
        self.out.push_str(";\n");
    }

    fn visit_binary_op(&mut self, node: &BinaryOp) {
        let precedence = node.op.precedence();
        self.operand(&node.left, precedence, false);
        self.out.push(' ');
        self.out.push_str(node.op.symbol());
        self.out.push(' ');
        self.operand(&node.right, precedence, true);
    }

    fn visit_final(&mut self, node: &Final) {
        self.out.push_str(&node.value);
    }

    fn visit_condition(&mut self, node: &Condition) {
        node.left.accept(self);
        self.out.push(' ');
        self.out.push_str(node.op.symbol());
        self.out.push(' ');
        node.right.accept(self);
    }

    fn visit_conditions(&mut self, node: &Conditions) {
        match node {
            Conditions::Single(condition) => condition.accept(self),
            Conditions::Combined {
                op, left, right, ..
            } => {
                left.accept(self);
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                right.accept(self);
            }
        }
    }

    fn visit_if(&mut self, node: &If) {
        let conditions = self.conditions_text(&node.conditions);
        self.block(&format!("if {conditions}"), &node.body);
        for elif in &node.elifs {
            elif.accept(self);
        }
        if let Some(else_branch) = &node.else_branch {
            else_branch.accept(self);
        }
    }

    fn visit_elif(&mut self, node: &Elif) {
        let conditions = self.conditions_text(&node.conditions);
        self.block(&format!("elif {conditions}"), &node.body);
    }

    fn visit_else(&mut self, node: &Else) {
        self.block("else", &node.body);
    }

    fn visit_loop(&mut self, node: &Loop) {
        let conditions = self.conditions_text(&node.conditions);
        self.block(&format!("loopc {conditions}"), &node.body);
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer::print(self))
    }
}

/// Render any node as an s-expression, e.g. `(+ 2 (* 3 4))`.
pub fn to_sexpr<N: Accept + ?Sized>(node: &N) -> String {
    node.accept(&mut SexprPrinter)
}

struct SexprPrinter;

impl SexprPrinter {
    fn list<'a>(&mut self, head: &str, items: impl IntoIterator<Item = &'a Equation>) -> String {
        let mut out = format!("({head}");
        for item in items {
            out.push(' ');
            out.push_str(&item.accept(self));
        }
        out.push(')');
        out
    }
}

impl Visitor for SexprPrinter {
    type Output = String;

    fn visit_program(&mut self, node: &Program) -> String {
        let mut out = String::from("(program");
        for statement in &node.statements {
            out.push(' ');
            out.push_str(&statement.accept(self));
        }
        out.push(')');
        out
    }

    fn visit_declaration(&mut self, node: &Declaration) -> String {
        let names = node.names.join(" ");
        match &node.init {
            Some(init) => format!("(int ({names}) {})", init.accept(self)),
            None => format!("(int ({names}))"),
        }
    }

    fn visit_equation(&mut self, node: &Equation) -> String {
        format!("({} {} {})", node.op, node.target, node.value.accept(self))
    }

    fn visit_binary_op(&mut self, node: &BinaryOp) -> String {
        format!(
            "({} {} {})",
            node.op,
            node.left.accept(self),
            node.right.accept(self)
        )
    }

    fn visit_final(&mut self, node: &Final) -> String {
        node.value.clone()
    }

    fn visit_condition(&mut self, node: &Condition) -> String {
        format!(
            "({} {} {})",
            node.op,
            node.left.accept(self),
            node.right.accept(self)
        )
    }

    fn visit_conditions(&mut self, node: &Conditions) -> String {
        match node {
            Conditions::Single(condition) => condition.accept(self),
            Conditions::Combined {
                op, left, right, ..
            } => format!("({op} {} {})", left.accept(self), right.accept(self)),
        }
    }

    fn visit_if(&mut self, node: &If) -> String {
        let head = format!("if {}", node.conditions.accept(self));
        let mut out = self.list(&head, &node.body);
        out.pop();
        for elif in &node.elifs {
            out.push(' ');
            out.push_str(&elif.accept(self));
        }
        if let Some(else_branch) = &node.else_branch {
            out.push(' ');
            out.push_str(&else_branch.accept(self));
        }
        out.push(')');
        out
    }

    fn visit_elif(&mut self, node: &Elif) -> String {
        let head = format!("elif {}", node.conditions.accept(self));
        self.list(&head, &node.body)
    }

    fn visit_else(&mut self, node: &Else) -> String {
        self.list("else", &node.body)
    }

    fn visit_loop(&mut self, node: &Loop) -> String {
        let head = format!("loopc {}", node.conditions.accept(self));
        self.list(&head, &node.body)
    }
}

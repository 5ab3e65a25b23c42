//! Visitor contract for AST consumers
//!
//! [`Visitor`] has exactly one required handler per node kind and no default
//! bodies, so adding a node kind breaks every consumer at compile time.
//! Nodes dispatch through [`Accept`]. The `walk_*` functions visit a node's
//! children in source order for visitors that only act on some kinds.

use crate::parser::ast::*;

pub trait Visitor {
    type Output;

    fn visit_program(&mut self, node: &Program) -> Self::Output;
    fn visit_declaration(&mut self, node: &Declaration) -> Self::Output;
    fn visit_equation(&mut self, node: &Equation) -> Self::Output;
    fn visit_binary_op(&mut self, node: &BinaryOp) -> Self::Output;
    fn visit_final(&mut self, node: &Final) -> Self::Output;
    fn visit_condition(&mut self, node: &Condition) -> Self::Output;
    fn visit_conditions(&mut self, node: &Conditions) -> Self::Output;
    fn visit_if(&mut self, node: &If) -> Self::Output;
    fn visit_elif(&mut self, node: &Elif) -> Self::Output;
    fn visit_else(&mut self, node: &Else) -> Self::Output;
    fn visit_loop(&mut self, node: &Loop) -> Self::Output;
}

/// Double dispatch entry point implemented by every node type
pub trait Accept {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

macro_rules! accept {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(impl Accept for $node {
            fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                visitor.$method(self)
            }
        })*
    };
}

accept! {
    Program => visit_program,
    Declaration => visit_declaration,
    Equation => visit_equation,
    BinaryOp => visit_binary_op,
    Final => visit_final,
    Condition => visit_condition,
    Conditions => visit_conditions,
    If => visit_if,
    Elif => visit_elif,
    Else => visit_else,
    Loop => visit_loop,
}

impl Accept for Statement {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Statement::Declaration(node) => visitor.visit_declaration(node),
            Statement::Equation(node) => visitor.visit_equation(node),
            Statement::If(node) => visitor.visit_if(node),
            Statement::Loop(node) => visitor.visit_loop(node),
        }
    }
}

impl Accept for Expr {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Binary(node) => visitor.visit_binary_op(node),
            Expr::Final(node) => visitor.visit_final(node),
        }
    }
}

pub fn walk_program<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Program) {
    for statement in &node.statements {
        statement.accept(visitor);
    }
}

pub fn walk_declaration<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Declaration) {
    if let Some(init) = &node.init {
        init.accept(visitor);
    }
}

pub fn walk_equation<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Equation) {
    node.value.accept(visitor);
}

pub fn walk_binary_op<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &BinaryOp) {
    node.left.accept(visitor);
    node.right.accept(visitor);
}

pub fn walk_condition<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Condition) {
    node.left.accept(visitor);
    node.right.accept(visitor);
}

pub fn walk_conditions<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Conditions) {
    match node {
        Conditions::Single(condition) => condition.accept(visitor),
        Conditions::Combined { left, right, .. } => {
            left.accept(visitor);
            right.accept(visitor);
        }
    }
}

fn walk_body<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, body: &[Equation]) {
    for equation in body {
        equation.accept(visitor);
    }
}

pub fn walk_if<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &If) {
    node.conditions.accept(visitor);
    walk_body(visitor, &node.body);
    for elif in &node.elifs {
        elif.accept(visitor);
    }
    if let Some(else_branch) = &node.else_branch {
        else_branch.accept(visitor);
    }
}

pub fn walk_elif<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Elif) {
    node.conditions.accept(visitor);
    walk_body(visitor, &node.body);
}

pub fn walk_else<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Else) {
    walk_body(visitor, &node.body);
}

pub fn walk_loop<V: Visitor<Output = ()> + ?Sized>(visitor: &mut V, node: &Loop) {
    node.conditions.accept(visitor);
    walk_body(visitor, &node.body);
}

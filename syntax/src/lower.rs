use crate::{
    ast::{Expr, Stmt},
    tree::{Field, NodeRef, SyntaxTree},
};

#[derive(Clone, Copy)]
enum Ctx {
    Load,
    Store,
}

impl Ctx {
    fn kind(self) -> &'static str {
        match self {
            Ctx::Load => "Load",
            Ctx::Store => "Store",
        }
    }
}

/// Build a `Module` tree from parsed statements.
///
/// Children are allocated before their parents. Context markers (`Load`, `Store`) and operators
/// get a fresh node per occurrence.
pub(crate) fn lower_module(body: &[Stmt]) -> SyntaxTree {
    let mut lowerer = Lowerer {
        tree: SyntaxTree::new(),
    };
    let body: Vec<NodeRef> = body.iter().map(|stmt| lowerer.stmt(stmt)).collect();
    let module = lowerer.tree.add("Module", [("body", Field::List(body))]);
    lowerer.tree.set_root(module);
    lowerer.tree
}

struct Lowerer {
    tree: SyntaxTree,
}

impl Lowerer {
    fn stmt(&mut self, stmt: &Stmt) -> NodeRef {
        match stmt {
            Stmt::Assign { targets, value } => {
                let targets = self.exprs(targets, Ctx::Store);
                let value = self.expr(value, Ctx::Load);
                self.tree.add(
                    "Assign",
                    [("targets", Field::List(targets)), ("value", value.into())],
                )
            },
            Stmt::AugAssign { target, op, value } => {
                let target = self.expr(target, Ctx::Store);
                let op = self.tree.leaf(op.kind());
                let value = self.expr(value, Ctx::Load);
                self.tree.add(
                    "AugAssign",
                    [
                        ("target", target.into()),
                        ("op", op.into()),
                        ("value", value.into()),
                    ],
                )
            },
            Stmt::Expr(expr) => {
                let value = self.expr(expr, Ctx::Load);
                self.tree.add("Expr", [("value", value.into())])
            },
            Stmt::Pass => self.tree.leaf("Pass"),
        }
    }

    fn exprs(&mut self, exprs: &[Expr], ctx: Ctx) -> Vec<NodeRef> {
        exprs.iter().map(|expr| self.expr(expr, ctx)).collect()
    }

    fn ctx(&mut self, ctx: Ctx) -> Field {
        self.tree.leaf(ctx.kind()).into()
    }

    fn expr(&mut self, expr: &Expr, ctx: Ctx) -> NodeRef {
        match expr {
            Expr::Name(id) => {
                let ctx = self.ctx(ctx);
                self.tree
                    .add("Name", [("id", Field::primitive(id.as_str())), ("ctx", ctx)])
            },
            Expr::Int(n) => self.tree.add("Num", [("n", Field::primitive(*n))]),
            Expr::Float(n) => self.tree.add("Num", [("n", Field::primitive(*n))]),
            Expr::Str(s) => self.tree.add("Str", [("s", Field::primitive(s.as_str()))]),
            Expr::List(elts) => {
                let elts = self.exprs(elts, ctx);
                let ctx = self.ctx(ctx);
                self.tree
                    .add("List", [("elts", Field::List(elts)), ("ctx", ctx)])
            },
            Expr::BinOp { left, op, right } => {
                let left = self.expr(left, Ctx::Load);
                let op = self.tree.leaf(op.kind());
                let right = self.expr(right, Ctx::Load);
                self.tree.add(
                    "BinOp",
                    [
                        ("left", left.into()),
                        ("op", op.into()),
                        ("right", right.into()),
                    ],
                )
            },
            Expr::UnaryOp { op, operand } => {
                let op = self.tree.leaf(op.kind());
                let operand = self.expr(operand, Ctx::Load);
                self.tree
                    .add("UnaryOp", [("op", op.into()), ("operand", operand.into())])
            },
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                let left = self.expr(left, Ctx::Load);
                let ops = ops.iter().map(|op| self.tree.leaf(op.kind())).collect();
                let comparators = self.exprs(comparators, Ctx::Load);
                self.tree.add(
                    "Compare",
                    [
                        ("left", left.into()),
                        ("ops", Field::List(ops)),
                        ("comparators", Field::List(comparators)),
                    ],
                )
            },
            Expr::Call { func, args } => {
                let func = self.expr(func, Ctx::Load);
                let args = self.exprs(args, Ctx::Load);
                self.tree.add(
                    "Call",
                    [
                        ("func", func.into()),
                        ("args", Field::List(args)),
                        ("keywords", Field::List(Vec::new())),
                        ("starargs", Field::Absent),
                        ("kwargs", Field::Absent),
                    ],
                )
            },
            Expr::Attribute { value, attr } => {
                let value = self.expr(value, Ctx::Load);
                let ctx = self.ctx(ctx);
                self.tree.add(
                    "Attribute",
                    [
                        ("value", value.into()),
                        ("attr", Field::primitive(attr.as_str())),
                        ("ctx", ctx),
                    ],
                )
            },
            Expr::Subscript { value, index } => {
                let value = self.expr(value, Ctx::Load);
                let index = self.expr(index, Ctx::Load);
                let slice = self.tree.add("Index", [("value", index.into())]);
                let ctx = self.ctx(ctx);
                self.tree.add(
                    "Subscript",
                    [
                        ("value", value.into()),
                        ("slice", slice.into()),
                        ("ctx", ctx),
                    ],
                )
            },
        }
    }
}

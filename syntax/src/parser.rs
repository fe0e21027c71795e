use crate::{
    ast::{BinOp, CmpOp, Expr, Stmt, UnaryOp},
    error::ParseError,
};
use chumsky::prelude::*;

fn inline_ws() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t' || *c == '\r')
        .repeated()
        .ignored()
}

fn comment() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    just('#')
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored()
}

fn line_end() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    inline_ws()
        .then(comment().or_not())
        .then(just('\n').ignored().or(end()))
        .ignored()
}

fn blank_line() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    inline_ws()
        .then(comment().or_not())
        .then(just('\n'))
        .ignored()
}

fn ident() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .chain(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated())
        .collect()
}

fn escape() -> impl Parser<char, char, Error = Simple<char>> + Clone {
    just('\\').ignore_then(any()).map(|c| match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    })
}

fn string_literal() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    let quoted = |quote: char| {
        just(quote)
            .ignore_then(
                filter(move |c: &char| *c != quote && *c != '\\' && *c != '\n')
                    .or(escape())
                    .repeated(),
            )
            .then_ignore(just(quote))
            .collect::<String>()
    };

    quoted('"').or(quoted('\''))
}

fn number() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .chain::<char, _, _>(
            just('.')
                .chain(filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1))
                .or_not()
                .flatten(),
        )
        .collect::<String>()
        .try_map(|s, span| {
            if s.contains('.') {
                s.parse::<f64>()
                    .map(Expr::Float)
                    .map_err(|_| Simple::custom(span, "invalid float"))
            } else {
                s.parse::<i64>()
                    .map(Expr::Int)
                    .map_err(|_| Simple::custom(span, "integer literal out of range"))
            }
        })
}

enum Postfix {
    Call(Vec<Expr>),
    Attribute(String),
    Index(Expr),
}

fn expr() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    recursive(|expr| {
        let padded = expr.clone().padded_by(inline_ws());

        let items = padded
            .clone()
            .separated_by(just(','))
            .allow_trailing()
            .padded_by(inline_ws());

        let parens = padded.clone().delimited_by(just('('), just(')'));
        let list = items
            .clone()
            .delimited_by(just('['), just(']'))
            .map(Expr::List);

        let atom = number()
            .or(string_literal().map(Expr::Str))
            .or(ident().map(Expr::Name))
            .or(parens)
            .or(list)
            .boxed();

        let postfix = inline_ws().ignore_then(choice((
            items
                .delimited_by(just('('), just(')'))
                .map(Postfix::Call),
            just('.')
                .ignore_then(inline_ws())
                .ignore_then(ident())
                .map(Postfix::Attribute),
            padded
                .delimited_by(just('['), just(']'))
                .map(Postfix::Index),
        )));

        let primary = atom
            .then(postfix.repeated())
            .foldl(|value, postfix| match postfix {
                Postfix::Call(args) => Expr::Call {
                    func: Box::new(value),
                    args,
                },
                Postfix::Attribute(attr) => Expr::Attribute {
                    value: Box::new(value),
                    attr,
                },
                Postfix::Index(index) => Expr::Subscript {
                    value: Box::new(value),
                    index: Box::new(index),
                },
            })
            .boxed();

        let unary = just('-')
            .to(UnaryOp::USub)
            .or(just('+').to(UnaryOp::UAdd))
            .then_ignore(inline_ws())
            .repeated()
            .then(primary)
            .foldr(|op, operand| Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            })
            .boxed();

        let product_op = choice((
            just('*').to(BinOp::Mult),
            just('/').to(BinOp::Div),
            just('%').to(BinOp::Mod),
        ));
        let product = unary
            .clone()
            .then(
                inline_ws()
                    .ignore_then(product_op)
                    .then_ignore(inline_ws())
                    .then(unary)
                    .repeated(),
            )
            .foldl(|left, (op, right)| Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            })
            .boxed();

        let sum_op = just('+').to(BinOp::Add).or(just('-').to(BinOp::Sub));
        let sum = product
            .clone()
            .then(
                inline_ws()
                    .ignore_then(sum_op)
                    .then_ignore(inline_ws())
                    .then(product)
                    .repeated(),
            )
            .foldl(|left, (op, right)| Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            })
            .boxed();

        let cmp_op = choice((
            just("==").to(CmpOp::Eq),
            just("!=").to(CmpOp::NotEq),
            just("<=").to(CmpOp::LtE),
            just(">=").to(CmpOp::GtE),
            just('<').to(CmpOp::Lt),
            just('>').to(CmpOp::Gt),
        ));

        sum.clone()
            .then(
                inline_ws()
                    .ignore_then(cmp_op)
                    .then_ignore(inline_ws())
                    .then(sum)
                    .repeated(),
            )
            .map(|(left, rest)| {
                if rest.is_empty() {
                    return left;
                }
                let (ops, comparators) = rest.into_iter().unzip();
                Expr::Compare {
                    left: Box::new(left),
                    ops,
                    comparators,
                }
            })
    })
}

fn aug_op() -> impl Parser<char, BinOp, Error = Simple<char>> + Clone {
    choice((
        just("+=").to(BinOp::Add),
        just("-=").to(BinOp::Sub),
        just("*=").to(BinOp::Mult),
        just("/=").to(BinOp::Div),
        just("%=").to(BinOp::Mod),
    ))
}

fn statement() -> impl Parser<char, Stmt, Error = Simple<char>> + Clone {
    let pass = text::keyword("pass").to(Stmt::Pass);

    // `a = b = 1`: every expression followed by a lone `=` is a target.
    let assign = expr()
        .then_ignore(inline_ws())
        .then_ignore(just('='))
        .then_ignore(inline_ws())
        .repeated()
        .at_least(1)
        .then(expr())
        .map(|(targets, value)| Stmt::Assign { targets, value });

    let aug_assign = expr()
        .then_ignore(inline_ws())
        .then(aug_op())
        .then_ignore(inline_ws())
        .then(expr())
        .map(|((target, op), value)| Stmt::AugAssign { target, op, value });

    pass.or(assign)
        .or(aug_assign)
        .or(expr().map(Stmt::Expr))
}

fn module() -> impl Parser<char, Vec<Stmt>, Error = Simple<char>> {
    let stmt_line = inline_ws()
        .ignore_then(statement())
        .then_ignore(line_end());

    blank_line()
        .repeated()
        .ignore_then(stmt_line.then_ignore(blank_line().repeated()).repeated())
        .then_ignore(inline_ws())
        .then_ignore(comment().or_not())
        .then_ignore(end())
}

pub fn parse(source: &str) -> Result<Vec<Stmt>, Vec<ParseError>> {
    module().parse(source).map_err(|errs| {
        errs.into_iter()
            .map(|e| {
                let span = e.span();
                let message = match e.reason() {
                    chumsky::error::SimpleReason::Unexpected => {
                        let found = e
                            .found()
                            .map(|c| format!("{c:?}"))
                            .unwrap_or_else(|| "end of input".to_string());
                        let expected: Vec<_> = e
                            .expected()
                            .filter_map(|exp| exp.as_ref().map(|c| format!("{c:?}")))
                            .collect();
                        if expected.is_empty() {
                            format!("unexpected {found}")
                        } else {
                            format!("expected {}, found {}", expected.join(" or "), found)
                        }
                    },
                    chumsky::error::SimpleReason::Unclosed { span: _, delimiter } => {
                        format!("unclosed delimiter '{delimiter}'")
                    },
                    chumsky::error::SimpleReason::Custom(msg) => msg.clone(),
                };
                ParseError::new(span, message)
            })
            .collect()
    })
}

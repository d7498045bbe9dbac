use std::fs;

use anyhow::{bail, Result};
use clap::Parser;

use crate::{
    il::{flow, FrameAllocator, Generator, LabelAllocator, TacFile},
    sema::Resolver,
};

mod ast;
mod il;
mod sema;
mod span;

#[derive(Debug, Parser)]
#[clap(about = "Intermediate code generator for Decaf")]
struct Options {
    /// Built-in sample program to compile: square, countdown or greet
    #[clap(short, long, default_value = "square")]
    sample: String,
    /// Write the intermediate-code file here instead of stdout
    #[clap(short, long)]
    output: Option<String>,
    #[clap(short, long, default_value_t = 1)]
    verbose: usize,
}

fn main() -> Result<()> {
    let options = Options::parse();
    stderrlog::new().verbosity(options.verbose).init()?;

    let mut tree = match options.sample.as_str() {
        "square" => samples::square(),
        "countdown" => samples::countdown(),
        "greet" => samples::greet(),
        other => bail!("unknown sample program '{}'", other),
    };

    let mut frame = FrameAllocator::new();
    let mut labels = LabelAllocator::new();
    Resolver::new(&mut frame).resolve(&mut tree);
    flow::propagate(&mut tree, &mut labels);

    let mut generator = Generator::new(frame);
    generator.synthesize(&mut tree);
    for diagnostic in generator.diagnostics() {
        log::error!("{}", diagnostic);
    }

    let file = TacFile {
        strings: generator.string_table(),
        globals: &[],
        code: &tree.code,
    };
    match options.output {
        Some(path) => fs::write(path, file.to_string())?,
        None => print!("{}", file),
    }

    Ok(())
}

/// Hand-built syntax trees standing in for the parser, which is not part of
/// this crate.
mod samples {
    use crate::ast::{CmpOp, Node, NodeKind};

    /// `var i = 5; i = i * i + 1; print(i)`
    pub fn square() -> Node {
        Node::new(NodeKind::Block).with_children(vec![
            Node::new(NodeKind::VarDecl).with_children(vec![
                Node::identifier("i"),
                Node::new(NodeKind::TypeInt),
                Node::int_literal(5),
            ]),
            Node::new(NodeKind::Assignment).with_children(vec![
                Node::identifier("i"),
                Node::new(NodeKind::Add).with_children(vec![
                    Node::new(NodeKind::Multiply)
                        .with_children(vec![Node::identifier("i"), Node::identifier("i")]),
                    Node::int_literal(1),
                ]),
            ]),
            Node::new(NodeKind::FunctionCall)
                .with_children(vec![Node::identifier("print"), Node::identifier("i")]),
        ])
    }

    /// `var n = 10; while (n > 0) { n = n - 1; } print(n)`
    pub fn countdown() -> Node {
        Node::new(NodeKind::Block).with_children(vec![
            Node::new(NodeKind::VarDecl).with_children(vec![
                Node::identifier("n"),
                Node::new(NodeKind::TypeInt),
                Node::int_literal(10),
            ]),
            Node::new(NodeKind::While).with_children(vec![
                Node::new(NodeKind::Comparison(Some(CmpOp::Gt)))
                    .with_children(vec![Node::identifier("n"), Node::int_literal(0)]),
                Node::new(NodeKind::Block).with_children(vec![Node::new(NodeKind::Assignment)
                    .with_children(vec![
                        Node::identifier("n"),
                        Node::new(NodeKind::Subtract)
                            .with_children(vec![Node::identifier("n"), Node::int_literal(1)]),
                    ])]),
            ]),
            Node::new(NodeKind::FunctionCall)
                .with_children(vec![Node::identifier("print"), Node::identifier("n")]),
        ])
    }

    /// `var s = "hello, decaf"; print(s)`
    pub fn greet() -> Node {
        Node::new(NodeKind::Block).with_children(vec![
            Node::new(NodeKind::VarDecl).with_children(vec![
                Node::identifier("s"),
                Node::new(NodeKind::TypeString),
                Node::new(NodeKind::StringLiteral("hello, decaf".to_string())),
            ]),
            Node::new(NodeKind::FunctionCall)
                .with_children(vec![Node::identifier("print"), Node::identifier("s")]),
        ])
    }
}

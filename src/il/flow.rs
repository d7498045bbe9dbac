//! Control-flow attribute propagation.
//!
//! Three passes over the whole tree, run strictly in order after symbol
//! resolution and before code generation:
//!
//! 1. every `while`, `if`, `else` clause and `for` node gets a fresh `first`
//!    label marking its entry point;
//! 2. `follow` labels are pushed down: a loop body falls through to its
//!    condition, the arms of an `if` fall through to whatever follows the
//!    `if`, and inside a statement sequence each statement falls through to
//!    the next one's entry;
//! 3. comparison and logical and/or nodes get their short-circuit
//!    `on_true`/`on_false` targets, reusing targets already pushed down by
//!    pass 2 and inventing fresh ones otherwise.
//!
//! Because every branch target is known before a single instruction is
//! emitted, the generator never has to patch a placeholder address after the
//! fact.

use crate::ast::{Node, NodeKind};

use super::label_allocator::LabelAllocator;

/// Runs all three passes over the tree.
pub fn propagate(root: &mut Node, labels: &mut LabelAllocator) {
    assign_first(root, labels);
    propagate_follow(root, labels);
    assign_branch_targets(root, labels);
}

/// Pass 1: entry labels. Independent per node, so any traversal order works.
fn assign_first(node: &mut Node, labels: &mut LabelAllocator) {
    if matches!(
        node.kind,
        NodeKind::While | NodeKind::If | NodeKind::Else | NodeKind::For
    ) {
        node.first = Some(labels.next_label());
    }
    for child in &mut node.children {
        assign_first(child, labels);
    }
}

/// Pass 2: follow labels. Top-down, since a node distributes its own
/// (already inherited) `follow` to its children before they are visited.
fn propagate_follow(node: &mut Node, labels: &mut LabelAllocator) {
    match node.kind {
        // Children: condition, body. The body falls through to the
        // condition's entry (the loop back-edge); the condition falls
        // through to whatever follows the loop.
        NodeKind::While => {
            let cond_first = node.child(0).and_then(|cond| cond.first.clone());
            if let Some(body) = node.children.get_mut(1) {
                body.follow = Some(cond_first.unwrap_or_else(|| labels.next_label()));
            }
            let follow = node.follow.clone();
            if follow.is_some() {
                if let Some(cond) = node.children.get_mut(0) {
                    cond.follow = follow;
                }
            }
        }
        // Children: condition, then-arm, optional else clause.
        NodeKind::If => {
            let then_first = node.child(1).and_then(|then| then.first.clone());
            if then_first.is_some() {
                if let Some(cond) = node.children.get_mut(0) {
                    cond.follow = then_first;
                }
            }
            if let Some(follow) = node.follow.clone() {
                if let Some(then) = node.children.get_mut(1) {
                    then.follow = Some(follow.clone());
                }
                if let Some(else_clause) = node.children.get_mut(2) {
                    else_clause.follow = Some(follow);
                }
            }
            // A failed condition skips to the else clause when there is one,
            // and past the whole statement when there is not.
            let on_false = node
                .child(2)
                .and_then(|else_clause| else_clause.first.clone())
                .or_else(|| node.follow.clone());
            if on_false.is_some() {
                if let Some(cond) = node.children.get_mut(0) {
                    cond.on_false = on_false;
                }
            }
        }
        // Each statement falls through to the entry of the next; the last
        // one inherits the sequence's own follow.
        NodeKind::Block => {
            for index in 1..node.children.len() {
                if let Some(first) = node.children[index].first.clone() {
                    node.children[index - 1].follow = Some(first);
                }
            }
            if let Some(follow) = node.follow.clone() {
                if let Some(last) = node.children.last_mut() {
                    last.follow = Some(follow);
                }
            }
        }
        _ => {}
    }
    for child in &mut node.children {
        propagate_follow(child, labels);
    }
}

/// Pass 3: short-circuit targets. Top-down, after pass 2, so targets pushed
/// down from enclosing control structures take precedence over fresh ones.
fn assign_branch_targets(node: &mut Node, labels: &mut LabelAllocator) {
    match node.kind {
        NodeKind::Comparison(_) => {
            ensure_targets(node, labels);
        }
        NodeKind::And => {
            ensure_targets(node, labels);
            let on_true = node.on_true.clone();
            let on_false = node.on_false.clone();
            // A failing left operand short-circuits; a passing one falls
            // through to a fresh label marking the right operand.
            let mid = labels.next_label();
            if let Some(lhs) = node.children.get_mut(0) {
                lhs.on_true = Some(mid);
                lhs.on_false = on_false.clone();
            }
            if let Some(rhs) = node.children.get_mut(1) {
                rhs.on_true = on_true;
                rhs.on_false = on_false;
            }
        }
        NodeKind::Or => {
            ensure_targets(node, labels);
            let on_true = node.on_true.clone();
            let on_false = node.on_false.clone();
            let mid = labels.next_label();
            if let Some(lhs) = node.children.get_mut(0) {
                lhs.on_true = on_true.clone();
                lhs.on_false = Some(mid);
            }
            if let Some(rhs) = node.children.get_mut(1) {
                rhs.on_true = on_true;
                rhs.on_false = on_false;
            }
        }
        _ => {}
    }
    for child in &mut node.children {
        assign_branch_targets(child, labels);
    }
}

fn ensure_targets(node: &mut Node, labels: &mut LabelAllocator) {
    if node.on_true.is_none() {
        node.on_true = Some(labels.next_label());
    }
    if node.on_false.is_none() {
        node.on_false = Some(labels.next_label());
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::CmpOp;

    use super::*;

    fn comparison() -> Node {
        Node::new(NodeKind::Comparison(Some(CmpOp::Lt)))
            .with_children(vec![Node::identifier("a"), Node::identifier("b")])
    }

    fn assignment() -> Node {
        Node::new(NodeKind::Assignment)
            .with_children(vec![Node::identifier("a"), Node::int_literal(1)])
    }

    fn while_loop() -> Node {
        Node::new(NodeKind::While).with_children(vec![
            comparison(),
            Node::new(NodeKind::Block).with_children(vec![assignment()]),
        ])
    }

    #[test]
    fn control_nodes_get_entry_labels() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::Block).with_children(vec![
            while_loop(),
            Node::new(NodeKind::If).with_children(vec![
                comparison(),
                Node::new(NodeKind::Block),
                Node::new(NodeKind::Else).with_children(vec![Node::new(NodeKind::Block)]),
            ]),
        ]);

        propagate(&mut tree, &mut labels);

        assert!(tree.children[0].first.is_some());
        assert!(tree.children[1].first.is_some());
        assert!(tree.children[1].children[2].first.is_some());
        assert_ne!(tree.children[0].first, tree.children[1].first);
        // Expressions and plain blocks get no entry label.
        assert_eq!(None, tree.first);
        assert_eq!(None, tree.children[0].children[0].first);
    }

    #[test]
    fn while_body_falls_through_to_condition_entry() {
        let mut labels = LabelAllocator::new();
        let mut tree = while_loop();
        // When the condition carries an entry label, the body must fall
        // through to exactly that label.
        let cond_entry = labels.next_label();
        tree.children[0].first = Some(cond_entry.clone());

        propagate(&mut tree, &mut labels);

        assert_eq!(Some(cond_entry), tree.children[1].follow);
    }

    #[test]
    fn while_body_gets_fresh_back_edge_without_condition_entry() {
        let mut labels = LabelAllocator::new();
        let mut tree = while_loop();

        propagate(&mut tree, &mut labels);

        assert!(tree.children[1].follow.is_some());
        assert_ne!(tree.children[1].follow, tree.first);
    }

    #[test]
    fn while_condition_inherits_loop_follow() {
        let mut labels = LabelAllocator::new();
        let mut tree = while_loop();
        let after_loop = labels.next_label();
        tree.follow = Some(after_loop.clone());

        propagate(&mut tree, &mut labels);

        assert_eq!(Some(after_loop), tree.children[0].follow);
    }

    #[test]
    fn else_less_if_condition_fails_to_statement_follow() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::If).with_children(vec![
            comparison(),
            Node::new(NodeKind::Block).with_children(vec![assignment()]),
        ]);
        let after_if = labels.next_label();
        tree.follow = Some(after_if.clone());

        propagate(&mut tree, &mut labels);

        assert_eq!(Some(after_if.clone()), tree.children[0].on_false);
        assert_eq!(Some(after_if), tree.children[1].follow);
    }

    #[test]
    fn if_condition_fails_to_else_entry() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::If).with_children(vec![
            comparison(),
            Node::new(NodeKind::Block),
            Node::new(NodeKind::Else).with_children(vec![Node::new(NodeKind::Block)]),
        ]);

        propagate(&mut tree, &mut labels);

        let else_entry = tree.children[2].first.clone();
        assert!(else_entry.is_some());
        assert_eq!(else_entry, tree.children[0].on_false);
    }

    #[test]
    fn statements_fall_through_to_next_entry() {
        let mut labels = LabelAllocator::new();
        let mut tree =
            Node::new(NodeKind::Block).with_children(vec![assignment(), while_loop()]);
        let after_block = labels.next_label();
        tree.follow = Some(after_block.clone());

        propagate(&mut tree, &mut labels);

        assert_eq!(tree.children[1].first, tree.children[0].follow);
        assert_eq!(Some(after_block), tree.children[1].follow);
    }

    #[test]
    fn and_wires_short_circuit_targets() {
        let mut labels = LabelAllocator::new();
        let mut tree =
            Node::new(NodeKind::And).with_children(vec![comparison(), comparison()]);

        propagate(&mut tree, &mut labels);

        let lhs = &tree.children[0];
        let rhs = &tree.children[1];
        assert_eq!(tree.on_false, lhs.on_false);
        assert_eq!(tree.on_true, rhs.on_true);
        assert_eq!(tree.on_false, rhs.on_false);
        // The left operand's true-target is a fresh intermediate label.
        assert!(lhs.on_true.is_some());
        assert_ne!(lhs.on_true, tree.on_true);
        assert_ne!(lhs.on_true, tree.on_false);
    }

    #[test]
    fn or_wires_short_circuit_targets() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::Or).with_children(vec![comparison(), comparison()]);

        propagate(&mut tree, &mut labels);

        let lhs = &tree.children[0];
        let rhs = &tree.children[1];
        assert_eq!(tree.on_true, lhs.on_true);
        assert_eq!(tree.on_true, rhs.on_true);
        assert_eq!(tree.on_false, rhs.on_false);
        assert!(lhs.on_false.is_some());
        assert_ne!(lhs.on_false, tree.on_true);
        assert_ne!(lhs.on_false, tree.on_false);
    }

    #[test]
    fn inherited_targets_take_precedence_over_fresh_ones() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::If).with_children(vec![
            comparison(),
            Node::new(NodeKind::Block).with_children(vec![assignment()]),
        ]);
        let after_if = labels.next_label();
        tree.follow = Some(after_if.clone());

        propagate(&mut tree, &mut labels);

        // Pass 3 must keep the on_false that pass 2 pushed into the
        // condition rather than allocating a fresh target.
        assert_eq!(Some(after_if), tree.children[0].on_false);
        assert!(tree.children[0].on_true.is_some());
    }

    #[test]
    fn and_condition_inherits_if_follow() {
        let mut labels = LabelAllocator::new();
        let mut tree = Node::new(NodeKind::If).with_children(vec![
            Node::new(NodeKind::And).with_children(vec![comparison(), comparison()]),
            Node::new(NodeKind::Block).with_children(vec![assignment()]),
        ]);
        let after_if = labels.next_label();
        tree.follow = Some(after_if.clone());

        propagate(&mut tree, &mut labels);

        // The failure target pushed into the condition by pass 2 wins over
        // a fresh one, and short-circuits both operands past the whole
        // statement.
        let cond = &tree.children[0];
        assert_eq!(Some(after_if.clone()), cond.on_false);
        assert_eq!(Some(after_if.clone()), cond.children[0].on_false);
        assert_eq!(Some(after_if), cond.children[1].on_false);
        assert!(cond.on_true.is_some());
    }
}

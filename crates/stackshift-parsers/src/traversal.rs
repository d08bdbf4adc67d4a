//! Syntax tree traversal utilities and visitor patterns

use crate::error::ParserResult;
use crate::types::ASTNode;

/// Result of a visitor operation
pub type VisitorResult = ParserResult<VisitAction>;

/// Action to take after visiting a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitAction {
    /// Continue traversal normally
    Continue,
    /// Skip children of this node
    SkipChildren,
    /// Stop traversal entirely
    Stop,
}

/// Node visitor trait for traversing AST nodes
pub trait NodeVisitor {
    /// Called before visiting a node's children
    fn pre_visit(&mut self, node: &ASTNode) -> VisitorResult;

    /// Called after visiting a node's children
    fn post_visit(&mut self, _node: &ASTNode) -> VisitorResult {
        Ok(VisitAction::Continue)
    }
}

/// Tree walker for traversing syntax trees
pub struct TreeWalker<V: NodeVisitor> {
    visitor: V,
}

impl<V: NodeVisitor> TreeWalker<V> {
    pub fn new(visitor: V) -> Self {
        Self { visitor }
    }

    /// Walk the tree depth-first in source order
    pub fn walk(&mut self, root: &ASTNode) -> ParserResult<()> {
        // Explicit stack so pathological nesting cannot blow the call stack
        let mut stack = vec![(root, false)];

        while let Some((node, post_visit_done)) = stack.pop() {
            if post_visit_done {
                if self.visitor.post_visit(node)? == VisitAction::Stop {
                    return Ok(());
                }
                continue;
            }

            match self.visitor.pre_visit(node)? {
                VisitAction::Stop => return Ok(()),
                VisitAction::SkipChildren => stack.push((node, true)),
                VisitAction::Continue => {
                    stack.push((node, true));
                    for child in node.children.iter().rev() {
                        stack.push((child, false));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }
}

/// Utility functions for tree traversal
pub struct TraversalUtils;

impl TraversalUtils {
    /// Find all nodes matching a predicate, in source order
    pub fn find_nodes<F>(root: &ASTNode, predicate: F) -> Vec<&ASTNode>
    where
        F: Fn(&ASTNode) -> bool,
    {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if predicate(node) {
                result.push(node);
            }
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Find the first node matching a predicate
    pub fn find_first<F>(root: &ASTNode, predicate: F) -> Option<&ASTNode>
    where
        F: Fn(&ASTNode) -> bool,
    {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if predicate(node) {
                return Some(node);
            }
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    /// Find nodes matching a predicate without descending into nodes that
    /// `barrier` accepts (the barrier node itself is not searched either,
    /// unless it is the root).
    pub fn find_nodes_within<'a, F, B>(root: &'a ASTNode, predicate: F, barrier: B) -> Vec<&'a ASTNode>
    where
        F: Fn(&ASTNode) -> bool,
        B: Fn(&ASTNode) -> bool,
    {
        let mut result = Vec::new();
        let mut stack: Vec<&ASTNode> = root.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if barrier(node) {
                continue;
            }
            if predicate(node) {
                result.push(node);
            }
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

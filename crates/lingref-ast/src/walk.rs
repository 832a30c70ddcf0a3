//! Document-order traversal
//!
//! Both walkers are pre-order and depth-first: a node is visited before its
//! children, an example's content before its sub-examples, and siblings left
//! to right. Every node is visited exactly once.

use crate::node::Node;

/// Visit every node in document order
pub fn walk<'a, F>(nodes: &'a [Node], f: &mut F)
where
    F: FnMut(&'a Node),
{
    for node in nodes {
        f(node);
        match node {
            Node::Group(group) => walk(&group.children, f),
            Node::Example(example) => {
                walk(&example.content, f);
                for sub in &example.subexamples {
                    walk(&sub.content, f);
                }
            }
            Node::Heading(_) | Node::Float(_) | Node::Reference(_) | Node::Text(_) => {}
        }
    }
}

/// Visit every node in document order with mutable access
pub fn walk_mut<F>(nodes: &mut [Node], f: &mut F)
where
    F: FnMut(&mut Node),
{
    for node in nodes.iter_mut() {
        f(node);
        match node {
            Node::Group(group) => walk_mut(&mut group.children, f),
            Node::Example(example) => {
                walk_mut(&mut example.content, f);
                for sub in example.subexamples.iter_mut() {
                    walk_mut(&mut sub.content, f);
                }
            }
            Node::Heading(_) | Node::Float(_) | Node::Reference(_) | Node::Text(_) => {}
        }
    }
}

//! Attribute-grammar evaluator over a [Tree](crate::parser::Tree), driven by
//! a dependency graph of (tree-node, attribute-name) pairs (§4.7).
//!
//! Each node's applicable production is recovered by matching its children's
//! symbols against the grammar rule's alternatives (a [Tree] records the
//! symbol sequence it was built from, but not which alternative — productions
//! within one rule are kept duplicate-free by [Rule::push](crate::grammar::Rule::push),
//! so the symbol sequence identifies the alternative uniquely).

mod value;

#[cfg(test)]
mod __tests__;

pub use value::{AttributeError, AttributeValue};

use crate::grammar::Grammar;
use crate::parser::Tree;
use std::collections::HashMap;
use std::rc::Rc;

/// A reference to one attribute occurrence within a production: position 0
/// is the production's head (the node itself); position `i` (1-based) is
/// the `i`-th symbol of the production body (a child of the node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    pub position: usize,
    pub name: String,
}

impl AttributeRef {
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
        }
    }
}

/// A user-supplied rule for computing one attribute of one production: the
/// setter function, and the attribute occurrences it reads from (§4.7).
#[derive(Clone)]
pub struct Binding {
    pub head: String,
    pub production_index: usize,
    pub target: AttributeRef,
    pub sources: Vec<AttributeRef>,
    setter: Rc<dyn Fn(&[AttributeValue]) -> AttributeValue>,
}

impl Binding {
    pub fn new(
        head: impl Into<String>,
        production_index: usize,
        target: AttributeRef,
        sources: Vec<AttributeRef>,
        setter: impl Fn(&[AttributeValue]) -> AttributeValue + 'static,
    ) -> Self {
        Self {
            head: head.into(),
            production_index,
            target,
            sources,
            setter: Rc::new(setter),
        }
    }
}

/// The identity of a node within a fixed [Tree]: the sequence of child
/// indices from the root. The root is `[]`.
type NodeId = Vec<usize>;

/// A set of [Binding]s keyed by `(head, production_index, target attribute)`
/// for fast lookup during evaluation.
#[derive(Clone, Default)]
pub struct Bindings {
    by_target: HashMap<(String, usize, String), Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binding: Binding) -> &mut Self {
        let key = (
            binding.head.clone(),
            binding.production_index,
            binding.target.name.clone(),
        );
        self.by_target.insert(key, binding);
        self
    }

    fn get(&self, head: &str, production_index: usize, attribute: &str) -> Option<&Binding> {
        self.by_target
            .get(&(head.to_string(), production_index, attribute.to_string()))
    }
}

/// Evaluate `attribute` at the root of `tree`, resolving every transitive
/// dependency along the way.
pub fn evaluate(
    grammar: &Grammar,
    tree: &Tree,
    bindings: &Bindings,
    attribute: &str,
) -> Result<AttributeValue, AttributeError> {
    let mut cache: HashMap<(NodeId, String), AttributeValue> = HashMap::new();
    let mut in_progress: Vec<(NodeId, String)> = Vec::new();
    resolve(grammar, tree, &[], bindings, attribute, &mut cache, &mut in_progress)
}

/// Evaluate `attribute` at the root and downcast it to `T`, the final step
/// of reducing a parse tree to an intermediate representation (§4.7).
pub fn evaluate_as<T: std::any::Any + Clone>(
    grammar: &Grammar,
    tree: &Tree,
    bindings: &Bindings,
    attribute: &str,
) -> Result<T, AttributeError> {
    let value = evaluate(grammar, tree, bindings, attribute)?;
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| AttributeError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: std::any::type_name::<T>(),
            actual: value.type_name(),
        })
}

fn resolve(
    grammar: &Grammar,
    root: &Tree,
    node_id: &[usize],
    bindings: &Bindings,
    attribute: &str,
    cache: &mut HashMap<(NodeId, String), AttributeValue>,
    in_progress: &mut Vec<(NodeId, String)>,
) -> Result<AttributeValue, AttributeError> {
    let key = (node_id.to_vec(), attribute.to_string());
    if let Some(value) = cache.get(&key) {
        return Ok(value.clone());
    }

    let node = node_at(root, node_id);

    if in_progress.contains(&key) {
        return Err(AttributeError::Cyclic {
            symbol: node.symbol().to_string(),
            attribute: attribute.to_string(),
        });
    }

    if let Tree::Terminal(leaf) = node {
        let value = match attribute {
            "lexeme" => AttributeValue::new(leaf.lexeme.clone()),
            "class" => AttributeValue::new(leaf.class.clone()),
            _ => {
                return Err(AttributeError::MissingBinding {
                    symbol: node.symbol().to_string(),
                    attribute: attribute.to_string(),
                })
            }
        };
        cache.insert(key, value.clone());
        return Ok(value);
    }

    // An attribute on `node` is either synthesized from `node`'s own
    // production (target position 0), or inherited from the parent's
    // production (target position = node's 1-based child index there).
    let (owner_id, owner_position): (NodeId, usize) = if let Some(index) = production_index_of(grammar, node) {
        if bindings.get(node.symbol(), index, attribute).is_some() {
            (node_id.to_vec(), 0)
        } else if let Some((parent_id, parent_index, child_position)) =
            parent_production(grammar, root, node_id)
        {
            if bindings
                .get(node_at(root, &parent_id).symbol(), parent_index, attribute)
                .is_some()
            {
                (parent_id, child_position)
            } else {
                (node_id.to_vec(), 0)
            }
        } else {
            (node_id.to_vec(), 0)
        }
    } else if let Some((parent_id, _, child_position)) = parent_production(grammar, root, node_id) {
        (parent_id, child_position)
    } else {
        (node_id.to_vec(), 0)
    };

    let owner = node_at(root, &owner_id);
    let owner_production = production_index_of(grammar, owner).ok_or_else(|| AttributeError::MissingBinding {
        symbol: node.symbol().to_string(),
        attribute: attribute.to_string(),
    })?;
    let binding = bindings
        .get(owner.symbol(), owner_production, attribute)
        .filter(|b| b.target.position == owner_position)
        .ok_or_else(|| AttributeError::MissingBinding {
            symbol: node.symbol().to_string(),
            attribute: attribute.to_string(),
        })?;

    in_progress.push(key.clone());
    let mut source_values = Vec::with_capacity(binding.sources.len());
    for source in &binding.sources {
        let source_id = resolve_ref(&owner_id, source.position);
        let value = resolve(
            grammar,
            root,
            &source_id,
            bindings,
            &source.name,
            cache,
            in_progress,
        )?;
        source_values.push(value);
    }
    in_progress.pop();

    let value = (binding.setter)(&source_values);
    cache.insert(key, value.clone());
    Ok(value)
}

/// The tree node identified by `node_id` (a path of child indices from `root`).
fn node_at<'t>(root: &'t Tree, node_id: &[usize]) -> &'t Tree {
    let mut current = root;
    for &index in node_id {
        current = &current.children()[index];
    }
    current
}

/// `position` 0 means the owner's own id; `position` i means the owner's
/// `(i-1)`-th child.
fn resolve_ref(owner_id: &[usize], position: usize) -> NodeId {
    if position == 0 {
        owner_id.to_vec()
    } else {
        let mut id = owner_id.to_vec();
        id.push(position - 1);
        id
    }
}

/// `node_id`'s parent, the production index the parent was expanded by, and
/// `node_id`'s 1-based position among the parent's children — `None` at the
/// root, which has no parent production.
fn parent_production(
    grammar: &Grammar,
    root: &Tree,
    node_id: &[usize],
) -> Option<(NodeId, usize, usize)> {
    if node_id.is_empty() {
        return None;
    }
    let parent_id = node_id[..node_id.len() - 1].to_vec();
    let parent = node_at(root, &parent_id);
    let index = production_index_of(grammar, parent)?;
    let child_position = node_id[node_id.len() - 1] + 1;
    Some((parent_id, index, child_position))
}

fn production_index_of(grammar: &Grammar, node: &Tree) -> Option<usize> {
    if node.is_terminal() {
        return None;
    }
    let rule = grammar.rule(node.symbol())?;
    let is_epsilon_node =
        node.children().len() == 1 && node.children()[0].symbol() == crate::grammar::EPSILON;
    rule.alternatives().iter().position(|production| {
        if is_epsilon_node {
            production.is_epsilon()
        } else {
            production.symbols().len() == node.children().len()
                && production
                    .symbols()
                    .iter()
                    .zip(node.children())
                    .all(|(expected, child)| expected == child.symbol())
        }
    })
}

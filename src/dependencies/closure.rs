//! Transitive closure over the user-declared dependency map.
//!
//! The map is loaded into a [`DiGraphMap`] with an edge from every file to
//! each of its direct dependencies. The map comes straight from the
//! configuration and may contain cycles, so before collecting a closure the
//! files reachable from the query are checked with a colour DFS that reports
//! a [`SywError::CircularDependency`] when it re-enters a file on its current
//! path. Files already proven cycle-free are remembered across queries.
//! Both traversals are iterative, so long chains do not grow the call stack.

use anyhow::Result;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

use super::DependencyMap;
use crate::core::SywError;

/// Memoizing closure calculator for one dependency map.
///
/// # Examples
///
/// ```rust
/// use showyourwork::dependencies::{DependencyClosure, DependencyMap};
///
/// # fn example() -> anyhow::Result<()> {
/// let mut map = DependencyMap::new();
/// map.insert("a".into(), vec!["b".into()]);
/// map.insert("b".into(), vec!["c".into()]);
///
/// let mut closure = DependencyClosure::new(&map);
/// let deps = closure.closure_of("a")?;
/// assert!(deps.contains("b") && deps.contains("c"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DependencyClosure<'a> {
    map: &'a DependencyMap,
    graph: DiGraphMap<&'a str, ()>,
    /// Files with no cycle anywhere below them
    acyclic: HashSet<&'a str>,
}

impl<'a> DependencyClosure<'a> {
    /// Creates a calculator over `map`.
    pub fn new(map: &'a DependencyMap) -> Self {
        let mut graph = DiGraphMap::new();
        for (file, deps) in map {
            graph.add_node(file.as_str());
            for dep in deps {
                graph.add_edge(file.as_str(), dep.as_str(), ());
            }
        }
        debug!(
            "Dependency graph has {} files and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            map,
            graph,
            acyclic: HashSet::new(),
        }
    }

    /// All files `file` depends on, directly or indirectly.
    ///
    /// `file` itself is not part of the result; a file that reaches itself
    /// is a cycle and an error.
    pub fn closure_of(&mut self, file: &str) -> Result<HashSet<String>> {
        // Files without an entry in the map have no dependencies
        let Some((start, _)) = self.map.get_key_value(file) else {
            return Ok(HashSet::new());
        };
        let start = start.as_str();

        self.check_acyclic(start)?;

        let mut deps = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                deps.insert(node.to_string());
            }
        }
        Ok(deps)
    }

    /// Walks everything reachable from `start`, failing on the first cycle.
    fn check_acyclic(&mut self, start: &'a str) -> Result<()> {
        if self.acyclic.contains(start) {
            return Ok(());
        }

        let mut path = vec![start];
        let mut on_path = HashSet::from([start]);
        let mut pending = vec![self.graph.neighbors(start)];

        while let Some(neighbors) = pending.last_mut() {
            match neighbors.next() {
                Some(next) if on_path.contains(next) => {
                    let begin = path.iter().position(|file| *file == next).unwrap_or(0);
                    let mut chain: Vec<String> = path[begin..].iter().map(ToString::to_string).collect();
                    chain.push(next.to_string());
                    return Err(SywError::CircularDependency { chain }.into());
                }
                Some(next) if self.acyclic.contains(next) => {}
                Some(next) => {
                    path.push(next);
                    on_path.insert(next);
                    pending.push(self.graph.neighbors(next));
                }
                None => {
                    pending.pop();
                    if let Some(done) = path.pop() {
                        on_path.remove(done);
                        self.acyclic.insert(done);
                    }
                }
            }
        }
        Ok(())
    }
}

/// All files `file` depends on in `map`.
pub fn closure(file: &str, map: &DependencyMap) -> Result<HashSet<String>> {
    DependencyClosure::new(map).closure_of(file)
}

/// Closure of every file declared in `map`, keyed by file.
pub fn closure_map(map: &DependencyMap) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut calculator = DependencyClosure::new(map);
    let mut result = BTreeMap::new();
    for file in map.keys() {
        let deps = calculator.closure_of(file)?;
        result.insert(file.clone(), deps.into_iter().collect());
    }
    debug!("Computed dependency closures for {} files", result.len());
    Ok(result)
}

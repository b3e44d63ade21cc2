//! Schema dependency ordering.
//!
//! Implements Kahn's algorithm over the schema dependency graph with:
//! - Deterministic tie-breaking by schema name
//! - Fail-closed handling of unknown dependencies and cycles
//! - Transitive blocking of schemas that sit behind a failure

use crate::error::{SchemaError, SchemaResult};
use crate::schema::SchemaDescriptor;

use log::debug;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

/// Outcome of ordering a set of schema descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPlan {
    /// Loadable schemas, dependencies first
    pub order: Vec<String>,
    /// One error per schema that cannot be loaded, plus one per cycle
    pub blocked: Vec<SchemaError>,
}

impl LoadPlan {
    pub fn is_complete(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Schemas excluded from the order.
    pub fn blocked_schemas(&self) -> BTreeSet<&str> {
        self.blocked
            .iter()
            .flat_map(|error| match error {
                SchemaError::MissingDependency { schema, .. }
                | SchemaError::DependencyFailed { schema, .. } => vec![schema.as_str()],
                SchemaError::DependencyCycle { schemas } => {
                    schemas.iter().map(String::as_str).collect()
                }
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Order `descriptors` so that every dependency precedes its dependents.
///
/// Fails with the first blocking error when any schema cannot be placed.
pub fn resolve_load_order<'a, I>(descriptors: I) -> SchemaResult<Vec<String>>
where
    I: IntoIterator<Item = &'a SchemaDescriptor>,
{
    let mut plan = plan_load_order(descriptors)?;
    if plan.blocked.is_empty() {
        Ok(plan.order)
    } else {
        Err(plan.blocked.remove(0))
    }
}

/// Order `descriptors`, setting aside the schemas that cannot be loaded.
///
/// A schema with an unknown dependency is blocked with `MissingDependency`.
/// Each dependency cycle, or schema depending on itself, yields one
/// `DependencyCycle` naming its members. Every other schema that depends on a
/// blocked schema gets `DependencyFailed`. Only duplicate schema names fail the
/// whole plan.
pub fn plan_load_order<'a, I>(descriptors: I) -> SchemaResult<LoadPlan>
where
    I: IntoIterator<Item = &'a SchemaDescriptor>,
{
    // Step 1: Index descriptors by name
    let mut by_name: BTreeMap<&str, &SchemaDescriptor> = BTreeMap::new();
    for descriptor in descriptors {
        if by_name.insert(&descriptor.name, descriptor).is_some() {
            return Err(SchemaError::DuplicateSchema {
                schema: descriptor.name.clone(),
            });
        }
    }

    // Step 2: Build dependents adjacency and in-degrees over known edges
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = by_name.keys().map(|name| (*name, 0)).collect();
    for (name, descriptor) in &by_name {
        let known: BTreeSet<&str> = descriptor
            .dependencies
            .iter()
            .map(String::as_str)
            .filter(|dep| by_name.contains_key(dep))
            .collect();
        for dep in known {
            dependents.entry(dep).or_default().push(*name);
            *in_degree.entry(*name).or_default() += 1;
        }
    }

    // Step 3: Kahn's algorithm, smallest name first among ready schemas
    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| Reverse(*name))
        .collect();
    let mut sorted: Vec<&str> = Vec::with_capacity(by_name.len());
    while let Some(Reverse(name)) = ready.pop() {
        sorted.push(name);
        for next in dependents.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(*next));
                }
            }
        }
    }

    let mut plan = LoadPlan::default();
    let mut blocked: BTreeSet<&str> = BTreeSet::new();

    // Step 4: Walk the order, blocking schemas with unknown or blocked dependencies
    for name in &sorted {
        let descriptor = by_name[name];
        let unknown = descriptor
            .dependencies
            .iter()
            .find(|dep| !by_name.contains_key(dep.as_str()));
        let failed = descriptor
            .dependencies
            .iter()
            .find(|dep| blocked.contains(dep.as_str()));

        if let Some(dep) = unknown {
            plan.blocked.push(SchemaError::missing_dependency(*name, dep));
            blocked.insert(*name);
        } else if let Some(dep) = failed {
            plan.blocked.push(SchemaError::DependencyFailed {
                schema: name.to_string(),
                dependency: dep.clone(),
            });
            blocked.insert(*name);
        } else {
            plan.order.push(name.to_string());
        }
    }

    // Step 5: Whatever Kahn could not place is on a cycle or behind one
    if sorted.len() != by_name.len() {
        let placed: BTreeSet<&str> = sorted.iter().copied().collect();
        let unplaced: BTreeSet<&str> = by_name
            .keys()
            .copied()
            .filter(|name| !placed.contains(name))
            .collect();
        let edges: BTreeMap<&str, Vec<&str>> = unplaced
            .iter()
            .map(|name| {
                let deps: Vec<&str> = by_name[name]
                    .dependencies
                    .iter()
                    .map(String::as_str)
                    .filter(|dep| unplaced.contains(dep))
                    .collect();
                (*name, deps)
            })
            .collect();

        let mut reported: BTreeSet<&str> = BTreeSet::new();
        for name in &unplaced {
            let unknown = by_name[name]
                .dependencies
                .iter()
                .find(|dep| !by_name.contains_key(dep.as_str()));
            if let Some(dep) = unknown {
                plan.blocked.push(SchemaError::missing_dependency(*name, dep));
                reported.insert(*name);
            }
        }

        for component in strongly_connected(&edges) {
            let first = component[0];
            if component.len() > 1 || edges[first].contains(&first) {
                reported.extend(component.iter().copied());
                plan.blocked.push(SchemaError::DependencyCycle {
                    schemas: component.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        // The rest only sit downstream of a cycle
        for name in unplaced.iter().filter(|name| !reported.contains(*name)) {
            if let Some(dependency) = edges[name].first() {
                plan.blocked.push(SchemaError::DependencyFailed {
                    schema: name.to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }

    debug!(
        "Planned schema load order {:?} ({} blocked)",
        plan.order,
        plan.blocked.len()
    );
    Ok(plan)
}

/// Strongly connected components of `edges` (Kosaraju), members sorted by name
/// and components ordered by their first member.
///
/// Both passes keep their path on the heap rather than recursing.
fn strongly_connected<'a>(edges: &BTreeMap<&'a str, Vec<&'a str>>) -> Vec<Vec<&'a str>> {
    // Pass 1: post-order over dependency edges
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut finished: Vec<&str> = Vec::with_capacity(edges.len());
    for root in edges.keys() {
        if !visited.insert(*root) {
            continue;
        }
        let mut path: Vec<(&str, usize)> = vec![(*root, 0)];
        while let Some(&(node, next)) = path.last() {
            match edges[node].get(next) {
                Some(dep) => {
                    if let Some(top) = path.last_mut() {
                        top.1 += 1;
                    }
                    if edges.contains_key(dep) && visited.insert(*dep) {
                        path.push((*dep, 0));
                    }
                }
                None => {
                    finished.push(node);
                    path.pop();
                }
            }
        }
    }

    // Pass 2: collect components over reversed edges, latest finisher first
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, deps) in edges {
        for dep in deps {
            dependents.entry(*dep).or_default().push(*name);
        }
    }
    let mut assigned: BTreeSet<&str> = BTreeSet::new();
    let mut components = Vec::new();
    for root in finished.into_iter().rev() {
        if !assigned.insert(root) {
            continue;
        }
        let mut component = vec![root];
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            for dependent in dependents.get(node).into_iter().flatten() {
                if assigned.insert(*dependent) {
                    component.push(*dependent);
                    pending.push(*dependent);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components.sort();
    components
}

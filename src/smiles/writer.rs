use std::collections::HashMap;

use log::debug;
use petgraph::graphmap::UnGraphMap;

use crate::ast::{Ast, Atom};

/// Write the fragment containing atom 0 as SMILES.
///
/// Ring closures are numbered from 1 in the order the rings were recorded;
/// atoms not reachable from atom 0 through bonds are not written.
pub fn to_smiles(ast: &Ast) -> String {
    if ast.is_empty() {
        return String::new();
    }
    let graph = bond_graph(ast);
    let tree = DfsTree::build(ast, &graph, 0);
    let mut out = String::new();
    write_node(ast, &graph, &tree, 0, &mut out);
    out
}

/// Undirected bond graph; neighbors iterate in bond insertion order.
fn bond_graph(ast: &Ast) -> UnGraphMap<usize, u8> {
    let mut graph = UnGraphMap::with_capacity(ast.atom_count(), ast.bonds().len());
    for atom in ast.atoms() {
        graph.add_node(atom.index);
    }
    for bond in ast.bonds() {
        if bond.from != bond.to {
            graph.add_edge(bond.from, bond.to, bond.order);
        }
    }
    graph
}

struct RingClosure {
    ring_id: usize,
    order: u8,
    /// Stereo marker written instead of the bond order, if any.
    marker: Option<char>,
}

struct DfsTree {
    children: Vec<Vec<usize>>,
    closures: Vec<Vec<RingClosure>>,
}

impl DfsTree {
    fn build(ast: &Ast, graph: &UnGraphMap<usize, u8>, start: usize) -> Self {
        let n = ast.atom_count();
        let mut rank: Vec<Option<usize>> = vec![None; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut children: Vec<Vec<usize>> = (0..n).map(|_| Vec::new()).collect();
        let mut back_edges: Vec<(usize, usize)> = Vec::new();

        let neighbor_lists: Vec<Vec<usize>> =
            (0..n).map(|i| graph.neighbors(i).collect()).collect();

        let mut next_rank = 0;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        rank[start] = Some(next_rank);
        next_rank += 1;

        loop {
            let Some(&mut (node, ref mut ni)) = stack.last_mut() else {
                break;
            };
            let neighbors = &neighbor_lists[node];
            if *ni >= neighbors.len() {
                stack.pop();
                continue;
            }
            let neighbor = neighbors[*ni];
            *ni += 1;

            if rank[neighbor].is_none() {
                rank[neighbor] = Some(next_rank);
                next_rank += 1;
                parent[neighbor] = Some(node);
                children[node].push(neighbor);
                stack.push((neighbor, 0));
            } else if parent[node] != Some(neighbor) && rank[neighbor] < rank[node] {
                back_edges.push((neighbor, node));
            }
        }

        let mut closures: Vec<Vec<RingClosure>> = (0..n).map(|_| Vec::new()).collect();
        let mut ids: HashMap<(usize, usize), usize> = HashMap::new();

        for ring in ast.rings() {
            let key = (ring.from.min(ring.to), ring.from.max(ring.to));
            if ids.contains_key(&key) {
                continue;
            }
            let (Some(rank_from), Some(rank_to)) = (rank[ring.from], rank[ring.to]) else {
                debug!("ring {}-{} not reachable from atom {start}", ring.from, ring.to);
                continue;
            };
            let ring_id = ids.len() + 1;
            ids.insert(key, ring_id);

            let mut markers = ring
                .stereo
                .as_deref()
                .map(|s| s.chars().map(|c| (c != '-').then_some(c)).collect::<Vec<_>>())
                .unwrap_or_default()
                .into_iter();
            let from_marker = markers.next().flatten();
            let to_marker = markers.next().flatten();

            let mut ends = [(ring.from, rank_from, from_marker), (ring.to, rank_to, to_marker)];
            ends.sort_by_key(|&(_, r, _)| r);
            for (atom, _, marker) in ends {
                closures[atom].push(RingClosure {
                    ring_id,
                    order: ring.order,
                    marker,
                });
            }
        }

        for (opener, closer) in back_edges {
            let key = (opener.min(closer), opener.max(closer));
            if ids.contains_key(&key) {
                continue;
            }
            let ring_id = ids.len() + 1;
            ids.insert(key, ring_id);
            let order = graph.edge_weight(opener, closer).copied().unwrap_or(1);
            for atom in [opener, closer] {
                closures[atom].push(RingClosure {
                    ring_id,
                    order,
                    marker: None,
                });
            }
        }

        Self { children, closures }
    }
}

fn write_node(
    ast: &Ast,
    graph: &UnGraphMap<usize, u8>,
    tree: &DfsTree,
    node: usize,
    out: &mut String,
) {
    write_atom_symbol(ast.atom(node), out);

    for rc in &tree.closures[node] {
        match rc.marker {
            Some(marker) => out.push(marker),
            None => write_bond_order(rc.order, out),
        }
        write_ring_digit(rc.ring_id, out);
    }

    let kids = &tree.children[node];
    if kids.is_empty() {
        return;
    }

    let last = kids.len() - 1;
    for (i, &child) in kids.iter().enumerate() {
        let is_branch = i < last;
        if is_branch {
            out.push('(');
        }
        let order = graph.edge_weight(node, child).copied().unwrap_or(1);
        write_bond_order(order, out);
        write_node(ast, graph, tree, child, out);
        if is_branch {
            out.push(')');
        }
    }
}

fn write_bond_order(order: u8, out: &mut String) {
    match order {
        2 => out.push('='),
        3 => out.push('#'),
        _ => {}
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else if id <= 99 {
        out.push('%');
        out.push(char::from(b'0' + (id / 10) as u8));
        out.push(char::from(b'0' + (id % 10) as u8));
    } else {
        out.push_str(&format!("%({id})"));
    }
}

fn write_atom_symbol(atom: &Atom, out: &mut String) {
    match &atom.stereo {
        Some(stereo) => {
            out.push('[');
            out.push_str(stereo);
            out.push(']');
        }
        None if atom.element.is_organic_subset() => out.push_str(atom.element.symbol()),
        None => {
            out.push('[');
            out.push_str(atom.element.symbol());
            out.push(']');
        }
    }
}

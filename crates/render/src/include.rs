//! Transitive inclusion gathering over entity graphs.

use std::collections::HashSet;

use prism_model::{Related, Resource};

/// Gather every distinct entity reachable from the root's loaded relations,
/// in first-visit depth-first order.
///
/// The root itself is never part of its own inclusion set. Each entity is
/// visited at most once, keyed on [`Resource::identity`], which is what
/// guarantees termination on cyclic graphs.
pub fn gather_included(root: &dyn Resource) -> Vec<&dyn Resource> {
    gather_union([root])
}

/// Gather the union of inclusions across several roots (collection render).
///
/// An entity related to more than one root appears exactly once; the roots
/// themselves are excluded, since primary data is never repeated inside
/// `included`.
pub fn gather_union<'a>(
    roots: impl IntoIterator<Item = &'a dyn Resource>,
) -> Vec<&'a dyn Resource> {
    let roots: Vec<&dyn Resource> = roots.into_iter().collect();
    let mut seen: HashSet<usize> = roots.iter().map(|r| r.identity()).collect();
    let mut out = Vec::new();
    for root in roots {
        walk(root, &mut seen, &mut out);
    }
    out
}

fn walk<'a>(entity: &'a dyn Resource, seen: &mut HashSet<usize>, out: &mut Vec<&'a dyn Resource>) {
    for relation in entity.relations() {
        match entity.related(&relation.name) {
            Related::None => {}
            Related::One(target) => visit(target, seen, out),
            Related::Many(targets) => {
                for target in targets {
                    visit(target, seen, out);
                }
            }
        }
    }
}

fn visit<'a>(entity: &'a dyn Resource, seen: &mut HashSet<usize>, out: &mut Vec<&'a dyn Resource>) {
    if !seen.insert(entity.identity()) {
        return;
    }
    out.push(entity);
    walk(entity, seen, out);
}

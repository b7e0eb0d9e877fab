use crate::errors::Result;
use crate::graph::crawler::{Crawler, Descend, Site};
use crate::types::{Container, Node};

/// Decides whether installing `candidate` below `ancestors` would create a
/// cycle.
///
/// `ancestors` is the chain of containers from the document root down to the
/// container that would hold `candidate`. Installing it is circular if any of
/// those containers is `candidate` itself or is reachable from inside it, at
/// any depth. Only identity counts: a structurally equal copy of an ancestor
/// is not a cycle.
///
/// The check crawls `candidate` independently of any outer crawl and stops
/// descending as soon as a match is found.
pub fn is_circular(candidate: &Node, ancestors: &[Container]) -> Result<bool> {
    if is_ancestor(candidate, ancestors) {
        return Ok(true);
    }

    let mut circular = false;
    Crawler::new().crawl(candidate, |site: &Site<'_>| {
        if circular {
            return Ok(Descend::Skip);
        }
        circular = is_ancestor(&site.value()?, ancestors);
        Ok(if circular { Descend::Skip } else { Descend::Into })
    })?;

    Ok(circular)
}

fn is_ancestor(node: &Node, ancestors: &[Container]) -> bool {
    ancestors.iter().any(|ancestor| ancestor.is(node))
}

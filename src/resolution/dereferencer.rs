use tracing::{debug, trace};

use crate::config::DerefOptions;
use crate::errors::Result;
use crate::graph::{is_circular, Crawler, Descend, Site};
use crate::types::{DerefStats, Node, PointerTable};

/// Where a pointer leads once followed through the table.
enum Chain {
    /// The pointer, or a pointer further along the chain, has no table
    /// entry.
    Missing,
    /// The pointer leads back to a pointer node already on the chain.
    Loop,
    /// The value to install.
    Target(Node),
}

/// Replaces reference pointer nodes in a document with their resolved
/// targets, refusing any replacement that would create a cycle.
///
/// The pointer table is only borrowed, never modified. Targets are installed
/// as shared handles, so two pointers to the same entry end up holding the
/// same node.
pub struct Dereferencer<'a> {
    table: &'a PointerTable,
    options: &'a DerefOptions,
}

impl<'a> Dereferencer<'a> {
    pub fn new(table: &'a PointerTable, options: &'a DerefOptions) -> Self {
        Self { table, options }
    }

    /// Dereferences `document` in place.
    ///
    /// Each pointer node with a table entry is either replaced by its target,
    /// after which the crawl continues into the target at the same location,
    /// or left exactly as it was if the replacement would be circular.
    ///
    /// Returns `DerefError::CircularReferences` if any replacement was
    /// refused. That error is reported only after the whole document has been
    /// crawled, and the document still holds every other replacement. Any
    /// other error aborts the crawl; replacements made up to that point are
    /// kept.
    pub fn dereference(&self, document: &Node) -> Result<DerefStats> {
        self.dereference_report(document)?.into_result()
    }

    /// Same pass as [`dereference`](Self::dereference), but refused
    /// replacements are returned in `DerefStats::circular_paths` instead of
    /// as an error.
    pub fn dereference_report(&self, document: &Node) -> Result<DerefStats> {
        if !self.options.enabled() {
            debug!("dereferencing disabled, returning document as-is");
            return Ok(DerefStats {
                skipped: true,
                ..DerefStats::default()
            });
        }

        let mut stats = DerefStats::default();
        Crawler::new().crawl(document, |site: &Site<'_>| self.visit(site, &mut stats))?;

        debug!(
            resolved = stats.resolved,
            circular = stats.circular_paths.len(),
            missing = stats.missing_paths.len(),
            "dereference complete"
        );
        Ok(stats)
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn visit(&self, site: &Site<'_>, stats: &mut DerefStats) -> Result<Descend> {
        let value = site.value()?;
        let Some(pointer) = value.ref_pointer() else {
            return Ok(Descend::Into);
        };

        let target = match self.follow(&value, &pointer) {
            Chain::Target(target) => target,
            Chain::Missing => {
                debug!("No resolved value for {} at {}", pointer, site.path());
                stats.missing_paths.push(site.path().to_string());
                return Ok(Descend::Into);
            }
            Chain::Loop => {
                debug!("Circular reference detected at {}", site.path());
                stats.circular_paths.push(site.path().to_string());
                return Ok(Descend::Skip);
            }
        };

        if is_circular(&target, site.ancestors())? {
            debug!("Circular reference detected at {}", site.path());
            stats.circular_paths.push(site.path().to_string());
            return Ok(Descend::Skip);
        }

        site.replace(target)?;
        stats.resolved += 1;
        trace!("Dereferenced {} at {}", pointer, site.path());

        // The crawler now descends into the installed target, resolving any
        // pointers it still contains along this path.
        Ok(Descend::Into)
    }

    /// Looks `pointer` up, following table entries that are themselves
    /// pointer nodes until a non-pointer value is reached. A chain that ends
    /// at an unknown pointer is missing as a whole.
    ///
    /// Every value on the chain is a table entry, so the chain is finite; a
    /// pointer node seen twice means the pointers only lead to each other.
    fn follow(&self, start: &Node, pointer: &str) -> Chain {
        let Some(first) = self.table.get(pointer) else {
            return Chain::Missing;
        };

        let mut seen = vec![start.clone()];
        let mut target = first.clone();
        while let Some(next_pointer) = target.ref_pointer() {
            if seen.iter().any(|node| node.same(&target)) {
                return Chain::Loop;
            }
            let Some(next) = self.table.get(&next_pointer) else {
                debug!("No resolved value for {} in pointer chain", next_pointer);
                return Chain::Missing;
            };
            seen.push(target);
            target = next.clone();
        }

        Chain::Target(target)
    }
}

/// One-shot convenience wrapper around [`Dereferencer::dereference`].
pub fn dereference(
    document: &Node,
    table: &PointerTable,
    options: &DerefOptions,
) -> Result<DerefStats> {
    Dereferencer::new(table, options).dereference(document)
}

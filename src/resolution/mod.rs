/// Reference dereferencing.
///
/// Rewrites reference pointer nodes in a parsed document into the values a
/// pointer table resolves them to, leaving circular ones in place.
mod dereferencer;

pub use dereferencer::{dereference, Dereferencer};

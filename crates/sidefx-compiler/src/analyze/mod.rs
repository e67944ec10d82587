//! Side-effect analysis: walker, classifier, aggregator and the discard check.

mod discard;
mod effect;
mod walk;


pub use discard::discard_value;
pub use effect::{has_effect, has_shallow_effect};
pub use walk::{StoppableVisitor, WalkControl, walk_postorder};

use crate::diagnostics::DiagnosticContext;
use crate::sema::Program;

/// Run the discard check on every expression statement and `for` step of the program.
pub fn check_discarded_values(program: &Program, ctx: &mut DiagnosticContext) {
    let sites = program.discarded_exprs();
    tracing::debug!(count = sites.len(), "checking discarded values");
    for (id, site) in sites {
        tracing::trace!(?id, ?site, "discard");
        discard_value(program, ctx, id);
    }
}

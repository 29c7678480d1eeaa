//! The view of an IR operation that the effect model needs.

use crate::instance::{SymbolRef, ValueId};

/// An IR operation as seen by effect analysis.
///
/// The model never inspects concrete operation types. It identifies an
/// operation kind by [`Operation::name`], resolves value selectors through
/// operands and results, and recurses through
/// [`Operation::nested_operations`] for operations with recursive effects.
pub trait Operation {
    /// Fully qualified operation name, e.g. `mem.load`.
    fn name(&self) -> &str;

    fn operands(&self) -> &[ValueId];

    fn results(&self) -> &[ValueId];

    /// The global symbol this operation refers to, if any.
    fn symbol(&self) -> Option<&SymbolRef> {
        None
    }

    /// Operations directly nested inside this one, in program order.
    ///
    /// Nesting is strict containment, so repeated descent always terminates
    /// on well-formed IR.
    fn nested_operations(&self) -> Vec<&dyn Operation> {
        Vec::new()
    }
}

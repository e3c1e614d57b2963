//! Host-facing traits for interactive form presentation.

use std::rc::Rc;

use crate::flow::{Command, Value};

/// Interactive UI component backing a form step.
pub trait FormComponent {
    fn name(&self) -> &str;

    /// Presents the component with `model` as its working input. `done` must
    /// be invoked exactly once with the user's command; it may fire before
    /// this call returns or later from a UI event.
    fn start(&self, model: Value, done: Box<dyn FnOnce(Command)>);

    /// Hint that this component opens its multi-step run. Semantic only; the
    /// host may use it to hide a "previous" affordance.
    fn set_start(&self) {}

    /// Hint that this component closes its multi-step run.
    fn set_end(&self) {}
}

/// Host surface that makes components visible while they await input.
pub trait Displayer {
    fn show(&self, component: &dyn FormComponent);
    fn hide(&self, component: &dyn FormComponent);
}

/// Resolves a form step's entity type name to its interactive component.
/// Absence is fatal at compile time.
pub trait FormStepResolver {
    fn resolve(&self, entity_type: &str) -> Option<Rc<dyn FormComponent>>;
}

//! Interactive step contract for flows that wait on the outside world.

/// One unit of work that completes through a callback rather than a return
/// value, so it can suspend awaiting an external event (typically a user
/// submitting a displayed form).
pub trait Step<I, O> {
    /// Human-readable name, used for logging and diagnostics.
    fn name(&self) -> String;

    /// Runs the step. `done` must be invoked exactly once, either before this
    /// call returns or later from the event that completes the step.
    fn execute(&self, input: I, done: Box<dyn FnOnce(O)>);
}

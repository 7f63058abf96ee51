//! Operation Trait: the single contract for every pipeline step
use crate::datum::Datum;
use crate::error::Rejection;

/// A registered transformation step, keyed by the type it consumes.
///
/// Implementations must:
/// - declare one fixed `input_type`;
/// - assume the datum passed to `execute` is of that type (the engine checks
///   before dispatching);
/// - return a fresh datum on success, or reject with the input handed back;
/// - leave `OperationError::operation` blank, the engine attributes it.
pub trait Operation: Send + Sync {
    /// Type identifier consumed by this operation (ex: "type/uri")
    fn input_type(&self) -> &'static str;

    /// Name used in traces and error attribution
    fn name(&self) -> &'static str;

    /// Runs the step. Takes ownership of the input.
    fn execute(&self, input: Datum) -> Result<Datum, Rejection>;
}

/// Operation backed by a closure. Handy for one-off steps and tests.
pub struct FnOperation<F> {
    name: &'static str,
    input_type: &'static str,
    f: F,
}

impl<F> Operation for FnOperation<F>
where
    F: Fn(Datum) -> Result<Datum, Rejection> + Send + Sync,
{
    fn input_type(&self) -> &'static str {
        self.input_type
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        (self.f)(input)
    }
}

pub fn from_fn<F>(name: &'static str, input_type: &'static str, f: F) -> FnOperation<F>
where
    F: Fn(Datum) -> Result<Datum, Rejection> + Send + Sync,
{
    FnOperation { name, input_type, f }
}

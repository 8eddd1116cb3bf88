use crate::errors::{PaginateError, Result};
use crate::state::Reactive;

pub(crate) type CountFn<P, N> = Box<dyn Fn(&P) -> anyhow::Result<N> + Send + Sync>;

/// Whether a controller tracks the total item count.
///
/// [`NoTotal`] and [`WithTotal`] select between the two controller shapes; only the
/// latter exposes `total()`.
pub trait TotalMode<P>: Send + Sync {
    type Measured: Send;

    fn measure(&self, payload: &P) -> Result<Self::Measured>;

    fn commit(&self, measured: Self::Measured);

    fn current(&self) -> Option<u64>;
}

/// The controller does not track a total item count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTotal;

impl<P> TotalMode<P> for NoTotal {
    type Measured = ();

    fn measure(&self, _payload: &P) -> Result<()> {
        Ok(())
    }

    fn commit(&self, _measured: ()) {}

    fn current(&self) -> Option<u64> {
        None
    }
}

/// The controller extracts a total item count from every response.
pub struct WithTotal<P> {
    transformer: CountFn<P, u64>,
    total: Reactive<u64>,
}

impl<P> WithTotal<P> {
    pub(crate) fn new(transformer: CountFn<P, u64>) -> Self {
        Self {
            transformer,
            total: Reactive::new(0),
        }
    }

    pub(crate) fn cell(&self) -> &Reactive<u64> {
        &self.total
    }
}

impl<P> TotalMode<P> for WithTotal<P> {
    type Measured = u64;

    fn measure(&self, payload: &P) -> Result<u64> {
        (self.transformer)(payload).map_err(|e| PaginateError::transform("total", e))
    }

    fn commit(&self, measured: u64) {
        self.total.set(measured);
    }

    fn current(&self) -> Option<u64> {
        Some(self.total.get())
    }
}

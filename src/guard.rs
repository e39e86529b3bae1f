//! Debug-only guard against nested entry into a map.
//!
//! Map methods call into user code only through `K: Eq` and `K: Hash`.
//! If such an impl reaches back into the same map (through a raw pointer
//! or interior mutability) while a chain is half-linked, debug builds
//! panic and name both operations. Release builds carry no state.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct OpGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl OpGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Mark `op` as running until the returned token drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Entered<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("map re-entered by `{op}` while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            return Entered {
                owner: self,
                _lt: PhantomData,
            };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Entered { _lt: PhantomData };
        }
    }
}

pub(crate) struct Entered<'a> {
    #[cfg(debug_assertions)]
    owner: &'a OpGuard,
    _lt: PhantomData<&'a ()>,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}

//! Generic RAII scope-guard discipline (§5 Concurrency & Resource Model).
//!
//! Every piece of "current X" state the checker threads through recursive
//! descent — the current environment, the current function's return type,
//! loop/switch/label counters, the narrowing stack — follows the same
//! shape: save the old value, install the new one, and restore the old one
//! on the way back out, including when the visit unwinds through an early
//! return or a `?`. [`Scoped`] is that shape, written once.

/// Holds the previous value of a `&mut T` for the lifetime of the guard and
/// restores it on drop. Construct with [`Scoped::enter`]; the field is
/// mutated immediately, the restore happens automatically.
pub struct Scoped<'a, T> {
    slot: &'a mut T,
    previous: Option<T>,
}

impl<'a, T> Scoped<'a, T> {
    /// Replace `*slot` with `new`, remembering the old value to restore on
    /// drop.
    pub fn enter(slot: &'a mut T, new: T) -> Self {
        let previous = std::mem::replace(slot, new);
        Scoped { slot, previous: Some(previous) }
    }
}

impl<T> Drop for Scoped<'_, T> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.slot = previous;
        }
    }
}

impl<T> std::ops::Deref for Scoped<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.slot
    }
}

impl<T> std::ops::DerefMut for Scoped<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_previous_value_on_drop() {
        let mut depth = 0usize;
        {
            let mut guard = Scoped::enter(&mut depth, 1);
            assert_eq!(*guard, 1);
            *guard += 1;
            assert_eq!(*guard, 2);
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn nested_guards_restore_in_order() {
        let mut depth = 0usize;
        {
            let _outer = Scoped::enter(&mut depth, 1);
            {
                let _inner = Scoped::enter(&mut depth, 2);
                assert_eq!(depth, 2);
            }
            assert_eq!(depth, 1);
        }
        assert_eq!(depth, 0);
    }
}

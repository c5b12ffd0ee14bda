//! Reversible operations applied to an environment in strict LIFO order.
//!
//! Both the render context and the input context are an [EffectStack] over
//! their own state. Each effect can look at the effects enclosing it (most
//! recent first), which lets a clip find the clip above it without any side
//! channel.

use std::iter::{FusedIterator, Rev};
use std::ops::{Deref, DerefMut};
use std::slice::Iter;

/// A reversible operation on an environment `E`.
///
/// `remove` must exactly undo `apply`. Both receive the effects that were
/// active when this one was pushed, most recent first.
pub trait Effect<E>: Sized {
    /// Apply the effect.
    fn apply(&mut self, env: &mut E, enclosing: Effects<'_, Self>);

    /// Undo the effect.
    fn remove(&mut self, env: &mut E, enclosing: Effects<'_, Self>);
}

/// The active effects of a stack, most recently pushed first.
#[derive(Debug)]
pub struct Effects<'a, F>(Rev<Iter<'a, F>>);

impl<'a, F> Effects<'a, F> {
    fn new(effects: &'a [F]) -> Self {
        Self(effects.iter().rev())
    }
}

impl<F> Clone for Effects<'_, F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, F> Iterator for Effects<'a, F> {
    type Item = &'a F;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<F> ExactSizeIterator for Effects<'_, F> {}

impl<F> FusedIterator for Effects<'_, F> {}

/// An environment plus the effects currently applied to it.
#[derive(Debug)]
pub struct EffectStack<F, E> {
    env: E,
    effects: Vec<F>,
}

impl<F: Effect<E>, E> EffectStack<F, E> {
    /// Create an empty stack over `env`.
    pub fn new(env: E) -> Self {
        Self {
            env,
            effects: Vec::new(),
        }
    }

    /// Apply `effect` and record it.
    pub fn push(&mut self, mut effect: F) {
        effect.apply(&mut self.env, Effects::new(&self.effects));
        self.effects.push(effect);
    }

    /// Remove the most recent effect and return it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty. Unbalanced pops are a caller bug.
    pub fn pop(&mut self) -> F {
        match self.try_pop() {
            Some(effect) => effect,
            None => panic!("popped an empty effect stack"),
        }
    }

    /// Remove the most recent effect, if any.
    pub fn try_pop(&mut self) -> Option<F> {
        let mut effect = self.effects.pop()?;
        effect.remove(&mut self.env, Effects::new(&self.effects));
        Some(effect)
    }

    /// Push `effect` and pop it again when the returned guard is dropped.
    pub fn with(&mut self, effect: F) -> EffectGuard<'_, Self> {
        EffectGuard::new(self, effect)
    }
}

impl<F, E> EffectStack<F, E> {
    /// Active effects, most recent first.
    pub fn effects(&self) -> Effects<'_, F> {
        Effects::new(&self.effects)
    }

    /// Number of active effects.
    pub fn depth(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effect is active.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The environment, mutably.
    ///
    /// Changes made here are not undone by popping effects.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }
}

/// Anything that owns an effect stack and can hand out guards for it.
pub trait EffectHost {
    /// The effect type pushed on this host.
    type Effect;

    /// Apply and record an effect.
    fn push_effect(&mut self, effect: Self::Effect);

    /// Undo and forget the most recent effect.
    fn pop_effect(&mut self) -> Self::Effect;
}

impl<F: Effect<E>, E> EffectHost for EffectStack<F, E> {
    type Effect = F;

    fn push_effect(&mut self, effect: F) {
        self.push(effect);
    }

    fn pop_effect(&mut self) -> F {
        self.pop()
    }
}

/// Scoped handle to a pushed effect. Dropping it pops the effect, on every
/// exit path including unwinding.
///
/// The guard dereferences to its host, so nested operations chain:
///
/// ```ignore
/// let mut moved = ctx.translate(offset);
/// let mut clipped = moved.clip(bounds);
/// child.render(&mut clipped);
/// ```
pub struct EffectGuard<'g, H: EffectHost + ?Sized> {
    host: &'g mut H,
}

impl<'g, H: EffectHost + ?Sized> EffectGuard<'g, H> {
    /// Push `effect` on `host`.
    pub fn new(host: &'g mut H, effect: H::Effect) -> Self {
        host.push_effect(effect);
        Self { host }
    }
}

impl<H: EffectHost + ?Sized> Deref for EffectGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: EffectHost + ?Sized> DerefMut for EffectGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: EffectHost + ?Sized> Drop for EffectGuard<'_, H> {
    fn drop(&mut self) {
        self.host.pop_effect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Log(u32);

    impl Effect<Vec<String>> for Log {
        fn apply(&mut self, env: &mut Vec<String>, enclosing: Effects<'_, Self>) {
            env.push(format!("apply {} over {}", self.0, enclosing.len()));
        }

        fn remove(&mut self, env: &mut Vec<String>, enclosing: Effects<'_, Self>) {
            env.push(format!("remove {} over {}", self.0, enclosing.len()));
        }
    }

    #[test]
    fn removes_in_reverse_order() {
        let mut stack = EffectStack::new(Vec::new());
        for i in 1..=3 {
            stack.push(Log(i));
        }
        assert_eq!(
            stack.effects().map(|e| e.0).collect::<Vec<_>>(),
            vec![3, 2, 1]
        );
        for _ in 0..3 {
            stack.pop();
        }
        assert_eq!(
            stack.env(),
            &vec![
                "apply 1 over 0",
                "apply 2 over 1",
                "apply 3 over 2",
                "remove 3 over 2",
                "remove 2 over 1",
                "remove 1 over 0",
            ]
        );
    }

    #[test]
    #[should_panic(expected = "popped an empty effect stack")]
    fn popping_past_empty_panics() {
        let mut stack = EffectStack::new(Vec::new());
        stack.push(Log(1));
        stack.pop();
        stack.pop();
    }

    #[test]
    fn try_pop_on_empty_is_none() {
        let mut stack: EffectStack<Log, Vec<String>> = EffectStack::new(Vec::new());
        assert!(stack.try_pop().is_none());
    }

    #[test]
    fn guards_pop_on_drop() {
        let mut stack = EffectStack::new(Vec::new());
        {
            let mut outer = stack.with(Log(1));
            {
                let inner = outer.with(Log(2));
                assert_eq!(inner.depth(), 2);
            }
            assert_eq!(outer.depth(), 1);
        }
        assert!(stack.is_empty());
        assert_eq!(stack.env().last().map(String::as_str), Some("remove 1 over 0"));
    }

    #[test]
    fn guards_pop_during_unwind() {
        let mut stack = EffectStack::new(Vec::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = stack.with(Log(7));
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert!(stack.is_empty());
    }
}

//! Declaration flags for script functions.

use bitflags::bitflags;

bitflags! {
    /// Properties of a function declaration relevant to call lowering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u16 {
        /// `function*`: calls construct a generator handle.
        const GENERATOR = 1 << 0;
        /// `async function`.
        const ASYNC = 1 << 1;
        /// Instance method of a class.
        const METHOD = 1 << 2;
        /// Static method of a class.
        const STATIC = 1 << 3;
        /// Class constructor.
        const CONSTRUCTOR = 1 << 4;
        /// Arrow function.
        const ARROW = 1 << 5;
    }
}

impl FunctionFlags {
    #[inline]
    pub fn is_generator(&self) -> bool {
        self.contains(FunctionFlags::GENERATOR) && !self.contains(FunctionFlags::ASYNC)
    }

    #[inline]
    pub fn is_async_generator(&self) -> bool {
        self.contains(FunctionFlags::GENERATOR | FunctionFlags::ASYNC)
    }

    /// Whether `this` is available inside the function body.
    #[inline]
    pub fn has_this(&self) -> bool {
        self.intersects(FunctionFlags::METHOD | FunctionFlags::CONSTRUCTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_kinds_are_exclusive() {
        let sync = FunctionFlags::GENERATOR;
        let async_gen = FunctionFlags::GENERATOR | FunctionFlags::ASYNC;
        assert!(sync.is_generator());
        assert!(!sync.is_async_generator());
        assert!(async_gen.is_async_generator());
        assert!(!async_gen.is_generator());
        assert!(!FunctionFlags::ASYNC.is_generator());
    }

    #[test]
    fn this_only_in_methods_and_constructors() {
        assert!(FunctionFlags::METHOD.has_this());
        assert!(FunctionFlags::CONSTRUCTOR.has_this());
        assert!(!FunctionFlags::STATIC.has_this());
        assert!(!FunctionFlags::empty().has_this());
    }
}

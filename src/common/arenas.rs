// Copyright (c) 2016-2021 Fabian Schuiki

//! An arena allocation scheme. Objects allocated during one elaboration
//! session live exactly as long as the session; nothing is ever freed
//! individually.

pub use typed_arena::Arena as TypedArena;

/// Allocates objects of type `T`.
pub trait Alloc<'a, 't, T: 't> {
    /// Allocate an object of type `T` and return a reference to it that lives
    /// as long as the arena itself.
    fn alloc(&'a self, value: T) -> &'t mut T;
}

impl<'t, T: 't> Alloc<'t, 't, T> for TypedArena<T> {
    fn alloc(&'t self, value: T) -> &'t mut T {
        self.alloc(value)
    }
}

/// Generate a collection of arenas for different types.
#[macro_export]
macro_rules! make_arenas {
    ($(#[$arena_attr:meta])* pub struct $arena_name:ident<$lt:tt> { $($name:ident: $type:ty,)* }) => {
        $(#[$arena_attr])*
        pub struct $arena_name<$lt> {
            $(pub $name: $crate::arenas::TypedArena<$type>,)*
        }

        impl<$lt> Default for $arena_name<$lt> {
            fn default() -> $arena_name<$lt> {
                $arena_name {
                    $($name: Default::default(),)*
                }
            }
        }

        $(
            impl<$lt> $crate::arenas::Alloc<$lt, $lt, $type> for $arena_name<$lt> {
                fn alloc(&$lt self, value: $type) -> &$lt mut $type {
                    self.$name.alloc(value)
                }
            }
        )*
    };
}

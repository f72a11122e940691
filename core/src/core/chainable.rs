// chaintools/src/core/chainable.rs

//! The `Chainable` trait and the `impl_chain_operators!` macro that derives the
//! `>>` (append) and `<<` (invoke) spellings from it for any type.

use crate::core::value::Value;

/// A type that grows by appending links and can be invoked with a single item.
pub trait Chainable {
  /// What `>>` appends.
  type Link;
  /// What `<<` returns.
  type Output;

  fn append(&mut self, link: Self::Link) -> &mut Self;

  fn invoke(&self, item: Value) -> Self::Output;
}

/// Implements `Shr<Link>`, `ShrAssign<Link>` and, for `&Type`, `Shl<T>` in terms of
/// [`Chainable`](crate::Chainable).
///
/// Generic parameters (with their bounds) go between the brackets:
///
/// ```ignore
/// impl_chain_operators!([] Tally => i64);
/// impl_chain_operators!([Err: MyBound] Pipeline<Err> => Stage<Err>);
/// ```
///
/// `target >> link` consumes and returns the target, `&target << item` wraps `item`
/// in a [`Value`](crate::Value) and invokes the target with it.
#[macro_export]
macro_rules! impl_chain_operators {
  ([$($generics:tt)*] $target:ty => $link:ty) => {
    impl<$($generics)*> ::std::ops::Shr<$link> for $target {
      type Output = $target;

      fn shr(mut self, link: $link) -> Self::Output {
        $crate::Chainable::append(&mut self, link);
        self
      }
    }

    impl<$($generics)*> ::std::ops::ShrAssign<$link> for $target {
      fn shr_assign(&mut self, link: $link) {
        $crate::Chainable::append(self, link);
      }
    }

    impl<'chain, ChainItem, $($generics)*> ::std::ops::Shl<ChainItem> for &'chain $target
    where
      ChainItem: ::std::any::Any + ::std::marker::Send + ::std::marker::Sync,
    {
      type Output = <$target as $crate::Chainable>::Output;

      fn shl(self, item: ChainItem) -> Self::Output {
        $crate::Chainable::invoke(self, $crate::Value::new(item))
      }
    }
  };
}

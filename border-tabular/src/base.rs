//! Core traits.
mod policy;
pub use policy::Policy;

use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::{Debug, Display, Write},
    hash::Hash,
};

/// A state of an environment, used as a key of the action-value table.
///
/// The agent never looks inside a state. It only hashes and compares it,
/// serializes it into snapshots and renders it with [`State::flat_string`]
/// for the CSV export.
pub trait State: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned {
    /// Concatenation of the string forms of the elements of the state,
    /// without separator.
    ///
    /// `("a", "b")` is rendered as `ab` and `(1, 0, 2)` as `102`.
    fn flat_string(&self) -> String;
}

/// An action of an environment.
///
/// Implemented for every type satisfying the bounds. [`Display`] gives the
/// `action` column of the CSV export.
pub trait Action: Clone + Eq + Hash + Debug + Display + Serialize + DeserializeOwned {}

impl<T> Action for T where T: Clone + Eq + Hash + Debug + Display + Serialize + DeserializeOwned {}

macro_rules! impl_state_for_scalar {
    ($($t:ty),+) => {
        $(
            impl State for $t {
                fn flat_string(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_state_for_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, String
);

fn concat<'a, T: Display + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
    let mut s = String::new();
    for x in items {
        let _ = write!(s, "{}", x);
    }
    s
}

impl<T> State for Vec<T>
where
    T: Display + Clone + Eq + Hash + Debug + Serialize + DeserializeOwned,
{
    fn flat_string(&self) -> String {
        concat(self.iter())
    }
}

impl<T, const N: usize> State for [T; N]
where
    T: Display + Clone + Eq + Hash + Debug,
    [T; N]: Serialize + DeserializeOwned,
{
    fn flat_string(&self) -> String {
        concat(self.iter())
    }
}

macro_rules! impl_state_for_tuple {
    ($($t:ident: $i:tt),+) => {
        impl<$($t),+> State for ($($t,)+)
        where
            $($t: Display + Clone + Eq + Hash + Debug + Serialize + DeserializeOwned,)+
        {
            fn flat_string(&self) -> String {
                let mut s = String::new();
                $(let _ = write!(s, "{}", self.$i);)+
                s
            }
        }
    };
}

impl_state_for_tuple!(T0: 0);
impl_state_for_tuple!(T0: 0, T1: 1);
impl_state_for_tuple!(T0: 0, T1: 1, T2: 2);
impl_state_for_tuple!(T0: 0, T1: 1, T2: 2, T3: 3);
impl_state_for_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_state_for_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);

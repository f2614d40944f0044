//! # Parse Values
//!
//! Parsers exchange results as dynamically tagged [`Value`]s whose structure
//! always conforms to the producing parser's [`Shape`]. The [`Data`] trait is
//! the typed boundary: it names the shape of a Rust type and converts between
//! that type and its value representation.
//!
//! ## Implementations
//!
//! - Scalars and strings: `char`, `String`, `&'static str`, `bool`, all
//!   integer and float primitives and `()` are single atoms.
//! - `Vec<T>`, `Option<T>` and `Box<T>` are single atoms of their own type.
//! - Rust tuples of two to six elements have flattened tuple shapes, so
//!   `(char, (String, i64))` and `(char, String, i64)` share one shape.
//! - [`Union2`], [`Union3`] and [`Union4`] have union shapes.
//! - Anything else opts in through [`impl_data!`](crate::impl_data).

use std::any::Any;

use crate::shape::{Injection, Shape};

#[derive(Debug)]
pub enum Value {
    Single(Box<dyn Any>),
    Tuple(Vec<Value>),
    Union { variant: usize, value: Box<Value> },
}

impl Value {
    pub fn single<T: 'static>(value: T) -> Self {
        Value::Single(Box::new(value))
    }

    /// Extract a single value of type `T`.
    pub fn downcast<T: 'static>(self) -> Option<T> {
        match self {
            Value::Single(boxed) => boxed.downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }

    /// Flattening concatenation, the value-level counterpart of
    /// [`Shape::product`].
    pub fn concat(self, rhs: Value) -> Value {
        let mut members = self.into_members();
        members.extend(rhs.into_members());
        Value::Tuple(members)
    }

    pub fn into_members(self) -> Vec<Value> {
        match self {
            Value::Tuple(members) => members,
            other => vec![other],
        }
    }

    pub fn members(&self) -> &[Value] {
        match self {
            Value::Tuple(members) => members,
            _ => std::slice::from_ref(self),
        }
    }

    /// Check that this value is structurally a value of `shape`.
    pub fn conforms(&self, shape: &Shape) -> bool {
        match (self, shape) {
            (Value::Single(boxed), Shape::Single(atom)) => boxed.as_ref().type_id() == atom.id(),
            (Value::Tuple(values), Shape::Tuple(members)) => {
                values.len() == members.len()
                    && values.iter().zip(members).all(|(v, s)| v.conforms(s))
            }
            (Value::Union { variant, value }, Shape::Union(variants)) => variants
                .get(*variant)
                .is_some_and(|shape| value.conforms(shape)),
            _ => false,
        }
    }

    /// Narrow a value of the union shape `whole` to the variants of `member`.
    ///
    /// Gives the value back when it belongs to a variant outside `member`.
    pub fn project(self, whole: &Shape, member: &Shape) -> Result<Value, Value> {
        match self {
            Value::Union { variant, value } if whole.is_union() => {
                let Some(shape) = whole.variants().get(variant) else {
                    return Err(Value::Union { variant, value });
                };
                match member.variant_index(shape) {
                    Some(index) if member.is_union() => Ok(Value::Union {
                        variant: index,
                        value,
                    }),
                    Some(_) => Ok(*value),
                    None => Err(Value::Union { variant, value }),
                }
            }
            other if whole == member => Ok(other),
            other => Err(other),
        }
    }

    /// Widen a value of shape `member` to the union shape `whole`.
    pub fn inject(self, member: &Shape, whole: &Shape) -> Value {
        match Injection::between(member, whole) {
            Some(injection) => injection.apply(self),
            None => self,
        }
    }
}

/// Rust types that can be produced and consumed by parsers.
pub trait Data: Sized + 'static {
    fn shape() -> Shape;

    fn into_value(self) -> Value;

    /// Rebuild from a value. `None` means the value does not conform to
    /// [`Data::shape`].
    fn from_value(value: Value) -> Option<Self>;
}

/// Implement [`Data`] for types that are single atoms.
///
/// ```ignore
/// #[derive(Debug)]
/// struct Ident(String);
///
/// ruparsec::impl_data!(Ident);
/// ```
#[macro_export]
macro_rules! impl_data {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::value::Data for $ty {
                fn shape() -> $crate::shape::Shape {
                    $crate::shape::Shape::of::<$ty>()
                }

                fn into_value(self) -> $crate::value::Value {
                    $crate::value::Value::single(self)
                }

                fn from_value(value: $crate::value::Value) -> Option<Self> {
                    value.downcast::<$ty>()
                }
            }
        )+
    };
}

impl_data!(
    (),
    bool,
    char,
    String,
    &'static str,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

macro_rules! impl_generic_atom {
    ($($outer:ident),+) => {
        $(
            impl<T: 'static> Data for $outer<T> {
                fn shape() -> Shape {
                    Shape::of::<$outer<T>>()
                }

                fn into_value(self) -> Value {
                    Value::single(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    value.downcast::<$outer<T>>()
                }
            }
        )+
    };
}

impl_generic_atom!(Vec, Option, Box);

/// Pull the members making up one tuple element of type `T`.
fn take_element<T: Data>(members: &mut impl Iterator<Item = Value>) -> Option<T> {
    let arity = T::shape().arity();
    if arity == 1 {
        return T::from_value(members.next()?);
    }

    let part: Vec<Value> = members.by_ref().take(arity).collect();
    if part.len() != arity {
        return None;
    }
    T::from_value(Value::Tuple(part))
}

macro_rules! impl_tuple_data {
    ($($param:ident $var:ident),+) => {
        impl<$($param: Data),+> Data for ($($param,)+) {
            fn shape() -> Shape {
                Shape::tuple(vec![$($param::shape()),+])
            }

            fn into_value(self) -> Value {
                let ($($var,)+) = self;
                let mut members = Vec::new();
                $(members.extend($var.into_value().into_members());)+
                Value::Tuple(members)
            }

            fn from_value(value: Value) -> Option<Self> {
                let mut members = value.into_members().into_iter();
                $(let $var = take_element::<$param>(&mut members)?;)+
                if members.next().is_some() {
                    return None;
                }
                Some(($($var,)+))
            }
        }
    };
}

impl_tuple_data!(A a, B b);
impl_tuple_data!(A a, B b, C c);
impl_tuple_data!(A a, B b, C c, D d);
impl_tuple_data!(A a, B b, C c, D d, E e);
impl_tuple_data!(A a, B b, C c, D d, E e, F f);

macro_rules! union_data {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($param:ident)),+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name<$($param),+> {
            $($variant($param)),+
        }

        impl<$($param: Data),+> Data for $name<$($param),+> {
            fn shape() -> Shape {
                Shape::union(vec![$($param::shape()),+])
            }

            fn into_value(self) -> Value {
                let whole = Self::shape();
                match self {
                    $($name::$variant(inner) => inner.into_value().inject(&$param::shape(), &whole),)+
                }
            }

            fn from_value(value: Value) -> Option<Self> {
                let whole = Self::shape();
                let rest = value;
                $(
                    let rest = match rest.project(&whole, &$param::shape()) {
                        Ok(value) => return $param::from_value(value).map($name::$variant),
                        Err(rest) => rest,
                    };
                )+
                drop(rest);
                None
            }
        }
    };
}

union_data!(
    /// Result of an alternative between two distinct shapes.
    Union2 { First(A), Second(B) }
);
union_data!(
    /// Result of an alternative between three distinct shapes.
    Union3 { First(A), Second(B), Third(C) }
);
union_data!(
    /// Result of an alternative between four distinct shapes.
    Union4 { First(A), Second(B), Third(C), Fourth(D) }
);

//! # Result Shapes
//!
//! Every parser carries a [`Shape`] describing the structure of the value it
//! produces. Shapes are computed once, when combinators are composed, and are
//! never inspected again during parsing except through precomputed
//! [`Injection`]s.
//!
//! ## The Algebra
//!
//! Two operations derive the shape of a composite parser from its parts:
//!
//! - [`Shape::product`] for sequencing (`a + b`): the members of both operands
//!   are concatenated into one flat tuple. A non-tuple operand counts as a
//!   one-element tuple, so tuples never nest.
//! - [`Shape::addition`] for alternation (`a | b`): the variants of both
//!   operands are concatenated, left first, dropping any variant already
//!   present. A sum of identical shapes collapses to that shape instead of
//!   becoming a one-variant union.
//!
//! ```text
//! char + String             = (char, String)
//! (char, String) + i64      = (char, String, i64)
//! char | String             = char | String
//! (char | String) | char    = char | String
//! i64 | i64                 = i64
//! (char | i64) + String     = (char | i64, String)
//! ```
//!
//! Both operations are associative, which is what lets deeply nested
//! right-recursive grammars derive the same shapes as their left-nested
//! spellings.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// Identity of a Rust type used as a leaf of a shape.
#[derive(Clone, Copy)]
pub struct Atom {
    id: TypeId,
    name: &'static str,
}

impl Atom {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped (`Vec<char>` rather than
    /// `alloc::vec::Vec<char>`).
    pub fn pretty(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut path = String::new();
        for c in self.name.chars() {
            if c.is_alphanumeric() || c == '_' || c == ':' {
                path.push(c);
            } else {
                out.push_str(last_segment(&path));
                path.clear();
                out.push(c);
            }
        }
        out.push_str(last_segment(&path));
        out
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

/// Structural type of a parser result.
///
/// The constructors [`Shape::tuple`] and [`Shape::union`] normalize their
/// input, so a shape built through them (or through [`Shape::product`] and
/// [`Shape::addition`]) upholds these invariants:
///
/// * a `Tuple` has at least two members, none of which is a `Tuple`
/// * a `Union` has at least two pairwise distinct variants, none of which is
///   a `Union`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Single(Atom),
    Tuple(Vec<Shape>),
    Union(Vec<Shape>),
}

impl Shape {
    pub fn of<T: 'static>() -> Self {
        Shape::Single(Atom::of::<T>())
    }

    /// Build a flat tuple. Nested tuples are spliced into the result, a single
    /// member is returned as is and an empty list yields the unit shape.
    pub fn tuple(members: impl IntoIterator<Item = Shape>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Shape::Tuple(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => Shape::of::<()>(),
            1 => flat.remove(0),
            _ => Shape::Tuple(flat),
        }
    }

    /// Build a flat, deduplicated union preserving first-occurrence order.
    /// A single distinct variant is returned as is and an empty list yields
    /// the unit shape.
    pub fn union(variants: impl IntoIterator<Item = Shape>) -> Self {
        let mut distinct: Vec<Shape> = Vec::new();
        for variant in variants {
            let flattened = match variant {
                Shape::Union(inner) => inner,
                other => vec![other],
            };
            for shape in flattened {
                if !distinct.contains(&shape) {
                    distinct.push(shape);
                }
            }
        }

        match distinct.len() {
            0 => Shape::of::<()>(),
            1 => distinct.remove(0),
            _ => Shape::Union(distinct),
        }
    }

    /// Shape of `self` followed by `rhs`.
    pub fn product(&self, rhs: &Shape) -> Shape {
        Shape::tuple(self.members().iter().chain(rhs.members()).cloned())
    }

    /// Shape of `self` or else `rhs`.
    pub fn addition(&self, rhs: &Shape) -> Shape {
        Shape::union(self.variants().iter().chain(rhs.variants()).cloned())
    }

    /// Like [`Shape::addition`], additionally returning where each operand's
    /// variants land inside the sum.
    pub fn sum(&self, rhs: &Shape) -> (Shape, Injection, Injection) {
        let mut variants: Vec<Shape> = Vec::new();
        let mut place = |shape: &Shape| match variants.iter().position(|v| v == shape) {
            Some(index) => index,
            None => {
                variants.push(shape.clone());
                variants.len() - 1
            }
        };

        let left: Vec<usize> = self.variants().iter().map(&mut place).collect();
        let right: Vec<usize> = rhs.variants().iter().map(&mut place).collect();

        if variants.len() == 1 {
            let shape = variants.remove(0);
            return (shape, Injection::Identity, Injection::Identity);
        }

        (
            Shape::Union(variants),
            Injection::Tag(left),
            Injection::Tag(right),
        )
    }

    /// Positional members: the elements of a tuple, or the shape itself.
    pub fn members(&self) -> &[Shape] {
        match self {
            Shape::Tuple(members) => members,
            _ => std::slice::from_ref(self),
        }
    }

    /// Alternatives: the variants of a union, or the shape itself.
    pub fn variants(&self) -> &[Shape] {
        match self {
            Shape::Union(variants) => variants,
            _ => std::slice::from_ref(self),
        }
    }

    /// Number of values a tuple of this shape destructures into.
    pub fn arity(&self) -> usize {
        self.members().len()
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Shape::Tuple(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Shape::Union(_))
    }

    pub fn variant_index(&self, variant: &Shape) -> Option<usize> {
        self.variants().iter().position(|v| v == variant)
    }

    pub fn pretty(&self) -> String {
        match self {
            Shape::Single(atom) => atom.pretty(),
            Shape::Tuple(members) => {
                let inner: Vec<String> = members.iter().map(Shape::pretty).collect();
                format!("({})", inner.join(", "))
            }
            Shape::Union(variants) => {
                let inner: Vec<String> = variants.iter().map(Shape::pretty).collect();
                inner.join(" | ")
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// Mapping from the variants of one shape into the variants of a wider union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Source and target shapes are the same; values pass through untouched.
    Identity,
    /// Source variant `i` becomes target variant `map[i]`.
    Tag(Vec<usize>),
}

impl Injection {
    /// Compute how values of shape `from` are carried as values of shape
    /// `into`. Returns `None` when some variant of `from` does not occur in
    /// `into`.
    pub fn between(from: &Shape, into: &Shape) -> Option<Injection> {
        if from == into {
            return Some(Injection::Identity);
        }
        if !into.is_union() {
            return None;
        }

        from.variants()
            .iter()
            .map(|variant| into.variant_index(variant))
            .collect::<Option<Vec<_>>>()
            .map(Injection::Tag)
    }

    /// Re-tag a value conforming to the source shape so it conforms to the
    /// target shape.
    pub fn apply(&self, value: Value) -> Value {
        match self {
            Injection::Identity => value,
            Injection::Tag(map) => match value {
                Value::Union { variant, value } => Value::Union {
                    variant: map[variant],
                    value,
                },
                other => Value::Union {
                    variant: map[0],
                    value: Box::new(other),
                },
            },
        }
    }
}

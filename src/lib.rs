//! An immutable, self-describing binary document format.
//!
//! Every value on the wire is a single record: a one-byte type-marker
//! carrying a [`SizeClass`] and a [`Kind`], an optional little-endian
//! length field, and a payload. Records nest: a [`Container`] holds an
//! ordered run of records, a [`Map`] keys them by integer, a [`Header`]
//! by NUL-terminated string, a [`Library`] holds only strings, and a
//! [`Compressed`] block stores one record Snappy-compressed. The
//! [`Recipe`] layer interprets a top-level Container's first Library as a
//! [`Glossary`] and navigates nested structure by integer step paths.
//!
//! ```
//! use ingredient_pack::{Container, Ingredient, Recipe};
//!
//! let mut c = Container::new();
//! c.children_mut().push(Ingredient::from("hello"));
//! c.children_mut().push(Ingredient::from(9000i32));
//!
//! let encoded = Ingredient::from(&c);
//! let recipe = Recipe::try_from(&encoded)?;
//! assert_eq!(recipe.ingredient(&[1])?.to_i32(), 9000);
//! # Ok::<(), ingredient_pack::Error>(())
//! ```

mod bytes;
mod compressed;
mod container;
mod error;
mod ingredient;
mod keyed;
mod marker;
mod recipe;
mod stream;

pub use bytes::Bytes;
pub use compressed::Compressed;
pub use container::{Container, Library};
pub use error::{Error, Result};
pub use ingredient::Ingredient;
pub use keyed::{Header, Keyed, Map, WireKey};
pub use marker::{type_marker, Kind, SizeClass};
pub use recipe::{Glossary, Recipe};
pub use stream::{read_ingredient, write_ingredient};

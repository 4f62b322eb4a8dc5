//! Recipes and glossaries: the semantic layer over raw records.
//!
//! A Recipe adopts a top-level Container and extracts its first Library as
//! a Glossary, the bidirectional mapping between map-key integers and the
//! names they stand for. Navigation walks a path of integer steps through
//! nested containers and maps, unwrapping compressed blocks transparently
//! along the way.

use std::collections::BTreeMap;
use std::convert::TryFrom;

use crate::compressed::Compressed;
use crate::container::{Container, Library};
use crate::error::{Error, Result};
use crate::ingredient::Ingredient;
use crate::keyed::Map;
use crate::marker::Kind;

/// Bidirectional name ↔ index mapping built from a Library.
///
/// Unknown names translate to index 0 and unknown indices to the empty
/// string; neither is an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glossary {
    names: Vec<String>,
    index: BTreeMap<String, u32>,
}

impl Glossary {
    /// The names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The index registered for `name`, or 0 when unknown.
    pub fn key_for(&self, name: &str) -> u32 {
        self.index.get(name).copied().unwrap_or(0)
    }

    /// The name registered at `key`, or the empty string when unknown.
    pub fn name_for(&self, key: u32) -> &str {
        self.names
            .get(key as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Translate names to map keys, preserving order.
    pub fn keys_for<S: AsRef<str>>(&self, names: &[S]) -> Vec<u32> {
        names.iter().map(|n| self.key_for(n.as_ref())).collect()
    }

    /// Translate map keys to names, preserving order.
    pub fn names_for(&self, keys: &[u32]) -> Vec<String> {
        keys.iter().map(|&k| self.name_for(k).to_string()).collect()
    }
}

impl From<&Library> for Glossary {
    fn from(library: &Library) -> Self {
        let mut names = Vec::with_capacity(library.len());
        let mut index = BTreeMap::new();
        for (i, name) in library.entries().iter().enumerate() {
            names.push(name.clone());
            index.insert(name.clone(), i as u32);
        }
        Glossary { names, index }
    }
}

/// A top-level Container plus the Glossary extracted from its first
/// Library child.
#[derive(Clone, Debug, Default)]
pub struct Recipe {
    container: Container,
    glossary: Glossary,
}

impl Recipe {
    /// The top-level children.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The name ↔ index glossary, empty if the Recipe has no Library.
    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    /// Navigate a step path and return the record it lands on.
    ///
    /// Containers index by step, maps look the step up as a key, and
    /// compressed blocks unwrap without consuming a step. Out-of-range
    /// indexes, missing keys, and steps into non-navigable kinds all yield
    /// the Null sentinel; an empty path yields the whole root Container.
    /// Structurally invalid records on the path are errors.
    pub fn ingredient(&self, steps: &[u32]) -> Result<Ingredient<'static>> {
        let (first, rest) = match steps.split_first() {
            None => return Ok(Ingredient::from(&self.container)),
            Some((&first, rest)) => (first, rest),
        };

        let mut current = self.container.get(first).clone();
        let mut at = 0;
        while at < rest.len() {
            let step = rest[at];
            match current.kind() {
                Ok(Kind::Container) => {
                    current = Container::try_from(&current)?.get(step).clone();
                    at += 1;
                }
                Ok(Kind::Map) => {
                    current = Map::try_from(&current)?.get(&step).clone();
                    at += 1;
                }
                Ok(Kind::Zip) => {
                    // Unwrap in place; the step applies to the inner record.
                    current = Compressed::try_from(&current)?.into_inner();
                }
                _ => return Ok(Ingredient::null()),
            }
        }
        Ok(current)
    }

    /// Navigate a step path and root a sub-Recipe at the result. The
    /// parent's glossary carries over when the sub-Recipe has none of its
    /// own.
    pub fn recipe(&self, steps: &[u32]) -> Result<Recipe> {
        let target = self.ingredient(steps)?;
        let mut sub = Recipe::try_from(&target)?;
        if sub.glossary.is_empty() && !self.glossary.is_empty() {
            sub.glossary = self.glossary.clone();
        }
        Ok(sub)
    }
}

impl TryFrom<&Ingredient<'_>> for Recipe {
    type Error = Error;

    /// Adopt a Container as the root, or wrap any other record in a
    /// single-child Container, then scan the top level for the first
    /// Library.
    fn try_from(raw: &Ingredient) -> Result<Self> {
        let container = match raw.kind() {
            Ok(Kind::Container) => Container::try_from(raw)?,
            _ => Container::from(vec![raw.to_owned()]),
        };

        let mut glossary = Glossary::default();
        for child in container.children() {
            if matches!(child.kind(), Ok(Kind::Library)) {
                glossary = Glossary::from(&Library::try_from(child)?);
                break;
            }
        }

        Ok(Recipe {
            container,
            glossary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The fixture: a container holding a four-name library and a map of
    /// strings, one entry of which is a nested map.
    fn produce() -> Ingredient<'static> {
        let library = Library::from(vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
            "third-first".to_string(),
        ]);

        let mut nested = Map::new();
        nested
            .children_mut()
            .insert(3, Ingredient::from("First Child of the Third Element"));

        let mut map = Map::new();
        map.children_mut()
            .insert(0, Ingredient::from("First Element"));
        map.children_mut()
            .insert(1, Ingredient::from("Second Element"));
        map.children_mut().insert(2, Ingredient::from(&nested));

        let c = Container::from(vec![Ingredient::from(&library), Ingredient::from(&map)]);
        Ingredient::from(&c)
    }

    #[test]
    fn glossary_names_to_keys() {
        let r = Recipe::try_from(&produce()).unwrap();
        let g = r.glossary();

        assert_eq!(g.keys_for(&["first"]), vec![0]);
        assert_eq!(g.keys_for(&["second"]), vec![1]);
        assert_eq!(g.keys_for(&["third", "second", "third-first"]), vec![2, 1, 3]);
        assert_eq!(g.keys_for(&["unknown"]), vec![0]);
    }

    #[test]
    fn glossary_keys_to_names() {
        let r = Recipe::try_from(&produce()).unwrap();
        let g = r.glossary();

        assert_eq!(g.names_for(&[0]), vec!["first"]);
        assert_eq!(g.names_for(&[1]), vec!["second"]);
        assert_eq!(
            g.names_for(&[2, 1, 3]),
            vec!["third", "second", "third-first"]
        );
        assert_eq!(g.names_for(&[99]), vec![""]);
    }

    #[test]
    fn adopts_container_and_finds_library() {
        let r = Recipe::try_from(&produce()).unwrap();
        assert_eq!(r.container().len(), 2);
        assert_eq!(r.container().get(0).kind().unwrap(), Kind::Library);
        assert_eq!(r.glossary().names().len(), 4);
    }

    #[test]
    fn wraps_non_container_roots() {
        let r = Recipe::try_from(&Ingredient::from("alone")).unwrap();
        assert_eq!(r.container().len(), 1);
        assert_eq!(r.container().get(0).to_text(), "alone");
        assert!(r.glossary().is_empty());
    }

    #[test]
    fn step_navigation() {
        let r = Recipe::try_from(&produce()).unwrap();

        assert_eq!(r.ingredient(&[1, 0]).unwrap().to_text(), "First Element");
        assert_eq!(r.ingredient(&[1, 1]).unwrap().to_text(), "Second Element");
        assert_eq!(
            r.ingredient(&[1, 2, 3]).unwrap().to_text(),
            "First Child of the Third Element"
        );
        assert_eq!(r.ingredient(&[1]).unwrap().kind().unwrap(), Kind::Map);
    }

    #[test]
    fn empty_path_is_the_root() {
        let r = Recipe::try_from(&produce()).unwrap();
        let root = r.ingredient(&[]).unwrap();
        assert_eq!(root, produce());
    }

    #[test]
    fn dead_ends_are_null() {
        let r = Recipe::try_from(&produce()).unwrap();

        // Root index out of range.
        assert!(r.ingredient(&[5]).unwrap().is_null());
        // Map key miss.
        assert!(r.ingredient(&[1, 9]).unwrap().is_null());
        // Stepping into a library.
        assert!(r.ingredient(&[0, 1]).unwrap().is_null());
        // Stepping past a scalar.
        assert!(r.ingredient(&[1, 0, 0]).unwrap().is_null());
    }

    #[test]
    fn navigation_unwraps_compressed_blocks() {
        let mut inner = Map::new();
        inner
            .children_mut()
            .insert(4, Ingredient::from("hidden treasure"));
        let zip = Ingredient::from(&Compressed::new(Ingredient::from(&inner)));

        let c = Container::from(vec![Ingredient::null(), zip]);
        let r = Recipe::try_from(&Ingredient::from(&c)).unwrap();

        // The unwrap costs no step: [1, 4] reaches through the zip into
        // the map.
        assert_eq!(r.ingredient(&[1, 4]).unwrap().to_text(), "hidden treasure");

        // With no step left to apply, the block stays compressed.
        assert_eq!(r.ingredient(&[1]).unwrap().kind().unwrap(), Kind::Zip);
    }

    #[test]
    fn sub_recipe_inherits_glossary() {
        let r = Recipe::try_from(&produce()).unwrap();
        let sub = r.recipe(&[1]).unwrap();

        assert_eq!(sub.container().len(), 1);
        assert_eq!(
            sub.glossary().keys_for(&["third-first"]),
            vec![3],
            "sub-recipe without its own library keeps the parent glossary"
        );

        let whole = r.recipe(&[]).unwrap();
        assert_eq!(whole.container().len(), 2);
        assert_eq!(whole.glossary().names().len(), 4);
    }
}

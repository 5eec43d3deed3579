//! Ordered storage of registrations, keyed by service.

use crate::core::{Registration, ServiceKey};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::rc::Rc;

/// Maps each key to its registrations in insertion order, unique by name.
///
/// Registrations are held behind `Rc` so a layered (effective) registry can
/// share them with the containers that own them. Singleton memoization done
/// through any view is therefore visible through all of them.
#[derive(Default)]
pub(crate) struct Registry {
  entries: HashMap<ServiceKey, Vec<Rc<Registration>>>,
}

impl Registry {
  pub(crate) fn get(&self, key: &ServiceKey) -> Option<&[Rc<Registration>]> {
    self.entries.get(key).map(Vec::as_slice)
  }

  /// `None` for `name` asks whether the key has any registration at all.
  pub(crate) fn contains(&self, key: &ServiceKey, name: Option<&str>) -> bool {
    match (self.entries.get(key), name) {
      (None, _) => false,
      (Some(list), None) => !list.is_empty(),
      (Some(list), Some(name)) => list.iter().any(|r| r.name() == name),
    }
  }

  /// Adds a registration, or swaps it in place when `replace` is set.
  pub(crate) fn insert(
    &mut self,
    key: ServiceKey,
    registration: Registration,
    replace: bool,
  ) -> Result<()> {
    let list = self.entries.entry(key.clone()).or_default();
    match list.iter().position(|r| r.name() == registration.name()) {
      Some(_) if !replace => Err(Error::DuplicateRegistration {
        key,
        name: registration.name().to_owned(),
      }),
      Some(index) => {
        list[index] = Rc::new(registration);
        Ok(())
      }
      None => {
        list.push(Rc::new(registration));
        Ok(())
      }
    }
  }

  /// Removes one named registration, or every registration under `key`.
  /// Returns how many were removed.
  pub(crate) fn remove(&mut self, key: &ServiceKey, name: Option<&str>) -> usize {
    let Some(list) = self.entries.get_mut(key) else {
      return 0;
    };
    let before = list.len();
    match name {
      Some(name) => list.retain(|r| r.name() != name),
      None => list.clear(),
    }
    let removed = before - list.len();
    if list.is_empty() {
      self.entries.remove(key);
    }
    removed
  }

  pub(crate) fn names(&self, key: &ServiceKey) -> Vec<String> {
    self
      .get(key)
      .map(|list| list.iter().map(|r| r.name().to_owned()).collect())
      .unwrap_or_default()
  }

  pub(crate) fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
    self.entries.keys()
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.values().map(Vec::len).sum()
  }

  /// Shares the registration objects; used to seed an effective registry.
  pub(crate) fn share(&self) -> Self {
    Self {
      entries: self.entries.clone(),
    }
  }

  /// Copies every registration object, so later memoization on the original
  /// does not show up in the copy.
  pub(crate) fn deep_copy(&self) -> Self {
    let entries = self
      .entries
      .iter()
      .map(|(key, list)| {
        let list = list.iter().map(|r| Rc::new(r.deep_copy())).collect();
        (key.clone(), list)
      })
      .collect();
    Self { entries }
  }

  /// Layers `own` over `parent`.
  ///
  /// Per key, the parent's order is kept, a child registration with the same
  /// name takes the parent's slot, and child-only names are appended in the
  /// child's order.
  pub(crate) fn layered(mut parent: Registry, own: &Registry) -> Registry {
    for (key, own_list) in &own.entries {
      let merged = parent.entries.entry(key.clone()).or_default();
      for registration in own_list {
        match merged.iter().position(|r| r.name() == registration.name()) {
          Some(index) => merged[index] = Rc::clone(registration),
          None => merged.push(Rc::clone(registration)),
        }
      }
    }
    parent
  }
}

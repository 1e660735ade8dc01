// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module bundles: a module node grouped with its half-module subtrees.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::meta::{Half, ModulePosition, SensorOrientation};

/// One half-module and the parts built under it.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfModuleBundle {
    pub half_module: NodeKey,
    pub orientation: SensorOrientation,
    pub position: Option<ModulePosition>,
    pub sensor: NodeKey,
    pub active_sensor: NodeKey,
    pub lamination: Option<NodeKey>,
    pub carbon_fiber: Option<NodeKey>,
    pub hybrid: Option<NodeKey>,
}

impl HalfModuleBundle {
    /// Every node key of the bundle, half-module first.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        [self.half_module, self.sensor, self.active_sensor]
            .into_iter()
            .chain(self.lamination)
            .chain(self.carbon_fiber)
            .chain(self.hybrid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBundle {
    pub layer: u8,
    pub half: Half,
    pub module: NodeKey,
    pub half_modules: Vec<HalfModuleBundle>,
}

impl ModuleBundle {
    pub fn new(layer: u8, half: Half, module: NodeKey) -> Self {
        Self {
            layer,
            half,
            module,
            half_modules: Vec::new(),
        }
    }

    pub fn half_module(
        &self,
        orientation: SensorOrientation,
        position: Option<ModulePosition>,
    ) -> Option<&HalfModuleBundle> {
        self.half_modules
            .iter()
            .find(|hm| hm.orientation == orientation && hm.position == position)
    }
}

/// Bundles keyed by (layer, half), in registration order.
#[derive(Debug, Clone, Default)]
pub struct BundleRegistry {
    bundles: Vec<ModuleBundle>,
    index: FxHashMap<(u8, Half), usize>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bundle. A second bundle for the same (layer, half) is an error.
    pub fn add(&mut self, bundle: ModuleBundle) -> Result<()> {
        let key = (bundle.layer, bundle.half);
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateBundle {
                layer: bundle.layer,
                half: bundle.half,
            });
        }
        self.index.insert(key, self.bundles.len());
        self.bundles.push(bundle);
        Ok(())
    }

    pub fn contains(&self, layer: u8, half: Half) -> bool {
        self.index.contains_key(&(layer, half))
    }

    pub fn get(&self, layer: u8, half: Half) -> Option<&ModuleBundle> {
        self.index.get(&(layer, half)).map(|&i| &self.bundles[i])
    }

    /// Mutable access, for filling in half-modules after registration.
    pub fn get_mut(&mut self, layer: u8, half: Half) -> Option<&mut ModuleBundle> {
        self.index.get(&(layer, half)).map(|&i| &mut self.bundles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleBundle> {
        self.bundles.iter()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn key(n: u64) -> NodeKey {
        NodeKey::from(KeyData::from_ffi(n))
    }

    #[test]
    fn second_bundle_for_same_slot_fails() {
        let mut registry = BundleRegistry::new();
        registry.add(ModuleBundle::new(2, Half::Top, key(1))).unwrap();
        registry.add(ModuleBundle::new(2, Half::Bottom, key(2))).unwrap();
        let err = registry
            .add(ModuleBundle::new(2, Half::Top, key(3)))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is already a module bundle with layer 2 and half top"
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_by_layer_and_half() {
        let mut registry = BundleRegistry::new();
        let mut bundle = ModuleBundle::new(4, Half::Bottom, key(1));
        bundle.half_modules.push(HalfModuleBundle {
            half_module: key(2),
            orientation: SensorOrientation::Stereo,
            position: Some(ModulePosition::Slot),
            sensor: key(3),
            active_sensor: key(4),
            lamination: Some(key(5)),
            carbon_fiber: None,
            hybrid: None,
        });
        registry.add(bundle).unwrap();
        assert!(registry.contains(4, Half::Bottom));
        registry
            .get_mut(4, Half::Bottom)
            .unwrap()
            .half_modules[0]
            .carbon_fiber = Some(key(6));

        let found = registry.get(4, Half::Bottom).unwrap();
        let hm = found
            .half_module(SensorOrientation::Stereo, Some(ModulePosition::Slot))
            .unwrap();
        assert_eq!(hm.keys().count(), 5);
        assert!(found.half_module(SensorOrientation::Axial, None).is_none());
        assert!(registry.get(4, Half::Top).is_none());
    }
}

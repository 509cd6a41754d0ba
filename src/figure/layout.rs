//! Layout and 3-D scene containers

use super::axis::{AxisDef, AxisId, AxisKind};
use crate::naming;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Chart-wide presentation settings.
///
/// Axis definitions (`xaxis*`, `yaxis*`) and scenes (`scene*`) are kept in
/// typed maps; every other layout key lives in `properties`. Axis keys are
/// always written with an explicit index (`xaxis1`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Layout {
    pub axes: BTreeMap<AxisId, AxisDef>,
    pub scenes: BTreeMap<u32, Scene>,
    pub properties: Map<String, Value>,
}

/// A 3-D subplot container holding its own x/y/z axes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Scene {
    pub axes: BTreeMap<AxisId, AxisDef>,
    pub properties: Map<String, Value>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layout is 3-D when it carries a first scene.
    pub fn is_3d(&self) -> bool {
        self.scenes.contains_key(&1)
    }

    /// Map holding the axis definitions that traces refer to.
    ///
    /// For 3-D layouts this is the first scene's axes, otherwise the
    /// top-level cartesian axes.
    pub fn axis_container(&self) -> &BTreeMap<AxisId, AxisDef> {
        match self.scenes.get(&1) {
            Some(scene) => &scene.axes,
            None => &self.axes,
        }
    }

    pub fn axis_container_mut(&mut self) -> &mut BTreeMap<AxisId, AxisDef> {
        match self.scenes.get_mut(&1) {
            Some(scene) => &mut scene.axes,
            None => &mut self.axes,
        }
    }

    pub fn axis(&self, id: AxisId) -> Option<&AxisDef> {
        self.axes.get(&id)
    }

    pub fn axis_mut(&mut self, id: AxisId) -> &mut AxisDef {
        self.axes.entry(id).or_default()
    }

    pub fn set_axis_def(&mut self, id: AxisId, def: AxisDef) {
        self.axes.insert(id, def);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a layout key, routing axis and scene keys to their typed maps.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut single = Map::new();
        single.insert(key.to_string(), value);
        let parsed = Layout::from(single);
        self.axes.extend(parsed.axes);
        self.scenes.extend(parsed.scenes);
        self.properties.extend(parsed.properties);
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Highest index in use per axis kind among top-level axes.
    pub fn max_axis_index(&self, kind: AxisKind) -> u32 {
        self.axes
            .keys()
            .filter(|id| id.kind == kind)
            .map(|id| id.index)
            .max()
            .unwrap_or(0)
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, kind: AxisKind) -> Option<&AxisDef> {
        self.axes.get(&AxisId::primary(kind))
    }
}

fn split_axes(
    map: Map<String, Value>,
) -> (BTreeMap<AxisId, AxisDef>, BTreeMap<u32, Map<String, Value>>, Map<String, Value>) {
    let mut axes = BTreeMap::new();
    let mut scenes = BTreeMap::new();
    let mut properties = Map::new();
    for (key, value) in map {
        match value {
            Value::Object(obj) if naming::is_axis_key(&key) => {
                if let Some(id) = AxisId::parse(&key) {
                    axes.insert(id, AxisDef::from(obj));
                } else {
                    properties.insert(key, Value::Object(obj));
                }
            }
            Value::Object(obj) if naming::parse_scene_name(&key).is_some() => {
                if let Some(index) = naming::parse_scene_name(&key) {
                    scenes.insert(index, obj);
                }
            }
            other => {
                properties.insert(key, other);
            }
        }
    }
    (axes, scenes, properties)
}

impl From<Map<String, Value>> for Layout {
    fn from(map: Map<String, Value>) -> Self {
        let (axes, scenes, properties) = split_axes(map);
        Layout {
            axes,
            scenes: scenes
                .into_iter()
                .map(|(index, obj)| (index, Scene::from(obj)))
                .collect(),
            properties,
        }
    }
}

impl From<Layout> for Map<String, Value> {
    fn from(layout: Layout) -> Self {
        let mut map = layout.properties;
        for (id, def) in layout.axes {
            map.insert(id.key(), def.into());
        }
        for (index, scene) in layout.scenes {
            map.insert(
                naming::scene_key(index),
                Value::Object(Map::<String, Value>::from(scene)),
            );
        }
        map
    }
}

impl From<Map<String, Value>> for Scene {
    fn from(map: Map<String, Value>) -> Self {
        let (axes, nested, mut properties) = split_axes(map);
        for (index, obj) in nested {
            properties.insert(naming::scene_key(index), Value::Object(obj));
        }
        Scene { axes, properties }
    }
}

impl From<Scene> for Map<String, Value> {
    fn from(scene: Scene) -> Self {
        let mut map = scene.properties;
        for (id, def) in scene.axes {
            let key = if id.index == 1 {
                naming::scene_axis_key(id.kind.letter())
            } else {
                id.key()
            };
            map.insert(key, def.into());
        }
        map
    }
}

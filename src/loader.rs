//! JSON surface of the topology description.
//!
//! The document is an array of component objects:
//!
//! ```json
//! [
//!     {
//!         "type": "recorder",
//!         "id": "rec0",
//!         "dependencies": ["clock0"],
//!         "config": { "limit": { "uint16_t": 512 }, "label": "main" }
//!     }
//! ]
//! ```
//!
//! Plain config values map to `bool`, `u64` (unsigned integer), `i64`
//! (signed integer) or `String`; a single-key object declares one of the
//! eight sized integer types explicitly. Any schema deviation fails with
//! [`Error::TopologyLoader`] carrying a stable message.

use crate::cast::IntegralType;
use crate::error::{Error, Result};
use crate::topology::{Topology, TopologyBuilder, TopologyEntryBuilder};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const KEY_TYPE: &str = "type";
const KEY_ID: &str = "id";
const KEY_DEPENDENCIES: &str = "dependencies";
const KEY_CONFIG: &str = "config";

/// Initializes a [`Topology`] from JSON.
#[derive(Debug)]
pub struct TopologyLoader {
    json: Value,
}

impl TopologyLoader {
    /// Load topology metadata from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|_| {
            Error::TopologyLoader(format!(
                "Topology file not accessible. Path: \"{}\".",
                path.display()
            ))
        })?;

        let json = serde_json::from_str(&text).map_err(|e| {
            Error::TopologyLoader(format!("Topology json syntax error. Details:\n{e}"))
        })?;

        Ok(Self { json })
    }

    /// Load topology metadata from an already parsed JSON value.
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Initialize `topology` from the held JSON document.
    pub fn load(&self, topology: &mut Topology) -> Result<()> {
        let mut builder = TopologyBuilder::new(topology);

        let Some(components) = self.json.as_array() else {
            return Err(Error::TopologyLoader(
                "Topology json shall be an array.".to_owned(),
            ));
        };

        for (index, component) in components.iter().enumerate() {
            let Some(component) = component.as_object() else {
                return Err(Error::TopologyLoader(format!(
                    "Component{{#{index}}} - Component shall be an object."
                )));
            };

            let type_name = load_field(index, component, KEY_TYPE)?;
            let id = load_field(index, component, KEY_ID)?;

            let context = format!("Component{{#{index}, \"{type_name}\" : \"{id}\"}}");
            let mut entry = builder.component(type_name, id)?;

            load_dependencies(&context, component, &mut entry)?;
            load_config(&context, component, &mut entry)?;
        }

        Ok(())
    }
}

/// `type` and `id` share the presence / string / non-empty checks; only the
/// field name differs in the message.
fn load_field(index: usize, component: &Map<String, Value>, field: &str) -> Result<String> {
    let Some(json) = component.get(field) else {
        return Err(Error::TopologyLoader(format!(
            "Component{{#{index}}} - Component {field} shall be specified."
        )));
    };

    let Some(value) = json.as_str() else {
        return Err(Error::TopologyLoader(format!(
            "Component{{#{index}}} - Component {field} shall be a string."
        )));
    };

    if value.is_empty() {
        return Err(Error::TopologyLoader(format!(
            "Component{{#{index}}} - Component {field} shall not be empty."
        )));
    }

    Ok(value.to_owned())
}

fn load_dependencies(
    context: &str,
    component: &Map<String, Value>,
    entry: &mut TopologyEntryBuilder<'_>,
) -> Result<()> {
    let Some(json) = component.get(KEY_DEPENDENCIES) else {
        return Ok(());
    };

    let Some(dependencies) = json.as_array() else {
        return Err(Error::TopologyLoader(format!(
            "{context} - Dependencies shall be an array."
        )));
    };

    for (dependency_index, dependency) in dependencies.iter().enumerate() {
        let Some(id) = dependency.as_str() else {
            return Err(Error::TopologyLoader(format!(
                "{context} : Dependency{{#{dependency_index}}} - Dependency type shall be a string."
            )));
        };

        if id.is_empty() {
            return Err(Error::TopologyLoader(format!(
                "{context} : Dependency{{#{dependency_index}}} - Dependency id shall not be empty."
            )));
        }

        entry.dependency(id);
    }

    Ok(())
}

fn load_config(
    context: &str,
    component: &Map<String, Value>,
    entry: &mut TopologyEntryBuilder<'_>,
) -> Result<()> {
    let Some(json) = component.get(KEY_CONFIG) else {
        return Ok(());
    };

    let Some(config) = json.as_object() else {
        return Err(Error::TopologyLoader(format!(
            "{context} - Config shall be an object."
        )));
    };

    for (key, value) in config {
        if key.is_empty() {
            return Err(Error::TopologyLoader(format!(
                "{context} - Config shall not consist of empty keys."
            )));
        }

        load_config_entry(context, key, value, entry)?;
    }

    Ok(())
}

fn load_config_entry(
    context: &str,
    key: &str,
    value: &Value,
    entry: &mut TopologyEntryBuilder<'_>,
) -> Result<()> {
    if let Some(v) = value.as_bool() {
        entry.config(key, v)?;
    } else if let Some(v) = value.as_u64() {
        entry.config(key, v)?;
    } else if let Some(v) = value.as_i64() {
        entry.config(key, v)?;
    } else if let Some(v) = value.as_str() {
        entry.config(key, v)?;
    } else if let Some(object) = value.as_object() {
        load_declared_config_entry(context, key, object, entry)?;
    } else {
        return Err(Error::TopologyLoader(format!(
            "{context} : Config{{\"{key}\"}} - Config entry type shall be one of {{bool, \
             ungigned int, signed int, string, object}}."
        )));
    }

    Ok(())
}

/// `{ "<intType>": <number> }` entries: an explicitly declared integer width.
fn load_declared_config_entry(
    context: &str,
    key: &str,
    object: &Map<String, Value>,
    entry: &mut TopologyEntryBuilder<'_>,
) -> Result<()> {
    if object.len() != 1 {
        return Err(Error::TopologyLoader(format!(
            "{context} : Config{{\"{key}\"}} - Config entry object shall be of size 1."
        )));
    }

    // Exactly one pair, just checked.
    let (declared, value) = object.iter().next().expect("object of size 1");

    let target = match declared.as_str() {
        "uint8_t" => IntegralType::U8,
        "uint16_t" => IntegralType::U16,
        "uint32_t" => IntegralType::U32,
        "uint64_t" => IntegralType::U64,
        "int8_t" => IntegralType::I8,
        "int16_t" => IntegralType::I16,
        "int32_t" => IntegralType::I32,
        "int64_t" => IntegralType::I64,
        _ => {
            return Err(Error::TopologyLoader(format!(
                "{context} : Config{{\"{key}\"}} - Config entry object type shall be one of \
                 {{uint8_t, int8_t, uint16_t, int16_t, uint32_t, int32_t, uint64_t, int64_t}}."
            )));
        }
    };

    let unsigned = matches!(
        target,
        IntegralType::U8 | IntegralType::U16 | IntegralType::U32 | IntegralType::U64
    );

    let value: i128 = if unsigned {
        let Some(v) = value.as_u64() else {
            return Err(Error::TopologyLoader(format!(
                "{context} : Config{{\"{key}\", {declared}}} - Config entry value type shall \
                 be unsigned integer."
            )));
        };
        v as i128
    } else if let Some(v) = value.as_i64() {
        v as i128
    } else if let Some(v) = value.as_u64() {
        v as i128
    } else {
        return Err(Error::TopologyLoader(format!(
            "{context} : Config{{\"{key}\", {declared}}} - Config entry value type shall be \
             integer."
        )));
    };

    if value < target.min() || target.max() < value {
        return Err(Error::TopologyLoader(format!(
            "{context} : Config{{\"{key}\", {declared}{{{value}}}}} - Config entry value shall \
             be in range of its declared type."
        )));
    }

    match target {
        IntegralType::U8 => entry.config(key, value as u8)?,
        IntegralType::U16 => entry.config(key, value as u16)?,
        IntegralType::U32 => entry.config(key, value as u32)?,
        IntegralType::U64 => entry.config(key, value as u64)?,
        IntegralType::I8 => entry.config(key, value as i8)?,
        IntegralType::I16 => entry.config(key, value as i16)?,
        IntegralType::I32 => entry.config(key, value as i32)?,
        IntegralType::I64 => entry.config(key, value as i64)?,
        IntegralType::Bool => unreachable!("bool is not a declarable width"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load_err(json: Value) -> String {
        let mut topology = Topology::new();
        TopologyLoader::new(json)
            .load(&mut topology)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn non_existent_file() {
        let err = TopologyLoader::from_file("fake_path").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Topology file not accessible. Path: \"fake_path\"."
        );
    }

    #[test]
    fn syntax_error_from_file() {
        let dir = std::env::temp_dir().join("wireup-loader-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "[ { ").unwrap();

        let err = TopologyLoader::from_file(&path).unwrap_err().to_string();
        assert!(
            err.starts_with("Topology json syntax error. Details:\n"),
            "{err}"
        );
    }

    #[test]
    fn topology_not_an_array() {
        assert_eq!(
            load_err(json!({ "object": 123 })),
            "Topology json shall be an array."
        );
    }

    #[test]
    fn component_not_an_object() {
        assert_eq!(
            load_err(json!([123])),
            "Component{#0} - Component shall be an object."
        );
    }

    #[test]
    fn component_type_missing() {
        assert_eq!(
            load_err(json!([{}])),
            "Component{#0} - Component type shall be specified."
        );
    }

    #[test]
    fn component_type_integer() {
        assert_eq!(
            load_err(json!([{ "type": 123 }])),
            "Component{#0} - Component type shall be a string."
        );
    }

    #[test]
    fn component_type_empty() {
        assert_eq!(
            load_err(json!([{ "type": "" }])),
            "Component{#0} - Component type shall not be empty."
        );
    }

    #[test]
    fn component_id_missing() {
        assert_eq!(
            load_err(json!([{ "type": "MyType" }])),
            "Component{#0} - Component id shall be specified."
        );
    }

    #[test]
    fn component_id_integer() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": 123 }])),
            "Component{#0} - Component id shall be a string."
        );
    }

    #[test]
    fn component_id_empty() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "" }])),
            "Component{#0} - Component id shall not be empty."
        );
    }

    #[test]
    fn dependencies_not_an_array() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "dependencies": "myDep" }])),
            "Component{#0, \"MyType\" : \"myId\"} - Dependencies shall be an array."
        );
    }

    #[test]
    fn dependency_empty_string() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "dependencies": ["myDep", ""] }])),
            "Component{#0, \"MyType\" : \"myId\"} : Dependency{#1} - Dependency id shall not be empty."
        );
    }

    #[test]
    fn dependency_not_a_string() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "dependencies": ["myDep", 123] }])),
            "Component{#0, \"MyType\" : \"myId\"} : Dependency{#1} - Dependency type shall be a string."
        );
    }

    #[test]
    fn config_not_an_object() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "config": [123] }])),
            "Component{#0, \"MyType\" : \"myId\"} - Config shall be an object."
        );
    }

    #[test]
    fn config_key_empty() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "config": { "": "value" } }])),
            "Component{#0, \"MyType\" : \"myId\"} - Config shall not consist of empty keys."
        );
    }

    #[test]
    fn config_entry_type_float() {
        assert_eq!(
            load_err(json!([{ "type": "MyType", "id": "myId", "config": { "key": 1.1 } }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\"} - Config entry type shall \
             be one of {bool, ungigned int, signed int, string, object}."
        );
    }

    #[test]
    fn config_entry_object_size_not_1() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "uint8_t": 1, "uint32_t": 2 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\"} - Config entry object shall \
             be of size 1."
        );
    }

    #[test]
    fn config_entry_object_type_unknown() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "uint10_t": 1 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\"} - Config entry object type \
             shall be one of {uint8_t, int8_t, uint16_t, int16_t, uint32_t, int32_t, uint64_t, \
             int64_t}."
        );
    }

    #[test]
    fn config_entry_object_value_not_unsigned() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "uint8_t": -10 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\", uint8_t} - Config entry \
             value type shall be unsigned integer."
        );
    }

    #[test]
    fn config_entry_object_value_not_integer() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "int16_t": 1.1 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\", int16_t} - Config entry \
             value type shall be integer."
        );
    }

    #[test]
    fn config_entry_object_value_out_of_range_signed() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "int8_t": 511 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\", int8_t{511}} - Config entry \
             value shall be in range of its declared type."
        );
    }

    #[test]
    fn config_entry_object_value_out_of_range_unsigned() {
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "uint16_t": 70000 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\", uint16_t{70000}} - Config \
             entry value shall be in range of its declared type."
        );
    }

    #[test]
    fn declared_int64_out_of_signed_range() {
        // A value only representable as u64 must not wrap into int64.
        assert_eq!(
            load_err(json!([{
                "type": "MyType", "id": "myId",
                "config": { "key": { "int64_t": 9223372036854775808u64 } }
            }])),
            "Component{#0, \"MyType\" : \"myId\"} : Config{\"key\", \
             int64_t{9223372036854775808}} - Config entry value shall be in range of its \
             declared type."
        );
    }

    #[test]
    fn duplicate_component_id_surfaces_from_builder() {
        assert_eq!(
            load_err(json!([
                { "type": "typeA", "id": "x" },
                { "type": "typeB", "id": "x" }
            ])),
            "Component id duplicated for component typeB{\"x\"}."
        );
    }

    #[test]
    fn golden_topology() {
        let loader = TopologyLoader::new(json!([
            {
                "type": "type0",
                "id": "id0"
            },
            {
                "type": "type1",
                "id": "id1"
            },
            {
                "type": "type1",
                "id": "id2",
                "dependencies": ["id0"]
            },
            {
                "type": "type2",
                "id": "id3",
                "dependencies": ["id0", "id2"],
                "config": {
                    "key0": 1,
                    "key1": { "uint8_t": 255 },
                    "key2": "stringValue",
                    "key3": -1
                }
            }
        ]));

        let mut topology = Topology::new();
        loader.load(&mut topology).unwrap();

        assert_eq!(topology.len(), 4);

        let entries = topology.entries();

        assert_eq!(entries[0].type_name, "type0");
        assert_eq!(entries[0].id, "id0");
        assert!(entries[0].dependency_ids.is_empty());
        assert!(entries[0].config.is_empty());

        assert_eq!(entries[1].type_name, "type1");
        assert_eq!(entries[1].id, "id1");
        assert!(entries[1].dependency_ids.is_empty());
        assert!(entries[1].config.is_empty());

        assert_eq!(entries[2].type_name, "type1");
        assert_eq!(entries[2].id, "id2");
        assert_eq!(entries[2].dependency_ids, ["id0"]);
        assert!(entries[2].config.is_empty());

        assert_eq!(entries[3].type_name, "type2");
        assert_eq!(entries[3].id, "id3");
        assert_eq!(entries[3].dependency_ids, ["id0", "id2"]);
        assert_eq!(entries[3].config.len(), 4);

        let config = &entries[3].config;

        let key0 = config.get("key0").unwrap();
        assert_eq!(key0.type_name(), "u64");
        assert_eq!(key0.get::<u64>().unwrap(), 1);

        let key1 = config.get("key1").unwrap();
        assert_eq!(key1.type_name(), "u8");
        assert_eq!(key1.get::<u8>().unwrap(), 255);

        let key2 = config.get("key2").unwrap();
        assert_eq!(key2.type_name(), "String");
        assert_eq!(key2.get::<String>().unwrap(), "stringValue");

        let key3 = config.get("key3").unwrap();
        assert_eq!(key3.type_name(), "i64");
        assert_eq!(key3.get::<i64>().unwrap(), -1);
    }
}

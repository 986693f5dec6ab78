//! Story and content block types.
//!
//! Blocks arrive as JSON objects tagged by a `component` field. Known tags
//! decode into typed variants; anything else is kept verbatim as
//! [`Block::Unknown`] so a new CMS component never breaks generation.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A CMS story (one page's worth of content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub full_slug: String,
    pub content: StoryContent,
}

/// Root content of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryContent {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub component: String,
    #[serde(default)]
    pub body: Vec<ContentBlock>,
}

/// One block of a story body, identified by a stable uid.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub uid: String,
    pub block: Block,
}

/// Block payload, tagged by component name.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Teaser(Teaser),
    Feature(Feature),
    Grid(Grid),
    Hero(Hero),
    /// A component this storefront has no view for.
    Unknown {
        component: String,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teaser {
    #[serde(default)]
    pub headline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub name: String,
}

/// A row of nested blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(default)]
    pub columns: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
}

const TEASER: &str = "teaser";
const FEATURE: &str = "feature";
const GRID: &str = "grid";
const HERO: &str = "hero";

impl Block {
    /// The component tag this block carries.
    pub fn component(&self) -> &str {
        match self {
            Self::Teaser(_) => TEASER,
            Self::Feature(_) => FEATURE,
            Self::Grid(_) => GRID,
            Self::Hero(_) => HERO,
            Self::Unknown { component, .. } => component,
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let uid = take_string::<D::Error>(&mut fields, "_uid")?;
        let component = take_string::<D::Error>(&mut fields, "component")?;

        let block = match component.as_str() {
            TEASER => Block::Teaser(decode::<_, D::Error>(fields)?),
            FEATURE => Block::Feature(decode::<_, D::Error>(fields)?),
            GRID => Block::Grid(decode::<_, D::Error>(fields)?),
            HERO => Block::Hero(decode::<_, D::Error>(fields)?),
            _ => Block::Unknown {
                component: component.clone(),
                fields,
            },
        };

        Ok(Self { uid, block })
    }
}

impl Serialize for ContentBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = match &self.block {
            Block::Teaser(inner) => to_object(inner),
            Block::Feature(inner) => to_object(inner),
            Block::Grid(inner) => to_object(inner),
            Block::Hero(inner) => to_object(inner),
            Block::Unknown { fields, .. } => Ok(fields.clone()),
        }
        .map_err(<S::Error as ser::Error>::custom)?;

        fields.insert("_uid".into(), Value::String(self.uid.clone()));
        fields.insert(
            "component".into(),
            Value::String(self.block.component().to_string()),
        );

        Value::Object(fields).serialize(serializer)
    }
}

fn take_string<E: de::Error>(fields: &mut Map<String, Value>, key: &'static str) -> Result<String, E> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(E::custom(format!("`{key}` must be a string, got {other}"))),
        None => Err(E::missing_field(key)),
    }
}

fn decode<T: DeserializeOwned, E: de::Error>(fields: Map<String, Value>) -> Result<T, E> {
    serde_json::from_value(Value::Object(fields)).map_err(E::custom)
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

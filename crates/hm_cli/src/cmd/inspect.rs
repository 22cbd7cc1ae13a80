use std::str::FromStr;

use comfy_table::{Cell, CellAlignment, Row};
use hm_config::MapConfig;
use hm_map::Map;
use serde_json::Value;
use tracing::trace;

use crate::{
    cmd::{Output, Success},
    map::AnyMap,
};

#[derive(Debug, clap::Args)]
pub(crate) struct Inspect {
    /// Operations to apply, in order.
    ///
    /// One of `put:KEY=VALUE`, `remove:KEY`, `resize:CAPACITY` or `clear`.
    /// Values are parsed as JSON, falling back to a plain string.
    #[arg(value_name = "OP", required = true)]
    ops: Vec<Op>,

    /// Print the map as JSON instead of its bucket dump.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Put(String, Value),
    Remove(String),
    Resize(usize),
    Clear,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = s.split_once(':').unwrap_or((s, ""));

        match name {
            "put" => {
                let (key, value) = arg
                    .split_once('=')
                    .ok_or_else(|| format!("expected put:KEY=VALUE, got \"{s}\""))?;
                let value = serde_json::from_str(value)
                    .unwrap_or_else(|_| Value::String(value.to_owned()));

                Ok(Self::Put(key.to_owned(), value))
            }
            "remove" => Ok(Self::Remove(arg.to_owned())),
            "resize" => arg
                .parse()
                .map(Self::Resize)
                .map_err(|err| format!("invalid capacity \"{arg}\": {err}")),
            "clear" if arg.is_empty() => Ok(Self::Clear),
            _ => Err(format!(
                "unknown operation \"{s}\", expected put:KEY=VALUE, remove:KEY, resize:N or clear"
            )),
        }
    }
}

impl Op {
    fn apply(self, map: &mut dyn Map<Value>) {
        trace!(op = ?self, "Applying operation.");

        match self {
            Self::Put(key, value) => {
                map.put(&key, value);
            }
            Self::Remove(key) => {
                map.remove(&key);
            }
            Self::Resize(capacity) => map.resize_table(capacity),
            Self::Clear => map.clear(),
        }
    }
}

impl Inspect {
    pub(crate) fn run(self, config: &MapConfig) -> Output {
        let mut map = AnyMap::from_config(config)?;
        for op in self.ops {
            op.apply(&mut map);
        }

        if self.json {
            return Ok(to_json(&map, config).into());
        }

        Ok(Success::Details {
            title: Some(map.to_string().trim_end().to_owned()),
            rows: summary(&map, config),
        })
    }
}

fn summary(map: &AnyMap<Value>, config: &MapConfig) -> Vec<Row> {
    [
        ("variant", config.variant.to_string()),
        ("hasher", config.hasher.to_string()),
        ("size", map.len().to_string()),
        ("capacity", map.capacity().to_string()),
        ("empty buckets", map.empty_buckets().to_string()),
        ("table load", format!("{:.2}", map.table_load())),
    ]
    .into_iter()
    .map(|(key, value)| {
        let mut row = Row::new();
        row.add_cell(Cell::new(key).set_alignment(CellAlignment::Right))
            .add_cell(Cell::new(value).set_alignment(CellAlignment::Left));
        row
    })
    .collect()
}

fn to_json(map: &AnyMap<Value>, config: &MapConfig) -> Value {
    let entries: serde_json::Map<_, _> = map
        .get_keys()
        .into_iter()
        .filter_map(|key| Some((key.to_owned(), map.get(key)?.clone())))
        .collect();

    serde_json::json!({
        "variant": config.variant,
        "hasher": config.hasher,
        "size": map.len(),
        "capacity": map.capacity(),
        "empty_buckets": map.empty_buckets(),
        "table_load": map.table_load(),
        "entries": entries,
    })
}

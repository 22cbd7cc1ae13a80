use comfy_table::{Cell, CellAlignment, Row};
use hm_config::MapConfig;
use hm_hash::HasherKind::{self, Additive, Positional};
use hm_map::Map;
use serde_json::Value;
use tracing::debug;

use crate::{
    cmd::{Output, Success},
    error::{Error, Result},
    map::AnyMap,
};

#[derive(Debug, clap::Args)]
pub(crate) struct Demo {
    /// Scenarios to run, in order. Runs all of them when omitted.
    #[arg(value_name = "NAME")]
    names: Vec<String>,

    /// List the available scenarios instead of running them.
    #[arg(short, long, conflicts_with = "names")]
    list: bool,
}

struct Scenario {
    name: &'static str,
    about: &'static str,
    run: fn(&mut Runner<'_>) -> Result<()>,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "empty-buckets",
        about: "Count empty buckets while inserting and overwriting keys.",
        run: empty_buckets,
    },
    Scenario {
        name: "table-load",
        about: "Track the load factor while inserting.",
        run: table_load,
    },
    Scenario {
        name: "clear",
        about: "Clear a map, before and after resizing it.",
        run: clear,
    },
    Scenario {
        name: "put",
        about: "Insert many keys with both hash functions.",
        run: put,
    },
    Scenario {
        name: "contains-key",
        about: "Check membership before and after removal.",
        run: contains_key,
    },
    Scenario {
        name: "get",
        about: "Look up present and absent keys.",
        run: get,
    },
    Scenario {
        name: "remove",
        about: "Remove present and absent keys.",
        run: remove,
    },
    Scenario {
        name: "resize",
        about: "Resize repeatedly and verify every key survives.",
        run: resize,
    },
    Scenario {
        name: "get-keys",
        about: "List keys, including after shrinking below the size.",
        run: get_keys,
    },
];

impl Demo {
    pub(crate) fn run(self, config: &MapConfig) -> Output {
        if self.list {
            let rows = SCENARIOS
                .iter()
                .map(|scenario| Row::from(vec![scenario.name, scenario.about]))
                .collect();

            return Ok(Success::Table {
                header: Row::from(vec!["Name", "Description"]),
                rows,
            });
        }

        let scenarios = if self.names.is_empty() {
            SCENARIOS.iter().collect()
        } else {
            self.names
                .iter()
                .map(String::as_str)
                .map(find)
                .collect::<Result<Vec<_>>>()?
        };

        let mut runner = Runner {
            config,
            scenario: "",
            rows: vec![],
        };

        for scenario in scenarios {
            debug!(scenario = scenario.name, variant = %config.variant, "Running scenario.");

            runner.scenario = scenario.name;
            (scenario.run)(&mut runner)?;
        }

        Ok(Success::Table {
            header: Row::from(vec![
                "Scenario", "Step", "Empty", "Load", "Size", "Capacity", "Result",
            ]),
            rows: runner.rows,
        })
    }
}

fn find(name: &str) -> Result<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|scenario| scenario.name == name)
        .ok_or_else(|| Error::UnknownScenario(name.to_owned()))
}

/// Builds maps for a scenario and records one row per observed step.
struct Runner<'a> {
    config: &'a MapConfig,
    scenario: &'static str,
    rows: Vec<Row>,
}

impl Runner<'_> {
    fn map(&mut self, capacity: usize, hasher: HasherKind) -> Result<AnyMap<Value>> {
        let map = AnyMap::new(self.config, capacity, hasher)?;
        self.record(format!("new({capacity}, {hasher})"), &map, "");

        Ok(map)
    }

    fn record(
        &mut self,
        step: impl Into<String>,
        map: &dyn Map<Value>,
        result: impl Into<String>,
    ) {
        let numeric = |value: String| Cell::new(value).set_alignment(CellAlignment::Right);

        let mut row = Row::new();
        row.add_cell(Cell::new(self.scenario))
            .add_cell(Cell::new(step.into()))
            .add_cell(numeric(map.empty_buckets().to_string()))
            .add_cell(numeric(format!("{:.2}", map.table_load())))
            .add_cell(numeric(map.len().to_string()))
            .add_cell(numeric(map.capacity().to_string()))
            .add_cell(Cell::new(result.into()));

        self.rows.push(row);
    }
}

fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "None".to_owned(), Value::to_string)
}

fn empty_buckets(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(100, Additive)?;
    for (key, value) in [("key1", 10), ("key2", 20), ("key1", 30), ("key4", 40)] {
        m.put(key, value.into());
        r.record(format!("put({key}, {value})"), &m, "");
    }

    let mut m = r.map(50, Additive)?;
    for i in 0..150 {
        m.put(&format!("key{i}"), (i * 100).into());
        if i % 30 == 0 {
            r.record(format!("put(key{i}, {})", i * 100), &m, "");
        }
    }

    Ok(())
}

fn table_load(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(100, Additive)?;
    for (key, value) in [("key1", 10), ("key2", 20), ("key1", 30)] {
        m.put(key, value.into());
        r.record(format!("put({key}, {value})"), &m, "");
    }

    let mut m = r.map(50, Additive)?;
    for i in 0..50 {
        m.put(&format!("key{i}"), (i * 100).into());
        if i % 10 == 0 {
            r.record(format!("put(key{i}, {})", i * 100), &m, "");
        }
    }

    Ok(())
}

fn clear(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(100, Additive)?;
    for (key, value) in [("key1", 10), ("key2", 20), ("key1", 30)] {
        m.put(key, value.into());
    }
    r.record("put(key1, key2, key1)", &m, "");
    m.clear();
    r.record("clear()", &m, "");

    let mut m = r.map(50, Additive)?;
    m.put("key1", 10.into());
    m.put("key2", 20.into());
    r.record("put(key1, key2)", &m, "");
    m.resize_table(100);
    r.record("resize_table(100)", &m, "");
    m.clear();
    r.record("clear()", &m, "");

    Ok(())
}

fn put(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(50, Additive)?;
    for i in 0..150 {
        m.put(&format!("str{i}"), (i * 100).into());
        if i % 25 == 24 {
            r.record(format!("put(str{i}, {})", i * 100), &m, "");
        }
    }

    let mut m = r.map(40, Positional)?;
    for i in 0..50 {
        let key = format!("str{}", i / 3);
        m.put(&key, (i * 100).into());
        if i % 10 == 9 {
            r.record(format!("put({key}, {})", i * 100), &m, "");
        }
    }

    Ok(())
}

fn contains_key(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(10, Additive)?;
    r.record("contains_key(key1)", &m, m.contains_key("key1").to_string());

    for (key, value) in [("key1", 10), ("key2", 20), ("key3", 30)] {
        m.put(key, value.into());
    }
    for key in ["key1", "key4", "key2", "key3"] {
        let found = m.contains_key(key).to_string();
        r.record(format!("contains_key({key})"), &m, found);
    }

    m.remove("key3");
    r.record("contains_key(key3) after remove", &m, m.contains_key("key3").to_string());

    let mut m = r.map(75, Positional)?;
    let keys: Vec<i64> = (1..1000).step_by(20).collect();
    for key in &keys {
        m.put(&key.to_string(), (key * 42).into());
    }
    r.record(format!("put({} keys)", keys.len()), &m, "");

    let all_present = keys.iter().all(|key| m.contains_key(&key.to_string()));
    let none_extra = keys.iter().all(|key| !m.contains_key(&(key + 1).to_string()));
    r.record("all keys present", &m, all_present.to_string());
    r.record("no neighbours present", &m, none_extra.to_string());

    Ok(())
}

fn get(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(30, Additive)?;
    r.record("get(key)", &m, show(m.get("key")));
    m.put("key1", 10.into());
    r.record("get(key1)", &m, show(m.get("key1")));

    let mut m = r.map(150, Positional)?;
    for i in (200..300).step_by(7) {
        m.put(&i.to_string(), (i * 10).into());
    }
    r.record("put(200..300 step 7)", &m, "");

    for i in (200..300).step_by(21) {
        let hit = show(m.get(&i.to_string()));
        let miss = show(m.get(&(i + 1).to_string()));
        r.record(format!("get({i}), get({})", i + 1), &m, format!("{hit}, {miss}"));
    }

    Ok(())
}

fn remove(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(50, Additive)?;
    r.record("get(key1)", &m, show(m.get("key1")));

    m.put("key1", 10.into());
    r.record("put(key1, 10)", &m, show(m.get("key1")));

    let removed = show(m.remove("key1").as_ref());
    r.record("remove(key1)", &m, removed);
    r.record("get(key1)", &m, show(m.get("key1")));

    let removed = show(m.remove("key4").as_ref());
    r.record("remove(key4)", &m, removed);

    Ok(())
}

fn resize(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(20, Additive)?;
    m.put("key1", 10.into());
    r.record("put(key1, 10)", &m, show(m.get("key1")));
    m.resize_table(30);
    r.record("resize_table(30)", &m, show(m.get("key1")));

    let mut m = r.map(75, Positional)?;
    let keys: Vec<i64> = (1..1000).step_by(13).collect();
    for key in &keys {
        m.put(&key.to_string(), (key * 42).into());
    }
    r.record(format!("put({} keys)", keys.len()), &m, "");

    for capacity in (111..1000).step_by(117) {
        m.resize_table(capacity);

        m.put("some key", "some value".into());
        let added = m.contains_key("some key");
        m.remove("some key");

        let intact = keys.iter().all(|key| {
            m.get(&key.to_string()) == Some(&Value::from(key * 42))
                && !m.contains_key(&(key + 1).to_string())
        });

        r.record(
            format!("resize_table({capacity})"),
            &m,
            format!("{}", added && intact),
        );
    }

    Ok(())
}

fn get_keys(r: &mut Runner<'_>) -> Result<()> {
    let mut m = r.map(10, Positional)?;
    for i in (100..200).step_by(10) {
        m.put(&i.to_string(), (i * 10).to_string().into());
    }
    r.record("put(100..200 step 10)", &m, m.get_keys().join(", "));

    m.resize_table(1);
    r.record("resize_table(1)", &m, m.get_keys().join(", "));

    m.put("200", "2000".into());
    m.remove("100");
    m.resize_table(2);
    r.record("put(200), remove(100), resize_table(2)", &m, m.get_keys().join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hm_config::Variant;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn run(variant: Variant, names: &[&str]) -> Vec<Vec<String>> {
        let config = MapConfig {
            variant,
            ..MapConfig::default()
        };
        let demo = Demo {
            names: names.iter().map(|name| (*name).to_owned()).collect(),
            list: false,
        };

        let Ok(Success::Table { rows, .. }) = demo.run(&config) else {
            panic!("expected a table");
        };

        rows.iter()
            .map(|row| row.cell_iter().map(Cell::content).collect())
            .collect()
    }

    fn column(rows: &[Vec<String>], index: usize) -> Vec<&str> {
        rows.iter().map(|row| row[index].as_str()).collect()
    }

    #[test]
    fn scenario_names_are_unique() {
        let mut names: Vec<_> = SCENARIOS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn unknown_scenario_is_an_error() {
        let demo = Demo {
            names: vec!["nope".to_owned()],
            list: false,
        };

        assert_matches!(
            demo.run(&MapConfig::default()),
            Err(Error::UnknownScenario(name)) if name == "nope"
        );
    }

    #[test]
    fn list_shows_every_scenario() {
        let demo = Demo {
            names: vec![],
            list: true,
        };

        let Ok(Success::Table { rows, .. }) = demo.run(&MapConfig::default()) else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), SCENARIOS.len());
    }

    #[test]
    fn empty_buckets_match_for_both_variants() {
        for variant in [Variant::OpenAddressing, Variant::Chained] {
            let rows = run(variant, &["empty-buckets"]);

            assert_eq!(column(&rows[..5], 2), vec!["100", "99", "98", "98", "97"]);
            assert_eq!(column(&rows[..5], 4), vec!["0", "1", "2", "2", "3"]);
        }
    }

    #[test]
    fn table_load_open_addressing() {
        let rows = run(Variant::OpenAddressing, &["table-load"]);

        assert_eq!(column(&rows[..4], 3), vec!["0.00", "0.01", "0.02", "0.02"]);
    }

    #[test]
    fn contains_key_results() {
        for variant in [Variant::OpenAddressing, Variant::Chained] {
            let rows = run(variant, &["contains-key"]);
            let results: Vec<_> = column(&rows, 6)
                .into_iter()
                .filter(|result| !result.is_empty())
                .collect();

            assert_eq!(results, vec![
                "false", "true", "false", "true", "true", "false", "true", "true"
            ]);
        }
    }

    #[test]
    fn remove_results() {
        let rows = run(Variant::OpenAddressing, &["remove"]);

        assert_eq!(column(&rows, 6), vec!["", "None", "10", "10", "None", "None"]);
    }

    #[test]
    fn resize_keeps_every_key() {
        for variant in [Variant::OpenAddressing, Variant::Chained] {
            let rows = run(variant, &["resize"]);

            assert!(
                rows.iter()
                    .filter(|row| row[1].starts_with("resize_table("))
                    .all(|row| row[6] == "true" || row[6] == "10"),
                "{rows:?}"
            );
        }
    }

    #[test]
    fn get_keys_after_shrinking() {
        let rows = run(Variant::Chained, &["get-keys"]);
        let last = rows.last().unwrap();

        let mut keys: Vec<_> = last[6].split(", ").collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![
            "110", "120", "130", "140", "150", "160", "170", "180", "190", "200"
        ]);
        assert_eq!(last[5], "2");
    }

    #[test]
    fn runs_scenarios_in_requested_order() {
        let rows = run(Variant::OpenAddressing, &["remove", "get"]);
        let scenarios: Vec<_> = column(&rows, 0);

        let first_get = scenarios.iter().position(|s| *s == "get").unwrap();
        assert!(scenarios[..first_get].iter().all(|s| *s == "remove"));
        assert!(scenarios[first_get..].iter().all(|s| *s == "get"));
    }
}

use comfy_table::{Cell, Row, Table};
use serde_json::{Map, Value};

const EMPTY: &str = "                   ";
const UTF8_FULL: &str = "││──├──┤     ──╭╮╰╯";

pub(crate) fn list(header: Row, rows: Vec<Row>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table.add_rows(rows);

    table.trim_fmt()
}

/// One JSON object per row, keyed by the header cells.
pub(crate) fn list_json(header: &Row, rows: Vec<Row>) -> Value {
    let keys: Vec<_> = header.cell_iter().map(Cell::content).collect();

    rows.into_iter()
        .map(|row| {
            keys.iter()
                .cloned()
                .zip(row.cell_iter().map(|cell| Value::String(cell.content())))
                .collect::<Map<_, _>>()
        })
        .map(Value::Object)
        .collect()
}

pub(crate) fn details(title: Option<&str>, rows: Vec<Row>) -> String {
    let mut buf = String::new();

    if let Some(title) = title {
        buf.push_str(title);
        buf.push_str("\n\n");
    }

    let mut table = Table::new();
    table.load_preset(EMPTY);
    table.add_rows(rows);
    buf.push_str(&table.trim_fmt());

    buf
}

pub(crate) fn details_json(title: Option<&str>, rows: Vec<Row>) -> Value {
    let mut details = Map::new();
    for row in rows {
        let mut iter = row.cell_iter();
        let Some(key) = iter.next().map(Cell::content) else {
            continue;
        };

        let value = iter.next().map(Cell::content).unwrap_or_default();

        details.insert(key, value.into());
    }

    serde_json::json!({
        "title": title,
        "details": details,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn list_json_keys_cells_by_header() {
        let header = Row::from(vec!["step", "size"]);
        let rows = vec![Row::from(vec!["put(a)", "1"]), Row::from(vec!["put(b)", "2"])];

        assert_eq!(
            list_json(&header, rows),
            serde_json::json!([
                { "step": "put(a)", "size": "1" },
                { "step": "put(b)", "size": "2" },
            ])
        );
    }

    #[test]
    fn details_json_pairs_first_two_cells() {
        let rows = vec![Row::from(vec!["size", "3"]), Row::new()];

        assert_eq!(
            details_json(Some("map"), rows),
            serde_json::json!({ "title": "map", "details": { "size": "3" } })
        );
    }

    #[test]
    fn details_puts_title_above_rows() {
        let out = details(Some("0: None"), vec![Row::from(vec!["size", "0"])]);

        assert!(out.starts_with("0: None\n\n"));
        assert!(out.contains("size"));
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One breakpoint in a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Breakpoint {
    pub fn at(line: u32) -> Self {
        Self {
            line,
            condition: None,
        }
    }

    pub fn conditional(line: u32, condition: impl Into<String>) -> Self {
        Self {
            line,
            condition: Some(condition.into()),
        }
    }
}

/// Source file path -> breakpoints in that file. Ordered so the payload sent to
/// the kernel is deterministic.
pub type BreakpointMap = BTreeMap<String, Vec<Breakpoint>>;

pub fn breakpoint_count(map: &BreakpointMap) -> usize {
    map.values().map(Vec::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_across_files() {
        let mut map = BreakpointMap::new();
        map.insert("a.py".into(), vec![Breakpoint::at(1), Breakpoint::at(7)]);
        map.insert("b.py".into(), vec![Breakpoint::conditional(3, "x > 2")]);
        assert_eq!(breakpoint_count(&map), 3);
    }

    #[test]
    fn condition_omitted_when_absent() {
        let json = serde_json::to_string(&Breakpoint::at(4)).unwrap();
        assert_eq!(json, r#"{"line":4}"#);
    }

    #[test]
    fn parses_settings_shape() {
        let map: BreakpointMap = serde_json::from_str(
            r#"{"/src/main.py": [{"line": 12}, {"line": 40, "condition": "i == 3"}]}"#,
        )
        .unwrap();
        let bps = &map["/src/main.py"];
        assert_eq!(bps[0], Breakpoint::at(12));
        assert_eq!(bps[1].condition.as_deref(), Some("i == 3"));
    }
}

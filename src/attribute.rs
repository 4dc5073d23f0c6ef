use serde::{Deserialize, Serialize};

/// One categorical attribute of the survey data: symbolic name, positional
/// column index in the CSV, and the human-readable label shown in legends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub column: usize,
    pub label: String,
}

/// Read-only lookup table mapping symbolic attribute names to column
/// indices. Supplied by configuration, never computed: the positional-index
/// contract is inherited from the source CSV format, and this table is the
/// only place indices live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTable {
    entries: Vec<AttributeDef>,
}

impl AttributeTable {
    pub fn new(entries: Vec<AttributeDef>) -> Self {
        Self { entries }
    }

    /// The attribute table of the behavioral survey export this tool was
    /// built against.
    pub fn survey_defaults() -> Self {
        fn def(name: &str, column: usize) -> AttributeDef {
            AttributeDef { name: name.to_string(), column, label: name.replace('_', " ") }
        }

        Self::new(vec![
            def("DAY_TYPE", 7),
            def("TIME_TYPE", 14),
            def("GENDER", 16),
            def("FINAL_DESTINATION_CODED", 19),
            def("TOUCH_BINARY", 24),
            def("FIRST_TOUCH_OBJ_CODED", 28),
            def("RE_MEDICAL", 34),
            def("MECH_TRANS", 35),
        ])
    }

    pub fn entries(&self) -> &[AttributeDef] {
        &self.entries
    }

    /// Column index for a symbolic attribute name, if the table defines it.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.entries.iter().find(|def| def.name == name).map(|def| def.column)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|def| def.name == name).map(|def| def.label.as_str())
    }
}

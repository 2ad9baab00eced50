/// Items that can be taken, dropped or used somewhere in the building.
const ITEMS: &[&str] = &[
    "tea",
    "lanyard",
    "abandoned-lanyard",
    "cd",
    "first-plate",
    "second-plate",
    "third-plate",
    "fourth-plate",
    "fifth-plate",
    "sixth-plate",
];

const ENTITIES: &[&str] = &[
    "rosie",
    "kettle",
    "sofa",
    "dishwasher",
    "cat",
    "computer",
    "alan",
    "agile-manifesto",
    "desk",
    "terminal",
    "dan",
];

const DIRECTIONS: &[&str] = &["north", "south", "east", "west"];

// Dummy actions for development until the server hands these out.
const DEVELOPMENT_CATALOG: &[(&str, &[&str])] = &[
    ("look", &[]),
    ("exit", &[]),
    ("commands", &[]),
    ("take", ITEMS),
    ("drop", ITEMS),
    ("inventory", &[]),
    ("approach", ENTITIES),
    ("use", ITEMS),
    ("leave", &[]),
    ("move", DIRECTIONS),
    ("map", &[]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub args: Vec<String>,
}

/// Ordered list of playable verbs and the arguments each one accepts.
///
/// Only used to populate the selectors; the server remains the authority on
/// what a command actually does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandCatalog {
    entries: Vec<CommandEntry>,
}

impl CommandCatalog {
    pub fn development() -> Self {
        Self {
            entries: DEVELOPMENT_CATALOG
                .iter()
                .map(|(name, args)| CommandEntry {
                    name: (*name).to_owned(),
                    args: args.iter().map(|a| (*a).to_owned()).collect(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CommandEntry> {
        self.entries.get(index)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).map(|e| e.name.as_str())
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Arguments for `command`, empty for unknown commands.
    pub fn args_for(&self, command: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.name == command)
            .map(|e| e.args.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the argument list of an existing command. Returns false when
    /// the command isn't in the catalog.
    pub fn set_args(&mut self, command: &str, args: Vec<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.name == command) {
            Some(entry) => {
                entry.args = args;
                true
            }
            None => false,
        }
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::development()
    }
}

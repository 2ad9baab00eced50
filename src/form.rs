use crate::catalog::CommandCatalog;
use crate::protocol::TurnRequest;

/// Selector state of the command form. `argument` of `None` means no
/// argument is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandForm {
    command: usize,
    argument: Option<usize>,
}

impl CommandForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command<'a>(&self, catalog: &'a CommandCatalog) -> &'a str {
        catalog.name(self.command).unwrap_or_default()
    }

    pub fn argument<'a>(&self, catalog: &'a CommandCatalog) -> Option<&'a str> {
        let args = catalog.args_for(self.command(catalog));
        self.argument
            .and_then(|i| args.get(i))
            .map(String::as_str)
    }

    pub fn shows_argument_selector(&self, catalog: &CommandCatalog) -> bool {
        !catalog.args_for(self.command(catalog)).is_empty()
    }

    pub fn next_command(&mut self, catalog: &CommandCatalog) {
        if catalog.is_empty() {
            return;
        }
        self.command = (self.command + 1) % catalog.len();
        self.argument = None;
    }

    pub fn prev_command(&mut self, catalog: &CommandCatalog) {
        if catalog.is_empty() {
            return;
        }
        self.command = if self.command == 0 {
            catalog.len() - 1
        } else {
            self.command - 1
        };
        self.argument = None;
    }

    /// Cycle none -> first -> ... -> last -> none.
    pub fn next_argument(&mut self, catalog: &CommandCatalog) {
        let count = catalog.args_for(self.command(catalog)).len();
        if count == 0 {
            self.argument = None;
            return;
        }
        self.argument = match self.argument {
            None => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            Some(_) => None,
        };
    }

    pub fn prev_argument(&mut self, catalog: &CommandCatalog) {
        let count = catalog.args_for(self.command(catalog)).len();
        if count == 0 {
            self.argument = None;
            return;
        }
        self.argument = match self.argument {
            None => Some(count - 1),
            Some(0) => None,
            Some(i) => Some((i - 1).min(count - 1)),
        };
    }

    pub fn to_request(&self, catalog: &CommandCatalog) -> TurnRequest {
        TurnRequest::new(
            self.command(catalog),
            self.argument(catalog).map(str::to_owned),
        )
    }
}

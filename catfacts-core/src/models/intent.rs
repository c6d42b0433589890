use std::fmt;
use std::str::FromStr;

/// Platform-defined names of the built-in control intents.
pub mod builtin {
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
}

/// Custom commands this skill serves. Intent names match case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCommand {
    GetFact,
}

impl FactCommand {
    pub const ALL: [FactCommand; 1] = [FactCommand::GetFact];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactCommand::GetFact => "GetFact",
        }
    }
}

impl fmt::Display for FactCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFactCommand(pub String);

impl FromStr for FactCommand {
    type Err = UnknownFactCommand;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FactCommand::ALL
            .into_iter()
            .find(|command| command.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownFactCommand(name.to_string()))
    }
}

/// An intent name decoded into the command it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentCommand {
    Fact(FactCommand),
    Help,
    Stop,
    Cancel,
    Unrecognized(String),
}

impl IntentCommand {
    /// Custom commands take precedence; built-ins must match the platform name exactly.
    pub fn parse(name: &str) -> Self {
        if let Ok(command) = name.parse::<FactCommand>() {
            return IntentCommand::Fact(command);
        }
        match name {
            builtin::HELP => IntentCommand::Help,
            builtin::STOP => IntentCommand::Stop,
            builtin::CANCEL => IntentCommand::Cancel,
            other => IntentCommand::Unrecognized(other.to_string()),
        }
    }
}

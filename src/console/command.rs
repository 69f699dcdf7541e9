use std::fmt;

/// Alias for `help`; registered separately but left out of help listings.
pub const HELP_ALIAS: &str = "?";

/// Every operation the console can perform. Registry entries map a token to one
/// of these variants, so dispatch is an exhaustive `match` instead of a string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Status,
    KnownNodes,
    FleetState,
    CycleTeacher,
    StartLearning,
    StopLearning,
    Stop,
}

/// Built-in tokens in registration order. `?` and `help` share a variant.
pub const BUILTIN_COMMANDS: &[(&str, Command)] = &[
    (HELP_ALIAS, Command::Help),
    ("help", Command::Help),
    ("status", Command::Status),
    ("known_nodes", Command::KnownNodes),
    ("fleet_state", Command::FleetState),
    ("cycle_teacher", Command::CycleTeacher),
    ("start_learning", Command::StartLearning),
    ("stop_learning", Command::StopLearning),
    ("stop", Command::Stop),
];

impl Command {
    /// Help text for the command. Registration refuses empty descriptions.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Help => "Display this help message.",
            Command::Status => "Display the current status of the attached node.",
            Command::KnownNodes => "Display a list of all known peers.",
            Command::FleetState => {
                "Display information about the network-wide fleet state as the attached node sees it."
            }
            Command::CycleTeacher => {
                "Manually direct the attached node to start learning from a different teacher."
            }
            Command::StartLearning => "Manually start the attached node's learning protocol.",
            Command::StopLearning => "Manually stop the attached node's learning protocol.",
            Command::Stop => "Shutdown the attached running node.",
        }
    }

    /// Canonical (non-alias) token.
    pub fn token(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Status => "status",
            Command::KnownNodes => "known_nodes",
            Command::FleetState => "fleet_state",
            Command::CycleTeacher => "cycle_teacher",
            Command::StartLearning => "start_learning",
            Command::StopLearning => "stop_learning",
            Command::Stop => "stop",
        }
    }

    /// True for the one command whose effect reaches past the session.
    pub fn halts_process(&self) -> bool {
        matches!(self, Command::Stop)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

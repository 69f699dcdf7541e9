use nodeconsole::console::{
    Command, CommandRegistry, History, LookupError, RegistrationError, BUILTIN_COMMANDS,
};

#[test]
fn builtin_table_keeps_registration_order() {
    let registry = CommandRegistry::<Command>::builtin().unwrap();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(
        names,
        vec![
            "?",
            "help",
            "status",
            "known_nodes",
            "fleet_state",
            "cycle_teacher",
            "start_learning",
            "stop_learning",
            "stop"
        ]
    );
    assert_eq!(registry.len(), BUILTIN_COMMANDS.len());
    assert_eq!(registry.lookup("?"), Ok(&Command::Help));
    assert_eq!(registry.lookup("help"), Ok(&Command::Help));
    assert_eq!(registry.lookup("stop"), Ok(&Command::Stop));
}

#[test]
fn list_all_restarts_on_every_call() {
    let registry = CommandRegistry::<Command>::builtin().unwrap();
    let first: Vec<_> = registry.list_all().collect();
    let second: Vec<_> = registry.list_all().collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|(_, desc)| !desc.trim().is_empty()));
}

#[test]
fn missing_description_is_rejected() {
    let mut registry: CommandRegistry<u8> = CommandRegistry::new();
    assert_eq!(
        registry.register("ping", "   ", 1),
        Err(RegistrationError::MissingDescription("ping".into()))
    );
    assert!(registry.is_empty());
}

#[test]
fn duplicate_name_is_rejected_and_first_entry_kept() {
    let mut registry: CommandRegistry<u8> = CommandRegistry::new();
    registry.register("ping", "Reply with pong.", 1).unwrap();
    assert_eq!(
        registry.register("ping", "Second ping.", 2),
        Err(RegistrationError::DuplicateCommand("ping".into()))
    );
    assert_eq!(registry.lookup("ping"), Ok(&1));
    assert_eq!(registry.len(), 1);
}

#[test]
fn names_must_be_lowercase_single_tokens() {
    let mut registry: CommandRegistry<u8> = CommandRegistry::new();
    for bad in ["", "Ping", "two words", "tab\tbed"] {
        assert_eq!(
            registry.register(bad, "Something.", 0),
            Err(RegistrationError::InvalidName(bad.into()))
        );
    }
}

#[test]
fn lookup_is_exact_match() {
    let registry = CommandRegistry::<Command>::builtin().unwrap();
    assert_eq!(
        registry.lookup("STATUS"),
        Err(LookupError::CommandNotFound("STATUS".into()))
    );
    assert!(registry.lookup("stat").is_err());
    assert!(!registry.contains(" status"));
}

#[test]
fn history_evicts_oldest_first() {
    let mut history = History::default();
    assert_eq!(history.capacity(), 10);
    for i in 0..12 {
        history.push(format!("cmd{}", i));
    }
    assert_eq!(history.len(), 10);
    let kept: Vec<&str> = history.iter().collect();
    assert_eq!(kept.first(), Some(&"cmd2"));
    assert_eq!(kept.last(), Some(&"cmd11"));
}

#[test]
fn zero_capacity_history_stays_empty() {
    let mut history = History::new(0);
    history.push("status");
    assert!(history.is_empty());
}
